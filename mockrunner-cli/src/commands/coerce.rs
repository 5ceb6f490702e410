use mockrunner::coercion::coerce_with;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{offline_registry, parse_descriptor},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct CoerceOutput {
    descriptor: String,
    input: Option<String>,
    value: serde_json::Value,
    display: String,
}

pub fn run(return_type: &str, value: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let descriptor = parse_descriptor(return_type)?;
    let registry = offline_registry();
    let coerced = coerce_with(value, &descriptor, &registry)?;

    let output = CoerceOutput {
        descriptor: descriptor.to_string(),
        input: value.map(str::to_string),
        value: coerced.to_json(),
        display: coerced.to_string(),
    };

    print_output(&output, opts, |out| {
        println!("{}", serde_json::to_string_pretty(&out.value).unwrap_or_default());
    })
}

use mockrunner::coercion::sample_value;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{offline_registry, parse_descriptor},
    output::print_output,
};

#[derive(Debug, Serialize)]
struct SampleOutput {
    descriptor: String,
    sample: String,
}

pub fn run(return_type: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let descriptor = parse_descriptor(return_type)?;
    let output = SampleOutput {
        descriptor: descriptor.to_string(),
        sample: sample_value(&descriptor, &offline_registry()),
    };

    print_output(&output, opts, |out| println!("{}", out.sample))
}

use std::path::Path;

use mockrunner::rules::MockMethodSpec;
use serde::Serialize;

use crate::{
    app::{GlobalOptions, MethodTarget},
    commands::common::{load_for_edit, load_rules, save_rules},
    output::print_output,
};

/// Options for `add`, borrowed from the parsed command line.
pub struct AddOptions<'a> {
    pub target: &'a MethodTarget,
    pub value: Option<&'a str>,
    pub return_type: &'a str,
    pub throw: bool,
    pub exception_type: &'a str,
    pub message: &'a str,
    pub disabled: bool,
}

#[derive(Debug, Serialize)]
struct EditOutput {
    action: &'static str,
    method: String,
    rules: usize,
}

fn build_spec(opts: &AddOptions<'_>) -> MockMethodSpec {
    let mut spec = MockMethodSpec::new(&opts.target.class_name, &opts.target.method_name)
        .with_signature(&opts.target.signature)
        .with_enabled(!opts.disabled);
    spec.return_value = opts.value.map(str::to_string);
    spec.return_type = opts.return_type.to_string();
    spec.exception_type = opts.exception_type.to_string();
    spec.exception_message = Some(opts.message.to_string());
    spec.throw_exception = opts.throw;
    spec
}

pub fn add(path: &Path, opts: &AddOptions<'_>, global: &GlobalOptions) -> anyhow::Result<()> {
    let store = load_for_edit(path)?;
    let spec = build_spec(opts);
    let method = spec.full_method_name();

    store.add_spec(spec)?;
    save_rules(&store, path)?;

    let output = EditOutput {
        action: "added",
        method,
        rules: store.len(),
    };
    print_output(&output, global, |out| {
        println!("Added {} ({} rules in {})", out.method, out.rules, path.display());
    })
}

pub fn remove(path: &Path, target: &MethodTarget, global: &GlobalOptions) -> anyhow::Result<()> {
    let store = load_rules(path)?;
    if !store.remove_spec(&target.class_name, &target.method_name, &target.signature)? {
        anyhow::bail!(
            "no spec for {}.{}{} in {}",
            target.class_name,
            target.method_name,
            target.signature,
            path.display()
        );
    }
    save_rules(&store, path)?;

    let output = EditOutput {
        action: "removed",
        method: format!(
            "{}.{}{}",
            target.class_name, target.method_name, target.signature
        ),
        rules: store.len(),
    };
    print_output(&output, global, |out| {
        println!("Removed {} ({} rules left)", out.method, out.rules);
    })
}

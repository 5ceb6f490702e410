use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_rules, rule_value},
    output::{print_output, RuleTable},
};

#[derive(Debug, Serialize)]
struct RuleEntry {
    owner: String,
    enabled: bool,
    mode: String,
    return_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    rules: Vec<RuleEntry>,
    specs: usize,
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let store = load_rules(path)?;

    let rules = store
        .rules()
        .into_iter()
        .map(|(owner, rule)| RuleEntry {
            owner: owner.to_string(),
            enabled: rule.enabled,
            mode: rule.mode().to_string(),
            return_type: rule.effective_return_type().to_string(),
            value: rule_value(&rule),
        })
        .collect();

    let output = ShowOutput {
        rules,
        specs: store.specs()?.len(),
    };

    print_output(&output, opts, |out| {
        println!(
            "{} rules, {} method specs in {}",
            out.rules.len(),
            out.specs,
            path.display()
        );
        let mut table =
            RuleTable::new(&["Owner", "Enabled", "Mode", "Type", "Value"]).limit(4, 60);
        for entry in &out.rules {
            table.push([
                entry.owner.clone(),
                if entry.enabled { "yes" } else { "no" }.to_string(),
                entry.mode.clone(),
                entry.return_type.clone(),
                entry.value.clone(),
            ]);
        }
        table.print_or("No rules.");
    })
}

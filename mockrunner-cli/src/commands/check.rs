use std::path::Path;

use mockrunner::{
    coercion::coerce_with,
    exception::ExceptionSynthesizer,
    rules::{MockRule, OwnerKey},
    typesystem::{TypeDescriptor, TypeRegistry},
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{load_rules, offline_registry},
    output::{print_output, RuleTable},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Serialize)]
struct CheckEntry {
    owner: String,
    status: Status,
    detail: String,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    checked: usize,
    warnings: usize,
    errors: usize,
    entries: Vec<CheckEntry>,
}

fn check_rule(owner: &OwnerKey, rule: &MockRule, registry: &dyn TypeRegistry) -> CheckEntry {
    let (status, detail) = if rule.throw_exception {
        match ExceptionSynthesizer::new(registry).try_synthesize(&rule.exception_type, None) {
            Ok(throwable) => (Status::Ok, format!("throws {}", throwable.type_name)),
            // Classpath exceptions are only known at runtime.
            Err(e) => (
                Status::Warn,
                format!("{e}; a RuntimeException is thrown unless the host defines it"),
            ),
        }
    } else {
        let descriptor = rule.effective_return_type();
        match TypeDescriptor::parse(descriptor) {
            Err(e) => (Status::Error, format!("invalid descriptor '{descriptor}': {e}")),
            Ok(parsed) => match coerce_with(rule.return_value.as_deref(), &parsed, registry) {
                Ok(value) => (Status::Ok, format!("{parsed} = {value}")),
                Err(e) => (Status::Error, format!("{parsed}: {e}")),
            },
        }
    };

    CheckEntry {
        owner: owner.to_string(),
        status,
        detail,
    }
}

pub fn run(path: &Path, opts: &GlobalOptions) -> anyhow::Result<()> {
    let store = load_rules(path)?;
    let registry = offline_registry();

    let entries: Vec<CheckEntry> = store
        .rules()
        .iter()
        .map(|(owner, rule)| check_rule(owner, rule, &registry))
        .collect();
    let count = |status| entries.iter().filter(|e| e.status == status).count();

    let output = CheckOutput {
        checked: entries.len(),
        warnings: count(Status::Warn),
        errors: count(Status::Error),
        entries,
    };

    print_output(&output, opts, |out| {
        let mut table = RuleTable::new(&["Owner", "Status", "Detail"]);
        for entry in &out.entries {
            let status = match entry.status {
                Status::Ok => "ok",
                Status::Warn => "warn",
                Status::Error => "ERROR",
            };
            table.push([entry.owner.as_str(), status, entry.detail.as_str()]);
        }
        table.print_or("No rules.");
        println!(
            "\n{} rules checked, {} warnings, {} errors",
            out.checked, out.warnings, out.errors
        );
    })?;

    if output.errors > 0 {
        anyhow::bail!("{} of {} rules cannot be applied", output.errors, output.checked);
    }
    Ok(())
}

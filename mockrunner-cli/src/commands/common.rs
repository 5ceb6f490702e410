use std::path::Path;

use anyhow::Context;
use mockrunner::{
    rules::{MockRule, RuleStore},
    typesystem::{ClassRegistry, TypeDescriptor},
};

/// Load a rule-set file strictly, failing on a missing or malformed file.
pub fn load_rules(path: &Path) -> anyhow::Result<RuleStore> {
    RuleStore::from_file(path)
        .with_context(|| format!("failed to load rule set: {}", path.display()))
}

/// Load a rule-set file for editing; a missing file starts an empty rule set.
pub fn load_for_edit(path: &Path) -> anyhow::Result<RuleStore> {
    if path.exists() {
        load_rules(path)
    } else {
        Ok(RuleStore::new())
    }
}

/// Save a rule set, with the path in the error context.
pub fn save_rules(store: &RuleStore, path: &Path) -> anyhow::Result<()> {
    store
        .save(path)
        .with_context(|| format!("failed to write rule set: {}", path.display()))
}

/// The registry used for offline checks: the platform types only.
pub fn offline_registry() -> ClassRegistry {
    ClassRegistry::with_builtins()
}

/// Parse a descriptor given on the command line.
pub fn parse_descriptor(text: &str) -> anyhow::Result<TypeDescriptor> {
    TypeDescriptor::parse(text).with_context(|| format!("invalid type descriptor: '{text}'"))
}

/// The value column shown for a rule.
pub fn rule_value(rule: &MockRule) -> String {
    if rule.throw_exception {
        match rule.exception_message.as_deref() {
            Some(message) => format!("{}: {message}", rule.exception_type),
            None => rule.exception_type.clone(),
        }
    } else {
        rule.return_value
            .clone()
            .unwrap_or_else(|| "null".to_string())
    }
}

//! The live rule table consulted on every intercepted call.
//!
//! # Architecture
//!
//! Rules are kept in an explicit two-level map, `class -> method -> rule`.
//! Lookups are exact on both levels, so a rule for `svc.Store` can never be
//! mistaken for one on `svc.StoreImpl`. The outer map is a `DashMap`, which
//! lets interception threads read while a host edits rules in place.
//!
//! Alongside the rules the store keeps the list of [`MockMethodSpec`]s they
//! were derived from, behind an `RwLock`. Specs only matter for editing and
//! persistence; the interception path never touches them.
//!
//! # Loading
//!
//! [`RuleStore::load`] never fails: a missing or malformed file is logged and
//! yields an empty store, so a broken rule set disables mocking instead of
//! taking the process down. [`RuleStore::from_file`] is the strict variant
//! for tooling.
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::rules::{MockMethodSpec, MockRule, RuleStore};
//!
//! let store = RuleStore::new();
//! store.add_rule("svc.Store", "getCount", MockRule::returning("5", "int"));
//! assert!(store.lookup("svc.Store", "getCount").is_some());
//! assert!(store.lookup("svc.StoreImpl", "getCount").is_none());
//!
//! store.add_spec(MockMethodSpec::new("svc.Api", "list").returning("[]", "List<svc.Item>"))?;
//! assert_eq!(store.len(), 2);
//! # Ok::<(), mockrunner::Error>(())
//! ```

use std::{collections::HashMap, path::Path, sync::RwLock};

use dashmap::DashMap;
use log::{debug, warn};

use crate::{
    rules::{MockMethodSpec, MockRule, OwnerKey, RuleSetFile},
    Result,
};

/// Concurrent `class -> method -> rule` table plus the specs behind it.
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: DashMap<String, HashMap<String, MockRule>>,
    specs: RwLock<Vec<MockMethodSpec>>,
}

impl RuleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a rule-set file, yielding an empty store on any failure.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> RuleStore {
        match Self::from_file(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("{e}; continuing with no mock rules");
                RuleStore::new()
            }
        }
    }

    /// Loads a rule-set file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ConfigLoad`] if the file is missing or malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<RuleStore> {
        Ok(Self::from_rule_set(RuleSetFile::read(path)?))
    }

    /// Builds a store from a parsed rule set.
    ///
    /// If the flat rule table is empty the rules are derived from the specs;
    /// otherwise the flat table is used as-is and the specs are kept for
    /// editing. Flat keys that are not of the form `class.method` are skipped.
    #[must_use]
    pub fn from_rule_set(file: RuleSetFile) -> RuleStore {
        let mut store = RuleStore::new();

        if file.mock_rules.is_empty() {
            for spec in &file.mock_methods {
                debug!(
                    "Derived rule {}.{} -> {}",
                    spec.class_name,
                    spec.method_name,
                    spec.to_rule().return_type
                );
                store.insert(&spec.class_name, &spec.method_name, spec.to_rule());
            }
        } else {
            for (key, mut rule) in file.mock_rules {
                let owner = match OwnerKey::parse(&key) {
                    Ok(owner) => owner,
                    Err(e) => {
                        warn!("Skipping rule: {e}");
                        continue;
                    }
                };
                if rule.return_type.trim().is_empty() {
                    rule.return_type = rule.effective_return_type().to_string();
                }
                store.insert(&owner.class_name, &owner.method_name, rule);
            }
        }

        store.specs = RwLock::new(file.mock_methods);
        store
    }

    /// Adds or replaces the rule for `class_name.method_name`.
    pub fn add_rule(&self, class_name: &str, method_name: &str, rule: MockRule) {
        self.insert(class_name, method_name, rule);
    }

    fn insert(&self, class_name: &str, method_name: &str, rule: MockRule) {
        self.rules
            .entry(class_name.to_string())
            .or_default()
            .insert(method_name.to_string(), rule);
    }

    /// Returns the rule for `class_name.method_name`, if any.
    ///
    /// Matching is exact on both class and method. The result is a snapshot;
    /// later edits to the store are not reflected in it.
    #[must_use]
    pub fn lookup(&self, class_name: &str, method_name: &str) -> Option<MockRule> {
        self.rules
            .get(class_name)
            .and_then(|methods| methods.get(method_name).cloned())
    }

    /// Replaces the specs and rebuilds every rule from them.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn rebuild_from_specs(&self, specs: Vec<MockMethodSpec>) -> Result<()> {
        let mut current = write_lock!(self.specs);
        self.rules.clear();
        for spec in &specs {
            self.insert(&spec.class_name, &spec.method_name, spec.to_rule());
        }
        *current = specs;
        Ok(())
    }

    /// Adds a spec, replacing one with the same class, method and signature,
    /// and (re)derives its rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn add_spec(&self, spec: MockMethodSpec) -> Result<()> {
        let mut specs = write_lock!(self.specs);
        specs.retain(|existing| existing.identity() != spec.identity());
        self.insert(&spec.class_name, &spec.method_name, spec.to_rule());
        specs.push(spec);
        Ok(())
    }

    /// Removes a spec and the rule for its class and method.
    ///
    /// If another spec for the same class and method (a different overload)
    /// remains, its rule takes over. Returns `true` if anything was removed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn remove_spec(
        &self,
        class_name: &str,
        method_name: &str,
        signature: &str,
    ) -> Result<bool> {
        let mut specs = write_lock!(self.specs);
        let before = specs.len();
        specs.retain(|s| s.identity() != (class_name, method_name, signature));
        let removed_spec = specs.len() != before;
        let removed_rule = self.remove_rule(class_name, method_name);

        if let Some(remaining) = specs
            .iter()
            .rev()
            .find(|s| s.class_name == class_name && s.method_name == method_name)
        {
            self.insert(class_name, method_name, remaining.to_rule());
        }

        Ok(removed_spec || removed_rule)
    }

    fn remove_rule(&self, class_name: &str, method_name: &str) -> bool {
        let removed = self
            .rules
            .get_mut(class_name)
            .is_some_and(|mut methods| methods.remove(method_name).is_some());
        self.rules.remove_if(class_name, |_, methods| methods.is_empty());
        removed
    }

    /// Returns `true` if a spec with this identity exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn has_spec(&self, class_name: &str, method_name: &str, signature: &str) -> Result<bool> {
        let specs = read_lock!(self.specs);
        Ok(specs
            .iter()
            .any(|s| s.identity() == (class_name, method_name, signature)))
    }

    /// Returns `true` if an enabled rule exists for the method.
    #[must_use]
    pub fn is_mocked(&self, class_name: &str, method_name: &str) -> bool {
        self.lookup(class_name, method_name)
            .is_some_and(|rule| rule.enabled)
    }

    /// A copy of all specs in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn specs(&self) -> Result<Vec<MockMethodSpec>> {
        Ok(read_lock!(self.specs).clone())
    }

    /// All rules declared on `class_name`, sorted by method name.
    #[must_use]
    pub fn rules_for_class(&self, class_name: &str) -> Vec<(String, MockRule)> {
        let mut rules: Vec<(String, MockRule)> = self
            .rules
            .get(class_name)
            .map(|methods| {
                methods
                    .iter()
                    .map(|(name, rule)| (name.clone(), rule.clone()))
                    .collect()
            })
            .unwrap_or_default();
        rules.sort_by(|a, b| a.0.cmp(&b.0));
        rules
    }

    /// Returns `true` if any rule names `class_name` as its owner.
    #[must_use]
    pub fn has_rules_for(&self, class_name: &str) -> bool {
        self.rules
            .get(class_name)
            .is_some_and(|methods| !methods.is_empty())
    }

    /// All owner keys, sorted.
    #[must_use]
    pub fn owner_keys(&self) -> Vec<OwnerKey> {
        let mut keys: Vec<OwnerKey> = self
            .rules
            .iter()
            .flat_map(|entry| {
                let class_name = entry.key().clone();
                entry
                    .value()
                    .keys()
                    .map(|method| OwnerKey::new(class_name.clone(), method.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        keys.sort();
        keys
    }

    /// All rules with their owner keys, sorted by key.
    #[must_use]
    pub fn rules(&self) -> Vec<(OwnerKey, MockRule)> {
        self.owner_keys()
            .into_iter()
            .filter_map(|key| {
                let rule = self.lookup(&key.class_name, &key.method_name)?;
                Some((key, rule))
            })
            .collect()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.iter().map(|entry| entry.value().len()).sum()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every rule and spec.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn clear(&self) -> Result<()> {
        let mut specs = write_lock!(self.specs);
        specs.clear();
        self.rules.clear();
        Ok(())
    }

    /// Applies `f` to the rule in place. Returns `false` if there is no such rule.
    pub fn update_rule<F>(&self, class_name: &str, method_name: &str, f: F) -> bool
    where
        F: FnOnce(&mut MockRule),
    {
        match self.rules.get_mut(class_name) {
            Some(mut methods) => match methods.get_mut(method_name) {
                Some(rule) => {
                    f(rule);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Enables or disables the rule and its specs. Returns `false` if there is no such rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn set_enabled(&self, class_name: &str, method_name: &str, enabled: bool) -> Result<bool> {
        self.edit_with_specs(class_name, method_name, |rule| rule.enabled = enabled, |spec| {
            spec.enabled = enabled;
        })
    }

    /// Switches the rule and its specs between return and throw mode.
    /// Returns `false` if there is no such rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn set_throw_exception(
        &self,
        class_name: &str,
        method_name: &str,
        throw_exception: bool,
    ) -> Result<bool> {
        self.edit_with_specs(
            class_name,
            method_name,
            |rule| rule.throw_exception = throw_exception,
            |spec| spec.throw_exception = throw_exception,
        )
    }

    fn edit_with_specs(
        &self,
        class_name: &str,
        method_name: &str,
        rule_edit: impl FnOnce(&mut MockRule),
        spec_edit: impl Fn(&mut MockMethodSpec),
    ) -> Result<bool> {
        let mut specs = write_lock!(self.specs);
        specs
            .iter_mut()
            .filter(|s| s.class_name == class_name && s.method_name == method_name)
            .for_each(spec_edit);
        Ok(self.update_rule(class_name, method_name, rule_edit))
    }

    /// The persisted form of this store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::LockError`] if the spec list is poisoned.
    pub fn to_rule_set(&self) -> Result<RuleSetFile> {
        let mock_methods = self.specs()?;
        let mock_rules = self
            .rules()
            .into_iter()
            .map(|(key, rule)| (key.to_string(), rule))
            .collect();
        Ok(RuleSetFile {
            mock_rules,
            mock_methods,
        })
    }

    /// Writes this store as a rule-set file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileError`] on I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_rule_set()?.write(path)
    }
}

//! Process start-up: read the rule set once and install the selector.
//!
//! The start-up argument names the rule-set file, either as a bare path or as
//! `config=<path>`. Without an argument nothing is installed and every method
//! runs unmodified. A missing or malformed file installs the selector over an
//! empty store, which also leaves every method unmodified.
//!
//! ```rust,no_run
//! use mockrunner::{bootstrap, runtime::Runtime};
//!
//! let runtime = Runtime::new();
//! let engine = bootstrap::premain(Some("config=/tmp/mock-runner/mock-config.json"), &runtime)?;
//! assert!(engine.is_some());
//! # Ok::<(), mockrunner::Error>(())
//! ```

use std::{path::PathBuf, sync::Arc};

use log::{debug, info};

use crate::{
    intercept::{ClassTransformationSelector, MockEngine},
    rules::RuleStore,
    runtime::Runtime,
    Result,
};

/// Parsed start-up arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentArgs {
    /// Rule-set file to load, if one was given
    pub config_path: Option<PathBuf>,
}

impl AgentArgs {
    /// Parses the raw argument string.
    ///
    /// Accepts `<path>` or `config=<path>`; whitespace around either is
    /// ignored and an empty value means no file.
    #[must_use]
    pub fn parse(args: Option<&str>) -> Self {
        let raw = args.map(str::trim).unwrap_or_default();
        let path = raw.strip_prefix("config=").map_or(raw, str::trim);

        Self {
            config_path: (!path.is_empty()).then(|| PathBuf::from(path)),
        }
    }
}

/// Installs a selector over `store` into `runtime`.
///
/// Classes loaded before this call are not affected.
///
/// # Errors
///
/// Returns [`crate::Error::LockError`] if the runtime's transformer list is poisoned.
pub fn install(store: Arc<RuleStore>, runtime: &Runtime) -> Result<Arc<MockEngine>> {
    let engine = Arc::new(MockEngine::new(store, runtime.registry().clone()));
    runtime.add_transformer(Arc::new(ClassTransformationSelector::new(engine.clone())))?;
    Ok(engine)
}

/// Start-up entry point.
///
/// Returns the installed engine, or `None` when no rule-set file was named.
///
/// # Errors
///
/// Returns [`crate::Error::LockError`] if the runtime's transformer list is poisoned.
/// Rule-set problems are logged, never returned.
pub fn premain(args: Option<&str>, runtime: &Runtime) -> Result<Option<Arc<MockEngine>>> {
    let Some(path) = AgentArgs::parse(args).config_path else {
        info!("No mock rule set given; interception disabled");
        return Ok(None);
    };

    let store = RuleStore::load(&path);
    info!("Loaded {} mock rules from {}", store.len(), path.display());
    for (owner, rule) in store.rules() {
        debug!(
            "  {owner} [{}] {} enabled={}",
            rule.mode(),
            rule.return_type,
            rule.enabled
        );
    }

    install(Arc::new(store), runtime).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args() {
        assert_eq!(AgentArgs::parse(None).config_path, None);
        assert_eq!(AgentArgs::parse(Some("   ")).config_path, None);
        assert_eq!(AgentArgs::parse(Some("config=")).config_path, None);
        assert_eq!(
            AgentArgs::parse(Some(" /tmp/rules.json ")).config_path,
            Some(PathBuf::from("/tmp/rules.json"))
        );
        assert_eq!(
            AgentArgs::parse(Some("config= /tmp/rules.json")).config_path,
            Some(PathBuf::from("/tmp/rules.json"))
        );
    }

    #[test]
    fn no_args_installs_nothing() {
        let runtime = Runtime::new();
        assert!(premain(None, &runtime).unwrap().is_none());
    }

    #[test]
    fn missing_file_installs_empty_engine() {
        let runtime = Runtime::new();
        let engine = premain(Some("/nonexistent/mock-config.json"), &runtime)
            .unwrap()
            .unwrap();
        assert!(engine.store().is_empty());
    }
}

//! The persisted rule-set file.
//!
//! ```json
//! {
//!   "mockRules":   { "svc.Store.getCount": { "returnValue": "5", "returnType": "int" } },
//!   "mockMethods": [ { "className": "svc.Store", "methodName": "getCount", "signature": "()",
//!                      "returnValue": "5", "returnType": "int" } ]
//! }
//! ```
//!
//! Both keys are optional. Field names are shared with the tooling that
//! writes the file and must not change.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    rules::{MockMethodSpec, MockRule},
    Error, Result,
};

/// Directory under the system temp dir where the default rule set lives.
pub const DEFAULT_DIR_NAME: &str = "mock-runner";

/// File name of the default rule set.
pub const DEFAULT_FILE_NAME: &str = "mock-config.json";

/// On-disk form of a rule set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSetFile {
    /// Flat rules keyed by `class.method`
    #[serde(default)]
    pub mock_rules: BTreeMap<String, MockRule>,
    /// The method specs the rules were derived from
    #[serde(default)]
    pub mock_methods: Vec<MockMethodSpec>,
}

impl RuleSetFile {
    /// Reads and parses a rule-set file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigLoad`] if the file cannot be read or is not a valid rule set.
    pub fn read(path: impl AsRef<Path>) -> Result<RuleSetFile> {
        let path = path.as_ref();
        let load_error = |message: String| Error::ConfigLoad {
            path: path.to_path_buf(),
            message,
        };

        let text = fs::read_to_string(path).map_err(|e| load_error(e.to_string()))?;
        Self::from_json_str(&text).map_err(|e| load_error(e.to_string()))
    }

    /// Parses a rule set from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for invalid JSON or a mismatched shape.
    pub fn from_json_str(text: &str) -> Result<RuleSetFile> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the rule set as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileError`] on I/O failure.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// `<tmp>/mock-runner/mock-config.json`.
    #[must_use]
    pub fn default_location() -> PathBuf {
        std::env::temp_dir()
            .join(DEFAULT_DIR_NAME)
            .join(DEFAULT_FILE_NAME)
    }

    /// Returns `true` if neither rules nor specs are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mock_rules.is_empty() && self.mock_methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_keys_optional() {
        let file = RuleSetFile::from_json_str("{}").unwrap();
        assert!(file.is_empty());

        let file = RuleSetFile::from_json_str(r#"{"mockMethods": []}"#).unwrap();
        assert!(file.mock_rules.is_empty());
    }

    #[test]
    fn malformed_is_error() {
        assert!(RuleSetFile::from_json_str("{not json").is_err());
        assert!(RuleSetFile::from_json_str(r#"{"mockRules": []}"#).is_err());
    }

    #[test]
    fn read_reports_path() {
        let missing = std::env::temp_dir().join("mockrunner-does-not-exist.json");
        match RuleSetFile::read(&missing) {
            Err(Error::ConfigLoad { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ConfigLoad, got {other:?}"),
        }
    }

    #[test]
    fn default_location_is_under_temp() {
        let path = RuleSetFile::default_location();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("mock-runner/mock-config.json"));
    }
}

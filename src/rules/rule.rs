//! Mock rules, method specs and owner keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::Display;

use crate::{
    exception::{DEFAULT_EXCEPTION_MESSAGE, RUNTIME_EXCEPTION},
    rules::infer_return_type,
    Error, Result,
};

fn default_true() -> bool {
    true
}

fn default_exception_type() -> String {
    RUNTIME_EXCEPTION.to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_exception_message() -> Option<String> {
    Some(DEFAULT_EXCEPTION_MESSAGE.to_string())
}

fn nullable_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_exception_type<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_exception_type))
}

/// Which path a rule takes when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum RuleMode {
    /// Substitute the coerced return value
    #[strum(to_string = "return")]
    Return,
    /// Raise the synthesized exception
    #[strum(to_string = "throw")]
    Throw,
}

/// The engine-facing form of a mock: what one `(class, method)` pair does.
///
/// `enabled` and `throw_exception` are read on every intercepted call, so
/// editing them in a live [`crate::rules::RuleStore`] changes behavior on the
/// next call without reloading any class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockRule {
    /// The mock value as text; `None` yields `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<String>,
    /// Textual return-type descriptor; empty means "infer from the value"
    #[serde(default, deserialize_with = "nullable_string")]
    pub return_type: String,
    /// Whether the rule applies at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Raise an exception instead of returning a value
    #[serde(default)]
    pub throw_exception: bool,
    /// Exception type for the throw path
    #[serde(
        default = "default_exception_type",
        deserialize_with = "nullable_exception_type"
    )]
    pub exception_type: String,
    /// Exception message for the throw path
    #[serde(default = "default_exception_message")]
    pub exception_message: Option<String>,
}

impl Default for MockRule {
    fn default() -> Self {
        Self {
            return_value: None,
            return_type: String::new(),
            enabled: true,
            throw_exception: false,
            exception_type: default_exception_type(),
            exception_message: default_exception_message(),
        }
    }
}

impl MockRule {
    /// A rule returning `value` as `return_type`.
    #[must_use]
    pub fn returning(value: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            return_value: Some(value.into()),
            return_type: return_type.into(),
            ..Self::default()
        }
    }

    /// A rule throwing `exception_type` with `message`.
    #[must_use]
    pub fn throwing(exception_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            throw_exception: true,
            exception_type: exception_type.into(),
            exception_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets `enabled`.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The active path of this rule.
    #[must_use]
    pub fn mode(&self) -> RuleMode {
        if self.throw_exception {
            RuleMode::Throw
        } else {
            RuleMode::Return
        }
    }

    /// The declared return type, or the type inferred from the value when none is declared.
    #[must_use]
    pub fn effective_return_type(&self) -> &str {
        if self.return_type.trim().is_empty() {
            infer_return_type(self.return_value.as_deref())
        } else {
            &self.return_type
        }
    }
}

/// The user-facing record a rule is derived from.
///
/// Adds the parameter signature, which only serves display and
/// deduplication: all overloads of a method share one rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockMethodSpec {
    /// Fully qualified declaring class
    pub class_name: String,
    /// Method name
    pub method_name: String,
    /// Parameter list as displayed, e.g. `(int, java.lang.String)`
    #[serde(default, deserialize_with = "nullable_string")]
    pub signature: String,
    /// See [`MockRule::return_value`]
    #[serde(default)]
    pub return_value: Option<String>,
    /// See [`MockRule::return_type`]
    #[serde(default, deserialize_with = "nullable_string")]
    pub return_type: String,
    /// See [`MockRule::enabled`]
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// See [`MockRule::throw_exception`]
    #[serde(default)]
    pub throw_exception: bool,
    /// See [`MockRule::exception_type`]
    #[serde(
        default = "default_exception_type",
        deserialize_with = "nullable_exception_type"
    )]
    pub exception_type: String,
    /// See [`MockRule::exception_message`]
    #[serde(default = "default_exception_message")]
    pub exception_message: Option<String>,
}

impl MockMethodSpec {
    /// A spec for `class_name.method_name` with no signature and rule defaults.
    #[must_use]
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        let rule = MockRule::default();
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            signature: String::new(),
            return_value: rule.return_value,
            return_type: rule.return_type,
            enabled: rule.enabled,
            throw_exception: rule.throw_exception,
            exception_type: rule.exception_type,
            exception_message: rule.exception_message,
        }
    }

    /// Sets the display signature.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Sets the return path.
    #[must_use]
    pub fn returning(mut self, value: impl Into<String>, return_type: impl Into<String>) -> Self {
        self.return_value = Some(value.into());
        self.return_type = return_type.into();
        self.throw_exception = false;
        self
    }

    /// Sets the throw path.
    #[must_use]
    pub fn throwing(
        mut self,
        exception_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.throw_exception = true;
        self.exception_type = exception_type.into();
        self.exception_message = Some(message.into());
        self
    }

    /// Sets `enabled`.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Derives the rule, inferring the return type if none is declared.
    #[must_use]
    pub fn to_rule(&self) -> MockRule {
        let return_type = if self.return_type.trim().is_empty() {
            infer_return_type(self.return_value.as_deref()).to_string()
        } else {
            self.return_type.clone()
        };

        MockRule {
            return_value: self.return_value.clone(),
            return_type,
            enabled: self.enabled,
            throw_exception: self.throw_exception,
            exception_type: self.exception_type.clone(),
            exception_message: self.exception_message.clone(),
        }
    }

    /// Deduplication identity: class, method and signature.
    #[must_use]
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.class_name, &self.method_name, &self.signature)
    }

    /// The `(class, method)` key of the derived rule.
    #[must_use]
    pub fn owner_key(&self) -> OwnerKey {
        OwnerKey::new(&self.class_name, &self.method_name)
    }

    /// `class.method` followed by the signature.
    #[must_use]
    pub fn full_method_name(&self) -> String {
        format!("{}.{}{}", self.class_name, self.method_name, self.signature)
    }
}

/// Identifies the method a rule applies to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerKey {
    /// Fully qualified declaring class
    pub class_name: String,
    /// Method name
    pub method_name: String,
}

impl OwnerKey {
    /// Creates a key.
    #[must_use]
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
        }
    }

    /// Parses `class.method`, splitting at the last `.`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOwnerKey`] if there is no `.` or either side is empty.
    pub fn parse(key: &str) -> Result<OwnerKey> {
        match key.rsplit_once('.') {
            Some((class_name, method_name))
                if !class_name.is_empty() && !method_name.is_empty() =>
            {
                Ok(OwnerKey::new(class_name, method_name))
            }
            _ => Err(Error::InvalidOwnerKey(key.to_string())),
        }
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class_name, self.method_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_defaults_from_json() {
        let rule: MockRule = serde_json::from_str(r#"{"returnValue": "5"}"#).unwrap();
        assert_eq!(rule.return_value.as_deref(), Some("5"));
        assert_eq!(rule.return_type, "");
        assert!(rule.enabled);
        assert!(!rule.throw_exception);
        assert_eq!(rule.exception_type, "java.lang.RuntimeException");
        assert_eq!(rule.exception_message.as_deref(), Some("Mocked exception"));
        assert_eq!(rule.mode(), RuleMode::Return);
        assert_eq!(rule.effective_return_type(), "int");
    }

    #[test]
    fn rule_tolerates_nulls() {
        let rule: MockRule = serde_json::from_str(
            r#"{"returnValue": null, "returnType": null,
                "exceptionType": null, "exceptionMessage": null}"#,
        )
        .unwrap();
        assert_eq!(rule.return_value, None);
        assert_eq!(rule.return_type, "");
        assert_eq!(rule.exception_type, "java.lang.RuntimeException");
        assert_eq!(rule.exception_message, None);
    }

    #[test]
    fn rule_serializes_camel_case() {
        let rule = MockRule::throwing("java.lang.IllegalStateException", "bad");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["throwException"], true);
        assert_eq!(json["exceptionType"], "java.lang.IllegalStateException");
        assert!(json.get("returnValue").is_none());
        assert_eq!(rule.mode().to_string(), "throw");
    }

    #[test]
    fn spec_derives_rule() {
        let spec = MockMethodSpec::new("svc.Store", "getCount")
            .with_signature("()")
            .returning("5", "");
        let rule = spec.to_rule();
        assert_eq!(rule.return_type, "int");
        assert_eq!(rule.return_value.as_deref(), Some("5"));
        assert_eq!(spec.full_method_name(), "svc.Store.getCount()");
        assert_eq!(spec.identity(), ("svc.Store", "getCount", "()"));
        assert_eq!(spec.owner_key(), OwnerKey::new("svc.Store", "getCount"));
    }

    #[test]
    fn spec_wire_format() {
        let spec: MockMethodSpec = serde_json::from_str(
            r#"{"className": "svc.Api", "methodName": "list", "signature": "(int)",
                "returnValue": "[]", "returnType": "List<svc.Item>", "enabled": false}"#,
        )
        .unwrap();
        assert_eq!(spec.class_name, "svc.Api");
        assert!(!spec.enabled);
        assert!(!spec.to_rule().enabled);
    }

    #[test]
    fn owner_key_splits_at_last_dot() {
        let key = OwnerKey::parse("com.acme.svc.Store.getCount").unwrap();
        assert_eq!(key.class_name, "com.acme.svc.Store");
        assert_eq!(key.method_name, "getCount");
        assert_eq!(key.to_string(), "com.acme.svc.Store.getCount");

        assert!(OwnerKey::parse("noDot").is_err());
        assert!(OwnerKey::parse("trailing.").is_err());
        assert!(OwnerKey::parse(".leading").is_err());
    }
}

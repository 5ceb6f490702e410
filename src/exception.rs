//! Synthesis of exceptions named by mock rules.
//!
//! A rule in exception mode names an exception type and a message. The
//! synthesizer resolves that name and checks that an instance could actually
//! be constructed with a single message argument. When it cannot, the caller
//! still gets a [`Throwable`]: a generic `java.lang.RuntimeException` carrying
//! the same message, which records the originally requested type. Synthesis
//! itself therefore never fails.
//!
//! # Construction Requirements
//!
//! A requested type is used as-is only if it:
//! - resolves through the [`TypeRegistry`]
//! - descends from `java.lang.Exception`
//! - is neither abstract nor an interface
//! - declares a constructor taking a single string
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::exception::ExceptionSynthesizer;
//! use mockrunner::typesystem::ClassRegistry;
//!
//! let registry = ClassRegistry::with_builtins();
//! let synthesizer = ExceptionSynthesizer::new(&registry);
//!
//! let thrown = synthesizer.synthesize("java.lang.IllegalArgumentException", Some("boom"));
//! assert_eq!(thrown.type_name, "java.lang.IllegalArgumentException");
//! assert_eq!(thrown.message.as_deref(), Some("boom"));
//!
//! let fallback = synthesizer.synthesize("com.acme.Unknown", Some("boom"));
//! assert_eq!(fallback.type_name, "java.lang.RuntimeException");
//! assert_eq!(fallback.requested_type.as_deref(), Some("com.acme.Unknown"));
//! ```

use std::fmt;

use log::warn;

use crate::{
    typesystem::{TypeLookup, TypeRegistry},
    Error, Result,
};

/// The generic runtime exception used as fallback.
pub const RUNTIME_EXCEPTION: &str = "java.lang.RuntimeException";

/// Every synthesized exception type must descend from this type.
pub const BASE_EXCEPTION: &str = "java.lang.Exception";

/// Message used when a rule does not specify one.
pub const DEFAULT_EXCEPTION_MESSAGE: &str = "Mocked exception";

/// An exception raised at a call site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Throwable {
    /// Fully qualified type of the raised exception
    pub type_name: String,
    /// The detail message
    pub message: Option<String>,
    /// The type the rule asked for, when a fallback was substituted
    pub requested_type: Option<String>,
}

impl Throwable {
    /// Creates an exception of the given type.
    #[must_use]
    pub fn new(type_name: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.map(str::to_string),
            requested_type: None,
        }
    }

    /// Returns `true` if this is a fallback for a type that could not be constructed.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.requested_type.is_some()
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.type_name, message)?,
            None => write!(f, "{}", self.type_name)?,
        }
        if let Some(requested) = &self.requested_type {
            write!(f, " (requested {requested})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Throwable {}

impl From<Throwable> for Error {
    fn from(value: Throwable) -> Self {
        Error::Thrown(value)
    }
}

/// Builds [`Throwable`]s from rule data against a type registry.
pub struct ExceptionSynthesizer<'a> {
    registry: &'a dyn TypeRegistry,
}

impl<'a> ExceptionSynthesizer<'a> {
    /// Creates a synthesizer resolving names through `registry`.
    #[must_use]
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self { registry }
    }

    /// Constructs the requested exception, or explains why it cannot be.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExceptionSynthesis`] if the type fails any of the
    /// construction requirements.
    pub fn try_synthesize(&self, type_name: &str, message: Option<&str>) -> Result<Throwable> {
        let fail = |reason: &str| Error::ExceptionSynthesis {
            type_name: type_name.to_string(),
            reason: reason.to_string(),
        };

        let TypeLookup::Resolved(def) = self.registry.resolve(type_name) else {
            return Err(fail("type not found"));
        };
        if !self.registry.is_subtype_of(type_name, BASE_EXCEPTION)? {
            return Err(fail("not a subtype of java.lang.Exception"));
        }
        if !def.is_instantiable() {
            return Err(fail("abstract type or interface"));
        }
        if !def.string_constructor {
            return Err(fail("no constructor taking a single string"));
        }

        Ok(Throwable::new(def.name.clone(), message))
    }

    /// Constructs the requested exception, falling back to a generic runtime
    /// exception with the same message.
    #[must_use]
    pub fn synthesize(&self, type_name: &str, message: Option<&str>) -> Throwable {
        match self.try_synthesize(type_name, message) {
            Ok(throwable) => throwable,
            Err(e) => {
                warn!("{e}, throwing {RUNTIME_EXCEPTION} instead");
                Throwable {
                    requested_type: Some(type_name.to_string()),
                    ..Throwable::new(RUNTIME_EXCEPTION, message)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixture_registry;

    #[test]
    fn synthesizes_builtin_and_custom() {
        let registry = fixture_registry();
        let synthesizer = ExceptionSynthesizer::new(&registry);

        let thrown = synthesizer.synthesize("java.lang.IllegalArgumentException", Some("boom"));
        assert_eq!(thrown, Throwable::new("java.lang.IllegalArgumentException", Some("boom")));
        assert!(!thrown.is_fallback());

        let custom = synthesizer.synthesize("svc.QuotaExceededException", None);
        assert_eq!(custom.type_name, "svc.QuotaExceededException");
        assert_eq!(custom.message, None);
    }

    #[test]
    fn falls_back_for_unusable_types() {
        let registry = fixture_registry();
        let synthesizer = ExceptionSynthesizer::new(&registry);

        for requested in [
            "com.acme.Unknown",
            "java.lang.Error",
            "svc.Item",
            "svc.AbstractFailure",
            "java.io.UncheckedIOException",
        ] {
            let thrown = synthesizer.synthesize(requested, Some("msg"));
            assert_eq!(thrown.type_name, RUNTIME_EXCEPTION, "{requested}");
            assert_eq!(thrown.message.as_deref(), Some("msg"));
            assert_eq!(thrown.requested_type.as_deref(), Some(requested));
        }
    }

    #[test]
    fn try_synthesize_reports_reason() {
        let registry = fixture_registry();
        let synthesizer = ExceptionSynthesizer::new(&registry);

        let err = synthesizer.try_synthesize("java.lang.Error", None).unwrap_err();
        assert!(matches!(
            err,
            Error::ExceptionSynthesis { reason, .. } if reason.contains("Exception")
        ));
    }

    #[test]
    fn display() {
        let thrown = Throwable::new("java.lang.IllegalStateException", Some("bad"));
        assert_eq!(thrown.to_string(), "java.lang.IllegalStateException: bad");

        let fallback = Throwable {
            requested_type: Some("x.Y".into()),
            ..Throwable::new(RUNTIME_EXCEPTION, None)
        };
        assert_eq!(fallback.to_string(), "java.lang.RuntimeException (requested x.Y)");
    }
}

//! Core types for method interception.
//!
//! - [`InterceptionStrategy`]: what happens when no rule answers a call
//! - [`CallContext`]: information about the call being intercepted
//! - [`Decision`]: why an intercepted call behaved as it did
//! - [`FallbackReason`]: why a rule did not answer

use std::fmt;

use strum::Display;

use crate::value::Value;

/// How an intercepted method behaves when no enabled rule produces a result.
///
/// | Strategy | Original available | No rule / disabled / coercion failure |
/// |----------|--------------------|---------------------------------------|
/// | [`Concrete`](Self::Concrete) | yes | call the original |
/// | [`Interface`](Self::Interface) | no | fail with [`crate::Error::NoMockConfigured`] |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum InterceptionStrategy {
    /// The method has a body to fall through to.
    #[strum(to_string = "concrete")]
    Concrete,
    /// The method has no body (interface or abstract method).
    #[strum(to_string = "interface")]
    Interface,
}

/// Context passed to an interceptor for one call.
///
/// Borrows the call data from the host for the duration of the interception.
///
/// # Examples
///
/// ```rust
/// use mockrunner::intercept::CallContext;
/// use mockrunner::Value;
///
/// let args = [Value::Int(3)];
/// let ctx = CallContext::new("svc.Store", "get").with_args(&args);
/// assert_eq!(ctx.args.len(), 1);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct CallContext<'a> {
    /// Declaring class of the called method.
    pub class_name: &'a str,

    /// Name of the called method.
    pub method_name: &'a str,

    /// Call arguments, in declaration order.
    pub args: &'a [Value],
}

impl<'a> CallContext<'a> {
    /// Creates a context without arguments.
    #[must_use]
    pub fn new(class_name: &'a str, method_name: &'a str) -> Self {
        Self {
            class_name,
            method_name,
            args: &[],
        }
    }

    /// Sets the call arguments.
    #[must_use]
    pub fn with_args(mut self, args: &'a [Value]) -> Self {
        self.args = args;
        self
    }
}

/// Why a rule did not produce the result of a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum FallbackReason {
    /// No rule exists for the method.
    #[strum(to_string = "no rule")]
    NoRule,
    /// The rule exists but is disabled.
    #[strum(to_string = "rule disabled")]
    Disabled,
    /// The rule's value could not be coerced to its return type.
    #[strum(to_string = "coercion failed")]
    CoercionFailed,
}

/// The outcome category of one intercepted call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The coerced mock value was returned; the original did not run.
    Mocked,
    /// A synthesized exception was raised.
    Thrown {
        /// The type actually raised (after any fallback)
        type_name: String,
    },
    /// The original implementation ran.
    CalledOriginal {
        /// Why the rule did not answer
        reason: FallbackReason,
    },
    /// An interface method had no usable rule.
    NoMockConfigured {
        /// Why the rule did not answer
        reason: FallbackReason,
    },
}

impl Decision {
    /// Returns `true` if the original implementation did not run.
    #[must_use]
    pub fn is_intercepted(&self) -> bool {
        matches!(self, Decision::Mocked | Decision::Thrown { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Mocked => write!(f, "mocked"),
            Decision::Thrown { type_name } => write!(f, "threw {type_name}"),
            Decision::CalledOriginal { reason } => write!(f, "called original ({reason})"),
            Decision::NoMockConfigured { reason } => write!(f, "no mock configured ({reason})"),
        }
    }
}

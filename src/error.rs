use std::path::PathBuf;

use thiserror::Error;

use crate::{coercion::CoercionError, exception::Throwable};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most of these never reach the code calling an intercepted method. Rule-set and coercion
/// failures are recovered inside the engine; only [`Error::Thrown`] (a synthesized exception)
/// and [`Error::NoMockConfigured`] are deliberately surfaced at the call site.
///
/// # Error Categories
///
/// ## Rule-set Errors
/// - [`Error::ConfigLoad`] - The rule-set file could not be read or parsed
/// - [`Error::InvalidOwnerKey`] - A flat rule key is not of the form `class.method`
/// - [`Error::Malformed`] - Structurally invalid input with source location
///
/// ## Call-site Errors
/// - [`Error::Thrown`] - A synthesized exception raised by a mock rule or a method body
/// - [`Error::NoMockConfigured`] - Interface method called without an enabled rule
/// - [`Error::AbstractMethod`] - A bodiless method was invoked without interception
///
/// ## Engine Errors
/// - [`Error::Coercion`] - A mock value could not be shaped into its declared type
/// - [`Error::ExceptionSynthesis`] - A named exception type could not be constructed
/// - [`Error::ClassNotFound`] / [`Error::MethodNotFound`] - Host lookups
/// - [`Error::RecursionLimit`] - Maximum recursion depth exceeded
/// - [`Error::LockError`] - Thread synchronization failure
///
/// # Examples
///
/// ```rust,no_run
/// use mockrunner::{Error, rules::RuleStore};
///
/// match RuleStore::from_file("mock-config.json") {
///     Ok(store) => println!("{} rules", store.len()),
///     Err(Error::ConfigLoad { path, message }) => {
///         eprintln!("Could not load {}: {}", path.display(), message);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be interpreted.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// File I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// The rule-set file is missing or malformed.
    ///
    /// Bootstrap recovers from this locally by continuing with an empty rule store.
    #[error("Failed to load rule set from {path}: {message}")]
    ConfigLoad {
        /// Path of the rule-set file
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// A flat rule key could not be split into class and method.
    #[error("Invalid rule key '{0}', expected '<class>.<method>'")]
    InvalidOwnerKey(String),

    /// The mock value could not be coerced into the declared return type.
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    /// The named exception type could not be constructed.
    ///
    /// The exception synthesizer never returns this to a call site; it substitutes a generic
    /// runtime exception instead. It is exposed for diagnostics via
    /// [`crate::exception::ExceptionSynthesizer::try_synthesize`].
    #[error("Cannot synthesize exception '{type_name}': {reason}")]
    ExceptionSynthesis {
        /// The requested exception type
        type_name: String,
        /// Why construction failed
        reason: String,
    },

    /// An exception raised at a call site, either synthesized by a mock rule or thrown by an
    /// original method body.
    #[error("{0}")]
    Thrown(Throwable),

    /// An interface method was intercepted but no enabled rule could answer the call.
    ///
    /// Interfaces have no original implementation to fall back to; returning a default value
    /// would hide a missing mock behind plausible-looking output.
    #[error("No mock configured for interface method: {class_name}.{method_name}")]
    NoMockConfigured {
        /// Declaring class of the called method
        class_name: String,
        /// Name of the called method
        method_name: String,
    },

    /// A method without a body was invoked and nothing intercepted it.
    #[error("Abstract method invoked without interception: {class_name}.{method_name}")]
    AbstractMethod {
        /// Declaring class of the called method
        class_name: String,
        /// Name of the called method
        method_name: String,
    },

    /// The host has no definition for the named class.
    #[error("Class not found - {0}")]
    ClassNotFound(String),

    /// The class does not declare the named method.
    #[error("Method not found - {class_name}.{method_name}")]
    MethodNotFound {
        /// The class that was searched
        class_name: String,
        /// The missing method name
        method_name: String,
    },

    /// Recursion limit reached.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Failed to lock target.
    #[error("Failed to lock target")]
    LockError,
}

impl Error {
    /// Returns the synthesized exception if this error carries one.
    #[must_use]
    pub fn as_thrown(&self) -> Option<&Throwable> {
        match self {
            Error::Thrown(throwable) => Some(throwable),
            _ => None,
        }
    }

    /// Returns `true` for [`Error::NoMockConfigured`].
    #[must_use]
    pub fn is_no_mock_configured(&self) -> bool {
        matches!(self, Error::NoMockConfigured { .. })
    }
}

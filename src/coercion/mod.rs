//! Value coercion: turning loosely typed mock text into runtime values.
//!
//! A rule stores its mock value as text and its return type as a textual
//! descriptor. [`coerce`] shapes the former into the latter, following a fixed
//! policy:
//!
//! 1. absent text yields [`Value::Null`]
//! 2. `void` yields [`Value::Null`]
//! 3. primitive and boxed descriptors parse the text strictly (see [`primitive`])
//! 4. text starting with `[` or `{` is parsed as JSON and shaped structurally
//!    against the descriptor (see [`structured`]); unresolvable element or
//!    object types degrade to untyped values
//! 5. anything else passes through as the original text
//!
//! Failure at any step is a [`CoercionError`]. The interception dispatcher
//! treats that as "no usable mock" and falls back, so a bad mock value never
//! crashes a call site.
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::coercion::coerce;
//! use mockrunner::typesystem::ClassRegistry;
//! use mockrunner::Value;
//!
//! let registry = ClassRegistry::with_builtins();
//!
//! assert_eq!(coerce(Some("5"), "int", &registry)?, Value::Int(5));
//! assert_eq!(coerce(Some("[]"), "List<svc.Missing>", &registry)?, Value::List(vec![]));
//! assert!(coerce(Some("five"), "int", &registry).is_err());
//! # Ok::<(), mockrunner::coercion::CoercionError>(())
//! ```

pub mod primitive;
pub mod sample;
pub mod structured;

use thiserror::Error;

use crate::{
    rules::infer_return_type,
    typesystem::{TypeDescriptor, TypeRegistry},
    value::Value,
};

pub use sample::sample_value;
pub use structured::StructuredCoercer;

/// Maximum nesting depth of a structured mock value.
pub const MAX_COERCION_DEPTH: usize = 64;

/// Result type for coercion operations.
pub type CoercionResult<T> = std::result::Result<T, CoercionError>;

/// Why a mock value could not be shaped into its declared type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The return-type descriptor itself could not be parsed.
    #[error("Invalid type descriptor '{0}'")]
    InvalidDescriptor(String),

    /// The text is not a valid literal of the primitive target.
    #[error("Cannot parse '{text}' as {target}")]
    PrimitiveParse {
        /// The offending text
        text: String,
        /// The primitive target type
        target: String,
    },

    /// The text looked structured but is not valid JSON.
    #[error("Malformed JSON mock value: {0}")]
    MalformedJson(String),

    /// A JSON value does not fit the type expected at this position.
    #[error("Expected {expected} at {path}, found {found}")]
    ShapeMismatch {
        /// JSON path of the offending value, e.g. `$[0].id`
        path: String,
        /// The expected type
        expected: String,
        /// What was found instead
        found: String,
    },

    /// The resolved type is an interface or abstract.
    #[error("Type '{0}' cannot be instantiated")]
    NotInstantiable(String),

    /// The value nests deeper than [`MAX_COERCION_DEPTH`].
    #[error("Mock value nests deeper than {0} levels")]
    DepthExceeded(usize),
}

/// Coerces mock text into a value of the type named by `descriptor`.
///
/// An empty descriptor is inferred from the text (see
/// [`crate::rules::infer_return_type`]).
///
/// # Errors
///
/// Returns [`CoercionError`] if the descriptor cannot be parsed or the text
/// cannot be shaped into it.
pub fn coerce(
    text: Option<&str>,
    descriptor: &str,
    registry: &dyn TypeRegistry,
) -> CoercionResult<Value> {
    let Some(text) = text else {
        return Ok(Value::Null);
    };

    let descriptor = if descriptor.trim().is_empty() {
        infer_return_type(Some(text))
    } else {
        descriptor
    };

    let parsed = TypeDescriptor::parse(descriptor)
        .map_err(|_| CoercionError::InvalidDescriptor(descriptor.to_string()))?;
    coerce_with(Some(text), &parsed, registry)
}

/// Coerces mock text into a value of an already parsed descriptor.
///
/// # Errors
///
/// Returns [`CoercionError`] if the text cannot be shaped into the descriptor.
pub fn coerce_with(
    text: Option<&str>,
    descriptor: &TypeDescriptor,
    registry: &dyn TypeRegistry,
) -> CoercionResult<Value> {
    let Some(text) = text else {
        return Ok(Value::Null);
    };

    match descriptor {
        TypeDescriptor::Void => Ok(Value::Null),
        TypeDescriptor::Primitive { kind, .. } => primitive::parse(text, *kind),
        _ if is_structured(text) => {
            let json: serde_json::Value = serde_json::from_str(text)
                .map_err(|e| CoercionError::MalformedJson(e.to_string()))?;
            StructuredCoercer::new(registry).coerce(&json, descriptor)
        }
        _ => Ok(Value::Str(text.to_string())),
    }
}

/// Returns `true` if the text looks like a JSON array or object.
#[must_use]
pub fn is_structured(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('[') || trimmed.starts_with('{')
}

//! # mockrunner Prelude
//!
//! Commonly used types for embedding the mocking engine. Import with
//! `use mockrunner::prelude::*;`.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all mockrunner operations
pub use crate::Error;

/// The result type used throughout mockrunner
pub use crate::Result;

/// Runtime values
pub use crate::{Object, Value};

// ================================================================================================
// Rules
// ================================================================================================

/// Rule records, the rule-set file and the live store
pub use crate::rules::{MockMethodSpec, MockRule, OwnerKey, RuleMode, RuleSetFile, RuleStore};

// ================================================================================================
// Interception
// ================================================================================================

/// Engine, interceptors and decisions
pub use crate::intercept::{
    CallContext, ClassTransformationSelector, Decision, FallbackReason, InterceptionStrategy,
    Interceptor, MockEngine, StatsSnapshot,
};

// ================================================================================================
// Coercion, Exceptions and Types
// ================================================================================================

/// Value coercion
pub use crate::coercion::{coerce, sample_value, CoercionError};

/// Exception synthesis
pub use crate::exception::{ExceptionSynthesizer, Throwable};

/// Type system
pub use crate::typesystem::{ClassRegistry, TypeDef, TypeDescriptor, TypeLookup, TypeRegistry};

// ================================================================================================
// Host
// ================================================================================================

/// Classes, methods and the loading host
pub use crate::runtime::{ClassDef, ClassTransformer, MethodDef, Runtime};

/// Start-up arguments
pub use crate::bootstrap::AgentArgs;

//! Per-call decision logic for intercepted methods.
//!
//! # Decision Flow
//!
//! ```text
//! Intercepted call
//!         │
//!         ▼
//! ┌───────────────────┐
//! │  Look up rule     │───► none / disabled ───► strategy fallback
//! └───────────────────┘
//!         │ enabled
//!         ▼
//! ┌───────────────────┐
//! │  throwException?  │───► yes ───► synthesize and raise
//! └───────────────────┘
//!         │ no
//!         ▼
//! ┌───────────────────┐
//! │  Coerce value     │───► error ───► strategy fallback
//! └───────────────────┘
//!         │ ok
//!         ▼
//!   Return mock value
//! ```
//!
//! The strategy fallback calls the original for [`InterceptionStrategy::Concrete`]
//! and fails with [`Error::NoMockConfigured`] for
//! [`InterceptionStrategy::Interface`].

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    intercept::{CallContext, Decision, FallbackReason, InterceptionStrategy, MockEngine},
    runtime::MethodFn,
    value::Value,
    Error, Result,
};

/// The interception attached to one method.
///
/// Holds the owner key it was attached for and reads the rule from the
/// engine's live store on every call, so edits to `enabled` or
/// `throw_exception` take effect on the next call.
pub struct Interceptor {
    engine: Arc<MockEngine>,
    class_name: String,
    method_name: String,
    strategy: InterceptionStrategy,
}

impl Interceptor {
    /// Creates an interceptor for `class_name.method_name`.
    #[must_use]
    pub fn new(
        engine: Arc<MockEngine>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        strategy: InterceptionStrategy,
    ) -> Self {
        Self {
            engine,
            class_name: class_name.into(),
            method_name: method_name.into(),
            strategy,
        }
    }

    /// The declaring class this interceptor was attached to.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The method this interceptor was attached to.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The fallback strategy.
    #[must_use]
    pub fn strategy(&self) -> InterceptionStrategy {
        self.strategy
    }

    /// Runs one intercepted call and reports how it was answered.
    ///
    /// `original` is the method body to fall through to. It is ignored for
    /// the interface strategy, and its absence under the concrete strategy is
    /// treated like the interface strategy.
    ///
    /// A synthesized exception comes back as [`Error::Thrown`]; an error
    /// returned by `original` is passed through unchanged.
    pub fn dispatch(
        &self,
        ctx: &CallContext<'_>,
        original: Option<&MethodFn>,
    ) -> (Decision, Result<Value>) {
        let outcome = self.decide(ctx, original);
        self.engine.record(&outcome.0);
        outcome
    }

    /// Runs one intercepted call, discarding the decision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Thrown`] for synthesized exceptions,
    /// [`Error::NoMockConfigured`] for interface methods without a usable rule,
    /// and whatever `original` returns when it runs.
    pub fn intercept(&self, ctx: &CallContext<'_>, original: Option<&MethodFn>) -> Result<Value> {
        self.dispatch(ctx, original).1
    }

    fn decide(
        &self,
        ctx: &CallContext<'_>,
        original: Option<&MethodFn>,
    ) -> (Decision, Result<Value>) {
        let Some(rule) = self.engine.store().lookup(&self.class_name, &self.method_name) else {
            return self.fall_back(ctx, original, FallbackReason::NoRule);
        };
        if !rule.enabled {
            return self.fall_back(ctx, original, FallbackReason::Disabled);
        }

        if rule.throw_exception {
            let throwable = self.engine.synthesize(&rule);
            info!(
                "Throwing {} from {}.{}",
                throwable, self.class_name, self.method_name
            );
            return (
                Decision::Thrown {
                    type_name: throwable.type_name.clone(),
                },
                Err(Error::Thrown(throwable)),
            );
        }

        match self.engine.coerce(&rule) {
            Ok(value) => {
                info!(
                    "Mocking {}.{} -> {}",
                    self.class_name, self.method_name, value
                );
                (Decision::Mocked, Ok(value))
            }
            Err(e) => {
                warn!(
                    "Mock value for {}.{} unusable as {}: {}",
                    self.class_name, self.method_name, rule.return_type, e
                );
                self.fall_back(ctx, original, FallbackReason::CoercionFailed)
            }
        }
    }

    fn fall_back(
        &self,
        ctx: &CallContext<'_>,
        original: Option<&MethodFn>,
        reason: FallbackReason,
    ) -> (Decision, Result<Value>) {
        match (self.strategy, original) {
            (InterceptionStrategy::Concrete, Some(original)) => {
                debug!(
                    "Calling original {}.{} ({reason})",
                    ctx.class_name, ctx.method_name
                );
                (Decision::CalledOriginal { reason }, original(ctx.args))
            }
            _ => {
                warn!(
                    "No mock configured for interface method {}.{} ({reason})",
                    self.class_name, self.method_name
                );
                (
                    Decision::NoMockConfigured { reason },
                    Err(Error::NoMockConfigured {
                        class_name: self.class_name.clone(),
                        method_name: self.method_name.clone(),
                    }),
                )
            }
        }
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("class_name", &self.class_name)
            .field("method_name", &self.method_name)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

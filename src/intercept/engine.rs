//! The shared mock engine captured by every installed interceptor.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use serde::Serialize;

use crate::{
    coercion::{coerce, CoercionResult},
    exception::{ExceptionSynthesizer, Throwable},
    intercept::{Decision, FallbackReason},
    rules::{MockRule, RuleStore},
    typesystem::TypeRegistry,
    value::Value,
};

/// Rule store, type registry and decision counters.
///
/// There is no global engine: bootstrap builds one, wraps it in an `Arc` and
/// hands clones to the selector and, through it, to every interceptor.
pub struct MockEngine {
    store: Arc<RuleStore>,
    registry: Arc<dyn TypeRegistry>,
    stats: InterceptionStats,
}

impl MockEngine {
    /// Creates an engine over a rule store and a type registry.
    #[must_use]
    pub fn new(store: Arc<RuleStore>, registry: Arc<dyn TypeRegistry>) -> Self {
        Self {
            store,
            registry,
            stats: InterceptionStats::default(),
        }
    }

    /// The live rule store.
    #[must_use]
    pub fn store(&self) -> &Arc<RuleStore> {
        &self.store
    }

    /// The type registry used for coercion and exception synthesis.
    #[must_use]
    pub fn registry(&self) -> &dyn TypeRegistry {
        self.registry.as_ref()
    }

    /// Coerces the rule's return value to its return type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::coercion::CoercionError`] if the value does not fit.
    pub fn coerce(&self, rule: &MockRule) -> CoercionResult<Value> {
        coerce(
            rule.return_value.as_deref(),
            &rule.return_type,
            self.registry(),
        )
    }

    /// Builds the exception the rule names, falling back to a generic one.
    #[must_use]
    pub fn synthesize(&self, rule: &MockRule) -> Throwable {
        ExceptionSynthesizer::new(self.registry())
            .synthesize(&rule.exception_type, rule.exception_message.as_deref())
    }

    /// A snapshot of the decision counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub(crate) fn record(&self, decision: &Decision) {
        self.stats.record(decision);
    }
}

/// Per-decision counters, updated lock-free from any thread.
#[derive(Debug, Default)]
pub struct InterceptionStats {
    mocked: AtomicU64,
    thrown: AtomicU64,
    called_original: AtomicU64,
    no_mock_configured: AtomicU64,
    coercion_failures: AtomicU64,
}

impl InterceptionStats {
    fn record(&self, decision: &Decision) {
        let (counter, reason) = match decision {
            Decision::Mocked => (&self.mocked, None),
            Decision::Thrown { .. } => (&self.thrown, None),
            Decision::CalledOriginal { reason } => (&self.called_original, Some(*reason)),
            Decision::NoMockConfigured { reason } => (&self.no_mock_configured, Some(*reason)),
        };
        counter.fetch_add(1, Ordering::Relaxed);
        if reason == Some(FallbackReason::CoercionFailed) {
            self.coercion_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Reads all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            mocked: self.mocked.load(Ordering::Relaxed),
            thrown: self.thrown.load(Ordering::Relaxed),
            called_original: self.called_original.load(Ordering::Relaxed),
            no_mock_configured: self.no_mock_configured.load(Ordering::Relaxed),
            coercion_failures: self.coercion_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`InterceptionStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Calls answered with a mock value
    pub mocked: u64,
    /// Calls answered with a synthesized exception
    pub thrown: u64,
    /// Calls that ran the original implementation
    pub called_original: u64,
    /// Interface calls without a usable rule
    pub no_mock_configured: u64,
    /// Calls whose rule value could not be coerced (counted in addition to the fallback)
    pub coercion_failures: u64,
}

impl StatsSnapshot {
    /// Total number of intercepted calls.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.mocked + self.thrown + self.called_original + self.no_mock_configured
    }
}

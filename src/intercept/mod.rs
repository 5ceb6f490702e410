//! Method interception: which methods to instrument and what each call does.
//!
//! # Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Strategies, call context, decisions |
//! | [`engine`] | [`MockEngine`]: rule store, registry and counters shared by all interceptors |
//! | [`dispatcher`] | [`Interceptor`]: the per-call decision logic |
//! | [`selector`] | [`ClassTransformationSelector`]: load-time method selection |
//!
//! # Architecture
//!
//! ```text
//!  class load ──► ClassTransformationSelector ──► Interceptor per method
//!                          │                            │
//!                          └──────── Arc<MockEngine> ◄──┘
//!                                        │
//!                             RuleStore  │  TypeRegistry
//!                                        ▼
//!  method call ──► Interceptor::dispatch ──► mock value / exception / original
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use mockrunner::intercept::{ClassTransformationSelector, MockEngine};
//! use mockrunner::rules::{MockRule, RuleStore};
//! use mockrunner::runtime::{ClassDef, MethodDef, Runtime};
//! use mockrunner::Value;
//!
//! let runtime = Runtime::new();
//! runtime.define(
//!     ClassDef::class("svc.Store")
//!         .with_method(MethodDef::new("getCount", "int", |_| Ok(Value::Int(0)))),
//! );
//!
//! let store = RuleStore::new();
//! store.add_rule("svc.Store", "getCount", MockRule::returning("5", "int"));
//! let engine = Arc::new(MockEngine::new(Arc::new(store), runtime.registry().clone()));
//! runtime.add_transformer(Arc::new(ClassTransformationSelector::new(engine)))?;
//!
//! assert_eq!(runtime.invoke("svc.Store", "getCount", &[])?, Value::Int(5));
//! # Ok::<(), mockrunner::Error>(())
//! ```

pub mod dispatcher;
pub mod engine;
pub mod selector;
pub mod types;

pub use dispatcher::Interceptor;
pub use engine::{InterceptionStats, MockEngine, StatsSnapshot};
pub use selector::ClassTransformationSelector;
pub use types::{CallContext, Decision, FallbackReason, InterceptionStrategy};

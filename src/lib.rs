// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! # mockrunner
//!
//! Runtime method mocking for a managed host. A declarative rule set says which
//! methods to intercept and what each should do instead: return a value given
//! as text (coerced into the method's declared return type) or raise a named
//! exception. Methods without an applicable rule run unmodified.
//!
//! ## Quick Start
//!
//! ```rust
//! use mockrunner::prelude::*;
//! use std::sync::Arc;
//!
//! let runtime = Runtime::new();
//! runtime.define(
//!     ClassDef::class("svc.Store")
//!         .with_method(MethodDef::new("getCount", "int", |_| Ok(Value::Int(0)))),
//! );
//!
//! let store = RuleStore::new();
//! store.add_rule("svc.Store", "getCount", MockRule::returning("5", "int"));
//! mockrunner::bootstrap::install(Arc::new(store), &runtime)?;
//!
//! assert_eq!(runtime.invoke("svc.Store", "getCount", &[])?, Value::Int(5));
//! # Ok::<(), mockrunner::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  rule-set file ──► RuleStore ──► ClassTransformationSelector (once per class load)
//!                        ▲                      │
//!                        │                      ▼
//!                  live lookup ◄──────── Interceptor (every call)
//!                                               │
//!                              coercion / exception synthesis
//! ```
//!
//! - [`rules`] - Rule and spec records, the rule-set file and the live [`rules::RuleStore`]
//! - [`intercept`] - Load-time method selection and the per-call decision logic
//! - [`coercion`] - Turning textual mock values into typed [`Value`]s
//! - [`exception`] - Constructing the exceptions a rule asks for
//! - [`typesystem`] - Type descriptors and the name-based [`typesystem::TypeRegistry`]
//! - [`runtime`] - The in-process host that loads classes and invokes methods
//! - [`bootstrap`] - Start-up argument handling
//!
//! ## Error Handling
//!
//! Almost every failure is recovered inside the engine. A broken rule-set file
//! yields zero rules, an unusable mock value falls back to the original
//! method, and an unknown exception type becomes a generic runtime exception.
//! Only two outcomes reach the caller of an intercepted method:
//!
//! ```rust,no_run
//! use mockrunner::{Error, runtime::Runtime};
//!
//! let runtime = Runtime::new();
//! match runtime.invoke("svc.Api", "list", &[]) {
//!     Ok(value) => println!("{value}"),
//!     Err(Error::Thrown(exception)) => println!("raised {exception}"),
//!     Err(Error::NoMockConfigured { class_name, method_name }) => {
//!         println!("no mock for {class_name}.{method_name}")
//!     }
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use mockrunner::prelude::*;
///
/// let store = RuleStore::new();
/// store.add_rule("svc.Store", "getCount", MockRule::returning("5", "int"));
/// assert!(store.is_mocked("svc.Store", "getCount"));
/// ```
pub mod prelude;

/// Type descriptors, type definitions and name-based resolution.
pub mod typesystem;

/// Runtime values produced by coercion and passed to method bodies.
pub mod value;

/// Conversion of textual mock values into typed [`Value`]s.
///
/// # Examples
///
/// ```rust
/// use mockrunner::{coercion::coerce, typesystem::ClassRegistry, Value};
///
/// let registry = ClassRegistry::with_builtins();
/// assert_eq!(coerce(Some("42"), "int", &registry)?, Value::Int(42));
/// assert_eq!(coerce(Some("[]"), "List<svc.Item>", &registry)?, Value::List(vec![]));
/// # Ok::<(), mockrunner::coercion::CoercionError>(())
/// ```
pub mod coercion;

/// Exception values and their synthesis from a type name.
pub mod exception;

/// Mock rules, method specs, the rule-set file and the live rule store.
pub mod rules;

/// Method interception.
pub mod intercept;

/// The in-process host: classes, methods, loading and invocation.
pub mod runtime;

/// Start-up argument handling and selector installation.
pub mod bootstrap;

/// `mockrunner` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `mockrunner` Error type
///
/// The main error type for all operations in this crate. Only [`Error::Thrown`] and
/// [`Error::NoMockConfigured`] are meant to reach the caller of an intercepted method.
pub use error::Error;

pub use value::{Object, Value};

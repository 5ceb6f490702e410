//! Mock rules and the store that serves them.
//!
//! - [`MockRule`] - what one `(class, method)` pair does when called
//! - [`MockMethodSpec`] - the user-facing record a rule is derived from
//! - [`OwnerKey`] - the `(class, method)` pair itself
//! - [`RuleStore`] - the live, concurrently readable rule table
//! - [`RuleSetFile`] - the persisted JSON form
//!
//! Overloads of a method share one rule: the key carries no parameter list.

mod file;
mod infer;
mod rule;
mod store;

pub use file::{RuleSetFile, DEFAULT_DIR_NAME, DEFAULT_FILE_NAME};
pub use infer::infer_return_type;
pub use rule::{MockMethodSpec, MockRule, OwnerKey, RuleMode};
pub use store::RuleStore;

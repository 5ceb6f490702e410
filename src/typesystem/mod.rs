//! Type descriptors, type definitions and name-based resolution.
//!
//! Mock rules name their return types as text. Everything that turns that
//! text into a shape lives here:
//!
//! - [`TypeDescriptor`] - a parsed return-type descriptor (`int`, `List<svc.Item>`, `svc.Order[]`)
//! - [`TypeDef`] / [`FieldDef`] - what is known about a named type: flags, supertype, fields
//! - [`TypeRegistry`] - the seam through which the host exposes its types
//! - [`ClassRegistry`] - a concurrent in-memory registry with the standard exception types
//!   preloaded

mod descriptor;
mod registry;
mod types;

pub use descriptor::{PrimitiveKind, TypeDescriptor, MAX_DESCRIPTOR_DEPTH};
pub use registry::{ClassRegistry, TypeLookup, TypeRegistry, MAX_HIERARCHY_DEPTH};
pub use types::{ClassFlags, FieldDef, TypeDef};

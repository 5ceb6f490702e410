//! A minimal in-process host for intercepted classes.
//!
//! The engine itself only needs two seams from whatever runs the code being
//! mocked: a [`crate::typesystem::TypeRegistry`] and a class-loading hook
//! ([`ClassTransformer`]). This module provides a host implementing both:
//!
//! - [`ClassDef`] / [`MethodDef`] - classes with methods backed by Rust closures
//! - [`Runtime`] - classpath, once-per-class loading through installed transformers, and invocation
//!
//! Tests and the command-line tool drive the engine through this host; an
//! embedding application can implement [`ClassTransformer`] against its own
//! loader instead.

mod class;
mod host;

pub use class::{
    is_initializer_name, ClassDef, MethodBody, MethodDef, MethodFlags, MethodFn,
    CONSTRUCTOR_NAME, STATIC_INITIALIZER_NAME,
};
pub use host::{ClassTransformer, LoadedClass, MethodInterception, Runtime};

//! Name-based type resolution.
//!
//! The coercion engine and the exception synthesizer both need to turn a
//! textual type name into something constructible. That lookup goes through
//! the [`TypeRegistry`] trait, which reports a miss as
//! [`TypeLookup::Unresolved`] rather than as an error: the caller decides
//! whether a miss degrades (coercion falls back to untyped values) or falls
//! back (exception synthesis substitutes a generic runtime exception).
//!
//! # Thread Safety
//!
//! [`ClassRegistry`] is backed by a `DashMap`, so classes may be registered
//! by loader threads while interception threads resolve names concurrently.
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::typesystem::{ClassRegistry, TypeDef, TypeRegistry};
//!
//! let registry = ClassRegistry::with_builtins();
//! registry.register(TypeDef::exception("svc.QuotaExceeded", "java.lang.RuntimeException"));
//!
//! assert!(registry.resolve("svc.QuotaExceeded").is_resolved());
//! assert!(registry.is_subtype_of("svc.QuotaExceeded", "java.lang.Exception")?);
//! assert!(!registry.resolve("svc.Missing").is_resolved());
//! # Ok::<(), mockrunner::Error>(())
//! ```

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    typesystem::{ClassFlags, TypeDef},
    Error, Result,
};

/// Maximum supertype chain length walked by [`TypeRegistry::is_subtype_of`].
pub const MAX_HIERARCHY_DEPTH: usize = 64;

/// Result of resolving a type name.
#[derive(Clone, Debug)]
pub enum TypeLookup {
    /// The name denotes a known type.
    Resolved(Arc<TypeDef>),
    /// The name is not known to the registry.
    Unresolved,
}

impl TypeLookup {
    /// Returns `true` if the lookup found a type.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeLookup::Resolved(_))
    }

    /// Converts into an `Option`.
    #[must_use]
    pub fn into_option(self) -> Option<Arc<TypeDef>> {
        match self {
            TypeLookup::Resolved(def) => Some(def),
            TypeLookup::Unresolved => None,
        }
    }
}

/// Maps type names to definitions.
///
/// Implement this to let the engine see the host's types. The only required
/// method is [`resolve`](Self::resolve).
pub trait TypeRegistry: Send + Sync {
    /// Resolves a fully qualified type name.
    fn resolve(&self, name: &str) -> TypeLookup;

    /// Checks whether `name` is `ancestor` or (transitively) extends it.
    ///
    /// An unresolved link in the chain ends the walk with `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] if the chain is longer than
    /// [`MAX_HIERARCHY_DEPTH`], which only happens for cyclic definitions.
    fn is_subtype_of(&self, name: &str, ancestor: &str) -> Result<bool> {
        let mut current = name.to_string();
        for _ in 0..MAX_HIERARCHY_DEPTH {
            if current == ancestor {
                return Ok(true);
            }
            match self.resolve(&current) {
                TypeLookup::Resolved(def) => match &def.super_type {
                    Some(parent) => current = parent.clone(),
                    None => return Ok(false),
                },
                TypeLookup::Unresolved => return Ok(false),
            }
        }
        Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH))
    }

    /// Collects the fields of `def` and all of its resolvable supertypes,
    /// supertype fields first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] for cyclic hierarchies.
    fn all_fields(&self, def: &TypeDef) -> Result<Vec<crate::typesystem::FieldDef>> {
        let mut chain = vec![def.fields.clone()];
        let mut parent = def.super_type.clone();
        let mut depth = 0;

        while let Some(name) = parent {
            depth += 1;
            if depth > MAX_HIERARCHY_DEPTH {
                return Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH));
            }
            match self.resolve(&name) {
                TypeLookup::Resolved(super_def) => {
                    chain.push(super_def.fields.clone());
                    parent = super_def.super_type.clone();
                }
                TypeLookup::Unresolved => break,
            }
        }

        Ok(chain.into_iter().rev().flatten().collect())
    }
}

impl<T: TypeRegistry + ?Sized> TypeRegistry for Arc<T> {
    fn resolve(&self, name: &str) -> TypeLookup {
        (**self).resolve(name)
    }
}

/// Concurrent in-memory registry.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    types: DashMap<String, Arc<TypeDef>>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the platform root type and the
    /// standard exception hierarchy.
    #[must_use]
    pub fn with_builtins() -> Self {
        let registry = Self::new();

        registry.register(TypeDef {
            super_type: None,
            ..TypeDef::class("java.lang.Object")
        });
        registry.register(TypeDef::exception(
            "java.lang.Throwable",
            "java.lang.Object",
        ));
        registry.register(TypeDef::exception("java.lang.Exception", "java.lang.Throwable"));
        registry.register(TypeDef::exception("java.lang.Error", "java.lang.Throwable"));

        for name in [
            "java.lang.IllegalArgumentException",
            "java.lang.IllegalStateException",
            "java.lang.UnsupportedOperationException",
            "java.lang.NullPointerException",
            "java.lang.ArithmeticException",
            "java.lang.IndexOutOfBoundsException",
            "java.lang.SecurityException",
        ] {
            registry.register(TypeDef::exception(name, "java.lang.RuntimeException"));
        }
        registry.register(TypeDef::exception(
            "java.lang.RuntimeException",
            "java.lang.Exception",
        ));
        registry.register(TypeDef::exception(
            "java.util.NoSuchElementException",
            "java.lang.RuntimeException",
        ));
        registry.register(TypeDef::exception("java.io.IOException", "java.lang.Exception"));
        registry.register(TypeDef::exception(
            "java.util.concurrent.TimeoutException",
            "java.lang.Exception",
        ));
        // Only has (String, IOException) and (IOException) constructors.
        registry.register(
            TypeDef::exception("java.io.UncheckedIOException", "java.lang.RuntimeException")
                .with_string_constructor(false),
        );

        registry
    }

    /// Registers a type, replacing any previous definition of the same name.
    pub fn register(&self, def: TypeDef) -> Arc<TypeDef> {
        let def = Arc::new(def);
        self.types.insert(def.name.clone(), def.clone());
        def
    }

    /// Returns `true` if the name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Names of registered interfaces, sorted.
    #[must_use]
    pub fn interfaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .types
            .iter()
            .filter(|e| e.value().flags.contains(ClassFlags::INTERFACE))
            .map(|e| e.key().clone())
            .collect();
        names.sort();
        names
    }
}

impl TypeRegistry for ClassRegistry {
    fn resolve(&self, name: &str) -> TypeLookup {
        match self.types.get(name) {
            Some(def) => TypeLookup::Resolved(def.value().clone()),
            None => TypeLookup::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesystem::{PrimitiveKind, TypeDescriptor};

    #[test]
    fn builtins_form_exception_hierarchy() {
        let registry = ClassRegistry::with_builtins();

        assert!(registry
            .is_subtype_of("java.lang.IllegalArgumentException", "java.lang.Exception")
            .unwrap());
        assert!(registry
            .is_subtype_of("java.io.IOException", "java.lang.Throwable")
            .unwrap());
        assert!(!registry
            .is_subtype_of("java.lang.Error", "java.lang.Exception")
            .unwrap());
        assert!(!registry
            .is_subtype_of("does.not.Exist", "java.lang.Exception")
            .unwrap());
    }

    #[test]
    fn cyclic_hierarchy_hits_recursion_limit() {
        let registry = ClassRegistry::new();
        registry.register(TypeDef::class("a.A").with_super("a.B"));
        registry.register(TypeDef::class("a.B").with_super("a.A"));

        assert!(matches!(
            registry.is_subtype_of("a.A", "a.C"),
            Err(Error::RecursionLimit(MAX_HIERARCHY_DEPTH))
        ));
    }

    #[test]
    fn all_fields_includes_supertypes_first() {
        let registry = ClassRegistry::with_builtins();
        registry.register(
            TypeDef::class("svc.Base")
                .with_field("id", TypeDescriptor::primitive_of(PrimitiveKind::Long)),
        );
        let child = registry.register(
            TypeDef::class("svc.Child")
                .with_super("svc.Base")
                .with_field("name", TypeDescriptor::string()),
        );

        let fields = registry.all_fields(&child).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[test]
    fn register_replaces_and_lists() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());

        registry.register(TypeDef::class("b.B"));
        registry.register(TypeDef::interface("a.A"));
        registry.register(TypeDef::class("b.B").with_string_constructor(true));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["a.A", "b.B"]);
        assert_eq!(registry.interfaces(), vec!["a.A"]);
        assert!(registry
            .resolve("b.B")
            .into_option()
            .is_some_and(|d| d.string_constructor));
    }
}

//! Type definitions known to a registry.

use bitflags::bitflags;

use crate::typesystem::TypeDescriptor;

bitflags! {
    /// Class-level access and kind flags, using the class-file bit values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u32 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Cannot be subclassed
        const FINAL = 0x0010;
        /// An interface; has no instance state and no method bodies of its own
        const INTERFACE = 0x0200;
        /// Cannot be instantiated
        const ABSTRACT = 0x0400;
        /// An enum type
        const ENUM = 0x4000;
    }
}

/// A declared instance field, used for structural (field-by-field) deserialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// The field name as it appears in JSON
    pub name: String,
    /// The declared field type
    pub descriptor: TypeDescriptor,
}

impl FieldDef {
    /// Creates a new field definition.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor,
        }
    }
}

/// A resolvable type: what a registry knows about a class by name.
///
/// This is deliberately small. The coercion engine only needs the field layout
/// to build objects, and the exception synthesizer only needs the hierarchy
/// and whether a `(String)` constructor exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDef {
    /// Fully qualified name
    pub name: String,
    /// Access and kind flags
    pub flags: ClassFlags,
    /// Fully qualified name of the direct supertype, `None` for the root
    pub super_type: Option<String>,
    /// Declared instance fields (inherited fields live on the supertype)
    pub fields: Vec<FieldDef>,
    /// Whether a public constructor taking a single string exists
    pub string_constructor: bool,
}

impl TypeDef {
    /// A public concrete class extending `java.lang.Object`.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flags: ClassFlags::PUBLIC,
            super_type: Some("java.lang.Object".to_string()),
            fields: Vec::new(),
            string_constructor: false,
        }
    }

    /// A public interface.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            flags: ClassFlags::PUBLIC | ClassFlags::INTERFACE | ClassFlags::ABSTRACT,
            super_type: None,
            ..Self::class(name)
        }
    }

    /// An exception class with a `(String)` constructor.
    #[must_use]
    pub fn exception(name: impl Into<String>, super_type: impl Into<String>) -> Self {
        Self {
            super_type: Some(super_type.into()),
            string_constructor: true,
            ..Self::class(name)
        }
    }

    /// Adds a declared field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.fields.push(FieldDef::new(name, descriptor));
        self
    }

    /// Replaces the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the direct supertype.
    #[must_use]
    pub fn with_super(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Sets whether a `(String)` constructor exists.
    #[must_use]
    pub fn with_string_constructor(mut self, present: bool) -> Self {
        self.string_constructor = present;
        self
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    /// Returns `true` if instances of this type can be created directly.
    #[must_use]
    pub fn is_instantiable(&self) -> bool {
        !self
            .flags
            .intersects(ClassFlags::INTERFACE | ClassFlags::ABSTRACT)
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The name without its package prefix.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

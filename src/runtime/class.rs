//! Class and method definitions of the in-process host.

use std::{fmt, sync::Arc};

use bitflags::bitflags;

use crate::{
    typesystem::{ClassFlags, FieldDef, TypeDef, TypeDescriptor},
    value::Value,
    Result,
};

/// Signature of a method body.
pub type MethodFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A shareable method body.
pub type MethodBody = Arc<MethodFn>;

bitflags! {
    /// Method access and kind flags, using the class-file bit values.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MethodFlags: u32 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Static method
        const STATIC = 0x0008;
        /// Cannot be overridden
        const FINAL = 0x0010;
        /// Implemented natively
        const NATIVE = 0x0100;
        /// Declared without a body
        const ABSTRACT = 0x0400;
    }
}

/// Constructor name.
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Static initializer name.
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// A method declared by a class.
#[derive(Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Parameter type descriptors, in order
    pub params: Vec<String>,
    /// Return type descriptor
    pub return_type: String,
    /// Access and kind flags
    pub flags: MethodFlags,
    /// The implementation; `None` for abstract and interface methods
    pub body: Option<MethodBody>,
}

impl MethodDef {
    /// A public method with a body.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, return_type: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let body: MethodBody = Arc::new(body);
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            flags: MethodFlags::PUBLIC,
            body: Some(body),
        }
    }

    /// A public abstract method.
    #[must_use]
    pub fn abstract_method(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            flags: MethodFlags::PUBLIC | MethodFlags::ABSTRACT,
            body: None,
        }
    }

    /// Sets the parameter types.
    #[must_use]
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns `true` if the method has an implementation.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Returns `true` for constructors and static initializers.
    #[must_use]
    pub fn is_initializer(&self) -> bool {
        is_initializer_name(&self.name)
    }

    /// The parameter list as displayed, e.g. `(int, java.lang.String)`.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("({})", self.params.join(", "))
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("flags", &self.flags)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// Returns `true` for `<init>` and `<clinit>`.
#[must_use]
pub fn is_initializer_name(name: &str) -> bool {
    name == CONSTRUCTOR_NAME || name == STATIC_INITIALIZER_NAME
}

/// A class as defined on the host's classpath.
#[derive(Clone, Debug)]
pub struct ClassDef {
    /// Fully qualified name
    pub name: String,
    /// Access and kind flags
    pub flags: ClassFlags,
    /// Direct supertype
    pub super_type: Option<String>,
    /// Declared instance fields
    pub fields: Vec<FieldDef>,
    /// Declared methods, overloads included
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    /// A public concrete class.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::from_type(TypeDef::class(name))
    }

    /// A public interface.
    #[must_use]
    pub fn interface(name: impl Into<String>) -> Self {
        Self::from_type(TypeDef::interface(name))
    }

    fn from_type(def: TypeDef) -> Self {
        Self {
            name: def.name,
            flags: def.flags,
            super_type: def.super_type,
            fields: def.fields,
            methods: Vec::new(),
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, descriptor: TypeDescriptor) -> Self {
        self.fields.push(FieldDef::new(name, descriptor));
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Sets the direct supertype.
    #[must_use]
    pub fn with_super(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Replaces the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ClassFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    /// All overloads named `name`, with their indices.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a MethodDef)> + 'a {
        self.methods
            .iter()
            .enumerate()
            .filter(move |(_, m)| m.name == name)
    }

    /// Picks the overload to invoke: the first one with a matching parameter
    /// count, else the first one with the name.
    #[must_use]
    pub fn find_method(&self, name: &str, arg_count: usize) -> Option<(usize, &MethodDef)> {
        let mut candidates = self
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name == name);
        let first = candidates.clone().next();
        candidates
            .find(|(_, m)| m.params.len() == arg_count)
            .or(first)
    }

    /// Returns `true` if a constructor taking a single string is declared.
    #[must_use]
    pub fn has_string_constructor(&self) -> bool {
        self.methods.iter().any(|m| {
            m.name == CONSTRUCTOR_NAME
                && matches!(m.params.as_slice(), [p] if p == "java.lang.String" || p == "String")
        })
    }

    /// The type definition registered for this class.
    #[must_use]
    pub fn type_def(&self) -> TypeDef {
        TypeDef {
            name: self.name.clone(),
            flags: self.flags,
            super_type: self.super_type.clone(),
            fields: self.fields.clone(),
            string_constructor: self.has_string_constructor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ClassDef {
        ClassDef::class("svc.Store")
            .with_method(MethodDef::new("get", "int", |_| Ok(Value::Int(0))))
            .with_method(
                MethodDef::new("get", "int", |args| Ok(args[0].clone())).with_params(["int"]),
            )
            .with_method(MethodDef::new("<init>", "void", |_| Ok(Value::Null)))
    }

    #[test]
    fn overload_selection() {
        let class = store();
        assert_eq!(class.methods_named("get").count(), 2);
        assert_eq!(class.find_method("get", 1).map(|(i, _)| i), Some(1));
        assert_eq!(class.find_method("get", 0).map(|(i, _)| i), Some(0));
        assert_eq!(class.find_method("get", 5).map(|(i, _)| i), Some(0));
        assert!(class.find_method("missing", 0).is_none());
    }

    #[test]
    fn signatures_and_initializers() {
        let class = store();
        assert_eq!(class.methods[1].signature(), "(int)");
        assert!(class.methods[2].is_initializer());
        assert!(is_initializer_name("<clinit>"));
        assert!(!is_initializer_name("init"));
        assert!(!class.has_string_constructor());

        let exception = ClassDef::class("svc.QuotaExceededException")
            .with_super("java.lang.RuntimeException")
            .with_method(
                MethodDef::new("<init>", "void", |_| Ok(Value::Null)).with_params(["String"]),
            );
        assert!(exception.type_def().string_constructor);
    }

    #[test]
    fn interface_methods_have_no_body() {
        let api = ClassDef::interface("svc.Api")
            .with_method(MethodDef::abstract_method("list", "List<svc.Item>"));
        assert!(api.is_interface());
        assert!(!api.methods[0].has_body());
        assert!(api.type_def().is_interface());
    }
}

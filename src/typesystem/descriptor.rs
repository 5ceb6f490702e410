//! Textual return-type descriptors.
//!
//! Rules carry their declared return type as plain text, e.g. `int`,
//! `java.lang.Long`, `List<pkg.Student>` or `pkg.Order[]`. This module parses
//! that text into a [`TypeDescriptor`] once so the coercion engine can match on
//! structure instead of re-inspecting strings.
//!
//! # Container Classification
//!
//! | Outer name (bare or `java.util.` qualified) | Descriptor |
//! |---------------------------------------------|------------|
//! | `List`, `ArrayList`, `LinkedList`, `Collection`, `Iterable` | [`TypeDescriptor::List`] |
//! | `Set`, `HashSet`, `LinkedHashSet` | [`TypeDescriptor::List`] |
//! | `Map`, `HashMap`, `LinkedHashMap`, `TreeMap`, `ConcurrentHashMap` | [`TypeDescriptor::Map`] |
//! | `T[]` | [`TypeDescriptor::Array`] |
//! | anything else | [`TypeDescriptor::Named`] |
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::typesystem::{PrimitiveKind, TypeDescriptor};
//!
//! let desc = TypeDescriptor::parse("List<svc.Item>")?;
//! assert!(desc.is_list_like());
//! assert_eq!(desc.element(), Some(&TypeDescriptor::named("svc.Item")));
//!
//! let boxed = TypeDescriptor::parse("java.lang.Integer")?;
//! assert_eq!(boxed.primitive(), Some(PrimitiveKind::Int));
//! # Ok::<(), mockrunner::Error>(())
//! ```

use std::fmt;

use strum::{Display, EnumIter};

use crate::Result;

/// Deepest nesting of arrays, generic parameters and wildcard bounds accepted.
pub const MAX_DESCRIPTOR_DEPTH: usize = 64;

const LIST_LIKE: &[&str] = &[
    "List",
    "ArrayList",
    "LinkedList",
    "Collection",
    "Set",
    "HashSet",
    "LinkedHashSet",
    "Iterable",
];

const MAP_LIKE: &[&str] = &[
    "Map",
    "HashMap",
    "LinkedHashMap",
    "TreeMap",
    "ConcurrentHashMap",
];

/// The primitive value kinds a mock value can be parsed into directly.
///
/// `String` is included because rule values for `java.lang.String` are taken
/// verbatim rather than deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PrimitiveKind {
    /// `boolean` / `java.lang.Boolean`
    #[strum(to_string = "boolean")]
    Boolean,
    /// `byte` / `java.lang.Byte`
    #[strum(to_string = "byte")]
    Byte,
    /// `char` / `java.lang.Character`
    #[strum(to_string = "char")]
    Char,
    /// `short` / `java.lang.Short`
    #[strum(to_string = "short")]
    Short,
    /// `int` / `java.lang.Integer`
    #[strum(to_string = "int")]
    Int,
    /// `long` / `java.lang.Long`
    #[strum(to_string = "long")]
    Long,
    /// `float` / `java.lang.Float`
    #[strum(to_string = "float")]
    Float,
    /// `double` / `java.lang.Double`
    #[strum(to_string = "double")]
    Double,
    /// `java.lang.String`
    #[strum(to_string = "string")]
    String,
}

impl PrimitiveKind {
    /// Recognizes a primitive keyword or boxed class name.
    ///
    /// Returns the kind and whether the name denotes the boxed (nullable) form.
    #[must_use]
    pub fn from_name(name: &str) -> Option<(PrimitiveKind, bool)> {
        let found = match name {
            "boolean" => (PrimitiveKind::Boolean, false),
            "java.lang.Boolean" | "Boolean" => (PrimitiveKind::Boolean, true),
            "byte" => (PrimitiveKind::Byte, false),
            "java.lang.Byte" | "Byte" => (PrimitiveKind::Byte, true),
            "char" => (PrimitiveKind::Char, false),
            "java.lang.Character" | "Character" => (PrimitiveKind::Char, true),
            "short" => (PrimitiveKind::Short, false),
            "java.lang.Short" | "Short" => (PrimitiveKind::Short, true),
            "int" => (PrimitiveKind::Int, false),
            "java.lang.Integer" | "Integer" => (PrimitiveKind::Int, true),
            "long" => (PrimitiveKind::Long, false),
            "java.lang.Long" | "Long" => (PrimitiveKind::Long, true),
            "float" => (PrimitiveKind::Float, false),
            "java.lang.Float" | "Float" => (PrimitiveKind::Float, true),
            "double" => (PrimitiveKind::Double, false),
            "java.lang.Double" | "Double" => (PrimitiveKind::Double, true),
            "java.lang.String" | "String" | "string" => (PrimitiveKind::String, true),
            _ => return None,
        };
        Some(found)
    }

    /// The fully qualified name of the boxed form.
    #[must_use]
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Char => "java.lang.Character",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
            PrimitiveKind::String => "java.lang.String",
        }
    }
}

/// A parsed return-type descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A primitive or its boxed counterpart.
    Primitive {
        /// The value kind
        kind: PrimitiveKind,
        /// Whether the boxed (nullable) form was named
        boxed: bool,
    },

    /// `void`; methods declared this way return no value.
    Void,

    /// `java.lang.Object`, or a `?` wildcard: no shape information at all.
    Any,

    /// A list-like container, optionally with its element type.
    List {
        /// The container name as written, e.g. `java.util.ArrayList`
        container: String,
        /// The single generic parameter, if given
        element: Option<Box<TypeDescriptor>>,
    },

    /// An array of the element type (`T[]`).
    Array(Box<TypeDescriptor>),

    /// A map-like container. Values are always deserialized untyped.
    Map {
        /// The container name as written
        container: String,
        /// Generic parameters as written (kept for display only)
        args: Vec<TypeDescriptor>,
    },

    /// Any other named type, resolved through a [`crate::typesystem::TypeRegistry`].
    Named {
        /// The fully qualified type name
        name: String,
        /// Generic parameters (ignored during resolution)
        args: Vec<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    /// Parses a textual descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] for empty input, unbalanced angle
    /// brackets, empty generic parameters, or nesting deeper than
    /// [`MAX_DESCRIPTOR_DEPTH`].
    pub fn parse(text: &str) -> Result<TypeDescriptor> {
        Self::parse_nested(text, 0)
    }

    fn parse_nested(text: &str, depth: usize) -> Result<TypeDescriptor> {
        let mut text = text.trim();
        if text.is_empty() {
            return Err(malformed_error!("Empty type descriptor"));
        }

        let mut dimensions = 0;
        while let Some(element) = text.strip_suffix("[]") {
            text = element.trim_end();
            dimensions += 1;
        }
        if dimensions > 0 {
            let depth = depth + dimensions;
            if depth > MAX_DESCRIPTOR_DEPTH {
                return Err(too_deep());
            }
            let mut descriptor = Self::parse_nested(text, depth)?;
            for _ in 0..dimensions {
                descriptor = TypeDescriptor::Array(Box::new(descriptor));
            }
            return Ok(descriptor);
        }

        if text == "?" {
            return Ok(TypeDescriptor::Any);
        }
        if let Some(bound) = text
            .strip_prefix("? extends ")
            .or_else(|| text.strip_prefix("? super "))
        {
            if depth >= MAX_DESCRIPTOR_DEPTH {
                return Err(too_deep());
            }
            return Self::parse_nested(bound, depth + 1);
        }

        if let Some(open) = text.find('<') {
            if !text.ends_with('>') {
                return Err(malformed_error!(
                    "Unterminated generic parameters in '{}'",
                    text
                ));
            }
            let outer = text[..open].trim();
            if outer.is_empty() {
                return Err(malformed_error!("Missing type name in '{}'", text));
            }
            if depth >= MAX_DESCRIPTOR_DEPTH {
                return Err(too_deep());
            }
            let args = split_generic_args(&text[open + 1..text.len() - 1])?
                .into_iter()
                .map(|arg| Self::parse_nested(arg, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::classify(outer, args));
        }

        if text.contains('>') {
            return Err(malformed_error!("Unbalanced '>' in '{}'", text));
        }

        if let Some((kind, boxed)) = PrimitiveKind::from_name(text) {
            return Ok(TypeDescriptor::Primitive { kind, boxed });
        }

        Ok(match text {
            "void" | "java.lang.Void" | "Void" => TypeDescriptor::Void,
            "java.lang.Object" | "Object" => TypeDescriptor::Any,
            _ => Self::classify(text, Vec::new()),
        })
    }

    fn classify(outer: &str, args: Vec<TypeDescriptor>) -> TypeDescriptor {
        let simple = outer
            .strip_prefix("java.util.concurrent.")
            .or_else(|| outer.strip_prefix("java.util."))
            .unwrap_or(outer);

        if LIST_LIKE.contains(&simple) {
            TypeDescriptor::List {
                container: outer.to_string(),
                element: args.into_iter().next().map(Box::new),
            }
        } else if MAP_LIKE.contains(&simple) {
            TypeDescriptor::Map {
                container: outer.to_string(),
                args,
            }
        } else {
            TypeDescriptor::Named {
                name: outer.to_string(),
                args,
            }
        }
    }

    /// Shorthand for an unboxed primitive descriptor.
    #[must_use]
    pub fn primitive_of(kind: PrimitiveKind) -> TypeDescriptor {
        TypeDescriptor::Primitive {
            kind,
            boxed: kind == PrimitiveKind::String,
        }
    }

    /// Shorthand for `java.lang.String`.
    #[must_use]
    pub fn string() -> TypeDescriptor {
        TypeDescriptor::primitive_of(PrimitiveKind::String)
    }

    /// Shorthand for a named type without generic parameters.
    #[must_use]
    pub fn named(name: impl Into<String>) -> TypeDescriptor {
        TypeDescriptor::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Shorthand for `java.util.List<element>`.
    #[must_use]
    pub fn list_of(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::List {
            container: "java.util.List".to_string(),
            element: Some(Box::new(element)),
        }
    }

    /// Returns the primitive kind for primitive and boxed descriptors.
    #[must_use]
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeDescriptor::Primitive { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` if `null` is a legal value of this type.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        !matches!(self, TypeDescriptor::Primitive { boxed: false, .. })
    }

    /// Returns `true` for list-like containers and arrays.
    #[must_use]
    pub fn is_list_like(&self) -> bool {
        matches!(self, TypeDescriptor::List { .. } | TypeDescriptor::Array(_))
    }

    /// Returns `true` for map-like containers.
    #[must_use]
    pub fn is_map_like(&self) -> bool {
        matches!(self, TypeDescriptor::Map { .. })
    }

    /// The element descriptor of a list-like container, if one was declared.
    #[must_use]
    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::List { element, .. } => element.as_deref(),
            TypeDescriptor::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive { kind, boxed } => {
                if *boxed {
                    write!(f, "{}", kind.boxed_name())
                } else {
                    write!(f, "{kind}")
                }
            }
            TypeDescriptor::Void => write!(f, "void"),
            TypeDescriptor::Any => write!(f, "java.lang.Object"),
            TypeDescriptor::List { container, element } => match element {
                Some(element) => write!(f, "{container}<{element}>"),
                None => write!(f, "{container}"),
            },
            TypeDescriptor::Array(element) => write!(f, "{element}[]"),
            TypeDescriptor::Map {
                container: name,
                args,
            }
            | TypeDescriptor::Named { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
        }
    }
}

fn too_deep() -> crate::Error {
    malformed_error!(
        "Type descriptor nests deeper than {} levels",
        MAX_DESCRIPTOR_DEPTH
    )
}

/// Splits `A, B<C, D>, E` at top-level commas.
fn split_generic_args(text: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed_error!("Unbalanced '>' in '{}'", text))?;
            }
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(malformed_error!("Unbalanced '<' in '{}'", text));
    }
    parts.push(text[start..].trim());

    if parts.iter().any(|part| part.is_empty()) {
        return Err(malformed_error!("Empty generic parameter in '{}'", text));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parse_primitive_keywords_and_boxed_names() {
        for kind in PrimitiveKind::iter() {
            let keyword = TypeDescriptor::parse(&kind.to_string()).unwrap();
            assert_eq!(keyword.primitive(), Some(kind));

            let boxed = TypeDescriptor::parse(kind.boxed_name()).unwrap();
            assert_eq!(
                boxed,
                TypeDescriptor::Primitive { kind, boxed: true },
                "{}",
                kind.boxed_name()
            );
        }
        assert!(!TypeDescriptor::parse("int").unwrap().is_nullable());
        assert!(TypeDescriptor::parse("Integer").unwrap().is_nullable());
    }

    #[test]
    fn parse_generic_list() {
        let desc = TypeDescriptor::parse("java.util.List<pkg.Student>").unwrap();
        assert!(desc.is_list_like());
        assert_eq!(desc.element(), Some(&TypeDescriptor::named("pkg.Student")));

        let bare = TypeDescriptor::parse("ArrayList").unwrap();
        assert!(bare.is_list_like());
        assert_eq!(bare.element(), None);
    }

    #[test]
    fn parse_nested_generics() {
        let desc = TypeDescriptor::parse("Map<String, List<Integer>>").unwrap();
        match desc {
            TypeDescriptor::Map { container, args } => {
                assert_eq!(container, "Map");
                assert_eq!(args.len(), 2);
                assert!(args[1].is_list_like());
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn parse_array_and_wildcards() {
        let desc = TypeDescriptor::parse("svc.Order[]").unwrap();
        assert_eq!(desc.element(), Some(&TypeDescriptor::named("svc.Order")));

        let wildcard = TypeDescriptor::parse("List<? extends svc.Order>").unwrap();
        assert_eq!(wildcard.element(), Some(&TypeDescriptor::named("svc.Order")));

        let any = TypeDescriptor::parse("List<?>").unwrap();
        assert_eq!(any.element(), Some(&TypeDescriptor::Any));
    }

    #[test]
    fn parse_rejects_unbalanced() {
        assert!(TypeDescriptor::parse("").is_err());
        assert!(TypeDescriptor::parse("List<Foo").is_err());
        assert!(TypeDescriptor::parse("Foo>").is_err());
        assert!(TypeDescriptor::parse("Map<String,>").is_err());
        assert!(TypeDescriptor::parse("<Foo>").is_err());
    }

    #[test]
    fn named_types_keep_their_generic_args() {
        let desc = TypeDescriptor::parse("svc.Page<svc.Item>").unwrap();
        assert_eq!(
            desc,
            TypeDescriptor::Named {
                name: "svc.Page".to_string(),
                args: vec![TypeDescriptor::named("svc.Item")],
            }
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let arrays = format!("int{}", "[]".repeat(5_000));
        assert!(matches!(TypeDescriptor::parse(&arrays), Err(crate::Error::Malformed { .. })));

        let generics = format!("{}int{}", "List<".repeat(5_000), ">".repeat(5_000));
        assert!(matches!(TypeDescriptor::parse(&generics), Err(crate::Error::Malformed { .. })));

        let bounds = format!("{}int", "? extends ".repeat(5_000));
        assert!(TypeDescriptor::parse(&bounds).is_err());
    }

    #[test]
    fn nesting_at_the_limit_parses() {
        let arrays = format!("int{}", "[]".repeat(MAX_DESCRIPTOR_DEPTH));
        let mut desc = TypeDescriptor::parse(&arrays).unwrap();
        let mut dimensions = 0;
        while let TypeDescriptor::Array(element) = desc {
            desc = *element;
            dimensions += 1;
        }
        assert_eq!(dimensions, MAX_DESCRIPTOR_DEPTH);
        assert_eq!(desc.primitive(), Some(PrimitiveKind::Int));

        let generics = format!(
            "{}int{}",
            "List<".repeat(MAX_DESCRIPTOR_DEPTH),
            ">".repeat(MAX_DESCRIPTOR_DEPTH)
        );
        assert!(TypeDescriptor::parse(&generics).unwrap().is_list_like());
    }

    #[test]
    fn display_renders_canonical_form() {
        let desc = TypeDescriptor::parse("List<Integer>").unwrap();
        assert_eq!(desc.to_string(), "List<java.lang.Integer>");

        let map = TypeDescriptor::parse("java.util.Map<String,Object>").unwrap();
        assert_eq!(
            map.to_string(),
            "java.util.Map<java.lang.String, java.lang.Object>"
        );

        assert_eq!(TypeDescriptor::parse("long[]").unwrap().to_string(), "long[]");
        assert_eq!(TypeDescriptor::parse("void").unwrap().to_string(), "void");
    }
}

//! Template mock values for a declared return type.
//!
//! Used when authoring rules: given a descriptor, produce a literal that
//! [`super::coerce`] accepts for that descriptor, so the author only has to
//! edit values rather than remember shapes.

use log::debug;
use serde_json::{json, Map, Value as Json};

use crate::typesystem::{PrimitiveKind, TypeDescriptor, TypeLookup, TypeRegistry};

const SAMPLE_STRING: &str = "sample_string";
const SAMPLE_FIELD_STRING: &str = "sample_value";

/// Produces a template literal for `descriptor`.
///
/// Top-level primitives render as bare literals, `void` as `void`, and
/// everything else as compact JSON. Lists hold one sample element, or two when
/// the element is an object. Self-referencing types render the repeated
/// reference as `null`.
///
/// # Examples
///
/// ```rust
/// use mockrunner::coercion::sample_value;
/// use mockrunner::typesystem::{ClassRegistry, TypeDescriptor};
///
/// let registry = ClassRegistry::with_builtins();
/// let desc = TypeDescriptor::parse("List<Integer>")?;
/// assert_eq!(sample_value(&desc, &registry), "[1]");
/// # Ok::<(), mockrunner::Error>(())
/// ```
#[must_use]
pub fn sample_value(descriptor: &TypeDescriptor, registry: &dyn TypeRegistry) -> String {
    let mut visiting = Vec::new();

    match descriptor {
        TypeDescriptor::Void => "void".to_string(),
        TypeDescriptor::Primitive {
            kind: PrimitiveKind::String,
            ..
        } => format!("\"{SAMPLE_STRING}\""),
        TypeDescriptor::List { element: None, .. } => "[]".to_string(),
        TypeDescriptor::List {
            element: Some(element),
            ..
        } => {
            let item = sample_json(element, registry, &mut visiting);
            let mut items = vec![item.clone()];
            if item.is_object() {
                items.push(item);
            }
            Json::Array(items).to_string()
        }
        other => sample_json(other, registry, &mut visiting).to_string(),
    }
}

fn sample_json(
    descriptor: &TypeDescriptor,
    registry: &dyn TypeRegistry,
    visiting: &mut Vec<String>,
) -> Json {
    match descriptor {
        TypeDescriptor::Void | TypeDescriptor::Any => Json::Null,
        TypeDescriptor::Primitive { kind, .. } => match kind {
            PrimitiveKind::Boolean => json!(true),
            PrimitiveKind::Byte
            | PrimitiveKind::Short
            | PrimitiveKind::Int
            | PrimitiveKind::Long => json!(1),
            PrimitiveKind::Float | PrimitiveKind::Double => json!(1.0),
            PrimitiveKind::Char => json!("a"),
            PrimitiveKind::String => json!(SAMPLE_FIELD_STRING),
        },
        TypeDescriptor::List { element, .. } => match element {
            Some(element) => Json::Array(vec![sample_json(element, registry, visiting)]),
            None => Json::Array(Vec::new()),
        },
        TypeDescriptor::Array(element) => {
            Json::Array(vec![sample_json(element, registry, visiting)])
        }
        TypeDescriptor::Map { args, .. } => {
            let mut map = Map::new();
            if let [key, value] = args.as_slice() {
                let key = match sample_json(key, registry, visiting) {
                    Json::String(s) => s,
                    other => other.to_string(),
                };
                map.insert(key, sample_json(value, registry, visiting));
            }
            Json::Object(map)
        }
        TypeDescriptor::Named { name, .. } => {
            if visiting.iter().any(|v| v == name) {
                return Json::Null;
            }
            let TypeLookup::Resolved(def) = registry.resolve(name) else {
                debug!("No sample for unresolved type '{name}'");
                return Json::Null;
            };
            let Ok(fields) = registry.all_fields(&def) else {
                return Json::Null;
            };

            visiting.push(name.clone());
            let map = fields
                .iter()
                .map(|field| {
                    (
                        field.name.clone(),
                        sample_json(&field.descriptor, registry, visiting),
                    )
                })
                .collect::<Map<_, _>>();
            visiting.pop();

            Json::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coercion::coerce, test::fixture_registry};

    fn sample(desc: &str) -> String {
        let registry = fixture_registry();
        sample_value(&TypeDescriptor::parse(desc).unwrap(), &registry)
    }

    #[test]
    fn primitives() {
        assert_eq!(sample("int"), "1");
        assert_eq!(sample("java.lang.Long"), "1");
        assert_eq!(sample("double"), "1.0");
        assert_eq!(sample("float"), "1.0");
        assert_eq!(sample("boolean"), "true");
        assert_eq!(sample("String"), "\"sample_string\"");
        assert_eq!(sample("void"), "void");
    }

    #[test]
    fn containers() {
        assert_eq!(sample("List<Integer>"), "[1]");
        assert_eq!(sample("List"), "[]");
        assert_eq!(sample("Map<String, Integer>"), r#"{"sample_value":1}"#);
        assert_eq!(sample("Map"), "{}");
        assert_eq!(sample("int[]"), "[1]");
    }

    #[test]
    fn objects_repeat_in_lists() {
        assert_eq!(
            sample("List<svc.Item>"),
            r#"[{"id":1,"name":"sample_value"},{"id":1,"name":"sample_value"}]"#
        );
    }

    #[test]
    fn cycles_become_null() {
        assert_eq!(sample("svc.Node"), r#"{"next":null,"value":1}"#);
    }

    #[test]
    fn unresolved_is_null() {
        assert_eq!(sample("svc.Missing"), "null");
    }

    #[test]
    fn samples_coerce_back() {
        let registry = fixture_registry();
        for desc in ["int", "long", "double", "boolean", "List<svc.Item>", "svc.SpecialItem"] {
            let text = sample(desc);
            assert!(coerce(Some(&text), desc, &registry).is_ok(), "{desc}: {text}");
        }
    }
}

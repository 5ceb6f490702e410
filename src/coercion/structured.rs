//! Structural shaping of parsed JSON into typed values.
//!
//! [`StructuredCoercer`] walks a `serde_json::Value` and a [`TypeDescriptor`]
//! side by side. Containers recurse into their element type, named types are
//! resolved through the [`TypeRegistry`] and filled field by field. A named
//! type the registry does not know degrades to an untyped value with a
//! warning instead of failing, so a mock for a class the engine cannot see
//! still returns something usable.

use std::collections::BTreeMap;

use log::warn;

use crate::{
    coercion::{primitive, CoercionError, CoercionResult, MAX_COERCION_DEPTH},
    typesystem::{TypeDescriptor, TypeLookup, TypeRegistry},
    value::{Object, Value},
};

/// Shapes JSON values against descriptors using a type registry.
pub struct StructuredCoercer<'a> {
    registry: &'a dyn TypeRegistry,
}

impl<'a> StructuredCoercer<'a> {
    /// Creates a coercer resolving named types through `registry`.
    #[must_use]
    pub fn new(registry: &'a dyn TypeRegistry) -> Self {
        Self { registry }
    }

    /// Shapes `json` into a value of `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] if the JSON does not fit a resolved type or
    /// nests deeper than [`MAX_COERCION_DEPTH`].
    pub fn coerce(
        &self,
        json: &serde_json::Value,
        descriptor: &TypeDescriptor,
    ) -> CoercionResult<Value> {
        self.coerce_at(json, descriptor, "$", 0)
    }

    fn coerce_at(
        &self,
        json: &serde_json::Value,
        descriptor: &TypeDescriptor,
        path: &str,
        depth: usize,
    ) -> CoercionResult<Value> {
        if depth > MAX_COERCION_DEPTH {
            return Err(CoercionError::DepthExceeded(MAX_COERCION_DEPTH));
        }
        if json.is_null() {
            return Ok(Value::default_for(descriptor));
        }

        match descriptor {
            TypeDescriptor::Void => Ok(Value::Null),
            TypeDescriptor::Any => untyped_at(json, depth),
            TypeDescriptor::Primitive { kind, .. } => primitive::from_json(json, *kind, path),
            TypeDescriptor::List { element, .. } => {
                self.sequence(json, descriptor, element.as_deref(), path, depth)
            }
            TypeDescriptor::Array(element) => {
                self.sequence(json, descriptor, Some(element.as_ref()), path, depth)
            }
            TypeDescriptor::Map { .. } => match json {
                serde_json::Value::Object(_) => untyped_at(json, depth),
                other => Err(mismatch(path, descriptor, other)),
            },
            TypeDescriptor::Named { name, .. } => self.object(json, name, path, depth),
        }
    }

    fn sequence(
        &self,
        json: &serde_json::Value,
        descriptor: &TypeDescriptor,
        element: Option<&TypeDescriptor>,
        path: &str,
        depth: usize,
    ) -> CoercionResult<Value> {
        let serde_json::Value::Array(items) = json else {
            return Err(mismatch(path, descriptor, json));
        };

        let element = match element {
            Some(TypeDescriptor::Named { name, .. })
                if !self.registry.resolve(name).is_resolved() =>
            {
                warn!("Element type '{name}' is not resolvable, keeping {path} untyped");
                None
            }
            other => other,
        };

        items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let item_path = format!("{path}[{idx}]");
                match element {
                    Some(element) => self.coerce_at(item, element, &item_path, depth + 1),
                    None => untyped_at(item, depth + 1),
                }
            })
            .collect::<CoercionResult<Vec<_>>>()
            .map(Value::List)
    }

    fn object(
        &self,
        json: &serde_json::Value,
        name: &str,
        path: &str,
        depth: usize,
    ) -> CoercionResult<Value> {
        let def = match self.registry.resolve(name) {
            TypeLookup::Resolved(def) => def,
            TypeLookup::Unresolved => {
                warn!("Type '{name}' is not resolvable, keeping {path} untyped");
                return untyped_at(json, depth);
            }
        };

        let serde_json::Value::Object(map) = json else {
            return Err(CoercionError::ShapeMismatch {
                path: path.to_string(),
                expected: name.to_string(),
                found: json_kind(json).to_string(),
            });
        };
        if !def.is_instantiable() {
            return Err(CoercionError::NotInstantiable(name.to_string()));
        }

        let fields = self
            .registry
            .all_fields(&def)
            .map_err(|_| CoercionError::DepthExceeded(MAX_COERCION_DEPTH))?;

        let mut object = Object::new(def.name.clone());
        for field in fields {
            let value = match map.get(&field.name) {
                Some(item) => self.coerce_at(
                    item,
                    &field.descriptor,
                    &format!("{path}.{}", field.name),
                    depth + 1,
                )?,
                None => Value::default_for(&field.descriptor),
            };
            object.fields.insert(field.name, value);
        }
        Ok(Value::Object(object))
    }
}

fn untyped_at(json: &serde_json::Value, depth: usize) -> CoercionResult<Value> {
    if depth > MAX_COERCION_DEPTH {
        return Err(CoercionError::DepthExceeded(MAX_COERCION_DEPTH));
    }
    match json {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| untyped_at(item, depth + 1))
            .collect::<CoercionResult<Vec<_>>>()
            .map(Value::List),
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| Ok((k.clone(), untyped_at(v, depth + 1)?)))
            .collect::<CoercionResult<BTreeMap<_, _>>>()
            .map(Value::Map),
        scalar => Ok(Value::from_json_untyped(scalar)),
    }
}

fn mismatch(path: &str, expected: &TypeDescriptor, found: &serde_json::Value) -> CoercionError {
    CoercionError::ShapeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        found: json_kind(found).to_string(),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

//! Runtime value representation for mock results and method arguments.

use std::{collections::BTreeMap, fmt};

use crate::typesystem::{PrimitiveKind, TypeDescriptor};

/// A value produced by coercion or passed to and returned from a method body.
///
/// # Type Mapping
///
/// | Declared type | Value Variant |
/// |---------------|---------------|
/// | `boolean` / `Boolean` | [`Value::Bool`] |
/// | `byte`, `short` (and boxed) | [`Value::Byte`], [`Value::Short`] |
/// | `int`, `long` (and boxed) | [`Value::Int`], [`Value::Long`] |
/// | `float`, `double` (and boxed) | [`Value::Float`], [`Value::Double`] |
/// | `char` / `Character` | [`Value::Char`] |
/// | `String` | [`Value::Str`] |
/// | list-like containers and arrays | [`Value::List`] |
/// | map-like containers, untyped JSON objects | [`Value::Map`] |
/// | resolved named types | [`Value::Object`] |
/// | `void`, `null` | [`Value::Null`] |
///
/// Untyped JSON numbers become [`Value::Long`] when integral and
/// [`Value::Double`] otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `null`, and the result of a `void` method.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 8-bit signed integer.
    Byte(i8),
    /// UTF-16 code unit, held as a `char`.
    Char(char),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit floating point.
    Float(f32),
    /// 64-bit floating point.
    Double(f64),
    /// String value.
    Str(String),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// Instance of a resolved named type.
    Object(Object),
}

/// An instance of a named type built by structural deserialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Object {
    /// Fully qualified type name
    pub type_name: String,
    /// Field values by name
    pub fields: BTreeMap<String, Value>,
}

impl Object {
    /// Creates an instance with no fields set.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Reads a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Value {
    /// The value an uninitialized field of this type holds: zero for unboxed
    /// primitives, `null` for everything else.
    #[must_use]
    pub fn default_for(descriptor: &TypeDescriptor) -> Value {
        match descriptor {
            TypeDescriptor::Primitive { kind, boxed: false } => match kind {
                PrimitiveKind::Boolean => Value::Bool(false),
                PrimitiveKind::Byte => Value::Byte(0),
                PrimitiveKind::Char => Value::Char('\0'),
                PrimitiveKind::Short => Value::Short(0),
                PrimitiveKind::Int => Value::Int(0),
                PrimitiveKind::Long => Value::Long(0),
                PrimitiveKind::Float => Value::Float(0.0),
                PrimitiveKind::Double => Value::Double(0.0),
                PrimitiveKind::String => Value::Null,
            },
            _ => Value::Null,
        }
    }

    /// Converts parsed JSON without any type information.
    #[must_use]
    pub fn from_json_untyped(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Long(i),
                None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::List(items.iter().map(Value::from_json_untyped).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json_untyped(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value as JSON. Objects become JSON objects of their fields;
    /// non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Byte(v) => Json::from(*v),
            Value::Char(c) => Json::String(c.to_string()),
            Value::Short(v) => Json::from(*v),
            Value::Int(v) => Json::from(*v),
            Value::Long(v) => Json::from(*v),
            // Widen through the shortest f32 text so 0.1f32 stays 0.1.
            Value::Float(v) => v
                .to_string()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or(Json::Null, Json::Number),
            Value::Double(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Object(obj) => Json::Object(
                obj.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// The runtime type name of this value.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "java.lang.Boolean",
            Value::Byte(_) => "java.lang.Byte",
            Value::Char(_) => "java.lang.Character",
            Value::Short(_) => "java.lang.Short",
            Value::Int(_) => "java.lang.Integer",
            Value::Long(_) => "java.lang.Long",
            Value::Float(_) => "java.lang.Float",
            Value::Double(_) => "java.lang.Double",
            Value::Str(_) => "java.lang.String",
            Value::List(_) => "java.util.ArrayList",
            Value::Map(_) => "java.util.LinkedHashMap",
            Value::Object(obj) => &obj.type_name,
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Boolean content.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral content widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric content widened to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// String content.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Sequence content.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mapping content.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Object content.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

fn is_whole(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16
}

fn write_float(f: &mut fmt::Formatter<'_>, v: impl fmt::Display, whole: bool) -> fmt::Result {
    if whole {
        write!(f, "{v}.0")
    } else {
        write!(f, "{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write_float(f, v, is_whole(f64::from(*v))),
            Value::Double(v) => write_float(f, v, is_whole(*v)),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (idx, (k, v)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                write!(f, "}}")
            }
            Value::Object(obj) => {
                let simple = obj.type_name.rsplit('.').next().unwrap_or(&obj.type_name);
                write!(f, "{simple}{{")?;
                for (idx, (k, v)) in obj.fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_follow_nullability() {
        let int = TypeDescriptor::primitive_of(PrimitiveKind::Int);
        assert_eq!(Value::default_for(&int), Value::Int(0));

        let boxed = TypeDescriptor::Primitive {
            kind: PrimitiveKind::Int,
            boxed: true,
        };
        assert_eq!(Value::default_for(&boxed), Value::Null);
        assert_eq!(Value::default_for(&TypeDescriptor::string()), Value::Null);
        assert_eq!(
            Value::default_for(&TypeDescriptor::named("svc.Item")),
            Value::Null
        );
    }

    #[test]
    fn untyped_json_numbers() {
        let value = Value::from_json_untyped(&json!([1, 2.5, "x", null, {"a": true}]));
        let items = value.as_list().unwrap();
        assert_eq!(items[0], Value::Long(1));
        assert_eq!(items[1], Value::Double(2.5));
        assert_eq!(items[2], Value::Str("x".into()));
        assert!(items[3].is_null());
        assert_eq!(
            items[4].as_map().and_then(|m| m.get("a")).and_then(Value::as_bool),
            Some(true)
        );
    }

    #[test]
    fn object_to_json() {
        let obj = Object::new("svc.Item").with_field("id", 1).with_field("name", "a");
        assert_eq!(Value::from(obj).to_json(), json!({"id": 1, "name": "a"}));
    }

    #[test]
    fn float_json_keeps_short_form() {
        assert_eq!(Value::Float(0.1).to_json(), json!(0.1));
        assert_eq!(Value::Float(1.1).to_json(), json!(1.1));
        assert_eq!(Value::Float(f32::NAN).to_json(), serde_json::Value::Null);
    }

    #[test]
    fn display_is_java_like() {
        assert_eq!(Value::Double(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Long(7).to_string(), "7");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Null]).to_string(),
            "[1, null]"
        );
        let obj = Object::new("svc.Item").with_field("id", 1);
        assert_eq!(Value::Object(obj).to_string(), "Item{id=1}");
    }

    #[test]
    fn accessors_widen() {
        assert_eq!(Value::Short(3).as_i64(), Some(3));
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Str("x".into()).as_i64(), None);
        assert_eq!(Value::Long(1).type_name(), "java.lang.Long");
    }
}

//! Strict parsing of primitive and boxed mock values.
//!
//! | Kind | Accepted text |
//! |------|---------------|
//! | `int`, `short`, `byte` | decimal integer in range |
//! | `long` | decimal integer, optional `L`/`l` suffix |
//! | `float` | decimal or exponent form, optional `f`/`F` suffix |
//! | `double` | decimal or exponent form, optional `d`/`D` suffix |
//! | `boolean` | `true` / `false`, any case |
//! | `char` | exactly one character |
//! | `String` | anything, verbatim |
//!
//! Surrounding whitespace is ignored for every kind except `String`.

use crate::{
    coercion::{CoercionError, CoercionResult},
    typesystem::PrimitiveKind,
    value::Value,
};

/// Parses `text` as a literal of `kind`.
///
/// # Errors
///
/// Returns [`CoercionError::PrimitiveParse`] if the text is not a valid
/// literal of the kind.
pub fn parse(text: &str, kind: PrimitiveKind) -> CoercionResult<Value> {
    if kind == PrimitiveKind::String {
        return Ok(Value::Str(text.to_string()));
    }

    let trimmed = text.trim();
    let fail = || CoercionError::PrimitiveParse {
        text: text.to_string(),
        target: kind.to_string(),
    };

    match kind {
        PrimitiveKind::Boolean => {
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(fail())
            }
        }
        PrimitiveKind::Byte => trimmed.parse().map(Value::Byte).map_err(|_| fail()),
        PrimitiveKind::Short => trimmed.parse().map(Value::Short).map_err(|_| fail()),
        PrimitiveKind::Int => trimmed.parse().map(Value::Int).map_err(|_| fail()),
        PrimitiveKind::Long => trimmed
            .strip_suffix(['L', 'l'])
            .unwrap_or(trimmed)
            .parse()
            .map(Value::Long)
            .map_err(|_| fail()),
        PrimitiveKind::Float => strip_float_suffix(trimmed, ['f', 'F'])
            .parse()
            .map(Value::Float)
            .map_err(|_| fail()),
        PrimitiveKind::Double => strip_float_suffix(trimmed, ['d', 'D'])
            .parse()
            .map(Value::Double)
            .map_err(|_| fail()),
        PrimitiveKind::Char => {
            let mut chars = trimmed.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(fail()),
            }
        }
        PrimitiveKind::String => Ok(Value::Str(text.to_string())),
    }
}

// "Infinity" and "NaN" must keep their last letter.
fn strip_float_suffix(text: &str, suffix: [char; 2]) -> &str {
    match text.strip_suffix(suffix) {
        Some(rest) if rest.ends_with(|c: char| c.is_ascii_digit() || c == '.') => rest,
        _ => text,
    }
}

/// Shapes a JSON scalar into `kind`, as used for object fields and list elements.
///
/// Numeric strings are accepted for numeric kinds, numbers are rendered as
/// text for `String`.
///
/// # Errors
///
/// Returns [`CoercionError::ShapeMismatch`] for arrays, objects, or scalars of
/// the wrong kind, and [`CoercionError::PrimitiveParse`] for unparsable text.
pub fn from_json(
    json: &serde_json::Value,
    kind: PrimitiveKind,
    path: &str,
) -> CoercionResult<Value> {
    use serde_json::Value as Json;

    let mismatch = |found: &str| CoercionError::ShapeMismatch {
        path: path.to_string(),
        expected: kind.to_string(),
        found: found.to_string(),
    };

    match json {
        Json::String(s) => parse(s, kind),
        Json::Bool(b) => match kind {
            PrimitiveKind::Boolean => Ok(Value::Bool(*b)),
            PrimitiveKind::String => Ok(Value::Str(b.to_string())),
            _ => Err(mismatch("boolean")),
        },
        Json::Number(n) => match kind {
            PrimitiveKind::Boolean | PrimitiveKind::Char => Err(mismatch("number")),
            PrimitiveKind::String => Ok(Value::Str(n.to_string())),
            PrimitiveKind::Float | PrimitiveKind::Double => parse(&n.to_string(), kind),
            _ => match n.as_i64() {
                Some(i) => parse(&i.to_string(), kind),
                None => Err(mismatch("fractional number")),
            },
        },
        Json::Array(_) => Err(mismatch("array")),
        Json::Object(_) => Err(mismatch("object")),
        Json::Null => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers() {
        assert_eq!(parse("5", PrimitiveKind::Int), Ok(Value::Int(5)));
        assert_eq!(parse(" -12 ", PrimitiveKind::Int), Ok(Value::Int(-12)));
        assert_eq!(parse("127", PrimitiveKind::Byte), Ok(Value::Byte(127)));
        assert!(parse("128", PrimitiveKind::Byte).is_err());
        assert!(parse("3000000000", PrimitiveKind::Int).is_err());
        assert!(parse("1.5", PrimitiveKind::Int).is_err());
        assert!(parse("", PrimitiveKind::Short).is_err());
    }

    #[test]
    fn long_suffix() {
        assert_eq!(parse("1L", PrimitiveKind::Long), Ok(Value::Long(1)));
        assert_eq!(parse("3000000000", PrimitiveKind::Long), Ok(Value::Long(3_000_000_000)));
        assert!(parse("1LL", PrimitiveKind::Long).is_err());
    }

    #[test]
    fn floats() {
        assert_eq!(parse("1.0f", PrimitiveKind::Float), Ok(Value::Float(1.0)));
        assert_eq!(parse("2.5", PrimitiveKind::Double), Ok(Value::Double(2.5)));
        assert_eq!(parse("1e3d", PrimitiveKind::Double), Ok(Value::Double(1000.0)));
        assert!(matches!(
            parse("Infinity", PrimitiveKind::Double),
            Ok(Value::Double(v)) if v.is_infinite()
        ));
        assert!(parse("one", PrimitiveKind::Double).is_err());
    }

    #[test]
    fn booleans_are_strict() {
        assert_eq!(parse("TRUE", PrimitiveKind::Boolean), Ok(Value::Bool(true)));
        assert_eq!(parse("false", PrimitiveKind::Boolean), Ok(Value::Bool(false)));
        assert!(parse("yes", PrimitiveKind::Boolean).is_err());
        assert!(parse("1", PrimitiveKind::Boolean).is_err());
    }

    #[test]
    fn chars_and_strings() {
        assert_eq!(parse("x", PrimitiveKind::Char), Ok(Value::Char('x')));
        assert!(parse("xy", PrimitiveKind::Char).is_err());
        assert_eq!(parse(" a b ", PrimitiveKind::String), Ok(Value::Str(" a b ".into())));
    }

    #[test]
    fn json_scalars() {
        assert_eq!(from_json(&json!(7), PrimitiveKind::Int, "$"), Ok(Value::Int(7)));
        assert_eq!(from_json(&json!("7"), PrimitiveKind::Long, "$"), Ok(Value::Long(7)));
        assert_eq!(from_json(&json!(7), PrimitiveKind::Double, "$"), Ok(Value::Double(7.0)));
        assert_eq!(from_json(&json!(7), PrimitiveKind::String, "$"), Ok(Value::Str("7".into())));
        assert!(matches!(
            from_json(&json!("x"), PrimitiveKind::Int, "$.id"),
            Err(CoercionError::PrimitiveParse { .. })
        ));
        assert!(matches!(
            from_json(&json!([1]), PrimitiveKind::Int, "$.id"),
            Err(CoercionError::ShapeMismatch { path, .. }) if path == "$.id"
        ));
        assert!(from_json(&json!(1.5), PrimitiveKind::Int, "$").is_err());
    }
}

//! Return-type inference for rules that do not declare one.

/// Infers a return-type descriptor from a mock literal.
///
/// | Literal | Inferred |
/// |---------|----------|
/// | absent or empty | `java.lang.Object` |
/// | starts with `[` | `java.util.List` |
/// | `true` / `false` | `boolean` |
/// | fits a 32-bit integer | `int` |
/// | anything else | `java.lang.String` |
///
/// This is lossy: `long` values that fit in 32 bits come back as `int`, values
/// outside that range and JSON objects come back as `java.lang.String`.
/// Rules that need those types must declare them.
#[must_use]
pub fn infer_return_type(literal: Option<&str>) -> &'static str {
    match literal {
        None | Some("") => "java.lang.Object",
        Some(text) if text.starts_with('[') => "java.util.List",
        Some("true" | "false") => "boolean",
        Some(text) if text.parse::<i32>().is_ok() => "int",
        Some(_) => "java.lang.String",
    }
}

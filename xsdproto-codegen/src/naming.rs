//! Identifier conversions from XSD names to proto3 names.

/// Converts a string to snake_case.
///
/// Every uppercase character after the first is preceded by an
/// underscore, so `ISRC` becomes `i_s_r_c`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Message or enum name for an XSD type name.
#[must_use]
pub fn type_name(xsd_name: &str) -> String {
    to_pascal_case(xsd_name)
}

/// Field name for an XSD element or attribute name.
#[must_use]
pub fn field_name(xsd_name: &str) -> String {
    to_snake_case(xsd_name)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Member prefix for an enum, e.g. `ReleaseType` → `RELEASE_TYPE`.
#[must_use]
pub fn enum_prefix(xsd_name: &str) -> String {
    enum_value_token(&to_snake_case(xsd_name))
}

/// Sanitizes an enumeration literal into an enum-member-safe token.
///
/// The literal is uppercased, punctuation becomes `_` (`+` and `&` are
/// spelled out), anything else outside `[A-Z0-9_]` is dropped, repeated
/// underscores are collapsed and a leading digit gets an `E_` prefix.
#[must_use]
pub fn enum_value_token(value: &str) -> String {
    let mut upper = String::with_capacity(value.len());
    for c in value.to_uppercase().chars() {
        match c {
            '-' | ' ' | '.' | '/' | '(' | ')' | '\'' | '"' | ':' | ',' => upper.push('_'),
            '+' => upper.push_str("_PLUS_"),
            '&' => upper.push_str("_AND_"),
            c if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' => upper.push(c),
            _ => {}
        }
    }

    let mut out = String::with_capacity(upper.len());
    for c in upper.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    let mut out = out.trim_matches('_').to_string();

    if out.is_empty() {
        out = "UNKNOWN".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "E_");
    }
    out
}

//! Swift identifier sanitizing and casing.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Swift reserved words that cannot be used as bare identifiers.
pub static SWIFT_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "associatedtype",
        "class",
        "deinit",
        "enum",
        "extension",
        "fileprivate",
        "func",
        "import",
        "init",
        "inout",
        "internal",
        "let",
        "open",
        "operator",
        "private",
        "protocol",
        "public",
        "rethrows",
        "static",
        "struct",
        "subscript",
        "typealias",
        "var",
        "break",
        "case",
        "continue",
        "default",
        "defer",
        "do",
        "else",
        "fallthrough",
        "for",
        "guard",
        "if",
        "in",
        "repeat",
        "return",
        "switch",
        "where",
        "while",
        "as",
        "catch",
        "false",
        "is",
        "nil",
        "super",
        "self",
        "Self",
        "throw",
        "throws",
        "true",
        "try",
        "Any",
        "Type",
        "Protocol",
    ]
    .into_iter()
    .collect()
});

/// Split a raw name on the separators JSON:API names tend to carry.
fn words(name: &str) -> Vec<&str> {
    name.split(['-', '.', ' ', '_', '/', ':'])
        .filter(|part| !part.is_empty())
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Sanitize a raw name into a lowerCamelCase Swift member identifier.
/// - Splits on `-`, `.`, ` `, `_`, `/`, `:`
/// - Prepends `_` if the result starts with a digit
/// - Wraps reserved words in backticks
pub fn member_identifier(name: &str) -> String {
    let parts = words(name);
    if parts.is_empty() {
        return "_empty".to_string();
    }

    let mut result = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                result.extend(first.to_lowercase());
                result.push_str(chars.as_str());
            }
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }

    if SWIFT_RESERVED_WORDS.contains(result.as_str()) {
        result = format!("`{result}`");
    }

    result
}

/// Sanitize a raw name into an UpperCamelCase Swift type identifier.
///
/// Type-name identity in the generator is this derived identifier, not the
/// raw JSON type string, so `"Widgets"` and `"widgets"` collide on purpose.
pub fn type_identifier(name: &str) -> String {
    let parts = words(name);
    if parts.is_empty() {
        return "Unknown".to_string();
    }

    let mut result: String = parts.iter().map(|part| capitalize_first(part)).collect();

    if result.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        result = format!("_{result}");
    }

    result
}

/// Escape a string for a Swift string literal.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

use heck::{ToLowerCamelCase, ToUpperCamelCase};

/// Words that cannot be used as Dart identifiers.
const DART_RESERVED: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

/// Convert a table or type name to a Dart class name.
/// e.g. "user_profiles" -> "UserProfiles", "task" -> "Task"
pub fn type_to_class_name(name: &str) -> String {
    let class_name = name.to_upper_camel_case();
    if class_name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("T{class_name}")
    } else {
        class_name
    }
}

/// Convert a column, attribute, or enum value to a Dart member name.
/// e.g. "created_at" -> "createdAt", "class" -> "class_"
pub fn to_member_name(name: &str) -> String {
    let member = name.to_lower_camel_case();
    if member.is_empty() {
        return "value".to_string();
    }
    if member.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("v{member}");
    }
    if DART_RESERVED.contains(&member.as_str()) {
        format!("{member}_")
    } else {
        member
    }
}

/// Escape a string for a single-quoted Dart literal.
pub fn escape_dart_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('$', "\\$")
        .replace('\n', "\\n")
}

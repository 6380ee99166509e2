use crate::naming::{escape_dart_string, to_member_name, type_to_class_name};
use crate::typemap::{EnumType, ObjectType, TargetType};

use super::{render_class, ClassField};

/// Enum member names that clash with what every generated enum declares.
const ENUM_RESERVED: &[&str] = &["value", "values", "index", "name", "fromValue", "label"];

/// Render the Dart declaration for an enum, composite, or schema-derived type.
/// Other types need no declaration and render as `None`.
pub fn render_declaration(ty: &TargetType) -> Option<String> {
    match ty {
        TargetType::Enum(e) => Some(render_enum(e)),
        TargetType::Composite(object) | TargetType::SchemaObject(object) => {
            Some(render_object(object))
        }
        _ => None,
    }
}

fn enum_member_name(value: &str) -> String {
    let member = to_member_name(value);
    if ENUM_RESERVED.contains(&member.as_str()) {
        format!("{member}_")
    } else {
        member
    }
}

fn render_enum(e: &EnumType) -> String {
    let class_name = type_to_class_name(&e.name);
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("enum {class_name} {{"));
    let last = e.values.len().saturating_sub(1);
    for (i, value) in e.values.iter().enumerate() {
        let terminator = if i == last { ';' } else { ',' };
        lines.push(format!(
            "  {}('{}'){terminator}",
            enum_member_name(value),
            escape_dart_string(value)
        ));
    }
    lines.push(String::new());
    lines.push(format!("  const {class_name}(this.value);"));
    lines.push(String::new());
    lines.push("  final String value;".to_string());
    lines.push(String::new());
    lines.push(format!("  static {class_name} fromValue(String value) =>"));
    lines.push("      values.firstWhere((e) => e.value == value);".to_string());

    if let Some(ref translations) = e.translations {
        lines.push(String::new());
        lines.push("  static const Map<String, Map<String, String>> _labels = {".to_string());
        for (locale, labels) in translations {
            lines.push(format!("    '{}': {{", escape_dart_string(locale)));
            for (value, label) in labels {
                lines.push(format!(
                    "      '{}': '{}',",
                    escape_dart_string(value),
                    escape_dart_string(label)
                ));
            }
            lines.push("    },".to_string());
        }
        lines.push("  };".to_string());
        lines.push(String::new());
        lines.push("  String label(String locale) => _labels[locale]?[value] ?? value;".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn render_object(object: &ObjectType) -> String {
    let fields: Vec<ClassField> = object
        .fields
        .iter()
        .map(|f| ClassField::new(&f.name, f.ty.clone()))
        .collect();
    render_class(&object.name, None, &fields, &[])
}

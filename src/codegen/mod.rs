pub mod declarations;
pub mod models;

use crate::cli::GeneratorOptions;
use crate::naming::{escape_dart_string, to_member_name, type_to_class_name};
use crate::resolve::Resolution;
use crate::schema::IntrospectedSchema;
use crate::typemap::TargetType;

/// Trait for code generators.
pub trait Generator {
    fn generate(
        &self,
        schema: &IntrospectedSchema,
        resolution: &Resolution,
        options: &GeneratorOptions,
    ) -> String;
}

/// One field of a generated Dart class.
#[derive(Debug, Clone)]
pub struct ClassField {
    /// Key in the JSON object, i.e. the column or attribute name.
    pub key: String,
    pub ty: TargetType,
    pub doc: Option<String>,
}

impl ClassField {
    pub fn new(key: &str, ty: TargetType) -> Self {
        Self {
            key: key.to_string(),
            ty,
            doc: None,
        }
    }

    pub fn member(&self) -> String {
        to_member_name(&self.key)
    }
}

/// Render `///` doc lines at the given indent.
pub fn doc_lines(doc: &str, indent: &str) -> Vec<String> {
    doc.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                format!("{indent}///")
            } else {
                format!("{indent}/// {line}")
            }
        })
        .collect()
}

/// Render an immutable Dart class with `fromJson`/`toJson`. `members` are appended verbatim
/// at the end of the class body.
pub fn render_class(
    name: &str,
    doc: Option<&str>,
    fields: &[ClassField],
    members: &[String],
) -> String {
    let class_name = type_to_class_name(name);
    let mut lines: Vec<String> = Vec::new();

    if let Some(doc) = doc {
        lines.extend(doc_lines(doc, ""));
    }
    lines.push(format!("class {class_name} {{"));

    // Constructor
    if fields.is_empty() {
        lines.push(format!("  const {class_name}();"));
    } else {
        lines.push(format!("  const {class_name}({{"));
        for field in fields {
            let required = if field.ty.is_nullable() { "" } else { "required " };
            lines.push(format!("    {required}this.{},", field.member()));
        }
        lines.push("  });".to_string());
    }

    // Fields
    if !fields.is_empty() {
        lines.push(String::new());
    }
    for field in fields {
        if let Some(ref doc) = field.doc {
            lines.extend(doc_lines(doc, "  "));
        }
        lines.push(format!("  final {} {};", field.ty.type_name(), field.member()));
    }

    // fromJson
    lines.push(String::new());
    lines.push(format!(
        "  factory {class_name}.fromJson(Map<String, dynamic> json) => {class_name}("
    ));
    for field in fields {
        let value = format!("json['{}']", escape_dart_string(&field.key));
        lines.push(format!("        {}: {},", field.member(), field.ty.decode(&value)));
    }
    lines.push("      );".to_string());

    // toJson
    lines.push(String::new());
    lines.push("  Map<String, dynamic> toJson() => {".to_string());
    for field in fields {
        lines.push(format!(
            "        '{}': {},",
            escape_dart_string(&field.key),
            field.ty.encode(&field.member())
        ));
    }
    lines.push("      };".to_string());

    for member in members {
        lines.push(String::new());
        lines.push(member.clone());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

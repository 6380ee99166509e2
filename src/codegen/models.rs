use crate::cli::GeneratorOptions;
use crate::codegen::declarations::render_declaration;
use crate::codegen::{render_class, ClassField, Generator};
use crate::naming::{escape_dart_string, to_member_name};
use crate::resolve::{ColumnType, Resolution};
use crate::schema::{IntrospectedSchema, SchemaColumn, TableInfo};
use crate::typemap::TargetType;

const HEADER: &str = "// Generated by pgdart. Do not edit by hand.";

/// Generates one Dart library: type declarations, then a model class per table and view.
pub struct DartGenerator;

impl Generator for DartGenerator {
    fn generate(
        &self,
        schema: &IntrospectedSchema,
        resolution: &Resolution,
        options: &GeneratorOptions,
    ) -> String {
        let mut header = HEADER.to_string();
        if !schema.schemas.is_empty() {
            let names: Vec<&str> = schema.schemas.iter().map(|s| s.name.as_str()).collect();
            header.push_str(&format!("\n// Schemas: {}", names.join(", ")));
        }
        let mut blocks: Vec<String> = vec![header];

        blocks.extend(resolution.declarations.iter().filter_map(render_declaration));

        let mut tables: Vec<&TableInfo> = schema.tables.iter().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        let mut views: Vec<&TableInfo> = schema.views.iter().collect();
        views.sort_by(|a, b| a.name.cmp(&b.name));

        for table in tables {
            let columns = schema.columns_of(table.id);
            blocks.push(generate_model(table, &columns, resolution, options, true));
        }
        for view in views {
            let columns = schema.columns_of(view.id);
            blocks.push(generate_model(view, &columns, resolution, options, false));
        }

        let mut output = blocks.join("\n\n");
        output.push('\n');
        output
    }
}

fn generate_model(
    table: &TableInfo,
    columns: &[&SchemaColumn],
    resolution: &Resolution,
    options: &GeneratorOptions,
    insertable: bool,
) -> String {
    let typed: Vec<(&SchemaColumn, ColumnType)> = columns
        .iter()
        .map(|col| (*col, resolution.column_type(col)))
        .collect();

    let fields: Vec<ClassField> = typed
        .iter()
        .map(|(col, types)| ClassField {
            key: col.name.clone(),
            ty: types.row.clone(),
            doc: col.comment.clone().filter(|_| !options.nocomments),
        })
        .collect();

    let mut members = vec![format!(
        "  static const String schemaName = '{}';\n  static const String tableName = '{}';",
        escape_dart_string(&table.schema),
        escape_dart_string(&table.name)
    )];
    if insertable && !options.noinsert {
        members.push(render_insert(&typed));
    }

    let doc = table.comment.as_deref().filter(|_| !options.nocomments);
    render_class(&table.name, doc, &fields, &members)
}

/// A static builder for the JSON body of an insert. Columns the server can fill in are
/// optional parameters and are left out of the body when not given.
fn render_insert(typed: &[(&SchemaColumn, ColumnType)]) -> String {
    let mut lines: Vec<String> = Vec::new();
    if typed.is_empty() {
        lines.push("  static Map<String, dynamic> insert() => {};".to_string());
        return lines.join("\n");
    }

    lines.push("  static Map<String, dynamic> insert({".to_string());
    for (col, types) in typed {
        let required = if types.insert.is_nullable() { "" } else { "required " };
        lines.push(format!(
            "    {required}{} {},",
            types.insert.type_name(),
            to_member_name(&col.name)
        ));
    }
    lines.push("  }) =>".to_string());
    lines.push("      {".to_string());
    for (col, types) in typed {
        let member = to_member_name(&col.name);
        let key = escape_dart_string(&col.name);
        match &types.insert {
            // Parameters are locals, so the null check promotes them.
            TargetType::Nullable(inner) => lines.push(format!(
                "        if ({member} != null) '{key}': {},",
                inner.encode(&member)
            )),
            other => lines.push(format!("        '{key}': {},", other.encode(&member))),
        }
    }
    lines.push("      };".to_string());
    lines.join("\n")
}

pub mod collect;
pub mod graph;
pub mod json_schema;
pub mod mapper;
pub mod registry;

use std::fmt;

use serde_json::Value;

use crate::error::CodegenError;
use crate::schema::{IntrospectedSchema, SchemaColumn};
use crate::typemap::{Field, ObjectType, TargetType};

use self::collect::collect_required_types;
use self::json_schema::{extract_schema_literal, JsonSchemaTypeBuilder};
use self::mapper::{fallback_for_format, map_type};
use self::registry::TypeRegistry;

/// A non-fatal problem found while resolving types. Resolution carries on with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The type, column, or schema property the message is about.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(subject: &str, message: impl Into<String>) -> Self {
        Self {
            subject: subject.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Locales an enum translation comment must provide.
    pub locales: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string()],
        }
    }
}

/// The outcome of one resolution pass over a schema snapshot.
#[derive(Debug)]
pub struct Resolution {
    pub registry: TypeRegistry,
    /// Enums and classes to declare, each after everything it refers to.
    pub declarations: Vec<TargetType>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The Dart types of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    /// The column's type, ignoring nullability.
    pub base: TargetType,
    /// As read from the table: nullable if the column is.
    pub row: TargetType,
    /// As passed on insert: also nullable if the server can fill the value in.
    pub insert: TargetType,
}

impl ColumnType {
    pub fn for_column(base: TargetType, column: &SchemaColumn) -> Self {
        let row = if column.is_nullable {
            TargetType::nullable(base.clone())
        } else {
            base.clone()
        };
        let insert = if column.is_generated || column.is_identity || column.default_value.is_some()
        {
            TargetType::nullable(row.clone())
        } else {
            row.clone()
        };
        Self { base, row, insert }
    }
}

impl Resolution {
    /// Types for `column`: its JSON-schema override, else its catalog type, else a best guess
    /// from the format name.
    pub fn column_type(&self, column: &SchemaColumn) -> ColumnType {
        let base = self
            .registry
            .column_override(column.table_id, &column.name)
            .or_else(|| self.registry.get_catalog_type(&column.format))
            .cloned()
            .unwrap_or_else(|| fallback_for_format(&column.format));
        ColumnType::for_column(base, column)
    }
}

/// Resolve every type the schema's columns need, in one pass.
///
/// Fails only when composite types reference each other in a cycle.
pub fn resolve(
    schema: &IntrospectedSchema,
    options: &ResolveOptions,
) -> Result<Resolution, CodegenError> {
    let mut diagnostics = Vec::new();
    let required = collect_required_types(&schema.types, &schema.columns, &mut diagnostics)?;

    let mut registry = TypeRegistry::new();
    let mut declarations = Vec::new();
    for ty in &required {
        let target = map_type(ty, &registry, options, &mut diagnostics);
        if target.declaration_name().is_some() {
            add_declaration(&mut declarations, target.clone(), &mut diagnostics);
        }
        registry.register(ty.id, &ty.name, target);
    }

    for column in &schema.columns {
        let Some(literal) = column.check.as_deref().and_then(extract_schema_literal) else {
            continue;
        };
        let document: Value = match serde_json::from_str(&literal) {
            Ok(document) => document,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    &column.name,
                    format!("embedded JSON schema does not parse: {e}"),
                ));
                continue;
            }
        };
        let target = JsonSchemaTypeBuilder::new(&mut registry, &mut diagnostics)
            .build(&document, Some(&column.name));
        let prefix = relation_name(schema, column.table_id);
        let target = declare_schema_objects(&target, &prefix, &mut declarations);
        registry.override_column(column.table_id, &column.name, target);
    }

    Ok(Resolution {
        registry,
        declarations,
        diagnostics,
    })
}

fn relation_name(schema: &IntrospectedSchema, table_id: i64) -> String {
    schema
        .tables
        .iter()
        .chain(schema.views.iter())
        .find(|t| t.id == table_id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("t{table_id}"))
}

/// Declare the schema-derived objects reachable from `ty`, nested ones first, and return `ty`
/// with their final names. An object whose name is already declared with another shape is
/// renamed `<prefix>_<name>`, numbered if that is taken as well.
fn declare_schema_objects(
    ty: &TargetType,
    prefix: &str,
    declarations: &mut Vec<TargetType>,
) -> TargetType {
    match ty {
        TargetType::List(inner) => {
            TargetType::list(declare_schema_objects(inner, prefix, declarations))
        }
        TargetType::Nullable(inner) => {
            TargetType::nullable(declare_schema_objects(inner, prefix, declarations))
        }
        TargetType::SchemaObject(object) => {
            let fields = object
                .fields
                .iter()
                .map(|field| Field {
                    name: field.name.clone(),
                    ty: declare_schema_objects(&field.ty, prefix, declarations),
                })
                .collect();
            let mut candidate = ObjectType {
                name: object.name.clone(),
                fields,
            };
            let mut attempt = 0;
            loop {
                let declared = TargetType::SchemaObject(candidate.clone());
                let existing = declarations
                    .iter()
                    .find(|d| d.declaration_name() == Some(candidate.name.as_str()))
                    .cloned();
                match existing {
                    None => {
                        declarations.push(declared.clone());
                        return declared;
                    }
                    Some(existing) if existing == declared => return declared,
                    Some(_) => {
                        attempt += 1;
                        candidate.name = if attempt == 1 {
                            format!("{prefix}_{}", object.name)
                        } else {
                            format!("{prefix}_{}_{attempt}", object.name)
                        };
                    }
                }
            }
        }
        other => other.clone(),
    }
}

/// Add a declaration unless one with the same name exists. Differing shapes under one name
/// keep the first and are reported.
fn add_declaration(
    declarations: &mut Vec<TargetType>,
    ty: TargetType,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(name) = ty.declaration_name() else {
        return;
    };
    match declarations
        .iter()
        .find(|d| d.declaration_name() == Some(name))
    {
        Some(existing) if *existing == ty => {}
        Some(_) => diagnostics.push(Diagnostic::new(
            name,
            "conflicting declarations share this name, keeping the first",
        )),
        None => declarations.push(ty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaColumn, TableInfo};
    use crate::testutil::{builtin_types, composite_type, enum_type, test_column, typed_column};
    use crate::typemap::{EnumType, ScalarKind};

    fn schema_with(types: Vec<crate::schema::SchemaType>, columns: Vec<SchemaColumn>) -> IntrospectedSchema {
        IntrospectedSchema {
            tables: vec![TableInfo {
                id: 1,
                schema: "public".to_string(),
                name: "tasks".to_string(),
                comment: None,
            }],
            columns,
            types,
            ..Default::default()
        }
    }

    fn status_enum() -> TargetType {
        TargetType::Enum(EnumType {
            name: "status".to_string(),
            values: vec!["active".to_string(), "done".to_string()],
            translations: None,
        })
    }

    #[test]
    fn test_end_to_end_enum_and_composite() {
        let schema = schema_with(
            vec![
                enum_type(1, "status", &["active", "done"]),
                composite_type(2, "task", &[("status", 1)]),
            ],
            vec![typed_column("status_col", "task")],
        );
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        let task = TargetType::Composite(ObjectType {
            name: "task".to_string(),
            fields: vec![Field {
                name: "status".to_string(),
                ty: status_enum(),
            }],
        });
        assert_eq!(resolution.declarations, vec![status_enum(), task.clone()]);
        assert_eq!(resolution.registry.get(1), Some(&status_enum()));
        assert_eq!(resolution.registry.get_by_name("task"), Some(&task));
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_every_collected_type_is_registered() {
        let mut types = builtin_types();
        types.push(enum_type(50, "mood", &["happy"]));
        types.push(crate::testutil::test_type(51, "_mood"));
        let schema = schema_with(
            types,
            vec![
                typed_column("moods", "_mood"),
                typed_column("at", "timestamptz"),
                typed_column("ids", "_int4"),
            ],
        );
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        for name in ["mood", "_mood", "timestamptz", "int4", "_int4"] {
            assert!(resolution.registry.get_by_name(name).is_some(), "{name}");
        }
        assert_eq!(
            resolution.registry.get(51).map(TargetType::type_name).as_deref(),
            Some("List<Mood>")
        );
    }

    #[test]
    fn test_cycle_aborts() {
        let schema = schema_with(
            vec![
                composite_type(1, "a", &[("b", 2)]),
                composite_type(2, "b", &[("a", 1)]),
            ],
            vec![typed_column("x", "a")],
        );
        let err = resolve(&schema, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, CodegenError::CircularDependency(_)));
    }

    #[test]
    fn test_json_schema_overrides_column() {
        let check = r#"CHECK (jsonb_matches_schema('{"type": "object", "properties": {"theme": {"type": "string"}}, "required": ["theme"]}'::json, settings))"#;
        let column = SchemaColumn {
            check: Some(check.to_string()),
            ..typed_column("settings", "jsonb")
        };
        let schema = schema_with(builtin_types(), vec![column.clone()]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();

        let expected = TargetType::SchemaObject(ObjectType {
            name: "settings".to_string(),
            fields: vec![Field {
                name: "theme".to_string(),
                ty: TargetType::Scalar(ScalarKind::String),
            }],
        });
        assert_eq!(resolution.registry.column_override(1, "settings"), Some(&expected));
        assert_eq!(resolution.column_type(&column).base, expected);
        assert_eq!(resolution.declarations, vec![expected]);
        // The catalog entry for jsonb is untouched.
        assert_eq!(resolution.registry.get_by_name("jsonb"), Some(&TargetType::Map));
    }

    #[test]
    fn test_unparseable_embedded_schema_keeps_catalog_type() {
        let column = SchemaColumn {
            check: Some("CHECK (jsonb_matches_schema('{not json}'::json, data))".to_string()),
            ..typed_column("data", "jsonb")
        };
        let schema = schema_with(builtin_types(), vec![column.clone()]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        assert_eq!(resolution.column_type(&column).base, TargetType::Map);
        assert_eq!(resolution.diagnostics.len(), 1);
    }

    #[test]
    fn test_nested_schema_objects_declared_first() {
        let check = r#"CHECK (jsonb_matches_schema('{"type": "object", "properties": {"address": {"type": "object", "properties": {"city": {"type": "string"}}}}}'::json, profile))"#;
        let column = SchemaColumn {
            check: Some(check.to_string()),
            ..typed_column("profile", "jsonb")
        };
        let schema = schema_with(builtin_types(), vec![column]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        let names: Vec<&str> = resolution
            .declarations
            .iter()
            .filter_map(TargetType::declaration_name)
            .collect();
        assert_eq!(names, vec!["address", "profile"]);
    }

    #[test]
    fn test_insert_variant_is_independent() {
        let column = SchemaColumn {
            default_value: Some("now()".to_string()),
            ..typed_column("created_at", "timestamptz")
        };
        let schema = schema_with(builtin_types(), vec![column.clone()]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        let types = resolution.column_type(&column);
        assert_eq!(types.row, TargetType::Temporal);
        assert_eq!(types.insert, TargetType::nullable(TargetType::Temporal));
        // Deriving the insert variant leaves the registry alone.
        assert_eq!(resolution.registry.get_by_name("timestamptz"), Some(&TargetType::Temporal));
    }

    #[test]
    fn test_column_type_nullability() {
        let nullable = SchemaColumn {
            is_nullable: true,
            is_identity: true,
            ..test_column("parent_id")
        };
        let types = ColumnType::for_column(TargetType::Scalar(ScalarKind::Int), &nullable);
        assert_eq!(types.row.type_name(), "int?");
        assert_eq!(types.insert, types.row);

        let generated = SchemaColumn {
            is_generated: true,
            ..test_column("total")
        };
        let types = ColumnType::for_column(TargetType::Scalar(ScalarKind::Int), &generated);
        assert_eq!(types.row.type_name(), "int");
        assert_eq!(types.insert.type_name(), "int?");
    }

    #[test]
    fn test_unknown_format_falls_back() {
        let column = typed_column("tags", "_varchar");
        let schema = schema_with(builtin_types(), vec![column.clone()]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        assert_eq!(resolution.column_type(&column).base.type_name(), "List<String>");
        assert_eq!(resolution.diagnostics.len(), 1);
    }

    #[test]
    fn test_conflicting_declarations_reported() {
        let mut declarations = vec![status_enum()];
        let mut diagnostics = Vec::new();
        add_declaration(&mut declarations, status_enum(), &mut diagnostics);
        assert!(diagnostics.is_empty());
        add_declaration(
            &mut declarations,
            TargetType::SchemaObject(ObjectType {
                name: "status".to_string(),
                fields: vec![],
            }),
            &mut diagnostics,
        );
        assert_eq!(declarations.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "status: conflicting declarations share this name, keeping the first"
        );
    }

    fn schema_column(table_id: i64, name: &str, schema: &str) -> SchemaColumn {
        SchemaColumn {
            table_id,
            check: Some(format!("CHECK (jsonb_matches_schema('{schema}'::json, {name}))")),
            ..typed_column(name, "jsonb")
        }
    }

    #[test]
    fn test_property_names_do_not_shadow_column_formats() {
        let profile = schema_column(
            1,
            "profile",
            r#"{"type": "object", "properties": {"date": {"type": "string"}}}"#,
        );
        let born = typed_column("born", "date");
        let schema = schema_with(Vec::new(), vec![profile, born.clone()]);
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();
        let types = resolution.column_type(&born);
        assert_eq!(types.row, TargetType::Temporal);
        assert_eq!(types.row.type_name(), "DateTime");
    }

    #[test]
    fn test_same_column_name_in_two_tables() {
        let mut schema = schema_with(
            builtin_types(),
            vec![
                schema_column(
                    1,
                    "metadata",
                    r#"{"type": "object", "properties": {"x": {"type": "integer"}}, "required": ["x"]}"#,
                ),
                schema_column(
                    2,
                    "metadata",
                    r#"{"type": "object", "properties": {"y": {"type": "boolean"}}, "required": ["y"]}"#,
                ),
                schema_column(
                    3,
                    "metadata",
                    r#"{"type": "object", "properties": {"x": {"type": "integer"}}, "required": ["x"]}"#,
                ),
            ],
        );
        for (id, name) in [(2, "events"), (3, "notes")] {
            schema.tables.push(TableInfo {
                id,
                schema: "public".to_string(),
                name: name.to_string(),
                comment: None,
            });
        }
        let resolution = resolve(&schema, &ResolveOptions::default()).unwrap();

        let names: Vec<&str> = resolution
            .declarations
            .iter()
            .filter_map(TargetType::declaration_name)
            .collect();
        assert_eq!(names, vec!["metadata", "events_metadata"]);

        let events = resolution.registry.column_override(2, "metadata").unwrap();
        assert_eq!(events.type_name(), "EventsMetadata");
        assert_eq!(
            events,
            &TargetType::SchemaObject(ObjectType {
                name: "events_metadata".to_string(),
                fields: vec![Field {
                    name: "y".to_string(),
                    ty: TargetType::Scalar(ScalarKind::Bool),
                }],
            })
        );
        // An identical shape reuses the existing class.
        let notes = resolution.registry.column_override(3, "metadata").unwrap();
        assert_eq!(notes.type_name(), "Metadata");
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_renamed_name_taken_gets_numbered() {
        let mut declarations = vec![
            TargetType::SchemaObject(ObjectType {
                name: "meta".to_string(),
                fields: vec![],
            }),
            TargetType::SchemaObject(ObjectType {
                name: "a_meta".to_string(),
                fields: vec![Field {
                    name: "k".to_string(),
                    ty: TargetType::Map,
                }],
            }),
        ];
        let incoming = TargetType::nullable(TargetType::SchemaObject(ObjectType {
            name: "meta".to_string(),
            fields: vec![Field {
                name: "v".to_string(),
                ty: TargetType::Temporal,
            }],
        }));
        let declared = declare_schema_objects(&incoming, "a", &mut declarations);
        assert_eq!(declared.type_name(), "AMeta2?");
        assert_eq!(declarations.len(), 3);
    }
}

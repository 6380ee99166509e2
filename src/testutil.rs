use crate::schema::{SchemaColumn, SchemaType, TypeAttribute};

/// Create a SchemaColumn with sensible defaults for testing.
/// Returns a non-nullable int4 column on table 1 with no default, no identity, and no check.
pub fn test_column(name: &str) -> SchemaColumn {
    SchemaColumn {
        table_id: 1,
        name: name.to_string(),
        ordinal_position: 1,
        format: "int4".to_string(),
        is_nullable: false,
        is_generated: false,
        is_identity: false,
        default_value: None,
        check: None,
        comment: None,
    }
}

/// Create a column of the given type.
pub fn typed_column(name: &str, format: &str) -> SchemaColumn {
    SchemaColumn {
        format: format.to_string(),
        ..test_column(name)
    }
}

/// Create a plain (scalar) catalog type.
pub fn test_type(id: i64, name: &str) -> SchemaType {
    SchemaType {
        id,
        name: name.to_string(),
        attributes: Vec::new(),
        enums: Vec::new(),
        comment: None,
    }
}

pub fn enum_type(id: i64, name: &str, values: &[&str]) -> SchemaType {
    SchemaType {
        enums: values.iter().map(|v| v.to_string()).collect(),
        ..test_type(id, name)
    }
}

/// Composite type whose attributes are `(name, type_id)` pairs.
pub fn composite_type(id: i64, name: &str, attrs: &[(&str, i64)]) -> SchemaType {
    SchemaType {
        attributes: attrs
            .iter()
            .map(|(n, t)| TypeAttribute {
                name: n.to_string(),
                type_id: *t,
            })
            .collect(),
        ..test_type(id, name)
    }
}

/// A small slice of pg_catalog with ids matching PostgreSQL's own oids.
pub fn builtin_types() -> Vec<SchemaType> {
    vec![
        test_type(16, "bool"),
        test_type(20, "int8"),
        test_type(23, "int4"),
        test_type(25, "text"),
        test_type(701, "float8"),
        test_type(1007, "_int4"),
        test_type(1009, "_text"),
        test_type(1184, "timestamptz"),
        test_type(1186, "interval"),
        test_type(3802, "jsonb"),
    ]
}

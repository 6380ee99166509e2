use std::fs;
use std::path::Path;

use crate::error::CodegenError;
use crate::schema::IntrospectedSchema;

/// Load an introspection snapshot previously saved as JSON.
pub fn load(path: &Path) -> Result<IntrospectedSchema, CodegenError> {
    let raw = fs::read_to_string(path)?;
    let schema = parse(&raw)?;
    tracing::debug!(
        "Loaded snapshot {}: {} tables, {} views, {} types",
        path.display(),
        schema.tables.len(),
        schema.views.len(),
        schema.types.len()
    );
    Ok(schema)
}

fn parse(raw: &str) -> Result<IntrospectedSchema, CodegenError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snapshot() {
        let schema = parse(
            r#"{
                "schemas": [{"name": "public"}],
                "views": [{"id": 5, "schema": "public", "name": "v", "comment": "A view."}],
                "types": [{"id": 30, "name": "mood", "enums": ["sad", "ok"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(schema.schemas[0].name, "public");
        assert_eq!(schema.views[0].comment.as_deref(), Some("A view."));
        assert_eq!(schema.types[0].enums, vec!["sad", "ok"]);
        assert!(schema.tables.is_empty());
    }

    #[test]
    fn test_invalid_snapshot() {
        assert!(matches!(parse("{\"tables\": 3}"), Err(CodegenError::Snapshot(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/nonexistent/pgdart-snapshot.json")).unwrap_err();
        assert!(matches!(err, CodegenError::Io(_)));
    }
}

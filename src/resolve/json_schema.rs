use serde_json::{Map, Value};

use crate::typemap::{Field, ObjectType, ScalarKind, TargetType};

use super::registry::TypeRegistry;
use super::Diagnostic;

/// pg_jsonschema validation functions whose first argument is the schema document.
const SCHEMA_FUNCTIONS: &[&str] = &["jsonb_matches_schema(", "json_matches_schema("];

/// Extract the JSON-schema document from a check constraint such as
/// `CHECK (jsonb_matches_schema('{"type": "object"}'::json, data))`.
///
/// The first argument of the validation call must be a single-quoted SQL literal, optionally
/// wrapped in parentheses; `''` inside it is an escaped quote. Returns the literal's content.
pub fn extract_schema_literal(check: &str) -> Option<String> {
    let start = SCHEMA_FUNCTIONS
        .iter()
        .filter_map(|f| check.find(f).map(|pos| pos + f.len()))
        .min()?;

    let rest = check[start..].trim_start_matches(|c: char| c == '(' || c.is_whitespace());
    let mut chars = rest.strip_prefix('\'')?.chars().peekable();
    let mut literal = String::new();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                literal.push('\'');
            } else {
                return Some(literal);
            }
        } else {
            literal.push(c);
        }
    }
    // Unterminated literal.
    None
}

/// Builds Dart types from JSON-schema documents, registering every named piece it derives.
pub struct JsonSchemaTypeBuilder<'a> {
    registry: &'a mut TypeRegistry,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> JsonSchemaTypeBuilder<'a> {
    pub fn new(registry: &'a mut TypeRegistry, diagnostics: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            registry,
            diagnostics,
        }
    }

    /// Derive the type described by `schema`. `hint` names the object or array it describes;
    /// objects with properties cannot be built without one.
    pub fn build(&mut self, schema: &Value, hint: Option<&str>) -> TargetType {
        let Some(object) = schema.as_object() else {
            self.report(hint, "schema is not an object, using Map");
            return TargetType::Map;
        };

        match object.get("type") {
            Some(Value::String(kind)) => self.build_kind(kind, object, hint),
            // e.g. ["string", "null"]
            Some(Value::Array(kinds)) => {
                let kinds: Vec<&str> = kinds.iter().filter_map(Value::as_str).collect();
                let allows_null = kinds.contains(&"null");
                let non_null: Vec<&str> = kinds.into_iter().filter(|k| *k != "null").collect();
                match non_null.as_slice() {
                    [] => TargetType::nullable(TargetType::dynamic()),
                    [kind] => {
                        let ty = self.build_kind(kind, object, hint);
                        if allows_null {
                            TargetType::nullable(ty)
                        } else {
                            ty
                        }
                    }
                    _ => {
                        self.report(hint, "union types are not supported, using dynamic");
                        TargetType::dynamic()
                    }
                }
            }
            _ => {
                self.report(hint, "schema has no usable 'type', using Map");
                TargetType::Map
            }
        }
    }

    fn build_kind(&mut self, kind: &str, object: &Map<String, Value>, hint: Option<&str>) -> TargetType {
        match kind {
            "array" => {
                let Some(items) = object.get("items") else {
                    return TargetType::list(TargetType::dynamic());
                };
                let element_name = match hint {
                    Some(hint) => format!("{hint}_element"),
                    None => "element".to_string(),
                };
                let element = self.build(items, Some(&element_name));
                self.registry.register_name(&element_name, element.clone());
                TargetType::list(element)
            }
            "object" => self.build_object(object, hint),
            "string" => TargetType::Scalar(ScalarKind::String),
            "integer" => TargetType::Scalar(ScalarKind::Int),
            "number" => TargetType::Scalar(ScalarKind::Double),
            "boolean" => TargetType::Scalar(ScalarKind::Bool),
            "null" => TargetType::nullable(TargetType::dynamic()),
            other => {
                self.report(hint, &format!("unrecognized type '{other}', using dynamic"));
                TargetType::dynamic()
            }
        }
    }

    fn build_object(&mut self, object: &Map<String, Value>, hint: Option<&str>) -> TargetType {
        let Some(properties) = object.get("properties").and_then(Value::as_object) else {
            // Free-form object.
            return TargetType::Map;
        };
        let Some(name) = hint else {
            self.report(None, "object schema without a name, using Map");
            return TargetType::Map;
        };

        let required: Vec<&str> = object
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut fields = Vec::with_capacity(properties.len());
        for (property, property_schema) in properties {
            let ty = self.build(property_schema, Some(property.as_str()));
            let ty = if required.contains(&property.as_str()) {
                ty
            } else {
                TargetType::nullable(ty)
            };
            self.registry.register_name(property, ty.clone());
            fields.push(Field {
                name: property.clone(),
                ty,
            });
        }

        TargetType::SchemaObject(ObjectType {
            name: name.to_string(),
            fields,
        })
    }

    fn report(&mut self, hint: Option<&str>, message: &str) {
        self.diagnostics
            .push(Diagnostic::new(hint.unwrap_or("<json schema>"), message));
    }
}

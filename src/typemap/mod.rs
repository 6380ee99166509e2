pub mod pg;

use std::collections::BTreeMap;

use crate::naming::type_to_class_name;

/// Display labels for enum values: locale -> enum value -> label.
pub type Translations = BTreeMap<String, BTreeMap<String, String>>;

/// Primitive Dart types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Double,
    String,
    Dynamic,
}

/// A closed set of string values.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
    pub translations: Option<Translations>,
}

/// A named record with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TargetType,
}

/// The representation of a database type in generated Dart code.
///
/// Every variant can produce its Dart type name and the expressions that convert a value to
/// and from its JSON wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetType {
    Scalar(ScalarKind),
    /// `DateTime`, serialized as an ISO-8601 string.
    Temporal,
    /// `Duration`, serialized as whole seconds and read back from `HH:MM:SS`.
    Interval,
    List(Box<TargetType>),
    /// Only built through [`TargetType::nullable`], so it never directly wraps itself.
    Nullable(Box<TargetType>),
    /// Untyped `Map<String, dynamic>` for free-form JSON.
    Map,
    Enum(EnumType),
    /// Mirrors a composite type from the catalog.
    Composite(ObjectType),
    /// Synthesized from a JSON-schema document.
    SchemaObject(ObjectType),
}

impl TargetType {
    pub fn dynamic() -> Self {
        TargetType::Scalar(ScalarKind::Dynamic)
    }

    /// Wrap in `Nullable`. Wrapping an already nullable type returns it unchanged.
    pub fn nullable(inner: TargetType) -> Self {
        match inner {
            TargetType::Nullable(_) => inner,
            other => TargetType::Nullable(Box::new(other)),
        }
    }

    pub fn list(element: TargetType) -> Self {
        TargetType::List(Box::new(element))
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, TargetType::Nullable(_))
    }

    /// Name of the enum or class declaration this type needs, if any.
    pub fn declaration_name(&self) -> Option<&str> {
        match self {
            TargetType::Enum(e) => Some(&e.name),
            TargetType::Composite(o) | TargetType::SchemaObject(o) => Some(&o.name),
            _ => None,
        }
    }

    /// Dart type name, e.g. `List<DateTime?>`.
    pub fn type_name(&self) -> String {
        match self {
            TargetType::Scalar(kind) => match kind {
                ScalarKind::Bool => "bool",
                ScalarKind::Int => "int",
                ScalarKind::Double => "double",
                ScalarKind::String => "String",
                ScalarKind::Dynamic => "dynamic",
            }
            .to_string(),
            TargetType::Temporal => "DateTime".to_string(),
            TargetType::Interval => "Duration".to_string(),
            TargetType::List(element) => format!("List<{}>", element.type_name()),
            TargetType::Nullable(inner) => match inner.as_ref() {
                TargetType::Scalar(ScalarKind::Dynamic) => "dynamic".to_string(),
                other => format!("{}?", other.type_name()),
            },
            TargetType::Map => "Map<String, dynamic>".to_string(),
            TargetType::Enum(e) => type_to_class_name(&e.name),
            TargetType::Composite(o) | TargetType::SchemaObject(o) => type_to_class_name(&o.name),
        }
    }

    /// True when the Dart value is already its own JSON form.
    fn encodes_verbatim(&self) -> bool {
        match self {
            TargetType::Scalar(_) | TargetType::Map => true,
            TargetType::List(inner) | TargetType::Nullable(inner) => inner.encodes_verbatim(),
            _ => false,
        }
    }

    /// Expression converting the Dart value `expr` to its JSON form.
    pub fn encode(&self, expr: &str) -> String {
        if self.encodes_verbatim() {
            return expr.to_string();
        }
        match self {
            TargetType::Temporal => format!("{expr}.toIso8601String()"),
            TargetType::Interval => format!("{expr}.inSeconds"),
            TargetType::List(element) => {
                format!("{expr}.map((e) => {}).toList()", element.encode("e"))
            }
            TargetType::Nullable(inner) => {
                format!("{expr} == null ? null : {}", inner.encode(&format!("{expr}!")))
            }
            TargetType::Enum(_) => format!("{expr}.value"),
            TargetType::Composite(_) | TargetType::SchemaObject(_) => format!("{expr}.toJson()"),
            TargetType::Scalar(_) | TargetType::Map => expr.to_string(),
        }
    }

    /// Expression converting the JSON value `expr` into the Dart value.
    pub fn decode(&self, expr: &str) -> String {
        match self {
            TargetType::Scalar(kind) => match kind {
                ScalarKind::Bool => format!("{expr} as bool"),
                ScalarKind::Int => format!("{expr} as int"),
                ScalarKind::Double => format!("({expr} as num).toDouble()"),
                ScalarKind::String => format!("{expr} as String"),
                ScalarKind::Dynamic => expr.to_string(),
            },
            TargetType::Temporal => format!("DateTime.parse({expr} as String)"),
            TargetType::Interval => format!(
                "Duration(seconds: ({expr} as String).split(':').map(int.parse).fold(0, (a, b) => a * 60 + b))"
            ),
            TargetType::List(element) => {
                format!("({expr} as List).map((e) => {}).toList()", element.decode("e"))
            }
            TargetType::Nullable(inner) => match inner.as_ref() {
                TargetType::Scalar(ScalarKind::Dynamic) => expr.to_string(),
                other => format!("{expr} == null ? null : {}", other.decode(expr)),
            },
            TargetType::Map => format!("{expr} as Map<String, dynamic>"),
            TargetType::Enum(e) => {
                format!("{}.fromValue({expr} as String)", type_to_class_name(&e.name))
            }
            TargetType::Composite(o) | TargetType::SchemaObject(o) => format!(
                "{}.fromJson({expr} as Map<String, dynamic>)",
                type_to_class_name(&o.name)
            ),
        }
    }
}

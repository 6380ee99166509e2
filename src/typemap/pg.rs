use super::{ScalarKind, TargetType};

/// Map a PostgreSQL builtin type name (without array marker) to its Dart representation.
/// Returns `None` for anything that is not a known builtin.
pub fn map_builtin(name: &str) -> Option<TargetType> {
    let ty = match name {
        "bool" => TargetType::Scalar(ScalarKind::Bool),
        "int2" | "int4" | "int8" | "serial" | "bigserial" | "oid" => {
            TargetType::Scalar(ScalarKind::Int)
        }
        // Arbitrary precision numerics lose precision in Dart; double is what the JSON carries.
        "float4" | "float8" | "numeric" | "money" => TargetType::Scalar(ScalarKind::Double),
        "date" | "time" | "timetz" | "timestamp" | "timestamptz" => TargetType::Temporal,
        "interval" => TargetType::Interval,
        "text" | "varchar" | "bpchar" | "char" | "name" | "citext" | "uuid" | "bytea" | "inet"
        | "cidr" | "macaddr" | "regclass" | "regproc" | "tsvector" | "xml" => {
            TargetType::Scalar(ScalarKind::String)
        }
        "json" | "jsonb" => TargetType::Map,
        _ => return None,
    };
    Some(ty)
}

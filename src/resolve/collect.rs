use std::collections::{BTreeSet, HashMap};

use crate::error::CodegenError;
use crate::schema::{SchemaColumn, SchemaType};

use super::graph::sort_types;
use super::Diagnostic;

/// Compute the types needed to describe `columns`: the types the columns name directly, plus
/// everything those reference through composite attributes and array elements. The result
/// is in dependency order.
///
/// A column whose type is missing from the catalog is reported and contributes nothing.
pub fn collect_required_types(
    catalog: &[SchemaType],
    columns: &[SchemaColumn],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Vec<SchemaType>, CodegenError> {
    let mut by_id: HashMap<i64, &SchemaType> = HashMap::new();
    let mut by_name: HashMap<&str, &SchemaType> = HashMap::new();
    for ty in catalog {
        by_id.entry(ty.id).or_insert(ty);
        by_name.entry(ty.name.as_str()).or_insert(ty);
    }

    let mut pending: Vec<i64> = Vec::new();
    for column in columns {
        let Some(ty) = by_name.get(column.format.as_str()) else {
            diagnostics.push(Diagnostic::new(
                &column.name,
                format!("type '{}' not found in catalog", column.format),
            ));
            continue;
        };
        pending.push(ty.id);
        if let Some(base) = ty.array_base().and_then(|b| by_name.get(b)) {
            pending.push(base.id);
        }
    }

    let mut required: BTreeSet<i64> = BTreeSet::new();
    while let Some(id) = pending.pop() {
        if !required.insert(id) {
            continue;
        }
        let Some(ty) = by_id.get(&id) else {
            continue;
        };
        for attr in &ty.attributes {
            if !required.contains(&attr.type_id) {
                pending.push(attr.type_id);
            }
        }
        if let Some(base) = ty.array_base().and_then(|b| by_name.get(b)) {
            pending.push(base.id);
        }
    }

    // Materialize in catalog order, one entry per id.
    let mut seen: BTreeSet<i64> = BTreeSet::new();
    let closure: Vec<SchemaType> = catalog
        .iter()
        .filter(|ty| required.contains(&ty.id) && seen.insert(ty.id))
        .cloned()
        .collect();

    sort_types(&closure)
}

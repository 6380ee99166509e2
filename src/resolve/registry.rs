use std::collections::BTreeMap;

use crate::typemap::TargetType;

/// Resolved Dart types, looked up by catalog id, by type name, or by column.
///
/// Entries are written once during resolution. Only column overrides replace an existing
/// value, since a JSON schema on a column is more specific than the column's catalog type.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    by_id: BTreeMap<i64, TargetType>,
    /// Catalog types only, so synthesized names never stand in for a column's format.
    by_catalog_name: BTreeMap<String, TargetType>,
    by_name: BTreeMap<String, TargetType>,
    /// (table id, column name) -> type derived from the column's JSON schema.
    columns: BTreeMap<(i64, String), TargetType>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog type under both its id and its name.
    pub fn register(&mut self, id: i64, name: &str, ty: TargetType) {
        self.by_id.entry(id).or_insert_with(|| ty.clone());
        self.by_catalog_name
            .entry(name.to_string())
            .or_insert_with(|| ty.clone());
        self.register_name(name, ty);
    }

    /// Register a type that has no catalog id. The first registration of a name wins.
    pub fn register_name(&mut self, name: &str, ty: TargetType) {
        self.by_name.entry(name.to_string()).or_insert(ty);
    }

    /// Set the type of one column, replacing any earlier override.
    pub fn override_column(&mut self, table_id: i64, column: &str, ty: TargetType) {
        self.columns.insert((table_id, column.to_string()), ty);
    }

    pub fn get(&self, id: i64) -> Option<&TargetType> {
        self.by_id.get(&id)
    }

    /// Any registered name, catalog or synthesized.
    pub fn get_by_name(&self, name: &str) -> Option<&TargetType> {
        self.by_name.get(name)
    }

    pub fn get_catalog_type(&self, name: &str) -> Option<&TargetType> {
        self.by_catalog_name.get(name)
    }

    pub fn column_override(&self, table_id: i64, column: &str) -> Option<&TargetType> {
        self.columns.get(&(table_id, column.to_string()))
    }
}

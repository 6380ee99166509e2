use serde::Deserialize;

/// Prefix PostgreSQL puts on the name of an array type (`_int4` is `int4[]`).
pub const ARRAY_MARKER: char = '_';

/// Represents an introspected database schema: relations, their columns, and the type catalog.
///
/// Field names follow the JSON snapshot format accepted by `--snapshot`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IntrospectedSchema {
    pub schemas: Vec<SchemaInfo>,
    pub tables: Vec<TableInfo>,
    pub views: Vec<TableInfo>,
    pub columns: Vec<SchemaColumn>,
    pub types: Vec<SchemaType>,
}

impl IntrospectedSchema {
    /// Columns belonging to the given relation, in ordinal order.
    pub fn columns_of(&self, table_id: i64) -> Vec<&SchemaColumn> {
        let mut cols: Vec<&SchemaColumn> = self
            .columns
            .iter()
            .filter(|c| c.table_id == table_id)
            .collect();
        cols.sort_by_key(|c| c.ordinal_position);
        cols
    }

    /// Keep only the named relations (and their columns). An empty filter keeps everything.
    pub fn retain_tables(&mut self, filter: &[String]) {
        if filter.is_empty() {
            return;
        }
        self.tables.retain(|t| filter.contains(&t.name));
        self.views.retain(|t| filter.contains(&t.name));
        let ids: Vec<i64> = self
            .tables
            .iter()
            .chain(self.views.iter())
            .map(|t| t.id)
            .collect();
        self.columns.retain(|c| ids.contains(&c.table_id));
    }

    /// Remove all views and their columns.
    pub fn drop_views(&mut self) {
        let ids: Vec<i64> = self.views.drain(..).map(|v| v.id).collect();
        self.columns.retain(|c| !ids.contains(&c.table_id));
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaInfo {
    pub name: String,
}

/// Metadata for a single table or view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableInfo {
    pub id: i64,
    pub schema: String,
    pub name: String,
    pub comment: Option<String>,
}

/// A named type from the catalog: scalar, enum, composite, or array of one of these.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchemaType {
    pub id: i64,
    pub name: String,
    pub attributes: Vec<TypeAttribute>,
    pub enums: Vec<String>,
    pub comment: Option<String>,
}

impl SchemaType {
    /// Element type name if this is an array type.
    pub fn array_base(&self) -> Option<&str> {
        array_base(&self.name)
    }

    pub fn is_array(&self) -> bool {
        self.array_base().is_some()
    }
}

/// One field of a composite type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypeAttribute {
    pub name: String,
    pub type_id: i64,
}

/// Metadata for a single column.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaColumn {
    pub table_id: i64,
    pub name: String,
    pub ordinal_position: i32,
    /// Type name, `udt_name` in information_schema terms.
    pub format: String,
    pub is_nullable: bool,
    pub is_generated: bool,
    pub is_identity: bool,
    pub default_value: Option<String>,
    pub check: Option<String>,
    pub comment: Option<String>,
}

/// Strip the array marker from a type name, if present.
pub fn array_base(name: &str) -> Option<&str> {
    name.strip_prefix(ARRAY_MARKER).filter(|base| !base.is_empty())
}

use sqlx::PgPool;

use crate::error::CodegenError;
use crate::schema::TableInfo;

/// Query the tables and the views (including materialized views) of one schema.
pub async fn query_relations(
    pool: &PgPool,
    schema: &str,
) -> Result<(Vec<TableInfo>, Vec<TableInfo>), CodegenError> {
    let rows = sqlx::query_as::<_, RelationRow>(
        r#"
        SELECT c.oid::int8 AS id, n.nspname::text AS schema_name, c.relname::text AS name,
               c.relkind::text AS kind, obj_description(c.oid, 'pg_class') AS comment
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE n.nspname = $1
          AND c.relkind IN ('r', 'p', 'v', 'm')
        ORDER BY c.relname
        "#,
    )
    .bind(schema)
    .fetch_all(pool)
    .await?;

    let mut tables = Vec::new();
    let mut views = Vec::new();
    for row in rows {
        let is_view = matches!(row.kind.as_str(), "v" | "m");
        let info = TableInfo {
            id: row.id,
            schema: row.schema_name,
            name: row.name,
            comment: row.comment,
        };
        if is_view {
            views.push(info);
        } else {
            tables.push(info);
        }
    }

    Ok((tables, views))
}

#[derive(sqlx::FromRow)]
struct RelationRow {
    id: i64,
    schema_name: String,
    name: String,
    kind: String,
    comment: Option<String>,
}

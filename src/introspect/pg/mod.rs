mod columns;
mod tables;
mod types;

use sqlx::PgPool;

use crate::error::CodegenError;
use crate::schema::{IntrospectedSchema, SchemaInfo};

/// Introspect a PostgreSQL database and return the relations, columns, and type catalog of
/// the given schemas.
pub async fn introspect(
    pool: &PgPool,
    schemas: &[String],
    noviews: bool,
) -> Result<IntrospectedSchema, CodegenError> {
    let mut result = IntrospectedSchema {
        schemas: query_schemas(pool, schemas).await?,
        ..Default::default()
    };

    for schema in schemas {
        let (tables, views) = tables::query_relations(pool, schema).await?;
        let views = if noviews { Vec::new() } else { views };
        for relation in tables.iter().chain(views.iter()) {
            result
                .columns
                .extend(columns::query_columns(pool, relation.id).await?);
        }
        result.tables.extend(tables);
        result.views.extend(views);
    }

    result.types = types::query_types(pool, schemas).await?;
    tracing::debug!(
        "Found {} tables, {} views, {} types",
        result.tables.len(),
        result.views.len(),
        result.types.len()
    );

    Ok(result)
}

async fn query_schemas(pool: &PgPool, schemas: &[String]) -> Result<Vec<SchemaInfo>, CodegenError> {
    let rows = sqlx::query_as::<_, SchemaRow>(
        r#"
        SELECT n.nspname::text AS name
        FROM pg_namespace n
        WHERE n.nspname = ANY($1)
        ORDER BY n.nspname
        "#,
    )
    .bind(schemas)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SchemaInfo { name: row.name })
        .collect())
}

#[derive(sqlx::FromRow)]
struct SchemaRow {
    name: String,
}

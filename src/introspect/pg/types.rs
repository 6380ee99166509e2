use sqlx::PgPool;

use crate::error::CodegenError;
use crate::schema::{SchemaType, TypeAttribute};

/// Query the type catalog: builtins from pg_catalog plus the types of the given schemas.
///
/// Composite types are only the standalone ones (`CREATE TYPE ... AS`); table row types are
/// left out. Enum labels come back in declaration order.
pub async fn query_types(pool: &PgPool, schemas: &[String]) -> Result<Vec<SchemaType>, CodegenError> {
    let rows = sqlx::query_as::<_, TypeRow>(
        r#"
        SELECT t.oid::int8 AS id, t.typname::text AS name,
               ARRAY(
                   SELECT e.enumlabel::text FROM pg_enum e
                   WHERE e.enumtypid = t.oid
                   ORDER BY e.enumsortorder
               ) AS enums,
               obj_description(t.oid, 'pg_type') AS comment,
               t.typrelid::int8 AS relid
        FROM pg_type t
        JOIN pg_namespace n ON n.oid = t.typnamespace
        LEFT JOIN pg_class c ON c.oid = t.typrelid
        WHERE (n.nspname = ANY($1) OR n.nspname = 'pg_catalog')
          AND (t.typrelid = 0 OR c.relkind = 'c')
        ORDER BY t.oid
        "#,
    )
    .bind(schemas)
    .fetch_all(pool)
    .await?;

    let mut types = Vec::with_capacity(rows.len());
    for row in rows {
        let attributes = if row.relid != 0 {
            query_attributes(pool, row.relid).await?
        } else {
            Vec::new()
        };
        types.push(SchemaType {
            id: row.id,
            name: row.name,
            attributes,
            enums: row.enums,
            comment: row.comment,
        });
    }

    Ok(types)
}

async fn query_attributes(pool: &PgPool, relid: i64) -> Result<Vec<TypeAttribute>, CodegenError> {
    let rows = sqlx::query_as::<_, AttributeRow>(
        r#"
        SELECT a.attname::text AS name, a.atttypid::int8 AS type_id
        FROM pg_attribute a
        WHERE a.attrelid::int8 = $1
          AND a.attnum > 0
          AND NOT a.attisdropped
        ORDER BY a.attnum
        "#,
    )
    .bind(relid)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| TypeAttribute {
            name: row.name,
            type_id: row.type_id,
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct TypeRow {
    id: i64,
    name: String,
    enums: Vec<String>,
    comment: Option<String>,
    relid: i64,
}

#[derive(sqlx::FromRow)]
struct AttributeRow {
    name: String,
    type_id: i64,
}

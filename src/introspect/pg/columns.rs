use sqlx::PgPool;

use crate::error::CodegenError;
use crate::schema::SchemaColumn;

/// Query the columns of one relation, with the definition of any single-column check
/// constraint (where embedded JSON schemas live).
pub async fn query_columns(pool: &PgPool, table_id: i64) -> Result<Vec<SchemaColumn>, CodegenError> {
    let rows = sqlx::query_as::<_, ColumnRow>(
        r#"
        SELECT a.attrelid::int8 AS table_id, a.attname::text AS name, a.attnum::int4 AS ordinal_position,
               t.typname::text AS format, NOT a.attnotnull AS is_nullable,
               a.attgenerated <> '' AS is_generated, a.attidentity <> '' AS is_identity,
               pg_get_expr(d.adbin, d.adrelid) AS default_value,
               (
                   SELECT pg_get_constraintdef(con.oid)
                   FROM pg_constraint con
                   WHERE con.conrelid = a.attrelid
                     AND con.contype = 'c'
                     AND con.conkey = ARRAY[a.attnum]
                   ORDER BY con.conname
                   LIMIT 1
               ) AS check_def,
               col_description(a.attrelid, a.attnum) AS comment
        FROM pg_attribute a
        JOIN pg_type t ON t.oid = a.atttypid
        LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
        WHERE a.attrelid::int8 = $1
          AND a.attnum > 0
          AND NOT a.attisdropped
        ORDER BY a.attnum
        "#,
    )
    .bind(table_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| SchemaColumn {
            table_id: row.table_id,
            name: row.name,
            ordinal_position: row.ordinal_position,
            format: row.format,
            is_nullable: row.is_nullable,
            is_generated: row.is_generated,
            is_identity: row.is_identity,
            default_value: row.default_value,
            check: row.check_def,
            comment: row.comment,
        })
        .collect())
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    table_id: i64,
    name: String,
    ordinal_position: i32,
    format: String,
    is_nullable: bool,
    is_generated: bool,
    is_identity: bool,
    default_value: Option<String>,
    check_def: Option<String>,
    comment: Option<String>,
}

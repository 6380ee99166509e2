mod cli;
mod codegen;
mod error;
mod introspect;
mod naming;
mod resolve;
mod schema;
#[cfg(test)]
mod testutil;
mod typemap;

use std::fs;

use anyhow::Result;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use crate::cli::{redact_url, Cli, SchemaSource};
use crate::codegen::models::DartGenerator;
use crate::codegen::Generator;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let source = cli.source()?;
    let schemas = cli.schema_list();
    let table_filter = cli.table_list();
    let options = cli.generator_options();

    let mut schema = match source {
        SchemaSource::Postgres(url) => {
            tracing::debug!("Connecting to {}", redact_url(&url));
            let pool = PgPoolOptions::new()
                .max_connections(1)
                .connect(&url)
                .await?;
            tracing::debug!("Introspecting schema...");
            let s = introspect::pg::introspect(&pool, &schemas, cli.noviews).await;
            pool.close().await;
            s?
        }
        SchemaSource::Snapshot(path) => introspect::snapshot::load(&path)?,
    };

    schema.retain_tables(&table_filter);
    if cli.noviews {
        schema.drop_views();
    }
    tracing::debug!(
        "Generating models for {} tables and {} views",
        schema.tables.len(),
        schema.views.len()
    );

    let resolution = resolve::resolve(&schema, &cli.resolve_options())?;
    for diagnostic in &resolution.diagnostics {
        tracing::warn!("{diagnostic}");
    }

    let output = DartGenerator.generate(&schema, &resolution, &options);

    match cli.outfile {
        Some(ref path) => {
            fs::write(path, &output)?;
            tracing::info!("Output written to {path}");
        }
        None => {
            print!("{output}");
        }
    }

    Ok(())
}

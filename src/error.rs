use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid schema snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Circular dependency detected involving type '{0}'")]
    CircularDependency(String),

    #[error("No schema source: pass a database URL or --snapshot <file>")]
    NoSource,
}

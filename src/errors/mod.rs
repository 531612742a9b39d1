use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Invalid ssl mode '{0}'. Expected one of: disable, allow, prefer, require, verify-ca, verify-full")]
    InvalidSslMode(String),

    #[error("Failed to connect to database '{database}' on {host}:{port} as '{user}' (password is hidden): {source}")]
    Unreachable {
        host: String,
        port: u16,
        database: String,
        user: String,
        #[source]
        source: sqlx::Error,
    },
}

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Migration script not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read migration script '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Migration script '{}' is empty", .0.display())]
    Empty(PathBuf),

    #[error("Failed to open transaction: {0}")]
    Begin(String),

    #[error("Migration script execution failed: {0}")]
    Execution(String),

    #[error("Failed to finish transaction: {0}")]
    Finish(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to create report directory '{}': {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

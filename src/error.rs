use std::path::PathBuf;

/// Error types for the snappy-tools library
#[derive(Debug, thiserror::Error)]
pub enum SnappyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to open compressed input {path:?}: {source}")]
    Decompress {
        path: PathBuf,
        #[source]
        source: niffler::Error,
    },

    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("{file}:{line}: {message}")]
    Parse {
        file: String,
        line: u64,
        message: String,
    },

    #[error("Parent overrides form a cycle: {}", .0.join(" -> "))]
    TreeCycle(Vec<String>),

    #[error("No usable reference data: {0}")]
    NoUsableReference(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("External tool failed: {0}")]
    ExternalTool(String),
}

pub type SnappyResult<T> = Result<T, SnappyError>;

use std::path::PathBuf;

use ossror_recon::LinkDefect;

/// Failure while reading one data source. Every variant names the source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source '{origin}': cannot read {}: {source}", .path.display())]
    Io {
        origin: String,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("source '{origin}': {source}")]
    Csv { origin: String, source: csv::Error },
    #[error("source '{origin}', line {line}: invalid JSON: {source}")]
    Json {
        origin: String,
        line: u64,
        source: serde_json::Error,
    },
    #[error("source '{origin}': missing column '{column}'")]
    MissingColumn { origin: String, column: String },
    #[error("source '{origin}', line {line}: {defect}")]
    Record {
        origin: String,
        line: u64,
        defect: LinkDefect,
    },
}

/// Failure while writing a projection.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot write {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}

use std::path::PathBuf;

use svgsplit_engine::EngineError;
use svgsplit_export::ExportError;

/// Errors surfaced to the terminal by the `svgsplit` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

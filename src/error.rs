use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by configuration loading and the demo host
///
/// The animation itself never fails: a missing surface or a timed-out
/// resource wait degrades to "no animation" or a best-effort layout.
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("config serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unknown page variant '{0}' (expected home, about, projects or work)")]
    UnknownVariant(String),

    #[error("display unavailable: {0}")]
    Display(String),
}

pub type Result<T, E = StitchError> = std::result::Result<T, E>;

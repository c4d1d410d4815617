use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the patcher and the bootstrap runtime.
/// Every module returns `Result<T, BootError>`.
#[derive(Debug, Error)]
pub enum BootError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    // ── Patcher ─────────────────────────────────────────
    #[error("Source archive not found: {0:?}")]
    MissingArtifact(PathBuf),

    #[error("Failed to copy archive to scratch file {path:?}: {source}")]
    CopyFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to patch archive: {0}")]
    PatchFailed(String),

    #[error("Failed to copy bootstrap payload entry '{entry}': {reason}")]
    PayloadCopyFailed { entry: String, reason: String },

    #[error("Failed to move {from:?} over {to:?}: {source}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    // ── Bootstrap ───────────────────────────────────────
    #[error("Patch metadata unreadable: {0}")]
    MetadataMissing(String),

    #[error("Cannot resolve type '{0}'")]
    TypeResolutionFailed(String),

    #[error("Failed to invoke application entry point: {0}")]
    Invocation(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type BootResult<T> = Result<T, BootError>;

impl BootError {
    /// Exit status for the process, distinguishing the two fatal runtime
    /// conditions (unreadable metadata, failed download) from everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootError::FetchFailed { .. } | BootError::MetadataMissing(_) => 2,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for BootError {
    fn from(source: std::io::Error) -> Self {
        BootError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

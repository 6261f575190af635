use nahw_morph::SegmentIdError;
use thiserror::Error;

/// The only error surfaced by detection: an upstream contract violation.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("invalid segment id {id:?}: {source}")]
    InvalidSegmentId {
        id: String,
        #[source]
        source: SegmentIdError,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("search window must be at least 1")]
    InvalidSearchWindow,
}

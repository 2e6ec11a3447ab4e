use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessLogError {
    #[error("access log sink write failed: {0}")]
    SinkWriteFailed(String),

    #[error("access log export failed: {0}")]
    ExportFailed(String),

    #[error("invalid threat pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

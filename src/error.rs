use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("config file not found: {path}")]
    ConfigMissing { path: String },

    #[error("config file {path} is invalid: {reason}")]
    ConfigInvalid { path: String, reason: String },

    #[error("{field} cannot be blank")]
    BlankField { field: String },

    #[error("directory API rejected the credential: {reason}")]
    Auth { reason: String },

    #[error("rate limited by the directory API")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("could not reach the directory API: {message}")]
    Transport { message: String },

    #[error("directory API error: {code}")]
    Api { code: String },

    #[error("no usable name for member {member_id}")]
    NoUsableName { member_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

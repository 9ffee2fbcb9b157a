use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("malformed spell record `{id}`: {reason}")]
    MalformedRecord { id: String, reason: String },
    #[error("spell not found: {0}")]
    NotFound(String),
    #[error("transport error fetching `{id}`: {message}")]
    Transport { id: String, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("render error: {0}")]
    Render(String),
}

impl CardError {
    pub(crate) fn malformed(id: &str, reason: impl std::fmt::Display) -> Self {
        CardError::MalformedRecord {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;

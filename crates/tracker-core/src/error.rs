//! Error types for the tracker

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid value under {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl TrackerError {
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        TrackerError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(e: serde_json::Error) -> Self {
        TrackerError::Serialization(e.to_string())
    }
}

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum TouchlineError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Article parsing error: {0}")]
    Parse(String),

    #[error("Article {index} is missing `{field}`")]
    FieldMissing { index: usize, field: &'static str },

    #[error("No internet connection")]
    Offline,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<ConfigError> for TouchlineError {
    fn from(e: ConfigError) -> Self {
        TouchlineError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TouchlineError>;

//! Error types for Tilovat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilovatError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid quiz config: {0}")]
    InvalidQuizConfig(String),

    #[error("Content error: {0}")]
    Content(String),

    #[error("{0}")]
    Other(String),
}

impl serde::Serialize for TilovatError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

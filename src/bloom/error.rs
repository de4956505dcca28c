use thiserror::Error;

use bincode::error::{DecodeError, EncodeError};

pub type Result<T> = std::result::Result<T, BloomError>;
pub type BloomResult<T> = Result<T>;

#[derive(Error, Debug, PartialEq)]
pub enum BloomError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Size mismatch in {what}: {left} != {right}")]
    SizeMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("Index out of bounds: {index} >= {capacity}")]
    IndexOutOfBounds { index: usize, capacity: usize },

    #[error("Hash computation failed: {0}")]
    HashFailure(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<EncodeError> for BloomError {
    fn from(err: EncodeError) -> Self {
        BloomError::SerializationError(err.to_string())
    }
}

impl From<DecodeError> for BloomError {
    fn from(err: DecodeError) -> Self {
        BloomError::SerializationError(err.to_string())
    }
}

#[cfg(feature = "cli")]
impl From<serde_json::Error> for BloomError {
    fn from(err: serde_json::Error) -> Self {
        BloomError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for BloomError {
    fn from(err: std::io::Error) -> Self {
        BloomError::StorageError(err.to_string())
    }
}

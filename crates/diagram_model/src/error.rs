//! Error types for shape model operations

use crate::ShapeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error("Duplicate shape id: {0}")]
    DuplicateShape(ShapeId),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

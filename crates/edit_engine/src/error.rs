//! Error types for editing operations

use diagram_model::{ModelError, ShapeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("Shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error("Invalid gesture: {0}")]
    InvalidGesture(String),

    #[error("Resize and rotate apply to a single shape; {0} shapes are selected")]
    UnsupportedMultiTransform(usize),

    #[error("No text edit is in progress")]
    NotEditingText,

    #[error("Shape {0} is not a text shape")]
    NotText(ShapeId),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, EditError>;

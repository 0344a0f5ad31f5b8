//! Error types for export operations

use crate::ExportTarget;
use diagram_model::ShapeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0} export already in progress")]
    InProgress(ExportTarget),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Renderer produced an empty snapshot")]
    EmptySnapshot,

    #[error("Shape {0} cannot be exported: {1}")]
    UnsupportedShape(ShapeId, String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

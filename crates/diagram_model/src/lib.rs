//! Diagram Model - Shape data model and geometry engine
//!
//! This crate provides the shape tagged union shared by the editor and the
//! exporters, the pure geometry functions derived from it, and the persisted
//! diagram record.

mod canvas;
mod color;
mod document;
mod error;
pub mod factory;
pub mod geometry;
mod record;
mod shape;
mod shape_id;

pub use canvas::*;
pub use color::*;
pub use document::*;
pub use error::*;
pub use factory::ShapeTool;
pub use record::*;
pub use shape::*;
pub use shape_id::*;

//! Edit Engine - Transform controller, selection state, and alignment
//!
//! This crate turns renderer gestures and keyboard input into shape model
//! mutations. Every rule is a plain function over `diagram_model` types;
//! `DiagramEditor` ties them to one diagram and applies each patch atomically.

mod align;
mod editor;
mod error;
mod keyboard;
mod selection;
mod settings;
mod text_edit;
mod transform;

pub use align::*;
pub use editor::*;
pub use error::*;
pub use keyboard::*;
pub use selection::*;
pub use settings::*;
pub use text_edit::*;
pub use transform::*;

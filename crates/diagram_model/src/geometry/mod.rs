//! Geometry engine
//!
//! Pure functions deriving bounds, outlines, and hit regions from shapes.
//! Nothing here mutates a shape.

mod block_arrow;
mod bounds;
mod callout;
mod polygon;
pub mod templates;

pub use block_arrow::*;
pub use bounds::*;
pub use callout::*;
pub use hit_test::*;
pub use polygon::*;
pub use templates::{template_for, template_path, PathTemplate, TemplateTransform};

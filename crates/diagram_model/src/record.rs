//! Persisted diagram representation
//!
//! The JSON written here is exactly what the post-storage endpoints accept
//! and return: the shape list is stored verbatim as `canvasData`.

use crate::{Canvas, Diagram, Result, Shape};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Diagram as stored by the create/update/fetch endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub canvas_data: Vec<Shape>,
    pub width: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_data_url: Option<String>,
}

impl DiagramRecord {
    /// Snapshot a diagram for storage
    pub fn from_diagram(diagram: &Diagram, thumbnail_data_url: Option<String>) -> Self {
        Self {
            title: diagram.title.clone(),
            canvas_data: diagram.shapes().to_vec(),
            width: diagram.canvas.width,
            height: diagram.canvas.height,
            thumbnail_data_url,
        }
    }

    /// Rebuild an editable diagram; shapes are normalized on the way in
    pub fn into_diagram(self) -> Result<Diagram> {
        let canvas = Canvas::new(self.width, self.height);
        Diagram::with_shapes(self.title, canvas, self.canvas_data)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a stored record, normalizing degenerate shape geometry
    pub fn from_json(json: &str) -> Result<Self> {
        let mut record: DiagramRecord = serde_json::from_str(json)?;
        record.canvas_data = record.canvas_data.into_iter().map(Shape::normalized).collect();
        Ok(record)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{self, ShapeTool};
    use crate::ModelError;

    fn every_shape() -> Vec<Shape> {
        use ShapeTool::*;
        [
            Rect, RoundedRect, Circle, Triangle, Pentagon, Hexagon, Octagon, Diamond, Star,
            Parallelogram, RectCut, Cylinder, Document, BlockArrowRight, BlockArrowLeft,
            BlockArrowUp, BlockArrowDown, CalloutRect, CalloutOval, CalloutCloud, Arrow, Text,
        ]
        .into_iter()
        .enumerate()
        .map(|(i, tool)| factory::create(tool, i as f64 * 13.5, i as f64 * 7.25).with_rotation(i as f64 * 15.0))
        .collect()
    }

    #[test]
    fn test_json_roundtrip_is_lossless() {
        let record = DiagramRecord {
            title: "Org chart".to_string(),
            canvas_data: every_shape(),
            width: 1280.0,
            height: 720.0,
            thumbnail_data_url: Some("data:image/png;base64,AAAA".to_string()),
        };
        let json = record.to_json().unwrap();
        let back = DiagramRecord::from_json(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_reads_portal_payload() {
        let json = r##"{
            "title": "Welcome",
            "canvasData": [
                {"id": "t1", "type": "text", "x": 10, "y": 10, "text": "Hi", "fontSize": 32,
                 "fontFamily": "Noto Sans KR", "align": "center", "fill": "#333333"},
                {"id": "c1", "type": "circle", "x": 0, "y": 0, "fill": "#ff0000"}
            ],
            "width": 800,
            "height": 600
        }"##;
        let record = DiagramRecord::from_json(json).unwrap();
        assert_eq!(record.canvas_data.len(), 2);
        assert_eq!(record.thumbnail_data_url, None);
        let diagram = record.into_diagram().unwrap();
        assert_eq!(diagram.canvas.width, 800.0);
        assert_eq!(diagram.title, "Welcome");
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let json = r#"{"canvasData": [{"id": "x", "type": "hexapod"}], "width": 10, "height": 10}"#;
        assert!(matches!(DiagramRecord::from_json(json), Err(ModelError::Serialization(_))));
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let shape = factory::rect(0.0, 0.0).with_id("dup");
        let record = DiagramRecord {
            title: String::new(),
            canvas_data: vec![shape.clone(), shape],
            width: 100.0,
            height: 100.0,
            thumbnail_data_url: None,
        };
        assert!(matches!(record.into_diagram(), Err(ModelError::DuplicateShape(_))));
    }
}

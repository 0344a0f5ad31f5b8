//! In-memory diagram: the ordered shape list plus its canvas

use crate::{Canvas, ModelError, Result, Shape, ShapeId};
use std::collections::BTreeSet;

/// A diagram being edited. List order is paint order (last = topmost).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    pub title: String,
    pub canvas: Canvas,
    shapes: Vec<Shape>,
}

impl Diagram {
    pub fn new(title: impl Into<String>, canvas: Canvas) -> Self {
        Self {
            title: title.into(),
            canvas,
            shapes: Vec::new(),
        }
    }

    /// Build from an existing list, normalizing every shape
    pub fn with_shapes(title: impl Into<String>, canvas: Canvas, shapes: Vec<Shape>) -> Result<Self> {
        let mut diagram = Self::new(title, canvas);
        for shape in shapes {
            diagram.add_shape(shape.normalized())?;
        }
        Ok(diagram)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| &s.id == id)
    }

    /// Append a shape on top of the others
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeId> {
        if self.contains(&shape.id) {
            return Err(ModelError::DuplicateShape(shape.id));
        }
        let id = shape.id.clone();
        self.shapes.push(shape);
        Ok(id)
    }

    /// Swap in a new version of an existing shape, keeping its paint order
    pub fn replace_shape(&mut self, shape: Shape) -> Result<Shape> {
        let index = self
            .index_of(&shape.id)
            .ok_or_else(|| ModelError::ShapeNotFound(shape.id.clone()))?;
        Ok(std::mem::replace(&mut self.shapes[index], shape))
    }

    /// Remove every listed shape; returns the removed shapes in paint order
    pub fn remove_shapes(&mut self, ids: &BTreeSet<ShapeId>) -> Vec<Shape> {
        let (removed, kept): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id));
        self.shapes = kept;
        removed
    }

    pub fn remove_shape(&mut self, id: &ShapeId) -> Result<Shape> {
        let index = self
            .index_of(id)
            .ok_or_else(|| ModelError::ShapeNotFound(id.clone()))?;
        Ok(self.shapes.remove(index))
    }

    /// Move the listed shapes above all others, keeping their relative order
    pub fn bring_to_front(&mut self, ids: &BTreeSet<ShapeId>) {
        let (mut raised, mut rest): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id));
        rest.append(&mut raised);
        self.shapes = rest;
    }

    /// Move the listed shapes below all others, keeping their relative order
    pub fn send_to_back(&mut self, ids: &BTreeSet<ShapeId>) {
        let (mut lowered, mut rest): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id));
        lowered.append(&mut rest);
        self.shapes = lowered;
    }

    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

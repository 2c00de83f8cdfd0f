//! The sketch: an ordered id → shape store.
//!
//! Ids are handed out by a counter owned by each `Sketch` instance, starting
//! at 0 and never reused after deletion. Because ids only grow, ascending id
//! order is insertion order, which is both the draw order and (reversed) the
//! hit-test order. Once `ShapeId::MAX` has been handed out the sketch is
//! exhausted and further adds are refused rather than wrapping.
//!
//! Mutations addressed at an id that is no longer present are silent no-ops:
//! a delete racing a move from another client must never fail.

#[cfg(test)]
#[path = "sketch_test.rs"]
mod sketch_test;

use std::collections::BTreeMap;

use crate::shape::{Color, Shape};

/// Identifier of a shape within one sketch.
pub type ShapeId = i32;

/// In-memory store of shapes in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sketch {
    shapes: BTreeMap<ShapeId, Shape>,
    next_id: ShapeId,
    exhausted: bool,
}

impl Sketch {
    /// Create an empty sketch whose first id will be 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a shape under the next id and return that id, or `None` when
    /// every id has been used.
    pub fn add_shape(&mut self, shape: Shape) -> Option<ShapeId> {
        if self.exhausted {
            return None;
        }
        let id = self.next_id;
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => self.exhausted = true,
        }
        self.shapes.insert(id, shape);
        Some(id)
    }

    /// Translate a shape. Returns `false` if `id` is absent.
    pub fn move_shape(&mut self, id: ShapeId, dx: i32, dy: i32) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        shape.translate(dx, dy);
        true
    }

    /// Recolor a shape. Returns `false` if `id` is absent.
    pub fn recolor_shape(&mut self, id: ShapeId, color: Color) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        shape.set_color(color);
        true
    }

    /// Remove a shape. Returns `false` if `id` was already absent.
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        self.shapes.remove(&id).is_some()
    }

    /// The most recently added shape containing `(x, y)`, if any.
    #[must_use]
    pub fn topmost_hit_at(&self, x: i32, y: i32) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|(_, shape)| shape.contains(x, y))
            .map(|(id, _)| *id)
    }

    /// All shapes with their ids, in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ShapeId, Shape)> {
        self.shapes
            .iter()
            .map(|(id, shape)| (*id, shape.clone()))
            .collect()
    }

    /// Iterate shapes in insertion order without cloning.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (ShapeId, &Shape)> {
        self.shapes.iter().map(|(id, shape)| (*id, shape))
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// The id the next `add_shape` will assign, `None` once exhausted.
    #[must_use]
    pub fn next_id(&self) -> Option<ShapeId> {
        (!self.exhausted).then_some(self.next_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

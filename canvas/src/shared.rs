//! Thread-safe handle to a [`Sketch`].
//!
//! `SharedSketch` is what the server's sessions and a client's listener and
//! input handlers hold concurrently. Each method takes the lock exactly once,
//! so a reader never observes a shape halfway through a mutation. None of the
//! guarded operations perform I/O, so the lock is only ever held briefly.

#[cfg(test)]
#[path = "shared_test.rs"]
mod shared_test;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::shape::{Color, Shape};
use crate::sketch::{ShapeId, Sketch};

/// Cloneable, lock-guarded sketch. Clones share the same underlying store.
#[derive(Debug, Clone, Default)]
pub struct SharedSketch {
    inner: Arc<RwLock<Sketch>>,
}

impl SharedSketch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sketch.
    #[must_use]
    pub fn from_sketch(sketch: Sketch) -> Self {
        Self { inner: Arc::new(RwLock::new(sketch)) }
    }

    pub fn add_shape(&self, shape: Shape) -> Option<ShapeId> {
        self.write().add_shape(shape)
    }

    pub fn move_shape(&self, id: ShapeId, dx: i32, dy: i32) -> bool {
        self.write().move_shape(id, dx, dy)
    }

    pub fn recolor_shape(&self, id: ShapeId, color: Color) -> bool {
        self.write().recolor_shape(id, color)
    }

    pub fn delete_shape(&self, id: ShapeId) -> bool {
        self.write().delete_shape(id)
    }

    #[must_use]
    pub fn topmost_hit_at(&self, x: i32, y: i32) -> Option<ShapeId> {
        self.read().topmost_hit_at(x, y)
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<(ShapeId, Shape)> {
        self.read().snapshot()
    }

    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<Shape> {
        self.read().get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run `f` against the sketch under the read lock.
    pub fn with<R>(&self, f: impl FnOnce(&Sketch) -> R) -> R {
        f(&self.read())
    }

    /// Run `f` against the sketch under the write lock, making a compound
    /// change atomic with respect to every other operation.
    pub fn update<R>(&self, f: impl FnOnce(&mut Sketch) -> R) -> R {
        f(&mut self.write())
    }

    // Guarded operations never panic mid-mutation, so a poisoned lock still
    // holds a consistent sketch.
    fn read(&self) -> RwLockReadGuard<'_, Sketch> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Sketch> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

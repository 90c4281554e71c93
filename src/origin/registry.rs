//! OriginRegistry — concurrent store of registered origin shapes

use super::shape::OriginShape;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// All origin shapes known to a factory, keyed by `TypeId`.
///
/// Registration normally happens once at startup; lookups are concurrent
/// and lock-free on the read path. Re-registering a type replaces its
/// shape (upsert semantics).
#[derive(Debug, Default)]
pub struct OriginRegistry {
    shapes: DashMap<TypeId, Arc<OriginShape>>,
}

impl OriginRegistry {
    pub fn new() -> Self {
        Self {
            shapes: DashMap::new(),
        }
    }

    /// Register a shape, replacing any previous shape for the same type.
    /// Returns the stored `Arc` for immediate use.
    pub fn register(&self, shape: OriginShape) -> Arc<OriginShape> {
        let shape = Arc::new(shape);
        self.shapes.insert(shape.key().id(), shape.clone());
        shape
    }

    pub fn shape_of<T: Any>(&self) -> Option<Arc<OriginShape>> {
        self.shape(TypeId::of::<T>())
    }

    pub fn shape(&self, id: TypeId) -> Option<Arc<OriginShape>> {
        self.shapes.get(&id).map(|r| r.clone())
    }

    pub fn contains<T: Any>(&self) -> bool {
        self.shapes.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

//! Type-erased values and type keys
//!
//! Everything that crosses the generated-adapter boundary travels as a
//! `Value`: an `Arc`-backed `dyn Any` payload paired with a `TypeKey` so
//! errors can name the type involved. Cloning is cheap (one Arc bump),
//! which is what lets constants, slots, and echo returns share payloads.

use std::any::{Any, TypeId};
use std::fmt;
use thiserror::Error;

/// A `TypeId` paired with the human-readable type name.
///
/// The id drives matching (Rust has no subtyping between concrete types,
/// so "assignable" collapses to equality); the name only feeds diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The key for `()`, used for void-like methods.
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A cloneable type-erased value.
#[derive(Clone)]
pub struct Value {
    key: TypeKey,
    inner: std::sync::Arc<dyn Any + Send + Sync>,
}

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            inner: std::sync::Arc::new(value),
        }
    }

    /// The unit value, returned by void-like generated methods.
    pub fn unit() -> Self {
        Self::new(())
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn is<T: Any>(&self) -> bool {
        self.key.id == TypeId::of::<T>()
    }

    pub fn is_unit(&self) -> bool {
        self.key.is_unit()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Clone the payload out as a `T`.
    pub fn extract<T: Any + Clone>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.key.name)
    }
}

/// Errors raised by the dynamic call machinery: adapter method dispatch,
/// member invocation, and translator application.
///
/// These cover misuse of the erased call surface; a correctly generated
/// adapter only ever surfaces [`InvokeError::Origin`], which carries a
/// failure of the wrapped origin member unmodified.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("method `{0}` not found on adapter")]
    MethodNotFound(String),

    #[error("`{method}` expects {expected} argument(s), got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },

    #[error("argument {position} of `{method}`: expected `{expected}`, got `{got}`")]
    Argument {
        method: String,
        position: usize,
        expected: TypeKey,
        got: TypeKey,
    },

    #[error("origin instance is not a `{expected}`")]
    OriginType { expected: TypeKey },

    #[error("argument {position} downcast failed (expected `{expected}`)")]
    ArgumentDowncast { position: usize, expected: TypeKey },

    #[error("translator input: expected `{expected}`, got `{got}`")]
    TranslatorInput { expected: TypeKey, got: TypeKey },

    #[error("field `{0}` is read-only")]
    ReadOnlyField(String),

    #[error("origin call failed: {0}")]
    Origin(String),
}

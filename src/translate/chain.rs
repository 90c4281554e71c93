//! Chain core — ordered transform entries with parent delegation
//!
//! A chain is an immutable singly-linked list of entry tables. Resolution
//! scans the local entries most-recently-added first, then delegates to
//! the parent. "Last write overrides, else inherit" — registration order
//! is semantically significant.
//!
//! Each entry records the type its transform accepts and the type it
//! produces. One of the two is the lookup key (which one depends on the
//! chain direction); the other is pinned to the chain's declared type,
//! and an entry straying from it is reported so validation can reject it
//! before any adapter is generated.

use super::TranslateError;
use crate::origin::{InvokeError, TypeKey, Value};
use std::any::Any;
use std::sync::Arc;
use tracing::trace;

/// A type-to-type conversion function over erased values.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, InvokeError> + Send + Sync>;

/// The identity transform.
pub fn identity() -> Transform {
    Arc::new(|value: Value| Ok(value))
}

/// Lift a typed conversion into a [`Transform`].
pub fn transform<A, B>(f: impl Fn(A) -> B + Send + Sync + 'static) -> Transform
where
    A: Any + Clone,
    B: Any + Send + Sync,
{
    Arc::new(move |value: Value| {
        let input = value.extract::<A>().ok_or(InvokeError::TranslatorInput {
            expected: TypeKey::of::<A>(),
            got: value.key(),
        })?;
        Ok(Value::new(f(input)))
    })
}

#[derive(Clone)]
struct Entry {
    input: TypeKey,
    output: TypeKey,
    transform: Transform,
}

/// Which side of an entry resolution matches candidates against.
#[derive(Clone, Copy)]
pub(super) enum Keyed {
    Input,
    Output,
}

/// Shared chain structure behind `ParamChain`/`ResultChain`.
#[derive(Clone)]
pub(super) struct Chain {
    declared: TypeKey,
    keyed: Keyed,
    entries: Vec<Entry>,
    parent: Option<Arc<Chain>>,
}

impl Chain {
    pub(super) fn new(declared: TypeKey, keyed: Keyed) -> Self {
        Self {
            declared,
            keyed,
            entries: Vec::new(),
            parent: None,
        }
    }

    pub(super) fn declared(&self) -> TypeKey {
        self.declared
    }

    pub(super) fn push(&mut self, input: TypeKey, output: TypeKey, transform: Transform) {
        self.entries.push(Entry {
            input,
            output,
            transform,
        });
    }

    /// Branch a child chain. The child shares this chain structurally as
    /// its parent; later additions on the child never affect the parent.
    pub(super) fn branch(self: &Arc<Self>) -> Chain {
        Chain {
            declared: self.declared,
            keyed: self.keyed,
            entries: Vec::new(),
            parent: Some(self.clone()),
        }
    }

    fn key_of(&self, entry: &Entry) -> TypeKey {
        match self.keyed {
            Keyed::Input => entry.input,
            Keyed::Output => entry.output,
        }
    }

    /// The first entry (parents included) whose non-key side strays from
    /// the declared type, if any.
    pub(super) fn off_declared(&self) -> Option<TypeKey> {
        for entry in &self.entries {
            let pinned = match self.keyed {
                Keyed::Input => entry.output,
                Keyed::Output => entry.input,
            };
            if pinned.id() != self.declared.id() {
                return Some(pinned);
            }
        }
        self.parent.as_ref().and_then(|p| p.off_declared())
    }

    pub(super) fn lookup(&self, candidate: TypeKey) -> Option<Transform> {
        for entry in self.entries.iter().rev() {
            if self.key_of(entry).id() == candidate.id() {
                trace!(candidate = %candidate, declared = %self.declared, "chain entry matched");
                return Some(entry.transform.clone());
            }
        }
        match &self.parent {
            Some(parent) => parent.lookup(candidate),
            None => None,
        }
    }

    pub(super) fn resolve(&self, candidate: TypeKey) -> Result<Transform, TranslateError> {
        self.lookup(candidate).ok_or(TranslateError::NoTranslator {
            candidate,
            declared: self.declared,
        })
    }
}

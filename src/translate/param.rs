//! Parameter translator chain
//!
//! Translates one wrapper-method parameter into whatever an origin
//! parameter slot requires. Entries are keyed by the type they *produce*
//! (the origin slot type); resolution asks "who can fill a slot of type
//! `X`?". The declared type is the wrapper parameter's own type, seeded
//! with an identity entry so like-typed slots always resolve.

use super::chain::{identity, transform, Chain, Keyed, Transform};
use super::TranslateError;
use crate::origin::TypeKey;
use std::any::Any;
use std::sync::Arc;

/// Overridable, inheritable conversion rules for one wrapper parameter.
#[derive(Clone)]
pub struct ParamChain {
    chain: Arc<Chain>,
}

impl ParamChain {
    /// A chain for a wrapper parameter of type `T`, seeded with the
    /// identity entry for `T`.
    pub fn from<T: Any>() -> Self {
        Self::for_declared(TypeKey::of::<T>())
    }

    pub(crate) fn for_declared(declared: TypeKey) -> Self {
        let mut chain = Chain::new(declared, Keyed::Output);
        chain.push(declared, declared, identity());
        Self {
            chain: Arc::new(chain),
        }
    }

    /// Append an entry converting the wrapper parameter (as `A`) into an
    /// origin slot of type `B`. Later entries override earlier ones.
    /// `A` must be the chain's declared type; a stray entry is rejected
    /// at spec build time.
    pub fn with<A, B>(mut self, f: impl Fn(A) -> B + Send + Sync + 'static) -> Self
    where
        A: Any + Clone,
        B: Any + Send + Sync,
    {
        Arc::make_mut(&mut self.chain).push(TypeKey::of::<A>(), TypeKey::of::<B>(), transform(f));
        self
    }

    /// Branch a child chain for scoped overrides. Additions on the child
    /// never affect this chain (structural sharing, not copy).
    pub fn child(&self) -> Self {
        Self {
            chain: Arc::new(self.chain.branch()),
        }
    }

    /// The wrapper parameter type this chain translates from.
    pub fn declared(&self) -> TypeKey {
        self.chain.declared()
    }

    /// Find the transform that can fill an origin parameter slot of the
    /// candidate type.
    pub fn resolve(&self, slot: TypeKey) -> Result<Transform, TranslateError> {
        self.chain.resolve(slot)
    }

    /// The first entry accepting a type other than the declared wrapper
    /// parameter type, if any. Validation rejects such chains eagerly.
    pub(crate) fn entry_input_mismatch(&self) -> Option<TypeKey> {
        self.chain.off_declared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::Value;

    #[test]
    fn identity_fills_like_typed_slot() {
        let chain = ParamChain::from::<String>();
        let t = chain.resolve(TypeKey::of::<String>()).unwrap();
        let out = t(Value::new("pass".to_string())).unwrap();
        assert_eq!(out.extract::<String>(), Some("pass".to_string()));
    }

    #[test]
    fn conversion_fills_foreign_slot() {
        let chain = ParamChain::from::<String>().with(|s: String| s.len() as i64);
        let t = chain.resolve(TypeKey::of::<i64>()).unwrap();
        let out = t(Value::new("four".to_string())).unwrap();
        assert_eq!(out.extract::<i64>(), Some(4));
    }

    #[test]
    fn unknown_slot_type_fails() {
        let chain = ParamChain::from::<String>();
        assert!(chain.resolve(TypeKey::of::<f64>()).is_err());
    }

    #[test]
    fn entry_accepting_a_foreign_type_is_reported() {
        let clean = ParamChain::from::<String>().with(|s: String| s.len() as i64);
        assert!(clean.entry_input_mismatch().is_none());

        let stray = ParamChain::from::<String>().with(|n: i64| n + 1);
        assert_eq!(stray.entry_input_mismatch(), Some(TypeKey::of::<i64>()));

        // The check follows parent chains.
        assert_eq!(
            stray.child().entry_input_mismatch(),
            Some(TypeKey::of::<i64>())
        );
    }
}

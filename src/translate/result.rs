//! Result translator chain
//!
//! Translates an origin member's return value into the wrapper method's
//! declared return type. Entries are keyed by the candidate type they
//! *accept* (the origin return type). The declared type is the wrapper
//! return type, seeded with an identity entry; a String-target chain is
//! additionally seeded with to-string entries for the primitive types —
//! the Rust rendition of a blanket to-string fallback.

use super::chain::{identity, transform, Chain, Keyed, Transform};
use super::TranslateError;
use crate::origin::TypeKey;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Overridable, inheritable conversion rules for one wrapper return type.
#[derive(Clone)]
pub struct ResultChain {
    chain: Arc<Chain>,
}

impl ResultChain {
    /// A chain producing the wrapper return type `T`.
    pub fn to<T: Any>() -> Self {
        Self::for_declared(TypeKey::of::<T>())
    }

    pub(crate) fn for_declared(declared: TypeKey) -> Self {
        let mut chain = Chain::new(declared, Keyed::Input);
        chain.push(declared, declared, identity());
        if declared.id() == TypeId::of::<String>() {
            seed_to_string(&mut chain);
        }
        Self {
            chain: Arc::new(chain),
        }
    }

    /// Append an entry accepting an origin return of type `A`. Later
    /// entries override earlier ones, including the seeded defaults.
    /// `B` must be the chain's declared type; a stray entry is rejected
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

    /// The wrapper return type this chain produces.
    pub fn declared(&self) -> TypeKey {
        self.chain.declared()
    }

    /// Find the transform accepting the candidate origin return type.
    pub fn resolve(&self, candidate: TypeKey) -> Result<Transform, TranslateError> {
        self.chain.resolve(candidate)
    }

    /// The first entry producing a type other than the declared return
    /// type, if any. Validation rejects such chains eagerly.
    pub(crate) fn entry_output_mismatch(&self) -> Option<TypeKey> {
        self.chain.off_declared()
    }
}

fn seed_to_string(chain: &mut Chain) {
    let target = TypeKey::of::<String>();
    chain.push(TypeKey::of::<i32>(), target, transform(|n: i32| n.to_string()));
    chain.push(TypeKey::of::<i64>(), target, transform(|n: i64| n.to_string()));
    chain.push(TypeKey::of::<u32>(), target, transform(|n: u32| n.to_string()));
    chain.push(TypeKey::of::<u64>(), target, transform(|n: u64| n.to_string()));
    chain.push(TypeKey::of::<f64>(), target, transform(|n: f64| n.to_string()));
    chain.push(TypeKey::of::<bool>(), target, transform(|b: bool| b.to_string()));
    chain.push(
        TypeKey::of::<&'static str>(),
        target,
        transform(|s: &'static str| s.to_string()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::Value;

    fn run(chain: &ResultChain, value: Value) -> String {
        let t = chain.resolve(value.key()).unwrap();
        t(value).unwrap().extract::<String>().unwrap()
    }

    #[test]
    fn override_law_last_registration_wins() {
        let chain = ResultChain::to::<String>()
            .with(|n: i64| format!("f({})", n))
            .with(|n: i64| format!("g({})", n));
        assert_eq!(run(&chain, Value::new(7i64)), "g(7)");
    }

    #[test]
    fn inheritance_law_child_falls_back_to_parent() {
        let parent = ResultChain::to::<String>().with(|n: i64| format!("parent({})", n));
        let child = parent.child().with(|b: bool| format!("child({})", b));

        // The unrelated child entry must not change resolution for i64.
        assert_eq!(run(&child, Value::new(3i64)), "parent(3)");
        assert_eq!(run(&child, Value::new(true)), "child(true)");
        // And the parent never sees the child's entry.
        assert!(parent.resolve(TypeKey::of::<bool>()).is_ok()); // seeded to-string
        assert_eq!(run(&parent, Value::new(true)), "true");
    }

    #[test]
    fn string_target_seeds_to_string_defaults() {
        let chain = ResultChain::to::<String>();
        assert_eq!(run(&chain, Value::new(42i64)), "42");
        assert_eq!(run(&chain, Value::new(false)), "false");
        assert_eq!(run(&chain, Value::new("hi".to_string())), "hi");
    }

    #[test]
    fn non_string_target_has_identity_only() {
        let chain = ResultChain::to::<i64>();
        assert!(chain.resolve(TypeKey::of::<i64>()).is_ok());
        assert!(chain.resolve(TypeKey::of::<i32>()).is_err());
    }

    #[test]
    fn entry_producing_a_foreign_type_is_reported() {
        let clean = ResultChain::to::<String>().with(|n: i64| n.to_string());
        assert!(clean.entry_output_mismatch().is_none());

        let stray = ResultChain::to::<String>().with(|_n: i64| 42u8);
        assert_eq!(stray.entry_output_mismatch(), Some(TypeKey::of::<u8>()));

        // The check follows parent chains.
        assert_eq!(
            stray.child().entry_output_mismatch(),
            Some(TypeKey::of::<u8>())
        );
    }
}

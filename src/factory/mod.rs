//! Adapter factory — validation, per-origin resolution, and memoization
//!
//! The orchestrator. A factory holds one validated `WrapperSpec`, the
//! origin registry, and a synthesizer; `constructor_for::<T>()` resolves
//! every descriptor against T's shape, hands the plans to the
//! synthesizer, and memoizes the resulting constructor per origin
//! `TypeId`. The cache guarantees at-most-one concrete type per
//! (spec, origin type) pair even under concurrent first use.

mod report;

pub use report::ResolutionReport;

use crate::descriptor::{ResolveCtx, ResolveError};
use crate::origin::{InvokeError, OriginRegistry, TypeKey};
use crate::synth::{
    AdapterHandle, CodeSynthesizer, ConcreteType, DispatchSynthesizer, SynthesisError,
};
use crate::wrapper::{SpecError, WrapperSpec};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Umbrella error for adapter generation.
#[derive(Debug, Error)]
pub enum GraftError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("origin type `{0}` is not registered")]
    UnknownOrigin(TypeKey),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

/// Result type for adapter generation.
pub type GraftResult<T> = Result<T, GraftError>;

/// A memoized adapter construction function for one
/// (wrapper spec, origin type) pair.
pub struct AdapterConstructor {
    concrete: Arc<dyn ConcreteType>,
    report: ResolutionReport,
}

impl AdapterConstructor {
    /// Build an adapter over one origin instance. The adapter borrows
    /// the origin through the shared reference; it never manages the
    /// origin's lifecycle.
    pub fn instantiate(&self, origin: Arc<dyn Any + Send + Sync>) -> GraftResult<AdapterHandle> {
        Ok(self.concrete.instantiate(origin)?)
    }

    pub fn origin_type(&self) -> TypeKey {
        self.concrete.origin_type()
    }

    pub fn report(&self) -> &ResolutionReport {
        &self.report
    }
}

/// Generates and caches adapter constructors for one wrapper spec.
pub struct AdapterFactory {
    spec: Arc<WrapperSpec>,
    registry: Arc<OriginRegistry>,
    synthesizer: Arc<dyn CodeSynthesizer>,
    cache: DashMap<TypeId, Arc<AdapterConstructor>>,
}

impl AdapterFactory {
    /// A factory with the default dispatch-table synthesizer.
    pub fn new(spec: WrapperSpec, registry: Arc<OriginRegistry>) -> Self {
        Self::with_synthesizer(spec, registry, Arc::new(DispatchSynthesizer))
    }

    pub fn with_synthesizer(
        spec: WrapperSpec,
        registry: Arc<OriginRegistry>,
        synthesizer: Arc<dyn CodeSynthesizer>,
    ) -> Self {
        Self {
            spec: Arc::new(spec),
            registry,
            synthesizer,
            cache: DashMap::new(),
        }
    }

    /// The constructor for origin type `T`, generating it on first use.
    ///
    /// Generation happens under the cache entry lock, so concurrent
    /// first calls for the same `T` materialize exactly one concrete
    /// type. Errors are not cached; a failed generation is retried on
    /// the next call.
    pub fn constructor_for<T: Any>(&self) -> GraftResult<Arc<AdapterConstructor>> {
        let id = TypeId::of::<T>();
        if let Some(found) = self.cache.get(&id) {
            debug!(origin = %found.origin_type(), "constructor cache hit");
            return Ok(found.clone());
        }
        match self.cache.entry(id) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let shape = self
                    .registry
                    .shape(id)
                    .ok_or_else(|| GraftError::UnknownOrigin(TypeKey::of::<T>()))?;
                let constructor = self.generate(&shape)?;
                Ok(entry.insert(constructor).clone())
            }
        }
    }

    /// Generate the constructor for `T` and instantiate it over `origin`
    /// in one call.
    pub fn adapt<T: Any + Send + Sync>(&self, origin: T) -> GraftResult<AdapterHandle> {
        let constructor = self.constructor_for::<T>()?;
        constructor.instantiate(Arc::new(origin))
    }

    fn generate(
        &self,
        shape: &crate::origin::OriginShape,
    ) -> GraftResult<Arc<AdapterConstructor>> {
        let wrapper = self.spec.def().name().to_string();
        let origin = shape.key();
        debug!(wrapper = %wrapper, origin = %origin, "generating adapter type");

        let ctx = ResolveCtx {
            shape,
            synthesizer: self.synthesizer.as_ref(),
        };
        let mut plans = Vec::new();
        for (name, descriptor) in self.spec.descriptors() {
            let method = self
                .spec
                .def()
                .method_named(name)
                .ok_or_else(|| ResolveError::Internal(format!("undescribed method `{name}`")))?;
            let plan = descriptor.resolve(&ctx, method)?;
            debug!(
                wrapper = %wrapper,
                method = name,
                kind = plan.summary.kind,
                member = plan.summary.member.as_deref().unwrap_or("-"),
                "resolved"
            );
            plans.push(plan);
        }

        let report = ResolutionReport {
            wrapper,
            origin: origin.name().to_string(),
            methods: plans.iter().map(|p| p.summary.clone()).collect(),
        };
        let concrete =
            self.synthesizer
                .synthesize(self.spec.def().clone(), origin, plans)?;
        Ok(Arc::new(AdapterConstructor { concrete, report }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DirectDescriptor, SingletonDescriptor};
    use crate::origin::{MethodMember, OriginShape};
    use crate::wrapper::{WrapperDef, WrapperMethodDef, WrapperSpec};

    struct Alpha;
    struct Beta;

    fn registry() -> Arc<OriginRegistry> {
        let registry = OriginRegistry::new();
        registry.register(
            OriginShape::describe::<Alpha>()
                .method(
                    MethodMember::build("answer")
                        .marked("pick")
                        .returns::<i64>()
                        .invoke0(|_: &Alpha| 40i64),
                )
                .finish(),
        );
        registry.register(OriginShape::describe::<Beta>().finish());
        Arc::new(registry)
    }

    fn spec() -> WrapperSpec {
        WrapperSpec::builder(
            WrapperDef::new("Wrapper")
                .method(WrapperMethodDef::new("get").returns::<i64>())
                .method(WrapperMethodDef::new("tag").returns::<String>()),
        )
        .describe("get", SingletonDescriptor::marked("pick"))
        .describe("tag", DirectDescriptor::constant("fixed".to_string()))
        .build()
        .unwrap()
    }

    #[test]
    fn generates_and_caches_per_origin_type() {
        let factory = AdapterFactory::new(spec(), registry());

        let first = factory.constructor_for::<Alpha>().unwrap();
        let second = factory.constructor_for::<Alpha>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let adapter = first.instantiate(Arc::new(Alpha)).unwrap();
        assert_eq!(adapter.call("get", Vec::new()).unwrap().extract::<i64>(), Some(40));
        assert_eq!(
            adapter.call("tag", Vec::new()).unwrap().extract::<String>(),
            Some("fixed".to_string())
        );
    }

    #[test]
    fn unknown_origin_type_is_an_error() {
        let factory = AdapterFactory::new(spec(), registry());
        assert!(matches!(
            factory.constructor_for::<String>(),
            Err(GraftError::UnknownOrigin(_))
        ));
    }

    #[test]
    fn unresolvable_origin_fails_and_is_not_cached() {
        let factory = AdapterFactory::new(spec(), registry());
        // Beta has no member marked `pick` and the descriptor has no default.
        assert!(matches!(
            factory.constructor_for::<Beta>(),
            Err(GraftError::Resolve(ResolveError::Unsatisfied { .. }))
        ));
        // Still fails the same way on retry; no partial type was exposed.
        assert!(factory.constructor_for::<Beta>().is_err());
    }

    #[test]
    fn adapt_is_constructor_plus_instantiate() {
        let factory = AdapterFactory::new(spec(), registry());
        let adapter = factory.adapt(Alpha).unwrap();
        assert_eq!(adapter.call("get", Vec::new()).unwrap().extract::<i64>(), Some(40));
    }

    #[test]
    fn report_names_resolved_members() {
        let factory = AdapterFactory::new(spec(), registry());
        let constructor = factory.constructor_for::<Alpha>().unwrap();
        let report = constructor.report();
        assert_eq!(report.wrapper, "Wrapper");
        assert_eq!(report.methods.len(), 2);
        assert_eq!(report.methods[0].member.as_deref(), Some("answer"));
        assert_eq!(report.methods[1].kind, "direct");
    }
}

//! List descriptor — one wrapper method onto *every* matching member
//!
//! Each match gets its own element adapter: a synthesized implementation
//! of a declared single-method ("functional") element interface, bound to
//! that one member through a fixed selector and the same binder/result
//! machinery the singleton descriptor uses. The generated method returns
//! the ordered element adapters — method matches first, then field
//! matches, in shape-registration order, so generation is reproducible.

use super::plan::{InitStep, MethodImpl, MethodPlan};
use super::singleton::{validate_binder, SingletonDescriptor};
use super::{ResolveCtx, ResolveError};
use crate::bind::{BinderUnion, ParamBinder};
use crate::origin::InvokeError;
use crate::select::{FixedSelector, MemberSelector};
use crate::select::MarkerSelector;
use crate::synth::{AdapterHandle, ConcreteType};
use crate::translate::ResultChain;
use crate::wrapper::{SpecError, WrapperDef, WrapperMethodDef};
use std::sync::Arc;

/// How each matched member becomes an element adapter.
#[derive(Clone)]
pub struct ElementSpec {
    interface: Arc<WrapperDef>,
    binder: BinderUnion,
    results: Option<ResultChain>,
}

impl ElementSpec {
    /// The element interface must declare exactly one method; that is
    /// checked eagerly at `WrapperSpec` build time.
    pub fn new(interface: WrapperDef) -> Self {
        Self {
            interface: Arc::new(interface),
            binder: BinderUnion::new(),
            results: None,
        }
    }

    pub fn bind(mut self, binder: ParamBinder) -> Self {
        self.binder.push(binder);
        self
    }

    pub fn results(mut self, chain: ResultChain) -> Self {
        self.results = Some(chain);
        self
    }

    pub fn interface(&self) -> &Arc<WrapperDef> {
        &self.interface
    }

    pub(super) fn validate(&self, wrapper_method: &str) -> Result<(), SpecError> {
        let count = self.interface.methods().len();
        if count != 1 {
            return Err(SpecError::ElementNotFunctional {
                method: wrapper_method.to_string(),
                interface: self.interface.name().to_string(),
                count,
            });
        }
        let element_method = &self.interface.methods()[0];
        if let Some(chain) = &self.results {
            if chain.declared().id() != element_method.returns.id() {
                return Err(SpecError::ResultChainMismatch {
                    method: element_method.name.clone(),
                    declared: chain.declared(),
                    expected: element_method.returns,
                });
            }
            if let Some(produces) = chain.entry_output_mismatch() {
                return Err(SpecError::ResultEntryOutput {
                    method: element_method.name.clone(),
                    produces,
                    declared: chain.declared(),
                });
            }
        }
        validate_binder(&self.binder, element_method)
    }

    fn element_method(&self) -> Result<&WrapperMethodDef, ResolveError> {
        self.interface.methods().first().ok_or_else(|| {
            ResolveError::Internal(format!(
                "element interface `{}` has no method",
                self.interface.name()
            ))
        })
    }

    /// Synthesize the element adapter for one fixed member.
    pub(super) fn synthesize_for(
        &self,
        ctx: &ResolveCtx<'_>,
        selector: FixedSelector,
    ) -> Result<Arc<dyn ConcreteType>, ResolveError> {
        let descriptor = {
            let mut d = SingletonDescriptor::with_selector(Arc::new(selector))
                .binders(self.binder.clone());
            if let Some(chain) = &self.results {
                d = d.results(chain.clone());
            }
            d
        };
        let plan = descriptor.resolve(ctx, self.element_method()?)?;
        ctx.synthesizer
            .synthesize(self.interface.clone(), ctx.shape.key(), vec![plan])
            .map_err(Into::into)
    }
}

/// Maps one wrapper method to every matching origin member, producing an
/// ordered `Vec<AdapterHandle>` of element adapters.
pub struct ListDescriptor {
    selector: Arc<dyn MemberSelector>,
    element: ElementSpec,
}

impl ListDescriptor {
    pub fn marked(marker: impl Into<String>, element: ElementSpec) -> Self {
        Self::with_selector(Arc::new(MarkerSelector::new(marker)), element)
    }

    pub fn with_selector(selector: Arc<dyn MemberSelector>, element: ElementSpec) -> Self {
        Self { selector, element }
    }

    pub(crate) fn validate(&self, method: &WrapperMethodDef) -> Result<(), SpecError> {
        self.element.validate(&method.name)
    }

    pub(crate) fn resolve(
        &self,
        ctx: &ResolveCtx<'_>,
        method: &WrapperMethodDef,
    ) -> Result<MethodPlan, ResolveError> {
        let mut protos: Vec<Arc<dyn ConcreteType>> = Vec::new();
        let mut names: Vec<String> = Vec::new();

        for member in self.selector.select_methods(ctx.shape) {
            names.push(member.name.clone());
            protos.push(self.element.synthesize_for(ctx, FixedSelector::method(member))?);
        }
        for member in self.selector.select_fields(ctx.shape) {
            names.push(member.name.clone());
            protos.push(self.element.synthesize_for(ctx, FixedSelector::field(member))?);
        }

        let init: InitStep = Arc::new(move |origin| {
            let mut handles: Vec<AdapterHandle> = Vec::with_capacity(protos.len());
            for proto in &protos {
                handles.push(proto.instantiate(origin.clone())?);
            }
            Ok(crate::origin::Value::new(handles))
        });
        let imp: MethodImpl = Arc::new(move |ctx, _args| {
            ctx.slot
                .cloned()
                .ok_or_else(|| InvokeError::Origin("element list slot missing".into()))
        });

        Ok(MethodPlan::leaf(&method.name, "list", imp)
            .with_elements(names)
            .with_init(init))
    }
}

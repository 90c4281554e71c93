//! Singleton descriptor — one wrapper method onto exactly one member
//!
//! Resolution walks the selector's matches: one match binds parameters
//! and the result chain; zero matches fall back to a configured constant
//! default (or fail); more than one match is ambiguous and always fails.

use super::plan::{MethodImpl, MethodPlan};
use super::{ResolveCtx, ResolveError};
use crate::bind::{BinderUnion, ParamBinder, ValueSource};
use crate::origin::{FieldMember, MethodMember, Value};
use crate::select::{MarkerSelector, MemberSelector};
use crate::translate::ResultChain;
use crate::wrapper::{SpecError, WrapperMethodDef};
use std::any::Any;
use std::sync::Arc;

/// Maps one wrapper method to exactly one matching origin member, or to
/// a constant default if none matches.
pub struct SingletonDescriptor {
    selector: Arc<dyn MemberSelector>,
    binder: BinderUnion,
    results: Option<ResultChain>,
    default: Option<Value>,
}

impl SingletonDescriptor {
    /// Select by marker — the declarative path.
    pub fn marked(marker: impl Into<String>) -> Self {
        Self::with_selector(Arc::new(MarkerSelector::new(marker)))
    }

    pub fn with_selector(selector: Arc<dyn MemberSelector>) -> Self {
        Self {
            selector,
            binder: BinderUnion::new(),
            results: None,
            default: None,
        }
    }

    /// Add one parameter binder. Binders contribute in registration
    /// order; later binders overwrite overlapping positions.
    pub fn bind(mut self, binder: ParamBinder) -> Self {
        self.binder.push(binder);
        self
    }

    pub fn binders(mut self, union: BinderUnion) -> Self {
        self.binder = union;
        self
    }

    /// Override the result chain. Without one, an identity chain for the
    /// wrapper method's return type is derived.
    pub fn results(mut self, chain: ResultChain) -> Self {
        self.results = Some(chain);
        self
    }

    /// Constant returned when the selector matches nothing.
    pub fn or_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(Value::new(value));
        self
    }

    fn results_for(&self, method: &WrapperMethodDef) -> ResultChain {
        match &self.results {
            Some(chain) => chain.clone(),
            None => ResultChain::for_declared(method.returns),
        }
    }

    pub(crate) fn validate(&self, method: &WrapperMethodDef) -> Result<(), SpecError> {
        if let Some(chain) = &self.results {
            if chain.declared().id() != method.returns.id() {
                return Err(SpecError::ResultChainMismatch {
                    method: method.name.clone(),
                    declared: chain.declared(),
                    expected: method.returns,
                });
            }
            if let Some(produces) = chain.entry_output_mismatch() {
                return Err(SpecError::ResultEntryOutput {
                    method: method.name.clone(),
                    produces,
                    declared: chain.declared(),
                });
            }
        }
        if let Some(default) = &self.default {
            if default.key().id() != method.returns.id() {
                return Err(SpecError::DefaultTypeMismatch {
                    method: method.name.clone(),
                    declared: default.key(),
                    expected: method.returns,
                });
            }
        }
        validate_binder(&self.binder, method)
    }

    pub(crate) fn resolve(
        &self,
        ctx: &ResolveCtx<'_>,
        method: &WrapperMethodDef,
    ) -> Result<MethodPlan, ResolveError> {
        let methods = self.selector.select_methods(ctx.shape);
        let fields = self.selector.select_fields(ctx.shape);

        match methods.len() + fields.len() {
            0 => match &self.default {
                Some(default) => {
                    let constant = default.clone();
                    let imp: MethodImpl = Arc::new(move |_ctx, _args| Ok(constant.clone()));
                    Ok(MethodPlan::leaf(&method.name, "constant", imp))
                }
                None => Err(ResolveError::Unsatisfied {
                    method: method.name.clone(),
                    origin: ctx.shape.key(),
                    selector: self.selector.describe(),
                }),
            },
            1 => match methods.first() {
                Some(member) => self.method_plan(method, member),
                None => self.field_plan(method, &fields[0]),
            },
            _ => Err(ResolveError::Ambiguous {
                method: method.name.clone(),
                origin: ctx.shape.key(),
                selector: self.selector.describe(),
                members: methods
                    .iter()
                    .map(|m| m.name.clone())
                    .chain(fields.iter().map(|f| f.name.clone()))
                    .collect(),
            }),
        }
    }

    fn method_plan(
        &self,
        method: &WrapperMethodDef,
        member: &Arc<MethodMember>,
    ) -> Result<MethodPlan, ResolveError> {
        let bindings = self
            .binder
            .bind(method, member)
            .map_err(|source| ResolveError::Bind {
                method: method.name.clone(),
                source,
            })?;
        let transform = self.results_for(method).resolve(member.returns).map_err(
            |source| ResolveError::ResultTranslate {
                method: method.name.clone(),
                source,
            },
        )?;

        let member = member.clone();
        let member_name = member.name.clone();
        let imp: MethodImpl = Arc::new(move |ctx, args| {
            let mut argv = Vec::with_capacity(bindings.len());
            for binding in &bindings {
                argv.push(binding.produce(&args)?);
            }
            let out = member.invoke(ctx.origin_dyn(), argv)?;
            transform(out)
        });
        Ok(MethodPlan::leaf(&method.name, "singleton", imp).with_member(member_name))
    }

    fn field_plan(
        &self,
        method: &WrapperMethodDef,
        member: &Arc<FieldMember>,
    ) -> Result<MethodPlan, ResolveError> {
        let transform = self.results_for(method).resolve(member.ty).map_err(|source| {
            ResolveError::ResultTranslate {
                method: method.name.clone(),
                source,
            }
        })?;

        let member = member.clone();
        let member_name = member.name.clone();
        let imp: MethodImpl = Arc::new(move |ctx, _args| {
            let out = member.get(ctx.origin_dyn())?;
            transform(out)
        });
        Ok(MethodPlan::leaf(&method.name, "singleton", imp).with_member(member_name))
    }
}

/// Shared eager checks for a binder union against a wrapper method.
pub(super) fn validate_binder(
    union: &BinderUnion,
    method: &WrapperMethodDef,
) -> Result<(), SpecError> {
    for binder in union.binders() {
        if let ValueSource::WrapperParam { index, chain } = binder.source() {
            let declared =
                method
                    .params
                    .get(*index)
                    .ok_or_else(|| SpecError::WrapperParamIndex {
                        method: method.name.clone(),
                        index: *index,
                        available: method.params.len(),
                    })?;
            if let Some(chain) = chain {
                if chain.declared().id() != declared.id() {
                    return Err(SpecError::ParamChainMismatch {
                        method: method.name.clone(),
                        index: *index,
                        declared: chain.declared(),
                        expected: *declared,
                    });
                }
                if let Some(accepts) = chain.entry_input_mismatch() {
                    return Err(SpecError::ParamEntryInput {
                        method: method.name.clone(),
                        index: *index,
                        accepts,
                        declared: chain.declared(),
                    });
                }
            }
        }
    }
    Ok(())
}

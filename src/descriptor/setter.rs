//! Setter descriptor — write-through onto one writable member
//!
//! The selector yields zero or one writable member. One match binds the
//! wrapper arguments to the member's value and writes through; zero
//! matches generate a no-op; more than one match is ambiguous (the
//! singleton policy). No result chain is involved — the method returns
//! unit, or echoes the written value when the wrapper method declares a
//! non-unit return.

use super::plan::{MethodImpl, MethodPlan};
use super::singleton::validate_binder;
use super::{ResolveCtx, ResolveError};
use crate::bind::{BinderUnion, ParamBinder};
use crate::origin::{FieldMember, MethodMember, ParamSpec, Value};
use crate::select::{MarkerSelector, MemberSelector};
use crate::wrapper::{SpecError, WrapperMethodDef};
use std::sync::Arc;

/// Maps one wrapper method onto at most one writable origin member.
pub struct SetterDescriptor {
    selector: Arc<dyn MemberSelector>,
    binder: BinderUnion,
}

impl SetterDescriptor {
    pub fn marked(marker: impl Into<String>) -> Self {
        Self::with_selector(Arc::new(MarkerSelector::new(marker)))
    }

    pub fn with_selector(selector: Arc<dyn MemberSelector>) -> Self {
        Self {
            selector,
            binder: BinderUnion::new(),
        }
    }

    pub fn bind(mut self, binder: ParamBinder) -> Self {
        self.binder.push(binder);
        self
    }

    pub fn binders(mut self, union: BinderUnion) -> Self {
        self.binder = union;
        self
    }

    pub(crate) fn validate(&self, method: &WrapperMethodDef) -> Result<(), SpecError> {
        if method.params.is_empty() {
            return Err(SpecError::SetterWithoutValue {
                method: method.name.clone(),
            });
        }
        if !method.returns.is_unit() && method.returns.id() != method.params[0].id() {
            return Err(SpecError::SetterReturn {
                method: method.name.clone(),
                returns: method.returns,
                first_param: method.params[0],
            });
        }
        validate_binder(&self.binder, method)
    }

    pub(crate) fn resolve(
        &self,
        ctx: &ResolveCtx<'_>,
        method: &WrapperMethodDef,
    ) -> Result<MethodPlan, ResolveError> {
        let methods = self.selector.select_methods(ctx.shape);
        let fields: Vec<Arc<FieldMember>> = self
            .selector
            .select_fields(ctx.shape)
            .into_iter()
            .filter(|f| f.is_writable())
            .collect();
        let echoes = !method.returns.is_unit();

        match methods.len() + fields.len() {
            0 => {
                // No-op setter: nothing to write on this origin type.
                let imp: MethodImpl = Arc::new(move |_ctx, args| {
                    Ok(match (echoes, args.into_iter().next()) {
                        (true, Some(arg)) => arg,
                        _ => Value::unit(),
                    })
                });
                Ok(MethodPlan::leaf(&method.name, "setter", imp))
            }
            1 => match methods.first() {
                Some(member) => self.method_plan(method, member, echoes),
                None => self.field_plan(method, &fields[0], echoes),
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
        echoes: bool,
    ) -> Result<MethodPlan, ResolveError> {
        let bindings = self
            .binder
            .bind(method, member)
            .map_err(|source| ResolveError::Bind {
                method: method.name.clone(),
                source,
            })?;

        let member = member.clone();
        let member_name = member.name.clone();
        let imp: MethodImpl = Arc::new(move |ctx, args| {
            let mut argv = Vec::with_capacity(bindings.len());
            for binding in &bindings {
                argv.push(binding.produce(&args)?);
            }
            member.invoke(ctx.origin_dyn(), argv)?;
            Ok(match (echoes, args.into_iter().next()) {
                (true, Some(arg)) => arg,
                _ => Value::unit(),
            })
        });
        Ok(MethodPlan::leaf(&method.name, "setter", imp).with_member(member_name))
    }

    fn field_plan(
        &self,
        method: &WrapperMethodDef,
        member: &Arc<FieldMember>,
        echoes: bool,
    ) -> Result<MethodPlan, ResolveError> {
        // The field's value is bound like a single pseudo-parameter, so
        // filters and chains behave exactly as for a method setter.
        let pseudo = ParamSpec {
            name: member.name.clone(),
            ty: member.ty,
            markers: member.markers.clone(),
        };
        let bindings = self
            .binder
            .bind_params(method, std::slice::from_ref(&pseudo), &member.name)
            .map_err(|source| ResolveError::Bind {
                method: method.name.clone(),
                source,
            })?;

        let member = member.clone();
        let member_name = member.name.clone();
        let imp: MethodImpl = Arc::new(move |ctx, args| {
            let value = bindings[0].produce(&args)?;
            member.set(ctx.origin_dyn(), value.clone())?;
            Ok(if echoes { value } else { Value::unit() })
        });
        Ok(MethodPlan::leaf(&method.name, "setter", imp).with_member(member_name))
    }
}

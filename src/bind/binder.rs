//! Parameter binders and the binder union
//!
//! A binder pairs a filter (which origin parameter positions it claims)
//! with a value source. A union of binders produces the complete,
//! positionally-indexed assignment for one origin method: binders run in
//! registration order and a later binder silently overwrites positions an
//! earlier one claimed (last wins — the same override policy the
//! translator chains use). A position left uncovered after the union is
//! an error naming every gap.

use super::filter::ParamFilter;
use super::source::ValueSource;
use crate::origin::{InvokeError, MethodMember, ParamSpec, TypeKey, Value};
use crate::translate::{ParamChain, TranslateError, Transform};
use crate::wrapper::WrapperMethodDef;
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// One filter × source pair contributing bindings to a union.
#[derive(Clone)]
pub struct ParamBinder {
    filter: ParamFilter,
    source: ValueSource,
}

impl ParamBinder {
    pub fn new(filter: ParamFilter, source: ValueSource) -> Self {
        Self { filter, source }
    }

    /// Route wrapper argument `index` into the origin positions carrying
    /// `marker`, using the derived identity chain.
    pub fn route(marker: impl Into<String>, index: usize) -> Self {
        Self::new(ParamFilter::marked(marker), ValueSource::wrapper_param(index))
    }

    /// Like [`route`](Self::route), with an explicit parameter chain.
    pub fn route_via(marker: impl Into<String>, index: usize, chain: ParamChain) -> Self {
        Self::new(
            ParamFilter::marked(marker),
            ValueSource::wrapper_param_via(index, chain),
        )
    }

    /// Supply a constant to the positions the filter claims.
    pub fn constant<T: Any + Send + Sync>(filter: ParamFilter, value: T) -> Self {
        Self::new(filter, ValueSource::constant(value))
    }

    pub(crate) fn source(&self) -> &ValueSource {
        &self.source
    }
}

/// A resolved assignment for one origin parameter position.
pub struct Binding {
    pub position: usize,
    pub ty: TypeKey,
    source: BoundSource,
}

enum BoundSource {
    Constant(Value),
    WrapperParam { index: usize, transform: Transform },
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            BoundSource::Constant(value) => format!("constant {:?}", value),
            BoundSource::WrapperParam { index, .. } => format!("wrapper arg {}", index),
        };
        f.debug_struct("Binding")
            .field("position", &self.position)
            .field("ty", &self.ty)
            .field("source", &source)
            .finish()
    }
}

impl Binding {
    /// Produce the value for this position from the wrapper arguments.
    pub fn produce(&self, wrapper_args: &[Value]) -> Result<Value, InvokeError> {
        match &self.source {
            BoundSource::Constant(value) => Ok(value.clone()),
            BoundSource::WrapperParam { index, transform } => {
                let arg = wrapper_args.get(*index).cloned().ok_or(
                    InvokeError::ArgumentDowncast {
                        position: *index,
                        expected: self.ty,
                    },
                )?;
                transform(arg)
            }
        }
    }
}

/// An uncovered parameter position, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGap {
    pub position: usize,
    pub ty: TypeKey,
}

impl fmt::Display for BindGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "position {} (`{}`)", self.position, self.ty)
    }
}

/// Errors from binding an origin method's parameters.
#[derive(Debug, Error)]
pub enum BindError {
    #[error(
        "missing parameter binder for `{target}`: {}",
        .missing.iter().map(|g| g.to_string()).collect::<Vec<_>>().join(", ")
    )]
    MissingBindings {
        target: String,
        missing: Vec<BindGap>,
    },

    #[error("wrapper argument index {index} out of range binding `{target}` ({available} declared)")]
    WrapperIndex {
        target: String,
        index: usize,
        available: usize,
    },

    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Ordered collection of binders covering one origin method.
#[derive(Clone, Default)]
pub struct BinderUnion {
    binders: Vec<ParamBinder>,
}

impl BinderUnion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, binder: ParamBinder) -> Self {
        self.binders.push(binder);
        self
    }

    pub fn push(&mut self, binder: ParamBinder) {
        self.binders.push(binder);
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    pub(crate) fn binders(&self) -> &[ParamBinder] {
        &self.binders
    }

    /// Bind every parameter position of an origin method.
    pub fn bind(
        &self,
        wrapper: &WrapperMethodDef,
        method: &MethodMember,
    ) -> Result<Vec<Binding>, BindError> {
        self.bind_params(wrapper, &method.params, &method.name)
    }

    /// Bind an explicit parameter list. Used directly by setter
    /// descriptors, which bind a field's value as a single pseudo-param.
    pub(crate) fn bind_params(
        &self,
        wrapper: &WrapperMethodDef,
        params: &[ParamSpec],
        target: &str,
    ) -> Result<Vec<Binding>, BindError> {
        let mut slots: Vec<Option<Binding>> = params.iter().map(|_| None).collect();

        for binder in &self.binders {
            for (position, param) in params.iter().enumerate() {
                if !binder.filter.accepts(position, param) {
                    continue;
                }
                // Last registration wins: a later binder overwrites the slot.
                slots[position] = Some(resolve_binding(
                    &binder.source,
                    wrapper,
                    position,
                    param,
                    target,
                )?);
            }
        }

        let missing: Vec<BindGap> = slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(position, _)| BindGap {
                position,
                ty: params[position].ty,
            })
            .collect();
        if !missing.is_empty() {
            return Err(BindError::MissingBindings {
                target: target.to_string(),
                missing,
            });
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

fn resolve_binding(
    source: &ValueSource,
    wrapper: &WrapperMethodDef,
    position: usize,
    param: &ParamSpec,
    target: &str,
) -> Result<Binding, BindError> {
    let source = match source {
        ValueSource::Constant(value) => BoundSource::Constant(value.clone()),
        ValueSource::WrapperParam { index, chain } => {
            let declared = *wrapper.params.get(*index).ok_or(BindError::WrapperIndex {
                target: target.to_string(),
                index: *index,
                available: wrapper.params.len(),
            })?;
            let chain = match chain {
                Some(chain) => chain.clone(),
                None => ParamChain::for_declared(declared),
            };
            let transform = chain.resolve(param.ty)?;
            BoundSource::WrapperParam {
                index: *index,
                transform,
            }
        }
    };
    Ok(Binding {
        position,
        ty: param.ty,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::MethodMember;
    use crate::wrapper::WrapperMethodDef;

    struct Sample;

    fn two_string_method() -> MethodMember {
        MethodMember::build("concat")
            .param(ParamSpec::of::<String>("a").marked("first"))
            .param(ParamSpec::of::<String>("b").marked("second"))
            .returns::<String>()
            .invoke2(|_: &Sample, a: String, b: String| format!("{} {}", a, b))
    }

    fn wrapper_two_strings() -> WrapperMethodDef {
        WrapperMethodDef::new("common")
            .param::<String>()
            .param::<String>()
            .returns::<String>()
    }

    #[test]
    fn marker_routing_covers_all_positions() {
        let union = BinderUnion::new()
            .with(ParamBinder::route("first", 0))
            .with(ParamBinder::route("second", 1));
        let bindings = union.bind(&wrapper_two_strings(), &two_string_method()).unwrap();
        assert_eq!(bindings.len(), 2);

        let args = vec![Value::new("Hello".to_string()), Value::new("World".to_string())];
        assert_eq!(
            bindings[0].produce(&args).unwrap().extract::<String>(),
            Some("Hello".to_string())
        );
        assert_eq!(
            bindings[1].produce(&args).unwrap().extract::<String>(),
            Some("World".to_string())
        );
    }

    #[test]
    fn binding_debug_names_position_and_source() {
        let union = BinderUnion::new()
            .with(ParamBinder::route("first", 0))
            .with(ParamBinder::route("second", 1));
        let bindings = union.bind(&wrapper_two_strings(), &two_string_method()).unwrap();
        let dump = format!("{:?}", bindings[0]);
        assert!(dump.contains("position: 0"));
        assert!(dump.contains("wrapper arg 0"));
    }

    #[test]
    fn uncovered_positions_fail_naming_each_gap() {
        let union = BinderUnion::new().with(ParamBinder::route("first", 0));
        let err = union
            .bind(&wrapper_two_strings(), &two_string_method())
            .unwrap_err();
        match err {
            BindError::MissingBindings { target, missing } => {
                assert_eq!(target, "concat");
                assert_eq!(missing.len(), 1);
                assert_eq!(missing[0].position, 1);
                assert_eq!(missing[0].ty, TypeKey::of::<String>());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn later_binder_overwrites_earlier_claim() {
        let union = BinderUnion::new()
            .with(ParamBinder::constant(ParamFilter::All, "default".to_string()))
            .with(ParamBinder::constant(
                ParamFilter::position(1),
                "override".to_string(),
            ));
        let bindings = union.bind(&wrapper_two_strings(), &two_string_method()).unwrap();

        let args: Vec<Value> = Vec::new();
        assert_eq!(
            bindings[0].produce(&args).unwrap().extract::<String>(),
            Some("default".to_string())
        );
        assert_eq!(
            bindings[1].produce(&args).unwrap().extract::<String>(),
            Some("override".to_string())
        );
    }

    #[test]
    fn routed_binding_applies_translation() {
        let method = MethodMember::build("store")
            .param(ParamSpec::of::<i64>("n").marked("length"))
            .returns::<i64>()
            .invoke1(|_: &Sample, n: i64| n);
        let wrapper = WrapperMethodDef::new("put").param::<String>().returns::<i64>();

        let chain = ParamChain::from::<String>().with(|s: String| s.len() as i64);
        let union = BinderUnion::new().with(ParamBinder::route_via("length", 0, chain));

        let bindings = union.bind(&wrapper, &method).unwrap();
        let args = vec![Value::new("four".to_string())];
        assert_eq!(bindings[0].produce(&args).unwrap().extract::<i64>(), Some(4));
    }

    #[test]
    fn unresolvable_slot_type_is_a_translate_error() {
        let method = MethodMember::build("store")
            .param(ParamSpec::of::<f64>("n").marked("length"))
            .returns::<f64>()
            .invoke1(|_: &Sample, n: f64| n);
        let wrapper = WrapperMethodDef::new("put").param::<String>().returns::<f64>();

        let union = BinderUnion::new().with(ParamBinder::route("length", 0));
        let err = union.bind(&wrapper, &method).unwrap_err();
        assert!(matches!(err, BindError::Translate(_)));
    }

    #[test]
    fn out_of_range_wrapper_index_is_reported() {
        let union = BinderUnion::new().with(ParamBinder::route("first", 5));
        let err = union
            .bind(&wrapper_two_strings(), &two_string_method())
            .unwrap_err();
        assert!(matches!(err, BindError::WrapperIndex { index: 5, .. }));
    }
}

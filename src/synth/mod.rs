//! Code synthesizer seam and the generated adapter surface
//!
//! The synthesizer is the opaque collaborator that materializes a
//! concrete type from a fully resolved specification. The core never
//! inspects how: anything satisfying [`CodeSynthesizer`] is
//! substitutable. The bundled default is the dispatch-table rendition in
//! [`DispatchSynthesizer`].

mod dispatch;

pub use dispatch::DispatchSynthesizer;

use crate::descriptor::{CallCtx, MethodPlan, OriginRef};
use crate::origin::{InvokeError, TypeKey, Value};
use crate::wrapper::WrapperDef;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// A generated adapter instance: one origin reference behind one
/// wrapper interface.
pub type AdapterHandle = Arc<AdapterInstance>;

/// Errors reported by a synthesizer.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("cannot synthesize `{interface}` over `{origin}`: {detail}")]
    Failed {
        interface: String,
        origin: TypeKey,
        detail: String,
    },

    #[error("plans for `{interface}` disagree with its method set: {detail}")]
    PlanMismatch { interface: String, detail: String },
}

/// Handle to a synthesized concrete type: instantiate it over origin
/// instances of the type it was generated for.
pub trait ConcreteType: Send + Sync {
    fn interface(&self) -> &Arc<WrapperDef>;

    fn origin_type(&self) -> TypeKey;

    fn instantiate(&self, origin: OriginRef) -> Result<AdapterHandle, InvokeError>;
}

/// The opaque capability that materializes a concrete type from resolved
/// method plans.
pub trait CodeSynthesizer: Send + Sync {
    fn synthesize(
        &self,
        interface: Arc<WrapperDef>,
        origin: TypeKey,
        plans: Vec<MethodPlan>,
    ) -> Result<Arc<dyn ConcreteType>, SynthesisError>;
}

/// A generated adapter bound to one origin instance.
///
/// Calls are dispatched by method name; arity and argument types are
/// checked against the wrapper interface before the synthesized body
/// runs. Failures of the wrapped origin member propagate unmodified.
pub struct AdapterInstance {
    interface: Arc<WrapperDef>,
    plans: Arc<Vec<MethodPlan>>,
    index: Arc<HashMap<String, usize>>,
    origin: OriginRef,
    slots: Vec<Option<Value>>,
}

impl AdapterInstance {
    /// Run the init steps (in plan order) and assemble an instance.
    pub(crate) fn assemble(
        interface: Arc<WrapperDef>,
        plans: Arc<Vec<MethodPlan>>,
        index: Arc<HashMap<String, usize>>,
        origin: OriginRef,
    ) -> Result<AdapterHandle, InvokeError> {
        let mut slots = Vec::with_capacity(plans.len());
        for plan in plans.iter() {
            slots.push(match &plan.init {
                Some(init) => Some(init(&origin)?),
                None => None,
            });
        }
        Ok(Arc::new(Self {
            interface,
            plans,
            index,
            origin,
            slots,
        }))
    }

    pub fn interface(&self) -> &Arc<WrapperDef> {
        &self.interface
    }

    pub fn origin(&self) -> &OriginRef {
        &self.origin
    }

    /// Invoke a wrapper method by name.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, InvokeError> {
        let position = *self
            .index
            .get(method)
            .ok_or_else(|| InvokeError::MethodNotFound(method.to_string()))?;
        let plan = &self.plans[position];
        let def = self
            .interface
            .method_named(method)
            .ok_or_else(|| InvokeError::MethodNotFound(method.to_string()))?;

        if args.len() != def.params.len() {
            return Err(InvokeError::Arity {
                method: method.to_string(),
                expected: def.params.len(),
                got: args.len(),
            });
        }
        for (position, (arg, expected)) in args.iter().zip(&def.params).enumerate() {
            if arg.key().id() != expected.id() {
                return Err(InvokeError::Argument {
                    method: method.to_string(),
                    position,
                    expected: *expected,
                    got: arg.key(),
                });
            }
        }

        let ctx = CallCtx {
            origin: &self.origin,
            slot: self.slots[position].as_ref(),
        };
        (plan.imp)(&ctx, args)
    }
}

//! Dispatch-table synthesizer — the default code synthesizer
//!
//! Materializes a "concrete type" as a method-name → plan table. No code
//! is emitted; the synthesized type is a vtable of closures built at
//! generation time, which satisfies the synthesizer contract for
//! everything short of true code generation.

use super::{AdapterHandle, AdapterInstance, CodeSynthesizer, ConcreteType, SynthesisError};
use crate::descriptor::{MethodPlan, OriginRef};
use crate::origin::{InvokeError, TypeKey};
use crate::wrapper::WrapperDef;
use std::collections::HashMap;
use std::sync::Arc;

/// Builds dispatch-table concrete types.
#[derive(Debug, Default, Clone)]
pub struct DispatchSynthesizer;

impl CodeSynthesizer for DispatchSynthesizer {
    fn synthesize(
        &self,
        interface: Arc<WrapperDef>,
        origin: TypeKey,
        plans: Vec<MethodPlan>,
    ) -> Result<Arc<dyn ConcreteType>, SynthesisError> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(plans.len());
        for (position, plan) in plans.iter().enumerate() {
            if interface.method_named(&plan.method).is_none() {
                return Err(SynthesisError::PlanMismatch {
                    interface: interface.name().to_string(),
                    detail: format!("plan for unknown method `{}`", plan.method),
                });
            }
            if index.insert(plan.method.clone(), position).is_some() {
                return Err(SynthesisError::PlanMismatch {
                    interface: interface.name().to_string(),
                    detail: format!("two plans for method `{}`", plan.method),
                });
            }
        }
        for method in interface.methods() {
            if !index.contains_key(&method.name) {
                return Err(SynthesisError::PlanMismatch {
                    interface: interface.name().to_string(),
                    detail: format!("no plan for method `{}`", method.name),
                });
            }
        }

        Ok(Arc::new(DispatchType {
            interface,
            origin,
            plans: Arc::new(plans),
            index: Arc::new(index),
        }))
    }
}

struct DispatchType {
    interface: Arc<WrapperDef>,
    origin: TypeKey,
    plans: Arc<Vec<MethodPlan>>,
    index: Arc<HashMap<String, usize>>,
}

impl ConcreteType for DispatchType {
    fn interface(&self) -> &Arc<WrapperDef> {
        &self.interface
    }

    fn origin_type(&self) -> TypeKey {
        self.origin
    }

    fn instantiate(&self, origin: OriginRef) -> Result<AdapterHandle, InvokeError> {
        if (*origin).type_id() != self.origin.id() {
            return Err(InvokeError::OriginType {
                expected: self.origin,
            });
        }
        AdapterInstance::assemble(
            self.interface.clone(),
            self.plans.clone(),
            self.index.clone(),
            origin,
        )
    }
}

//! Direct descriptor — user-supplied method body
//!
//! Escapes the mapping model entirely: the generation logic is handed in
//! as a closure. Used for constant and identity returns.

use super::plan::{CallCtx, MethodImpl, MethodPlan};
use super::ResolveError;
use crate::origin::{InvokeError, TypeKey, Value};
use crate::wrapper::WrapperMethodDef;
use std::any::Any;
use std::sync::Arc;

/// A wrapper method whose body is supplied directly.
pub struct DirectDescriptor {
    body: MethodImpl,
}

impl DirectDescriptor {
    pub fn new(
        body: impl Fn(&CallCtx<'_>, Vec<Value>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            body: Arc::new(body),
        }
    }

    /// Always return the given constant.
    pub fn constant<T: Any + Send + Sync>(value: T) -> Self {
        let constant = Value::new(value);
        Self::new(move |_ctx, _args| Ok(constant.clone()))
    }

    /// Echo the wrapper argument at `index`.
    pub fn identity(index: usize) -> Self {
        Self::new(move |_ctx, args| {
            args.into_iter()
                .nth(index)
                .ok_or(InvokeError::ArgumentDowncast {
                    position: index,
                    expected: TypeKey::unit(),
                })
        })
    }

    pub(crate) fn resolve(&self, method: &WrapperMethodDef) -> Result<MethodPlan, ResolveError> {
        Ok(MethodPlan::leaf(&method.name, "direct", self.body.clone()))
    }
}

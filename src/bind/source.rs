//! Value sources — where a bound parameter's value comes from

use crate::origin::Value;
use crate::translate::ParamChain;
use std::any::Any;

/// Where the value for a claimed parameter position comes from.
#[derive(Clone)]
pub enum ValueSource {
    /// A fixed value, cloned per call.
    Constant(Value),
    /// A wrapper-method argument, routed through a parameter chain.
    /// With no explicit chain, an identity chain for the wrapper
    /// parameter's declared type is derived at bind time.
    WrapperParam {
        index: usize,
        chain: Option<ParamChain>,
    },
}

impl ValueSource {
    pub fn constant<T: Any + Send + Sync>(value: T) -> Self {
        Self::Constant(Value::new(value))
    }

    pub fn wrapper_param(index: usize) -> Self {
        Self::WrapperParam { index, chain: None }
    }

    pub fn wrapper_param_via(index: usize, chain: ParamChain) -> Self {
        Self::WrapperParam {
            index,
            chain: Some(chain),
        }
    }
}

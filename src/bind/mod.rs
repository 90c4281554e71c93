//! Parameter binding: filters × value sources → complete assignments
//!
//! Combines a filter (which origin-method parameter positions to affect)
//! with a value source (constant, or wrapper argument routed through a
//! parameter chain) to produce, per origin method, exactly one binding
//! for every parameter position.

mod binder;
mod filter;
mod source;

pub use binder::{BindError, BindGap, Binding, BinderUnion, ParamBinder};
pub use filter::ParamFilter;
pub use source::ValueSource;

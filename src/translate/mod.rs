//! Translator chains — type-directed conversion rule tables
//!
//! Two specializations share one core: `ParamChain` routes wrapper
//! arguments into origin parameter slots, `ResultChain` routes origin
//! returns into the wrapper return type. Both obey "last write
//! overrides, else inherit": the most recently added matching entry
//! wins, and an unmatched candidate delegates to the parent chain.
//! A root-level miss is a generation-time configuration error.

mod chain;
mod param;
mod result;

pub use chain::{identity, transform, Transform};
pub use param::ParamChain;
pub use result::ResultChain;

use crate::origin::TypeKey;
use thiserror::Error;

/// Failure to find a conversion rule for a candidate type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("no translator for `{candidate}` in the chain declared for `{declared}`")]
    NoTranslator {
        candidate: TypeKey,
        declared: TypeKey,
    },
}

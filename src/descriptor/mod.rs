//! Method descriptors — how one wrapper method is realized
//!
//! The tagged union over {Singleton, List, Map, Setter, Direct}. Each
//! variant describes which origin member(s) a wrapper method reaches,
//! through which selector, with which binders and result chain; resolving
//! a descriptor against a concrete origin shape yields a `MethodPlan`.

mod direct;
mod list;
mod map;
mod plan;
mod setter;
mod singleton;

pub use direct::DirectDescriptor;
pub use list::{ElementSpec, ListDescriptor};
pub use map::{KeyRule, MapDescriptor};
pub use plan::{CallCtx, InitStep, MethodImpl, MethodPlan, OriginRef, PlanSummary};
pub use setter::SetterDescriptor;
pub use singleton::SingletonDescriptor;

use crate::bind::BindError;
use crate::origin::{OriginShape, TypeKey};
use crate::synth::{CodeSynthesizer, SynthesisError};
use crate::translate::TranslateError;
use crate::wrapper::{SpecError, WrapperMethodDef};
use thiserror::Error;

/// What descriptor resolution needs: the origin shape under generation
/// and the synthesizer (List/Map descriptors synthesize their element
/// adapters during resolution).
pub struct ResolveCtx<'a> {
    pub shape: &'a OriginShape,
    pub synthesizer: &'a dyn CodeSynthesizer,
}

/// Errors from resolving descriptors against one origin type.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no member matching {selector} on `{origin}` for wrapper method `{method}`")]
    Unsatisfied {
        method: String,
        origin: TypeKey,
        selector: String,
    },

    #[error(
        "ambiguous mapping for `{method}` on `{origin}`: {selector} matches {}",
        .members.join(", ")
    )]
    Ambiguous {
        method: String,
        origin: TypeKey,
        selector: String,
        members: Vec<String>,
    },

    #[error("duplicate element key `{key}` for `{method}` on `{origin}`: `{first}` and `{second}`")]
    DuplicateKey {
        method: String,
        origin: TypeKey,
        key: String,
        first: String,
        second: String,
    },

    #[error("no key for element member `{member}` of `{method}` ({rule})")]
    MissingKey {
        method: String,
        member: String,
        rule: String,
    },

    #[error("binding `{method}`: {source}")]
    Bind {
        method: String,
        #[source]
        source: BindError,
    },

    #[error("result of `{method}`: {source}")]
    ResultTranslate {
        method: String,
        #[source]
        source: TranslateError,
    },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    #[error("internal: {0}")]
    Internal(String),
}

/// The descriptor variants. One per wrapper method, chosen at
/// configuration time.
pub enum MethodDescriptor {
    Singleton(SingletonDescriptor),
    List(ListDescriptor),
    Map(MapDescriptor),
    Setter(SetterDescriptor),
    Direct(DirectDescriptor),
}

impl MethodDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Singleton(_) => "singleton",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Setter(_) => "setter",
            Self::Direct(_) => "direct",
        }
    }

    /// Eager configuration checks, run at `WrapperSpec` build time.
    pub(crate) fn validate(&self, method: &WrapperMethodDef) -> Result<(), SpecError> {
        match self {
            Self::Singleton(d) => d.validate(method),
            Self::List(d) => d.validate(method),
            Self::Map(d) => d.validate(method),
            Self::Setter(d) => d.validate(method),
            Self::Direct(_) => Ok(()),
        }
    }

    /// Resolve against one origin shape, producing the method plan.
    pub(crate) fn resolve(
        &self,
        ctx: &ResolveCtx<'_>,
        method: &WrapperMethodDef,
    ) -> Result<MethodPlan, ResolveError> {
        match self {
            Self::Singleton(d) => d.resolve(ctx, method),
            Self::List(d) => d.resolve(ctx, method),
            Self::Map(d) => d.resolve(ctx, method),
            Self::Setter(d) => d.resolve(ctx, method),
            Self::Direct(d) => d.resolve(method),
        }
    }
}

impl From<SingletonDescriptor> for MethodDescriptor {
    fn from(d: SingletonDescriptor) -> Self {
        Self::Singleton(d)
    }
}

impl From<ListDescriptor> for MethodDescriptor {
    fn from(d: ListDescriptor) -> Self {
        Self::List(d)
    }
}

impl From<MapDescriptor> for MethodDescriptor {
    fn from(d: MapDescriptor) -> Self {
        Self::Map(d)
    }
}

impl From<SetterDescriptor> for MethodDescriptor {
    fn from(d: SetterDescriptor) -> Self {
        Self::Setter(d)
    }
}

impl From<DirectDescriptor> for MethodDescriptor {
    fn from(d: DirectDescriptor) -> Self {
        Self::Direct(d)
    }
}

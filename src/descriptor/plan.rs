//! Method plans — the per-method output of descriptor resolution
//!
//! Resolving one descriptor against one origin shape yields a
//! `MethodPlan`: an optional constructor initialization step (run once
//! per adapter instance, in descriptor-registration order) plus the
//! method implementation closure, along with a serializable summary of
//! what the method resolved to.

use crate::origin::{InvokeError, OriginDyn, Value};
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared, erased reference to one origin instance. The adapter borrows
/// the origin; it never owns its lifecycle.
pub type OriginRef = Arc<dyn Any + Send + Sync>;

/// What a method implementation sees at call time.
pub struct CallCtx<'a> {
    pub origin: &'a OriginRef,
    /// The value this plan's init step produced at instantiation, if any.
    pub slot: Option<&'a Value>,
}

impl CallCtx<'_> {
    pub fn origin_dyn(&self) -> &OriginDyn {
        self.origin.as_ref()
    }
}

/// Constructor initialization step: produces this plan's per-instance
/// slot value.
pub type InitStep = Arc<dyn Fn(&OriginRef) -> Result<Value, InvokeError> + Send + Sync>;

/// The synthesized method body.
pub type MethodImpl =
    Arc<dyn Fn(&CallCtx<'_>, Vec<Value>) -> Result<Value, InvokeError> + Send + Sync>;

/// One resolved wrapper method, ready for synthesis.
pub struct MethodPlan {
    pub method: String,
    pub init: Option<InitStep>,
    pub imp: MethodImpl,
    pub summary: PlanSummary,
}

impl MethodPlan {
    pub fn leaf(method: impl Into<String>, kind: &'static str, imp: MethodImpl) -> Self {
        let method = method.into();
        let summary = PlanSummary {
            method: method.clone(),
            kind,
            member: None,
            elements: Vec::new(),
        };
        Self {
            method,
            init: None,
            imp,
            summary,
        }
    }

    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.summary.member = Some(member.into());
        self
    }

    pub fn with_elements(mut self, elements: Vec<String>) -> Self {
        self.summary.elements = elements;
        self
    }

    pub fn with_init(mut self, init: InitStep) -> Self {
        self.init = Some(init);
        self
    }
}

impl fmt::Debug for MethodPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodPlan")
            .field("method", &self.method)
            .field("kind", &self.summary.kind)
            .field("member", &self.summary.member)
            .field("has_init", &self.init.is_some())
            .finish()
    }
}

/// Serializable record of how one wrapper method resolved.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub method: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<String>,
}

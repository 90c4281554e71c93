//! Member selection — which origin members a descriptor may reach
//!
//! Selectors are pure queries over an `OriginShape`. The marker selector
//! is the declarative path; the fixed selector carries a member that was
//! already resolved during a collection scan (List/Map elements) and
//! ignores the shape entirely.

use crate::origin::{FieldMember, MethodMember, OriginShape};
use std::sync::Arc;

/// Produces the set of origin members eligible for one descriptor.
pub trait MemberSelector: Send + Sync {
    fn select_methods(&self, shape: &OriginShape) -> Vec<Arc<MethodMember>>;

    fn select_fields(&self, shape: &OriginShape) -> Vec<Arc<FieldMember>>;

    /// Short description for error messages, e.g. ``marker `common` ``.
    fn describe(&self) -> String;
}

/// Selects every declared member carrying the configured marker.
pub struct MarkerSelector {
    marker: String,
}

impl MarkerSelector {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl MemberSelector for MarkerSelector {
    fn select_methods(&self, shape: &OriginShape) -> Vec<Arc<MethodMember>> {
        shape
            .methods()
            .iter()
            .filter(|m| m.markers.has(&self.marker))
            .cloned()
            .collect()
    }

    fn select_fields(&self, shape: &OriginShape) -> Vec<Arc<FieldMember>> {
        shape
            .fields()
            .iter()
            .filter(|f| f.markers.has(&self.marker))
            .cloned()
            .collect()
    }

    fn describe(&self) -> String {
        format!("marker `{}`", self.marker)
    }
}

/// Always yields a single predetermined member, ignoring the shape.
pub enum FixedSelector {
    Method(Arc<MethodMember>),
    Field(Arc<FieldMember>),
}

impl FixedSelector {
    pub fn method(member: Arc<MethodMember>) -> Self {
        Self::Method(member)
    }

    pub fn field(member: Arc<FieldMember>) -> Self {
        Self::Field(member)
    }
}

impl MemberSelector for FixedSelector {
    fn select_methods(&self, _shape: &OriginShape) -> Vec<Arc<MethodMember>> {
        match self {
            Self::Method(m) => vec![m.clone()],
            Self::Field(_) => Vec::new(),
        }
    }

    fn select_fields(&self, _shape: &OriginShape) -> Vec<Arc<FieldMember>> {
        match self {
            Self::Method(_) => Vec::new(),
            Self::Field(f) => vec![f.clone()],
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Method(m) => format!("member `{}`", m.name),
            Self::Field(f) => format!("member `{}`", f.name),
        }
    }
}

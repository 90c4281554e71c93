//! Resolution reports — the serializable "explain" surface
//!
//! Records how each wrapper method resolved against one origin type.
//! Purely diagnostic; the generated adapter does not depend on it.

use crate::descriptor::PlanSummary;
use serde::Serialize;

/// How one (wrapper, origin type) generation resolved, method by method.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub wrapper: String,
    pub origin: String,
    pub methods: Vec<PlanSummary>,
}

impl ResolutionReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_without_empty_fields() {
        let report = ResolutionReport {
            wrapper: "Wrapper".into(),
            origin: "Origin".into(),
            methods: vec![PlanSummary {
                method: "get".into(),
                kind: "singleton",
                member: Some("answer".into()),
                elements: Vec::new(),
            }],
        };
        let json = report.to_json().unwrap();
        assert!(json.contains("\"member\": \"answer\""));
        assert!(!json.contains("elements"));
    }
}

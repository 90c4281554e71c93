//! Map descriptor — keyed variant of the list descriptor
//!
//! Every match produces a string key via the key-extraction rule along
//! with its element adapter; the generated method returns a
//! `BTreeMap<String, AdapterHandle>`. A duplicate key is a generation-time
//! error — unlike the binder union's last-wins policy, a key collision
//! signals a configuration ambiguity the author has to resolve.

use super::list::ElementSpec;
use super::plan::{InitStep, MethodImpl, MethodPlan};
use super::{ResolveCtx, ResolveError};
use crate::origin::{InvokeError, MarkerSet, Value};
use crate::select::{FixedSelector, MarkerSelector, MemberSelector};
use crate::synth::{AdapterHandle, ConcreteType};
use crate::wrapper::{SpecError, WrapperMethodDef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How a matched member yields its map key.
#[derive(Clone)]
pub enum KeyRule {
    /// The value of the named marker on the member (e.g. `key = "alpha"`).
    MarkerValue(String),
    /// The member's own name.
    MemberName,
    /// User-supplied extraction over `(member name, markers)`.
    Custom(Arc<dyn Fn(&str, &MarkerSet) -> Option<String> + Send + Sync>),
}

impl KeyRule {
    pub fn marker_value(marker: impl Into<String>) -> Self {
        Self::MarkerValue(marker.into())
    }

    fn key_for(&self, name: &str, markers: &MarkerSet) -> Option<String> {
        match self {
            Self::MarkerValue(marker) => markers.value_of(marker).map(str::to_string),
            Self::MemberName => Some(name.to_string()),
            Self::Custom(f) => f(name, markers),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::MarkerValue(marker) => format!("rule: value of marker `{}`", marker),
            Self::MemberName => "rule: member name".to_string(),
            Self::Custom(_) => "rule: custom".to_string(),
        }
    }
}

/// Maps one wrapper method to every matching origin member, keyed.
pub struct MapDescriptor {
    selector: Arc<dyn MemberSelector>,
    element: ElementSpec,
    key: KeyRule,
}

impl MapDescriptor {
    pub fn marked(marker: impl Into<String>, element: ElementSpec, key: KeyRule) -> Self {
        Self::with_selector(Arc::new(MarkerSelector::new(marker)), element, key)
    }

    pub fn with_selector(
        selector: Arc<dyn MemberSelector>,
        element: ElementSpec,
        key: KeyRule,
    ) -> Self {
        Self {
            selector,
            element,
            key,
        }
    }

    pub(crate) fn validate(&self, method: &WrapperMethodDef) -> Result<(), SpecError> {
        self.element.validate(&method.name)
    }

    pub(crate) fn resolve(
        &self,
        ctx: &ResolveCtx<'_>,
        method: &WrapperMethodDef,
    ) -> Result<MethodPlan, ResolveError> {
        let mut keyed: Vec<(String, Arc<dyn ConcreteType>)> = Vec::new();
        let mut elements: Vec<String> = Vec::new();

        let mut push = |key: Option<String>,
                        name: &str,
                        proto: Arc<dyn ConcreteType>|
         -> Result<(), ResolveError> {
            let key = key.ok_or_else(|| ResolveError::MissingKey {
                method: method.name.clone(),
                member: name.to_string(),
                rule: self.key.describe(),
            })?;
            if let Some((_, first)) = keyed
                .iter()
                .zip(&elements)
                .map(|((k, _), e)| (k, e))
                .find(|(k, _)| **k == key)
            {
                return Err(ResolveError::DuplicateKey {
                    method: method.name.clone(),
                    origin: ctx.shape.key(),
                    key,
                    first: first.clone(),
                    second: name.to_string(),
                });
            }
            elements.push(name.to_string());
            keyed.push((key, proto));
            Ok(())
        };

        for member in self.selector.select_methods(ctx.shape) {
            let key = self.key.key_for(&member.name, &member.markers);
            let name = member.name.clone();
            let proto = self
                .element
                .synthesize_for(ctx, FixedSelector::method(member))?;
            push(key, &name, proto)?;
        }
        for member in self.selector.select_fields(ctx.shape) {
            let key = self.key.key_for(&member.name, &member.markers);
            let name = member.name.clone();
            let proto = self
                .element
                .synthesize_for(ctx, FixedSelector::field(member))?;
            push(key, &name, proto)?;
        }

        let summary: Vec<String> = keyed
            .iter()
            .zip(&elements)
            .map(|((key, _), member)| format!("{} -> {}", key, member))
            .collect();

        let init: InitStep = Arc::new(move |origin| {
            let mut handles: BTreeMap<String, AdapterHandle> = BTreeMap::new();
            for (key, proto) in &keyed {
                handles.insert(key.clone(), proto.instantiate(origin.clone())?);
            }
            Ok(Value::new(handles))
        });
        let imp: MethodImpl = Arc::new(move |ctx, _args| {
            ctx.slot
                .cloned()
                .ok_or_else(|| InvokeError::Origin("element map slot missing".into()))
        });

        Ok(MethodPlan::leaf(&method.name, "map", imp)
            .with_elements(summary)
            .with_init(init))
    }
}

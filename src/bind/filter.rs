//! Parameter filters — which origin parameter positions a binder claims

use crate::origin::ParamSpec;

/// Selects the origin-method parameter positions one binder affects.
#[derive(Debug, Clone)]
pub enum ParamFilter {
    /// Every position.
    All,
    /// Explicit positions.
    Positions(Vec<usize>),
    /// Positions whose parameter carries the named marker.
    Marked(String),
}

impl ParamFilter {
    pub fn marked(marker: impl Into<String>) -> Self {
        Self::Marked(marker.into())
    }

    pub fn position(position: usize) -> Self {
        Self::Positions(vec![position])
    }

    pub fn accepts(&self, position: usize, param: &ParamSpec) -> bool {
        match self {
            Self::All => true,
            Self::Positions(positions) => positions.contains(&position),
            Self::Marked(marker) => param.markers.has(marker),
        }
    }
}

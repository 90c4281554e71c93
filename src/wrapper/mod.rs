//! Wrapper interface model and the validated adapter specification
//!
//! A `WrapperDef` models the target interface: named methods with typed
//! parameter and return keys. A `WrapperSpec` pairs the definition with
//! exactly one method descriptor per interface method — no missing, no
//! foreign methods — validated eagerly at build time and immutable
//! afterwards.

use crate::descriptor::MethodDescriptor;
use crate::origin::TypeKey;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// One method of the target interface.
#[derive(Debug, Clone)]
pub struct WrapperMethodDef {
    pub name: String,
    pub params: Vec<TypeKey>,
    pub returns: TypeKey,
}

impl WrapperMethodDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: TypeKey::unit(),
        }
    }

    pub fn param<T: Any>(mut self) -> Self {
        self.params.push(TypeKey::of::<T>());
        self
    }

    pub fn returns<T: Any>(mut self) -> Self {
        self.returns = TypeKey::of::<T>();
        self
    }
}

/// The target interface: a name plus its method set.
#[derive(Debug, Clone)]
pub struct WrapperDef {
    name: String,
    methods: Vec<WrapperMethodDef>,
}

impl WrapperDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: WrapperMethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn methods(&self) -> &[WrapperMethodDef] {
        &self.methods
    }

    pub fn method_named(&self, name: &str) -> Option<&WrapperMethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Configuration errors, detected at `WrapperSpec` build time.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("wrapper `{wrapper}` methods without descriptors: {}", .methods.join(", "))]
    MissingDescriptors {
        wrapper: String,
        methods: Vec<String>,
    },

    #[error("descriptors for methods not on wrapper `{wrapper}`: {}", .methods.join(", "))]
    ForeignDescriptors {
        wrapper: String,
        methods: Vec<String>,
    },

    #[error("method `{method}` of wrapper `{wrapper}` described twice")]
    DuplicateDescriptor { wrapper: String, method: String },

    #[error("wrapper `{wrapper}` declares method `{method}` twice")]
    DuplicateMethod { wrapper: String, method: String },

    #[error("element interface `{interface}` for `{method}` must declare exactly one method, has {count}")]
    ElementNotFunctional {
        method: String,
        interface: String,
        count: usize,
    },

    #[error("result chain for `{method}` produces `{declared}`, method returns `{expected}`")]
    ResultChainMismatch {
        method: String,
        declared: TypeKey,
        expected: TypeKey,
    },

    #[error("parameter chain for argument {index} of `{method}` declares `{declared}`, argument is `{expected}`")]
    ParamChainMismatch {
        method: String,
        index: usize,
        declared: TypeKey,
        expected: TypeKey,
    },

    #[error("result chain entry for `{method}` produces `{produces}`, chain is declared to produce `{declared}`")]
    ResultEntryOutput {
        method: String,
        produces: TypeKey,
        declared: TypeKey,
    },

    #[error("parameter chain entry for argument {index} of `{method}` accepts `{accepts}`, chain is declared for `{declared}`")]
    ParamEntryInput {
        method: String,
        index: usize,
        accepts: TypeKey,
        declared: TypeKey,
    },

    #[error("default for `{method}` is `{declared}`, method returns `{expected}`")]
    DefaultTypeMismatch {
        method: String,
        declared: TypeKey,
        expected: TypeKey,
    },

    #[error("setter `{method}` declares no parameters")]
    SetterWithoutValue { method: String },

    #[error("setter `{method}` must return `()` or its first parameter type; returns `{returns}`, first parameter is `{first_param}`")]
    SetterReturn {
        method: String,
        returns: TypeKey,
        first_param: TypeKey,
    },

    #[error("wrapper argument index {index} out of range for `{method}` ({available} declared)")]
    WrapperParamIndex {
        method: String,
        index: usize,
        available: usize,
    },
}

/// A validated, immutable adapter specification: the wrapper interface
/// plus one descriptor per method, in registration order.
pub struct WrapperSpec {
    def: Arc<WrapperDef>,
    descriptors: Vec<(String, MethodDescriptor)>,
}

impl WrapperSpec {
    pub fn builder(def: WrapperDef) -> WrapperSpecBuilder {
        WrapperSpecBuilder {
            def: Arc::new(def),
            described: Vec::new(),
        }
    }

    pub fn def(&self) -> &Arc<WrapperDef> {
        &self.def
    }

    /// Descriptors in registration order. Constructor init steps of the
    /// generated adapter run in this order.
    pub(crate) fn descriptors(&self) -> impl Iterator<Item = (&str, &MethodDescriptor)> {
        self.descriptors.iter().map(|(name, d)| (name.as_str(), d))
    }
}

impl fmt::Debug for WrapperSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let described: Vec<String> = self
            .descriptors
            .iter()
            .map(|(name, d)| format!("{} ({})", name, d.kind()))
            .collect();
        f.debug_struct("WrapperSpec")
            .field("wrapper", &self.def.name())
            .field("descriptors", &described)
            .finish()
    }
}

/// Builder for [`WrapperSpec`].
pub struct WrapperSpecBuilder {
    def: Arc<WrapperDef>,
    described: Vec<(String, MethodDescriptor)>,
}

impl WrapperSpecBuilder {
    pub fn describe(mut self, method: impl Into<String>, descriptor: impl Into<MethodDescriptor>) -> Self {
        self.described.push((method.into(), descriptor.into()));
        self
    }

    /// Validate completeness and per-descriptor configuration.
    pub fn build(self) -> Result<WrapperSpec, SpecError> {
        let wrapper = self.def.name().to_string();

        let mut declared: HashSet<&str> = HashSet::new();
        for method in self.def.methods() {
            if !declared.insert(method.name.as_str()) {
                return Err(SpecError::DuplicateMethod {
                    wrapper,
                    method: method.name.clone(),
                });
            }
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (name, _) in &self.described {
            if !seen.insert(name.as_str()) {
                return Err(SpecError::DuplicateDescriptor {
                    wrapper,
                    method: name.clone(),
                });
            }
        }

        let foreign: Vec<String> = self
            .described
            .iter()
            .filter(|(name, _)| self.def.method_named(name).is_none())
            .map(|(name, _)| name.clone())
            .collect();
        if !foreign.is_empty() {
            return Err(SpecError::ForeignDescriptors {
                wrapper,
                methods: foreign,
            });
        }

        let missing: Vec<String> = self
            .def
            .methods()
            .iter()
            .filter(|m| !seen.contains(m.name.as_str()))
            .map(|m| m.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(SpecError::MissingDescriptors {
                wrapper,
                methods: missing,
            });
        }

        for (name, descriptor) in &self.described {
            // method_named is Some here; foreign names were rejected above.
            if let Some(method) = self.def.method_named(name) {
                descriptor.validate(method)?;
            }
        }

        Ok(WrapperSpec {
            def: self.def,
            descriptors: self.described,
        })
    }
}

//! Graft: type-directed adapter generation
//!
//! Describe, once, how the methods of a wrapper interface map onto the
//! marked members of not-yet-known origin types; a factory then
//! synthesizes, per origin type encountered, a concrete adapter type
//! that forwards each call to the matching member, translating
//! parameters and results along configured chains.
//!
//! # Core Concepts
//!
//! - **Origin shapes**: registered member metadata (methods, fields,
//!   markers) standing in for runtime reflection
//! - **Descriptors**: singleton, list, map, setter, and direct mappings,
//!   exactly one per wrapper method
//! - **Chains**: overridable, inheritable value translation rules for
//!   parameters and results
//! - **Factory**: validates the spec eagerly and memoizes one generated
//!   adapter type per origin type
//!
//! # Example
//!
//! ```
//! use graft::{
//!     AdapterFactory, MethodMember, OriginRegistry, OriginShape, ParamBinder, ParamSpec,
//!     SingletonDescriptor, Value, WrapperDef, WrapperMethodDef, WrapperSpec,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! struct Greeter;
//! impl Greeter {
//!     fn concat(&self, a: String, b: String) -> String {
//!         format!("{} {}", a, b)
//!     }
//! }
//!
//! let registry = OriginRegistry::new();
//! registry.register(
//!     OriginShape::describe::<Greeter>()
//!         .method(
//!             MethodMember::build("concat")
//!                 .marked("common")
//!                 .param(ParamSpec::of::<String>("a").marked("first"))
//!                 .param(ParamSpec::of::<String>("b").marked("second"))
//!                 .returns::<String>()
//!                 .invoke2(Greeter::concat),
//!         )
//!         .finish(),
//! );
//!
//! let spec = WrapperSpec::builder(
//!     WrapperDef::new("Wrapper").method(
//!         WrapperMethodDef::new("common")
//!             .param::<String>()
//!             .param::<String>()
//!             .returns::<String>(),
//!     ),
//! )
//! .describe(
//!     "common",
//!     SingletonDescriptor::marked("common")
//!         .bind(ParamBinder::route("first", 0))
//!         .bind(ParamBinder::route("second", 1)),
//! )
//! .build()?;
//!
//! let factory = AdapterFactory::new(spec, Arc::new(registry));
//! let adapter = factory.adapt(Greeter)?;
//! let out = adapter.call(
//!     "common",
//!     vec![Value::new("Hello".to_string()), Value::new("World".to_string())],
//! )?;
//! assert_eq!(out.extract::<String>(), Some("Hello World".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod descriptor;
pub mod factory;
pub mod origin;
pub mod select;
pub mod synth;
pub mod translate;
pub mod wrapper;

pub use bind::{BindError, BindGap, BinderUnion, ParamBinder, ParamFilter, ValueSource};
pub use descriptor::{
    CallCtx, DirectDescriptor, ElementSpec, KeyRule, ListDescriptor, MapDescriptor,
    MethodDescriptor, MethodPlan, PlanSummary, ResolveError, SetterDescriptor,
    SingletonDescriptor,
};
pub use factory::{AdapterConstructor, AdapterFactory, GraftError, GraftResult, ResolutionReport};
pub use origin::{
    FieldMember, InvokeError, Marker, MarkerSet, MethodMember, OriginRegistry, OriginShape,
    ParamSpec, TypeKey, Value,
};
pub use select::{FixedSelector, MarkerSelector, MemberSelector};
pub use synth::{
    AdapterHandle, AdapterInstance, CodeSynthesizer, ConcreteType, DispatchSynthesizer,
    SynthesisError,
};
pub use translate::{ParamChain, ResultChain, TranslateError, Transform};
pub use wrapper::{SpecError, WrapperDef, WrapperMethodDef, WrapperSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Origin type metadata: values, members, shapes, and the registry
//!
//! The registration-table substitute for runtime reflection. An origin
//! type is described once (`OriginShape`), stored in an `OriginRegistry`,
//! and queried by selectors during adapter generation.

mod member;
mod registry;
mod shape;
mod value;

pub use member::{
    FieldMember, GetFn, InvokeFn, Marker, MarkerSet, MethodBuilder, MethodMember, OriginDyn,
    ParamSpec, SetFn,
};
pub use registry::OriginRegistry;
pub use shape::{OriginShape, OriginShapeBuilder};
pub use value::{InvokeError, TypeKey, Value};

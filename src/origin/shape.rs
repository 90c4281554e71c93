//! OriginShape — the registered metadata model of one origin type
//!
//! Rust has no runtime reflection, so the engine works from an explicit
//! registration table: an `OriginShape` describes one origin type's
//! markered methods and fields, built once at configuration time.
//! Member enumeration order is registration order; descriptors rely on
//! that order being stable for reproducible generation.

use super::member::{FieldMember, MethodMember};
use super::value::TypeKey;
use std::any::Any;
use std::sync::Arc;

/// The declared member set of one origin type.
#[derive(Debug, Clone)]
pub struct OriginShape {
    key: TypeKey,
    methods: Vec<Arc<MethodMember>>,
    fields: Vec<Arc<FieldMember>>,
}

impl OriginShape {
    /// Start describing the origin type `T`.
    pub fn describe<T: Any + Send + Sync>() -> OriginShapeBuilder {
        OriginShapeBuilder {
            key: TypeKey::of::<T>(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn methods(&self) -> &[Arc<MethodMember>] {
        &self.methods
    }

    pub fn fields(&self) -> &[Arc<FieldMember>] {
        &self.fields
    }

    pub fn method(&self, name: &str) -> Option<&Arc<MethodMember>> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Arc<FieldMember>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Builder for [`OriginShape`].
pub struct OriginShapeBuilder {
    key: TypeKey,
    methods: Vec<Arc<MethodMember>>,
    fields: Vec<Arc<FieldMember>>,
}

impl OriginShapeBuilder {
    pub fn method(mut self, member: MethodMember) -> Self {
        self.methods.push(Arc::new(member));
        self
    }

    pub fn field(mut self, member: FieldMember) -> Self {
        self.fields.push(Arc::new(member));
        self
    }

    pub fn finish(self) -> OriginShape {
        OriginShape {
            key: self.key,
            methods: self.methods,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::origin::member::ParamSpec;

    struct Sample;

    #[test]
    fn shape_preserves_registration_order() {
        let shape = OriginShape::describe::<Sample>()
            .method(
                MethodMember::build("b")
                    .returns::<i64>()
                    .invoke0(|_: &Sample| 1i64),
            )
            .method(
                MethodMember::build("a")
                    .param(ParamSpec::of::<i64>("x"))
                    .returns::<i64>()
                    .invoke1(|_: &Sample, x: i64| x),
            )
            .field(FieldMember::readable("f", |_: &Sample| 0i64))
            .finish();

        let names: Vec<&str> = shape.methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(shape.key(), TypeKey::of::<Sample>());
        assert!(shape.method("a").is_some());
        assert!(shape.method("missing").is_none());
        assert!(shape.field("f").is_some());
    }
}

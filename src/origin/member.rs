//! Markered member metadata and invocation closures
//!
//! A member is the registration-time stand-in for what reflection would
//! discover at runtime: a name, a set of markers, typed parameter/return
//! keys, and a closure that performs the actual call over the erased
//! origin instance. The `invoke0`/`invoke1`/`invoke2` and
//! `readable`/`writable` constructors do the `dyn Any` plumbing once so
//! registration code stays typed.

use super::value::{InvokeError, TypeKey, Value};
use std::any::Any;
use std::sync::Arc;

/// A declarative marker attached to a member or parameter.
///
/// The optional value doubles as the key-extraction input for Map
/// descriptors (e.g. `key = "alpha"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub name: String,
    pub value: Option<String>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// The markers carried by one member or parameter.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    pub fn has(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m.name == name)
    }

    /// The value of the named marker, if the marker is present and valued.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.markers
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// One declared parameter of an origin method.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: String,
    pub ty: TypeKey,
    pub markers: MarkerSet,
}

impl ParamSpec {
    pub fn of<T: Any>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeKey::of::<T>(),
            markers: MarkerSet::new(),
        }
    }

    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.add(Marker::new(marker));
        self
    }

    pub fn marked_value(mut self, marker: impl Into<String>, value: impl Into<String>) -> Self {
        self.markers.add(Marker::with_value(marker, value));
        self
    }
}

/// Erased origin instance reference, as member closures see it.
pub type OriginDyn = dyn Any + Send + Sync;

/// Invocation closure over the erased origin.
pub type InvokeFn = Arc<dyn Fn(&OriginDyn, Vec<Value>) -> Result<Value, InvokeError> + Send + Sync>;

/// Field read closure.
pub type GetFn = Arc<dyn Fn(&OriginDyn) -> Result<Value, InvokeError> + Send + Sync>;

/// Field write closure. Writes go through whatever interior mutability
/// the origin type itself provides.
pub type SetFn = Arc<dyn Fn(&OriginDyn, Value) -> Result<(), InvokeError> + Send + Sync>;

fn origin_as<T: Any>(origin: &OriginDyn) -> Result<&T, InvokeError> {
    origin.downcast_ref::<T>().ok_or(InvokeError::OriginType {
        expected: TypeKey::of::<T>(),
    })
}

fn take_arg<T: Any + Clone>(args: &[Value], position: usize) -> Result<T, InvokeError> {
    args.get(position)
        .and_then(Value::extract::<T>)
        .ok_or(InvokeError::ArgumentDowncast {
            position,
            expected: TypeKey::of::<T>(),
        })
}

/// A callable origin method with its registration-time metadata.
#[derive(Clone)]
pub struct MethodMember {
    pub name: String,
    pub markers: MarkerSet,
    pub params: Vec<ParamSpec>,
    pub returns: TypeKey,
    invoke: InvokeFn,
}

impl MethodMember {
    pub fn build(name: impl Into<String>) -> MethodBuilder {
        MethodBuilder {
            name: name.into(),
            markers: MarkerSet::new(),
            params: Vec::new(),
            returns: TypeKey::unit(),
        }
    }

    /// Invoke the member over an erased origin instance.
    ///
    /// Arity and argument types are checked against the declared
    /// parameters before the closure runs.
    pub fn invoke(&self, origin: &OriginDyn, args: Vec<Value>) -> Result<Value, InvokeError> {
        if args.len() != self.params.len() {
            return Err(InvokeError::Arity {
                method: self.name.clone(),
                expected: self.params.len(),
                got: args.len(),
            });
        }
        for (position, (arg, param)) in args.iter().zip(&self.params).enumerate() {
            if arg.key().id() != param.ty.id() {
                return Err(InvokeError::Argument {
                    method: self.name.clone(),
                    position,
                    expected: param.ty,
                    got: arg.key(),
                });
            }
        }
        (self.invoke)(origin, args)
    }
}

impl std::fmt::Debug for MethodMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodMember")
            .field("name", &self.name)
            .field("params", &self.params.len())
            .field("returns", &self.returns)
            .finish()
    }
}

/// Builder for [`MethodMember`]. The `invoke*` call supplies the
/// implementation and finishes the build, so a member can never exist
/// without one.
pub struct MethodBuilder {
    name: String,
    markers: MarkerSet,
    params: Vec<ParamSpec>,
    returns: TypeKey,
}

impl MethodBuilder {
    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.add(Marker::new(marker));
        self
    }

    pub fn marked_value(mut self, marker: impl Into<String>, value: impl Into<String>) -> Self {
        self.markers.add(Marker::with_value(marker, value));
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns<T: Any>(mut self) -> Self {
        self.returns = TypeKey::of::<T>();
        self
    }

    /// Finish with a raw invocation closure. The closure receives
    /// pre-validated arguments matching the declared parameters.
    pub fn invoke_raw(
        self,
        f: impl Fn(&OriginDyn, Vec<Value>) -> Result<Value, InvokeError> + Send + Sync + 'static,
    ) -> MethodMember {
        MethodMember {
            name: self.name,
            markers: self.markers,
            params: self.params,
            returns: self.returns,
            invoke: Arc::new(f),
        }
    }

    /// Finish with a typed nullary implementation.
    pub fn invoke0<O, R>(self, f: impl Fn(&O) -> R + Send + Sync + 'static) -> MethodMember
    where
        O: Any,
        R: Any + Send + Sync,
    {
        self.invoke_raw(move |origin, _args| {
            let origin = origin_as::<O>(origin)?;
            Ok(Value::new(f(origin)))
        })
    }

    /// Finish with a typed unary implementation.
    pub fn invoke1<O, A, R>(self, f: impl Fn(&O, A) -> R + Send + Sync + 'static) -> MethodMember
    where
        O: Any,
        A: Any + Clone,
        R: Any + Send + Sync,
    {
        self.invoke_raw(move |origin, args| {
            let origin = origin_as::<O>(origin)?;
            let a = take_arg::<A>(&args, 0)?;
            Ok(Value::new(f(origin, a)))
        })
    }

    /// Finish with a typed binary implementation.
    pub fn invoke2<O, A, B, R>(
        self,
        f: impl Fn(&O, A, B) -> R + Send + Sync + 'static,
    ) -> MethodMember
    where
        O: Any,
        A: Any + Clone,
        B: Any + Clone,
        R: Any + Send + Sync,
    {
        self.invoke_raw(move |origin, args| {
            let origin = origin_as::<O>(origin)?;
            let a = take_arg::<A>(&args, 0)?;
            let b = take_arg::<B>(&args, 1)?;
            Ok(Value::new(f(origin, a, b)))
        })
    }
}

/// A readable (and optionally writable) origin field.
#[derive(Clone)]
pub struct FieldMember {
    pub name: String,
    pub markers: MarkerSet,
    pub ty: TypeKey,
    get: GetFn,
    set: Option<SetFn>,
}

impl FieldMember {
    /// A read-only field backed by a typed getter closure.
    pub fn readable<O, V>(
        name: impl Into<String>,
        get: impl Fn(&O) -> V + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        V: Any + Send + Sync,
    {
        Self {
            name: name.into(),
            markers: MarkerSet::new(),
            ty: TypeKey::of::<V>(),
            get: Arc::new(move |origin| {
                let origin = origin_as::<O>(origin)?;
                Ok(Value::new(get(origin)))
            }),
            set: None,
        }
    }

    /// A writable field. The setter receives `&O`, so the origin type
    /// supplies its own interior mutability (`Cell`, `Mutex`, ...).
    pub fn writable<O, V>(
        name: impl Into<String>,
        get: impl Fn(&O) -> V + Send + Sync + 'static,
        set: impl Fn(&O, V) + Send + Sync + 'static,
    ) -> Self
    where
        O: Any,
        V: Any + Send + Sync + Clone,
    {
        let mut field = Self::readable(name, get);
        field.set = Some(Arc::new(move |origin, value| {
            let origin = origin_as::<O>(origin)?;
            let value = value
                .extract::<V>()
                .ok_or(InvokeError::TranslatorInput {
                    expected: TypeKey::of::<V>(),
                    got: value.key(),
                })?;
            set(origin, value);
            Ok(())
        }));
        field
    }

    pub fn marked(mut self, marker: impl Into<String>) -> Self {
        self.markers.add(Marker::new(marker));
        self
    }

    pub fn marked_value(mut self, marker: impl Into<String>, value: impl Into<String>) -> Self {
        self.markers.add(Marker::with_value(marker, value));
        self
    }

    pub fn get(&self, origin: &OriginDyn) -> Result<Value, InvokeError> {
        (self.get)(origin)
    }

    pub fn set(&self, origin: &OriginDyn, value: Value) -> Result<(), InvokeError> {
        match &self.set {
            Some(set) => set(origin, value),
            None => Err(InvokeError::ReadOnlyField(self.name.clone())),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

impl std::fmt::Debug for FieldMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldMember")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("writable", &self.is_writable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeter {
        greeting: String,
    }

    impl Greeter {
        fn concat(&self, a: String, b: String) -> String {
            format!("{} {}", a, b)
        }
    }

    fn concat_member() -> MethodMember {
        MethodMember::build("concat")
            .marked("common")
            .param(ParamSpec::of::<String>("a").marked("first"))
            .param(ParamSpec::of::<String>("b").marked("second"))
            .returns::<String>()
            .invoke2(Greeter::concat)
    }

    #[test]
    fn typed_invoke_forwards_to_origin() {
        let member = concat_member();
        let origin = Greeter {
            greeting: "hi".into(),
        };
        let out = member
            .invoke(
                &origin,
                vec![Value::new("Hello".to_string()), Value::new("World".to_string())],
            )
            .unwrap();
        assert_eq!(out.extract::<String>(), Some("Hello World".to_string()));
        assert_eq!(origin.greeting, "hi");
    }

    #[test]
    fn invoke_checks_arity() {
        let member = concat_member();
        let origin = Greeter {
            greeting: "hi".into(),
        };
        let err = member
            .invoke(&origin, vec![Value::new("one".to_string())])
            .unwrap_err();
        assert!(matches!(err, InvokeError::Arity { expected: 2, got: 1, .. }));
    }

    #[test]
    fn invoke_checks_argument_types() {
        let member = concat_member();
        let origin = Greeter {
            greeting: "hi".into(),
        };
        let err = member
            .invoke(
                &origin,
                vec![Value::new("one".to_string()), Value::new(2i64)],
            )
            .unwrap_err();
        assert!(matches!(err, InvokeError::Argument { position: 1, .. }));
    }

    #[test]
    fn invoke_rejects_wrong_origin_type() {
        let member = concat_member();
        let err = member
            .invoke(
                &42u32,
                vec![Value::new("a".to_string()), Value::new("b".to_string())],
            )
            .unwrap_err();
        assert!(matches!(err, InvokeError::OriginType { .. }));
    }

    #[test]
    fn readable_field_reads() {
        let field =
            FieldMember::readable("greeting", |g: &Greeter| g.greeting.clone()).marked("exposed");
        let origin = Greeter {
            greeting: "hey".into(),
        };
        let value = field.get(&origin).unwrap();
        assert_eq!(value.extract::<String>(), Some("hey".to_string()));
        assert!(!field.is_writable());
        assert!(field.markers.has("exposed"));
    }

    #[test]
    fn readonly_field_rejects_write() {
        let field = FieldMember::readable("greeting", |g: &Greeter| g.greeting.clone());
        let origin = Greeter {
            greeting: "hey".into(),
        };
        let err = field
            .set(&origin, Value::new("nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, InvokeError::ReadOnlyField(_)));
    }

    #[test]
    fn writable_field_writes_through_interior_mutability() {
        struct Counter {
            count: std::sync::Mutex<i64>,
        }
        let field = FieldMember::writable(
            "count",
            |c: &Counter| *c.count.lock().unwrap(),
            |c: &Counter, v: i64| *c.count.lock().unwrap() = v,
        );
        let origin = Counter {
            count: std::sync::Mutex::new(1),
        };
        field.set(&origin, Value::new(5i64)).unwrap();
        assert_eq!(field.get(&origin).unwrap().extract::<i64>(), Some(5));
    }

    #[test]
    fn marker_value_lookup() {
        let mut markers = MarkerSet::new();
        markers.add(Marker::with_value("key", "alpha"));
        markers.add(Marker::new("exposed"));
        assert_eq!(markers.value_of("key"), Some("alpha"));
        assert_eq!(markers.value_of("exposed"), None);
        assert!(markers.has("exposed"));
        assert!(!markers.has("missing"));
    }
}

//! Shared test fixtures

#![allow(dead_code)]

use graft::{
    FieldMember, MethodMember, OriginRegistry, OriginShape, ParamSpec, WrapperDef,
    WrapperMethodDef,
};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Origin with one member marked `common`, two routed string parameters.
pub struct Greeter;

impl Greeter {
    pub fn concat(&self, a: String, b: String) -> String {
        format!("{} {}", a, b)
    }
}

pub fn greeter_shape() -> OriginShape {
    OriginShape::describe::<Greeter>()
        .method(
            MethodMember::build("concat")
                .marked("common")
                .param(ParamSpec::of::<String>("a").marked("first"))
                .param(ParamSpec::of::<String>("b").marked("second"))
                .returns::<String>()
                .invoke2(Greeter::concat),
        )
        .finish()
}

/// The single-method wrapper interface the greeter maps onto.
pub fn greeter_wrapper() -> WrapperDef {
    WrapperDef::new("Concat").method(
        WrapperMethodDef::new("common")
            .param::<String>()
            .param::<String>()
            .returns::<String>(),
    )
}

/// Origin whose writable `level` field goes through a mutex.
pub struct Dial {
    pub level: Mutex<i64>,
}

impl Dial {
    pub fn new(level: i64) -> Self {
        Self {
            level: Mutex::new(level),
        }
    }

    pub fn read(&self) -> i64 {
        *self.level.lock().unwrap()
    }
}

pub fn dial_shape() -> OriginShape {
    OriginShape::describe::<Dial>()
        .field(
            FieldMember::writable(
                "level",
                |d: &Dial| d.read(),
                |d: &Dial, v: i64| *d.level.lock().unwrap() = v,
            )
            .marked("level"),
        )
        .finish()
}

pub fn registry_with(shapes: Vec<OriginShape>) -> OriginRegistry {
    let registry = OriginRegistry::new();
    for shape in shapes {
        registry.register(shape);
    }
    registry
}

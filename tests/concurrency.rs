//! Concurrent generation: the factory must materialize at most one
//! concrete type per origin type, no matter how many threads race the
//! first call.

mod common;

use common::{greeter_shape, greeter_wrapper, init_tracing, registry_with, Greeter};
use graft::{
    AdapterFactory, CodeSynthesizer, ConcreteType, DispatchSynthesizer, GraftError, MethodPlan,
    OriginRegistry, ParamBinder, SingletonDescriptor, SynthesisError, TypeKey, Value, WrapperDef,
    WrapperSpec,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Delegates to the default synthesizer, counting invocations.
struct CountingSynthesizer {
    inner: DispatchSynthesizer,
    calls: Arc<AtomicUsize>,
}

impl CodeSynthesizer for CountingSynthesizer {
    fn synthesize(
        &self,
        interface: Arc<WrapperDef>,
        origin: TypeKey,
        plans: Vec<MethodPlan>,
    ) -> Result<Arc<dyn ConcreteType>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.synthesize(interface, origin, plans)
    }
}

fn counting_factory() -> (AdapterFactory, Arc<AtomicUsize>) {
    let spec = WrapperSpec::builder(greeter_wrapper())
        .describe(
            "common",
            SingletonDescriptor::marked("common")
                .bind(ParamBinder::route("first", 0))
                .bind(ParamBinder::route("second", 1)),
        )
        .build()
        .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let synthesizer = CountingSynthesizer {
        inner: DispatchSynthesizer::default(),
        calls: calls.clone(),
    };
    let factory = AdapterFactory::with_synthesizer(
        spec,
        Arc::new(registry_with(vec![greeter_shape()])),
        Arc::new(synthesizer),
    );
    (factory, calls)
}

#[test]
fn racing_first_calls_synthesize_exactly_once() {
    init_tracing();
    let (factory, calls) = counting_factory();
    let factory = Arc::new(factory);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let factory = factory.clone();
            thread::spawn(move || factory.constructor_for::<Greeter>().unwrap())
        })
        .collect();
    let constructors: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for constructor in &constructors[1..] {
        assert!(Arc::ptr_eq(&constructors[0], constructor));
    }
}

#[test]
fn repeated_calls_reuse_the_cached_constructor() {
    init_tracing();
    let (factory, calls) = counting_factory();

    let first = factory.constructor_for::<Greeter>().unwrap();
    for _ in 0..10 {
        let again = factory.constructor_for::<Greeter>().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn generated_adapters_are_callable_from_many_threads() {
    init_tracing();
    let (factory, _calls) = counting_factory();
    let adapter = factory.adapt(Greeter).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = adapter.clone();
            thread::spawn(move || {
                adapter
                    .call(
                        "common",
                        vec![
                            Value::new(format!("hello{i}")),
                            Value::new("world".to_string()),
                        ],
                    )
                    .unwrap()
                    .extract::<String>()
                    .unwrap()
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("hello{i} world"));
    }
}

#[test]
fn registration_after_factory_creation_is_visible() {
    init_tracing();
    let registry = Arc::new(OriginRegistry::new());
    let spec = WrapperSpec::builder(greeter_wrapper())
        .describe(
            "common",
            SingletonDescriptor::marked("common")
                .bind(ParamBinder::route("first", 0))
                .bind(ParamBinder::route("second", 1)),
        )
        .build()
        .unwrap();
    let factory = AdapterFactory::new(spec, registry.clone());

    assert!(matches!(
        factory.constructor_for::<Greeter>(),
        Err(GraftError::UnknownOrigin(_))
    ));

    registry.register(greeter_shape());
    assert!(factory.constructor_for::<Greeter>().is_ok());
}

//! The run-time registry, shared across threads.

use std::sync::OnceLock;
use std::thread;

use algebra_dispatch::guard::Guard;
use algebra_dispatch::laws;
use algebra_dispatch::numeric;
use algebra_dispatch::numeric::Floating;
use algebra_dispatch::numeric::Integral;
use algebra_dispatch::numeric::Number;
use algebra_dispatch::registry::GroupPrimitives;
use algebra_dispatch::registry::InstanceKey;
use algebra_dispatch::registry::MonoidPrimitives;
use algebra_dispatch::tag::DataType;
use algebra_dispatch::tag::TagPair;
use algebra_dispatch::DispatchError;
use algebra_dispatch::Registry;
use algebra_dispatch::RegistryBuilder;
use algebra_dispatch::Structure;
use algebra_dispatch::TagId;
use algebra_dispatch::Tagged;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn registry() -> &'static Registry<Number> {
    static REGISTRY: OnceLock<Registry<Number>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        init_tracing();
        let mut builder = RegistryBuilder::new();
        numeric::install(&mut builder).expect("numeric instances register");
        builder.build().expect("numeric registry is unambiguous")
    })
}

#[test]
fn numbers_form_a_group() {
    laws::check_registry_group(
        registry(),
        &[Number::Int(3), Number::Int(-8), Number::Int(0), Number::Real(0.5), Number::Real(-4.0)],
    )
    .unwrap();
}

#[test]
fn lookups_from_many_threads_agree() {
    let registry = registry();
    thread::scope(|s| {
        let handles: Vec<_> = (0..8_i64)
            .map(|i| {
                s.spawn(move || {
                    let x = Number::Int(i);
                    (
                        registry.negate(&x).unwrap(),
                        registry.minus(&x, &Number::Real(0.5)).unwrap(),
                    )
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            let (neg, diff) = handle.join().unwrap();
            let i = i as i64;
            assert_eq!(neg, Number::Int(-i));
            assert_eq!(diff, Number::Real(i as f64 - 0.5));
        }
    });
}

#[test]
fn selected_instances_are_reported() {
    let pair = TagPair::new(TagId::of::<Integral>(), TagId::of::<Floating>());
    let monoid = registry().lookup(Structure::Monoid, pair).unwrap();
    let group = registry().lookup(Structure::Group, pair).unwrap();
    assert_eq!(monoid.name, "number-monoid");
    assert_eq!(group.name, "native-group");
    assert_eq!(group.structure, Structure::Group);
}

#[test]
fn overlapping_wildcards_are_ambiguous_at_lookup() {
    init_tracing();
    let plus: fn(&Number, &Number) -> Number = |x, y| *x + *y;

    let mut builder = RegistryBuilder::<Number>::new();
    numeric::install(&mut builder).unwrap();
    builder
        .register(
            "shadow-monoid",
            InstanceKey::any(),
            Guard::always(),
            MonoidPrimitives {
                plus,
                zero: Number::zero_of,
            },
        )
        .unwrap();
    let registry = builder.build().unwrap();

    let int = TagId::of::<Integral>();
    match registry.plus(&Number::Int(1), &Number::Int(2)) {
        Err(DispatchError::AmbiguousInstance { structure, pair, candidates }) => {
            assert_eq!(structure, Structure::Monoid);
            assert_eq!(pair, TagPair::diagonal(int));
            assert_eq!(candidates, vec!["number-monoid", "shadow-monoid"]);
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }

    // The Group guard asks for a unique Monoid, so it fails to apply
    // and the Monoid ambiguity is what resolution reports.
    assert!(matches!(
        registry.negate(&Number::Int(1)),
        Err(DispatchError::AmbiguousInstance {
            structure: Structure::Monoid,
            ..
        })
    ));
}

struct Temperature;

/// Re-tags `i32` so it dispatches under `Temperature`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Celsius(i32);

impl DataType for Celsius {
    type Tag = Temperature;
}

#[test]
fn datatype_newtypes_dispatch_under_their_tag() {
    init_tracing();
    let temperature = TagId::of::<Temperature>();
    assert_eq!(Celsius(21).tag(), temperature);

    let mut builder = RegistryBuilder::<Celsius>::new();
    builder
        .register(
            "temperature-monoid",
            InstanceKey::diagonal(temperature),
            Guard::always(),
            MonoidPrimitives {
                plus: |x: &Celsius, y: &Celsius| Celsius(x.0.wrapping_add(y.0)),
                zero: |_| Celsius(0),
            },
        )
        .unwrap()
        .register(
            "temperature-group",
            InstanceKey::diagonal(temperature),
            Guard::always(),
            GroupPrimitives::default()
                .with_minus(|x: &Celsius, y: &Celsius| Celsius(x.0.wrapping_sub(y.0))),
        )
        .unwrap();
    let registry = builder.build().unwrap();

    assert_eq!(registry.minus(&Celsius(21), &Celsius(4)).unwrap(), Celsius(17));
    assert_eq!(registry.negate(&Celsius(4)).unwrap(), Celsius(-4));
    assert_eq!(registry.zero(temperature).unwrap(), Celsius(0));
    assert!(registry.models(Structure::Group, TagPair::diagonal(temperature)));
    assert!(!registry.models(Structure::Monoid, TagPair::diagonal(TagId::of::<Celsius>())));
    laws::check_registry_group(&registry, &[Celsius(-3), Celsius(0), Celsius(40)]).unwrap();
}

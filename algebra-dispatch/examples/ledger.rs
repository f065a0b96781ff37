//! Small demo of both dispatch modes.
//!
//! - Compile-time: a derived `Group` for a struct of balances, with
//!   operator sugar.
//! - Run time: a registry holding the numeric instances plus a custom
//!   `Cents` tag whose Group supplies only `negate`.
//!
//! Run with `RUST_LOG=algebra_dispatch=trace` to watch resolution.

use std::ops::Add;
use std::ops::Sub;

use algebra_dispatch::guard::Guard;
use algebra_dispatch::mcd::Derivation;
use algebra_dispatch::numeric;
use algebra_dispatch::numeric::Number;
use algebra_dispatch::registry::Capability;
use algebra_dispatch::registry::GroupPrimitives;
use algebra_dispatch::registry::InstanceKey;
use algebra_dispatch::registry::MonoidPrimitives;
use algebra_dispatch::tag::TagPair;
use algebra_dispatch::DispatchError;
use algebra_dispatch::Group;
use algebra_dispatch::GroupOperators;
use algebra_dispatch::Monoid;
use algebra_dispatch::Operation;
use algebra_dispatch::RegistryBuilder;
use algebra_dispatch::TagId;
use algebra_dispatch::Tagged;

#[derive(Clone, Copy, Debug, PartialEq, Monoid, Group, GroupOperators)]
struct Balances {
    checking: i64,
    savings: i64,
}

fn static_demo() {
    println!("=== derived Group ===");

    let opening = Balances {
        checking: 120,
        savings: 900,
    };
    let transfer = Balances {
        checking: -50,
        savings: 50,
    };

    println!("after transfer: {:?}", opening + transfer);
    println!("reversed:       {:?}", opening - transfer);
    println!("inverse:        {:?}", -transfer);
    println!();
}

/// Money in one currency, tagged separately from plain numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Value {
    Num(Number),
    Cents(i64),
}

struct Currency;

impl Tagged for Value {
    fn tag(&self) -> TagId {
        match self {
            Value::Num(n) => n.tag(),
            Value::Cents(_) => TagId::of::<Currency>(),
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Num(a), Value::Num(b)) => Value::Num(a + b),
            (Value::Cents(a), Value::Cents(b)) => Value::Cents(a + b),
            (a, _) => a,
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Num(a), Value::Num(b)) => Value::Num(a - b),
            (Value::Cents(a), Value::Cents(b)) => Value::Cents(a - b),
            (a, _) => a,
        }
    }
}

fn dynamic_demo() -> Result<(), DispatchError> {
    println!("=== run-time registry ===");

    let currency = TagId::of::<Currency>();
    let mut builder = RegistryBuilder::<Value>::new();
    builder
        .register(
            "cents-monoid",
            InstanceKey::diagonal(currency),
            Guard::always(),
            MonoidPrimitives {
                plus: |x: &Value, y: &Value| *x + *y,
                zero: |_| Value::Cents(0),
            },
        )?
        .register(
            "cents-group",
            InstanceKey::diagonal(currency),
            Guard::always(),
            GroupPrimitives::default().with_negate(|x: &Value| match x {
                Value::Cents(c) => Value::Cents(-c),
                other => *other,
            }),
        )?;

    for tag in [TagId::of::<numeric::Integral>(), TagId::of::<numeric::Floating>()] {
        builder
            .declare(tag, Capability::NativeAddition)
            .declare(tag, Capability::NativeSubtraction);
    }
    builder.register(
        "number-monoid",
        InstanceKey::any(),
        Guard::capability(Capability::NativeAddition),
        MonoidPrimitives {
            plus: |x: &Value, y: &Value| *x + *y,
            zero: |tag| Value::Num(Number::zero_of(tag)),
        },
    )?;
    numeric::install_native_group(&mut builder)?;
    let registry = builder.build()?;

    let price = Value::Cents(1999);
    let coupon = Value::Cents(500);
    println!("price - coupon = {:?}", registry.minus(&price, &coupon)?);

    let group = registry.resolve_group(TagPair::diagonal(currency))?;
    println!(
        "{}: minus is {}",
        group.name(),
        match group.derivation(Operation::Minus) {
            Derivation::Primitive => "primitive",
            Derivation::Derived => "derived",
        }
    );

    let x = Value::Num(Number::Int(7));
    let y = Value::Num(Number::Real(0.25));
    println!("7 - 0.25 = {:?}", registry.minus(&x, &y)?);
    println!("-7 = {:?}", registry.negate(&x)?);

    match registry.plus(&price, &x) {
        Ok(v) => println!("unexpected: {v:?}"),
        Err(e) => println!("cents + number: {e}"),
    }
    Ok(())
}

fn main() -> Result<(), DispatchError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    static_demo();
    dynamic_demo()
}

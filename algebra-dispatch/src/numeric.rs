//! The built-in numeric instance.
//!
//! Any two types that already form a [`Monoid`] and opt into native
//! subtraction form an additive group, with that subtraction as the
//! group's `minus`. `negate` is then derived as `0 - x`.
//!
//! "Opt into native subtraction" is an explicit trait,
//! [`NativeSubtraction`], rather than a check that `x - y`
//! compiles. Every primitive integer and float opts in.
//!
//! Integer arithmetic wraps, so `plus`, `minus` and `negate` are total
//! and the laws hold on the whole domain: signed integers are the two's
//! complement group and unsigned integers the group of integers mod
//! 2^n. Floats use native `+` and `-`.
//!
//! ```rust
//! use algebra_dispatch::{derivation_of, minus, negate, plus, Derivation, Operation};
//!
//! assert_eq!(negate(5_i64), -5);
//! assert_eq!(minus(2.5_f64, 1.0), 1.5);
//! assert_eq!(negate(i32::MIN), i32::MIN);
//! assert_eq!(plus(u8::MAX, 1), 0);
//! assert_eq!(negate(1_u8), u8::MAX);
//! assert_eq!(derivation_of::<i8, i8>(Operation::Negate), Derivation::Derived);
//! ```
//!
//! The same instance is available to a [`Registry`](crate::registry::Registry)
//! through [`install_native_group`], and [`Number`] is a ready-made value
//! domain for it.

use std::fmt;
use std::ops::Add;
use std::ops::Sub;

use num_traits::WrappingAdd;
use num_traits::WrappingSub;
use num_traits::Zero;

use crate::error::Result;
use crate::guard::Guard;
use crate::registry::Capability;
use crate::registry::GroupPrimitives;
use crate::registry::InstanceKey;
use crate::registry::MonoidPrimitives;
use crate::registry::RegistryBuilder;
use crate::registry::Structure;
use crate::tag::DataType;
use crate::tag::TagId;
use crate::tag::Tagged;
use crate::Group;
use crate::MinusImpl;
use crate::MinusMcd;
use crate::Monoid;

/// Opt-in: `self` and `Rhs` have a native subtraction that is the group
/// subtraction of `(Self, Rhs)`.
///
/// Implementing this for a type that is a `Monoid<Rhs>` makes it a
/// `Group<Rhs>` with [`MinusMcd`].
pub trait NativeSubtraction<Rhs = Self>: Monoid<Rhs> {
    /// `self - rhs`, total over both domains.
    fn native_minus(self, rhs: Rhs) -> Self::Output;
}

impl<X, Y> MinusImpl<Y> for X
where
    X: NativeSubtraction<Y>,
{
    fn minus_impl(self, rhs: Y) -> Self::Output {
        self.native_minus(rhs)
    }
}

impl<X, Y> Group<Y> for X
where
    X: MinusImpl<Y> + NativeSubtraction<Y>,
{
    type Mcd = MinusMcd;
}

// Primitive numbers: Monoid with `0`, each its own tag. Integers wrap.

macro_rules! impl_integer_group {
    ( $( $t:ty ),+ ) => {
        $(
            impl Monoid for $t {
                type Output = $t;

                fn plus_impl(self, rhs: $t) -> $t {
                    WrappingAdd::wrapping_add(&self, &rhs)
                }

                fn zero_impl() -> $t {
                    <$t as Zero>::zero()
                }
            }

            impl NativeSubtraction for $t {
                fn native_minus(self, rhs: $t) -> $t {
                    WrappingSub::wrapping_sub(&self, &rhs)
                }
            }

            impl DataType for $t {
                type Tag = $t;
            }
        )+
    }
}

macro_rules! impl_float_group {
    ( $( $t:ty ),+ ) => {
        $(
            impl Monoid for $t {
                type Output = $t;

                fn plus_impl(self, rhs: $t) -> $t {
                    self + rhs
                }

                fn zero_impl() -> $t {
                    <$t as Zero>::zero()
                }
            }

            impl NativeSubtraction for $t {
                fn native_minus(self, rhs: $t) -> $t {
                    self - rhs
                }
            }

            impl DataType for $t {
                type Tag = $t;
            }
        )+
    }
}

impl_integer_group!(i8, i16, i32, i64, i128, isize);
impl_integer_group!(u8, u16, u32, u64, u128, usize);
impl_float_group!(f32, f64);

/// Register the built-in numeric Group in `builder`.
///
/// The instance applies to any pair that already has a Monoid and whose
/// two tags both declared [`Capability::NativeSubtraction`]. Its only
/// primitive is native `-`.
pub fn install_native_group<V>(builder: &mut RegistryBuilder<V>) -> Result<&mut RegistryBuilder<V>>
where
    V: Clone + Sub<Output = V>,
{
    builder.register(
        "native-group",
        InstanceKey::any(),
        Guard::satisfies(Structure::Monoid).and(Guard::capability(Capability::NativeSubtraction)),
        GroupPrimitives::default().with_minus(native_minus::<V>),
    )
}

fn native_minus<V: Clone + Sub<Output = V>>(x: &V, y: &V) -> V {
    x.clone() - y.clone()
}

fn native_plus<V: Clone + Add<Output = V>>(x: &V, y: &V) -> V {
    x.clone() + y.clone()
}

/// Tag of integral [`Number`]s.
#[derive(Clone, Copy, Debug)]
pub struct Integral;

/// Tag of floating-point [`Number`]s.
#[derive(Clone, Copy, Debug)]
pub struct Floating;

/// A number whose data type is decided at run time.
///
/// Integer arithmetic wraps. Arithmetic between an integer and a real
/// promotes to real, which rounds integers beyond 2^53 to the nearest
/// representable `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// Tagged [`Integral`].
    Int(i64),
    /// Tagged [`Floating`].
    Real(f64),
}

impl Number {
    /// The additive identity of `tag`; integral for unknown tags.
    pub fn zero_of(tag: TagId) -> Number {
        if tag == TagId::of::<Floating>() {
            Number::Real(0.0)
        } else {
            Number::Int(0)
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Real(r) => r,
        }
    }
}

impl Tagged for Number {
    fn tag(&self) -> TagId {
        match self {
            Number::Int(_) => TagId::of::<Integral>(),
            Number::Real(_) => TagId::of::<Floating>(),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(r: f64) -> Self {
        Number::Real(r)
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_add(b)),
            (a, b) => Number::Real(a.as_f64() + b.as_f64()),
        }
    }
}

impl Sub for Number {
    type Output = Number;

    fn sub(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a.wrapping_sub(b)),
            (a, b) => Number::Real(a.as_f64() - b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Real(r) => write!(f, "{r}"),
        }
    }
}

/// Register [`Number`]'s tags, its Monoid and the native Group.
///
/// The Monoid covers every pair of numeric tags, including the mixed
/// `(Integral, Floating)` and `(Floating, Integral)` pairs.
pub fn install(builder: &mut RegistryBuilder<Number>) -> Result<&mut RegistryBuilder<Number>> {
    let numeric = [TagId::of::<Integral>(), TagId::of::<Floating>()];
    for tag in numeric {
        builder
            .declare(tag, Capability::NativeAddition)
            .declare(tag, Capability::NativeSubtraction);
    }

    builder.register(
        "number-monoid",
        InstanceKey::any(),
        Guard::capability(Capability::NativeAddition),
        MonoidPrimitives {
            plus: native_plus::<Number>,
            zero: Number::zero_of,
        },
    )?;
    install_native_group(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcd::Derivation;
    use crate::mcd::Operation;
    use crate::minus;
    use crate::negate;
    use crate::plus;
    use crate::registry::Registry;
    use crate::tag::TagPair;
    use crate::zero;
    use crate::DispatchError;

    fn registry() -> Registry<Number> {
        let mut builder = RegistryBuilder::new();
        install(&mut builder).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn native_instance_scenarios() {
        assert_eq!(negate(5_i32), -5);
        assert_eq!(minus(10_i64, 3), 7);
        assert_eq!(plus(negate(3_i16), 3), 0);
        assert_eq!(minus(4_i8, 4), zero::<i8>());
        assert_eq!(zero::<i8>(), 0);
    }

    #[test]
    fn integer_instances_wrap() {
        assert_eq!(negate(i32::MIN), i32::MIN);
        assert_eq!(plus(i32::MAX, 1), i32::MIN);
        assert_eq!(minus(i64::MIN, 1), i64::MAX);
        assert_eq!(plus(u8::MAX, 1), 0);
        assert_eq!(negate(1_u8), u8::MAX);
        assert_eq!(plus(negate(200_u8), 200), zero::<u8>());
    }

    #[test]
    fn negate_is_minus_from_zero() {
        for x in [-7_i32, 0, 1, 42] {
            assert_eq!(negate(x), minus(zero::<i32>(), x));
        }
    }

    #[test]
    fn datatype_tags_are_the_types() {
        assert_eq!(TagId::of_datatype::<i32>(), TagId::of::<i32>());
        assert_ne!(TagId::of_datatype::<i32>(), TagId::of_datatype::<u32>());
    }

    #[test]
    fn registry_native_group() {
        let registry = registry();
        let int = TagId::of::<Integral>();

        assert_eq!(registry.negate(&Number::Int(5)).unwrap(), Number::Int(-5));
        assert_eq!(registry.minus(&Number::Int(10), &Number::Int(3)).unwrap(), Number::Int(7));
        assert_eq!(
            registry.plus(&registry.negate(&Number::Int(3)).unwrap(), &Number::Int(3)).unwrap(),
            Number::Int(0)
        );
        assert_eq!(registry.minus(&Number::Int(4), &Number::Int(4)).unwrap(), registry.zero(int).unwrap());
        assert_eq!(registry.zero(int).unwrap(), Number::Int(0));

        let group = registry.resolve_group(TagPair::diagonal(int)).unwrap();
        assert_eq!(group.name(), "native-group");
        assert_eq!(group.derivation(Operation::Minus), Derivation::Primitive);
        assert_eq!(group.derivation(Operation::Negate), Derivation::Derived);
    }

    #[test]
    fn registry_mixed_pairs_promote() {
        let registry = registry();
        assert_eq!(
            registry.minus(&Number::Int(3), &Number::Real(0.5)).unwrap(),
            Number::Real(2.5)
        );
        assert_eq!(registry.plus(&Number::Real(0.5), &Number::Int(1)).unwrap(), Number::Real(1.5));
        assert_eq!(registry.zero(TagId::of::<Floating>()).unwrap(), Number::Real(0.0));
        assert_eq!(registry.negate(&Number::Real(2.0)).unwrap(), Number::Real(-2.0));

        // 2^53 + 1 has no f64 representation.
        let wide = Number::Int((1_i64 << 53) + 1);
        assert_eq!(
            registry.plus(&wide, &Number::Real(0.0)).unwrap(),
            Number::Real(9_007_199_254_740_992.0)
        );
        assert_eq!(registry.plus(&wide, &Number::Int(0)).unwrap(), wide);
    }

    #[test]
    fn native_group_needs_the_capability() {
        struct Opaque;

        // Opaque has a Monoid but never declared native subtraction.
        let opaque = TagId::of::<Opaque>();
        let mut builder = RegistryBuilder::<Number>::new();
        builder
            .register(
                "opaque-monoid",
                InstanceKey::diagonal(opaque),
                Guard::always(),
                MonoidPrimitives {
                    plus: native_plus::<Number>,
                    zero: Number::zero_of,
                },
            )
            .unwrap();
        install_native_group(&mut builder).unwrap();
        let registry = builder.build().unwrap();

        let pair = TagPair::diagonal(opaque);
        assert!(registry.models(Structure::Monoid, pair));
        assert_eq!(
            registry.lookup(Structure::Group, pair),
            Err(DispatchError::NoInstance {
                structure: Structure::Group,
                pair,
            })
        );
    }

    #[test]
    fn native_group_needs_the_monoid() {
        // Capabilities declared, but no Monoid registered.
        let int = TagId::of::<Integral>();
        let mut builder = RegistryBuilder::<Number>::new();
        builder.declare(int, Capability::NativeSubtraction);
        install_native_group(&mut builder).unwrap();
        let registry = builder.build().unwrap();

        assert!(!registry.models(Structure::Group, TagPair::diagonal(int)));
        assert!(registry.negate(&Number::Int(1)).is_err());
    }
}

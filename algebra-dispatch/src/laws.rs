//! Law sheet for Monoid and Group instances.
//!
//! The dispatch mechanism does not check algebraic laws; an instance
//! whose `plus(x, negate(x))` is not `zero()` resolves just as well as a
//! correct one. These predicates let a test suite check them.
//!
//! | Law | Statement |
//! |---|---|
//! | [`Law::Associativity`] | `plus(plus(a, b), c) == plus(a, plus(b, c))` |
//! | [`Law::LeftIdentity`] | `plus(zero(), a) == a` |
//! | [`Law::RightIdentity`] | `plus(a, zero()) == a` |
//! | [`Law::RightInverse`] | `plus(x, negate(x)) == zero()` |
//! | [`Law::LeftInverse`] | `plus(negate(x), x) == zero()` |
//! | [`Law::MinusIsPlusNegate`] | `minus(x, y) == plus(x, negate(y))` |
//! | [`Law::NegateIsMinusFromZero`] | `negate(x) == minus(zero(), x)` |
//!
//! ```rust
//! use algebra_dispatch::laws;
//!
//! laws::check_group(&[-3_i64, 0, 7, 1_000]).unwrap();
//! ```

use std::fmt;

use thiserror::Error;

use crate::error::DispatchError;
use crate::minus;
use crate::negate;
use crate::plus;
use crate::registry::Registry;
use crate::tag::Tagged;
use crate::zero;
use crate::Group;
use crate::Monoid;

/// One of the Monoid or Group laws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Law {
    /// `plus` is associative.
    Associativity,
    /// `zero` is a left identity.
    LeftIdentity,
    /// `zero` is a right identity.
    RightIdentity,
    /// `negate(x)` is a right inverse.
    RightInverse,
    /// `negate(x)` is a left inverse.
    LeftInverse,
    /// `minus` agrees with `plus` and `negate`.
    MinusIsPlusNegate,
    /// `negate` agrees with `minus` and `zero`.
    NegateIsMinusFromZero,
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Law::Associativity => "associativity",
            Law::LeftIdentity => "left identity",
            Law::RightIdentity => "right identity",
            Law::RightInverse => "right inverse",
            Law::LeftInverse => "left inverse",
            Law::MinusIsPlusNegate => "minus(x, y) == plus(x, negate(y))",
            Law::NegateIsMinusFromZero => "negate(x) == minus(zero(), x)",
        })
    }
}

/// A law that failed, with the values that witness it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LawViolation {
    /// The equation did not hold.
    #[error("{law} violated by {witness}")]
    Violated {
        /// The law.
        law: Law,
        /// Debug rendering of the offending values.
        witness: String,
    },

    /// A registry could not resolve an instance for the samples.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn violated(law: Law, witness: impl fmt::Debug) -> LawViolation {
    LawViolation::Violated {
        law,
        witness: format!("{witness:?}"),
    }
}

/// `plus(plus(a, b), c) == plus(a, plus(b, c))`.
pub fn associative<M>(a: M, b: M, c: M) -> bool
where
    M: Monoid<M, Output = M> + Clone + PartialEq,
{
    plus(plus(a.clone(), b.clone()), c.clone()) == plus(a, plus(b, c))
}

/// `plus(zero(), a) == a`.
pub fn left_identity<M>(a: M) -> bool
where
    M: Monoid<M, Output = M> + Clone + PartialEq,
{
    plus(zero::<M>(), a.clone()) == a
}

/// `plus(a, zero()) == a`.
pub fn right_identity<M>(a: M) -> bool
where
    M: Monoid<M, Output = M> + Clone + PartialEq,
{
    plus(a.clone(), zero::<M>()) == a
}

/// `plus(x, negate(x)) == zero()`.
pub fn right_inverse<G>(x: G) -> bool
where
    G: Group<G, Output = G> + Clone + PartialEq,
{
    plus(x.clone(), negate(x)) == zero::<G>()
}

/// `plus(negate(x), x) == zero()`.
pub fn left_inverse<G>(x: G) -> bool
where
    G: Group<G, Output = G> + Clone + PartialEq,
{
    plus(negate(x.clone()), x) == zero::<G>()
}

/// `minus(x, y) == plus(x, negate(y))`.
pub fn minus_is_plus_negate<G>(x: G, y: G) -> bool
where
    G: Group<G, Output = G> + Clone + PartialEq,
{
    minus(x.clone(), y.clone()) == plus(x, negate(y))
}

/// `negate(x) == minus(zero(), x)`.
pub fn negate_is_minus_from_zero<G>(x: G) -> bool
where
    G: Group<G, Output = G> + Clone + PartialEq,
{
    negate(x.clone()) == minus(zero::<G>(), x)
}

/// Check the Monoid laws on every combination of `samples`.
pub fn check_monoid<M>(samples: &[M]) -> Result<(), LawViolation>
where
    M: Monoid<M, Output = M> + Clone + PartialEq + fmt::Debug,
{
    for a in samples {
        if !left_identity(a.clone()) {
            return Err(violated(Law::LeftIdentity, a));
        }
        if !right_identity(a.clone()) {
            return Err(violated(Law::RightIdentity, a));
        }
        for b in samples {
            for c in samples {
                if !associative(a.clone(), b.clone(), c.clone()) {
                    return Err(violated(Law::Associativity, (a, b, c)));
                }
            }
        }
    }
    Ok(())
}

/// Check the Monoid and Group laws on every combination of `samples`.
pub fn check_group<G>(samples: &[G]) -> Result<(), LawViolation>
where
    G: Group<G, Output = G> + Clone + PartialEq + fmt::Debug,
{
    check_monoid(samples)?;
    for x in samples {
        if !right_inverse(x.clone()) {
            return Err(violated(Law::RightInverse, x));
        }
        if !left_inverse(x.clone()) {
            return Err(violated(Law::LeftInverse, x));
        }
        if !negate_is_minus_from_zero(x.clone()) {
            return Err(violated(Law::NegateIsMinusFromZero, x));
        }
        for y in samples {
            if !minus_is_plus_negate(x.clone(), y.clone()) {
                return Err(violated(Law::MinusIsPlusNegate, (x, y)));
            }
        }
    }
    Ok(())
}

/// Check the Group laws of a [`Registry`] on `samples`.
///
/// Inverse laws are checked per value on its diagonal pair; the
/// subtraction law on every ordered pair of samples the registry has a
/// Group for.
pub fn check_registry_group<V>(registry: &Registry<V>, samples: &[V]) -> Result<(), LawViolation>
where
    V: Tagged + PartialEq + fmt::Debug,
{
    for x in samples {
        let zero = registry.zero(x.tag())?;
        let neg = registry.negate(x)?;
        if registry.plus(x, &neg)? != zero {
            return Err(violated(Law::RightInverse, x));
        }
        if registry.plus(&neg, x)? != zero {
            return Err(violated(Law::LeftInverse, x));
        }
        if registry.minus(&zero, x)? != neg {
            return Err(violated(Law::NegateIsMinusFromZero, x));
        }
        for y in samples.iter().filter(|y| y.tag() == x.tag()) {
            if registry.minus(x, y)? != registry.plus(x, &registry.negate(y)?)? {
                return Err(violated(Law::MinusIsPlusNegate, (x, y)));
            }
        }
    }
    Ok(())
}

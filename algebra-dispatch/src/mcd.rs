//! Minimal complete definitions.
//!
//! A Group instance supplies `minus`, `negate`, or both; the other
//! operation is derived by one fixed rule:
//!
//! | Supplied | Derived |
//! |---|---|
//! | `minus` | `negate(x) = minus(zero(), x)` |
//! | `negate` | `minus(x, y) = plus(x, negate(y))` |
//! | both | nothing |
//!
//! Derivations never chain: each rule uses only primitives of the
//! instance itself plus the Monoid already resolved for the same pair.
//!
//! The table exists twice. [`MinusMcd`], [`NegateMcd`] and
//! [`CompleteMcd`] encode it for the trait-based instances, where the
//! choice is the [`Group::Mcd`](crate::Group::Mcd) associated type.
//! [`GroupDefinition`] encodes it for instances held in a
//! [`Registry`](crate::registry::Registry).

use std::fmt;

use crate::error::DispatchError;
use crate::error::Result;
use crate::registry::BinaryOp;
use crate::registry::GroupPrimitives;
use crate::registry::ResolvedMonoid;
use crate::registry::Structure;
use crate::registry::UnaryOp;
use crate::MinusImpl;
use crate::Monoid;
use crate::NegateImpl;

/// The operations of the Monoid and Group structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `plus(x, y)`
    Plus,
    /// `zero()`
    Zero,
    /// `negate(x)`
    Negate,
    /// `minus(x, y)`
    Minus,
}

impl Operation {
    /// The structure that introduces this operation.
    pub fn structure(self) -> Structure {
        match self {
            Operation::Plus | Operation::Zero => Structure::Monoid,
            Operation::Negate | Operation::Minus => Structure::Group,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Plus => "plus",
            Operation::Zero => "zero",
            Operation::Negate => "negate",
            Operation::Minus => "minus",
        })
    }
}

/// How an instance provides an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Derivation {
    /// Supplied directly by the instance.
    Primitive,
    /// Synthesized from the instance's primitives.
    Derived,
}

/// A Group minimal complete definition for the pair `(X, Y)`.
///
/// Implemented by the strategy markers [`MinusMcd`], [`NegateMcd`] and
/// [`CompleteMcd`]; the façade functions [`minus`](crate::minus) and
/// [`negate`](crate::negate) call through it.
pub trait GroupMcd<X, Y>
where
    X: Monoid<Y>,
{
    /// How `minus` is obtained.
    const MINUS: Derivation;
    /// How `negate` is obtained.
    const NEGATE: Derivation;

    /// `minus(x, y)`.
    fn minus(x: X, y: Y) -> <X as Monoid<Y>>::Output;

    /// `negate(y)` relative to the identity of `X`.
    ///
    /// On the diagonal pair `(G, G)` this is the usual inverse.
    fn negate(y: Y) -> <X as Monoid<Y>>::Output;
}

/// Minimal complete definition: `minus`.
///
/// Derives `negate(x) = minus(zero(), x)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MinusMcd;

impl<X, Y> GroupMcd<X, Y> for MinusMcd
where
    X: MinusImpl<Y>,
{
    const MINUS: Derivation = Derivation::Primitive;
    const NEGATE: Derivation = Derivation::Derived;

    fn minus(x: X, y: Y) -> <X as Monoid<Y>>::Output {
        x.minus_impl(y)
    }

    fn negate(y: Y) -> <X as Monoid<Y>>::Output {
        <X as Monoid<Y>>::zero_impl().minus_impl(y)
    }
}

/// Minimal complete definition: `negate`.
///
/// Derives `minus(x, y) = plus(x, negate(y))`. Only meaningful on the
/// diagonal pair, since `negate` is a unary operation of one type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NegateMcd;

impl<G> GroupMcd<G, G> for NegateMcd
where
    G: NegateImpl,
{
    const MINUS: Derivation = Derivation::Derived;
    const NEGATE: Derivation = Derivation::Primitive;

    fn minus(x: G, y: G) -> G {
        x.plus_impl(y.negate_impl())
    }

    fn negate(y: G) -> G {
        y.negate_impl()
    }
}

/// Both `minus` and `negate` supplied; nothing is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompleteMcd;

impl<G> GroupMcd<G, G> for CompleteMcd
where
    G: NegateImpl + MinusImpl<G>,
{
    const MINUS: Derivation = Derivation::Primitive;
    const NEGATE: Derivation = Derivation::Primitive;

    fn minus(x: G, y: G) -> G {
        x.minus_impl(y)
    }

    fn negate(y: G) -> G {
        y.negate_impl()
    }
}

/// How a trait-based Group instance for `(X, Y)` provides `op`.
///
/// Monoid operations are always primitive.
pub fn derivation_of<X, Y>(op: Operation) -> Derivation
where
    X: crate::Group<Y>,
{
    match op {
        Operation::Plus | Operation::Zero => Derivation::Primitive,
        Operation::Minus => <<X as crate::Group<Y>>::Mcd as GroupMcd<X, Y>>::MINUS,
        Operation::Negate => <<X as crate::Group<Y>>::Mcd as GroupMcd<X, Y>>::NEGATE,
    }
}

/// A registry Group instance after expansion: which primitives it
/// supplied, with the missing operation derived on demand.
pub enum GroupDefinition<V> {
    /// Supplied `minus`; `negate` is derived.
    Minus(BinaryOp<V>),
    /// Supplied `negate`; `minus` is derived.
    Negate(UnaryOp<V>),
    /// Supplied both.
    Complete {
        /// Primitive `minus`.
        minus: BinaryOp<V>,
        /// Primitive `negate`.
        negate: UnaryOp<V>,
    },
}

impl<V> Clone for GroupDefinition<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for GroupDefinition<V> {}

impl<V> fmt::Debug for GroupDefinition<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let supplied = match self {
            GroupDefinition::Minus(_) => "minus",
            GroupDefinition::Negate(_) => "negate",
            GroupDefinition::Complete { .. } => "minus + negate",
        };
        f.debug_tuple("GroupDefinition").field(&supplied).finish()
    }
}

impl<V> GroupDefinition<V> {
    /// Expand the primitives registered for `instance`.
    ///
    /// Fails with [`DispatchError::IncompleteInstance`] when neither
    /// `minus` nor `negate` is supplied.
    pub fn expand(instance: &'static str, primitives: GroupPrimitives<V>) -> Result<Self> {
        match (primitives.minus, primitives.negate) {
            (Some(minus), Some(negate)) => Ok(GroupDefinition::Complete { minus, negate }),
            (Some(minus), None) => Ok(GroupDefinition::Minus(minus)),
            (None, Some(negate)) => Ok(GroupDefinition::Negate(negate)),
            (None, None) => Err(DispatchError::IncompleteInstance {
                structure: Structure::Group,
                instance,
                missing: "`minus` or `negate`",
            }),
        }
    }

    /// How this definition provides `op`.
    pub fn derivation(&self, op: Operation) -> Derivation {
        match (op, self) {
            (Operation::Plus | Operation::Zero, _) => Derivation::Primitive,
            (Operation::Minus, GroupDefinition::Negate(_))
            | (Operation::Negate, GroupDefinition::Minus(_)) => Derivation::Derived,
            (Operation::Minus | Operation::Negate, _) => Derivation::Primitive,
        }
    }

    /// `minus(x, y)`, derived as `plus(x, negate(y))` if needed.
    pub fn minus(&self, monoid: &ResolvedMonoid<'_, V>, x: &V, y: &V) -> V {
        match self {
            GroupDefinition::Minus(minus) | GroupDefinition::Complete { minus, .. } => minus(x, y),
            GroupDefinition::Negate(negate) => monoid.plus(x, &negate(y)),
        }
    }

    /// `negate(x)`, derived as `minus(zero(), x)` if needed.
    pub fn negate(&self, monoid: &ResolvedMonoid<'_, V>, x: &V) -> V {
        match self {
            GroupDefinition::Negate(negate) | GroupDefinition::Complete { negate, .. } => negate(x),
            GroupDefinition::Minus(minus) => minus(&monoid.zero(), x),
        }
    }
}

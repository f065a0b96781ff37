#![deny(missing_docs)]
//! # algebra-dispatch — Monoid and Group for types you don't own
//!
//! This crate attaches algebraic structure to arbitrary types without
//! modifying them, and derives a full operation set from the minimal
//! subset each participant supplies:
//!
//! - [`Monoid`]: associative `plus` with identity `zero`
//! - [`Group`]: monoid with inverses (`negate`) and therefore `minus`
//!
//! Structures are **binary**: an instance is keyed on the ordered pair
//! `(Self, Rhs)`, so `plus(x, y)` may combine values of two different
//! types. Unary and nullary operations dispatch on the diagonal pair
//! `(T, T)`.
//!
//! The public surface is four free functions: [`plus`], [`zero`],
//! [`negate`], [`minus`]. They resolve the instance for their operand
//! types and run either the primitive the instance supplied or an
//! operation derived from it by the [`mcd`] table.
//!
//! ## Quick start
//!
//! ```rust
//! use algebra_dispatch::{minus, negate, plus, zero};
//!
//! // Built-in numeric instance: native `+`, `-` and `0`.
//! assert_eq!(negate(5_i32), -5);
//! assert_eq!(minus(10_i32, 3), 7);
//! assert_eq!(plus(negate(3_i32), 3), 0);
//! assert_eq!(minus(4_i32, 4), zero::<i32>());
//! ```
//!
//! ## Writing an instance
//!
//! A `Group` instance names its **minimal complete definition**: either
//! `minus` ([`MinusMcd`]), `negate` ([`NegateMcd`]) or both
//! ([`CompleteMcd`]). The missing operation is derived.
//!
//! ```rust
//! use algebra_dispatch::{minus, negate, Group, Monoid, NegateImpl, NegateMcd};
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! struct Z7(u8);
//!
//! impl Monoid for Z7 {
//!     type Output = Z7;
//!     fn plus_impl(self, rhs: Z7) -> Z7 {
//!         Z7((self.0 + rhs.0) % 7)
//!     }
//!     fn zero_impl() -> Z7 {
//!         Z7(0)
//!     }
//! }
//!
//! impl NegateImpl for Z7 {
//!     fn negate_impl(self) -> Z7 {
//!         Z7((7 - self.0) % 7)
//!     }
//! }
//!
//! impl Group for Z7 {
//!     type Mcd = NegateMcd;
//! }
//!
//! assert_eq!(negate(Z7(3)), Z7(4));
//! assert_eq!(minus(Z7(2), Z7(5)), Z7(4)); // derived: 2 + (-5)
//! ```
//!
//! ## Resolution guarantees
//!
//! Resolution is done entirely by the trait system:
//!
//! - a missing instance is an unsatisfied trait bound;
//! - two applicable instances are conflicting impls, rejected by
//!   coherence;
//! - an instance that supplies neither `minus` nor `negate` cannot name
//!   an [`Mcd`](Group::Mcd).
//!
//! For values whose tag is only known at run time, [`registry`] offers
//! the same contract over a frozen table of guarded instances.
//!
//! ## Standard library implementations
//!
//! - **Integers**: `Monoid` (wrapping `+`, `0`), `Group` through the
//!   built-in [`numeric`] instance (wrapping `-`)
//! - **`f32`, `f64`**: `Monoid` (`+`, `0`), `Group` (`-`)
//! - **`String`**: `Monoid` (concatenation), also `Monoid<&str>`
//! - **`Vec<T>`**: `Monoid` (concatenation)
//! - **`Option<M>`** (where `M: Monoid`): `Monoid`, `None` is zero
//! - **`()`**: `Monoid`, `Group`
//! - **`(A,)` … `(A, B, C, D)`**: `Monoid` (componentwise)
//!
//! ## Features
//!
//! - **`derive`** *(enabled by default)*: re-exports
//!   `#[derive(Monoid)]`, `#[derive(Group)]` and
//!   `#[derive(GroupOperators)]` for structs with named fields.

// Make the current crate visible as `algebra_dispatch` so the derive
// macros that use `::algebra_dispatch::...` work here and downstream.
extern crate self as algebra_dispatch;

pub mod error;
pub mod guard;
pub mod infix;
pub mod laws;
pub mod mcd;
pub mod numeric;
pub mod registry;
pub mod tag;

pub use error::DispatchError;
pub use infix::Infix;
pub use mcd::derivation_of;
pub use mcd::CompleteMcd;
pub use mcd::Derivation;
pub use mcd::GroupMcd;
pub use mcd::MinusMcd;
pub use mcd::NegateMcd;
pub use mcd::Operation;
pub use numeric::NativeSubtraction;
pub use registry::Registry;
pub use registry::RegistryBuilder;
pub use registry::Structure;
pub use tag::DataType;
pub use tag::TagId;
pub use tag::Tagged;

#[cfg(feature = "derive")]
pub use algebra_dispatch_derive::{Group, GroupOperators, Monoid};

/// A **monoid** instance for the ordered pair `(Self, Rhs)`.
///
/// Supplies the two Monoid primitives: an associative combine and the
/// identity of `Self`.
///
/// Laws (not enforced by type system), for `Rhs = Self`:
///
/// - **Associative**: `plus(plus(a, b), c) == plus(a, plus(b, c))`
/// - **Left identity**: `plus(zero(), a) == a`
/// - **Right identity**: `plus(a, zero()) == a`
///
/// Instances for `Rhs != Self` are registered explicitly per order;
/// `String: Monoid<&str>` does not imply `&str: Monoid<String>`.
///
/// # Example
///
/// ```rust
/// use algebra_dispatch::{plus, zero, Monoid};
///
/// #[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// struct Product(i32);
///
/// impl Monoid for Product {
///     type Output = Product;
///     fn plus_impl(self, rhs: Product) -> Product {
///         Product(self.0 * rhs.0)
///     }
///     fn zero_impl() -> Product {
///         Product(1)
///     }
/// }
///
/// assert_eq!(plus(Product(3), Product(5)), Product(15));
/// assert_eq!(plus(zero::<Product>(), Product(3)), Product(3));
/// ```
pub trait Monoid<Rhs = Self>: Sized {
    /// Result of `plus(Self, Rhs)`.
    type Output;

    /// Combine associatively.
    fn plus_impl(self, rhs: Rhs) -> Self::Output;

    /// The identity element of `Self`.
    fn zero_impl() -> Self;
}

/// A **group** instance for the ordered pair `(Self, Rhs)`.
///
/// Requires `Monoid<Rhs>` on the same pair. The instance does not
/// implement operations directly: it names which primitives it supplies
/// through [`Mcd`](Group::Mcd), and the chosen strategy derives the rest.
///
/// Laws (not enforced by type system):
///
/// - **Right inverse**: `plus(x, negate(x)) == zero()`
/// - **Left inverse**: `plus(negate(x), x) == zero()`
/// - **Subtraction**: `minus(x, y) == plus(x, negate(y))`
pub trait Group<Rhs = Self>: Monoid<Rhs> {
    /// The minimal complete definition this instance supplies.
    type Mcd: GroupMcd<Self, Rhs>;
}

/// Group primitive: subtraction of `Rhs` from `Self`.
///
/// Supplying this is enough for [`MinusMcd`], which derives
/// `negate(x) = minus(zero(), x)`.
pub trait MinusImpl<Rhs = Self>: Monoid<Rhs> {
    /// `self - rhs`.
    fn minus_impl(self, rhs: Rhs) -> Self::Output;
}

/// Group primitive: the inverse of `Self`.
///
/// Supplying this is enough for [`NegateMcd`], which derives
/// `minus(x, y) = plus(x, negate(y))`.
pub trait NegateImpl: Monoid<Self, Output = Self> {
    /// The inverse of `self`.
    fn negate_impl(self) -> Self;
}

/// Associative combine of `x` and `y`.
///
/// Requires `Monoid(type(x), type(y))`.
pub fn plus<X, Y>(x: X, y: Y) -> <X as Monoid<Y>>::Output
where
    X: Monoid<Y>,
{
    x.plus_impl(y)
}

/// The identity element of `M`.
///
/// Requires `Monoid(M, M)`.
pub fn zero<M>() -> M
where
    M: Monoid<M>,
{
    <M as Monoid<M>>::zero_impl()
}

/// The inverse of `x`.
///
/// Dispatches to the diagonal instance `Group(G, G)`.
pub fn negate<G>(x: G) -> G
where
    G: Group<G, Output = G>,
{
    <<G as Group<G>>::Mcd as GroupMcd<G, G>>::negate(x)
}

/// Subtract `y` from `x`: `plus(x, negate(y))`.
///
/// Requires `Group(type(x), type(y))`.
pub fn minus<X, Y>(x: X, y: Y) -> <X as Monoid<Y>>::Output
where
    X: Group<Y>,
{
    <<X as Group<Y>>::Mcd as GroupMcd<X, Y>>::minus(x, y)
}

/// Fold an iterator with `plus`, starting from `zero`.
pub fn concat<M, I>(iter: I) -> M
where
    M: Monoid<M, Output = M>,
    I: IntoIterator<Item = M>,
{
    iter.into_iter().fold(zero::<M>(), plus)
}

// Implementations for standard library types

impl Monoid for String {
    type Output = String;

    fn plus_impl(mut self, rhs: String) -> String {
        self.push_str(&rhs);
        self
    }

    fn zero_impl() -> String {
        String::new()
    }
}

impl<'a> Monoid<&'a str> for String {
    type Output = String;

    fn plus_impl(mut self, rhs: &'a str) -> String {
        self.push_str(rhs);
        self
    }

    fn zero_impl() -> String {
        String::new()
    }
}

impl<T> Monoid for Vec<T> {
    type Output = Vec<T>;

    fn plus_impl(mut self, mut rhs: Vec<T>) -> Vec<T> {
        self.append(&mut rhs);
        self
    }

    fn zero_impl() -> Vec<T> {
        Vec::new()
    }
}

// Option: lifted monoid, None is the identity

impl<M: Monoid<M, Output = M>> Monoid for Option<M> {
    type Output = Option<M>;

    fn plus_impl(self, rhs: Option<M>) -> Option<M> {
        match (self, rhs) {
            (None, x) | (x, None) => x,
            (Some(a), Some(b)) => Some(plus(a, b)),
        }
    }

    fn zero_impl() -> Option<M> {
        None
    }
}

// Unit type

impl Monoid for () {
    type Output = ();

    fn plus_impl(self, _rhs: ()) {}

    fn zero_impl() {}
}

impl NegateImpl for () {
    fn negate_impl(self) {}
}

impl Group for () {
    type Mcd = CompleteMcd;
}

impl MinusImpl for () {
    fn minus_impl(self, _rhs: ()) {}
}

// Tuples: product monoids

macro_rules! impl_product_monoid {
    ( $( $T:ident : $idx:tt ),+ ) => {
        impl<$( $T ),+> Monoid for ( $( $T, )+ )
        where
            $( $T: Monoid<$T, Output = $T> ),+
        {
            type Output = Self;

            fn plus_impl(self, rhs: Self) -> Self {
                (
                    $( plus(self.$idx, rhs.$idx), )+
                )
            }

            fn zero_impl() -> Self {
                (
                    $( zero::<$T>(), )+
                )
            }
        }
    }
}

impl_product_monoid!(A:0);
impl_product_monoid!(A:0, B:1);
impl_product_monoid!(A:0, B:1, C:2);
impl_product_monoid!(A:0, B:1, C:2, D:3);

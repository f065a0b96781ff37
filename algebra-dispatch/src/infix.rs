//! Operator sugar.
//!
//! [`Infix`] wraps any participating value so that the usual operators
//! route through the façade:
//!
//! - binary `a - b` is [`minus`]
//! - unary `-a` is [`negate`]
//! - binary `a + b` is [`plus`]
//!
//! For your own types, `#[derive(GroupOperators)]` implements `Sub` and
//! `Neg` directly.
//!
//! ```rust
//! use algebra_dispatch::Infix;
//!
//! let x = Infix(10_i32);
//! let y = Infix(3_i32);
//! assert_eq!(x - y, Infix(7));
//! assert_eq!(-x, Infix(-10));
//! assert_eq!((x + y).into_inner(), 13);
//! ```

use std::ops::Add;
use std::ops::Neg;
use std::ops::Sub;

use crate::minus;
use crate::negate;
use crate::plus;
use crate::Group;
use crate::Monoid;

/// A value whose operators dispatch through Monoid and Group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Infix<T>(pub T);

impl<T> Infix<T> {
    /// Unwrap.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Infix<T> {
    fn from(value: T) -> Self {
        Infix(value)
    }
}

impl<X, Y> Add<Infix<Y>> for Infix<X>
where
    X: Monoid<Y>,
{
    type Output = Infix<<X as Monoid<Y>>::Output>;

    fn add(self, rhs: Infix<Y>) -> Self::Output {
        Infix(plus(self.0, rhs.0))
    }
}

impl<X, Y> Sub<Infix<Y>> for Infix<X>
where
    X: Group<Y>,
{
    type Output = Infix<<X as Monoid<Y>>::Output>;

    fn sub(self, rhs: Infix<Y>) -> Self::Output {
        Infix(minus(self.0, rhs.0))
    }
}

impl<G> Neg for Infix<G>
where
    G: Group<G, Output = G>,
{
    type Output = Infix<G>;

    fn neg(self) -> Infix<G> {
        Infix(negate(self.0))
    }
}

//! Data-type tags.
//!
//! A value's **data type** is the category it dispatches under in the
//! [`registry`](crate::registry), which need not be its concrete
//! representation.
//!
//! - [`TagId`] is the runtime descriptor of a tag.
//! - [`Tagged`] lets a runtime value report its tag. An enum of several
//!   data types implements it by hand, one tag per variant.
//! - [`DataType`] names the tag of every value of a type. Each
//!   `DataType` is [`Tagged`] through a blanket impl, so several
//!   representations can share one tag and a newtype can re-tag a
//!   representation.
//!
//! The trait-based API does not use tags: it dispatches on the Rust
//! types of the operands.
//!
//! # Example
//!
//! ```rust
//! use algebra_dispatch::tag::{DataType, TagId, Tagged};
//!
//! struct Length;
//!
//! struct Meters(f64);
//! struct Feet(f64);
//!
//! impl DataType for Meters {
//!     type Tag = Length;
//! }
//!
//! impl DataType for Feet {
//!     type Tag = Length;
//! }
//!
//! assert_eq!(Meters(1.0).tag(), TagId::of::<Length>());
//! assert_eq!(Meters(1.0).tag(), Feet(3.3).tag());
//! assert_ne!(TagId::of::<Meters>(), TagId::of::<Length>());
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

/// Associates a representation with the tag it dispatches under.
pub trait DataType {
    /// The dispatch tag.
    type Tag: ?Sized + 'static;
}

/// Runtime descriptor of a data-type tag.
///
/// Two `TagId`s are equal iff they describe the same Rust type; the
/// name is carried for diagnostics only.
#[derive(Clone, Copy)]
pub struct TagId {
    id: TypeId,
    name: &'static str,
}

impl TagId {
    /// The tag described by the type `T` itself.
    pub fn of<T: ?Sized + 'static>() -> Self {
        TagId {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The tag a representation `T` dispatches under.
    pub fn of_datatype<T: DataType + ?Sized>() -> Self {
        Self::of::<T::Tag>()
    }

    /// Fully qualified name of the tag type.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TagId {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TagId {}

impl Hash for TagId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagId({})", self.name)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A runtime value that knows its own data-type tag.
pub trait Tagged {
    /// The tag this value dispatches under.
    fn tag(&self) -> TagId;
}

impl<T: DataType> Tagged for T {
    fn tag(&self) -> TagId {
        TagId::of_datatype::<T>()
    }
}

/// An ordered pair of tags: the dispatch key of a binary operation.
///
/// Order matters. `(A, B)` and `(B, A)` are distinct keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagPair {
    /// Tag of the left operand.
    pub lhs: TagId,
    /// Tag of the right operand.
    pub rhs: TagId,
}

impl TagPair {
    /// The pair `(lhs, rhs)`.
    pub fn new(lhs: TagId, rhs: TagId) -> Self {
        TagPair { lhs, rhs }
    }

    /// The pair `(tag, tag)`, used by unary and nullary operations.
    pub fn diagonal(tag: TagId) -> Self {
        TagPair { lhs: tag, rhs: tag }
    }

    /// The pair of tags of two runtime values.
    pub fn of_values<V: Tagged + ?Sized>(x: &V, y: &V) -> Self {
        TagPair::new(x.tag(), y.tag())
    }
}

impl fmt::Display for TagPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lhs, self.rhs)
    }
}

/// Which tags one side of an instance key accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagPattern {
    /// Exactly this tag.
    Exact(TagId),
    /// Any tag; the guard decides.
    Any,
}

impl TagPattern {
    /// Whether `tag` is accepted.
    pub fn matches(&self, tag: TagId) -> bool {
        match self {
            TagPattern::Exact(t) => *t == tag,
            TagPattern::Any => true,
        }
    }
}

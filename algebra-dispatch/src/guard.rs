//! Guard predicates and the evaluator that applies them.
//!
//! A guard decides, from a tag pair alone, whether an instance applies.
//! Guards run at resolution time against a frozen registry and may ask
//! two kinds of questions through [`GuardContext`]:
//!
//! - does a *prerequisite* structure hold for some pair
//!   ([`GuardContext::satisfies`]);
//! - did a tag declare a [`Capability`] during registration
//!   ([`GuardContext::has_capability`]).
//!
//! Asking about the guard's own structure (or one layered above it)
//! always answers `false`, so guard evaluation never recurses.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::DispatchError;
use crate::error::Result;
use crate::registry::Capability;
use crate::registry::Instance;
use crate::registry::Structure;
use crate::tag::TagId;
use crate::tag::TagPair;

/// The registry queries a guard may perform.
pub(crate) trait GuardQueries {
    fn models(&self, structure: Structure, pair: TagPair) -> bool;
    fn has_capability(&self, tag: TagId, capability: Capability) -> bool;
}

/// What a guard can see while it is evaluated.
pub struct GuardContext<'r> {
    structure: Structure,
    queries: &'r dyn GuardQueries,
}

impl<'r> GuardContext<'r> {
    pub(crate) fn new(structure: Structure, queries: &'r dyn GuardQueries) -> Self {
        GuardContext { structure, queries }
    }

    /// The structure whose instances are being selected.
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Whether `prerequisite` has exactly one applicable instance for
    /// `pair`.
    ///
    /// Only structures this one is layered on may be queried; any other
    /// query answers `false`.
    pub fn satisfies(&self, prerequisite: Structure, pair: TagPair) -> bool {
        if !self.structure.requires(prerequisite) {
            warn!(
                structure = %self.structure,
                queried = %prerequisite,
                %pair,
                "guard queried a structure that is not a prerequisite"
            );
            return false;
        }
        self.queries.models(prerequisite, pair)
    }

    /// Whether `tag` declared `capability`.
    pub fn has_capability(&self, tag: TagId, capability: Capability) -> bool {
        self.queries.has_capability(tag, capability)
    }
}

type Predicate = dyn Fn(&GuardContext<'_>, TagPair) -> bool + Send + Sync;

/// A value-independent predicate over tag pairs.
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<Predicate>,
}

impl Guard {
    /// A guard from an arbitrary predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&GuardContext<'_>, TagPair) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Holds for every pair; the instance key alone decides.
    pub fn always() -> Self {
        Guard::new(|_, _| true)
    }

    /// Holds when `prerequisite` is satisfied for the same pair.
    pub fn satisfies(prerequisite: Structure) -> Self {
        Guard::new(move |cx, pair| cx.satisfies(prerequisite, pair))
    }

    /// Holds when both tags of the pair declared `capability`.
    pub fn capability(capability: Capability) -> Self {
        Guard::new(move |cx, pair| {
            cx.has_capability(pair.lhs, capability) && cx.has_capability(pair.rhs, capability)
        })
    }

    /// Holds when both `self` and `other` hold.
    pub fn and(self, other: Guard) -> Self {
        Guard::new(move |cx, pair| self.holds(cx, pair) && other.holds(cx, pair))
    }

    /// Evaluate against `pair`.
    pub fn holds(&self, cx: &GuardContext<'_>, pair: TagPair) -> bool {
        (self.predicate)(cx, pair)
    }
}

impl Default for Guard {
    fn default() -> Self {
        Guard::always()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

/// Select the unique instance of `table` that applies to `pair`.
///
/// Every candidate's guard is evaluated. No match is
/// [`DispatchError::NoInstance`]; more than one is
/// [`DispatchError::AmbiguousInstance`] listing all of them. There is no
/// tie-breaking.
pub(crate) fn select<'r, I>(
    cx: &GuardContext<'_>,
    table: &'r [Instance<I>],
    pair: TagPair,
) -> Result<&'r Instance<I>> {
    let mut matching = table
        .iter()
        .filter(|instance| instance.key().matches(pair) && instance.guard().holds(cx, pair));

    match (matching.next(), matching.next()) {
        (None, _) => Err(DispatchError::NoInstance {
            structure: cx.structure(),
            pair,
        }),
        (Some(unique), None) => Ok(unique),
        (Some(first), Some(second)) => {
            let candidates: Vec<&'static str> = [first, second]
                .into_iter()
                .chain(matching)
                .map(Instance::name)
                .collect();
            warn!(
                structure = %cx.structure(),
                %pair,
                ?candidates,
                "ambiguous instances"
            );
            Err(DispatchError::AmbiguousInstance {
                structure: cx.structure(),
                pair,
                candidates,
            })
        }
    }
}

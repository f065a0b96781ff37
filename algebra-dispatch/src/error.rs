//! Resolution errors.
//!
//! All variants are definitional: they say the participating types are
//! misconfigured, never that a value was bad. None is retryable.

use thiserror::Error;

use crate::registry::Structure;
use crate::tag::TagPair;

/// Result alias for registry operations.
pub type Result<T, E = DispatchError> = std::result::Result<T, E>;

/// Why an instance could not be registered or resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No registered instance's guard holds for the pair.
    #[error("no {structure} instance applies to {pair}")]
    NoInstance {
        /// Structure that was requested.
        structure: Structure,
        /// Tag pair that was requested.
        pair: TagPair,
    },

    /// More than one instance's guard holds for the pair.
    #[error("{structure} instances {candidates:?} all apply to {pair}")]
    AmbiguousInstance {
        /// Structure that was requested.
        structure: Structure,
        /// Tag pair that was requested.
        pair: TagPair,
        /// Names of every matching instance, in registration order.
        candidates: Vec<&'static str>,
    },

    /// An instance supplies too few primitives to derive the rest.
    #[error("{structure} instance `{instance}` is incomplete: supply {missing}")]
    IncompleteInstance {
        /// Structure the instance was registered for.
        structure: Structure,
        /// Name the instance was registered under.
        instance: &'static str,
        /// The primitives of which at least one is required.
        missing: &'static str,
    },
}

impl DispatchError {
    /// The structure the failed request or registration concerned.
    pub fn structure(&self) -> Structure {
        match self {
            DispatchError::NoInstance { structure, .. }
            | DispatchError::AmbiguousInstance { structure, .. }
            | DispatchError::IncompleteInstance { structure, .. } => *structure,
        }
    }
}

//! Error types for entity allocation, component storage, and dispatch.
//!
//! This module declares the single error enum used across the kernel. Each
//! variant models one caller-visible failure mode and carries enough context
//! to make failures actionable while remaining `Copy` and cheap to pass
//! around or store.
//!
//! ## Goals
//! * **Specificity:** Each variant names a single failure mode (capacity
//!   exhausted, unregistered type, dead handle, duplicate attachment).
//! * **Ergonomics:** [`EcsError`] implements [`std::error::Error`] and
//!   [`std::fmt::Display`] via `thiserror`, so it composes with `?` and
//!   with any caller-side error stack.
//! * **Actionability:** Structured fields (the offending entity, the
//!   component type name, the capacity that was hit) make logs useful
//!   without reproducing the issue.
//!
//! ## Typical flow
//! Storage and allocation primitives return [`EcsResult`] directly; the
//! facade bubbles those errors up unchanged with `?`. Violations of
//! *internal* invariants (index maps out of sync, a store downcast failing
//! for a slot the registry itself assigned) are programming errors, not
//! recoverable conditions, and are covered by `debug_assert!` instead.

use thiserror::Error;

use crate::engine::types::Entity;

/// Every caller-visible failure mode in the kernel.
///
/// All variants are `Copy`: type names are `&'static str` produced by
/// [`std::any::type_name`], never owned strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EcsError {
    /// A fixed capacity (entity slots or component type slots) is full.
    #[error("{resource} limit reached (capacity {capacity})")]
    CapacityExceeded {
        /// Which table filled up, e.g. `"entities"`.
        resource: &'static str,
        /// The compile-time bound that was hit.
        capacity: usize,
    },

    /// A component or system type was used before being registered.
    #[error("{type_name} is not registered")]
    NotRegistered {
        /// The offending type.
        type_name: &'static str,
    },

    /// A component type or system type was registered twice.
    #[error("{type_name} is already registered")]
    AlreadyRegistered {
        /// The offending type.
        type_name: &'static str,
    },

    /// An entity handle is out of range or names a destroyed slot.
    #[error("entity {entity} is not alive")]
    InvalidEntity {
        /// The offending handle.
        entity: Entity,
    },

    /// An entity already owns a component of the given type.
    #[error("entity {entity} already has a {type_name} component")]
    DuplicateComponent {
        /// The entity carrying the existing value.
        entity: Entity,
        /// The component type that was attached twice.
        type_name: &'static str,
    },

    /// An entity does not own a component of the given type.
    #[error("entity {entity} has no {type_name} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// The component type that was absent.
        type_name: &'static str,
    },
}

/// Convenience alias used by every fallible operation in the kernel.
pub type EcsResult<T> = Result<T, EcsError>;

//! # Sigil
//!
//! Fixed-capacity entity/component storage kernel with signature-matched
//! system dispatch, built for real-time simulations with hard per-frame
//! budgets.
//!
//! ## Design Goals
//! - Dense per-type component storage for cache-friendly iteration
//! - Bitset signatures: membership tests are a few word-wide compares
//! - All capacities fixed up front; no steady-state allocation
//! - Deterministic ordering: systems tick in registration order, match
//!   sets iterate in ascending entity order
//! - Single-threaded by design; systems receive `&mut World` directly
//!
//! This crate builds as both:
//! - `rlib` (for Rust usage & integration tests)
//! - `cdylib` (for FFI / DLL usage)

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![deny(dead_code)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

// Coordinator

pub use engine::world::World;

// Subsystem layers

pub use engine::entity::EntityPool;

pub use engine::component::{
    ComponentRegistry,
    ComponentSet,
};

pub use engine::storage::{
    DenseStore,
    TypeErasedStore,
};

pub use engine::systems::{
    System,
    SystemRegistry,
};

// Errors

pub use engine::error::{
    EcsError,
    EcsResult,
};

// Core types and capacities

pub use engine::types::{
    build_signature,
    ComponentSlot,
    Entity,
    Signature,
    MAX_COMPONENT_TYPES,
    MAX_ENTITIES,
    NULL_ENTITY,
    SIGNATURE_WORDS,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude (Optional but recommended)
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used kernel types.
///
/// Import with:
/// ```rust
/// use sigil::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ComponentSet,
        EcsError,
        EcsResult,
        Entity,
        Signature,
        System,
        World,
        MAX_COMPONENT_TYPES,
        MAX_ENTITIES,
        NULL_ENTITY,
    };
}

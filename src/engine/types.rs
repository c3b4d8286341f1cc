//! Core Types, Identifiers, and Signature Layout
//!
//! This module defines the **fundamental types, capacity constants, and
//! bitset signatures** used throughout the kernel. These definitions form
//! the shared vocabulary of the system and are used by every subsystem:
//! entity allocation, component storage, and system dispatch.
//!
//! ## Design Philosophy
//!
//! The kernel is designed around:
//!
//! - **Dense storage** with fixed, pre-allocated capacity,
//! - **Bitset-based signatures** describing component ownership,
//! - **Stable numeric identifiers** that double as table indices,
//! - **No allocation in steady state**.
//!
//! To support these goals this module:
//!
//! - Encodes entities as plain 64-bit indices,
//! - Represents component sets as fixed-size bit arrays,
//! - Validates every capacity relationship with static assertions.
//!
//! ## Entity Representation
//!
//! An [`Entity`] is a bare index into the kernel's fixed tables. Valid
//! handles lie in `0..MAX_ENTITIES`; the reserved value [`NULL_ENTITY`]
//! (`u64::MAX`) never names a live entity and is safe to use as an
//! "absent" marker in caller-side data. Handles carry no generation
//! counter: a destroyed index is recycled verbatim, oldest first, so
//! callers that retain handles across destruction must consult
//! liveness before use.
//!
//! ## Signatures
//!
//! A [`Signature`] is a fixed-width bitset with one bit per registered
//! component type. Entity signatures describe which components an entity
//! currently owns; system signatures describe which components a system
//! requires. Membership testing reduces to [`Signature::contains_all`],
//! a handful of word-wide AND/compare operations.

/// Handle naming one entity slot. Plain index, no generation bits.
pub type Entity = u64;

/// Compact identifier for a registered component type. Assigned
/// sequentially from zero in registration order.
pub type ComponentSlot = u16;

/// Reserved non-entity value. Never returned by the allocator.
pub const NULL_ENTITY: Entity = Entity::MAX;

/// Maximum number of simultaneously live entities.
pub const MAX_ENTITIES: usize = 5_000;

/// Maximum number of registered component types.
pub const MAX_COMPONENT_TYPES: usize = 32;

/// Number of `u64` words required to represent a full signature.
pub const SIGNATURE_WORDS: usize = (MAX_COMPONENT_TYPES + 63) / 64;

const _: [(); 1] = [(); (MAX_ENTITIES > 0) as usize];
const _: [(); 1] = [(); (MAX_COMPONENT_TYPES > 0) as usize];
const _: [(); 1] = [(); (MAX_COMPONENT_TYPES <= SIGNATURE_WORDS * 64) as usize];
const _: [(); 1] = [(); (MAX_COMPONENT_TYPES <= ComponentSlot::MAX as usize) as usize];
const _: [(); 1] = [(); ((MAX_ENTITIES as u64) < NULL_ENTITY) as usize];

/// Bitset representing a set of component types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    /// Packed component bitset, one bit per [`ComponentSlot`].
    pub bits: [u64; SIGNATURE_WORDS],
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            bits: [0u64; SIGNATURE_WORDS],
        }
    }
}

impl Signature {
    /// Sets the bit corresponding to `slot`.
    #[inline]
    pub fn set(&mut self, slot: ComponentSlot) {
        let index = (slot as usize) / 64;
        let bit = (slot as usize) % 64;
        self.bits[index] |= 1u64 << bit;
    }

    /// Clears the bit corresponding to `slot`.
    #[inline]
    pub fn clear(&mut self, slot: ComponentSlot) {
        let index = (slot as usize) / 64;
        let bit = (slot as usize) % 64;
        self.bits[index] &= !(1u64 << bit);
    }

    /// Returns `true` if `slot` is present in this signature.
    #[inline]
    pub fn has(&self, slot: ComponentSlot) -> bool {
        let index = (slot as usize) / 64;
        let bit = (slot as usize) % 64;
        (self.bits[index] >> bit) & 1 == 1
    }

    /// Returns `true` if every slot in `required` is also present here.
    #[inline]
    pub fn contains_all(&self, required: &Signature) -> bool {
        for (word, required_word) in self.bits.iter().zip(required.bits.iter()) {
            if (word & required_word) != *required_word {
                return false;
            }
        }
        true
    }

    /// Returns `true` if no slot is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&word| word == 0)
    }

    /// Iterates over all slots set in this signature, ascending.
    pub fn slots(&self) -> impl Iterator<Item = ComponentSlot> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_index, &word)| {
            let base = word_index * 64;
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as usize;
                bits &= bits - 1;
                Some((base + tz) as ComponentSlot)
            })
        })
    }
}

/// Builds a signature from a list of component slots.
pub fn build_signature(slots: &[ComponentSlot]) -> Signature {
    let mut signature = Signature::default();
    for &slot in slots {
        signature.set(slot);
    }
    signature
}

//! Dense per-type component storage and type-erased access.
//!
//! This module implements [`DenseStore<T>`], the contiguous container
//! backing every registered component type, and [`TypeErasedStore`], the
//! dynamically-typed interface that lets the registry hold heterogeneous
//! stores behind one trait object type.
//!
//! # Storage model
//!
//! Internally a store keeps three tables:
//!
//! ```text
//! values:    [ T; live ]              dense, gap-free value array
//! entity_of: [ Entity; live ]         parallel to values (reverse map)
//! index_of:  [ usize; MAX_ENTITIES ]  entity -> dense index (forward map)
//! ```
//!
//! Values are packed from index 0 upward with no holes, so iterating a
//! component type touches exactly `live` contiguous elements regardless of
//! which entities own them. Absent entries in the forward map hold a
//! sentinel rather than an option, keeping lookups branch-light.
//!
//! # Core operations
//!
//! - **Insert**: appends at the end of the dense array and records both map
//!   directions. Rejects duplicates.
//! - **Remove**: swap-removes in `O(1)` by moving the last value into the
//!   vacated slot, then patches the moved entity's forward entry.
//! - **Destroy notification**: [`TypeErasedStore::on_entity_destroyed`]
//!   removes the entity's value if present and is a no-op otherwise, so the
//!   registry can fan a destroy out to every store unconditionally.
//!
//! These operations preserve dense packing but do **not** preserve element
//! order.
//!
//! # Type erasure
//!
//! [`TypeErasedStore`] exposes the operations that make sense without
//! knowing `T`: length, the element type's name and id, the destroy hook,
//! and `as_any` / `as_any_mut` downcasting hooks through which the registry
//! recovers the concrete `DenseStore<T>`.
//!
//! # Invariants
//!
//! - `values.len() == entity_of.len()`, and both are at most `MAX_ENTITIES`.
//! - `index_of[entity_of[i] as usize] == i` for every dense index `i`.
//! - Every forward entry not covered by the previous line is `NO_INDEX`.
//!
//! All three tables are sized or reserved up front, so steady-state
//! operation performs no allocation.

use std::any::{type_name, Any, TypeId};

use crate::engine::error::{EcsError, EcsResult};
use crate::engine::types::{Entity, MAX_ENTITIES};

/// Forward-map sentinel meaning "this entity has no value here".
const NO_INDEX: usize = usize::MAX;

/// Dynamically-typed interface over a [`DenseStore<T>`].
///
/// The registry owns stores as `Box<dyn TypeErasedStore>` and uses this
/// trait for the operations that must work across all component types at
/// once, chiefly fanning out entity destruction.
pub trait TypeErasedStore: Any {
    /// Returns an immutable type-erased reference for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable type-erased reference for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the `TypeId` of the element type stored.
    fn element_type_id(&self) -> TypeId;

    /// Returns the human-readable name of the element type stored.
    fn element_type_name(&self) -> &'static str;

    /// Returns the number of values currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if no values are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards the value owned by `entity`, if any.
    fn on_entity_destroyed(&mut self, entity: Entity);
}

/// Contiguous storage for every instance of one component type.
pub struct DenseStore<T> {
    values: Vec<T>,
    entity_of: Vec<Entity>,
    index_of: Vec<usize>,
}

impl<T: 'static> DenseStore<T> {
    /// Creates an empty store with full capacity reserved.
    pub fn new() -> Self {
        Self {
            values: Vec::with_capacity(MAX_ENTITIES),
            entity_of: Vec::with_capacity(MAX_ENTITIES),
            index_of: vec![NO_INDEX; MAX_ENTITIES],
        }
    }

    /// Attaches `value` to `entity`.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if the entity already
    /// owns a value in this store.
    pub fn insert(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        let slot = self.forward_slot(entity)?;
        if slot != NO_INDEX {
            return Err(EcsError::DuplicateComponent {
                entity,
                type_name: type_name::<T>(),
            });
        }
        debug_assert!(self.values.len() < MAX_ENTITIES, "dense array outgrew the entity cap");
        self.index_of[entity as usize] = self.values.len();
        self.values.push(value);
        self.entity_of.push(entity);
        log::trace!("{} attached to entity {}", type_name::<T>(), entity);
        Ok(())
    }

    /// Detaches and returns the value owned by `entity`.
    ///
    /// The last value in the dense array is swapped into the vacated slot,
    /// so removal is `O(1)` and the array stays gap-free.
    pub fn remove(&mut self, entity: Entity) -> EcsResult<T> {
        let index = self.present_slot(entity)?;
        let value = self.values.swap_remove(index);
        self.entity_of.swap_remove(index);
        self.index_of[entity as usize] = NO_INDEX;
        if index < self.entity_of.len() {
            let moved = self.entity_of[index];
            self.index_of[moved as usize] = index;
        }
        log::trace!("{} detached from entity {}", type_name::<T>(), entity);
        Ok(value)
    }

    /// Returns a shared reference to the value owned by `entity`.
    pub fn get(&self, entity: Entity) -> EcsResult<&T> {
        let index = self.present_slot(entity)?;
        Ok(&self.values[index])
    }

    /// Returns a mutable reference to the value owned by `entity`.
    pub fn get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        let index = self.present_slot(entity)?;
        Ok(&mut self.values[index])
    }

    /// Returns `true` if `entity` owns a value here. Total: out-of-range
    /// handles simply report `false`.
    #[inline]
    pub fn has(&self, entity: Entity) -> bool {
        self.index_of
            .get(entity as usize)
            .map(|&index| index != NO_INDEX)
            .unwrap_or(false)
    }

    /// Number of values stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates `(owner, value)` pairs in dense-array order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entity_of.iter().copied().zip(self.values.iter())
    }

    /// Iterates `(owner, value)` pairs mutably in dense-array order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entity_of.iter().copied().zip(self.values.iter_mut())
    }

    /// Forward-map entry for `entity`, or `InvalidEntity` if out of range.
    #[inline]
    fn forward_slot(&self, entity: Entity) -> EcsResult<usize> {
        self.index_of
            .get(entity as usize)
            .copied()
            .ok_or(EcsError::InvalidEntity { entity })
    }

    /// Dense index of `entity`'s value, or `MissingComponent` if absent.
    #[inline]
    fn present_slot(&self, entity: Entity) -> EcsResult<usize> {
        let index = self.forward_slot(entity)?;
        if index == NO_INDEX {
            return Err(EcsError::MissingComponent {
                entity,
                type_name: type_name::<T>(),
            });
        }
        debug_assert_eq!(self.entity_of[index], entity, "forward and reverse maps disagree");
        Ok(index)
    }
}

impl<T: 'static> Default for DenseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> TypeErasedStore for DenseStore<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn element_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn on_entity_destroyed(&mut self, entity: Entity) {
        if self.has(entity) {
            // Present, so remove cannot fail.
            let _ = self.remove(entity);
        }
    }
}

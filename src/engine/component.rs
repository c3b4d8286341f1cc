//! # Component Registry
//!
//! This module provides the registry that assigns compact [`ComponentSlot`]
//! values to Rust component types and owns the type-erased store for each.
//!
//! ## Purpose
//! The registry decouples component type identity (`TypeId`, name) from
//! runtime storage, letting the rest of the kernel address components by
//! slot number while callers keep using plain Rust types.
//!
//! ## Design
//! - Component types are registered once and assigned a slot in
//!   `[0, MAX_COMPONENT_TYPES)`, sequential in registration order.
//! - Each slot owns a `Box<dyn TypeErasedStore>` created at registration;
//!   concrete access downcasts back to [`DenseStore<T>`].
//! - The registry is plain owned state. There are no process-wide tables;
//!   two worlds in one process register types independently and may assign
//!   the same type different slots.
//!
//! ## Invariants
//! - `slots[type_id]` and position in `stores` agree: the slot assigned to
//!   a type indexes that type's store.
//! - Slots are never reused or unregistered; a type's slot is stable for
//!   the lifetime of the registry.
//!
//! ## Errors
//! Registering a type twice is [`EcsError::AlreadyRegistered`], touching an
//! unregistered type is [`EcsError::NotRegistered`], and registering past
//! the slot cap is [`EcsError::CapacityExceeded`]. Double registration is
//! rejected rather than made idempotent so that setup bugs (two subsystems
//! each registering a shared type) surface at the call site.

use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::engine::error::{EcsError, EcsResult};
use crate::engine::storage::{DenseStore, TypeErasedStore};
use crate::engine::types::{ComponentSlot, Entity, Signature, MAX_COMPONENT_TYPES};

/// Maps Rust component types to slots and owns per-type dense stores.
pub struct ComponentRegistry {
    slots: HashMap<TypeId, ComponentSlot>,
    stores: Vec<Box<dyn TypeErasedStore>>,
}

impl ComponentRegistry {
    /// Creates an empty registry with room for `MAX_COMPONENT_TYPES` types.
    pub fn new() -> Self {
        Self {
            slots: HashMap::with_capacity(MAX_COMPONENT_TYPES),
            stores: Vec::with_capacity(MAX_COMPONENT_TYPES),
        }
    }

    /// Registers component type `T`, creating its store and assigning the
    /// next sequential slot.
    pub fn register<T: 'static>(&mut self) -> EcsResult<ComponentSlot> {
        let type_id = TypeId::of::<T>();
        if self.slots.contains_key(&type_id) {
            return Err(EcsError::AlreadyRegistered {
                type_name: type_name::<T>(),
            });
        }
        if self.stores.len() >= MAX_COMPONENT_TYPES {
            return Err(EcsError::CapacityExceeded {
                resource: "component type slots",
                capacity: MAX_COMPONENT_TYPES,
            });
        }
        let slot = self.stores.len() as ComponentSlot;
        self.slots.insert(type_id, slot);
        self.stores.push(Box::new(DenseStore::<T>::new()));
        log::debug!("registered component type {} as slot {}", type_name::<T>(), slot);
        Ok(slot)
    }

    /// Returns the slot assigned to `T`.
    pub fn slot_of<T: 'static>(&self) -> EcsResult<ComponentSlot> {
        self.slots
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or(EcsError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }

    /// Number of registered component types.
    #[inline]
    pub fn registered_count(&self) -> usize {
        self.stores.len()
    }

    /// Returns the concrete store for `T`.
    pub fn store<T: 'static>(&self) -> EcsResult<&DenseStore<T>> {
        let slot = self.slot_of::<T>()?;
        let store = self.stores[slot as usize].as_any().downcast_ref();
        debug_assert!(store.is_some(), "slot table and store table disagree for {}", type_name::<T>());
        store.ok_or(EcsError::NotRegistered {
            type_name: type_name::<T>(),
        })
    }

    /// Returns the concrete store for `T`, mutably.
    pub fn store_mut<T: 'static>(&mut self) -> EcsResult<&mut DenseStore<T>> {
        let slot = self.slot_of::<T>()?;
        let store = self.stores[slot as usize].as_any_mut().downcast_mut();
        debug_assert!(store.is_some(), "slot table and store table disagree for {}", type_name::<T>());
        store.ok_or(EcsError::NotRegistered {
            type_name: type_name::<T>(),
        })
    }

    /// Attaches `value` to `entity` in `T`'s store.
    pub fn insert<T: 'static>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        self.store_mut::<T>()?.insert(entity, value)
    }

    /// Detaches and returns `entity`'s `T` value.
    pub fn remove<T: 'static>(&mut self, entity: Entity) -> EcsResult<T> {
        self.store_mut::<T>()?.remove(entity)
    }

    /// Returns a shared reference to `entity`'s `T` value.
    pub fn get<T: 'static>(&self, entity: Entity) -> EcsResult<&T> {
        self.store::<T>()?.get(entity)
    }

    /// Returns a mutable reference to `entity`'s `T` value.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.store_mut::<T>()?.get_mut(entity)
    }

    /// Returns `true` if `entity` owns a `T` value. Errs only if `T` was
    /// never registered; a destroyed or out-of-range entity reports `false`.
    pub fn has<T: 'static>(&self, entity: Entity) -> EcsResult<bool> {
        Ok(self.store::<T>()?.has(entity))
    }

    /// Fans an entity destruction out to every store. Stores that hold no
    /// value for `entity` ignore the call.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for store in &mut self.stores {
            store.on_entity_destroyed(entity);
        }
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of component types that can be folded into one [`Signature`].
///
/// Implemented for tuples of up to eight component types, plus the unit
/// tuple for the empty requirement. Used by
/// [`World::require_components`](crate::engine::world::World::require_components)
/// to declare what a system needs without hand-building signatures.
pub trait ComponentSet {
    /// Builds the signature containing every type in the set.
    ///
    /// Fails with [`EcsError::NotRegistered`] if any member type has no
    /// slot yet.
    fn signature(registry: &ComponentRegistry) -> EcsResult<Signature>;
}

impl ComponentSet for () {
    fn signature(_registry: &ComponentRegistry) -> EcsResult<Signature> {
        Ok(Signature::default())
    }
}

macro_rules! impl_component_set {
    ( $( $ty:ident ),* ) => {
        impl<$( $ty: 'static ),*> ComponentSet for ($( $ty, )*) {
            fn signature(registry: &ComponentRegistry) -> EcsResult<Signature> {
                let mut signature = Signature::default();
                $( signature.set(registry.slot_of::<$ty>()?); )*
                Ok(signature)
            }
        }
    };
}

macro_rules! component_set {
    ( $head:ident ) => {
        impl_component_set!($head);
    };
    ( $head:ident, $( $tail:ident ),* ) => {
        impl_component_set!($head, $( $tail ),*);
        component_set!($( $tail ),*);
    };
}

component_set!(A, B, C, D, E, F, G, H);

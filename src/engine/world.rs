//! World coordination and execution layer.
//!
//! This module defines the central orchestration type of the kernel,
//! responsible for:
//!
//! * owning the entity pool, component registry, and system registry,
//! * sequencing every structural mutation across those three subsystems,
//! * building system signatures from component type sets,
//! * driving the per-tick system run loop.
//!
//! ## Mutation ordering
//!
//! Every mutating operation touches the subsystems in one fixed order:
//! component stores first, the entity signature table second, the system
//! dispatcher last. Callers therefore never observe a signature that
//! disagrees with actual component membership, nor a match set that
//! disagrees with the current signature. That holds for callers running
//! *inside* a system too, since systems receive `&mut World` and see every
//! mutation synchronously.
//!
//! ## Tick execution
//!
//! `tick` fixes the system order up front, then for each system moves its
//! boxed instance out of the registry, snapshots its match set, and runs
//! it against `&mut World`. Moving the instance out is what makes the
//! `&mut` handoff legal, and doubles as the reentrancy guard: a nested
//! `tick` issued from inside a system finds the running system's slot
//! empty and skips it.

use crate::engine::component::{ComponentRegistry, ComponentSet};
use crate::engine::entity::EntityPool;
use crate::engine::error::{EcsError, EcsResult};
use crate::engine::systems::{System, SystemRegistry};
use crate::engine::types::{ComponentSlot, Entity, Signature};

/// Owns all kernel state and exposes the complete mutation surface.
///
/// A `World` is plain owned data: dropping it drops every entity,
/// component value, and system. Independent worlds share nothing, not
/// even component slot assignments.
pub struct World {
    entities: EntityPool,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl World {
    /// Creates an empty world with all capacities pre-allocated.
    pub fn new() -> Self {
        Self {
            entities: EntityPool::new(),
            components: ComponentRegistry::new(),
            systems: SystemRegistry::new(),
        }
    }

    // ── entities ────────────────────────────────────────────────────────

    /// Claims a fresh entity with an empty signature.
    ///
    /// The dispatcher is notified immediately, so systems whose required
    /// signature is empty match the new entity before this call returns.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let entity = self.entities.create()?;
        self.systems.signature_changed(entity, Signature::default());
        Ok(entity)
    }

    /// Destroys a live entity: drops its component values, releases the
    /// handle for recycling, and erases it from every match set.
    pub fn destroy_entity(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.components.entity_destroyed(entity);
        self.entities.destroy(entity)?;
        self.systems.entity_destroyed(entity);
        Ok(())
    }

    /// Number of currently live entities.
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.entities.living_count()
    }

    /// Returns `true` if `entity` is live. Total over all handle values.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Returns the current signature of a live entity.
    pub fn entity_signature(&self, entity: Entity) -> EcsResult<Signature> {
        self.entities.signature(entity)
    }

    // ── components ──────────────────────────────────────────────────────

    /// Registers component type `T` and returns its assigned slot.
    pub fn register_component<T: 'static>(&mut self) -> EcsResult<ComponentSlot> {
        self.components.register::<T>()
    }

    /// Returns the slot assigned to `T`.
    pub fn component_slot<T: 'static>(&self) -> EcsResult<ComponentSlot> {
        self.components.slot_of::<T>()
    }

    /// Attaches `value` to `entity` and updates its signature and every
    /// match set before returning. No partial effects on error.
    pub fn add_component<T: 'static>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        let slot = self.components.slot_of::<T>()?;
        self.components.insert(entity, value)?;
        let mut signature = self.entities.signature(entity)?;
        signature.set(slot);
        self.entities.set_signature(entity, signature)?;
        self.systems.signature_changed(entity, signature);
        Ok(())
    }

    /// Detaches `entity`'s `T` value, returning it, with the same
    /// signature and match-set maintenance as [`World::add_component`].
    pub fn remove_component<T: 'static>(&mut self, entity: Entity) -> EcsResult<T> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        let slot = self.components.slot_of::<T>()?;
        let value = self.components.remove::<T>(entity)?;
        let mut signature = self.entities.signature(entity)?;
        signature.clear(slot);
        self.entities.set_signature(entity, signature)?;
        self.systems.signature_changed(entity, signature);
        Ok(value)
    }

    /// Returns a shared reference to `entity`'s `T` value.
    pub fn get_component<T: 'static>(&self, entity: Entity) -> EcsResult<&T> {
        self.components.get::<T>(entity)
    }

    /// Returns a mutable reference to `entity`'s `T` value.
    pub fn get_component_mut<T: 'static>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components.get_mut::<T>(entity)
    }

    /// Returns `true` if `entity` currently owns a `T` value. A destroyed
    /// entity reports `false` rather than an error, so destruction
    /// cascades are directly observable.
    pub fn has_component<T: 'static>(&self, entity: Entity) -> EcsResult<bool> {
        self.components.has::<T>(entity)
    }

    /// Iterates `(owner, value)` over every `T` in packed storage order.
    pub fn components<T: 'static>(&self) -> EcsResult<impl Iterator<Item = (Entity, &T)>> {
        Ok(self.components.store::<T>()?.iter())
    }

    /// Iterates `(owner, value)` mutably over every `T` in packed storage
    /// order.
    pub fn components_mut<T: 'static>(
        &mut self,
    ) -> EcsResult<impl Iterator<Item = (Entity, &mut T)>> {
        Ok(self.components.store_mut::<T>()?.iter_mut())
    }

    // ── systems ─────────────────────────────────────────────────────────

    /// Registers `system` with an empty required signature and an empty
    /// match set.
    ///
    /// Entities created afterwards match immediately (an empty signature
    /// requires nothing); entities already alive join the match set when
    /// the system's signature is set, since
    /// [`World::set_system_signature`] rescans every live entity.
    pub fn register_system<S: System>(&mut self, system: S) -> EcsResult<()> {
        self.systems.register(system)
    }

    /// Removes system `S` entirely: instance, signature, and match set.
    pub fn unregister_system<S: System>(&mut self) -> EcsResult<()> {
        self.systems.unregister::<S>()
    }

    /// Overwrites `S`'s required signature and rescans every live entity,
    /// so the match set is exact for entities created before this call.
    pub fn set_system_signature<S: System>(&mut self, required: Signature) -> EcsResult<()> {
        let live: Vec<(Entity, Signature)> = self.entities.live_signatures().collect();
        self.systems.set_required::<S>(required, &live)
    }

    /// Declares that `S` requires every component type in the tuple `C`,
    /// e.g. `world.require_components::<Motion, (Position, Velocity)>()`.
    pub fn require_components<S: System, C: ComponentSet>(&mut self) -> EcsResult<()> {
        let required = C::signature(&self.components)?;
        self.set_system_signature::<S>(required)
    }

    /// Builds the signature for a tuple of registered component types.
    pub fn signature_of<C: ComponentSet>(&self) -> EcsResult<Signature> {
        C::signature(&self.components)
    }

    /// Snapshot of `S`'s current match set in ascending entity order.
    pub fn system_matches<S: System>(&self) -> EcsResult<Vec<Entity>> {
        self.systems.matches_of::<S>()
    }

    /// Runs every registered system once, in registration order, each over
    /// a snapshot of its match set taken as its run starts.
    ///
    /// Mutations a system makes are visible to all later systems in the
    /// same tick. A system registered during a tick first runs on the next
    /// tick; a system unregistered during a tick is skipped if it has not
    /// run yet. A snapshot may name entities destroyed earlier in the same
    /// run; see [`System`] for the guard the system must apply.
    pub fn tick(&mut self, delta: f32) {
        for type_id in self.systems.run_order() {
            let Some((mut instance, snapshot)) = self.systems.begin_run(type_id) else {
                continue;
            };
            instance.run(self, &snapshot, delta);
            self.systems.finish_run(type_id, instance);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

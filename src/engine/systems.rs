//! System Registration and Interest Dispatch
//!
//! This module defines the *system execution model* used by the kernel.
//!
//! A **system** is a unit of logic that runs once per tick over the set of
//! entities whose signatures satisfy the system's required signature.
//! Systems:
//! - declare their interest as a [`Signature`] of required component types,
//! - receive full `&mut World` access while running,
//! - are ticked strictly in registration order.
//!
//! ## Membership Model
//!
//! The registry keeps, per system, a sorted match set that is updated
//! eagerly: every entity signature change and every destruction recomputes
//! membership on the spot via `(signature & required) == required`. There
//! is no polling and no deferral, so a match set is exact the moment any
//! structural mutation returns.
//!
//! ## Execution Model
//!
//! The per-tick run is driven by the [`World`](crate::engine::world::World)
//! because a running system receives the world mutably. The registry
//! supports that protocol with three operations:
//!
//! - [`SystemRegistry::run_order`] — the registration-order list of system
//!   identities at the start of a tick,
//! - [`SystemRegistry::begin_run`] — moves a system instance out of its
//!   record and snapshots its match set,
//! - [`SystemRegistry::finish_run`] — moves the instance back.
//!
//! While an instance is out, its record stays in place (signature and match
//! set keep updating), but `begin_run` for the same system yields nothing.
//! A reentrant tick therefore skips the system that is already running. If
//! a system is unregistered while it runs (even by itself), there is no
//! record to put the instance back into and `finish_run` drops it.

use std::any::{type_name, TypeId};
use std::collections::BTreeSet;

use crate::engine::error::{EcsError, EcsResult};
use crate::engine::types::{Entity, Signature};
use crate::engine::world::World;

/// A unit of logic executed once per tick over matching entities.
///
/// `entities` is a snapshot of the system's match set taken when the run
/// started, in ascending entity order. The system may mutate the world
/// freely, including destroying snapshot members, without invalidating its
/// own iteration. In exchange, the snapshot can name entities destroyed
/// earlier in the same run (by this system or via cascading effects), so a
/// destroying system must guard the remainder of its loop with
/// [`World::is_alive`](crate::engine::world::World::is_alive) or
/// [`World::has_component`](crate::engine::world::World::has_component).
pub trait System: 'static {
    /// Executes one tick of this system's logic.
    fn run(&mut self, world: &mut World, entities: &[Entity], delta: f32);
}

/// Per-system bookkeeping: identity, interest, membership, and the boxed
/// instance (absent while the system is running).
struct SystemRecord {
    type_id: TypeId,
    type_name: &'static str,
    required: Signature,
    matches: BTreeSet<Entity>,
    instance: Option<Box<dyn System>>,
}

impl SystemRecord {
    fn recompute(&mut self, entity: Entity, signature: Signature) {
        if signature.contains_all(&self.required) {
            self.matches.insert(entity);
        } else {
            self.matches.remove(&entity);
        }
    }
}

/// Owns every registered system and keeps each system's match set exact
/// under signature changes and destructions.
pub struct SystemRegistry {
    records: Vec<SystemRecord>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Registers `system` with an empty required signature and an empty
    /// match set. Registration order is remembered and is the tick order.
    pub fn register<S: System>(&mut self, system: S) -> EcsResult<()> {
        if self.position_of(TypeId::of::<S>()).is_some() {
            return Err(EcsError::AlreadyRegistered {
                type_name: type_name::<S>(),
            });
        }
        self.records.push(SystemRecord {
            type_id: TypeId::of::<S>(),
            type_name: type_name::<S>(),
            required: Signature::default(),
            matches: BTreeSet::new(),
            instance: Some(Box::new(system)),
        });
        log::debug!("registered system {}", type_name::<S>());
        Ok(())
    }

    /// Removes `S`'s record: instance, required signature, and match set.
    ///
    /// Legal while `S` is running; the in-flight instance is dropped when
    /// its run completes.
    pub fn unregister<S: System>(&mut self) -> EcsResult<()> {
        let position = self.position_of(TypeId::of::<S>()).ok_or(EcsError::NotRegistered {
            type_name: type_name::<S>(),
        })?;
        self.records.remove(position);
        log::debug!("unregistered system {}", type_name::<S>());
        Ok(())
    }

    /// Overwrites `S`'s required signature and rebuilds its match set from
    /// the supplied `(entity, signature)` pairs of currently live entities.
    pub fn set_required<S: System>(
        &mut self,
        required: Signature,
        live: &[(Entity, Signature)],
    ) -> EcsResult<()> {
        let record = self.record_mut_of(TypeId::of::<S>()).ok_or(EcsError::NotRegistered {
            type_name: type_name::<S>(),
        })?;
        record.required = required;
        record.matches.clear();
        for &(entity, signature) in live {
            record.recompute(entity, signature);
        }
        log::debug!(
            "system {} requires {:?} ({} match)",
            record.type_name,
            required.bits,
            record.matches.len()
        );
        Ok(())
    }

    /// Recomputes every system's membership for `entity` against its new
    /// signature.
    pub fn signature_changed(&mut self, entity: Entity, signature: Signature) {
        for record in &mut self.records {
            record.recompute(entity, signature);
        }
        log::trace!("recomputed matches for entity {}", entity);
    }

    /// Erases `entity` from every system's match set.
    pub fn entity_destroyed(&mut self, entity: Entity) {
        for record in &mut self.records {
            record.matches.remove(&entity);
        }
    }

    /// Snapshot of `S`'s current match set in ascending entity order.
    pub fn matches_of<S: System>(&self) -> EcsResult<Vec<Entity>> {
        let record = self.record_of(TypeId::of::<S>()).ok_or(EcsError::NotRegistered {
            type_name: type_name::<S>(),
        })?;
        Ok(record.matches.iter().copied().collect())
    }

    /// Number of registered systems.
    #[inline]
    pub fn registered_count(&self) -> usize {
        self.records.len()
    }

    /// Identities of all registered systems in registration order.
    ///
    /// Taken once at the start of a tick so that systems registered during
    /// the tick wait for the next one and unregistered systems are simply
    /// skipped when their identity comes up.
    pub fn run_order(&self) -> Vec<TypeId> {
        self.records.iter().map(|record| record.type_id).collect()
    }

    /// Moves the instance of `type_id` out of its record and snapshots its
    /// match set.
    ///
    /// Yields `None` if the system was unregistered or is already running
    /// (the reentrancy guard: its instance slot is empty).
    pub fn begin_run(&mut self, type_id: TypeId) -> Option<(Box<dyn System>, Vec<Entity>)> {
        let record = self.record_mut_of(type_id)?;
        let instance = record.instance.take()?;
        let snapshot: Vec<Entity> = record.matches.iter().copied().collect();
        log::trace!("running system {} over {} entities", record.type_name, snapshot.len());
        Some((instance, snapshot))
    }

    /// Moves a running instance back into its record. If the record was
    /// removed while the system ran, the instance is dropped here.
    pub fn finish_run(&mut self, type_id: TypeId, instance: Box<dyn System>) {
        if let Some(record) = self.record_mut_of(type_id) {
            debug_assert!(record.instance.is_none(), "finish_run on a system that was never taken");
            record.instance = Some(instance);
        }
    }

    fn position_of(&self, type_id: TypeId) -> Option<usize> {
        self.records.iter().position(|record| record.type_id == type_id)
    }

    fn record_of(&self, type_id: TypeId) -> Option<&SystemRecord> {
        self.records.iter().find(|record| record.type_id == type_id)
    }

    fn record_mut_of(&mut self, type_id: TypeId) -> Option<&mut SystemRecord> {
        self.records.iter_mut().find(|record| record.type_id == type_id)
    }
}

impl Default for SystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

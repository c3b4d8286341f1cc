//! Fixed-capacity entity allocator and per-entity signature table.

use std::collections::VecDeque;

use crate::engine::error::{EcsError, EcsResult};
use crate::engine::types::{Entity, Signature, MAX_ENTITIES};

/// Allocates entity handles from a fixed pool and tracks, per live entity,
/// a liveness flag and a component ownership [`Signature`].
///
/// Destroyed handles are recycled oldest-first, so a freed index is not
/// reissued until every other free index has been handed out once.
pub struct EntityPool {
    free: VecDeque<Entity>,
    signatures: Vec<Signature>,
    alive: Vec<bool>,
    living: usize,
}

impl EntityPool {
    /// Creates a pool with every index in `0..MAX_ENTITIES` free.
    pub fn new() -> Self {
        let mut free = VecDeque::with_capacity(MAX_ENTITIES);
        free.extend(0..MAX_ENTITIES as Entity);
        Self {
            free,
            signatures: vec![Signature::default(); MAX_ENTITIES],
            alive: vec![false; MAX_ENTITIES],
            living: 0,
        }
    }

    /// Claims the oldest free handle. Its signature starts empty.
    pub fn create(&mut self) -> EcsResult<Entity> {
        let entity = self.free.pop_front().ok_or(EcsError::CapacityExceeded {
            resource: "entities",
            capacity: MAX_ENTITIES,
        })?;
        let index = entity as usize;
        debug_assert!(!self.alive[index], "free list handed out a live entity");
        debug_assert!(
            self.signatures[index].is_empty(),
            "recycled entity kept a stale signature"
        );
        self.alive[index] = true;
        self.living += 1;
        log::debug!("created entity {} ({} live)", entity, self.living);
        Ok(entity)
    }

    /// Releases a live handle back to the pool and clears its signature.
    pub fn destroy(&mut self, entity: Entity) -> EcsResult<()> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        let index = entity as usize;
        self.signatures[index] = Signature::default();
        self.alive[index] = false;
        self.free.push_back(entity);
        self.living -= 1;
        log::debug!("destroyed entity {} ({} live)", entity, self.living);
        Ok(())
    }

    /// Returns the signature of a live entity.
    pub fn signature(&self, entity: Entity) -> EcsResult<Signature> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        Ok(self.signatures[entity as usize])
    }

    /// Replaces the signature of a live entity.
    pub fn set_signature(&mut self, entity: Entity, signature: Signature) -> EcsResult<()> {
        if !self.is_alive(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.signatures[entity as usize] = signature;
        log::trace!("entity {} signature -> {:?}", entity, signature.bits);
        Ok(())
    }

    /// Number of currently live entities.
    #[inline]
    pub fn living_count(&self) -> usize {
        self.living
    }

    /// Returns `true` if `entity` names a live slot. Out-of-range handles
    /// (including [`NULL_ENTITY`](crate::engine::types::NULL_ENTITY)) are dead.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity as usize).copied().unwrap_or(false)
    }

    /// Iterates live handles in ascending order.
    pub fn live(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(index, &alive)| alive.then_some(index as Entity))
    }

    /// Iterates `(handle, signature)` pairs for every live entity, ascending.
    pub fn live_signatures(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.live()
            .map(|entity| (entity, self.signatures[entity as usize]))
    }
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

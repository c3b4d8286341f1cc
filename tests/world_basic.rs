use std::cell::RefCell;
use std::rc::Rc;

use sigil::{EcsError, Entity, World, MAX_ENTITIES};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[test]
fn component_round_trip() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();

    let entity = world.create_entity().unwrap();
    world.add_component(entity, Position { x: 1.0, y: 2.0 }).unwrap();

    assert!(world.has_component::<Position>(entity).unwrap());
    assert_eq!(
        world.get_component::<Position>(entity).unwrap(),
        &Position { x: 1.0, y: 2.0 }
    );

    world.get_component_mut::<Position>(entity).unwrap().x = 5.0;
    assert_eq!(world.get_component::<Position>(entity).unwrap().x, 5.0);

    let removed = world.remove_component::<Position>(entity).unwrap();
    assert_eq!(removed.x, 5.0);
    assert!(!world.has_component::<Position>(entity).unwrap());
}

#[test]
fn add_and_remove_propagate_to_the_signature() {
    let mut world = World::new();
    let position_slot = world.register_component::<Position>().unwrap();
    let velocity_slot = world.register_component::<Velocity>().unwrap();

    let entity = world.create_entity().unwrap();
    assert!(world.entity_signature(entity).unwrap().is_empty());

    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add_component(entity, Velocity { dx: 1.0, dy: 0.0 }).unwrap();

    let signature = world.entity_signature(entity).unwrap();
    assert!(signature.has(position_slot));
    assert!(signature.has(velocity_slot));

    world.remove_component::<Position>(entity).unwrap();
    let signature = world.entity_signature(entity).unwrap();
    assert!(!signature.has(position_slot));
    assert!(signature.has(velocity_slot));
}

#[test]
fn error_paths_surface_structured_errors() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    let entity = world.create_entity().unwrap();

    // Unregistered type.
    assert!(matches!(
        world.add_component(entity, Velocity { dx: 0.0, dy: 0.0 }),
        Err(EcsError::NotRegistered { .. })
    ));

    // Duplicate attach.
    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
    assert!(matches!(
        world.add_component(entity, Position { x: 1.0, y: 1.0 }),
        Err(EcsError::DuplicateComponent { .. })
    ));

    // Missing component.
    let other = world.create_entity().unwrap();
    assert!(matches!(
        world.get_component::<Position>(other),
        Err(EcsError::MissingComponent { .. })
    ));

    // Dead entity.
    world.destroy_entity(other).unwrap();
    assert_eq!(
        world.add_component(other, Position { x: 0.0, y: 0.0 }),
        Err(EcsError::InvalidEntity { entity: other })
    );
    assert_eq!(
        world.destroy_entity(other),
        Err(EcsError::InvalidEntity { entity: other })
    );
}

#[test]
fn destroy_cascades_to_stores_and_match_sets() {
    struct Tracker;
    impl sigil::System for Tracker {
        fn run(&mut self, _world: &mut World, _entities: &[Entity], _delta: f32) {}
    }

    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();
    world.register_system(Tracker).unwrap();
    world.require_components::<Tracker, (Position,)>().unwrap();

    let entity = world.create_entity().unwrap();
    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add_component(entity, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
    assert_eq!(world.system_matches::<Tracker>().unwrap(), vec![entity]);

    world.destroy_entity(entity).unwrap();

    assert!(!world.is_alive(entity));
    assert!(!world.has_component::<Position>(entity).unwrap());
    assert!(!world.has_component::<Velocity>(entity).unwrap());
    assert!(world.system_matches::<Tracker>().unwrap().is_empty());
    assert_eq!(world.entity_count(), 0);
    assert_eq!(world.components::<Position>().unwrap().count(), 0);
}

#[test]
fn entity_capacity_is_enforced_at_the_facade() {
    let mut world = World::new();
    for _ in 0..MAX_ENTITIES {
        world.create_entity().unwrap();
    }
    assert_eq!(
        world.create_entity(),
        Err(EcsError::CapacityExceeded {
            resource: "entities",
            capacity: MAX_ENTITIES,
        })
    );

    // Destroying one frees exactly one slot.
    world.destroy_entity(0).unwrap();
    assert_eq!(world.create_entity().unwrap(), 0);
}

#[test]
fn recycled_handles_come_back_clean() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();

    for _ in 0..MAX_ENTITIES {
        world.create_entity().unwrap();
    }
    let veteran = 7;
    world.add_component(veteran, Position { x: 3.0, y: 4.0 }).unwrap();

    world.destroy_entity(veteran).unwrap();
    let recycled = world.create_entity().unwrap();
    assert_eq!(recycled, veteran, "the only free slot is the one just vacated");

    assert!(world.entity_signature(recycled).unwrap().is_empty());
    assert!(!world.has_component::<Position>(recycled).unwrap());
    assert!(matches!(
        world.get_component::<Position>(recycled),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[test]
fn signature_helpers_agree_with_assigned_slots() {
    let mut world = World::new();
    let position_slot = world.register_component::<Position>().unwrap();
    let velocity_slot = world.register_component::<Velocity>().unwrap();

    assert_eq!(world.component_slot::<Position>().unwrap(), position_slot);
    assert_eq!(world.component_slot::<Velocity>().unwrap(), velocity_slot);

    let folded = world.signature_of::<(Position, Velocity)>().unwrap();
    assert!(folded.has(position_slot));
    assert!(folded.has(velocity_slot));

    // An entity holding both components carries exactly that signature.
    let entity = world.create_entity().unwrap();
    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();
    world.add_component(entity, Velocity { dx: 0.0, dy: 0.0 }).unwrap();
    assert_eq!(world.entity_signature(entity).unwrap(), folded);
}

#[test]
fn packed_iteration_reaches_every_owner() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();

    let mut owners = Vec::new();
    for i in 0..32 {
        let entity = world.create_entity().unwrap();
        if i % 2 == 0 {
            world.add_component(entity, Position { x: i as f32, y: 0.0 }).unwrap();
            owners.push(entity);
        }
    }

    let mut seen: Vec<Entity> = world
        .components::<Position>()
        .unwrap()
        .map(|(entity, _)| entity)
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, owners);

    for (_, position) in world.components_mut::<Position>().unwrap() {
        position.y = 1.0;
    }
    assert!(world
        .components::<Position>()
        .unwrap()
        .all(|(_, position)| position.y == 1.0));
}

// ─── system dispatch through the facade ──────────────────────────────────

/// Adds `delta` to every matched position's `x`.
struct Integrate;

impl sigil::System for Integrate {
    fn run(&mut self, world: &mut World, entities: &[Entity], delta: f32) {
        for &entity in entities {
            world.get_component_mut::<Position>(entity).unwrap().x += delta;
        }
    }
}

#[test]
fn end_to_end_single_system_tick() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();

    let entity = world.create_entity().unwrap();
    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();

    world.register_system(Integrate).unwrap();
    world.require_components::<Integrate, (Position,)>().unwrap();
    assert_eq!(world.system_matches::<Integrate>().unwrap(), vec![entity]);

    world.tick(0.25);

    assert_eq!(world.get_component::<Position>(entity).unwrap().x, 0.25);
    assert_eq!(
        world.system_matches::<Integrate>().unwrap(),
        vec![entity],
        "membership must survive the tick"
    );
}

#[test]
fn signature_setting_rescans_preexisting_entities() {
    let mut world = World::new();
    world.register_component::<Position>().unwrap();

    // Entities gain components before the system exists at all.
    let early = world.create_entity().unwrap();
    world.add_component(early, Position { x: 1.0, y: 0.0 }).unwrap();
    let _bare = world.create_entity().unwrap();

    world.register_system(Integrate).unwrap();
    assert!(world.system_matches::<Integrate>().unwrap().is_empty());

    world.require_components::<Integrate, (Position,)>().unwrap();
    assert_eq!(world.system_matches::<Integrate>().unwrap(), vec![early]);

    world.tick(1.0);
    assert_eq!(world.get_component::<Position>(early).unwrap().x, 2.0);
}

#[test]
fn empty_signature_matches_entities_created_afterwards() {
    struct Census {
        sizes: Rc<RefCell<Vec<usize>>>,
    }
    impl sigil::System for Census {
        fn run(&mut self, _world: &mut World, entities: &[Entity], _delta: f32) {
            self.sizes.borrow_mut().push(entities.len());
        }
    }

    let sizes = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_system(Census { sizes: Rc::clone(&sizes) }).unwrap();

    world.create_entity().unwrap();
    world.create_entity().unwrap();
    assert_eq!(world.system_matches::<Census>().unwrap().len(), 2);

    world.tick(0.0);
    assert_eq!(sizes.borrow().as_slice(), &[2]);
}

#[test]
fn matches_are_ascending_even_after_recycling() {
    struct Tracker;
    impl sigil::System for Tracker {
        fn run(&mut self, _world: &mut World, _entities: &[Entity], _delta: f32) {}
    }

    let mut world = World::new();
    world.register_system(Tracker).unwrap();

    let handles: Vec<Entity> = (0..5).map(|_| world.create_entity().unwrap()).collect();
    world.destroy_entity(handles[2]).unwrap();

    let matches = world.system_matches::<Tracker>().unwrap();
    assert_eq!(matches, vec![handles[0], handles[1], handles[3], handles[4]]);
    let mut sorted = matches.clone();
    sorted.sort_unstable();
    assert_eq!(matches, sorted);
}

#[test]
fn mutations_are_visible_to_later_systems_in_the_same_tick() {
    /// Gives every matched entity a velocity.
    struct Equip;
    impl sigil::System for Equip {
        fn run(&mut self, world: &mut World, entities: &[Entity], _delta: f32) {
            for &entity in entities {
                if !world.has_component::<Velocity>(entity).unwrap() {
                    world.add_component(entity, Velocity { dx: 1.0, dy: 0.0 }).unwrap();
                }
            }
        }
    }
    /// Counts how many entities it saw, per tick.
    struct Count {
        seen: Rc<RefCell<Vec<usize>>>,
    }
    impl sigil::System for Count {
        fn run(&mut self, _world: &mut World, entities: &[Entity], _delta: f32) {
            self.seen.borrow_mut().push(entities.len());
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::new();
    world.register_component::<Position>().unwrap();
    world.register_component::<Velocity>().unwrap();

    world.register_system(Equip).unwrap();
    world.require_components::<Equip, (Position,)>().unwrap();
    world.register_system(Count { seen: Rc::clone(&seen) }).unwrap();
    world.require_components::<Count, (Position, Velocity)>().unwrap();

    let entity = world.create_entity().unwrap();
    world.add_component(entity, Position { x: 0.0, y: 0.0 }).unwrap();

    // Equip runs first and adds Velocity; Count's snapshot is taken at its
    // own start, so it already sees the equipped entity.
    world.tick(1.0);
    assert_eq!(seen.borrow().as_slice(), &[1]);

    let equipped = world.get_component::<Velocity>(entity).unwrap();
    assert_eq!((equipped.dx, equipped.dy), (1.0, 0.0));
}

#[test]
fn systems_unregistered_mid_tick_are_skipped() {
    struct First;
    impl sigil::System for First {
        fn run(&mut self, world: &mut World, _entities: &[Entity], _delta: f32) {
            world.unregister_system::<Second>().unwrap();
        }
    }
    struct Second {
        ran: Rc<RefCell<u32>>,
    }
    impl sigil::System for Second {
        fn run(&mut self, _world: &mut World, _entities: &[Entity], _delta: f32) {
            *self.ran.borrow_mut() += 1;
        }
    }

    let ran = Rc::new(RefCell::new(0));
    let mut world = World::new();
    world.register_system(First).unwrap();
    world.register_system(Second { ran: Rc::clone(&ran) }).unwrap();

    world.tick(1.0);
    assert_eq!(*ran.borrow(), 0, "a system removed before its turn must not run");
    assert!(matches!(
        world.system_matches::<Second>(),
        Err(EcsError::NotRegistered { .. })
    ));
}

#[test]
fn systems_registered_mid_tick_first_run_next_tick() {
    struct Spawner {
        counter: Rc<RefCell<u32>>,
        installed: bool,
    }
    impl sigil::System for Spawner {
        fn run(&mut self, world: &mut World, _entities: &[Entity], _delta: f32) {
            if !self.installed {
                world
                    .register_system(Late { runs: Rc::clone(&self.counter) })
                    .unwrap();
                self.installed = true;
            }
        }
    }
    struct Late {
        runs: Rc<RefCell<u32>>,
    }
    impl sigil::System for Late {
        fn run(&mut self, _world: &mut World, _entities: &[Entity], _delta: f32) {
            *self.runs.borrow_mut() += 1;
        }
    }

    let counter = Rc::new(RefCell::new(0));
    let mut world = World::new();
    world
        .register_system(Spawner { counter: Rc::clone(&counter), installed: false })
        .unwrap();

    world.tick(1.0);
    assert_eq!(*counter.borrow(), 0, "a system registered mid-tick must wait a tick");

    world.tick(1.0);
    assert_eq!(*counter.borrow(), 1);
}

#[test]
fn reentrant_tick_skips_the_running_system() {
    struct Recurse {
        depth: u32,
    }
    impl sigil::System for Recurse {
        fn run(&mut self, world: &mut World, _entities: &[Entity], _delta: f32) {
            self.depth += 1;
            assert!(self.depth == 1, "reentrant tick must not re-enter the running system");
            world.tick(0.5);
            self.depth -= 1;
        }
    }
    struct Other {
        runs: Rc<RefCell<u32>>,
    }
    impl sigil::System for Other {
        fn run(&mut self, _world: &mut World, _entities: &[Entity], _delta: f32) {
            *self.runs.borrow_mut() += 1;
        }
    }

    let runs = Rc::new(RefCell::new(0));
    let mut world = World::new();
    world.register_system(Recurse { depth: 0 }).unwrap();
    world.register_system(Other { runs: Rc::clone(&runs) }).unwrap();

    world.tick(1.0);

    // Other ran once in the nested tick and once in the outer tick.
    assert_eq!(*runs.borrow(), 2);
}

#![allow(dead_code)]

use sigil::{EcsResult, World};

pub const ENTITIES_SMALL: usize = 1_000;
pub const ENTITIES_FULL: usize = sigil::MAX_ENTITIES;

#[derive(Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Clone, Copy)]
pub struct Heat {
    pub value: f32,
}

pub fn registered_world() -> World {
    let mut world = World::new();
    world.register_component::<Position>().expect("register Position");
    world.register_component::<Velocity>().expect("register Velocity");
    world.register_component::<Heat>().expect("register Heat");
    world
}

/// Fills a fresh world with `count` movers; every second one also carries
/// heat, so two-component and three-component entities are mixed.
pub fn populated_world(count: usize) -> EcsResult<World> {
    let mut world = registered_world();
    for index in 0..count {
        let entity = world.create_entity()?;
        world.add_component(entity, Position { x: 0.0, y: 0.0 })?;
        world.add_component(entity, Velocity { dx: 1.0, dy: 0.5 })?;
        if index % 2 == 0 {
            world.add_component(entity, Heat { value: 100.0 })?;
        }
    }
    Ok(world)
}

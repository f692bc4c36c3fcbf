//! Building behavior
//!
//! Farms are the only structures that act on their own: each tick they
//! accumulate growth and drop a Food entity on their cell when ripe.
//! Growth pauses entirely in winter and during droughts.

use crate::core::types::EntityId;
use crate::entity::{Building, Entity, ResourceKind};
use crate::world::state::{Season, WorldState};

const GROWTH_RATE: u32 = 1;
const HARVEST_THRESHOLD: u32 = 10;
const RIVER_BONUS: u32 = 1;

pub fn step_farm(world: &mut WorldState, id: EntityId, farm: &mut Building) {
    if world.drought || world.season == Season::Winter {
        return;
    }
    let pos = match world.grid.position(id) {
        Some(p) => p,
        None => return,
    };

    let river_adjacent = world.grid.neighborhood(pos, 1).into_iter().any(|cell| {
        world.grid.contents(cell).iter().any(|other| {
            matches!(
                world.entities.get(*other),
                Some(Entity::Resource(ResourceKind::River))
            )
        })
    });

    farm.growth += GROWTH_RATE + if river_adjacent { RIVER_BONUS } else { 0 };
    if farm.growth >= HARVEST_THRESHOLD {
        farm.growth = 0;
        world.spawn(Entity::Resource(ResourceKind::Food), pos);
    }
}

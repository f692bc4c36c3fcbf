//! One-shot terrain generation
//!
//! Runs once at world creation, after the settlers are placed: the river
//! and the mountain clusters flow around cells already holding a Person
//! or House.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::Pos;
use crate::entity::{BuildingKind, Entity, ResourceKind};
use crate::world::state::WorldState;

const MOUNTAIN_CLUSTERS: u32 = 5;
const MOUNTAIN_SPREAD: i32 = 3;
const MOUNTAIN_DENSITY: f64 = 0.6;

fn is_settled(world: &WorldState, pos: Pos) -> bool {
    world.grid.contents(pos).iter().any(|id| match world.entities.get(*id) {
        Some(Entity::Person(_)) => true,
        Some(Entity::Building(b)) => b.kind == BuildingKind::House,
        _ => false,
    })
}

fn holds_river(world: &WorldState, pos: Pos) -> bool {
    world.grid.contents(pos).iter().any(|id| {
        matches!(
            world.entities.get(*id),
            Some(Entity::Resource(ResourceKind::River))
        )
    })
}

/// Carve a river from a random top-edge column down to the bottom edge.
/// The walk is biased downward but meanders sideways.
fn carve_river(world: &mut WorldState) {
    let mut pos = Pos::new(world.rng.gen_range(0..world.grid.width()), 0);
    while pos.y < world.grid.height() {
        if world.grid.in_bounds(pos) && !is_settled(world, pos) && !holds_river(world, pos) {
            world.spawn(Entity::Resource(ResourceKind::River), pos);
        }
        let step = *[(0, 1), (0, 1), (1, 0), (-1, 0)]
            .choose(&mut world.rng)
            .expect("step table is non-empty");
        pos = Pos::new(
            (pos.x + step.0).clamp(0, world.grid.width() - 1),
            pos.y + step.1,
        );
    }
}

fn raise_mountains(world: &mut WorldState) {
    for _ in 0..MOUNTAIN_CLUSTERS {
        let center = world.random_cell();
        for dy in -MOUNTAIN_SPREAD..=MOUNTAIN_SPREAD {
            for dx in -MOUNTAIN_SPREAD..=MOUNTAIN_SPREAD {
                let pos = Pos::new(center.x + dx, center.y + dy);
                if !world.grid.in_bounds(pos)
                    || is_settled(world, pos)
                    || holds_river(world, pos)
                {
                    continue;
                }
                if world.rng.gen_bool(MOUNTAIN_DENSITY) {
                    world.spawn(Entity::Resource(ResourceKind::Mountain), pos);
                }
            }
        }
    }
}

pub fn generate(world: &mut WorldState) {
    carve_river(world);
    raise_mountains(world);
}

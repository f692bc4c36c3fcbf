//! Predator behavior
//!
//! Predators hunt people, breed when glutted, and die of hunger or old
//! age. A person standing on a House is safe unless a pack of three or
//! more has gathered on the cell.

use rand::seq::SliceRandom;

use crate::core::types::{EntityId, Pos};
use crate::entity::{Entity, Predator};
use crate::spatial::pathfinding::IMPASSABLE;
use crate::world::events::{DeathCause, SimEvent};
use crate::world::state::WorldState;

const OLD_AGE: u32 = 60;
const EAT_ENERGY: i32 = 20;
const BREED_THRESHOLD: i32 = 80;
const BREED_COST: i32 = 30;
const CHILD_ENERGY: i32 = 30;
const HOUSE_SIEGE_STRENGTH: usize = 3;
const PREY_SENSE_RADIUS: i32 = 2;

fn try_eat(world: &mut WorldState, id: EntityId, predator: &mut Predator, pos: Pos) -> bool {
    let contents = world.grid.contents_sorted(pos);
    let sheltered = contents.iter().any(|other| {
        world
            .entities
            .get(*other)
            .map_or(false, |e| e.is_building(crate::entity::BuildingKind::House))
    });
    if sheltered {
        // Self is checked out of the arena, so count it explicitly
        let pack_strength = 1 + contents
            .iter()
            .filter(|other| **other != id)
            .filter(|other| {
                matches!(world.entities.get(**other), Some(Entity::Predator(p)) if p.pack == predator.pack)
            })
            .count();
        if pack_strength < HOUSE_SIEGE_STRENGTH {
            return false;
        }
    }
    let prey = contents
        .into_iter()
        .find(|other| matches!(world.entities.get(*other), Some(Entity::Person(_))));
    if let Some(prey) = prey {
        world.kill(prey);
        world.record(SimEvent::PersonDied {
            id: prey,
            cause: DeathCause::Slain,
        });
        predator.energy += EAT_ENERGY;
        true
    } else {
        false
    }
}

fn hunt_step(world: &mut WorldState, pos: Pos) -> Option<Pos> {
    let prey = world.people_near(pos, PREY_SENSE_RADIUS);
    let open: Vec<Pos> = world
        .grid
        .adjacent(pos)
        .into_iter()
        .filter(|p| world.movement_cost_beast(*p) < IMPASSABLE)
        .collect();
    if open.is_empty() {
        return None;
    }
    let nearest = prey
        .iter()
        .map(|(_, p)| *p)
        .min_by_key(|p| (p.chebyshev(pos), p.x, p.y));
    if let Some(nearest) = nearest {
        open.iter()
            .copied()
            .min_by_key(|step| (step.chebyshev(nearest), step.x, step.y))
    } else {
        open.choose(&mut world.rng).copied()
    }
}

/// Runs one tick for a checked-out predator; false means it died
pub fn step(world: &mut WorldState, id: EntityId, predator: &mut Predator) -> bool {
    predator.age += 1;
    predator.energy -= 1;
    if predator.energy <= 0 || predator.age >= OLD_AGE {
        return false;
    }
    let pos = match world.grid.position(id) {
        Some(p) => p,
        None => return false,
    };

    let ate = try_eat(world, id, predator, pos);

    if predator.energy >= BREED_THRESHOLD {
        predator.energy -= BREED_COST;
        let mut child = Predator::new(predator.pack);
        child.energy = CHILD_ENERGY;
        world.spawn(Entity::Predator(child), pos);
    }

    if !ate {
        if let Some(next) = hunt_step(world, pos) {
            world.grid.shift(id, next);
        }
    }
    true
}

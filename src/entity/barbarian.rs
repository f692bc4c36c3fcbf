//! Barbarian behavior
//!
//! Raiders wander, tear down whatever they stand on, and batter anyone
//! sharing their cell. They starve on their own timer, so a wave that
//! finds nothing to loot burns itself out.

use rand::seq::SliceRandom;

use crate::core::types::EntityId;
use crate::entity::{Barbarian, BuildingKind, Entity};
use crate::spatial::pathfinding::IMPASSABLE;
use crate::world::events::{DeathCause, SimEvent};
use crate::world::state::WorldState;

const PERSON_DAMAGE: i32 = 20;
const LOOT_ENERGY: i32 = 10;

fn is_lootable(kind: BuildingKind) -> bool {
    // Walls and roads are bare stone with nothing worth wrecking
    !matches!(kind, BuildingKind::Wall | BuildingKind::Road)
}

/// Runs one tick for a checked-out barbarian; false means it died
pub fn step(world: &mut WorldState, id: EntityId, barbarian: &mut Barbarian) -> bool {
    barbarian.energy -= 1;
    if barbarian.energy <= 0 {
        return false;
    }
    let pos = match world.grid.position(id) {
        Some(p) => p,
        None => return false,
    };

    let targets: Vec<EntityId> = world
        .grid
        .contents_sorted(pos)
        .into_iter()
        .filter(|other| *other != id)
        .filter(|other| match world.entities.get(*other) {
            Some(Entity::Person(_)) => true,
            Some(Entity::Building(b)) => is_lootable(b.kind),
            _ => false,
        })
        .collect();

    if let Some(target) = targets.choose(&mut world.rng).copied() {
        let slain = match world.entities.get_mut(target) {
            Some(Entity::Person(person)) => {
                person.energy -= PERSON_DAMAGE;
                barbarian.energy += LOOT_ENERGY;
                person.energy <= 0
            }
            Some(Entity::Building(_)) => {
                world.kill(target);
                return true;
            }
            _ => return true,
        };
        if slain {
            world.kill(target);
            world.record(SimEvent::PersonDied {
                id: target,
                cause: DeathCause::Slain,
            });
        }
        return true;
    }

    let open: Vec<_> = world
        .grid
        .adjacent(pos)
        .into_iter()
        .filter(|p| world.movement_cost_beast(*p) < IMPASSABLE)
        .collect();
    if let Some(next) = open.choose(&mut world.rng).copied() {
        world.grid.shift(id, next);
    }
    true
}

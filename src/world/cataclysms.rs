//! Global hazards and regrowth
//!
//! Runs at both ends of the tick: hazards (season, drought, plague, the
//! barbarian countdown) before the agents move, regrowth and the
//! extinction guards after.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::Pos;
use crate::entity::{Entity, Person, Predator, ResourceKind};
use crate::world::events::SimEvent;
use crate::world::state::{Season, WorldState};

pub const BARBARIAN_WAVE_INTERVAL: u32 = 200;
const DROUGHT_START_CHANCE: f64 = 0.005;
const DROUGHT_END_CHANCE: f64 = 0.05;
const PLAGUE_CHANCE: f64 = 0.005;
const PLAGUE_MIN_POPULATION: usize = 50;

const FOOD_RESPAWN: u32 = 10;
const TREE_RESPAWN: u32 = 5;
const STONE_RESPAWN: u32 = 5;
const IRON_RESPAWN_CHANCE: f64 = 0.3;

fn random_edge_cell(world: &mut WorldState) -> Pos {
    let (w, h) = (world.grid.width(), world.grid.height());
    match world.rng.gen_range(0..4) {
        0 => Pos::new(world.rng.gen_range(0..w), 0),
        1 => Pos::new(world.rng.gen_range(0..w), h - 1),
        2 => Pos::new(0, world.rng.gen_range(0..h)),
        _ => Pos::new(w - 1, world.rng.gen_range(0..h)),
    }
}

fn step_plague(world: &mut WorldState) {
    if world.population() <= PLAGUE_MIN_POPULATION || !world.rng.gen_bool(PLAGUE_CHANCE) {
        return;
    }
    let mut people: Vec<_> = world
        .entities
        .iter()
        .filter_map(|(id, e)| match e {
            Entity::Person(p) if !p.infected => Some(id),
            _ => None,
        })
        .collect();
    people.sort_unstable();
    if let Some(victim) = people.choose(&mut world.rng).copied() {
        if let Some(person) = world
            .entities
            .get_mut(victim)
            .and_then(Entity::as_person_mut)
        {
            person.infected = true;
        }
        world.record(SimEvent::PlagueOutbreak { id: victim });
    }
}

fn step_barbarian_wave(world: &mut WorldState) {
    world.barbarian_timer = world.barbarian_timer.saturating_sub(1);
    if world.barbarian_timer > 0 {
        return;
    }
    world.barbarian_timer = BARBARIAN_WAVE_INTERVAL;
    let count = world.rng.gen_range(2..=5);
    for _ in 0..count {
        let pos = random_edge_cell(world);
        world.spawn(Entity::Barbarian(crate::entity::Barbarian::new()), pos);
    }
    world.record(SimEvent::BarbarianWave { count });
}

/// Season, drought, plague and the raid countdown, before agents act
pub fn step_world_events(world: &mut WorldState) {
    world.season = Season::at(world.tick);

    if world.drought {
        if world.rng.gen_bool(DROUGHT_END_CHANCE) {
            world.drought = false;
            world.record(SimEvent::DroughtEnded);
        }
    } else if world.rng.gen_bool(DROUGHT_START_CHANCE) {
        world.drought = true;
        world.record(SimEvent::DroughtStarted);
    }

    step_plague(world);
    step_barbarian_wave(world);
}

/// Resource regrowth and the extinction guards, after agents act
pub fn step_respawn_and_migration(world: &mut WorldState) {
    for (kind, count) in [
        (ResourceKind::Food, FOOD_RESPAWN),
        (ResourceKind::Tree, TREE_RESPAWN),
        (ResourceKind::Stone, STONE_RESPAWN),
    ] {
        for _ in 0..count {
            if let Some(pos) = world.random_open_cell() {
                world.spawn(Entity::Resource(kind), pos);
            }
        }
    }
    if world.rng.gen_bool(IRON_RESPAWN_CHANCE) {
        if let Some(pos) = world.random_open_cell() {
            world.spawn(Entity::Resource(ResourceKind::IronOre), pos);
        }
    }

    let predators = world.count_kind(|e| matches!(e, Entity::Predator(_)));
    if predators == 0 && world.rng.gen_bool(0.1) {
        let pack = world.allocate_pack();
        if let Some(pos) = world.random_open_cell() {
            world.spawn(Entity::Predator(Predator::new(Some(pack))), pos);
        }
    }

    if world.population() <= 2 && world.rng.gen_bool(0.2) {
        let tribe_ids = world.tribes.ids();
        for _ in 0..2 {
            let tribe = tribe_ids.choose(&mut world.rng).copied();
            let person = Person::new(&mut world.rng, tribe);
            if let Some(pos) = world.random_open_cell() {
                world.spawn(Entity::Person(person), pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;

    fn empty_world(seed: u64) -> WorldState {
        WorldState::new(WorldConfig {
            initial_people: 0,
            initial_food: 0,
            initial_predators: 0,
            initial_trees: 0,
            initial_stone: 0,
            initial_iron: 0,
            num_tribes: 0,
            seed,
            ..WorldConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_respawn_replenishes_resources() {
        let mut world = empty_world(1);
        step_respawn_and_migration(&mut world);

        let food = world.count_kind(|e| e.is_resource(ResourceKind::Food));
        let trees = world.count_kind(|e| e.is_resource(ResourceKind::Tree));
        let stone = world.count_kind(|e| e.is_resource(ResourceKind::Stone));
        assert_eq!(food, FOOD_RESPAWN as usize);
        assert_eq!(trees, TREE_RESPAWN as usize);
        assert_eq!(stone, STONE_RESPAWN as usize);
    }

    #[test]
    fn test_barbarian_wave_fires_on_schedule() {
        let mut world = empty_world(2);
        world.barbarian_timer = 1;
        step_world_events(&mut world);

        let barbarians = world.count_kind(|e| matches!(e, Entity::Barbarian(_)));
        assert!((2..=5).contains(&barbarians), "wave spawns 2 to 5 raiders");
        assert_eq!(world.barbarian_timer, BARBARIAN_WAVE_INTERVAL);
    }

    #[test]
    fn test_predator_migration_rescues_extinction() {
        let mut world = empty_world(3);
        for _ in 0..200 {
            step_respawn_and_migration(&mut world);
            if world.count_kind(|e| matches!(e, Entity::Predator(_))) > 0 {
                return;
            }
        }
        panic!("a 10% per-tick migration must land within 200 ticks");
    }

    #[test]
    fn test_wave_interval_counts_down() {
        let mut world = empty_world(4);
        let before = world.barbarian_timer;
        step_world_events(&mut world);
        assert_eq!(world.barbarian_timer, before - 1);
    }
}

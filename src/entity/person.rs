//! Person lifecycle
//!
//! The per-tick order is fixed: scan, upkeep, infection, stockpile
//! withdrawal, death checks, one action, reproduction, one step of
//! movement. A person who dies mid-step is simply not restored to the
//! arena by the scheduler.

use rand::Rng;

use crate::core::types::{EntityId, Pos};
use crate::entity::{actions, BuildingKind, Entity, Person, Profession, TargetKind};
use crate::society::Tech;
use crate::spatial::pathfinding::{self, IMPASSABLE};
use crate::world::events::{DeathCause, SimEvent};
use crate::world::state::WorldState;

const SCAN_RADIUS: i32 = 5;
const SCAN_COOLDOWN: u8 = 10;
const BASE_MAX_AGE: u32 = 100;
const MEDICINE_MAX_AGE: u32 = 120;
const REPRODUCE_THRESHOLD: i32 = 40;
const REPRODUCE_COST: i32 = 25;
const CHILD_ENERGY: i32 = 25;
const THREAT_RADIUS: i32 = 2;

fn scan(world: &WorldState, person: &mut Person, pos: Pos) {
    if person.scan_cooldown > 0 {
        person.scan_cooldown -= 1;
        return;
    }
    person.scan_cooldown = SCAN_COOLDOWN;
    let mut cells = vec![pos];
    cells.extend(world.grid.neighborhood(pos, SCAN_RADIUS));
    for cell in cells {
        for id in world.grid.contents(cell) {
            if let Some(kind) = world.entities.get(*id).and_then(TargetKind::of) {
                person.remember(kind, cell);
            }
        }
    }
}

/// An infected person wasting away dies of the plague, not hunger
fn wasting_cause(person: &Person) -> DeathCause {
    if person.infected {
        DeathCause::Plague
    } else {
        DeathCause::Starvation
    }
}

fn has_medicine(world: &WorldState, person: &Person) -> bool {
    person
        .tribe
        .and_then(|t| world.tribes.get(t))
        .map_or(false, |t| t.has_tech(Tech::Medicine))
}

fn step_infection(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos) {
    person.energy -= 2;

    let neighbors: Vec<EntityId> = world
        .people_near(pos, 1)
        .into_iter()
        .map(|(other, _)| other)
        .filter(|other| *other != id)
        .collect();
    for other in neighbors {
        let spreads = world.rng.gen_bool(0.1);
        if let Some(Entity::Person(p)) = world.entities.get_mut(other) {
            if spreads && !p.infected {
                p.infected = true;
            }
        }
    }

    let mut recovery = 0.05;
    if has_medicine(world, person) {
        recovery += 0.1;
    }
    let on_hospital = world.grid.contents(pos).iter().any(|other| {
        world
            .entities
            .get(*other)
            .map_or(false, |e| e.is_building(BuildingKind::Hospital))
    });
    if on_hospital {
        recovery += 0.2;
    }
    if world.rng.gen_bool(recovery) {
        person.infected = false;
    }
}

/// Top up from the tribe's granary: survival rations first, then a
/// comfort draw when the tribe is flush
fn withdraw(world: &mut WorldState, person: &mut Person) {
    let tribe_id = match person.tribe {
        Some(t) => t,
        None => return,
    };
    let tribe = match world.tribes.get_mut(tribe_id) {
        Some(t) => t,
        None => return,
    };
    if person.energy < 20 {
        let need = (30 - person.energy).max(0) as u32;
        let draw = need.min(tribe.stockpile.food);
        tribe.stockpile.food -= draw;
        person.energy += draw as i32;
    } else if person.energy < 40 && tribe.stockpile.food > 50 {
        let need = (45 - person.energy) as u32;
        let draw = need.min(tribe.stockpile.food);
        tribe.stockpile.food -= draw;
        person.energy += draw as i32;
    }
}

fn maybe_reproduce(world: &mut WorldState, person: &mut Person, pos: Pos) {
    let mut threshold = REPRODUCE_THRESHOLD;
    if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get(t)) {
        if tribe.culture == crate::society::TribeTrait::Expansionist {
            threshold -= 5;
        }
        if tribe.stockpile.morale > 50 {
            threshold -= 5;
        }
    }
    if person.energy < threshold {
        return;
    }
    person.energy -= REPRODUCE_COST;
    let mut child = Person::new(&mut world.rng, person.tribe);
    child.energy = CHILD_ENERGY;
    world.spawn(Entity::Person(child), pos);
}

fn passable_neighbors(world: &WorldState, person: &Person, pos: Pos) -> Vec<(Pos, u32)> {
    world
        .grid
        .adjacent(pos)
        .into_iter()
        .map(|p| (p, world.movement_cost(p, person.tribe)))
        .filter(|(_, c)| *c < IMPASSABLE)
        .collect()
}

/// React to predators in sight: guards close in, the housed sit tight,
/// everyone else runs
fn react_to_threat(
    world: &mut WorldState,
    id: EntityId,
    person: &Person,
    pos: Pos,
    threats: &[(EntityId, Pos)],
) {
    let nearest = match threats
        .iter()
        .map(|(_, p)| *p)
        .min_by_key(|p| (p.chebyshev(pos), p.x, p.y))
    {
        Some(p) => p,
        None => return,
    };
    if person.profession == Profession::Guard {
        if pos.chebyshev(nearest) <= 1 {
            return;
        }
        let step = passable_neighbors(world, person, pos)
            .into_iter()
            .map(|(p, _)| p)
            .min_by_key(|p| (p.chebyshev(nearest), p.x, p.y));
        if let Some(step) = step {
            world.grid.shift(id, step);
        }
        return;
    }
    let on_house = world.grid.contents(pos).iter().any(|other| {
        world
            .entities
            .get(*other)
            .map_or(false, |e| e.is_building(BuildingKind::House))
    });
    if on_house {
        return;
    }
    let step = passable_neighbors(world, person, pos)
        .into_iter()
        .map(|(p, _)| p)
        .max_by_key(|p| {
            let closest = threats
                .iter()
                .map(|(_, t)| p.chebyshev(*t))
                .min()
                .unwrap_or(i32::MAX);
            (closest, std::cmp::Reverse((p.x, p.y)))
        });
    if let Some(step) = step {
        world.grid.shift(id, step);
    }
}

/// What this person should be walking toward, if anything
fn pick_target(world: &WorldState, person: &Person) -> Option<TargetKind> {
    let tribe_id = match person.tribe {
        None => {
            return if person.energy < 20 {
                Some(TargetKind::Food)
            } else {
                None
            };
        }
        Some(t) => t,
    };
    let tribe = world.tribes.get(tribe_id)?;
    let stock = &tribe.stockpile;
    let pop = world.tribe_population(tribe_id);

    // Imminent famine outranks any trade
    if (stock.food as usize) < 5 * pop {
        return Some(TargetKind::Food);
    }
    let by_profession = match person.profession {
        Profession::Farmer => Some(TargetKind::Food),
        Profession::Miner => Some(if stock.iron < 5 {
            TargetKind::IronOre
        } else {
            TargetKind::Stone
        }),
        Profession::Blacksmith => Some(TargetKind::Smithy),
        Profession::Merchant => Some(TargetKind::Market),
        Profession::Scholar => Some(TargetKind::Library),
        Profession::Healer => Some(TargetKind::Hospital),
        Profession::Priest => Some(TargetKind::Temple),
        _ => None,
    };
    if by_profession.is_some() {
        return by_profession;
    }
    if (stock.food as usize) < 15 * pop {
        Some(TargetKind::Food)
    } else if stock.wood < 3 {
        Some(TargetKind::Tree)
    } else if stock.stone < 5 {
        Some(TargetKind::Stone)
    } else {
        None
    }
}

fn cell_has_kind(world: &WorldState, pos: Pos, kind: TargetKind) -> bool {
    world
        .grid
        .contents(pos)
        .iter()
        .any(|id| world.entities.get(*id).map_or(false, |e| kind.matches(e)))
}

fn explore(world: &mut WorldState, id: EntityId, person: &Person, pos: Pos) {
    let candidates = passable_neighbors(world, person, pos);
    if let Some(step) = pathfinding::explore_step(&candidates, &mut world.rng) {
        world.grid.shift(id, step);
    }
}

fn move_toward(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos, kind: TargetKind) {
    // Standing on the target already: stay put
    if cell_has_kind(world, pos, kind) {
        person.path.clear();
        return;
    }

    // A target in arm's reach needs no route
    let direct = world
        .grid
        .adjacent(pos)
        .into_iter()
        .filter(|p| cell_has_kind(world, *p, kind))
        .min_by_key(|p| (p.x, p.y));
    if let Some(step) = direct {
        person.path.clear();
        world.grid.shift(id, step);
        return;
    }

    // Standing on a remembered sighting the cell no longer delivers:
    // that is an arrival, and the only ground for eviction
    person.forget(kind, pos);

    // Walk toward the nearest remembered sighting. One route attempt
    // per tick; an unroutable note stays in memory for later.
    let target = person
        .memory
        .get(&kind)
        .and_then(|set| set.iter().copied().min_by_key(|p| (p.manhattan(pos), p.x, p.y)));
    let target = match target {
        Some(t) => t,
        None => {
            explore(world, id, person, pos);
            return;
        }
    };
    let tribe = person.tribe;
    let path = pathfinding::a_star(&world.grid, pos, target, |p| {
        world.movement_cost(p, tribe)
    });
    match path {
        Some(path) if !path.is_empty() => {
            world.grid.shift(id, path[0]);
            person.path = path[1..].to_vec();
            // Arrived somewhere the memory promised but the world
            // no longer delivers
            if person.path.is_empty() && !cell_has_kind(world, target, kind) {
                person.forget(kind, target);
            }
        }
        _ => explore(world, id, person, pos),
    }
}

fn movement(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos) {
    let threats = world.predators_near(pos, THREAT_RADIUS);
    if !threats.is_empty() {
        react_to_threat(world, id, person, pos, &threats);
        return;
    }
    match pick_target(world, person) {
        Some(kind) => move_toward(world, id, person, pos, kind),
        None => explore(world, id, person, pos),
    }
}

/// Runs one tick for a checked-out person; false means they died
pub fn step(world: &mut WorldState, id: EntityId, person: &mut Person) -> bool {
    let pos = match world.grid.position(id) {
        Some(p) => p,
        None => return false,
    };

    scan(world, person, pos);

    person.age += 1;
    person.energy -= 1;

    if person.infected {
        step_infection(world, id, person, pos);
    }

    withdraw(world, person);

    if person.energy <= 0 {
        world.record(SimEvent::PersonDied {
            id,
            cause: wasting_cause(person),
        });
        return false;
    }
    let max_age = if has_medicine(world, person) {
        MEDICINE_MAX_AGE
    } else {
        BASE_MAX_AGE
    };
    if person.age >= max_age {
        world.record(SimEvent::PersonDied {
            id,
            cause: DeathCause::OldAge,
        });
        return false;
    }

    actions::act(world, id, person, pos);
    if person.energy <= 0 {
        world.record(SimEvent::PersonDied {
            id,
            cause: wasting_cause(person),
        });
        return false;
    }

    maybe_reproduce(world, person, pos);
    movement(world, id, person, pos);
    true
}

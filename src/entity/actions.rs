//! Utility-driven action selection
//!
//! Each tick a person enumerates the legal actions in a fixed order,
//! scores them, and executes the strictly highest scorer (first seen
//! wins ties). Preconditions are re-checked against live state at
//! execution time, so an action invalidated by an earlier agent in the
//! same tick degrades to a no-op.

use rand::Rng;

use crate::core::types::{EntityId, Pos, TribeId};
use crate::entity::{construction, BuildingKind, Entity, Person, Profession, ResourceKind};
use crate::society::{Government, Religion, Tech, TribeTrait};
use crate::world::events::{DeathCause, SimEvent};
use crate::world::state::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GatherFood(EntityId),
    GatherWood(EntityId),
    GatherStone(EntityId),
    GatherIron(EntityId),
    WorkSmithy,
    WorkLibrary,
    WorkTemple,
    WorkHospital,
    AttackBarbarian(EntityId),
    AttackPredator(EntityId),
    AttackEnemy(EntityId),
    Build,
    VisitTavern,
    Trade(EntityId),
    FormTribe(EntityId),
}

fn standing_on(world: &WorldState, pos: Pos, kind: BuildingKind) -> bool {
    world
        .grid
        .contents(pos)
        .iter()
        .any(|id| world.entities.get(*id).map_or(false, |e| e.is_building(kind)))
}

/// Hostiles of a kind within a Chebyshev radius, nearest first, ids
/// breaking distance ties
fn hostiles_near<F>(world: &WorldState, center: Pos, radius: i32, pred: F) -> Vec<EntityId>
where
    F: Fn(&Entity) -> bool,
{
    let mut cells = vec![center];
    cells.extend(world.grid.neighborhood(center, radius));
    let mut found: Vec<(i32, EntityId)> = Vec::new();
    for cell in cells {
        for id in world.grid.contents_sorted(cell) {
            if world.entities.get(id).map_or(false, &pred) {
                found.push((center.chebyshev(cell), id));
            }
        }
    }
    found.sort_unstable();
    found.into_iter().map(|(_, id)| id).collect()
}

fn enemies_near(world: &WorldState, center: Pos, radius: i32, mine: TribeId) -> Vec<EntityId> {
    hostiles_near(world, center, radius, |e| {
        matches!(e, Entity::Person(p) if p.tribe.map_or(false, |t| world.tribes.at_war(mine, t)))
    })
}

pub fn enumerate(world: &WorldState, id: EntityId, person: &Person, pos: Pos) -> Vec<Action> {
    let mut actions = Vec::new();
    let in_tribe = person.tribe.is_some();

    for other in world.grid.contents_sorted(pos) {
        if other == id {
            continue;
        }
        match world.entities.get(other) {
            Some(Entity::Resource(ResourceKind::Food)) => actions.push(Action::GatherFood(other)),
            Some(Entity::Resource(ResourceKind::Tree)) if in_tribe => {
                actions.push(Action::GatherWood(other))
            }
            Some(Entity::Resource(ResourceKind::Stone)) if in_tribe => {
                actions.push(Action::GatherStone(other))
            }
            Some(Entity::Resource(ResourceKind::IronOre)) if in_tribe => {
                actions.push(Action::GatherIron(other))
            }
            _ => {}
        }
    }

    // Working a building takes the matching trade
    if in_tribe {
        if person.profession == Profession::Blacksmith && standing_on(world, pos, BuildingKind::Smithy)
        {
            actions.push(Action::WorkSmithy);
        }
        if person.profession == Profession::Scholar && standing_on(world, pos, BuildingKind::Library)
        {
            actions.push(Action::WorkLibrary);
        }
        if person.profession == Profession::Priest && standing_on(world, pos, BuildingKind::Temple) {
            actions.push(Action::WorkTemple);
        }
        if person.profession == Profession::Healer && standing_on(world, pos, BuildingKind::Hospital)
        {
            actions.push(Action::WorkHospital);
        }
    }

    if matches!(person.profession, Profession::Guard | Profession::Soldier) {
        for target in hostiles_near(world, pos, 1, |e| matches!(e, Entity::Barbarian(_))) {
            actions.push(Action::AttackBarbarian(target));
        }
    }
    if person.profession == Profession::Guard {
        for target in hostiles_near(world, pos, 1, |e| matches!(e, Entity::Predator(_))) {
            actions.push(Action::AttackPredator(target));
        }
    }
    if let Some(mine) = person.tribe {
        if matches!(
            person.profession,
            Profession::Guard | Profession::Soldier | Profession::Archer
        ) {
            let radius = person.profession.attack_radius();
            for target in enemies_near(world, pos, radius, mine) {
                actions.push(Action::AttackEnemy(target));
            }
        }
        if construction::plan(world, mine, pos).is_some() {
            actions.push(Action::Build);
        }
        if standing_on(world, pos, BuildingKind::Tavern) {
            actions.push(Action::VisitTavern);
        }
        for other in world.grid.contents_sorted(pos) {
            if other == id {
                continue;
            }
            if let Some(Entity::Person(p)) = world.entities.get(other) {
                if p.tribe.is_some() && p.tribe != Some(mine) {
                    actions.push(Action::Trade(other));
                }
            }
        }
    } else {
        for other in world.grid.contents_sorted(pos) {
            if other == id {
                continue;
            }
            if let Some(Entity::Person(p)) = world.entities.get(other) {
                if p.tribe.is_none() {
                    actions.push(Action::FormTribe(other));
                }
            }
        }
    }

    actions
}

pub fn score(world: &WorldState, person: &Person, action: &Action) -> i32 {
    let tribe = person.tribe.and_then(|t| world.tribes.get(t));
    let stock = tribe.map(|t| &t.stockpile);
    let prof = person.profession;

    match action {
        Action::GatherFood(_) => {
            let mut s = 10;
            if let Some(st) = stock {
                if prof == Profession::Farmer {
                    s += 20;
                }
                if st.food < 20 {
                    s += 60;
                } else if st.food < 50 {
                    s += 30;
                }
                if person.energy < 20 {
                    s += 40;
                }
            }
            s
        }
        Action::GatherWood(_) => {
            let mut s = 10;
            if let Some(st) = stock {
                if st.wood < 5 {
                    s += 60;
                } else if st.wood < 30 {
                    s += 40;
                }
            }
            s
        }
        Action::GatherStone(_) => {
            let mut s = 10;
            if prof == Profession::Miner {
                s += 20;
            }
            if let Some(st) = stock {
                if st.stone < 5 {
                    s += 60;
                } else if st.stone < 20 {
                    s += 40;
                }
            }
            s
        }
        Action::GatherIron(_) => {
            let mut s = 10;
            if prof == Profession::Miner {
                s += 20;
            }
            if stock.map_or(false, |st| st.iron < 5) {
                s += 40;
            }
            s
        }
        Action::WorkSmithy => {
            let mut s = 10;
            if prof == Profession::Blacksmith {
                s += 60;
            }
            if stock.map_or(false, |st| st.iron > 0) {
                s += 20;
            }
            s
        }
        Action::WorkLibrary => {
            let mut s = 10;
            if prof == Profession::Scholar {
                s += 60;
            }
            s
        }
        Action::WorkTemple => {
            let mut s = 10;
            if prof == Profession::Priest {
                s += 60;
            }
            if stock.map_or(false, |st| st.morale < 50) {
                s += 30;
            }
            s
        }
        Action::WorkHospital => {
            let mut s = 10;
            if prof == Profession::Healer {
                s += 60;
            }
            if person.infected {
                s += 100;
            }
            s
        }
        Action::AttackBarbarian(_) | Action::AttackPredator(_) => 50,
        Action::AttackEnemy(_) => {
            // Enumerated only against tribes already at war
            let mut s = 50 + 100;
            if prof == Profession::Soldier {
                s += 50;
            }
            if tribe.map_or(false, |t| t.religion == Religion::WarGod) {
                s += 20;
            }
            s
        }
        Action::Build => {
            let mut s = 5;
            if let Some(st) = stock {
                if st.wood > 15 && st.stone > 15 {
                    s += 30;
                }
                if st.science == 0 && st.wood >= 15 && st.stone >= 15 {
                    s += 20;
                }
                if st.food < 20 && st.wood >= 2 && st.stone >= 2 {
                    s += 50;
                }
            }
            s
        }
        Action::VisitTavern => {
            let mut s = 5;
            if person.energy < 25 {
                s += 50;
            }
            s
        }
        Action::Trade(_) => {
            let mut s = 5;
            if prof == Profession::Merchant {
                s += 200;
            }
            s
        }
        Action::FormTribe(_) => 50,
    }
}

fn gather_bonus_amount(world: &WorldState, id: EntityId, person: &Person, mined: bool) -> u32 {
    let mut amount = 1;
    if world.is_leader(id, person.tribe) {
        amount += 1;
    }
    if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get(t)) {
        if tribe.government == Government::Republic {
            amount += 1;
        }
        if tribe.culture == TribeTrait::Industrial {
            amount += 1;
        }
        if mined && tribe.has_tech(Tech::Mining) {
            amount += 1;
        }
    }
    if mined && person.profession == Profession::Miner {
        amount += 1;
    }
    amount
}

fn food_yield(world: &WorldState, id: EntityId, person: &Person) -> u32 {
    let mut amount = 20;
    if person.profession == Profession::Farmer {
        amount += 5;
    }
    if world.is_leader(id, person.tribe) {
        amount += 2;
    }
    if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get(t)) {
        if tribe.culture == TribeTrait::Agrarian {
            amount += 2;
        }
        if tribe.has_tech(Tech::Agriculture) {
            amount += 1;
        }
        if tribe.has_tech(Tech::Irrigation) {
            amount += 2;
        }
        match tribe.religion {
            Religion::HarvestGod => amount += 3,
            Religion::SeaGod => amount += 1,
            _ => {}
        }
    }
    amount
}

fn take_resource(world: &mut WorldState, target: EntityId, pos: Pos, kind: ResourceKind) -> bool {
    let live = world.grid.position(target) == Some(pos)
        && world.entities.get(target).map_or(false, |e| e.is_resource(kind));
    if live {
        world.kill(target);
    }
    live
}

fn execute(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos, action: Action) {
    match action {
        Action::GatherFood(target) => {
            if !take_resource(world, target, pos, ResourceKind::Food) {
                return;
            }
            match person.tribe {
                Some(t) => {
                    let amount = food_yield(world, id, person);
                    if let Some(tribe) = world.tribes.get_mut(t) {
                        tribe.stockpile.food += amount;
                    }
                }
                None => {
                    person.energy += 20;
                    if person.profession == Profession::Farmer {
                        person.energy += 5;
                    }
                }
            }
        }
        Action::GatherWood(target) => {
            if !take_resource(world, target, pos, ResourceKind::Tree) {
                return;
            }
            let amount = gather_bonus_amount(world, id, person, false);
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                tribe.stockpile.wood += amount;
            }
        }
        Action::GatherStone(target) => {
            if !take_resource(world, target, pos, ResourceKind::Stone) {
                return;
            }
            let amount = gather_bonus_amount(world, id, person, true);
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                tribe.stockpile.stone += amount;
            }
        }
        Action::GatherIron(target) => {
            if !take_resource(world, target, pos, ResourceKind::IronOre) {
                return;
            }
            let amount = gather_bonus_amount(world, id, person, true);
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                tribe.stockpile.iron += amount;
            }
        }
        Action::WorkSmithy => {
            if person.profession != Profession::Blacksmith {
                return;
            }
            let bonus = person
                .tribe
                .and_then(|t| world.tribes.get(t))
                .map_or(0, |t| {
                    let mut b = 0;
                    if t.has_tech(Tech::BronzeWorking) {
                        b += 1;
                    }
                    if t.has_tech(Tech::IronWorking) {
                        b += 2;
                    }
                    b
                });
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                if tribe.stockpile.iron >= 1 {
                    tribe.stockpile.iron -= 1;
                    tribe.stockpile.tools += 1 + bonus;
                }
            }
        }
        Action::WorkLibrary => {
            if person.profession != Profession::Scholar {
                return;
            }
            let leader = world.is_leader(id, person.tribe);
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                tribe.stockpile.science += if leader { 2 } else { 1 };
            }
        }
        Action::WorkTemple => {
            if person.profession != Profession::Priest {
                return;
            }
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                let mut gain = 1;
                match tribe.government {
                    Government::Monarchy => gain += 2,
                    Government::Theocracy => gain += 3,
                    Government::Republic => {}
                }
                if tribe.religion == Religion::WarGod {
                    gain += 2;
                }
                if tribe.has_tech(Tech::Philosophy) {
                    gain += 2;
                }
                tribe.stockpile.add_morale(gain);
                if tribe.religion == Religion::SunGod {
                    tribe.stockpile.science += 1;
                }
            }
        }
        Action::WorkHospital => {
            if person.profession != Profession::Healer {
                return;
            }
            heal_cell(world, id, person, pos);
        }
        Action::AttackBarbarian(target) => {
            let damage = if person.profession == Profession::Soldier {
                20
            } else {
                10
            };
            let dead = match world.entities.get_mut(target) {
                Some(Entity::Barbarian(b)) => {
                    b.energy -= damage;
                    b.energy <= 0
                }
                _ => return,
            };
            person.energy -= 5;
            if dead {
                world.kill(target);
            }
        }
        Action::AttackPredator(target) => {
            if !matches!(world.entities.get(target), Some(Entity::Predator(_))) {
                return;
            }
            world.kill(target);
            person.energy -= 10;
        }
        Action::AttackEnemy(target) => {
            let mine = match person.tribe {
                Some(t) => t,
                None => return,
            };
            let mut damage = if person.profession == Profession::Archer {
                15
            } else {
                20
            };
            if let Some(tribe) = world.tribes.get(mine) {
                if tribe.culture == TribeTrait::Militaristic {
                    damage += 10;
                }
                if tribe.religion == Religion::WarGod {
                    damage += 5;
                }
            }
            let dead = match world.entities.get_mut(target) {
                Some(Entity::Person(enemy)) => {
                    if !enemy.tribe.map_or(false, |t| t != mine) {
                        return;
                    }
                    enemy.energy -= damage;
                    enemy.energy <= 0
                }
                _ => return,
            };
            person.energy -= 5;
            if dead {
                world.kill(target);
                world.record(SimEvent::PersonDied {
                    id: target,
                    cause: DeathCause::Slain,
                });
            }
        }
        Action::Build => {
            if let Some(t) = person.tribe {
                construction::execute(world, t, pos);
            }
        }
        Action::VisitTavern => {
            if person.energy >= 25 {
                return;
            }
            if let Some(tribe) = person.tribe.and_then(|t| world.tribes.get_mut(t)) {
                if tribe.stockpile.spend_food(1) {
                    person.energy += 20;
                }
            }
        }
        Action::Trade(partner) => {
            trade(world, person, partner);
        }
        Action::FormTribe(partner) => {
            form_tribe(world, person, partner, pos);
        }
    }
}

fn heal_cell(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos) {
    let mine = person.tribe;
    let patients: Vec<EntityId> = world
        .grid
        .contents_sorted(pos)
        .into_iter()
        .filter(|other| *other != id)
        .filter(|other| {
            matches!(world.entities.get(*other), Some(Entity::Person(p)) if p.tribe == mine)
        })
        .collect();
    for patient in patients {
        let cure = world.rng.gen_bool(0.5);
        if let Some(Entity::Person(p)) = world.entities.get_mut(patient) {
            if cure {
                p.infected = false;
            }
            if p.energy < 30 {
                p.energy += 5;
            }
        }
    }
    // The healer is checked out of the arena and treats themself here
    if world.rng.gen_bool(0.5) {
        person.infected = false;
    }
    if person.energy < 30 {
        person.energy += 5;
    }
}

fn trade(world: &mut WorldState, person: &Person, partner: EntityId) {
    let mine = match person.tribe {
        Some(t) => t,
        None => return,
    };
    let theirs = match world.entities.get(partner) {
        Some(Entity::Person(p)) => match p.tribe {
            Some(t) if t != mine => t,
            _ => return,
        },
        _ => return,
    };
    let (my_food, my_wood) = match world.tribes.get(mine) {
        Some(t) => (t.stockpile.food, t.stockpile.wood),
        None => return,
    };
    let (their_food, their_wood) = match world.tribes.get(theirs) {
        Some(t) => (t.stockpile.food, t.stockpile.wood),
        None => return,
    };

    // Surplus food moves toward surplus wood, never both ways at once
    if my_food > 100 && their_wood > 20 {
        if let Some(t) = world.tribes.get_mut(mine) {
            t.stockpile.food -= 10;
            t.stockpile.wood += 1;
        }
        if let Some(t) = world.tribes.get_mut(theirs) {
            t.stockpile.food += 10;
            t.stockpile.wood -= 1;
        }
    } else if their_food > 100 && my_wood > 20 {
        if let Some(t) = world.tribes.get_mut(theirs) {
            t.stockpile.food -= 10;
            t.stockpile.wood += 1;
        }
        if let Some(t) = world.tribes.get_mut(mine) {
            t.stockpile.food += 10;
            t.stockpile.wood -= 1;
        }
    }
}

fn form_tribe(world: &mut WorldState, person: &mut Person, partner: EntityId, pos: Pos) {
    if person.tribe.is_some() || world.grid.position(partner) != Some(pos) {
        return;
    }
    let partner_is_loner = matches!(
        world.entities.get(partner),
        Some(Entity::Person(p)) if p.tribe.is_none()
    );
    if !partner_is_loner {
        return;
    }
    let tribe = world.tribes.found(&mut world.rng);
    person.tribe = Some(tribe);
    if let Some(Entity::Person(p)) = world.entities.get_mut(partner) {
        p.tribe = Some(tribe);
    }
    world.record(SimEvent::TribeFormed { tribe });
}

/// Score the enumerated actions and run the winner, if any
pub fn act(world: &mut WorldState, id: EntityId, person: &mut Person, pos: Pos) {
    let mut best: Option<Action> = None;
    let mut best_score = -1;
    for action in enumerate(world, id, person, pos) {
        let s = score(world, person, &action);
        if s > best_score {
            best_score = s;
            best = Some(action);
        }
    }
    if let Some(action) = best {
        execute(world, id, person, pos, action);
    }
}

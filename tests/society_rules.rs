//! Tribal economy and society rules exercised through the public API

use civgrid::core::types::Pos;
use civgrid::entity::{Entity, Person, Profession};
use civgrid::society::splitting;
use civgrid::world::SimEvent;
use civgrid::{WorldConfig, WorldState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn empty_world(seed: u64, num_tribes: u32) -> WorldState {
    WorldState::new(WorldConfig {
        initial_people: 0,
        initial_food: 0,
        initial_predators: 0,
        initial_trees: 0,
        initial_stone: 0,
        initial_iron: 0,
        num_tribes,
        seed,
        ..WorldConfig::default()
    })
    .unwrap()
}

fn spawn_person(
    world: &mut WorldState,
    pos: Pos,
    tribe: Option<civgrid::TribeId>,
    profession: Profession,
    energy: i32,
) -> civgrid::EntityId {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut person = Person::new(&mut rng, tribe);
    person.profession = profession;
    person.energy = energy;
    world.spawn(Entity::Person(person), pos)
}

#[test]
fn co_located_loners_form_a_tribe() {
    let mut world = empty_world(11, 0);
    let pos = Pos::new(9, 9);
    let a = spawn_person(&mut world, pos, None, Profession::Farmer, 50);
    let b = spawn_person(&mut world, pos, None, Profession::Miner, 50);

    let events = world.advance();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SimEvent::TribeFormed { .. })),
        "two loners sharing a cell must found a tribe"
    );
    let tribe_a = world.entities.get(a).and_then(Entity::as_person).unwrap().tribe;
    let tribe_b = world.entities.get(b).and_then(Entity::as_person).unwrap().tribe;
    assert!(tribe_a.is_some());
    assert_eq!(tribe_a, tribe_b, "both founders join the same tribe");
}

#[test]
fn trade_moves_surplus_food_toward_surplus_wood() {
    let mut world = empty_world(12, 2);
    let ids = world.tribes.ids();
    let (rich_food, rich_wood) = (ids[0], ids[1]);
    world.tribes.get_mut(rich_food).unwrap().stockpile.food = 200;
    world.tribes.get_mut(rich_wood).unwrap().stockpile.wood = 50;

    let pos = Pos::new(3, 3);
    spawn_person(&mut world, pos, Some(rich_food), Profession::Merchant, 45);
    spawn_person(&mut world, pos, Some(rich_wood), Profession::Merchant, 45);

    world.advance();

    let a = &world.tribes.get(rich_food).unwrap().stockpile;
    let b = &world.tribes.get(rich_wood).unwrap().stockpile;
    assert_eq!(a.food + b.food, 200, "trade conserves food");
    assert_eq!(a.wood + b.wood, 50, "trade conserves wood");
    assert!(a.food < 200, "the food-rich side pays food");
    assert!(a.wood > 0, "and receives wood");
    assert!(b.food > 0);
}

#[test]
fn split_retags_exactly_the_rebel_third() {
    let mut world = empty_world(13, 1);
    let home = world.tribes.ids()[0];
    world.tribes.get_mut(home).unwrap().stockpile.food = 1000;
    for i in 0..150 {
        let pos = Pos::new(i % 20, i / 20);
        spawn_person(&mut world, pos, Some(home), Profession::Farmer, 50);
    }

    let members = world.tribe_member_positions(home);
    let outcome = (0..5000)
        .find_map(|_| splitting::maybe_split(home, &members, &mut world.tribes, &mut world.rng))
        .expect("an overcrowded tribe splits at 2% per roll");

    for rebel in &outcome.rebels {
        if let Some(person) = world.entities.get_mut(*rebel).and_then(Entity::as_person_mut) {
            person.tribe = Some(outcome.new_tribe);
        }
    }

    assert_eq!(outcome.rebels.len(), 150 / 3);
    assert_eq!(world.tribe_population(outcome.new_tribe), 50);
    assert_eq!(world.tribe_population(home), 100, "loyalists stay behind");
    assert_eq!(
        world.tribes.get(outcome.new_tribe).unwrap().stockpile.food,
        50,
        "the breakaway starts with seed rations"
    );
}

#[test]
fn research_fires_through_advance_once_science_is_banked() {
    let mut world = empty_world(14, 1);
    let tribe = world.tribes.ids()[0];
    world.tribes.get_mut(tribe).unwrap().stockpile.science = 500;

    let events = world.advance();
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SimEvent::TechResearched { .. })),
        "a tribe with banked science researches on the next tick"
    );
    assert!(world.tribes.get(tribe).unwrap().stockpile.science < 500);
}

#[test]
fn wars_only_ever_involve_known_tribes() {
    let mut world = WorldState::new(WorldConfig {
        seed: 15,
        num_tribes: 4,
        ..WorldConfig::default()
    })
    .unwrap();

    for _ in 0..300 {
        for event in world.advance() {
            if let SimEvent::WarDeclared { a, b } = event {
                assert!(world.tribes.get(a).is_some());
                assert!(world.tribes.get(b).is_some());
                assert!(world.tribes.at_war(a, b), "declaration matches the matrix");
            }
        }
    }
}

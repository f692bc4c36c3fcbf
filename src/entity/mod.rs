//! Entity data model
//!
//! Every occupant of the grid is one `Entity` variant with an explicit kind
//! tag, switched exhaustively. Agents (Person/Predator/Barbarian) carry
//! behavioral state; resources and most buildings are inert and only exist
//! to be consumed, blocked on, or worked at.

pub mod actions;
pub mod barbarian;
pub mod buildings;
pub mod construction;
pub mod person;
pub mod predator;

use ahash::{AHashMap, AHashSet};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Pos, TribeId};

/// Harvestable and terrain resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Food,
    Tree,
    Stone,
    IronOre,
    Mountain,
    River,
}

/// Constructed structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Farm,
    Wall,
    Smithy,
    Road,
    Market,
    Barracks,
    Library,
    Hospital,
    Temple,
    Tavern,
}

/// Person roles, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profession {
    Farmer,
    Miner,
    Guard,
    Blacksmith,
    Merchant,
    Soldier,
    Archer,
    Scholar,
    Healer,
    Priest,
}

impl Profession {
    pub const ALL: [Profession; 10] = [
        Profession::Farmer,
        Profession::Miner,
        Profession::Guard,
        Profession::Blacksmith,
        Profession::Merchant,
        Profession::Soldier,
        Profession::Archer,
        Profession::Scholar,
        Profession::Healer,
        Profession::Priest,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).expect("profession table is non-empty")
    }

    /// Attack reach in cells; archers shoot over two cells of ground
    pub fn attack_radius(&self) -> i32 {
        match self {
            Profession::Archer => 3,
            _ => 1,
        }
    }
}

/// Entity kinds a person remembers and seeks out
///
/// Doubles as the key of the per-person memory map and as the target
/// argument of `move_toward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Food,
    Tree,
    Stone,
    IronOre,
    House,
    Farm,
    Smithy,
    Market,
    Library,
    Hospital,
    Temple,
    Tavern,
}

impl TargetKind {
    /// Memory-worthy classification of an entity, if any
    pub fn of(entity: &Entity) -> Option<TargetKind> {
        match entity {
            Entity::Resource(ResourceKind::Food) => Some(TargetKind::Food),
            Entity::Resource(ResourceKind::Tree) => Some(TargetKind::Tree),
            Entity::Resource(ResourceKind::Stone) => Some(TargetKind::Stone),
            Entity::Resource(ResourceKind::IronOre) => Some(TargetKind::IronOre),
            Entity::Building(b) => match b.kind {
                BuildingKind::House => Some(TargetKind::House),
                BuildingKind::Farm => Some(TargetKind::Farm),
                BuildingKind::Smithy => Some(TargetKind::Smithy),
                BuildingKind::Market => Some(TargetKind::Market),
                BuildingKind::Library => Some(TargetKind::Library),
                BuildingKind::Hospital => Some(TargetKind::Hospital),
                BuildingKind::Temple => Some(TargetKind::Temple),
                BuildingKind::Tavern => Some(TargetKind::Tavern),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        TargetKind::of(entity) == Some(*self)
    }
}

/// An autonomous villager
#[derive(Debug, Clone)]
pub struct Person {
    pub energy: i32,
    pub age: u32,
    pub tribe: Option<TribeId>,
    pub profession: Profession,
    pub infected: bool,
    /// Remembered locations of resources and buildings, keyed by kind.
    /// Accumulates from scans; a coordinate is only evicted on
    /// arrival-and-not-found.
    pub memory: AHashMap<TargetKind, AHashSet<Pos>>,
    pub scan_cooldown: u8,
    /// Remainder of the current A* route; one step consumed per tick
    pub path: Vec<Pos>,
}

impl Person {
    pub fn new(rng: &mut impl Rng, tribe: Option<TribeId>) -> Self {
        Self {
            energy: 30,
            age: 0,
            tribe,
            profession: Profession::random(rng),
            infected: false,
            memory: AHashMap::new(),
            scan_cooldown: 0,
            path: Vec::new(),
        }
    }

    pub fn remember(&mut self, kind: TargetKind, pos: Pos) {
        self.memory.entry(kind).or_default().insert(pos);
    }

    pub fn forget(&mut self, kind: TargetKind, pos: Pos) {
        if let Some(set) = self.memory.get_mut(&kind) {
            set.remove(&pos);
        }
    }
}

/// A pack hunter preying on people
#[derive(Debug, Clone)]
pub struct Predator {
    pub energy: i32,
    pub age: u32,
    pub pack: Option<u32>,
}

impl Predator {
    pub fn new(pack: Option<u32>) -> Self {
        Self {
            energy: 50,
            age: 0,
            pack,
        }
    }
}

/// A raider with no persistent identity beyond its position
#[derive(Debug, Clone)]
pub struct Barbarian {
    pub energy: i32,
}

impl Barbarian {
    pub fn new() -> Self {
        Self { energy: 50 }
    }
}

impl Default for Barbarian {
    fn default() -> Self {
        Self::new()
    }
}

/// A constructed structure; only farms carry mutable state
#[derive(Debug, Clone)]
pub struct Building {
    pub kind: BuildingKind,
    pub tribe: Option<TribeId>,
    /// Farm growth accumulator; unused for other kinds
    pub growth: u32,
}

impl Building {
    pub fn new(kind: BuildingKind, tribe: Option<TribeId>) -> Self {
        Self {
            kind,
            tribe,
            growth: 0,
        }
    }
}

/// Any occupant of the world grid
#[derive(Debug, Clone)]
pub enum Entity {
    Person(Person),
    Predator(Predator),
    Barbarian(Barbarian),
    Resource(ResourceKind),
    Building(Building),
}

impl Entity {
    pub fn as_person(&self) -> Option<&Person> {
        match self {
            Entity::Person(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_person_mut(&mut self) -> Option<&mut Person> {
        match self {
            Entity::Person(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_predator(&self) -> Option<&Predator> {
        match self {
            Entity::Predator(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_building(&self) -> Option<&Building> {
        match self {
            Entity::Building(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_resource(&self, kind: ResourceKind) -> bool {
        matches!(self, Entity::Resource(k) if *k == kind)
    }

    pub fn is_building(&self, kind: BuildingKind) -> bool {
        matches!(self, Entity::Building(b) if b.kind == kind)
    }

    /// Any built structure, regardless of kind
    pub fn is_any_building(&self) -> bool {
        matches!(self, Entity::Building(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_target_kind_classification() {
        let tree = Entity::Resource(ResourceKind::Tree);
        assert_eq!(TargetKind::of(&tree), Some(TargetKind::Tree));

        let wall = Entity::Building(Building::new(BuildingKind::Wall, None));
        assert_eq!(TargetKind::of(&wall), None);

        let farm = Entity::Building(Building::new(BuildingKind::Farm, None));
        assert!(TargetKind::Farm.matches(&farm));
        assert!(!TargetKind::House.matches(&farm));
    }

    #[test]
    fn test_person_memory_round_trip() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut person = Person::new(&mut rng, None);
        let pos = Pos::new(3, 4);

        person.remember(TargetKind::Food, pos);
        assert!(person.memory[&TargetKind::Food].contains(&pos));

        person.forget(TargetKind::Food, pos);
        assert!(!person.memory[&TargetKind::Food].contains(&pos));
    }

    #[test]
    fn test_archer_attack_radius() {
        assert_eq!(Profession::Archer.attack_radius(), 3);
        assert_eq!(Profession::Guard.attack_radius(), 1);
    }
}

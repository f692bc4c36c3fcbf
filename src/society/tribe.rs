//! Tribes and the diplomacy web
//!
//! Tribes live in a `BTreeMap` so iteration order is the id order, which
//! keeps every run with the same seed identical. Relations are keyed by
//! the sorted id pair, so symmetry holds by construction.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, TribeId};
use crate::society::research::Tech;
use crate::society::stockpile::Stockpile;

/// Cultural disposition, fixed at founding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TribeTrait {
    Agrarian,
    Militaristic,
    Expansionist,
    Industrial,
}

impl TribeTrait {
    pub const ALL: [TribeTrait; 4] = [
        TribeTrait::Agrarian,
        TribeTrait::Militaristic,
        TribeTrait::Expansionist,
        TribeTrait::Industrial,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Government {
    Monarchy,
    Republic,
    Theocracy,
}

impl Government {
    pub const ALL: [Government; 3] = [
        Government::Monarchy,
        Government::Republic,
        Government::Theocracy,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Religion {
    SunGod,
    WarGod,
    HarvestGod,
    SeaGod,
}

impl Religion {
    pub const ALL: [Religion; 4] = [
        Religion::SunGod,
        Religion::WarGod,
        Religion::HarvestGod,
        Religion::SeaGod,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diplomacy {
    Neutral,
    Alliance,
    War,
}

#[derive(Debug, Clone)]
pub struct Tribe {
    pub id: TribeId,
    pub color: String,
    pub stockpile: Stockpile,
    pub culture: TribeTrait,
    pub government: Government,
    pub religion: Religion,
    pub techs: AHashSet<Tech>,
    pub leader: Option<EntityId>,
}

impl Tribe {
    fn new(id: TribeId, rng: &mut impl Rng) -> Self {
        Self {
            id,
            color: format!("#{:06x}", rng.gen_range(0..0x0100_0000u32)),
            stockpile: Stockpile::default(),
            culture: *TribeTrait::ALL.choose(rng).expect("trait table is non-empty"),
            government: *Government::ALL
                .choose(rng)
                .expect("government table is non-empty"),
            religion: *Religion::ALL
                .choose(rng)
                .expect("religion table is non-empty"),
            techs: AHashSet::new(),
            leader: None,
        }
    }

    pub fn has_tech(&self, tech: Tech) -> bool {
        self.techs.contains(&tech)
    }
}

fn pair(a: TribeId, b: TribeId) -> (TribeId, TribeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TribeRegistry {
    tribes: BTreeMap<TribeId, Tribe>,
    relations: BTreeMap<(TribeId, TribeId), Diplomacy>,
    next_id: u32,
}

impl TribeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Found a tribe with randomized trait, government and religion, and
    /// neutral standing toward every existing tribe
    pub fn found(&mut self, rng: &mut impl Rng) -> TribeId {
        let id = TribeId(self.next_id);
        self.next_id += 1;
        for other in self.tribes.keys().copied().collect::<Vec<_>>() {
            self.relations.insert(pair(id, other), Diplomacy::Neutral);
        }
        self.tribes.insert(id, Tribe::new(id, rng));
        id
    }

    pub fn get(&self, id: TribeId) -> Option<&Tribe> {
        self.tribes.get(&id)
    }

    pub fn get_mut(&mut self, id: TribeId) -> Option<&mut Tribe> {
        self.tribes.get_mut(&id)
    }

    pub fn ids(&self) -> Vec<TribeId> {
        self.tribes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.tribes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tribes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tribe> {
        self.tribes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tribe> {
        self.tribes.values_mut()
    }

    pub fn relation(&self, a: TribeId, b: TribeId) -> Diplomacy {
        if a == b {
            return Diplomacy::Neutral;
        }
        self.relations
            .get(&pair(a, b))
            .copied()
            .unwrap_or(Diplomacy::Neutral)
    }

    pub fn set_relation(&mut self, a: TribeId, b: TribeId, relation: Diplomacy) {
        if a != b {
            self.relations.insert(pair(a, b), relation);
        }
    }

    pub fn at_war(&self, a: TribeId, b: TribeId) -> bool {
        self.relation(a, b) == Diplomacy::War
    }

    /// Unordered tribe pairs in id order
    pub fn pairs(&self) -> Vec<(TribeId, TribeId)> {
        let ids = self.ids();
        let mut out = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                out.push((*a, *b));
            }
        }
        out
    }
}

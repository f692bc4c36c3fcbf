//! Technology tree
//!
//! A flat table of techs with a science cost and at most one
//! prerequisite. Each tribe researches one affordable tech per world
//! step, chosen at random among the unlocked candidates.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::society::tribe::Tribe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tech {
    Agriculture,
    Irrigation,
    Mining,
    Masonry,
    BronzeWorking,
    IronWorking,
    Writing,
    Philosophy,
    Medicine,
}

impl Tech {
    pub const ALL: [Tech; 9] = [
        Tech::Agriculture,
        Tech::Irrigation,
        Tech::Mining,
        Tech::Masonry,
        Tech::BronzeWorking,
        Tech::IronWorking,
        Tech::Writing,
        Tech::Philosophy,
        Tech::Medicine,
    ];

    pub fn cost(&self) -> u32 {
        match self {
            Tech::Agriculture => 30,
            Tech::Irrigation => 50,
            Tech::Mining => 30,
            Tech::Masonry => 50,
            Tech::BronzeWorking => 60,
            Tech::IronWorking => 100,
            Tech::Writing => 40,
            Tech::Philosophy => 80,
            Tech::Medicine => 50,
        }
    }

    pub fn prerequisite(&self) -> Option<Tech> {
        match self {
            Tech::Irrigation => Some(Tech::Agriculture),
            Tech::Masonry | Tech::BronzeWorking => Some(Tech::Mining),
            Tech::IronWorking => Some(Tech::BronzeWorking),
            Tech::Philosophy | Tech::Medicine => Some(Tech::Writing),
            _ => None,
        }
    }
}

/// Techs the tribe could buy right now
pub fn available(tribe: &Tribe) -> Vec<Tech> {
    Tech::ALL
        .iter()
        .copied()
        .filter(|t| !tribe.has_tech(*t))
        .filter(|t| t.prerequisite().map_or(true, |p| tribe.has_tech(p)))
        .filter(|t| tribe.stockpile.science >= t.cost())
        .collect()
}

/// Buy one random affordable tech, returning it if any was researched
pub fn step_research(tribe: &mut Tribe, rng: &mut impl Rng) -> Option<Tech> {
    let candidates = available(tribe);
    let tech = *candidates.choose(rng)?;
    if !tribe.stockpile.spend_science(tech.cost()) {
        return None;
    }
    tribe.techs.insert(tech);
    Some(tech)
}

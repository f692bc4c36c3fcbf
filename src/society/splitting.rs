//! Tribe fission
//!
//! Overcrowded or starving tribes roll for a breakaway each world step.
//! A random rebel anchors the new tribe and pulls the third of the
//! membership nearest to them along.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{EntityId, Pos, TribeId};
use crate::society::tribe::TribeRegistry;

const SEED_FOOD: u32 = 50;
const SEED_WOOD: u32 = 10;

pub struct SplitOutcome {
    pub new_tribe: TribeId,
    pub rebels: Vec<EntityId>,
}

fn split_chance(pop: usize, food: u32) -> f64 {
    if pop > 120 {
        0.02
    } else if pop > 60 {
        if (food as usize) < 5 * pop {
            0.01
        } else {
            0.0005
        }
    } else {
        0.0
    }
}

/// Roll a fission check for one tribe. `members` holds the living
/// membership with positions. On a split the new tribe is founded and
/// seeded; re-tagging the rebel persons is left to the caller.
pub fn maybe_split(
    tribe_id: TribeId,
    members: &[(EntityId, Pos)],
    tribes: &mut TribeRegistry,
    rng: &mut impl Rng,
) -> Option<SplitOutcome> {
    let food = tribes.get(tribe_id)?.stockpile.food;
    let chance = split_chance(members.len(), food);
    if chance == 0.0 || !rng.gen_bool(chance) {
        return None;
    }

    let (_, anchor_pos) = *members.choose(rng)?;
    let mut by_distance: Vec<(EntityId, Pos)> = members.to_vec();
    by_distance.sort_by_key(|(id, pos)| (pos.manhattan(anchor_pos), *id));
    let take = members.len() / 3;
    let rebels: Vec<EntityId> = by_distance.iter().take(take).map(|(id, _)| *id).collect();
    if rebels.len() < 2 {
        return None;
    }

    let new_tribe = tribes.found(rng);
    if let Some(tribe) = tribes.get_mut(new_tribe) {
        tribe.stockpile.food = SEED_FOOD;
        tribe.stockpile.wood = SEED_WOOD;
    }
    Some(SplitOutcome { new_tribe, rebels })
}

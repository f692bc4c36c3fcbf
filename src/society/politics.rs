//! Leadership and diplomacy
//!
//! Each world step re-elects leaders according to the tribe's government
//! and rolls the diplomacy web pair by pair. Relation changes are
//! returned so the caller can log them.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::{EntityId, TribeId};
use crate::entity::Profession;
use crate::society::tribe::{Diplomacy, Government, Tribe, TribeRegistry};

const ALLIANCE_CHANCE: f64 = 0.05;
const PEACE_CHANCE: f64 = 0.1;

/// A living member as seen by the election, with id, age and role
pub type Member = (EntityId, u32, Profession);

/// Seat a leader if the office is vacant or the incumbent has died.
///
/// Monarchies crown the oldest member, republics draw lots, theocracies
/// prefer a random priest and fall back to the oldest member. A sitting
/// leader who is still a living member keeps the office.
pub fn elect_leader(tribe: &mut Tribe, members: &[Member], rng: &mut impl Rng) {
    if members.is_empty() {
        tribe.leader = None;
        return;
    }
    if let Some(seated) = tribe.leader {
        if members.iter().any(|(id, _, _)| *id == seated) {
            return;
        }
    }
    let oldest = members
        .iter()
        .max_by_key(|(id, age, _)| (*age, std::cmp::Reverse(*id)))
        .map(|(id, _, _)| *id);
    tribe.leader = match tribe.government {
        Government::Monarchy => oldest,
        Government::Republic => members.choose(rng).map(|(id, _, _)| *id),
        Government::Theocracy => {
            let priests: Vec<EntityId> = members
                .iter()
                .filter(|(_, _, p)| *p == Profession::Priest)
                .map(|(id, _, _)| *id)
                .collect();
            priests.choose(rng).copied().or(oldest)
        }
    };
}

fn alliance_score(a: &Tribe, b: &Tribe) -> u32 {
    let mut score = 0;
    if a.religion == b.religion {
        score += 2;
    }
    if a.government == Government::Republic && b.government == Government::Republic {
        score += 2;
    }
    if a.stockpile.food > 300 && b.stockpile.food > 300 {
        score += 1;
    }
    score
}

fn war_chance(a: &Tribe, b: &Tribe) -> f64 {
    let mut chance = 0.0;
    // Scarcity next to plenty breeds raids, in either direction
    if a.stockpile.food < 50 && b.stockpile.food > 200 {
        chance += 0.05;
    }
    if b.stockpile.food < 50 && a.stockpile.food > 200 {
        chance += 0.05;
    }
    if a.religion != b.religion
        && (a.government == Government::Theocracy || b.government == Government::Theocracy)
    {
        chance += 0.02;
    }
    for gov in [a.government, b.government] {
        if gov == Government::Monarchy {
            chance += 0.01;
        }
    }
    chance
}

/// Roll every tribe pair once; returns the relation changes made
pub fn step_diplomacy(
    reg: &mut TribeRegistry,
    rng: &mut impl Rng,
) -> Vec<(TribeId, TribeId, Diplomacy)> {
    let mut changes = Vec::new();
    for (a, b) in reg.pairs() {
        let relation = reg.relation(a, b);
        let (ta, tb) = match (reg.get(a), reg.get(b)) {
            (Some(ta), Some(tb)) => (ta, tb),
            _ => continue,
        };
        match relation {
            Diplomacy::War => {
                let both_fed = ta.stockpile.food > 100 && tb.stockpile.food > 100;
                let both_starving = ta.stockpile.food < 10 && tb.stockpile.food < 10;
                if (both_fed || both_starving) && rng.gen_bool(PEACE_CHANCE) {
                    reg.set_relation(a, b, Diplomacy::Neutral);
                    changes.push((a, b, Diplomacy::Neutral));
                }
            }
            Diplomacy::Neutral => {
                if alliance_score(ta, tb) >= 3 && rng.gen_bool(ALLIANCE_CHANCE) {
                    reg.set_relation(a, b, Diplomacy::Alliance);
                    changes.push((a, b, Diplomacy::Alliance));
                    continue;
                }
                let chance = war_chance(ta, tb);
                if chance > 0.0 && rng.gen_bool(chance.min(1.0)) {
                    reg.set_relation(a, b, Diplomacy::War);
                    changes.push((a, b, Diplomacy::War));
                }
            }
            Diplomacy::Alliance => {}
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::society::tribe::Religion;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn two_tribes() -> (TribeRegistry, TribeId, TribeId, ChaCha8Rng) {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut reg = TribeRegistry::new();
        let a = reg.found(&mut rng);
        let b = reg.found(&mut rng);
        (reg, a, b, rng)
    }

    #[test]
    fn test_monarchy_crowns_the_oldest() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.government = Government::Monarchy;
        let members = vec![
            (EntityId(1), 20, Profession::Farmer),
            (EntityId(2), 55, Profession::Miner),
            (EntityId(3), 40, Profession::Guard),
        ];

        elect_leader(tribe, &members, &mut rng);
        assert_eq!(tribe.leader, Some(EntityId(2)));
    }

    #[test]
    fn test_living_leader_keeps_the_office() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.government = Government::Monarchy;
        tribe.leader = Some(EntityId(1));
        let members = vec![
            (EntityId(1), 20, Profession::Farmer),
            (EntityId(2), 55, Profession::Miner),
        ];

        elect_leader(tribe, &members, &mut rng);
        assert_eq!(tribe.leader, Some(EntityId(1)), "no election while the incumbent lives");
    }

    #[test]
    fn test_dead_leader_triggers_an_election() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.government = Government::Monarchy;
        tribe.leader = Some(EntityId(77));
        let members = vec![
            (EntityId(1), 20, Profession::Farmer),
            (EntityId(2), 55, Profession::Miner),
        ];

        elect_leader(tribe, &members, &mut rng);
        assert_eq!(tribe.leader, Some(EntityId(2)));
    }

    #[test]
    fn test_theocracy_prefers_priests() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.government = Government::Theocracy;
        let members = vec![
            (EntityId(1), 90, Profession::Farmer),
            (EntityId(2), 10, Profession::Priest),
        ];

        elect_leader(tribe, &members, &mut rng);
        assert_eq!(tribe.leader, Some(EntityId(2)));
    }

    #[test]
    fn test_theocracy_without_priests_falls_back_to_oldest() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.government = Government::Theocracy;
        let members = vec![
            (EntityId(1), 90, Profession::Farmer),
            (EntityId(2), 10, Profession::Guard),
        ];

        elect_leader(tribe, &members, &mut rng);
        assert_eq!(tribe.leader, Some(EntityId(1)));
    }

    #[test]
    fn test_empty_tribe_has_no_leader() {
        let (mut reg, a, _, mut rng) = two_tribes();
        let tribe = reg.get_mut(a).unwrap();
        tribe.leader = Some(EntityId(99));

        elect_leader(tribe, &[], &mut rng);
        assert_eq!(tribe.leader, None);
    }

    #[test]
    fn test_alliance_score_thresholds() {
        let (mut reg, a, b, _) = two_tribes();
        {
            let ta = reg.get_mut(a).unwrap();
            ta.religion = Religion::SunGod;
            ta.government = Government::Republic;
            ta.stockpile.food = 400;
        }
        {
            let tb = reg.get_mut(b).unwrap();
            tb.religion = Religion::SunGod;
            tb.government = Government::Republic;
            tb.stockpile.food = 400;
        }
        assert_eq!(alliance_score(reg.get(a).unwrap(), reg.get(b).unwrap()), 5);

        reg.get_mut(b).unwrap().religion = Religion::WarGod;
        assert_eq!(alliance_score(reg.get(a).unwrap(), reg.get(b).unwrap()), 3);
    }

    #[test]
    fn test_war_chance_from_scarcity() {
        let (mut reg, a, b, _) = two_tribes();
        {
            let ta = reg.get_mut(a).unwrap();
            ta.government = Government::Republic;
            ta.religion = Religion::SunGod;
            ta.stockpile.food = 10;
        }
        {
            let tb = reg.get_mut(b).unwrap();
            tb.government = Government::Republic;
            tb.religion = Religion::SunGod;
            tb.stockpile.food = 500;
        }
        let chance = war_chance(reg.get(a).unwrap(), reg.get(b).unwrap());
        assert!((chance - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_peace_requires_shared_extremes() {
        let (mut reg, a, b, _) = two_tribes();
        reg.set_relation(a, b, Diplomacy::War);
        reg.get_mut(a).unwrap().stockpile.food = 500;
        reg.get_mut(b).unwrap().stockpile.food = 50;

        // Neither both fed nor both starving, so the war endures no
        // matter how the dice fall
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            step_diplomacy(&mut reg, &mut rng);
        }
        assert!(reg.at_war(a, b));
    }
}

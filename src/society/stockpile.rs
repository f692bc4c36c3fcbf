//! Tribal stockpile
//!
//! Unsigned fields make negative balances unrepresentable; every spend
//! path checks affordability first and is all-or-nothing.

use serde::{Deserialize, Serialize};

pub const MORALE_CAP: u32 = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stockpile {
    pub food: u32,
    pub wood: u32,
    pub stone: u32,
    pub iron: u32,
    pub tools: u32,
    pub science: u32,
    pub morale: u32,
}

impl Stockpile {
    /// Deduct wood and stone together, or neither
    pub fn spend(&mut self, wood: u32, stone: u32) -> bool {
        if self.wood >= wood && self.stone >= stone {
            self.wood -= wood;
            self.stone -= stone;
            true
        } else {
            false
        }
    }

    pub fn spend_food(&mut self, amount: u32) -> bool {
        if self.food >= amount {
            self.food -= amount;
            true
        } else {
            false
        }
    }

    pub fn spend_science(&mut self, amount: u32) -> bool {
        if self.science >= amount {
            self.science -= amount;
            true
        } else {
            false
        }
    }

    pub fn add_morale(&mut self, amount: u32) {
        self.morale = (self.morale + amount).min(MORALE_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut s = Stockpile {
            wood: 10,
            stone: 2,
            ..Default::default()
        };
        assert!(!s.spend(5, 5), "insufficient stone must refuse the spend");
        assert_eq!(s.wood, 10);
        assert_eq!(s.stone, 2);

        assert!(s.spend(5, 2));
        assert_eq!(s.wood, 5);
        assert_eq!(s.stone, 0);
    }

    #[test]
    fn test_morale_caps() {
        let mut s = Stockpile {
            morale: 98,
            ..Default::default()
        };
        s.add_morale(10);
        assert_eq!(s.morale, MORALE_CAP);
    }
}

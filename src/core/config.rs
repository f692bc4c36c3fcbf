//! World construction parameters
//!
//! Construction is the only fallible operation in the crate: a config that
//! cannot describe a valid world is rejected before any entity is created.

use crate::core::error::{Result, SimError};

/// Parameters for creating a new world
///
/// Initial entity counts are scattered uniformly over the grid. People are
/// assigned to tribes round-robin; predators to packs the same way.
#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub initial_people: u32,
    pub initial_food: u32,
    pub initial_predators: u32,
    pub initial_trees: u32,
    pub initial_stone: u32,
    pub initial_iron: u32,
    pub num_tribes: u32,
    pub num_predator_packs: u32,
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            initial_people: 20,
            initial_food: 50,
            initial_predators: 2,
            initial_trees: 30,
            initial_stone: 10,
            initial_iron: 5,
            num_tribes: 3,
            num_predator_packs: 1,
            seed: 0,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidConfig(format!(
                "grid dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let cells = self.width as u64 * self.height as u64;
        if self.initial_people as u64 > cells * 8 {
            return Err(SimError::InvalidConfig(format!(
                "{} people cannot reasonably fit on a {}x{} grid",
                self.initial_people, self.width, self.height
            )));
        }
        Ok(())
    }
}

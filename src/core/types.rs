//! Core identifier and coordinate types used throughout the codebase

use serde::{Deserialize, Serialize};

/// Unique identifier for entities, assigned monotonically by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Unique identifier for tribes; monotonic, never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TribeId(pub u32);

/// Simulation tick counter (discrete time unit)
pub type Tick = u64;

/// Grid cell coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance (used for memory sorting and tribe splitting)
    pub fn manhattan(&self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (matches 8-directional movement cost)
    pub fn chebyshev(&self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Pos::new(0, 0).manhattan(Pos::new(3, 4)), 7);
        assert_eq!(Pos::new(2, 2).manhattan(Pos::new(2, 2)), 0);
    }

    #[test]
    fn test_chebyshev_distance() {
        assert_eq!(Pos::new(0, 0).chebyshev(Pos::new(3, 4)), 4);
        assert_eq!(Pos::new(5, 5).chebyshev(Pos::new(4, 4)), 1);
    }

    #[test]
    fn test_entity_id_hash() {
        use std::collections::HashMap;
        let mut map: HashMap<EntityId, &str> = HashMap::new();
        map.insert(EntityId(1), "person");
        assert_eq!(map.get(&EntityId(1)), Some(&"person"));
    }
}

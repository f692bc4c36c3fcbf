//! Spatial layer: the occupancy grid and pathfinding over it

pub mod grid;
pub mod pathfinding;

pub use grid::WorldGrid;
pub use pathfinding::{a_star, IMPASSABLE};

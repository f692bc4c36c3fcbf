//! Tribal layer: shared stockpiles, diplomacy, government, research

pub mod politics;
pub mod research;
pub mod splitting;
pub mod stockpile;
pub mod tribe;

pub use research::Tech;
pub use stockpile::Stockpile;
pub use tribe::{Diplomacy, Government, Religion, Tribe, TribeRegistry, TribeTrait};

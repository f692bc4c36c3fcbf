//! Grid-based multi-agent civilization simulation engine
//!
//! A world is a bounded multi-occupancy grid inhabited by people,
//! predators and barbarians. People organize into tribes with shared
//! stockpiles, governments, religions and a tech tree; tribes trade,
//! ally, war and split. One call to [`WorldState::advance`] runs exactly
//! one tick and returns the events it produced.
//!
//! ```
//! use civgrid::{WorldConfig, WorldState};
//!
//! let mut world = WorldState::new(WorldConfig::default()).unwrap();
//! for _ in 0..10 {
//!     let events = world.advance();
//!     for event in &events {
//!         println!("{:?}", event);
//!     }
//! }
//! println!("{:?}", world.metrics());
//! ```

pub mod core;
pub mod entity;
pub mod society;
pub mod spatial;
pub mod world;

pub use crate::core::config::WorldConfig;
pub use crate::core::error::{Result, SimError};
pub use crate::core::types::{EntityId, Pos, Tick, TribeId};
pub use crate::world::{DeathCause, EntitySnapshot, Metrics, SimEvent, WorldState};

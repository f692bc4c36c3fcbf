//! World state and tick orchestration

pub mod cataclysms;
pub mod events;
pub mod observe;
pub mod registry;
pub mod state;
pub mod terrain;

pub use events::{DeathCause, Event, EventLog, SimEvent};
pub use observe::{EntitySnapshot, Metrics};
pub use registry::EntityRegistry;
pub use state::{Season, WorldState};

//! Simulation event log
//!
//! Events are the external notification channel: the log buffers events
//! during a tick and `advance` drains them to the caller.
//! Tracing output mirrors the log but is diagnostic only.

use serde::Serialize;
use tracing::info;

use crate::core::types::{EntityId, Pos, Tick, TribeId};
use crate::entity::BuildingKind;
use crate::society::{Diplomacy, Tech};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeathCause {
    Starvation,
    Plague,
    OldAge,
    Slain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    PersonDied {
        id: EntityId,
        cause: DeathCause,
    },
    TribeFormed {
        tribe: TribeId,
    },
    TribeSplit {
        from: TribeId,
        to: TribeId,
        rebels: usize,
    },
    WarDeclared {
        a: TribeId,
        b: TribeId,
    },
    WarEnded {
        a: TribeId,
        b: TribeId,
    },
    AllianceFormed {
        a: TribeId,
        b: TribeId,
    },
    TechResearched {
        tribe: TribeId,
        tech: Tech,
    },
    BuildingConstructed {
        tribe: Option<TribeId>,
        kind: BuildingKind,
        pos: Pos,
    },
    BarbarianWave {
        count: u32,
    },
    DroughtStarted,
    DroughtEnded,
    PlagueOutbreak {
        id: EntityId,
    },
}

impl SimEvent {
    pub fn from_diplomacy(a: TribeId, b: TribeId, relation: Diplomacy) -> Self {
        match relation {
            Diplomacy::War => SimEvent::WarDeclared { a, b },
            Diplomacy::Alliance => SimEvent::AllianceFormed { a, b },
            Diplomacy::Neutral => SimEvent::WarEnded { a, b },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub tick: Tick,
    pub kind: SimEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: Tick, kind: SimEvent) {
        info!(tick, event = ?kind, "sim event");
        self.events.push(Event { tick, kind });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    /// Takes every buffered event kind, leaving the log empty
    pub fn drain(&mut self) -> Vec<SimEvent> {
        self.events.drain(..).map(|e| e.kind).collect()
    }

    /// Event kinds recorded at or after the given log index
    pub fn since(&self, index: usize) -> Vec<SimEvent> {
        self.events[index.min(self.events.len())..]
            .iter()
            .map(|e| e.kind.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_returns_the_tail() {
        let mut log = EventLog::new();
        log.record(1, SimEvent::DroughtStarted);
        let mark = log.len();
        log.record(2, SimEvent::DroughtEnded);

        assert_eq!(log.since(mark), vec![SimEvent::DroughtEnded]);
        assert_eq!(log.since(99), Vec::<SimEvent>::new());
        assert_eq!(log.all().len(), 2);
    }
}

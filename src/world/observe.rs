//! Read-only views for external consumers
//!
//! Snapshots and metrics are plain serde values so a dashboard or test
//! can inspect the world without touching simulation state.

use serde::Serialize;

use crate::core::types::{EntityId, Pos, Tick, TribeId};
use crate::entity::{BuildingKind, Entity, Profession, ResourceKind};
use crate::world::state::{Season, WorldState};

#[derive(Debug, Clone, Serialize)]
pub enum SnapshotKind {
    Person {
        profession: Profession,
        energy: i32,
        infected: bool,
    },
    Predator,
    Barbarian,
    Resource(ResourceKind),
    Building(BuildingKind),
}

#[derive(Debug, Clone, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: SnapshotKind,
    pub pos: Pos,
    pub tribe: Option<TribeId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub tick: Tick,
    pub population: usize,
    pub predators: usize,
    pub barbarians: usize,
    pub buildings: usize,
    pub tribes: usize,
    pub active_wars: usize,
    pub average_energy: f64,
    pub season: Season,
    pub drought: bool,
}

impl WorldState {
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        let mut out: Vec<EntitySnapshot> = self
            .entities
            .iter()
            .filter_map(|(id, entity)| {
                let pos = self.grid.position(id)?;
                let (kind, tribe) = match entity {
                    Entity::Person(p) => (
                        SnapshotKind::Person {
                            profession: p.profession,
                            energy: p.energy,
                            infected: p.infected,
                        },
                        p.tribe,
                    ),
                    Entity::Predator(_) => (SnapshotKind::Predator, None),
                    Entity::Barbarian(_) => (SnapshotKind::Barbarian, None),
                    Entity::Resource(r) => (SnapshotKind::Resource(*r), None),
                    Entity::Building(b) => (SnapshotKind::Building(b.kind), b.tribe),
                };
                Some(EntitySnapshot {
                    id,
                    kind,
                    pos,
                    tribe,
                })
            })
            .collect();
        out.sort_by_key(|s| s.id);
        out
    }

    pub fn metrics(&self) -> Metrics {
        let mut population = 0;
        let mut predators = 0;
        let mut barbarians = 0;
        let mut buildings = 0;
        let mut energy_sum = 0i64;
        for (_, entity) in self.entities.iter() {
            match entity {
                Entity::Person(p) => {
                    population += 1;
                    energy_sum += p.energy as i64;
                }
                Entity::Predator(_) => predators += 1,
                Entity::Barbarian(_) => barbarians += 1,
                Entity::Building(_) => buildings += 1,
                Entity::Resource(_) => {}
            }
        }
        let active_wars = self
            .tribes
            .pairs()
            .iter()
            .filter(|(a, b)| self.tribes.at_war(*a, *b))
            .count();
        Metrics {
            tick: self.tick,
            population,
            predators,
            barbarians,
            buildings,
            tribes: self.tribes.len(),
            active_wars,
            average_energy: if population > 0 {
                energy_sum as f64 / population as f64
            } else {
                0.0
            },
            season: self.season,
            drought: self.drought,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;

    #[test]
    fn test_snapshot_covers_every_placed_entity() {
        let world = WorldState::new(WorldConfig::default()).unwrap();
        let snapshot = world.snapshot();
        assert_eq!(snapshot.len(), world.grid.len());
    }

    #[test]
    fn test_metrics_counts_match_config() {
        let world = WorldState::new(WorldConfig::default()).unwrap();
        let metrics = world.metrics();
        assert_eq!(metrics.population, 20);
        assert_eq!(metrics.predators, 2);
        assert_eq!(metrics.tribes, 3);
        assert_eq!(metrics.active_wars, 0);
        assert!((metrics.average_energy - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = WorldState::new(WorldConfig::default()).unwrap();
        let json = serde_json::to_string(&world.snapshot()).unwrap();
        assert!(json.contains("Person"));
    }
}

//! The world: grid, entity arena, tribes, RNG and the tick loop
//!
//! All randomness flows through the single ChaCha8 stream seeded from the
//! config, so one seed fixes the entire run.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::debug;

use crate::core::config::WorldConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Pos, Tick, TribeId};
use crate::entity::{
    barbarian, buildings, person, predator, BuildingKind, Entity, Person, Predator, ResourceKind,
};
use crate::society::{politics, research, splitting, TribeRegistry};
use crate::spatial::pathfinding::IMPASSABLE;
use crate::spatial::WorldGrid;
use crate::world::events::{EventLog, SimEvent};
use crate::world::registry::EntityRegistry;
use crate::world::{cataclysms, terrain};

pub const SEASON_LENGTH: Tick = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn at(tick: Tick) -> Season {
        match (tick / SEASON_LENGTH) % 4 {
            0 => Season::Spring,
            1 => Season::Summer,
            2 => Season::Autumn,
            _ => Season::Winter,
        }
    }
}

pub struct WorldState {
    pub config: WorldConfig,
    pub tick: Tick,
    pub rng: ChaCha8Rng,
    pub grid: WorldGrid,
    pub entities: EntityRegistry,
    pub tribes: TribeRegistry,
    pub season: Season,
    pub drought: bool,
    pub barbarian_timer: u32,
    pub next_pack_id: u32,
    pub log: EventLog,
}

impl WorldState {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut world = Self {
            grid: WorldGrid::new(config.width, config.height),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick: 0,
            entities: EntityRegistry::new(),
            tribes: TribeRegistry::new(),
            season: Season::Spring,
            drought: false,
            barbarian_timer: cataclysms::BARBARIAN_WAVE_INTERVAL,
            next_pack_id: 0,
            log: EventLog::new(),
            config,
        };
        world.populate();
        Ok(world)
    }

    fn populate(&mut self) {
        let cfg = self.config.clone();
        for _ in 0..cfg.num_tribes {
            let id = self.tribes.found(&mut self.rng);
            self.record(SimEvent::TribeFormed { tribe: id });
        }
        let tribe_ids = self.tribes.ids();

        for i in 0..cfg.initial_people {
            let tribe = if tribe_ids.is_empty() {
                None
            } else {
                Some(tribe_ids[i as usize % tribe_ids.len()])
            };
            let person = Person::new(&mut self.rng, tribe);
            let pos = self.random_cell();
            self.spawn(Entity::Person(person), pos);
        }

        // Terrain flows around the settlers already placed
        terrain::generate(self);

        for (kind, count) in [
            (ResourceKind::Food, cfg.initial_food),
            (ResourceKind::Tree, cfg.initial_trees),
            (ResourceKind::Stone, cfg.initial_stone),
            (ResourceKind::IronOre, cfg.initial_iron),
        ] {
            for _ in 0..count {
                if let Some(pos) = self.random_open_cell() {
                    self.spawn(Entity::Resource(kind), pos);
                }
            }
        }

        let packs = cfg.num_predator_packs.max(1);
        self.next_pack_id = packs;
        for i in 0..cfg.initial_predators {
            let pack = Some(i % packs);
            if let Some(pos) = self.random_open_cell() {
                self.spawn(Entity::Predator(Predator::new(pack)), pos);
            }
        }
    }

    /// Run one tick; returns the events it produced
    pub fn advance(&mut self) -> Vec<SimEvent> {
        self.tick += 1;

        cataclysms::step_world_events(self);
        self.step_politics_and_research();
        self.step_splits();
        self.step_agents();
        cataclysms::step_respawn_and_migration(self);

        self.log.drain()
    }

    fn step_politics_and_research(&mut self) {
        for tribe_id in self.tribes.ids() {
            let members = self.tribe_members(tribe_id);
            if let Some(tribe) = self.tribes.get_mut(tribe_id) {
                politics::elect_leader(tribe, &members, &mut self.rng);
            }
        }
        let changes = politics::step_diplomacy(&mut self.tribes, &mut self.rng);
        for (a, b, relation) in changes {
            self.record(SimEvent::from_diplomacy(a, b, relation));
        }
        for tribe_id in self.tribes.ids() {
            if let Some(tribe) = self.tribes.get_mut(tribe_id) {
                if let Some(tech) = research::step_research(tribe, &mut self.rng) {
                    self.record(SimEvent::TechResearched {
                        tribe: tribe_id,
                        tech,
                    });
                }
            }
        }
    }

    fn step_splits(&mut self) {
        for tribe_id in self.tribes.ids() {
            let members = self.tribe_member_positions(tribe_id);
            let outcome =
                match splitting::maybe_split(tribe_id, &members, &mut self.tribes, &mut self.rng) {
                    Some(o) => o,
                    None => continue,
                };
            for rebel in &outcome.rebels {
                if let Some(person) = self.entities.get_mut(*rebel).and_then(Entity::as_person_mut)
                {
                    person.tribe = Some(outcome.new_tribe);
                }
            }
            self.record(SimEvent::TribeSplit {
                from: tribe_id,
                to: outcome.new_tribe,
                rebels: outcome.rebels.len(),
            });
        }
    }

    fn step_agents(&mut self) {
        let mut ids = self.entities.ids();
        ids.sort_unstable();
        ids.shuffle(&mut self.rng);
        for id in ids {
            // Mid-tick casualties fail this checkout and are skipped
            let mut entity = match self.entities.take(id) {
                Some(e) => e,
                None => continue,
            };
            let alive = match &mut entity {
                Entity::Person(p) => person::step(self, id, p),
                Entity::Predator(p) => predator::step(self, id, p),
                Entity::Barbarian(b) => barbarian::step(self, id, b),
                Entity::Building(b) if b.kind == BuildingKind::Farm => {
                    buildings::step_farm(self, id, b);
                    true
                }
                _ => true,
            };
            if alive {
                self.entities.restore(id, entity);
            } else {
                self.grid.remove(id);
                debug!(?id, "agent removed");
            }
        }
    }

    pub fn record(&mut self, kind: SimEvent) {
        self.log.record(self.tick, kind);
    }

    /// Insert an entity and place it on the grid
    pub fn spawn(&mut self, entity: Entity, pos: Pos) -> EntityId {
        let id = self.entities.insert(entity);
        self.grid.place(id, pos);
        id
    }

    /// Remove an entity from both grid and arena. Idempotent.
    pub fn kill(&mut self, id: EntityId) {
        self.grid.remove(id);
        self.entities.remove(id);
    }

    pub fn random_cell(&mut self) -> Pos {
        Pos::new(
            self.rng.gen_range(0..self.grid.width()),
            self.rng.gen_range(0..self.grid.height()),
        )
    }

    /// A random cell holding no Mountain or River, if one can be found
    /// in a bounded number of draws
    pub fn random_open_cell(&mut self) -> Option<Pos> {
        for _ in 0..64 {
            let pos = self.random_cell();
            let blocked = self.grid.contents(pos).iter().any(|id| {
                matches!(
                    self.entities.get(*id),
                    Some(Entity::Resource(ResourceKind::Mountain))
                        | Some(Entity::Resource(ResourceKind::River))
                )
            });
            if !blocked {
                return Some(pos);
            }
        }
        None
    }

    /// Terrain cost for a person of the given tribe: mountains and
    /// foreign walls block, everything else costs 1
    pub fn movement_cost(&self, pos: Pos, tribe: Option<TribeId>) -> u32 {
        for id in self.grid.contents(pos) {
            match self.entities.get(*id) {
                Some(Entity::Resource(ResourceKind::Mountain)) => return IMPASSABLE,
                Some(Entity::Building(b)) if b.kind == BuildingKind::Wall => {
                    let own = tribe.is_some() && b.tribe == tribe;
                    if !own {
                        return IMPASSABLE;
                    }
                }
                _ => {}
            }
        }
        1
    }

    /// Terrain cost for predators and barbarians: every wall blocks
    pub fn movement_cost_beast(&self, pos: Pos) -> u32 {
        for id in self.grid.contents(pos) {
            match self.entities.get(*id) {
                Some(Entity::Resource(ResourceKind::Mountain)) => return IMPASSABLE,
                Some(Entity::Building(b)) if b.kind == BuildingKind::Wall => return IMPASSABLE,
                _ => {}
            }
        }
        1
    }

    pub fn population(&self) -> usize {
        self.entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Person(_)))
            .count()
    }

    pub fn tribe_population(&self, tribe: TribeId) -> usize {
        self.entities
            .iter()
            .filter(|(_, e)| matches!(e, Entity::Person(p) if p.tribe == Some(tribe)))
            .count()
    }

    /// Living members with age and profession, for elections
    pub fn tribe_members(&self, tribe: TribeId) -> Vec<politics::Member> {
        let mut members: Vec<politics::Member> = self
            .entities
            .iter()
            .filter_map(|(id, e)| match e {
                Entity::Person(p) if p.tribe == Some(tribe) => Some((id, p.age, p.profession)),
                _ => None,
            })
            .collect();
        members.sort_unstable_by_key(|(id, _, _)| *id);
        members
    }

    /// Living members with positions, for split checks
    pub fn tribe_member_positions(&self, tribe: TribeId) -> Vec<(EntityId, Pos)> {
        let mut members: Vec<(EntityId, Pos)> = self
            .entities
            .iter()
            .filter_map(|(id, e)| match e {
                Entity::Person(p) if p.tribe == Some(tribe) => {
                    self.grid.position(id).map(|pos| (id, pos))
                }
                _ => None,
            })
            .collect();
        members.sort_unstable_by_key(|(id, _)| *id);
        members
    }

    /// Predators within a Chebyshev radius, the center cell included
    pub fn predators_near(&self, center: Pos, radius: i32) -> Vec<(EntityId, Pos)> {
        let mut found = Vec::new();
        let mut cells = vec![center];
        cells.extend(self.grid.neighborhood(center, radius));
        for pos in cells {
            for id in self.grid.contents_sorted(pos) {
                if matches!(self.entities.get(id), Some(Entity::Predator(_))) {
                    found.push((id, pos));
                }
            }
        }
        found
    }

    /// People within a Chebyshev radius, the center cell included
    pub fn people_near(&self, center: Pos, radius: i32) -> Vec<(EntityId, Pos)> {
        let mut found = Vec::new();
        let mut cells = vec![center];
        cells.extend(self.grid.neighborhood(center, radius));
        for pos in cells {
            for id in self.grid.contents_sorted(pos) {
                if matches!(self.entities.get(id), Some(Entity::Person(_))) {
                    found.push((id, pos));
                }
            }
        }
        found
    }

    /// Whether this person is their tribe's current leader
    pub fn is_leader(&self, id: EntityId, tribe: Option<TribeId>) -> bool {
        tribe
            .and_then(|t| self.tribes.get(t))
            .map_or(false, |t| t.leader == Some(id))
    }

    pub fn count_kind<F>(&self, pred: F) -> usize
    where
        F: Fn(&Entity) -> bool,
    {
        self.entities.iter().filter(|(_, e)| pred(e)).count()
    }

    /// Fresh pack id for migrating predators
    pub fn allocate_pack(&mut self) -> u32 {
        let id = self.next_pack_id;
        self.next_pack_id += 1;
        id
    }
}

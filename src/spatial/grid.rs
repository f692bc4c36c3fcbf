//! Occupancy grid
//!
//! The grid is the single source of truth for entity positions: every
//! entity id appears in exactly one cell's stack and in the reverse
//! `positions` index, kept in lock-step by `place`, `shift` and `remove`.
//! Cells stack freely; walkability is decided by the movement cost
//! function, not by occupancy.

use ahash::AHashMap;

use crate::core::types::{EntityId, Pos};

#[derive(Debug, Clone)]
pub struct WorldGrid {
    width: i32,
    height: i32,
    cells: Vec<Vec<EntityId>>,
    positions: AHashMap<EntityId, Pos>,
}

impl WorldGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as i32, height as i32);
        Self {
            width,
            height,
            cells: vec![Vec::new(); (width * height) as usize],
            positions: AHashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Insert an entity at a position. The id must not already be placed.
    pub fn place(&mut self, id: EntityId, pos: Pos) {
        debug_assert!(self.in_bounds(pos), "place out of bounds: {:?}", pos);
        debug_assert!(
            !self.positions.contains_key(&id),
            "entity {:?} placed twice",
            id
        );
        let idx = self.index(pos);
        self.cells[idx].push(id);
        self.positions.insert(id, pos);
    }

    /// Move a placed entity to a new position
    pub fn shift(&mut self, id: EntityId, to: Pos) {
        debug_assert!(self.in_bounds(to), "shift out of bounds: {:?}", to);
        if let Some(from) = self.positions.get(&id).copied() {
            if from == to {
                return;
            }
            let idx = self.index(from);
            self.cells[idx].retain(|e| *e != id);
            let idx = self.index(to);
            self.cells[idx].push(id);
            self.positions.insert(id, to);
        }
    }

    /// Remove an entity from the grid entirely. Idempotent.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(pos) = self.positions.remove(&id) {
            let idx = self.index(pos);
            self.cells[idx].retain(|e| *e != id);
        }
    }

    pub fn position(&self, id: EntityId) -> Option<Pos> {
        self.positions.get(&id).copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Entity ids stacked on a cell, in insertion order
    pub fn contents(&self, pos: Pos) -> &[EntityId] {
        if self.in_bounds(pos) {
            &self.cells[self.index(pos)]
        } else {
            &[]
        }
    }

    /// Ids on a cell sorted by id, for order-stable enumeration
    pub fn contents_sorted(&self, pos: Pos) -> Vec<EntityId> {
        let mut ids = self.contents(pos).to_vec();
        ids.sort_unstable();
        ids
    }

    /// In-bounds cells within a Chebyshev radius, the center excluded,
    /// scanned in row-major order
    pub fn neighborhood(&self, center: Pos, radius: i32) -> Vec<Pos> {
        let mut cells = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let pos = Pos::new(center.x + dx, center.y + dy);
                if self.in_bounds(pos) {
                    cells.push(pos);
                }
            }
        }
        cells
    }

    /// The 8 adjacent cells that are in bounds
    pub fn adjacent(&self, center: Pos) -> Vec<Pos> {
        self.neighborhood(center, 1)
    }

    pub fn iter_positions(&self) -> impl Iterator<Item = (EntityId, Pos)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }
}

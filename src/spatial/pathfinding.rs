//! A* routing over the occupancy grid
//!
//! Terrain cost is supplied by the caller as a closure so the same search
//! serves contexts with different wall ownership. Diagonal steps cost the
//! same as cardinal ones, so the Chebyshev distance is an admissible
//! heuristic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::core::types::Pos;
use crate::spatial::grid::WorldGrid;

/// Cost at or above this marks a cell the search will not enter
pub const IMPASSABLE: u32 = 100;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Shortest path from `start` to `goal`, excluding `start` and including
/// `goal`. Returns `None` when no route exists; a goal on impassable
/// terrain is unroutable like any other blocked cell.
pub fn a_star<F>(grid: &WorldGrid, start: Pos, goal: Pos, cost: F) -> Option<Vec<Pos>>
where
    F: Fn(Pos) -> u32,
{
    if start == goal {
        return Some(Vec::new());
    }
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return None;
    }

    // Heap entries are (f, h, pos); the h component breaks f ties in
    // favor of nodes closer to the goal.
    let mut open: BinaryHeap<Reverse<(u32, u32, Pos)>> = BinaryHeap::new();
    let mut g_score: AHashMap<Pos, u32> = AHashMap::new();
    let mut came_from: AHashMap<Pos, Pos> = AHashMap::new();

    g_score.insert(start, 0);
    let h0 = start.chebyshev(goal) as u32;
    open.push(Reverse((h0, h0, start)));

    while let Some(Reverse((_, _, current))) = open.pop() {
        if current == goal {
            let mut path = vec![current];
            let mut node = current;
            while let Some(prev) = came_from.get(&node) {
                node = *prev;
                if node == start {
                    break;
                }
                path.push(node);
            }
            path.reverse();
            return Some(path);
        }

        let current_g = g_score[&current];
        for (dx, dy) in DIRECTIONS {
            let next = Pos::new(current.x + dx, current.y + dy);
            if !grid.in_bounds(next) {
                continue;
            }
            let step = cost(next);
            if step >= IMPASSABLE {
                continue;
            }
            let tentative = current_g + step.max(1);
            if g_score.get(&next).map_or(true, |g| tentative < *g) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                let h = next.chebyshev(goal) as u32;
                open.push(Reverse((tentative + h, h, next)));
            }
        }
    }

    None
}

/// One exploratory step when no target is known: pick among the given
/// `(cell, cost)` candidates with probability inversely proportional to
/// terrain cost. Returns `None` when the agent is boxed in.
pub fn explore_step<R>(candidates: &[(Pos, u32)], rng: &mut R) -> Option<Pos>
where
    R: Rng,
{
    let mut cells = Vec::new();
    let mut weights = Vec::new();
    for (pos, cost) in candidates {
        if *cost < IMPASSABLE {
            cells.push(*pos);
            weights.push(1.0 / (*cost).max(1) as f64);
        }
    }
    if cells.is_empty() {
        return None;
    }
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(cells[dist.sample(rng)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat(_: Pos) -> u32 {
        1
    }

    #[test]
    fn test_straight_line_path() {
        let grid = WorldGrid::new(10, 10);
        let path = a_star(&grid, Pos::new(0, 0), Pos::new(3, 0), flat)
            .unwrap_or_else(|| panic!("open grid must be routable"));

        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(&Pos::new(3, 0)));
        assert!(!path.contains(&Pos::new(0, 0)), "path must exclude start");
    }

    #[test]
    fn test_diagonal_shortcut() {
        let grid = WorldGrid::new(10, 10);
        let path = a_star(&grid, Pos::new(0, 0), Pos::new(4, 4), flat).unwrap();
        // Diagonal steps cost 1, so the route is 4 cells long
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_routes_around_wall() {
        let grid = WorldGrid::new(5, 5);
        // Vertical wall at x == 2 with a gap at y == 4
        let cost = |p: Pos| {
            if p.x == 2 && p.y < 4 {
                IMPASSABLE
            } else {
                1
            }
        };
        let path = a_star(&grid, Pos::new(0, 0), Pos::new(4, 0), cost).unwrap();

        assert!(path.iter().all(|p| !(p.x == 2 && p.y < 4)));
        assert_eq!(path.last(), Some(&Pos::new(4, 0)));
    }

    #[test]
    fn test_unreachable_goal() {
        let grid = WorldGrid::new(5, 5);
        // Solid wall at x == 2
        let cost = |p: Pos| if p.x == 2 { IMPASSABLE } else { 1 };

        assert_eq!(a_star(&grid, Pos::new(0, 0), Pos::new(4, 0), cost), None);
    }

    #[test]
    fn test_impassable_goal_is_unroutable() {
        let grid = WorldGrid::new(5, 5);
        let goal = Pos::new(2, 2);
        let cost = move |p: Pos| if p == goal { IMPASSABLE } else { 1 };

        assert_eq!(a_star(&grid, Pos::new(0, 0), goal, cost), None);
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = WorldGrid::new(5, 5);
        let path = a_star(&grid, Pos::new(1, 1), Pos::new(1, 1), flat).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn test_explore_step_avoids_impassable() {
        let grid = WorldGrid::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let candidates: Vec<(Pos, u32)> = grid
            .adjacent(Pos::new(1, 1))
            .into_iter()
            .map(|p| (p, if p.x == 0 { IMPASSABLE } else { 1 }))
            .collect();

        for _ in 0..50 {
            let step = explore_step(&candidates, &mut rng)
                .unwrap_or_else(|| panic!("open cells remain"));
            assert_ne!(step.x, 0);
        }
    }

    #[test]
    fn test_explore_step_boxed_in() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let candidates = [(Pos::new(0, 0), IMPASSABLE), (Pos::new(1, 0), IMPASSABLE)];
        assert_eq!(explore_step(&candidates, &mut rng), None);
    }
}

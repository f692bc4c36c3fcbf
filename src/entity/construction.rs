//! Construction planning
//!
//! A builder standing on a cell walks a fixed priority ladder and erects
//! the first structure whose resource gate and placement rule both hold.
//! Poor tribes (no science yet) hoard a higher wood reserve before
//! spending it on houses and roads.

use crate::core::types::{Pos, TribeId};
use crate::entity::{Building, BuildingKind, Entity};
use crate::world::events::SimEvent;
use crate::world::state::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildPlan {
    pub kind: BuildingKind,
    pub wood: u32,
    pub stone: u32,
}

fn has_building(world: &WorldState, pos: Pos, kind: BuildingKind) -> bool {
    world
        .grid
        .contents(pos)
        .iter()
        .any(|id| world.entities.get(*id).map_or(false, |e| e.is_building(kind)))
}

fn has_any_building(world: &WorldState, pos: Pos) -> bool {
    world
        .grid
        .contents(pos)
        .iter()
        .any(|id| world.entities.get(*id).map_or(false, Entity::is_any_building))
}

/// A cell is open for `kind` when every building already there is a
/// Road or Barracks, and none of them is `kind` itself
fn cell_open(world: &WorldState, pos: Pos, kind: BuildingKind) -> bool {
    world.grid.contents(pos).iter().all(|id| {
        match world.entities.get(*id) {
            Some(Entity::Building(b)) => {
                b.kind != kind
                    && matches!(b.kind, BuildingKind::Road | BuildingKind::Barracks)
            }
            _ => true,
        }
    })
}

fn adjacent_to(world: &WorldState, pos: Pos, kinds: &[BuildingKind]) -> bool {
    world
        .grid
        .adjacent(pos)
        .into_iter()
        .any(|cell| kinds.iter().any(|k| has_building(world, cell, *k)))
}

/// First rung of the ladder that fires for this tribe at this cell
pub fn plan(world: &WorldState, tribe_id: TribeId, pos: Pos) -> Option<BuildPlan> {
    let tribe = world.tribes.get(tribe_id)?;
    let s = &tribe.stockpile;
    // Pre-literate tribes keep a deeper wood reserve
    let save = if s.science == 0 { 25 } else { 15 };

    let rung = |kind, wood, stone| Some(BuildPlan { kind, wood, stone });

    if s.science == 0
        && s.wood >= 15
        && s.stone >= 15
        && cell_open(world, pos, BuildingKind::Library)
    {
        return rung(BuildingKind::Library, 15, 15);
    }
    if world.tribe_population(tribe_id) > 5
        && s.wood >= 15
        && s.stone >= 15
        && cell_open(world, pos, BuildingKind::Barracks)
    {
        return rung(BuildingKind::Barracks, 15, 15);
    }
    if s.wood >= 20 && s.stone >= 20 && cell_open(world, pos, BuildingKind::Library) {
        return rung(BuildingKind::Library, 15, 15);
    }
    if s.wood >= 12 && s.stone >= 6 && cell_open(world, pos, BuildingKind::Hospital) {
        return rung(BuildingKind::Hospital, 10, 5);
    }
    if s.wood >= 12 && s.stone >= 12 && cell_open(world, pos, BuildingKind::Temple) {
        return rung(BuildingKind::Temple, 10, 10);
    }
    if s.wood >= 10 && s.food > 50 && cell_open(world, pos, BuildingKind::Tavern) {
        return rung(BuildingKind::Tavern, 8, 2);
    }
    if s.wood > save && s.stone > 10 && s.iron > 0 && cell_open(world, pos, BuildingKind::Smithy)
    {
        return rung(BuildingKind::Smithy, 3, 3);
    }
    if s.food < 50
        && (s.wood > save || s.food < 20)
        && s.wood >= 2
        && s.stone >= 2
        && cell_open(world, pos, BuildingKind::Farm)
    {
        return rung(BuildingKind::Farm, 2, 2);
    }
    if s.stone > save
        && !has_any_building(world, pos)
        && adjacent_to(world, pos, &[BuildingKind::House, BuildingKind::Farm])
    {
        return rung(BuildingKind::Wall, 0, 3);
    }
    if s.wood >= 15 && s.stone >= 15 && cell_open(world, pos, BuildingKind::Market) {
        return rung(BuildingKind::Market, 15, 15);
    }
    if s.stone > save
        && !has_any_building(world, pos)
        && adjacent_to(
            world,
            pos,
            &[
                BuildingKind::House,
                BuildingKind::Farm,
                BuildingKind::Smithy,
                BuildingKind::Market,
                BuildingKind::Road,
            ],
        )
    {
        return rung(BuildingKind::Road, 0, 1);
    }
    if s.wood > save && cell_open(world, pos, BuildingKind::House) {
        return rung(BuildingKind::House, 3, 0);
    }
    None
}

/// Re-plan against live state, pay, and place. Deduction and placement
/// are atomic; a stale plan simply becomes a no-op.
pub fn execute(world: &mut WorldState, tribe_id: TribeId, pos: Pos) -> bool {
    let plan = match plan(world, tribe_id, pos) {
        Some(p) => p,
        None => return false,
    };
    let paid = world
        .tribes
        .get_mut(tribe_id)
        .map_or(false, |t| t.stockpile.spend(plan.wood, plan.stone));
    if !paid {
        return false;
    }
    world.spawn(
        Entity::Building(Building::new(plan.kind, Some(tribe_id))),
        pos,
    );
    world.record(SimEvent::BuildingConstructed {
        tribe: Some(tribe_id),
        kind: plan.kind,
        pos,
    });
    true
}

//! Maneuver producers.
//!
//! A producer is a lazy iterator of candidate maneuvers. The agent pulls
//! from its producers in turn, so nothing is materialized up front.

use tactics_core::action::{self, ShipAction};
use tactics_core::{ActionKind, ActionRef, Battle, ShipId, Target};

use super::maneuver::{Maneuver, SearchContext};
use super::simulator;

/// Resumable source of candidate maneuvers.
pub type Producer<'a> = Box<dyn Iterator<Item = Maneuver> + Send + 'a>;

/// Cells per side of the arena scan grid.
pub const GRID_CELLS: usize = 10;

// Seed contexts, one per grid, so that two grids do not share jitter.
const BLAST_GRID: u32 = 0x100;
const DRONE_GRID: u32 = 0x300;
const MOVE_GRID: u32 = 0x500;

/// Default producers, in the order they are polled.
pub fn defaults<'a>(ctx: SearchContext<'a>) -> Vec<Producer<'a>> {
    vec![
        end_turn(ctx),
        direct_shots(ctx),
        blast_shots(ctx),
        toggle_actions(ctx),
        drone_deployments(ctx),
        random_moves(ctx),
    ]
}

/// Actions the ship may use right now, matching a filter.
fn playable<'a>(
    ctx: &SearchContext<'a>,
    filter: impl Fn(&ActionKind) -> bool,
) -> Vec<ActionRef> {
    action::available_actions(ctx.ship)
        .into_iter()
        .filter(|action| {
            ctx.action(*action).is_some_and(|resolved| {
                resolved.kind().is_some_and(&filter)
                    && action::unavailability(ctx.battle, ctx.ship, resolved).is_none()
            })
        })
        .collect()
}

/// Jittered points, one per cell of a `cells` x `cells` grid over the arena.
///
/// The jitter is rolled from the battle seed, so a given battle state always
/// scans the same points.
pub fn scan_arena(
    battle: &Battle,
    ship: ShipId,
    cells: usize,
    context: u32,
    rng: &dyn tactics_core::RngOracle,
) -> Vec<Target> {
    let (width, height) = (battle.config.width, battle.config.height);
    (0..cells * cells)
        .map(|cell| {
            let (row, column) = (cell / cells, cell % cells);
            let salt = context.wrapping_add(2 * cell as u32);
            let jx = rng.unit(battle.roll_seed(ship.0, salt));
            let jy = rng.unit(battle.roll_seed(ship.0, salt + 1));
            Target::at(
                (column as f64 + jx) * width / cells as f64,
                (row as f64 + jy) * height / cells as f64,
            )
        })
        .collect()
}

pub fn end_turn<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    Box::new(
        core::iter::once(ActionRef::EndTurn)
            .filter_map(move |action| Maneuver::new(&ctx, action, Target::ship(ctx.ship))),
    )
}

/// Every (weapon, enemy) pair the ship can reach this turn, moving first if
/// needed.
pub fn direct_shots<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    let weapons = playable(&ctx, |kind| matches!(kind, ActionKind::FireWeapon(_)));
    let reach = simulator::best_engine(ctx.ship)
        .and_then(|(id, _)| ctx.action(ActionRef::Equipment(id)))
        .map_or(0.0, |engine| action::range_radius(ctx.ship, engine));
    let enemies: Vec<_> = ctx.battle.enemies_of(ctx.ship.id).map(Target::ship).collect();

    Box::new(weapons.into_iter().flat_map(move |weapon| {
        let range = ctx
            .action(weapon)
            .map_or(0.0, |resolved| action::range_radius(ctx.ship, resolved));
        enemies
            .clone()
            .into_iter()
            .filter(move |enemy| enemy.distance_to(ctx.ship.location()) <= range + reach)
            .filter_map(move |enemy| Maneuver::new(&ctx, weapon, enemy))
    }))
}

/// Blast shots between two close enemies, then on a grid scan of the arena
/// (keeping only points that hit someone).
pub fn blast_shots<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    let weapons: Vec<(ActionRef, f64)> = playable(&ctx, |kind| {
        matches!(kind, ActionKind::FireWeapon(weapon) if weapon.blast > 0.0)
    })
    .into_iter()
    .filter_map(|weapon| Some((weapon, action::blast_radius(ctx.action(weapon)?))))
    .collect();
    let enemies: Vec<_> = ctx.battle.enemies_of(ctx.ship.id).collect();

    let mut couples = Vec::new();
    for &(weapon, blast) in &weapons {
        for (index, first) in enemies.iter().enumerate() {
            for second in &enemies[index + 1..] {
                let (a, b) = (first.location(), second.location());
                if a.distance_to(b) < blast * 2.0 {
                    couples.push((weapon, Target::at((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)));
                }
            }
        }
    }

    let grid = scan_arena(ctx.battle, ctx.ship.id, GRID_CELLS, BLAST_GRID, ctx.rng);
    let scanned = weapons.into_iter().flat_map(move |(weapon, _)| {
        grid.clone()
            .into_iter()
            .filter(move |target| hits_someone(&ctx, weapon, target))
            .map(move |target| (weapon, target))
    });

    Box::new(
        couples
            .into_iter()
            .chain(scanned)
            .filter_map(move |(weapon, target)| Maneuver::new(&ctx, weapon, target)),
    )
}

fn hits_someone(ctx: &SearchContext<'_>, action: ActionRef, target: &Target) -> bool {
    ctx.action(action).is_some_and(|resolved: ShipAction<'_>| {
        !action::impacted_ships(ctx.battle, ctx.ship, resolved, target).is_empty()
    })
}

/// Self-targeted toggles and vigilance watches.
pub fn toggle_actions<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    let toggles = playable(&ctx, |kind| {
        matches!(kind, ActionKind::Toggle(_) | ActionKind::Vigilance(_))
    });
    Box::new(
        toggles
            .into_iter()
            .filter_map(move |toggle| Maneuver::new(&ctx, toggle, Target::ship(ctx.ship))),
    )
}

/// Drone deployments on a grid scan, where the drone would cover a ship.
pub fn drone_deployments<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    let bays = playable(&ctx, |kind| matches!(kind, ActionKind::DeployDrone(_)));
    let grid = scan_arena(ctx.battle, ctx.ship.id, GRID_CELLS, DRONE_GRID, ctx.rng);
    Box::new(bays.into_iter().flat_map(move |bay| {
        grid.clone()
            .into_iter()
            .filter(move |target| hits_someone(&ctx, bay, target))
            .filter_map(move |target| Maneuver::new(&ctx, bay, target))
    }))
}

/// Moves to every point of a grid scan, for each engine.
pub fn random_moves<'a>(ctx: SearchContext<'a>) -> Producer<'a> {
    let engines = playable(&ctx, |kind| matches!(kind, ActionKind::Move(_)));
    let grid = scan_arena(ctx.battle, ctx.ship.id, GRID_CELLS, MOVE_GRID, ctx.rng);
    Box::new(engines.into_iter().flat_map(move |engine| {
        grid.clone()
            .into_iter()
            .filter_map(move |target| Maneuver::new(&ctx, engine, target))
    }))
}

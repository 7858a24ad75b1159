use crate::diff::BattleDiff;
use crate::exclusion::ExclusionAreas;
use crate::geometry::{Location, Placement};
use crate::state::{PinLevel, Ship};

use super::{EffectContext, EffectSource};

/// Pushes `ship` away from the source, stopping before any hard exclusion area.
pub(super) fn on_diffs(
    ctx: &EffectContext<'_>,
    ship: &Ship,
    source: EffectSource,
    distance: f64,
) -> Vec<BattleDiff> {
    if ship.pin_level() == PinLevel::Hard {
        return Vec::new();
    }
    let Some(center) = source.location(ctx.battle) else {
        return Vec::new();
    };
    let start = ship.location();
    if start == center {
        return Vec::new();
    }

    let angle = center.angle_to(start);
    let pushed = Location::new(
        start.x + distance * angle.cos(),
        start.y + distance * angle.sin(),
    );
    let exclusion = ExclusionAreas::from_battle(ctx.battle, &[ship.id], 0.0);
    let end = exclusion.stop_before(pushed, start);
    if end == start {
        return Vec::new();
    }

    vec![BattleDiff::ShipMove {
        ship: ship.id,
        start: ship.placement,
        end: Placement::new(end.x, end.y, ship.placement.angle),
    }]
}

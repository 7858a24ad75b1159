use crate::action::ActionKind;
use crate::diff::BattleDiff;
use crate::state::{EquipmentId, Ship};

use super::{EffectContext, EffectSource};

/// Seed context for intruder payload rolls.
const WATCH_CONTEXT: u32 = 0x3a7c;

/// A ship entered the radius of an active vigilance: hit it with the
/// vigilance payload, count it, and switch the vigilance off at the cap.
pub(super) fn on_diffs(
    ctx: &EffectContext<'_>,
    intruder: &Ship,
    source: EffectSource,
    equipment: EquipmentId,
) -> Vec<BattleDiff> {
    let EffectSource::Ship(owner_id) = source else {
        return Vec::new();
    };
    let Some(owner) = ctx.battle.ship(owner_id) else {
        return Vec::new();
    };
    let Some(watcher) = owner.equipment(equipment) else {
        return Vec::new();
    };
    let Some(ActionKind::Vigilance(vigilance)) = &watcher.action else {
        return Vec::new();
    };
    let cap = vigilance.intruder_count;
    if !watcher.activated || (cap > 0 && watcher.intruders >= cap) {
        return Vec::new();
    }

    let magnitude = ctx.rng.unit(ctx.battle.roll_seed(owner_id.0, WATCH_CONTEXT));
    let mut diffs: Vec<BattleDiff> = vigilance
        .intruder_effects
        .iter()
        .flat_map(|effect| effect.on_diffs(ctx, intruder, source, magnitude))
        .collect();
    diffs.push(BattleDiff::ShipVigilanceTriggered {
        ship: owner_id,
        equipment,
        delta: 1,
    });

    let caught = watcher.intruders + 1;
    if cap > 0 && caught >= cap {
        diffs.push(BattleDiff::ShipActionToggled {
            ship: owner_id,
            equipment,
            activated: false,
        });
        diffs.push(BattleDiff::ShipVigilanceTriggered {
            ship: owner_id,
            equipment,
            delta: -(caught as i32),
        });
    }
    diffs
}

//! Value, transfer and cooldown effects.

use crate::diff::BattleDiff;
use crate::state::{Ship, ValueKind};

use super::{EffectContext, EffectSource};

/// Seed context for picking equipment to cool.
const COOLDOWN_PICK_CONTEXT: u32 = 0xc001;

pub(super) fn relative(ship: &Ship, value: ValueKind, delta: i32) -> Vec<BattleDiff> {
    if delta == 0 {
        Vec::new()
    } else {
        ship.value_diffs(value, delta, true)
    }
}

/// A value effect is harmful as soon as the "after" amount is lower than the
/// "before" amount, for either the on/off or the start/end pair.
pub(super) fn value_is_beneficial(on: i32, off: i32, start: i32, end: i32) -> bool {
    if off < -on || end < -start {
        false
    } else if (off != 0 && off == -on) || (end != 0 && end == -start) {
        on > 0 || start > 0
    } else {
        on > 0 || off > 0 || start > 0 || end > 0
    }
}

pub(super) fn transfer(
    ctx: &EffectContext<'_>,
    ship: &Ship,
    source: EffectSource,
    value: ValueKind,
    amount: i32,
) -> Vec<BattleDiff> {
    let EffectSource::Ship(source_id) = source else {
        return Vec::new();
    };
    let Some(source_ship) = ctx.battle.ship(source_id) else {
        return Vec::new();
    };

    let (giver, receiver) = if amount < 0 {
        (ship, source_ship)
    } else {
        (source_ship, ship)
    };
    let moved = giver.value(value).max(0).min(amount.saturating_abs());
    if moved == 0 || giver.id == receiver.id {
        return Vec::new();
    }

    vec![
        BattleDiff::ShipValue {
            ship: giver.id,
            value,
            delta: -moved,
        },
        BattleDiff::ShipValue {
            ship: receiver.id,
            value,
            delta: moved,
        },
    ]
}

pub(super) fn cooldown(
    ctx: &EffectContext<'_>,
    ship: &Ship,
    cooling: u32,
    maxcount: u32,
) -> Vec<BattleDiff> {
    let mut heated: Vec<_> = ship
        .equipment
        .iter()
        .filter(|equipment| equipment.cooldown.heat > 0)
        .collect();

    let cap = maxcount as usize;
    if cap > 0 && heated.len() > cap {
        // Deterministic Fisher-Yates, one roll per swap.
        let seed = ctx.battle.roll_seed(ship.id.0, COOLDOWN_PICK_CONTEXT);
        for index in (1..heated.len()).rev() {
            let roll = ctx.rng.range(seed.wrapping_add(index as u64), 0, index as u32);
            heated.swap(index, roll as usize);
        }
        heated.truncate(cap);
    }

    heated
        .into_iter()
        .map(|equipment| {
            let heat = equipment.cooldown.heat;
            BattleDiff::ShipCooldown {
                ship: ship.id,
                equipment: equipment.id,
                heat: if cooling == 0 { heat } else { cooling.min(heat) },
            }
        })
        .collect()
}

//! Duration-bound wrappers.
//!
//! A sticky entry replaces any entry with the same id instead of stacking.
//! Its duration ticks down at the end of the affected ship's turns; the tick
//! that would bring it to zero removes the entry instead, so removal happens
//! exactly once.

use crate::diff::BattleDiff;
use crate::state::Ship;

use super::{Effect, EffectContext, EffectKind, EffectSource, StickyMode};

pub(super) fn on_diffs(
    sticky: &Effect,
    base: &Effect,
    ctx: &EffectContext<'_>,
    ship: &Ship,
    source: EffectSource,
    magnitude: f64,
) -> Vec<BattleDiff> {
    let mut diffs = Vec::new();

    if let Some(existing) = ship.active_effects.get(sticky.id) {
        diffs.push(BattleDiff::ShipEffectRemoved {
            ship: ship.id,
            effect: existing.clone(),
        });
        diffs.extend(existing.off_diffs(ctx, ship));
    }

    diffs.push(BattleDiff::ShipEffectAdded {
        ship: ship.id,
        effect: sticky.clone(),
    });
    if matches!(
        sticky.kind,
        EffectKind::Sticky {
            mode: StickyMode::Immediate,
            ..
        }
    ) {
        diffs.extend(base.on_diffs(ctx, ship, source, magnitude));
    }
    diffs
}

pub(super) fn turn_start_diffs(
    base: &Effect,
    mode: StickyMode,
    ctx: &EffectContext<'_>,
    ship: &Ship,
) -> Vec<BattleDiff> {
    let mut diffs = Vec::new();
    if mode == StickyMode::TurnStart {
        diffs.extend(base.on_diffs(ctx, ship, EffectSource::Ship(ship.id), 0.0));
    }
    diffs.extend(base.turn_start_diffs(ctx, ship));
    diffs
}

pub(super) fn turn_end_diffs(sticky: &Effect, ctx: &EffectContext<'_>, ship: &Ship) -> Vec<BattleDiff> {
    let EffectKind::Sticky {
        base,
        duration,
        mode,
    } = &sticky.kind
    else {
        return Vec::new();
    };

    let mut diffs = Vec::new();
    if *mode == StickyMode::TurnEnd {
        diffs.extend(base.on_diffs(ctx, ship, EffectSource::Ship(ship.id), 0.0));
    }
    diffs.extend(base.turn_end_diffs(ctx, ship));

    if *duration > 1 {
        diffs.push(BattleDiff::ShipEffectChanged {
            ship: ship.id,
            effect: sticky.id,
            duration_delta: -1,
        });
    } else {
        diffs.push(BattleDiff::ShipEffectRemoved {
            ship: ship.id,
            effect: sticky.clone(),
        });
        diffs.extend(base.off_diffs(ctx, ship));
    }
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::tests::battle_with;
    use crate::rng::FixedRng;
    use crate::state::{AttributeKind, Battle, EffectId, ShipId, ValueKind};

    fn boost(duration: u32) -> Effect {
        Effect::sticky(
            EffectId(7),
            Effect::new(
                EffectId(8),
                EffectKind::Attribute {
                    attribute: AttributeKind::Precision,
                    value: 4,
                },
            ),
            duration,
        )
    }

    fn attach(battle: &mut Battle, effect: &Effect) {
        let rng = FixedRng(0);
        let diffs = {
            let ctx = EffectContext::new(battle, &rng);
            effect.on_diffs(
                &ctx,
                battle.ship(ShipId(1)).unwrap(),
                EffectSource::Ship(ShipId(1)),
                0.0,
            )
        };
        battle.apply_diffs(diffs);
    }

    fn end_turn(battle: &mut Battle) {
        let rng = FixedRng(0);
        let diffs = {
            let ctx = EffectContext::new(battle, &rng);
            let ship = battle.ship(ShipId(1)).unwrap();
            ship.active_effects
                .iter()
                .flat_map(|effect| effect.turn_end_diffs(&ctx, ship))
                .collect::<Vec<_>>()
        };
        battle.apply_diffs(diffs);
    }

    fn precision(battle: &Battle) -> i32 {
        battle.ship(ShipId(1)).unwrap().attribute(AttributeKind::Precision)
    }

    #[test]
    fn expires_after_duration() {
        let mut battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        attach(&mut battle, &boost(2));
        assert_eq!(precision(&battle), 4);

        end_turn(&mut battle);
        let entry = battle.ship(ShipId(1)).unwrap().active_effects.get(EffectId(7));
        assert_eq!(entry.and_then(Effect::duration), Some(1));
        assert_eq!(precision(&battle), 4);

        end_turn(&mut battle);
        assert!(battle.ship(ShipId(1)).unwrap().active_effects.is_empty());
        assert_eq!(precision(&battle), 0);
    }

    #[test]
    fn reattaching_replaces_the_entry() {
        let mut battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        attach(&mut battle, &boost(1));
        attach(&mut battle, &boost(3));
        let ship = battle.ship(ShipId(1)).unwrap();
        assert_eq!(ship.active_effects.len(), 1);
        assert_eq!(
            ship.active_effects.get(EffectId(7)).and_then(Effect::duration),
            Some(3)
        );
        assert_eq!(precision(&battle), 4);
    }

    #[test]
    fn deferred_modes_apply_on_turn_boundaries() {
        let mut battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        battle
            .ship_mut(ShipId(1))
            .unwrap()
            .values
            .get_mut(ValueKind::Shield)
            .current = 100;
        let regen = Effect::sticky_with_mode(
            EffectId(3),
            Effect::new(
                EffectId(4),
                EffectKind::Value {
                    value: ValueKind::Shield,
                    on: 10,
                    off: 0,
                    start: 0,
                    end: 0,
                },
            ),
            2,
            StickyMode::TurnEnd,
        );
        attach(&mut battle, &regen);
        assert_eq!(battle.ship(ShipId(1)).unwrap().value(ValueKind::Shield), 100);

        end_turn(&mut battle);
        end_turn(&mut battle);
        let ship = battle.ship(ShipId(1)).unwrap();
        assert_eq!(ship.value(ValueKind::Shield), 120);
        assert!(ship.active_effects.is_empty());
    }
}

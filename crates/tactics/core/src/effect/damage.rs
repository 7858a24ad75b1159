use crate::diff::BattleDiff;
use crate::state::{Ship, ValueKind};

/// Damage multiplier from the ship's damage modifiers, summed and clamped to
/// +/-100%.
pub fn damage_factor(ship: &Ship) -> f64 {
    f64::from(ship.damage_modifier().clamp(-100, 100) + 100) / 100.0
}

pub(super) fn on_diffs(ship: &Ship, base: i32, span: i32, magnitude: f64) -> Vec<BattleDiff> {
    let raw = f64::from(base) + f64::from(span) * magnitude.clamp(0.0, 1.0);
    let theoretical = (raw * damage_factor(ship)).round() as i32;

    let mut remaining = theoretical.max(0);
    let shield = remaining.min(ship.value(ValueKind::Shield).max(0));
    remaining -= shield;
    let hull = remaining.min(ship.value(ValueKind::Hull).max(0));

    if shield == 0 && hull == 0 {
        return Vec::new();
    }

    let mut diffs = vec![BattleDiff::ShipDamage {
        ship: ship.id,
        hull,
        shield,
        theoretical,
    }];
    if shield != 0 {
        diffs.push(BattleDiff::ShipValue {
            ship: ship.id,
            value: ValueKind::Shield,
            delta: -shield,
        });
    }
    if hull != 0 {
        diffs.push(BattleDiff::ShipValue {
            ship: ship.id,
            value: ValueKind::Hull,
            delta: -hull,
        });
    }
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::tests::battle_with;
    use crate::effect::{Effect, EffectKind};
    use crate::state::{EffectId, ShipId};

    fn hit(ship: &Ship, amount: i32) -> Vec<BattleDiff> {
        on_diffs(ship, amount, 0, 0.0)
    }

    #[test]
    fn shield_absorbs_first_then_hull() {
        let mut battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        let mut check = |amount: i32, shield: i32, hull: i32| {
            let diffs = hit(battle.ship(ShipId(1)).unwrap(), amount);
            battle.apply_diffs(diffs);
            let ship = battle.ship(ShipId(1)).unwrap();
            assert_eq!(ship.value(ValueKind::Shield), shield, "after {amount}");
            assert_eq!(ship.value(ValueKind::Hull), hull, "after {amount}");
        };
        check(50, 350, 150);
        check(250, 100, 150);
        check(201, 0, 49);
        check(8000, 0, 0);
    }

    #[test]
    fn reports_theoretical_damage() {
        let battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        let diffs = hit(battle.ship(ShipId(1)).unwrap(), 8000);
        assert_eq!(
            diffs[0],
            BattleDiff::ShipDamage {
                ship: ShipId(1),
                hull: 150,
                shield: 400,
                theoretical: 8000,
            }
        );
    }

    #[test]
    fn span_scales_with_magnitude() {
        let battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        let ship = battle.ship(ShipId(1)).unwrap();
        let diffs = on_diffs(ship, 10, 10, 0.5);
        assert!(matches!(
            diffs[0],
            BattleDiff::ShipDamage { theoretical: 15, .. }
        ));
    }

    #[test]
    fn modifiers_scale_and_clamp() {
        let mut battle = battle_with(&[(1, 0, 500.0, 500.0)]);
        let ship = battle.ship_mut(ShipId(1)).unwrap();
        ship.active_effects.insert(Effect::new(
            EffectId(1),
            EffectKind::DamageModifier { percent: -30 },
        ));
        assert!((damage_factor(ship) - 0.7).abs() < 1e-9);

        ship.active_effects.insert(Effect::new(
            EffectId(2),
            EffectKind::DamageModifier { percent: -120 },
        ));
        assert_eq!(damage_factor(ship), 0.0);
        assert!(hit(ship, 100).is_empty());
    }
}

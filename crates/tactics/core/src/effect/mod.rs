//! Effects: pure descriptions of what happens to a ship.
//!
//! An effect never touches the battle. Each hook compiles the effect into
//! the diffs needed against the current state of the target ship; callers
//! apply those diffs through the battle log.
//!
//! | Hook | When |
//! |------|------|
//! | [`Effect::on_diffs`] | the effect hits a ship (weapon, aura entry, drone) |
//! | [`Effect::off_diffs`] | an active entry is removed |
//! | [`Effect::turn_start_diffs`] | the affected ship starts its turn |
//! | [`Effect::turn_end_diffs`] | the affected ship ends its turn |

mod damage;
mod describe;
mod repel;
mod resource;
mod sticky;
mod watch;

pub use damage::damage_factor;

use crate::geometry::Location;
use crate::rng::RngOracle;
use crate::state::{
    AttributeKind, AttributeModifier, Battle, DroneId, EffectId, EquipmentId, Ship, ShipId,
    ValueKind,
};
use crate::diff::BattleDiff;

/// When a sticky effect applies its wrapped effect.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StickyMode {
    /// Once, when attached. The base stays in force until removal.
    #[default]
    Immediate,
    /// Every time the affected ship starts a turn.
    TurnStart,
    /// Every time the affected ship ends a turn.
    TurnEnd,
}

/// The closed catalog of effects.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectKind {
    /// Damage in `[base, base + span]`, absorbed by shield first.
    Damage { base: i32, span: i32 },
    Attribute { attribute: AttributeKind, value: i32 },
    /// Percentage boost, summed with other multipliers.
    AttributeMultiply { attribute: AttributeKind, value: i32 },
    AttributeLimit { attribute: AttributeKind, value: i32 },
    /// Relative value changes on each hook.
    Value {
        value: ValueKind,
        on: i32,
        off: i32,
        start: i32,
        end: i32,
    },
    /// Moves `amount` of a value from the source ship to the target
    /// (negative: from the target to the source).
    ValueTransfer { value: ValueKind, amount: i32 },
    /// Cools `cooling` steps (0 = fully) on up to `maxcount` equipment
    /// (0 = all).
    Cooldown { cooling: u32, maxcount: u32 },
    Repel { distance: f64 },
    Pinned { hard: bool },
    /// Percentage added to damage taken.
    DamageModifier { percent: i32 },
    /// Vigilance watch placed by an activated equipment.
    Watch { equipment: EquipmentId },
    Sticky {
        base: Box<Effect>,
        duration: u32,
        mode: StickyMode,
    },
}

impl EffectKind {
    /// Looks through sticky wrappers.
    pub fn innermost(&self) -> &EffectKind {
        match self {
            Self::Sticky { base, .. } => base.kind.innermost(),
            kind => kind,
        }
    }

    pub const fn is_sticky(&self) -> bool {
        matches!(self, Self::Sticky { .. })
    }

    /// Effects whose whole outcome is held by their active entry. Applying
    /// them again while the entry is present would stack them.
    pub const fn lives_in_entry(&self) -> bool {
        matches!(
            self,
            Self::Attribute { .. }
                | Self::AttributeMultiply { .. }
                | Self::AttributeLimit { .. }
                | Self::Pinned { .. }
                | Self::DamageModifier { .. }
                | Self::Watch { .. }
        )
    }
}

/// An effect template, or an active entry on a ship (keyed by `id`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    pub id: EffectId,
    pub kind: EffectKind,
}

/// What an effect comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSource {
    Ship(ShipId),
    Drone(DroneId),
}

impl EffectSource {
    pub fn location(&self, battle: &Battle) -> Option<Location> {
        match self {
            Self::Ship(id) => battle.ship(*id).map(Ship::location),
            Self::Drone(id) => battle.drone(*id).map(|drone| drone.location),
        }
    }
}

/// Read-only view used while compiling effects.
#[derive(Clone, Copy)]
pub struct EffectContext<'a> {
    pub battle: &'a Battle,
    pub rng: &'a dyn RngOracle,
}

impl<'a> EffectContext<'a> {
    pub fn new(battle: &'a Battle, rng: &'a dyn RngOracle) -> Self {
        Self { battle, rng }
    }
}

impl Effect {
    pub const fn new(id: EffectId, kind: EffectKind) -> Self {
        Self { id, kind }
    }

    /// Wraps `base` for `duration` turns, applied immediately.
    pub fn sticky(id: EffectId, base: Effect, duration: u32) -> Self {
        Self::sticky_with_mode(id, base, duration, StickyMode::Immediate)
    }

    pub fn sticky_with_mode(id: EffectId, base: Effect, duration: u32, mode: StickyMode) -> Self {
        Self {
            id,
            kind: EffectKind::Sticky {
                base: Box::new(base),
                duration,
                mode,
            },
        }
    }

    /// Diffs for the effect hitting `ship`. `magnitude` in `[0, 1]` picks a
    /// value inside random spans.
    pub fn on_diffs(
        &self,
        ctx: &EffectContext<'_>,
        ship: &Ship,
        source: EffectSource,
        magnitude: f64,
    ) -> Vec<BattleDiff> {
        match &self.kind {
            EffectKind::Damage { base, span } => damage::on_diffs(ship, *base, *span, magnitude),
            EffectKind::Attribute { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::cumulative(*value),
                AttributeModifier::NONE,
            )],
            EffectKind::AttributeMultiply { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::multiplier(*value),
                AttributeModifier::NONE,
            )],
            EffectKind::AttributeLimit { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::limit(*value),
                AttributeModifier::NONE,
            )],
            EffectKind::Value { value, on, .. } => resource::relative(ship, *value, *on),
            EffectKind::ValueTransfer { value, amount } => {
                resource::transfer(ctx, ship, source, *value, *amount)
            }
            EffectKind::Cooldown { cooling, maxcount } => {
                resource::cooldown(ctx, ship, *cooling, *maxcount)
            }
            EffectKind::Repel { distance } => repel::on_diffs(ctx, ship, source, *distance),
            EffectKind::Watch { equipment } => watch::on_diffs(ctx, ship, source, *equipment),
            EffectKind::Sticky { base, .. } => sticky::on_diffs(self, base, ctx, ship, source, magnitude),
            EffectKind::Pinned { .. } | EffectKind::DamageModifier { .. } => Vec::new(),
        }
    }

    /// Diffs undoing the lasting part of the effect when its entry goes away.
    /// The entry removal itself is emitted by the caller.
    pub fn off_diffs(&self, ctx: &EffectContext<'_>, ship: &Ship) -> Vec<BattleDiff> {
        match &self.kind {
            EffectKind::Attribute { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::NONE,
                AttributeModifier::cumulative(*value),
            )],
            EffectKind::AttributeMultiply { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::NONE,
                AttributeModifier::multiplier(*value),
            )],
            EffectKind::AttributeLimit { attribute, value } => vec![ship.attribute_diff(
                *attribute,
                AttributeModifier::NONE,
                AttributeModifier::limit(*value),
            )],
            EffectKind::Value { value, off, .. } => resource::relative(ship, *value, *off),
            EffectKind::Sticky { base, .. } => base.off_diffs(ctx, ship),
            _ => Vec::new(),
        }
    }

    pub fn turn_start_diffs(&self, ctx: &EffectContext<'_>, ship: &Ship) -> Vec<BattleDiff> {
        match &self.kind {
            EffectKind::Value { value, start, .. } => resource::relative(ship, *value, *start),
            EffectKind::Sticky { base, mode, .. } => sticky::turn_start_diffs(base, *mode, ctx, ship),
            _ => Vec::new(),
        }
    }

    pub fn turn_end_diffs(&self, ctx: &EffectContext<'_>, ship: &Ship) -> Vec<BattleDiff> {
        match &self.kind {
            EffectKind::Value { value, end, .. } => resource::relative(ship, *value, *end),
            EffectKind::Sticky { .. } => sticky::turn_end_diffs(self, ctx, ship),
            _ => Vec::new(),
        }
    }

    pub fn is_beneficial(&self) -> bool {
        match &self.kind {
            EffectKind::Attribute { value, .. } | EffectKind::AttributeMultiply { value, .. } => {
                *value >= 0
            }
            EffectKind::Value {
                on, off, start, end, ..
            } => resource::value_is_beneficial(*on, *off, *start, *end),
            EffectKind::ValueTransfer { amount, .. } => *amount >= 0,
            EffectKind::Cooldown { .. } => true,
            EffectKind::DamageModifier { percent } => *percent < 0,
            EffectKind::Sticky { base, .. } => base.is_beneficial(),
            EffectKind::Damage { .. }
            | EffectKind::AttributeLimit { .. }
            | EffectKind::Repel { .. }
            | EffectKind::Pinned { .. }
            | EffectKind::Watch { .. } => false,
        }
    }

    /// Remaining duration of a sticky entry.
    pub fn duration(&self) -> Option<u32> {
        match &self.kind {
            EffectKind::Sticky { duration, .. } => Some(*duration),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedRng;
    use crate::state::{FleetId, PlayerId, ShipId};

    pub(super) fn battle_with(ships: &[(u32, u32, f64, f64)]) -> Battle {
        let mut battle = Battle::default();
        battle.add_fleet(PlayerId(0), "blue");
        battle.add_fleet(PlayerId(1), "red");
        for (id, fleet, x, y) in ships {
            let mut ship = Ship::new(ShipId(*id), FleetId(*fleet), format!("ship{id}"))
                .with_base_attribute(AttributeKind::HullCapacity, 150)
                .with_base_attribute(AttributeKind::ShieldCapacity, 400)
                .with_base_attribute(AttributeKind::PowerCapacity, 10)
                .at(*x, *y);
            ship.restore_initial_state();
            battle.add_ship(ship).unwrap();
        }
        battle
    }

    fn apply_on(battle: &mut Battle, effect: &Effect, ship: u32, source: u32) {
        let rng = FixedRng(0);
        let diffs = {
            let ctx = EffectContext::new(battle, &rng);
            let target = battle.ship(ShipId(ship)).unwrap();
            effect.on_diffs(&ctx, target, EffectSource::Ship(ShipId(source)), 0.0)
        };
        battle.apply_diffs(diffs);
    }

    #[test]
    fn attribute_effects_round_trip() {
        let mut battle = battle_with(&[(1, 0, 100.0, 100.0)]);
        let boost = Effect::new(
            EffectId(1),
            EffectKind::AttributeMultiply {
                attribute: AttributeKind::HullCapacity,
                value: 20,
            },
        );
        apply_on(&mut battle, &boost, 1, 1);
        assert_eq!(
            battle.ship(ShipId(1)).unwrap().attribute(AttributeKind::HullCapacity),
            180
        );

        let rng = FixedRng(0);
        let diffs = {
            let ctx = EffectContext::new(&battle, &rng);
            boost.off_diffs(&ctx, battle.ship(ShipId(1)).unwrap())
        };
        battle.apply_diffs(diffs);
        assert_eq!(
            battle.ship(ShipId(1)).unwrap().attribute(AttributeKind::HullCapacity),
            150
        );
    }

    #[test]
    fn beneficial_flags() {
        let attr = |value| {
            Effect::new(
                EffectId(1),
                EffectKind::Attribute {
                    attribute: AttributeKind::Precision,
                    value,
                },
            )
        };
        assert!(attr(2).is_beneficial());
        assert!(!attr(-2).is_beneficial());
        let limit = Effect::new(
            EffectId(2),
            EffectKind::AttributeLimit {
                attribute: AttributeKind::Precision,
                value: 5,
            },
        );
        assert!(!limit.is_beneficial());
        assert!(Effect::sticky(EffectId(3), attr(1), 2).is_beneficial());
        assert!(
            !Effect::new(EffectId(4), EffectKind::Damage { base: 5, span: 0 }).is_beneficial()
        );
        let transfer = |amount| {
            Effect::new(
                EffectId(5),
                EffectKind::ValueTransfer {
                    value: ValueKind::Shield,
                    amount,
                },
            )
        };
        assert!(transfer(10).is_beneficial());
        assert!(!transfer(-10).is_beneficial());
    }
}

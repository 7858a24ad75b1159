//! Aggregate statistics, derived from the diff log.

use std::collections::BTreeMap;

use crate::diff::BattleDiff;

use super::{Battle, ShipId};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatKind {
    DamageDealt,
    MoveDistance,
    DronesDeployed,
}

/// Per-stat totals for the two fleets (index 0 attacks, index 1 defends).
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleStats {
    stats: BTreeMap<StatKind, [f64; 2]>,
}

impl BattleStats {
    /// Walks the whole log of a battle.
    pub fn from_battle(battle: &Battle) -> Self {
        let mut stats = Self::default();
        let side = |ship: ShipId| {
            let fleet = battle.ship(ship)?.fleet;
            battle.fleets.iter().position(|candidate| candidate.id == fleet)
        };

        for diff in battle.log.iter() {
            match diff {
                BattleDiff::ShipDamage {
                    ship, hull, shield, ..
                } => {
                    // Damage taken by one side was dealt by the other.
                    if let Some(index) = side(*ship).filter(|index| *index < 2) {
                        stats.add(StatKind::DamageDealt, 1 - index, f64::from(hull + shield));
                    }
                }
                BattleDiff::ShipMove { ship, start, end } => {
                    if let Some(index) = side(*ship) {
                        stats.add(
                            StatKind::MoveDistance,
                            index,
                            start.location().distance_to(end.location()),
                        );
                    }
                }
                BattleDiff::DroneDeployed { drone } => {
                    if let Some(index) = side(drone.owner) {
                        stats.add(StatKind::DronesDeployed, index, 1.0);
                    }
                }
                _ => {}
            }
        }
        stats
    }

    fn add(&mut self, kind: StatKind, side: usize, value: f64) {
        if let Some(slot) = self.stats.entry(kind).or_insert([0.0; 2]).get_mut(side) {
            *slot += value;
        }
    }

    pub fn get(&self, kind: StatKind) -> [f64; 2] {
        self.stats.get(&kind).copied().unwrap_or([0.0; 2])
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, [f64; 2])> + '_ {
        self.stats.iter().map(|(kind, values)| (*kind, *values))
    }
}

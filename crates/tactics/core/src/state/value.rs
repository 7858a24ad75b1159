//! Bounded ship values (hull, shield, power).

use super::AttributeKind;

/// Ship values that are consumed and restored during battle.
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
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ValueKind {
    Hull,
    Shield,
    Power,
}

impl ValueKind {
    /// Attribute that bounds this value.
    pub const fn capacity(self) -> AttributeKind {
        match self {
            Self::Hull => AttributeKind::HullCapacity,
            Self::Shield => AttributeKind::ShieldCapacity,
            Self::Power => AttributeKind::PowerCapacity,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// A current/maximum pair.
///
/// Diffs write raw deltas so that apply/revert stay exact inverses; the
/// current value may therefore temporarily leave `[0, maximum]` until the
/// consistency checker emits a correction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundedValue {
    pub current: i32,
    pub maximum: i32,
}

impl BoundedValue {
    pub const fn new(current: i32, maximum: i32) -> Self {
        Self { current, maximum }
    }

    pub const fn is_within_bounds(&self) -> bool {
        self.current >= 0 && self.current <= self.maximum
    }

    /// Delta that would actually change the value once clamped to bounds.
    pub fn clamped_delta(&self, delta: i32) -> i32 {
        let target = (self.current + delta).clamp(0, self.maximum.max(0));
        target - self.current
    }

    /// Adds a delta, clamped to bounds. Returns the applied delta.
    pub fn add(&mut self, delta: i32) -> i32 {
        let applied = self.clamped_delta(delta);
        self.current += applied;
        applied
    }

    /// Sets the value, clamped to bounds. Returns the applied delta.
    pub fn set(&mut self, value: i32) -> i32 {
        self.add(value - self.current)
    }

    /// Adds a delta without clamping.
    pub fn add_raw(&mut self, delta: i32) {
        self.current += delta;
    }

    /// Delta needed to bring the value back into bounds, if any.
    pub fn correction(&self) -> Option<i32> {
        if self.current < 0 {
            Some(-self.current)
        } else if self.current > self.maximum {
            Some(self.maximum.max(0) - self.current)
        } else {
            None
        }
    }
}

/// The three values of a ship, indexed by [`ValueKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipValues([BoundedValue; 3]);

impl ShipValues {
    pub fn get(&self, kind: ValueKind) -> &BoundedValue {
        &self.0[kind.index()]
    }

    pub fn get_mut(&mut self, kind: ValueKind) -> &mut BoundedValue {
        &mut self.0[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_clamped_deltas() {
        let mut value = BoundedValue::new(5, 10);
        assert_eq!(value.add(8), 5);
        assert_eq!(value.current, 10);
        assert_eq!(value.add(-25), -10);
        assert_eq!(value.current, 0);
        assert_eq!(value.set(4), 4);
    }

    #[test]
    fn corrections_bring_back_in_bounds() {
        assert_eq!(BoundedValue::new(-3, 10).correction(), Some(3));
        assert_eq!(BoundedValue::new(12, 10).correction(), Some(-2));
        assert_eq!(BoundedValue::new(10, 10).correction(), None);
    }

    #[test]
    fn value_names_round_trip() {
        use core::str::FromStr;
        assert_eq!(ValueKind::Shield.to_string(), "shield");
        assert_eq!(ValueKind::from_str("HULL"), Ok(ValueKind::Hull));
    }
}

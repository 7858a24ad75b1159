//! Ship attributes with stacked cumulative/multiplier/limit modifiers.

/// Ship attributes, recomputed from their modifier stack.
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
pub enum AttributeKind {
    HullCapacity,
    ShieldCapacity,
    PowerCapacity,
    Maneuvrability,
    Precision,
    Evasion,
}

impl AttributeKind {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// One modifier triple. Each part is optional; diffs add or remove whole triples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeModifier {
    pub cumulative: Option<i32>,
    /// Percentage, summed across sources.
    pub multiplier: Option<i32>,
    pub limit: Option<i32>,
}

impl AttributeModifier {
    pub const NONE: Self = Self {
        cumulative: None,
        multiplier: None,
        limit: None,
    };

    pub const fn cumulative(value: i32) -> Self {
        Self {
            cumulative: Some(value),
            ..Self::NONE
        }
    }

    pub const fn multiplier(value: i32) -> Self {
        Self {
            multiplier: Some(value),
            ..Self::NONE
        }
    }

    pub const fn limit(value: i32) -> Self {
        Self {
            limit: Some(value),
            ..Self::NONE
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.cumulative.is_none() && self.multiplier.is_none() && self.limit.is_none()
    }
}

/// Modifier stack of a single attribute.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipAttribute {
    cumulatives: Vec<i32>,
    multipliers: Vec<i32>,
    limits: Vec<i32>,
}

impl ShipAttribute {
    /// Final value: sum of cumulatives, scaled by summed multipliers, capped
    /// by the lowest limit.
    pub fn value(&self) -> i32 {
        let mut value: i32 = self.cumulatives.iter().sum();
        if !self.multipliers.is_empty() {
            let percent: i32 = self.multipliers.iter().sum();
            value = (f64::from(value) * (1.0 + f64::from(percent) / 100.0)).round() as i32;
        }
        match self.limits.iter().min() {
            Some(limit) => value.min(*limit),
            None => value,
        }
    }

    /// Adds each part of a modifier. Lists are kept sorted so that an
    /// add/remove pair always restores the exact same stack.
    pub fn add_modifier(&mut self, modifier: &AttributeModifier) {
        if let Some(value) = modifier.cumulative {
            insert_sorted(&mut self.cumulatives, value);
        }
        if let Some(value) = modifier.multiplier {
            insert_sorted(&mut self.multipliers, value);
        }
        if let Some(value) = modifier.limit {
            insert_sorted(&mut self.limits, value);
        }
    }

    /// Removes one occurrence of each part. Returns false if a part was missing.
    pub fn remove_modifier(&mut self, modifier: &AttributeModifier) -> bool {
        let mut complete = true;
        if let Some(value) = modifier.cumulative {
            complete &= remove_one(&mut self.cumulatives, value);
        }
        if let Some(value) = modifier.multiplier {
            complete &= remove_one(&mut self.multipliers, value);
        }
        if let Some(value) = modifier.limit {
            complete &= remove_one(&mut self.limits, value);
        }
        complete
    }

    pub fn is_empty(&self) -> bool {
        self.cumulatives.is_empty() && self.multipliers.is_empty() && self.limits.is_empty()
    }
}

fn insert_sorted(list: &mut Vec<i32>, value: i32) {
    let index = list.partition_point(|item| *item < value);
    list.insert(index, value);
}

fn remove_one(list: &mut Vec<i32>, value: i32) -> bool {
    match list.binary_search(&value) {
        Ok(index) => {
            list.remove(index);
            true
        }
        Err(_) => false,
    }
}

/// All attributes of a ship, indexed by [`AttributeKind`].
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipAttributes([ShipAttribute; 6]);

impl ShipAttributes {
    pub fn get(&self, kind: AttributeKind) -> &ShipAttribute {
        &self.0[kind.index()]
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> &mut ShipAttribute {
        &mut self.0[kind.index()]
    }

    pub fn value(&self, kind: AttributeKind) -> i32 {
        self.get(kind).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_modifiers() {
        let mut attr = ShipAttribute::default();
        attr.add_modifier(&AttributeModifier::cumulative(8));
        attr.add_modifier(&AttributeModifier::cumulative(2));
        assert_eq!(attr.value(), 10);

        attr.add_modifier(&AttributeModifier::multiplier(20));
        attr.add_modifier(&AttributeModifier::multiplier(10));
        assert_eq!(attr.value(), 13);

        attr.add_modifier(&AttributeModifier::limit(12));
        attr.add_modifier(&AttributeModifier::limit(15));
        assert_eq!(attr.value(), 12);
    }

    #[test]
    fn removing_multiplier_subtracts_the_percentage() {
        let mut attr = ShipAttribute::default();
        attr.add_modifier(&AttributeModifier::cumulative(100));
        attr.add_modifier(&AttributeModifier::multiplier(20));
        attr.add_modifier(&AttributeModifier::multiplier(10));
        assert_eq!(attr.value(), 130);

        assert!(attr.remove_modifier(&AttributeModifier::multiplier(20)));
        assert_eq!(attr.value(), 110);
        assert!(!attr.remove_modifier(&AttributeModifier::multiplier(20)));
    }

    #[test]
    fn limit_removal_restores_value() {
        let mut attr = ShipAttribute::default();
        attr.add_modifier(&AttributeModifier::cumulative(5));
        attr.add_modifier(&AttributeModifier::limit(2));
        assert_eq!(attr.value(), 2);
        attr.remove_modifier(&AttributeModifier::limit(2));
        assert_eq!(attr.value(), 5);
    }

    #[test]
    fn add_remove_pair_restores_the_stack() {
        let mut attr = ShipAttribute::default();
        attr.add_modifier(&AttributeModifier::cumulative(5));
        attr.add_modifier(&AttributeModifier::cumulative(3));
        let before = attr.clone();

        attr.remove_modifier(&AttributeModifier::cumulative(5));
        attr.add_modifier(&AttributeModifier::cumulative(5));
        assert_eq!(attr, before);
    }
}

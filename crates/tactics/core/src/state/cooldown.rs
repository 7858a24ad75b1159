//! Per-equipment use/heat tracking.

/// Overheat and cooling counter.
///
/// After `overheat` uses the equipment heats up for `cooling + 1` steps: the
/// extra step is consumed by the end of the turn during which it overheated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    /// Uses since the last full cooling.
    pub uses: u32,
    /// Remaining cooling steps before the equipment is usable again.
    pub heat: u32,
    /// Uses allowed before overheating (0 for unlimited).
    pub overheat: u32,
    /// Turns needed to cool down once overheated (at least 1).
    pub cooling: u32,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Cooldown {
    pub fn new(overheat: u32, cooling: u32) -> Self {
        Self {
            uses: 0,
            heat: 0,
            overheat,
            cooling: cooling.max(1),
        }
    }

    pub fn configure(&mut self, overheat: u32, cooling: u32) {
        self.overheat = overheat;
        self.cooling = cooling.max(1);
        self.reset();
    }

    pub const fn can_use(&self) -> bool {
        self.heat == 0
    }

    /// True if the next use will overheat the equipment.
    pub const fn will_overheat(&self) -> bool {
        self.overheat > 0 && self.uses + 1 >= self.overheat
    }

    /// Remaining uses before overheating, `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<u32> {
        if self.overheat == 0 {
            None
        } else if self.heat > 0 {
            Some(0)
        } else {
            Some(self.overheat.saturating_sub(self.uses))
        }
    }

    pub fn use_once(&mut self) {
        self.uses += 1;
        if self.overheat > 0 && self.uses >= self.overheat {
            self.heat = self.cooling + 1;
        }
    }

    /// Undo one [`Cooldown::use_once`].
    pub fn unuse_once(&mut self) {
        if self.overheat > 0 && self.uses >= self.overheat {
            self.heat = 0;
        }
        self.uses = self.uses.saturating_sub(1);
    }

    /// Dissipate heat. Uses reset once fully cooled.
    pub fn cool(&mut self, steps: u32) {
        self.heat = self.heat.saturating_sub(steps);
        if self.heat == 0 {
            self.uses = 0;
        }
    }

    pub fn reset(&mut self) {
        self.uses = 0;
        self.heat = 0;
    }
}

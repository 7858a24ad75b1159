use std::collections::BTreeSet;

use crate::effect::Effect;
use crate::geometry::Location;

use super::{DroneId, EquipmentId, ShipId};

/// A drone deployed in the arena.
///
/// Drones apply their payload to ships within `radius`. `inside` tracks which
/// ships are currently covered so that entry is detected once, not per pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drone {
    pub id: DroneId,
    pub owner: ShipId,
    /// Equipment that launched it.
    pub launcher: EquipmentId,
    pub location: Location,
    pub radius: f64,
    /// Remaining lifetime, in owner turns.
    pub duration: u32,
    pub effects: Vec<Effect>,
    pub inside: BTreeSet<ShipId>,
}

impl Drone {
    pub fn covers(&self, location: Location) -> bool {
        location.is_in_range(self.location, self.radius)
    }
}

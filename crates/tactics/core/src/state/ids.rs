use core::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Stable identifier of a ship, unique within a battle.
    ShipId,
    "ship"
);
define_id!(
    /// Identifier of a fleet (index in the battle's fleet list).
    FleetId,
    "fleet"
);
define_id!(
    /// Identifier of the player owning a fleet.
    PlayerId,
    "player"
);
define_id!(
    /// Stable identifier of an equipment, unique within a battle.
    EquipmentId,
    "equipment"
);
define_id!(
    /// Stable identifier of an effect template. Active-effect entries on a
    /// ship are keyed by it.
    EffectId,
    "effect"
);
define_id!(
    /// Identifier of a deployed drone.
    DroneId,
    "drone"
);

use super::{FleetId, PlayerId, ShipId};

/// A player's side in a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fleet {
    pub id: FleetId,
    pub player: PlayerId,
    pub name: String,
    /// Roster order; dead ships are never removed from it.
    pub ships: Vec<ShipId>,
}

impl Fleet {
    pub fn new(id: FleetId, player: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            player,
            name: name.into(),
            ships: Vec::new(),
        }
    }
}

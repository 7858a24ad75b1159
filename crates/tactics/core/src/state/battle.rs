use std::collections::BTreeMap;

use crate::config::BattleConfig;
use crate::diff::{BattleDiff, DiffLog};
use crate::error::{BattleError, DiffOutcome, ErrorSeverity};
use crate::geometry::{Location, Placement};
use crate::rng::{RngOracle, compute_seed};

use super::{AttributeKind, Drone, DroneId, Fleet, FleetId, PlayerId, Ship, ShipId};

/// Seed context for the initiative throw.
const INITIATIVE_CONTEXT: u32 = 0x1417;

/// Errors raised while assembling a battle, before it starts.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("fleet {0} is not part of the battle")]
    UnknownFleet(FleetId),

    #[error("ship {0} is already in the battle")]
    DuplicateShip(ShipId),
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownFleet(_) => "SETUP_UNKNOWN_FLEET",
            Self::DuplicateShip(_) => "SETUP_DUPLICATE_SHIP",
        }
    }
}

/// Final result of a battle. `winner` is `None` for a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub winner: Option<FleetId>,
    pub cycle: u32,
}

/// The battle aggregate.
///
/// This is the only mutable piece of the simulation. Once started, it must
/// only be changed through [`Battle::apply_diffs`] (directly or via the
/// engine), so that the log stays a faithful, replayable record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub config: BattleConfig,
    pub fleets: Vec<Fleet>,
    /// Ship roster. Dead ships stay here; only the play order forgets them.
    pub ships: BTreeMap<ShipId, Ship>,
    pub play_order: Vec<ShipId>,
    pub playing: Option<ShipId>,
    /// One cycle is one turn for every ship in the play order.
    pub cycle: u32,
    pub drones: BTreeMap<DroneId, Drone>,
    pub outcome: Option<BattleOutcome>,
    pub log: DiffLog<BattleDiff>,
}

impl Battle {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            fleets: Vec::new(),
            ships: BTreeMap::new(),
            play_order: Vec::new(),
            playing: None,
            cycle: 0,
            drones: BTreeMap::new(),
            outcome: None,
            log: DiffLog::new(),
        }
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    pub fn add_fleet(&mut self, player: PlayerId, name: impl Into<String>) -> FleetId {
        let id = FleetId(self.fleets.len() as u32);
        self.fleets.push(Fleet::new(id, player, name));
        id
    }

    pub fn add_ship(&mut self, ship: Ship) -> Result<ShipId, SetupError> {
        let id = ship.id;
        if self.ships.contains_key(&id) {
            return Err(SetupError::DuplicateShip(id));
        }
        let fleet = self
            .fleets
            .iter_mut()
            .find(|fleet| fleet.id == ship.fleet)
            .ok_or(SetupError::UnknownFleet(ship.fleet))?;
        fleet.ships.push(id);
        self.ships.insert(id, ship);
        Ok(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.get_mut(&id)
    }

    /// Every ship in roster order (fleet by fleet), dead ones included.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.fleets
            .iter()
            .flat_map(|fleet| fleet.ships.iter())
            .filter_map(|id| self.ships.get(id))
    }

    pub fn living_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships().filter(|ship| ship.alive)
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.iter().find(|fleet| fleet.id == id)
    }

    pub fn player_of(&self, ship: ShipId) -> Option<PlayerId> {
        let fleet = self.ship(ship)?.fleet;
        self.fleet(fleet).map(|fleet| fleet.player)
    }

    /// True when both ships exist and are owned by different players.
    pub fn are_enemies(&self, a: ShipId, b: ShipId) -> bool {
        match (self.player_of(a), self.player_of(b)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }

    pub fn enemies_of(&self, ship: ShipId) -> impl Iterator<Item = &Ship> {
        self.living_ships()
            .filter(move |other| self.are_enemies(ship, other.id))
    }

    pub fn allies_of(&self, ship: ShipId) -> impl Iterator<Item = &Ship> {
        let player = self.player_of(ship);
        self.living_ships()
            .filter(move |other| player.is_some() && self.player_of(other.id) == player)
    }

    /// Living ships within `radius` of `center`.
    pub fn ships_in_circle(&self, center: Location, radius: f64) -> impl Iterator<Item = &Ship> {
        self.living_ships()
            .filter(move |ship| ship.is_in_circle(center, radius))
    }

    pub fn fleet_is_alive(&self, fleet: FleetId) -> bool {
        self.fleet(fleet).is_some_and(|fleet| {
            fleet
                .ships
                .iter()
                .any(|id| self.ship(*id).is_some_and(|ship| ship.alive))
        })
    }

    pub fn playing_ship(&self) -> Option<&Ship> {
        self.playing.and_then(|id| self.ship(id))
    }

    pub fn is_playing(&self, ship: ShipId) -> bool {
        self.playing == Some(ship)
    }

    /// Ship playing after the current one, wrapping around the play order.
    pub fn next_ship(&self) -> Option<ShipId> {
        let first = self.play_order.first().copied();
        match self.playing {
            Some(current) => match self.play_order.iter().position(|id| *id == current) {
                Some(index) => self.play_order.get(index + 1).copied().or(first),
                None => first,
            },
            None => first,
        }
    }

    /// Turns before `ship` plays (0 for the playing ship), `None` if it is
    /// not in the play order.
    pub fn turns_before(&self, ship: ShipId) -> Option<usize> {
        let index = self.play_order.iter().position(|id| *id == ship)?;
        let current = self
            .playing
            .and_then(|playing| self.play_order.iter().position(|id| *id == playing))
            .unwrap_or(0);
        let len = self.play_order.len();
        Some((index + len - current) % len)
    }

    pub fn drone(&self, id: DroneId) -> Option<&Drone> {
        self.drones.get(&id)
    }

    /// Identifier for a drone deployed now. Derived from the log length, so
    /// replays allocate the same ids.
    pub fn next_drone_id(&self) -> DroneId {
        DroneId(self.log.next_sequence() as u32)
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    /// Copy of the live state with an empty log, for what-if resolution.
    ///
    /// The copy's log continues the live sequence, so rolls and drone ids
    /// made on it match what the live battle would produce.
    pub fn detached(&self) -> Battle {
        Battle {
            config: self.config.clone(),
            fleets: self.fleets.clone(),
            ships: self.ships.clone(),
            play_order: self.play_order.clone(),
            playing: self.playing,
            cycle: self.cycle,
            drones: self.drones.clone(),
            outcome: self.outcome,
            log: DiffLog::continuing(self.log.next_sequence()),
        }
    }

    /// Seed for a roll happening at the current log position.
    pub fn roll_seed(&self, actor: u32, context: u32) -> u64 {
        compute_seed(self.config.seed, self.log.next_sequence() as u64, actor, context)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Starts the battle: placement, initiative, full health, first ship.
    ///
    /// Nothing here goes into the log; replaying a battle starts from the
    /// state this leaves.
    pub fn start(&mut self, rng: &dyn RngOracle) {
        self.outcome = None;
        self.cycle = 1;
        self.drones.clear();
        self.place_ships();
        self.throw_initiative(rng);
        for ship in self.ships.values_mut() {
            ship.restore_initial_state();
        }
        self.playing = self.play_order.first().copied();
        tracing::debug!(
            ships = self.play_order.len(),
            first = ?self.playing,
            "battle started"
        );
    }

    fn place_ships(&mut self) {
        let (width, height) = (self.config.width, self.config.height);
        let formations = [
            (width * 0.25, 0.0),
            (width * 0.75, core::f64::consts::PI),
        ];
        for (fleet, (x, angle)) in self.fleets.iter().zip(formations) {
            let count = fleet.ships.len();
            let spacing = height * 0.2;
            let total = spacing * count.saturating_sub(1) as f64;
            let side = angle + core::f64::consts::FRAC_PI_2;
            let (dx, dy) = (side.cos(), side.sin());
            let start = (x - dx * total * 0.5, height * 0.5 - dy * total * 0.5);
            for (index, id) in fleet.ships.iter().enumerate() {
                if let Some(ship) = self.ships.get_mut(id) {
                    let offset = index as f64 * spacing;
                    ship.placement =
                        Placement::new(start.0 + dx * offset, start.1 + dy * offset, angle);
                }
            }
        }
    }

    /// Deterministic initiative: roll in [0, 1] scaled by maneuvrability,
    /// highest first, roster order on ties.
    fn throw_initiative(&mut self, rng: &dyn RngOracle) {
        let seed = self.config.seed;
        let mut throws: Vec<(ShipId, f64)> = self
            .ships()
            .map(|ship| {
                let roll = rng.unit(compute_seed(seed, 0, ship.id.0, INITIATIVE_CONTEXT));
                let maneuvrability = f64::from(ship.attribute(AttributeKind::Maneuvrability).max(1));
                (ship.id, roll * maneuvrability)
            })
            .collect();
        throws.sort_by(|a, b| b.1.total_cmp(&a.1));
        self.play_order = throws.into_iter().map(|(id, _)| id).collect();
    }

    /// Applies diffs in order and appends them to the log. Skipped diffs stay
    /// out of the log: stepping back only ever reverts what was applied.
    pub fn apply_diffs(&mut self, diffs: impl IntoIterator<Item = BattleDiff>) {
        for diff in diffs {
            match diff.apply(self) {
                DiffOutcome::Applied => {
                    tracing::trace!(?diff, "diff applied");
                    self.log.push(diff);
                }
                DiffOutcome::Skipped(reason) => {
                    tracing::debug!(?diff, ?reason, "diff skipped, not logged");
                }
            }
        }
    }

    /// SHA-256 of the live state (the log is left out), for comparing two
    /// battles after replay.
    #[cfg(feature = "serde")]
    pub fn fingerprint(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        #[derive(serde::Serialize)]
        struct View<'a> {
            fleets: &'a [Fleet],
            ships: &'a BTreeMap<ShipId, Ship>,
            play_order: &'a [ShipId],
            playing: Option<ShipId>,
            cycle: u32,
            drones: &'a BTreeMap<DroneId, Drone>,
            outcome: Option<BattleOutcome>,
        }

        let bytes = bincode::serialize(&View {
            fleets: &self.fleets,
            ships: &self.ships,
            play_order: &self.play_order,
            playing: self.playing,
            cycle: self.cycle,
            drones: &self.drones,
            outcome: self.outcome,
        })?;
        let mut fingerprint = [0u8; 32];
        fingerprint.copy_from_slice(&Sha256::digest(&bytes));
        Ok(fingerprint)
    }
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(BattleConfig::default())
    }
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Arena width, in km.
    pub width: f64,
    /// Arena height, in km.
    pub height: f64,
    /// Hard exclusion distance from the arena edges.
    pub border: f64,
    /// Hard exclusion distance between two ships.
    pub ship_separation: f64,
    /// Upper bound on consistency-check passes after a single action.
    pub max_check_loops: u32,
    /// Base seed for every random roll of the battle.
    pub seed: u64,
}

impl BattleConfig {
    // ===== arena defaults =====
    pub const DEFAULT_WIDTH: f64 = 1808.0;
    pub const DEFAULT_HEIGHT: f64 = 948.0;
    pub const DEFAULT_BORDER: f64 = 50.0;
    pub const DEFAULT_SHIP_SEPARATION: f64 = 100.0;

    // ===== resolution guards =====
    pub const DEFAULT_MAX_CHECK_LOOPS: u32 = 1000;

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            border: Self::DEFAULT_BORDER,
            ship_separation: Self::DEFAULT_SHIP_SEPARATION,
            max_check_loops: Self::DEFAULT_MAX_CHECK_LOOPS,
            seed: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    pub fn with_arena(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::new()
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

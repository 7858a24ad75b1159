//! Binary configuration, read from the environment.
use std::env;
use std::path::PathBuf;

/// Settings of one CLI run.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `config.toml`, `catalog/` and `battles/`.
    pub data_dir: PathBuf,
    /// Battle setup to load from `battles/`.
    pub battle: String,
    /// Overrides the seed from `config.toml`.
    pub seed: Option<u64>,
    pub max_turns: Option<u32>,
    /// Work units per agent decision.
    pub agent_units: Option<usize>,
    /// JSON-lines log export destination.
    pub log_export: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../tactics/content/data"
            )),
            battle: "skirmish".to_string(),
            seed: None,
            max_turns: None,
            agent_units: None,
            log_export: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TACTICS_DATA_DIR` - Content directory (default: the shipped data)
    /// - `TACTICS_BATTLE` - Battle setup name (default: skirmish)
    /// - `TACTICS_SEED` - Battle seed (default: from config.toml)
    /// - `TACTICS_MAX_TURNS` - Turn limit (default: 200)
    /// - `TACTICS_AGENT_UNITS` - Agent work units per decision (default: 2000)
    /// - `TACTICS_LOG_EXPORT` - Log export path (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("TACTICS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(battle) = env::var("TACTICS_BATTLE") {
            config.battle = battle;
        }
        config.seed = read_env("TACTICS_SEED");
        config.max_turns = read_env::<u32>("TACTICS_MAX_TURNS").map(|turns| turns.max(1));
        config.agent_units = read_env::<usize>("TACTICS_AGENT_UNITS").map(|units| units.max(1));
        config.log_export = env::var("TACTICS_LOG_EXPORT").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

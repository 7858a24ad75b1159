//! Agent-vs-agent battle runner.
//!
//! Loads a battle setup from the content directory, lets a tactical agent
//! play every fleet and prints the outcome with the battle statistics.
//!
//! ```bash
//! TACTICS_SEED=7 TACTICS_LOG_EXPORT=target/battle.jsonl cargo run -p tactics-cli
//! ```

mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use strum::IntoEnumIterator;
use tactics_content::ContentFactory;
use tactics_core::{Battle, PcgRng, StatKind};
use tactics_runtime::{BattleDriver, BattleReport, RuntimeConfig};

use config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env();
    tracing::info!(data = %config.data_dir.display(), battle = %config.battle, "loading content");

    let factory = ContentFactory::new(&config.data_dir);
    let mut battle_config = factory.load_config()?;
    if let Some(seed) = config.seed {
        battle_config.seed = seed;
    }
    let battle = factory
        .build_battle(&config.battle, battle_config)
        .with_context(|| format!("building battle '{}'", config.battle))?;

    let mut runtime = RuntimeConfig::default();
    if let Some(turns) = config.max_turns {
        runtime = runtime.with_max_turns(turns);
    }
    if let Some(units) = config.agent_units {
        runtime = runtime.with_agent_unit_budget(units);
    }

    let mut builder = BattleDriver::builder(battle, Arc::new(PcgRng))
        .config(runtime)
        .agents();
    if let Some(path) = &config.log_export {
        builder = builder
            .export_to(path)
            .with_context(|| format!("creating log export {}", path.display()))?;
    }

    let (report, driver) = builder.build().run_in_background().await?;
    print_report(driver.battle(), &report)?;
    Ok(())
}

fn print_report(battle: &Battle, report: &BattleReport) -> Result<()> {
    let fleet_name = |index: usize| {
        battle
            .fleets
            .get(index)
            .map_or_else(|| format!("fleet {index}"), |fleet| fleet.name.clone())
    };

    match report.outcome {
        Some(outcome) => match outcome.winner.and_then(|id| battle.fleet(id)) {
            Some(fleet) => println!("{} wins at cycle {}", fleet.name, outcome.cycle),
            None => println!("draw at cycle {}", outcome.cycle),
        },
        None => println!("no winner after {} turns", report.turns),
    }
    println!(
        "{} turns, {} actions, {} log entries",
        report.turns, report.actions, report.log_len
    );

    println!("{:<16}{:>12}{:>12}", "", fleet_name(0), fleet_name(1));
    for kind in StatKind::iter() {
        let [first, second] = report.stats.get(kind);
        println!("{:<16}{first:>12.0}{second:>12.0}", kind.to_string());
    }

    for fleet in &battle.fleets {
        let alive: Vec<_> = fleet
            .ships
            .iter()
            .filter_map(|id| battle.ship(*id))
            .filter(|ship| ship.alive)
            .map(|ship| ship.name.as_str())
            .collect();
        println!("{}: {} alive [{}]", fleet.name, alive.len(), alive.join(", "));
    }

    let fingerprint = battle.fingerprint().context("fingerprinting final state")?;
    println!("state {}", hex::encode(fingerprint));
    Ok(())
}

mod common;

use std::time::Duration;

use tactics_content::ContentFactory;
use tactics_core::{ActionRef, BattleDiff, EquipmentId, FleetId, ValueKind};
use tactics_runtime::{
    BattleDriver, EndTurnProvider, PlannedAction, RuntimeConfig, RuntimeError, ScriptedProvider,
    Topic,
};

use common::{BLUE, BLUE_GUN, RED, content_dir, duel, rng};

fn fire() -> Vec<PlannedAction> {
    vec![PlannedAction {
        action: ActionRef::Equipment(BLUE_GUN),
        target: None,
    }]
}

#[tokio::test]
async fn scripted_turn_publishes_in_resolution_order() {
    let mut driver = BattleDriver::builder(duel(), rng())
        .provider(FleetId(0), ScriptedProvider::new([fire()]))
        .default_provider(EndTurnProvider)
        .build();
    let bus = driver.events();
    let mut log = bus.subscribe(Topic::Log);
    let mut changes = bus.subscribe(Topic::ShipChange);
    let mut damage = bus.subscribe(Topic::Damage);

    driver.start();
    driver.play_turn().await.unwrap();

    let battle = driver.battle();
    assert_eq!(battle.playing, Some(RED));
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Shield), 350);

    let mut index = 0;
    while let Ok(event) = log.try_recv() {
        assert_eq!(event.index, index);
        assert_eq!(Some(&event.diff), battle.log.get(index));
        index += 1;
    }
    assert_eq!(index, battle.log.len());

    let change = changes.try_recv().unwrap();
    assert!(matches!(
        change.diff,
        BattleDiff::ShipChange { ship: BLUE, new_ship: RED, .. }
    ));
    assert!(changes.try_recv().is_err());
    assert!(damage.try_recv().is_ok());
}

#[tokio::test]
async fn failing_plan_ends_the_turn() {
    let bogus = vec![PlannedAction {
        action: ActionRef::Equipment(EquipmentId(99)),
        target: None,
    }];
    let mut driver = BattleDriver::builder(duel(), rng())
        .default_provider(ScriptedProvider::new([bogus]))
        .build();
    driver.start();
    driver.play_turn().await.unwrap();

    assert_eq!(driver.battle().playing, Some(RED));
    let report = driver.report();
    assert_eq!(report.turns, 1);
    assert_eq!(report.actions, 0);
}

#[tokio::test]
async fn fleet_without_provider_is_an_error() {
    let mut driver = BattleDriver::builder(duel(), rng())
        .provider(FleetId(1), EndTurnProvider)
        .build();
    driver.start();
    let error = driver.play_turn().await.unwrap_err();
    assert!(matches!(
        error,
        RuntimeError::ProviderNotSet { fleet: FleetId(0) }
    ));
}

#[tokio::test]
async fn turn_limit_stops_a_passive_battle() {
    let config = RuntimeConfig::default().with_max_turns(6);
    let mut driver = BattleDriver::builder(duel(), rng())
        .config(config)
        .default_provider(EndTurnProvider)
        .build();
    let report = driver.run().await.unwrap();

    assert!(report.outcome.is_none());
    assert_eq!(report.turns, 6);
    assert_eq!(driver.battle().cycle, 4);
}

#[tokio::test]
async fn agent_duel_runs_in_background() {
    let config = RuntimeConfig::default()
        .with_max_turns(12)
        .with_agent_unit_budget(150)
        .with_agent_time_budget(Duration::from_secs(60));
    let driver = BattleDriver::builder(duel(), rng())
        .config(config)
        .agents()
        .build();

    let (report, driver) = driver.run_in_background().await.unwrap();
    assert!(report.turns > 0);
    assert!(report.actions > 0);
    assert_eq!(report.log_len, driver.battle().log.len());
    let dealt = report.stats.get(tactics_core::StatKind::DamageDealt);
    assert!(dealt[0] + dealt[1] > 0.0);
}

#[tokio::test]
async fn shipped_skirmish_is_deterministic() {
    let factory = ContentFactory::new(content_dir());
    let config = factory.load_config().unwrap();
    let runtime = RuntimeConfig::default()
        .with_max_turns(12)
        .with_max_actions_per_turn(3)
        .with_agent_unit_budget(120)
        .with_agent_time_budget(Duration::from_secs(60));

    let mut fingerprints = Vec::new();
    for _ in 0..2 {
        let battle = factory.build_battle("skirmish", config.clone()).unwrap();
        let mut driver = BattleDriver::builder(battle, rng())
            .config(runtime.clone())
            .agents()
            .build();
        let report = driver.run().await.unwrap();
        assert!(report.outcome.is_some() || report.turns == 12);
        fingerprints.push(driver.battle().fingerprint().unwrap());
    }
    assert_eq!(fingerprints[0], fingerprints[1]);
}

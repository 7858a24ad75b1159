mod common;

use common::*;
use tactics_core::action;
use tactics_core::checks;
use tactics_core::{
    ActionError, ActionRef, ActionUnavailability, AttributeKind, BattleDiff, BattleEngine,
    BattleStats, Effect, EffectId, EffectKind, EquipmentId, FleetId, StatKind, Target, ValueKind,
};

const AURA: EquipmentId = EquipmentId(13);
const WATCH: EquipmentId = EquipmentId(14);
const DRONES: EquipmentId = EquipmentId(15);
const SELF_DESTRUCT: EquipmentId = EquipmentId(16);
const CANNON: EquipmentId = EquipmentId(17);

fn target_of(battle: &tactics_core::Battle, ship: tactics_core::ShipId) -> Option<Target> {
    battle.ship(ship).map(Target::ship)
}

#[test]
fn blue_plays_first() {
    let battle = duel(vec![], vec![]);
    assert_eq!(battle.play_order, vec![BLUE, RED]);
    assert_eq!(battle.playing, Some(BLUE));
    assert_eq!(battle.cycle, 1);
    assert!(battle.log.is_empty());
}

#[test]
fn firing_damages_the_enemy_and_costs_power() {
    let mut battle = duel(vec![], vec![]);
    let target = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    let outcome = engine
        .apply_action(ActionRef::Equipment(GUN), target)
        .unwrap();
    assert_eq!(outcome.ship, BLUE);
    assert_eq!(outcome.log_start, 0);

    let battle = engine.battle();
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Shield), 350);
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Hull), 150);
    assert_eq!(battle.ship(BLUE).unwrap().value(ValueKind::Power), 7);

    // Action markers bracket the action's diffs.
    assert!(battle.log.get(0).unwrap().is_action_used());
    assert!(matches!(
        battle.log.last(),
        Some(BattleDiff::ShipActionEnded { ship: BLUE, .. })
    ));
    // Nothing is left for the checker to correct.
    assert!(checks::next_corrections(battle, &RNG).is_empty());
}

#[test]
fn weapons_reject_self_and_out_of_range_targets() {
    let mut battle = duel(vec![common::gun(EquipmentId(18), 10, 100.0)], vec![]);
    let blue = target_of(&battle, BLUE);
    let red = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    assert_eq!(
        engine.apply_action(ActionRef::Equipment(GUN), blue),
        Err(ActionError::TargetRejected(ActionRef::Equipment(GUN)))
    );
    assert_eq!(
        engine.apply_action(ActionRef::Equipment(EquipmentId(18)), red),
        Err(ActionError::TargetRejected(ActionRef::Equipment(
            EquipmentId(18)
        )))
    );
    assert!(engine.battle().log.is_empty());
}

const WINGMAN: tactics_core::ShipId = tactics_core::ShipId(3);

/// The duel with a second, slower blue ship flying next to blue.
fn wing_battle(blue_extra: Vec<tactics_core::Equipment>) -> tactics_core::Battle {
    let mut battle = duel(blue_extra, vec![]);
    let fleet = battle.ship(BLUE).unwrap().fleet;
    battle.add_ship(ship(WINGMAN, fleet, 1)).unwrap();
    battle.start(&RNG);
    battle
}

fn weapon(id: EquipmentId, blast: f64, effect: Effect) -> tactics_core::Equipment {
    tactics_core::Equipment::new(id, "weapon", tactics_core::SlotType::Weapon).with_action(
        tactics_core::ActionKind::FireWeapon(tactics_core::FireWeapon {
            power: 1,
            range: 1000.0,
            blast,
            effects: vec![effect],
        }),
    )
}

#[test]
fn harmful_weapons_refuse_allied_ships() {
    let mut battle = wing_battle(vec![weapon(EquipmentId(18), 100.0, damage(600, 40))]);
    assert_eq!(battle.playing, Some(BLUE));
    let wingman = target_of(&battle, WINGMAN);
    let red = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    for weapon in [GUN, EquipmentId(18)] {
        assert_eq!(
            engine.apply_action(ActionRef::Equipment(weapon), wingman),
            Err(ActionError::TargetRejected(ActionRef::Equipment(weapon)))
        );
    }
    assert!(engine.battle().log.is_empty());
    assert_eq!(
        engine.battle().ship(WINGMAN).unwrap().value(ValueKind::Shield),
        400
    );

    engine.apply_action(ActionRef::Equipment(EquipmentId(18)), red).unwrap();
    assert_eq!(engine.battle().ship(RED).unwrap().value(ValueKind::Shield), 360);
}

#[test]
fn beneficial_weapons_aim_at_the_nearest_ally() {
    let boost = Effect::new(
        EffectId(601),
        EffectKind::Attribute {
            attribute: AttributeKind::Maneuvrability,
            value: 2,
        },
    );
    let mut battle = wing_battle(vec![weapon(EquipmentId(18), 0.0, boost)]);
    let blue = battle.ship(BLUE).unwrap();
    let booster = tactics_core::ShipAction::lookup(blue, ActionRef::Equipment(EquipmentId(18)))
        .unwrap();

    let target = action::default_target(&battle, blue, booster);
    assert_eq!(target.ship_id(), Some(WINGMAN));
    assert_eq!(action::check_target(&battle, blue, booster, &target), Some(target));
    let red = Target::ship(battle.ship(RED).unwrap());
    assert_eq!(action::check_target(&battle, blue, booster, &red), None);

    let mut engine = BattleEngine::new(&mut battle, &RNG);
    engine
        .apply_action(ActionRef::Equipment(EquipmentId(18)), Some(target))
        .unwrap();
    assert_eq!(
        engine.battle().ship(WINGMAN).unwrap().attribute(AttributeKind::Maneuvrability),
        3
    );
}

#[test]
fn only_the_playing_ship_may_act() {
    let battle = duel(vec![], vec![]);
    let target = Target::ship(battle.ship(BLUE).unwrap());
    let result = action::resolve(
        &battle,
        RED,
        ActionRef::Equipment(RED_GUN),
        &target,
        &RNG,
    );
    assert_eq!(result, Err(ActionError::NotPlaying(RED)));

    let result = action::resolve(&battle, BLUE, ActionRef::Equipment(EquipmentId(99)), &target, &RNG);
    assert!(matches!(result, Err(ActionError::UnknownAction(BLUE, _))));
}

#[test]
fn moving_costs_power_per_distance() {
    let mut battle = duel(vec![], vec![]);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine
        .apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 174.0)))
        .unwrap();
    let blue = engine.battle().ship(BLUE).unwrap();
    assert_eq!(blue.location().x, 452.0);
    assert_eq!(blue.location().y, 174.0);
    assert!((blue.placement.angle + core::f64::consts::FRAC_PI_2).abs() < 1e-9);
    assert_eq!(blue.value(ValueKind::Power), 4);

    // Far targets are clamped to what is left in the reactor.
    engine
        .apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 874.0)))
        .unwrap();
    let blue = engine.battle().ship(BLUE).unwrap();
    assert!((blue.location().y - (174.0 + 199.9)).abs() < 1e-6);
    assert_eq!(blue.value(ValueKind::Power), 0);

    assert_eq!(
        engine.apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 474.0))),
        Err(ActionError::Unavailable(ActionUnavailability::Power))
    );
}

#[test]
fn detached_copies_roll_like_the_live_battle() {
    let scatter = weapon(
        EquipmentId(18),
        0.0,
        Effect::new(EffectId(602), EffectKind::Damage { base: 20, span: 60 }),
    );
    let mut battle = duel(vec![scatter], vec![]);
    let target = target_of(&battle, RED);
    let rng = tactics_core::PcgRng;
    BattleEngine::new(&mut battle, &rng)
        .apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 374.0)))
        .unwrap();

    let mut copy = battle.detached();
    assert!(copy.log.is_empty());
    assert_eq!(copy.next_drone_id(), battle.next_drone_id());

    BattleEngine::new(&mut copy, &rng)
        .apply_action(ActionRef::Equipment(EquipmentId(18)), target)
        .unwrap();
    BattleEngine::new(&mut battle, &rng)
        .apply_action(ActionRef::Equipment(EquipmentId(18)), target)
        .unwrap();

    let predicted = copy.ship(RED).unwrap().value(ValueKind::Shield);
    assert!(predicted < 400);
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Shield), predicted);
    assert_eq!(state(&copy), state(&battle));
}

#[test]
fn pinned_ships_cannot_use_engines() {
    let mut battle = duel(vec![], vec![]);
    battle
        .ship_mut(BLUE)
        .unwrap()
        .active_effects
        .insert(Effect::new(EffectId(77), EffectKind::Pinned { hard: false }));

    let ship = battle.ship(BLUE).unwrap();
    let engine = tactics_core::ShipAction::lookup(ship, ActionRef::Equipment(ENGINE)).unwrap();
    assert_eq!(
        action::unavailability(&battle, ship, engine),
        Some(ActionUnavailability::Pinned)
    );
    let gun = tactics_core::ShipAction::lookup(ship, ActionRef::Equipment(GUN)).unwrap();
    assert_eq!(action::unavailability(&battle, ship, gun), None);
}

#[test]
fn end_of_turn_recharges_and_counts_cycles() {
    let mut battle = duel(vec![], vec![]);
    let target = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(GUN), target).unwrap();
    engine.advance_to_next_ship().unwrap();
    assert_eq!(engine.battle().playing, Some(RED));
    assert_eq!(engine.battle().cycle, 1);
    assert_eq!(
        engine.battle().ship(BLUE).unwrap().value(ValueKind::Power),
        10
    );

    engine.advance_to_next_ship().unwrap();
    assert_eq!(engine.battle().playing, Some(BLUE));
    assert_eq!(engine.battle().cycle, 2);
}

#[test]
fn toggled_aura_reserves_power_until_switched_off() {
    let boost = Effect::new(
        EffectId(300),
        EffectKind::AttributeMultiply {
            attribute: AttributeKind::ShieldCapacity,
            value: 50,
        },
    );
    let mut battle = duel(vec![aura(AURA, 0.0, boost)], vec![]);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(AURA), None).unwrap();
    let blue = engine.battle().ship(BLUE).unwrap();
    assert!(blue.equipment(AURA).unwrap().activated);
    assert!(blue.active_effects.contains(EffectId(300)));
    assert_eq!(blue.attribute(AttributeKind::ShieldCapacity), 600);
    assert_eq!(blue.value(ValueKind::Power), 8);

    engine.advance_to_next_ship().unwrap();
    engine.advance_to_next_ship().unwrap();
    let blue = engine.battle().ship(BLUE).unwrap();
    assert_eq!(blue.value(ValueKind::Power), 8, "reserved by the aura");

    engine.apply_action(ActionRef::Equipment(AURA), None).unwrap();
    let blue = engine.battle().ship(BLUE).unwrap();
    assert!(!blue.equipment(AURA).unwrap().activated);
    assert!(blue.active_effects.is_empty());
    assert_eq!(blue.attribute(AttributeKind::ShieldCapacity), 400);
    assert_eq!(blue.value(ValueKind::Power), 8, "switching off is free");
}

#[test]
fn auras_follow_ships_in_and_out_of_range() {
    let slow = Effect::new(
        EffectId(301),
        EffectKind::Attribute {
            attribute: AttributeKind::Maneuvrability,
            value: -2,
        },
    );
    let mut battle = duel(vec![aura(AURA, 300.0, slow)], vec![]);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(AURA), None).unwrap();
    // Blue itself sits in its own aura; red is out of range.
    assert!(engine.battle().ship(BLUE).unwrap().active_effects.contains(EffectId(301)));
    assert!(!engine.battle().ship(RED).unwrap().active_effects.contains(EffectId(301)));
    engine.advance_to_next_ship().unwrap();

    engine
        .apply_action(ActionRef::Equipment(RED_ENGINE), Some(Target::at(702.0, 474.0)))
        .unwrap();
    let red = engine.battle().ship(RED).unwrap();
    assert!(red.active_effects.contains(EffectId(301)));
    assert_eq!(red.attribute(AttributeKind::Maneuvrability), 1);

    engine
        .apply_action(ActionRef::Equipment(RED_ENGINE), Some(Target::at(1002.0, 474.0)))
        .unwrap();
    let red = engine.battle().ship(RED).unwrap();
    assert!(!red.active_effects.contains(EffectId(301)));
    assert_eq!(red.attribute(AttributeKind::Maneuvrability), 3);
}

#[test]
fn vigilance_strikes_intruders_and_shuts_down_at_capacity() {
    let mut battle = duel(vec![vigilance(WATCH, 300.0, 1, damage(400, 30))], vec![]);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(WATCH), None).unwrap();
    assert!(engine.battle().ship(BLUE).unwrap().equipment(WATCH).unwrap().activated);
    assert_eq!(
        engine.apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 174.0))),
        Err(ActionError::Unavailable(ActionUnavailability::Vigilance))
    );
    engine.advance_to_next_ship().unwrap();

    engine
        .apply_action(ActionRef::Equipment(RED_ENGINE), Some(Target::at(702.0, 474.0)))
        .unwrap();
    let battle = engine.battle();
    let red = battle.ship(RED).unwrap();
    assert_eq!(red.value(ValueKind::Shield), 370);
    assert!(red.active_effects.is_empty(), "watch lifted with the vigilance");
    let watch = battle.ship(BLUE).unwrap().equipment(WATCH).unwrap();
    assert!(!watch.activated);
    assert_eq!(watch.intruders, 0);
}

#[test]
fn drones_hit_on_entry_and_on_owner_turns_until_expiry() {
    let mut battle = duel(vec![drone_bay(DRONES, 2, 150.0, damage(500, 20))], vec![]);
    let target = Some(Target::at(1356.0, 474.0));
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(DRONES), target).unwrap();
    let battle = engine.battle();
    assert_eq!(battle.drones.len(), 1);
    let drone = battle.drones.values().next().unwrap().clone();
    assert_eq!(drone.owner, BLUE);
    assert!(drone.inside.contains(&RED));
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Shield), 380);

    // Red's turn, then blue's turn start activates the drone.
    engine.advance_to_next_ship().unwrap();
    engine.advance_to_next_ship().unwrap();
    assert_eq!(engine.battle().ship(RED).unwrap().value(ValueKind::Shield), 360);
    assert_eq!(engine.battle().drone(drone.id).unwrap().duration, 1);

    engine.advance_to_next_ship().unwrap();
    engine.advance_to_next_ship().unwrap();
    let battle = engine.battle();
    assert!(battle.drones.is_empty());
    assert_eq!(battle.ship(RED).unwrap().value(ValueKind::Shield), 360);
    assert!(battle.ship(RED).unwrap().active_effects.is_empty());

    let stats = BattleStats::from_battle(battle);
    assert_eq!(stats.get(StatKind::DronesDeployed), [1.0, 0.0]);
    assert_eq!(stats.get(StatKind::DamageDealt), [40.0, 0.0]);
}

#[test]
fn destroying_the_last_enemy_ends_the_battle() {
    let mut battle = duel(vec![common::gun(CANNON, 8000, 1000.0)], vec![]);
    let target = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(CANNON), target).unwrap();
    let battle = engine.battle();
    let red = battle.ship(RED).unwrap();
    assert!(!red.alive);
    assert_eq!(red.value(ValueKind::Power), 0);
    assert_eq!(battle.play_order, vec![BLUE]);
    let outcome = battle.outcome.as_ref().unwrap();
    assert_eq!(outcome.winner, Some(FleetId(0)));
    assert!(matches!(battle.log.last(), Some(BattleDiff::EndBattle { .. })));

    assert_eq!(
        engine.apply_action(ActionRef::EndTurn, None),
        Err(ActionError::BattleEnded)
    );
}

fn self_destruct() -> tactics_core::Equipment {
    tactics_core::Equipment::new(SELF_DESTRUCT, "self-destruct", tactics_core::SlotType::Weapon)
        .with_action(tactics_core::ActionKind::FireWeapon(tactics_core::FireWeapon {
            power: 1,
            range: 0.0,
            blast: 0.0,
            effects: vec![damage(600, 8000)],
        }))
}

#[test]
fn a_ship_without_hull_dies_once_its_turn_is_over() {
    let mut battle = duel(vec![self_destruct()], vec![]);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    let outcome = engine
        .apply_action(ActionRef::Equipment(SELF_DESTRUCT), None)
        .unwrap();
    let battle = engine.battle();
    assert_eq!(outcome.log_end, battle.log.len());

    let change = battle
        .log
        .iter()
        .position(|diff| matches!(diff, BattleDiff::ShipChange { .. }))
        .unwrap();
    let death = battle
        .log
        .iter()
        .position(|diff| matches!(diff, BattleDiff::ShipDeath { ship: BLUE, .. }))
        .unwrap();
    assert!(change < death, "the turn passes before the death");
    assert_eq!(battle.outcome.as_ref().unwrap().winner, Some(FleetId(1)));
}

#[test]
fn reverting_an_action_restores_the_previous_state() {
    let mut battle = duel(vec![], vec![]);
    let target = target_of(&battle, RED);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine.apply_action(ActionRef::Equipment(ENGINE), Some(Target::at(452.0, 174.0))).unwrap();
    let before = state(engine.battle());
    let log_len = engine.battle().log.len();

    engine.apply_action(ActionRef::Equipment(GUN), target).unwrap();
    assert_ne!(state(engine.battle()), before);

    assert!(engine.revert_one_action());
    assert_eq!(state(engine.battle()), before);
    assert_eq!(engine.battle().log.len(), log_len);

    assert!(engine.revert_one_action());
    assert!(engine.battle().log.is_empty());
    assert!(!engine.revert_one_action());
}

#[test]
fn reverting_takes_back_the_forced_end_of_turn() {
    let mut battle = duel(vec![self_destruct()], vec![]);
    let before = state(&battle);
    let mut engine = BattleEngine::new(&mut battle, &RNG);

    engine
        .apply_action(ActionRef::Equipment(SELF_DESTRUCT), None)
        .unwrap();
    let used = engine
        .battle()
        .log
        .iter()
        .filter(|diff| diff.is_action_used())
        .count();
    assert_eq!(used, 2, "the action and the forced end of turn");
    assert!(engine.battle().is_ended());

    assert!(engine.revert_one_action());
    let battle = engine.battle();
    assert!(battle.log.is_empty());
    assert_eq!(battle.playing, Some(BLUE));
    assert_eq!(state(battle), before);
    assert!(!engine.revert_one_action());
}

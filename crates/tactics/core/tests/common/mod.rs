#![allow(dead_code)]

use tactics_core::{
    ActionKind, AttributeKind, Battle, BattleConfig, DeployDrone, DiffLog, Effect, EffectId,
    EffectKind, Equipment, EquipmentId, FireWeapon, FixedRng, FleetId, MoveEngine, PlayerId, Ship,
    ShipId, SlotType, Toggle, Vigilance,
};

pub const BLUE: ShipId = ShipId(1);
pub const RED: ShipId = ShipId(2);

pub const GUN: EquipmentId = EquipmentId(11);
pub const ENGINE: EquipmentId = EquipmentId(12);
pub const RED_GUN: EquipmentId = EquipmentId(21);
pub const RED_ENGINE: EquipmentId = EquipmentId(22);

/// Rolls 1.0 everywhere: full initiative, top of damage spans.
pub const RNG: FixedRng = FixedRng(u32::MAX);

pub fn damage(id: u32, base: i32) -> Effect {
    Effect::new(EffectId(id), EffectKind::Damage { base, span: 0 })
}

pub fn gun(id: EquipmentId, base: i32, range: f64) -> Equipment {
    Equipment::new(id, "gun", SlotType::Weapon).with_action(ActionKind::FireWeapon(FireWeapon {
        power: 3,
        range,
        blast: 0.0,
        effects: vec![damage(100 + id.0, base)],
    }))
}

pub fn engine(id: EquipmentId, distance_per_power: f64) -> Equipment {
    Equipment::new(id, "engine", SlotType::Engine)
        .with_action(ActionKind::Move(MoveEngine::new(distance_per_power)))
}

pub fn aura(id: EquipmentId, radius: f64, effect: Effect) -> Equipment {
    Equipment::new(id, "aura", SlotType::Utility).with_action(ActionKind::Toggle(Toggle {
        power: 2,
        radius,
        effects: vec![effect],
    }))
}

pub fn vigilance(id: EquipmentId, radius: f64, intruder_count: u32, effect: Effect) -> Equipment {
    Equipment::new(id, "watch", SlotType::Utility).with_action(ActionKind::Vigilance(Vigilance {
        power: 2,
        radius,
        intruder_count,
        intruder_effects: vec![effect],
        watch: EffectId(900 + id.0),
    }))
}

pub fn drone_bay(id: EquipmentId, lifetime: u32, radius: f64, effect: Effect) -> Equipment {
    Equipment::new(id, "drone", SlotType::Utility).with_action(ActionKind::DeployDrone(
        DeployDrone {
            power: 2,
            deploy_distance: 1000.0,
            lifetime,
            effect_radius: radius,
            effects: vec![effect],
        },
    ))
}

pub fn ship(id: ShipId, fleet: FleetId, maneuvrability: i32) -> Ship {
    Ship::new(id, fleet, format!("ship-{}", id.0))
        .with_base_attribute(AttributeKind::HullCapacity, 150)
        .with_base_attribute(AttributeKind::ShieldCapacity, 400)
        .with_base_attribute(AttributeKind::PowerCapacity, 10)
        .with_base_attribute(AttributeKind::Maneuvrability, maneuvrability)
}

/// One ship per fleet. Blue (ship 1) plays first; the ships face each other
/// 904km apart on the arena's middle line.
pub fn duel(blue_extra: Vec<Equipment>, red_extra: Vec<Equipment>) -> Battle {
    let mut battle = Battle::new(BattleConfig::with_seed(7));
    let blue_fleet = battle.add_fleet(PlayerId(0), "blue");
    let red_fleet = battle.add_fleet(PlayerId(1), "red");

    let mut blue = ship(BLUE, blue_fleet, 5)
        .with_equipment(gun(GUN, 50, 1000.0))
        .with_equipment(engine(ENGINE, 50.0));
    for equipment in blue_extra {
        blue.equip(equipment);
    }
    let mut red = ship(RED, red_fleet, 3)
        .with_equipment(gun(RED_GUN, 50, 1000.0))
        .with_equipment(engine(RED_ENGINE, 100.0));
    for equipment in red_extra {
        red.equip(equipment);
    }

    battle.add_ship(blue).unwrap();
    battle.add_ship(red).unwrap();
    battle.start(&RNG);
    battle
}

/// Live state without the log, for comparisons across log stepping.
pub fn state(battle: &Battle) -> Battle {
    let mut state = battle.clone();
    state.log = DiffLog::new();
    state
}

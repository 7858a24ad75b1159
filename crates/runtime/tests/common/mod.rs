#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tactics_core::{
    ActionKind, AttributeKind, Battle, BattleConfig, Effect, EffectId, EffectKind, Equipment,
    EquipmentId, FireWeapon, FixedRng, MoveEngine, PlayerId, RngOracle, Ship, ShipId, SlotType,
};

pub const BLUE: ShipId = ShipId(1);
pub const RED: ShipId = ShipId(2);
pub const BLUE_GUN: EquipmentId = EquipmentId(11);

pub fn rng() -> Arc<dyn RngOracle> {
    Arc::new(FixedRng(u32::MAX))
}

pub fn content_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../tactics/content/data")
}

fn armed(id: ShipId, fleet: tactics_core::FleetId, maneuvrability: i32, base: u32) -> Ship {
    let gun = Equipment::new(EquipmentId(base + 1), "laser", SlotType::Weapon).with_action(
        ActionKind::FireWeapon(FireWeapon {
            power: 3,
            range: 1000.0,
            blast: 0.0,
            effects: vec![Effect::new(
                EffectId(100 + base),
                EffectKind::Damage { base: 50, span: 0 },
            )],
        }),
    );
    let engine = Equipment::new(EquipmentId(base + 2), "engine", SlotType::Engine)
        .with_action(ActionKind::Move(MoveEngine::new(100.0)));
    Ship::new(id, fleet, format!("ship-{}", id.0))
        .with_base_attribute(AttributeKind::HullCapacity, 150)
        .with_base_attribute(AttributeKind::ShieldCapacity, 400)
        .with_base_attribute(AttributeKind::PowerCapacity, 10)
        .with_base_attribute(AttributeKind::Maneuvrability, maneuvrability)
        .with_equipment(gun)
        .with_equipment(engine)
}

/// Unstarted duel: blue (fleet 0) plays first once started.
pub fn duel() -> Battle {
    let mut battle = Battle::new(BattleConfig::with_seed(3));
    let blue = battle.add_fleet(PlayerId(0), "blue");
    let red = battle.add_fleet(PlayerId(1), "red");
    battle.add_ship(armed(BLUE, blue, 5, 10)).unwrap();
    battle.add_ship(armed(RED, red, 1, 20)).unwrap();
    battle
}

//! Battle assembly from catalog templates.

use tactics_core::{
    ActionKind, Battle, BattleConfig, BattleError, DeployDrone, Effect, EffectId, EffectKind,
    Equipment, EquipmentId, ErrorSeverity, FireWeapon, FleetId, MoveEngine, PlayerId, SetupError,
    Ship, ShipId, Toggle, Vigilance,
};

use crate::catalog::{ActionTemplate, BattleSetup, Catalog, EffectTemplate, EquipmentTemplate, ShipSpec};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    #[error("ship `{ship}` uses unknown model `{model}`")]
    UnknownModel { ship: String, model: String },

    #[error("ship `{ship}` mounts unknown equipment `{code}`")]
    UnknownEquipment { ship: String, code: String },

    #[error("a battle needs at least two fleets, got {0}")]
    NotEnoughFleets(usize),

    #[error(transparent)]
    Setup(#[from] SetupError),
}

impl BattleError for AssemblyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownModel { .. } => "CONTENT_UNKNOWN_MODEL",
            Self::UnknownEquipment { .. } => "CONTENT_UNKNOWN_EQUIPMENT",
            Self::NotEnoughFleets(_) => "CONTENT_NOT_ENOUGH_FLEETS",
            Self::Setup(err) => err.error_code(),
        }
    }
}

/// Sequential id counters. Ids start at 1 and are never reused.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    ship: u32,
    equipment: u32,
    effect: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            ship: 1,
            equipment: 1,
            effect: 1,
        }
    }
}

impl IdAllocator {
    pub fn ship(&mut self) -> ShipId {
        let id = ShipId(self.ship);
        self.ship += 1;
        id
    }

    pub fn equipment(&mut self) -> EquipmentId {
        let id = EquipmentId(self.equipment);
        self.equipment += 1;
        id
    }

    pub fn effect(&mut self) -> EffectId {
        let id = EffectId(self.effect);
        self.effect += 1;
        id
    }
}

/// Builds battles out of a catalog.
///
/// Every mounted equipment gets its own effect ids, so two ships carrying
/// the same aura project two distinct entries.
pub struct BattleAssembler<'a> {
    catalog: &'a Catalog,
    ids: IdAllocator,
}

impl<'a> BattleAssembler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            ids: IdAllocator::default(),
        }
    }

    /// Assembles an unstarted battle. Fleet `n` of the setup becomes
    /// `FleetId(n)`.
    pub fn assemble(
        &mut self,
        setup: &BattleSetup,
        config: BattleConfig,
    ) -> Result<Battle, AssemblyError> {
        if setup.fleets.len() < 2 {
            return Err(AssemblyError::NotEnoughFleets(setup.fleets.len()));
        }

        let mut battle = Battle::new(config);
        for spec in &setup.fleets {
            let fleet = battle.add_fleet(PlayerId(spec.player), spec.name.clone());
            for ship in &spec.ships {
                let ship = self.ship(fleet, ship)?;
                battle.add_ship(ship)?;
            }
        }
        tracing::debug!(
            fleets = battle.fleets.len(),
            ships = battle.ships.len(),
            "battle assembled"
        );
        Ok(battle)
    }

    pub fn ship(&mut self, fleet: FleetId, spec: &ShipSpec) -> Result<Ship, AssemblyError> {
        let model = self
            .catalog
            .model(&spec.model)
            .ok_or_else(|| AssemblyError::UnknownModel {
                ship: spec.name.clone(),
                model: spec.model.clone(),
            })?;

        let mut ship = Ship::new(self.ids.ship(), fleet, spec.name.clone());
        for (kind, value) in model.base_attributes() {
            ship = ship.with_base_attribute(kind, value);
        }
        for code in &spec.equipment {
            let template =
                self.catalog
                    .equipment(code)
                    .ok_or_else(|| AssemblyError::UnknownEquipment {
                        ship: spec.name.clone(),
                        code: code.clone(),
                    })?;
            let equipment = self.equipment(template);
            ship.equip(equipment);
        }
        Ok(ship)
    }

    pub fn equipment(&mut self, template: &EquipmentTemplate) -> Equipment {
        let mut equipment = Equipment::new(self.ids.equipment(), template.code.clone(), template.slot)
            .with_cooldown(template.overheat, template.cooling);
        if let Some(action) = &template.action {
            equipment = equipment.with_action(self.action(action));
        }
        for effect in &template.permanent {
            equipment = equipment.with_permanent_effect(self.effect(effect));
        }
        equipment
    }

    fn action(&mut self, template: &ActionTemplate) -> ActionKind {
        match template {
            ActionTemplate::Weapon {
                power,
                range,
                blast,
                effects,
            } => ActionKind::FireWeapon(FireWeapon {
                power: *power,
                range: *range,
                blast: *blast,
                effects: self.effects(effects),
            }),
            ActionTemplate::Engine {
                distance_per_power,
                safety_distance,
            } => ActionKind::Move(MoveEngine {
                distance_per_power: *distance_per_power,
                safety_distance: *safety_distance,
            }),
            ActionTemplate::Toggle {
                power,
                radius,
                effects,
            } => ActionKind::Toggle(Toggle {
                power: *power,
                radius: *radius,
                effects: self.effects(effects),
            }),
            ActionTemplate::Vigilance {
                power,
                radius,
                intruder_count,
                intruder_effects,
            } => ActionKind::Vigilance(Vigilance {
                power: *power,
                radius: *radius,
                intruder_count: *intruder_count,
                intruder_effects: self.effects(intruder_effects),
                watch: self.ids.effect(),
            }),
            ActionTemplate::Drone {
                power,
                deploy_distance,
                lifetime,
                effect_radius,
                effects,
            } => ActionKind::DeployDrone(DeployDrone {
                power: *power,
                deploy_distance: *deploy_distance,
                lifetime: *lifetime,
                effect_radius: *effect_radius,
                effects: self.effects(effects),
            }),
        }
    }

    fn effects(&mut self, templates: &[EffectTemplate]) -> Vec<Effect> {
        templates.iter().map(|template| self.effect(template)).collect()
    }

    pub fn effect(&mut self, template: &EffectTemplate) -> Effect {
        let id = self.ids.effect();
        let kind = match template {
            EffectTemplate::Damage { base, span } => EffectKind::Damage {
                base: *base,
                span: *span,
            },
            EffectTemplate::Attribute { attribute, value } => EffectKind::Attribute {
                attribute: *attribute,
                value: *value,
            },
            EffectTemplate::AttributeMultiply { attribute, value } => {
                EffectKind::AttributeMultiply {
                    attribute: *attribute,
                    value: *value,
                }
            }
            EffectTemplate::AttributeLimit { attribute, value } => EffectKind::AttributeLimit {
                attribute: *attribute,
                value: *value,
            },
            EffectTemplate::Value {
                value,
                on,
                off,
                start,
                end,
            } => EffectKind::Value {
                value: *value,
                on: *on,
                off: *off,
                start: *start,
                end: *end,
            },
            EffectTemplate::ValueTransfer { value, amount } => EffectKind::ValueTransfer {
                value: *value,
                amount: *amount,
            },
            EffectTemplate::Cooldown { cooling, maxcount } => EffectKind::Cooldown {
                cooling: *cooling,
                maxcount: *maxcount,
            },
            EffectTemplate::Repel { distance } => EffectKind::Repel {
                distance: *distance,
            },
            EffectTemplate::Pinned { hard } => EffectKind::Pinned { hard: *hard },
            EffectTemplate::DamageModifier { percent } => {
                EffectKind::DamageModifier { percent: *percent }
            }
            EffectTemplate::Sticky {
                base,
                duration,
                mode,
            } => {
                let base = self.effect(base);
                return Effect::sticky_with_mode(id, base, *duration, *mode);
            }
        };
        Effect::new(id, kind)
    }
}

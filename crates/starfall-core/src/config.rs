//! Weapon, hull and loadout configuration.
//!
//! `*Record` types mirror the JSON data files. They are turned into
//! immutable configs once at load time and shared through `Arc` by every
//! runtime object of that kind.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::effectiveness;
use crate::enums::{AbilityKind, DamageType, HullType, ProjectileBodyKind};
use crate::error::ConfigError;

fn one() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn default_lifetime() -> f32 {
    DEFAULT_PROJECTILE_LIFETIME
}

/// Ballistic properties of a projectile kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileConfig {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "dmg")]
    pub damage: f32,
    #[serde(default)]
    pub dmg_type: DamageType,
    /// Muzzle speed relative to the carrier.
    #[serde(rename = "speedLen")]
    pub speed: f32,
    #[serde(default)]
    pub acc: f32,
    /// Diameter of the physical body. Zero means a ray-stepped point.
    #[serde(default)]
    pub phys_size: f32,
    /// Knock-back density. `None` behaves as density 1 on a ball body and
    /// gives the projectile no knock-back credit.
    #[serde(default)]
    pub density: Option<f32>,
    /// Homing turn rate in degrees per second; 0 is unguided.
    #[serde(default)]
    pub guide_rot_spd: f32,
    /// Spawned at rest (mines) instead of inheriting the carrier velocity.
    #[serde(default)]
    pub zero_abs_spd: bool,
    /// Seconds of control loss inflicted on hit.
    #[serde(default)]
    pub em_time: f32,
    #[serde(default)]
    pub massless: bool,
    #[serde(default = "default_lifetime")]
    pub lifetime: f32,
}

impl ProjectileConfig {
    pub fn body_kind(&self) -> ProjectileBodyKind {
        if self.phys_size > 0.0 {
            ProjectileBodyKind::Ball
        } else {
            ProjectileBodyKind::Point
        }
    }

    pub fn is_guided(&self) -> bool {
        self.guide_rot_spd > 0.0
    }

    pub fn knocks_back(&self) -> bool {
        self.density.is_some_and(|d| d > 0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = self.code.as_str();
        if self.damage < 0.0 {
            return Err(ConfigError::invalid(code, "dmg", "must not be negative"));
        }
        if self.speed < 0.0 {
            return Err(ConfigError::invalid(code, "speedLen", "must not be negative"));
        }
        if self.acc < 0.0 {
            return Err(ConfigError::invalid(code, "acc", "must not be negative"));
        }
        if self.phys_size < 0.0 {
            return Err(ConfigError::invalid(code, "physSize", "must not be negative"));
        }
        if self.lifetime <= 0.0 {
            return Err(ConfigError::invalid(code, "lifetime", "must be positive"));
        }
        Ok(())
    }
}

/// A clip as it appears in the data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipRecord {
    #[serde(rename = "projectile")]
    pub projectile_code: String,
    pub size: u32,
    #[serde(default)]
    pub infinite: bool,
    #[serde(default = "one_u32")]
    pub projectiles_per_shot: u32,
    #[serde(default)]
    pub plural: String,
    #[serde(default)]
    pub price: f32,
}

#[derive(Debug, Clone)]
pub struct ClipConfig {
    pub code: String,
    pub projectile: Arc<ProjectileConfig>,
    pub size: u32,
    pub infinite: bool,
    pub projectiles_per_shot: u32,
    pub plural: String,
    pub price: f32,
}

impl ClipConfig {
    pub fn build(
        code: &str,
        record: ClipRecord,
        projectile: Arc<ProjectileConfig>,
    ) -> Result<ClipConfig, ConfigError> {
        if record.size == 0 {
            return Err(ConfigError::invalid(code, "size", "must be positive"));
        }
        if record.projectiles_per_shot == 0 {
            return Err(ConfigError::invalid(
                code,
                "projectilesPerShot",
                "must be positive",
            ));
        }
        Ok(ClipConfig {
            code: code.to_string(),
            projectile,
            size: record.size,
            infinite: record.infinite,
            projectiles_per_shot: record.projectiles_per_shot,
            plural: record.plural,
            price: record.price,
        })
    }
}

/// A gun as it appears in the data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GunRecord {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub min_angle_var: f32,
    pub max_angle_var: f32,
    pub angle_var_damp: f32,
    pub angle_var_per_shot: f32,
    pub time_between_shots: f32,
    pub reload_time: f32,
    pub gun_length: f32,
    #[serde(default = "one")]
    pub tex_len_perc: f32,
    #[serde(default)]
    pub light_on_shot: bool,
    #[serde(default)]
    pub price: f32,
    #[serde(default)]
    pub fixed: bool,
    pub clip_name: String,
}

/// Immutable gun description shared by every gun of that kind.
#[derive(Debug, Clone)]
pub struct GunConfig {
    pub code: String,
    pub display_name: String,
    pub min_angle_var: f32,
    pub max_angle_var: f32,
    pub angle_var_damp: f32,
    pub angle_var_per_shot: f32,
    pub time_between_shots: f32,
    pub reload_time: f32,
    pub gun_length: f32,
    pub tex_len_perc: f32,
    pub light_on_shot: bool,
    pub price: f32,
    /// Fixed guns cannot rotate and need a mount that does not allow rotation.
    pub fixed: bool,
    pub clip: Arc<ClipConfig>,
    /// Damage per second if every projectile hits.
    pub dps: f32,
    /// Expected damage per second accounting for hit chance.
    pub mean_dps: f32,
    pub desc: String,
}

impl GunConfig {
    pub fn build(
        code: &str,
        record: GunRecord,
        clip: Arc<ClipConfig>,
    ) -> Result<GunConfig, ConfigError> {
        if record.min_angle_var < 0.0 {
            return Err(ConfigError::invalid(code, "minAngleVar", "must not be negative"));
        }
        if record.max_angle_var < record.min_angle_var {
            return Err(ConfigError::invalid(
                code,
                "maxAngleVar",
                "must not be below minAngleVar",
            ));
        }
        if record.angle_var_damp < 0.0 || record.angle_var_per_shot < 0.0 {
            return Err(ConfigError::invalid(
                code,
                "angleVarDamp/angleVarPerShot",
                "must not be negative",
            ));
        }
        if record.time_between_shots < 0.0 {
            return Err(ConfigError::invalid(
                code,
                "timeBetweenShots",
                "must not be negative",
            ));
        }
        if record.reload_time < 0.0 {
            return Err(ConfigError::invalid(code, "reloadTime", "must not be negative"));
        }
        if record.time_between_shots == 0.0 && record.reload_time == 0.0 {
            return Err(ConfigError::invalid(
                code,
                "reloadTime",
                "must be positive when timeBetweenShots is 0",
            ));
        }

        let mut config = GunConfig {
            code: code.to_string(),
            display_name: record.display_name,
            min_angle_var: record.min_angle_var,
            max_angle_var: record.max_angle_var,
            angle_var_damp: record.angle_var_damp,
            angle_var_per_shot: record.angle_var_per_shot,
            time_between_shots: record.time_between_shots,
            reload_time: record.reload_time,
            gun_length: record.gun_length,
            tex_len_perc: record.tex_len_perc,
            light_on_shot: record.light_on_shot,
            price: record.price,
            fixed: record.fixed,
            clip,
            dps: 0.0,
            mean_dps: 0.0,
            desc: String::new(),
        };
        config.dps = effectiveness::shot_dps(&config, config.projectile().damage);
        config.mean_dps = effectiveness::gun_mean_dps(&config);
        config.desc = config.describe();
        Ok(config)
    }

    pub fn projectile(&self) -> &ProjectileConfig {
        &self.clip.projectile
    }

    fn describe(&self) -> String {
        let projectile = self.projectile();
        let mut lines = vec![if self.fixed {
            "Heavy gun (no rotation)".to_string()
        } else {
            "Light gun (auto rotation)".to_string()
        }];
        if projectile.damage > 0.0 {
            lines.push(format!("Dmg: {:.1}/s", self.dps));
            match projectile.dmg_type {
                DamageType::Energy => lines.push("Weak against armor".to_string()),
                DamageType::Bullet => lines.push("Weak against shields".to_string()),
                _ => {}
            }
        } else if projectile.em_time > 0.0 {
            lines.push(format!("Disables enemy ships for {:.1} s", projectile.em_time));
        }
        if projectile.knocks_back() {
            lines.push("Knocks enemies back".to_string());
        }
        lines.push(format!("Reload: {:.1} s", self.reload_time));
        if self.clip.infinite {
            lines.push("Infinite ammo".to_string());
        } else {
            lines.push(format!("Uses {}", self.clip.plural));
        }
        lines.join("\n")
    }
}

/// Mount point on a hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GunSlot {
    /// Position relative to the hull origin, in hull space.
    pub pos: Vec2,
    pub allows_rotation: bool,
    #[serde(default)]
    pub under_ship: bool,
}

impl GunSlot {
    /// Fixed guns go into slots without rotation, free guns into rotating ones.
    pub fn accepts(&self, gun: &GunConfig) -> bool {
        gun.fixed != self.allows_rotation
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub big: bool,
}

impl EngineConfig {
    pub fn rot_acc(&self) -> f32 {
        if self.big {
            BIG_ENGINE_ROT_ACC
        } else {
            ENGINE_ROT_ACC
        }
    }

    pub fn max_rot_spd(&self) -> f32 {
        if self.big {
            BIG_ENGINE_MAX_ROT_SPD
        } else {
            ENGINE_MAX_ROT_SPD
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HullConfig {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type", default)]
    pub hull_type: HullType,
    /// Radius used for targeting and body creation.
    pub approx_radius: f32,
    pub max_life: f32,
    #[serde(default = "one")]
    pub density: f32,
    #[serde(default)]
    pub gun_slots: Vec<GunSlot>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl HullConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = self.code.as_str();
        if self.approx_radius <= 0.0 {
            return Err(ConfigError::invalid(code, "approxRadius", "must be positive"));
        }
        if self.max_life <= 0.0 {
            return Err(ConfigError::invalid(code, "maxLife", "must be positive"));
        }
        if self.density <= 0.0 {
            return Err(ConfigError::invalid(code, "density", "must be positive"));
        }
        if self.gun_slots.len() > 2 {
            return Err(ConfigError::invalid(code, "gunSlots", "at most 2 are supported"));
        }
        Ok(())
    }
}

/// A ship ability and its tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AbilityConfig {
    KnockBack { recharge_time: f32, force: f32 },
    SloMo { recharge_time: f32, factor: f32 },
}

impl AbilityConfig {
    pub fn kind(&self) -> AbilityKind {
        match self {
            AbilityConfig::KnockBack { .. } => AbilityKind::KnockBack,
            AbilityConfig::SloMo { .. } => AbilityKind::SloMo,
        }
    }

    pub fn recharge_time(&self) -> f32 {
        match *self {
            AbilityConfig::KnockBack { recharge_time, .. }
            | AbilityConfig::SloMo { recharge_time, .. } => recharge_time,
        }
    }
}

/// An item that can appear in a loadout.
#[derive(Debug, Clone)]
pub enum ItemTemplate {
    Gun(Arc<GunConfig>),
    Clip(Arc<ClipConfig>),
    Armor { code: String, perc: f32 },
    Shield { code: String, life: f32 },
    AbilityCharge(AbilityKind),
}

impl ItemTemplate {
    pub fn code(&self) -> &str {
        match self {
            ItemTemplate::Gun(g) => &g.code,
            ItemTemplate::Clip(c) => &c.code,
            ItemTemplate::Armor { code, .. } | ItemTemplate::Shield { code, .. } => code,
            ItemTemplate::AbilityCharge(AbilityKind::KnockBack) => "knockBackCharge",
            ItemTemplate::AbilityCharge(AbilityKind::SloMo) => "sloMoCharge",
        }
    }

    fn same_kind(&self, other: &ItemTemplate) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Interchangeable loadout options, one of which is picked with `chance`.
#[derive(Debug, Clone)]
pub struct ItemGroup {
    pub options: Vec<ItemTemplate>,
    pub chance: f32,
}

impl ItemGroup {
    pub fn new(options: Vec<ItemTemplate>, chance: f32) -> Result<ItemGroup, ConfigError> {
        if let Some(first) = options.first() {
            if options.iter().any(|o| !o.same_kind(first)) {
                return Err(ConfigError::MixedItemTypes {
                    items: Self::names(&options),
                });
            }
        }
        if !(0.0..=1.0).contains(&chance) {
            let code = options.first().map(|o| o.code()).unwrap_or_default();
            return Err(ConfigError::invalid(code, "chance", "must be within [0, 1]"));
        }
        Ok(ItemGroup { options, chance })
    }

    pub(crate) fn names(options: &[ItemTemplate]) -> String {
        options
            .iter()
            .map(|o| o.code())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A hull with its loadout, as spawned by encounters.
#[derive(Debug, Clone)]
pub struct ShipConfig {
    pub code: String,
    pub hull: Arc<HullConfig>,
    pub items: Vec<ItemGroup>,
    pub ability: Option<AbilityConfig>,
    pub dps: f32,
    pub dmg_cap: f32,
}

impl ShipConfig {
    pub fn build(
        code: &str,
        hull: Arc<HullConfig>,
        items: Vec<ItemGroup>,
        ability: Option<AbilityConfig>,
    ) -> Result<ShipConfig, ConfigError> {
        let dps = effectiveness::ship_config_dps(&hull, &items)?;
        let dmg_cap = effectiveness::ship_config_dmg_cap(&hull, &items);
        Ok(ShipConfig {
            code: code.to_string(),
            hull,
            items,
            ability,
            dps,
            dmg_cap,
        })
    }
}

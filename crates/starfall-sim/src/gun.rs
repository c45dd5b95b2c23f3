//! Runtime gun: reload, cooldown and spread state machine.

use std::sync::Arc;

use glam::Vec2;
use hecs::Entity;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfall_core::config::{GunConfig, ProjectileConfig};
use starfall_core::constants::RELOAD_EPSILON;
use starfall_core::events::CombatEvent;
use starfall_core::items::{GunItem, ItemContainer};
use starfall_core::math::{approach, from_al, to_world};
use starfall_core::planet::Planet;
use starfall_core::types::Faction;

/// Where a gun sits this tick and who carries it.
pub struct GunFrame<'a> {
    pub ship: Entity,
    pub slot: u8,
    pub base_pos: Vec2,
    pub base_angle: f32,
    pub base_spd: Vec2,
    pub faction: Option<Faction>,
    /// Planet nearest to the simulation focus.
    pub planet: Option<&'a Planet>,
}

/// A projectile to create during the sweep.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub config: Arc<ProjectileConfig>,
    pub pos: Vec2,
    pub angle: f32,
    /// Velocity the projectile inherits before its own muzzle speed.
    pub base_spd: Vec2,
    pub faction: Option<Faction>,
    pub shooter: Entity,
}

#[derive(Debug, Clone)]
pub struct Gun {
    item: GunItem,
    rel_pos: Vec2,
    cooldown: f32,
    angle_var: f32,
}

impl Gun {
    pub fn new(item: GunItem, rel_pos: Vec2) -> Self {
        let angle_var = item.config.min_angle_var;
        Self {
            item,
            rel_pos,
            cooldown: 0.0,
            angle_var,
        }
    }

    pub fn item(&self) -> &GunItem {
        &self.item
    }

    pub fn config(&self) -> &Arc<GunConfig> {
        &self.item.config
    }

    pub fn into_item(self) -> GunItem {
        self.item
    }

    /// Current spread half-angle in degrees.
    pub fn angle_var(&self) -> f32 {
        self.angle_var
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Sprite length in world units.
    pub fn tex_len(&self) -> f32 {
        let config = self.config();
        config.gun_length / config.tex_len_perc * 2.0
    }

    /// World position of the muzzle for a gun turned `gun_rel_angle` away
    /// from the hull heading.
    pub fn muzzle_pos(&self, gun_rel_angle: f32, base_angle: f32, base_pos: Vec2) -> Vec2 {
        let muzzle_rel = from_al(gun_rel_angle, self.config().gun_length) + self.rel_pos;
        to_world(muzzle_rel, base_angle, base_pos)
    }

    /// Advance the gun by `ts`. Returns whether it fired.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        inventory: &mut ItemContainer,
        gun_angle: f32,
        frame: &GunFrame,
        should_shoot: bool,
        ts: f32,
        rng: &mut ChaCha8Rng,
        spawns: &mut Vec<SpawnRequest>,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let muzzle = self.muzzle_pos(gun_angle - frame.base_angle, frame.base_angle, frame.base_pos);
        let ship_id = frame.ship.to_bits().get();

        if self.item.ammo == 0 && self.item.reload_await <= 0.0 {
            let clip = &self.item.config.clip;
            if clip.infinite || inventory.try_consume_clip(clip) {
                self.item.reload_await = self.item.config.reload_time + RELOAD_EPSILON;
                log::trace!("{} reloading", self.item.config.code);
                events.push(CombatEvent::ReloadSound {
                    ship: ship_id,
                    gun: self.item.config.code.clone(),
                });
            }
        } else if self.item.reload_await > 0.0 {
            self.item.reload_await -= ts;
            if self.item.reload_await <= 0.0 {
                self.item.ammo = self.item.config.clip.size;
            }
        }

        if self.cooldown > 0.0 {
            self.cooldown -= ts;
        }

        let shot = should_shoot && self.cooldown <= 0.0 && self.item.ammo > 0;
        if shot {
            self.shoot(gun_angle, muzzle, frame, rng, spawns);
            events.push(CombatEvent::ShootSound {
                ship: ship_id,
                gun: self.item.config.code.clone(),
                pos: muzzle,
            });
            if self.item.config.light_on_shot {
                events.push(CombatEvent::GunFlash {
                    ship: ship_id,
                    slot: frame.slot,
                    pos: muzzle,
                });
            }
        } else {
            let config = &self.item.config;
            self.angle_var = approach(self.angle_var, config.min_angle_var, config.angle_var_damp * ts);
        }
        shot
    }

    fn shoot(
        &mut self,
        gun_angle: f32,
        muzzle: Vec2,
        frame: &GunFrame,
        rng: &mut ChaCha8Rng,
        spawns: &mut Vec<SpawnRequest>,
    ) {
        let config = self.item.config.clone();
        let clip = &config.clip;
        let projectile = &clip.projectile;

        let base_spd = if projectile.zero_abs_spd {
            match frame.planet {
                Some(p) if p.is_near_ground(muzzle) => p.spd_at_pos(muzzle),
                _ => Vec2::ZERO,
            }
        } else {
            frame.base_spd
        };

        self.angle_var = approach(self.angle_var, config.max_angle_var, config.angle_var_per_shot);
        for _ in 0..clip.projectiles_per_shot {
            let mut angle = gun_angle;
            if self.angle_var > 0.0 {
                angle += rng.gen_range(-self.angle_var..=self.angle_var);
            }
            spawns.push(SpawnRequest {
                config: projectile.clone(),
                pos: muzzle,
                angle,
                base_spd,
                faction: frame.faction,
                shooter: frame.ship,
            });
        }
        self.cooldown += config.time_between_shots;
        self.item.ammo -= 1;
    }
}

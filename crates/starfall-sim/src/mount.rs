//! Gun mounts: aim control and gun attachment.

use glam::Vec2;
use hecs::Entity;
use rand_chacha::ChaCha8Rng;

use starfall_ai::intercept::solve_intercept;
use starfall_core::config::GunSlot;
use starfall_core::constants::{AUTO_SHOOT_GROUND, AUTO_SHOOT_SPACE};
use starfall_core::enums::HullType;
use starfall_core::events::CombatEvent;
use starfall_core::items::{GunItem, ItemContainer};
use starfall_core::math::to_world;

use crate::error::CombatError;
use crate::gun::{Gun, GunFrame, SpawnRequest};
use crate::targeting::Target;

/// Per-tick context of the hull carrying the mount.
pub struct MountFrame<'a> {
    pub gun: GunFrame<'a>,
    pub hull_type: HullType,
    pub approx_radius: f32,
    pub is_player: bool,
    pub enemy: Option<&'a Target>,
}

#[derive(Debug, Clone)]
pub struct GunMount {
    rel_pos: Vec2,
    fixed: bool,
    under_ship: bool,
    gun: Option<Gun>,
    detected: bool,
    rel_angle: f32,
}

impl GunMount {
    pub fn new(slot: &GunSlot) -> Self {
        Self {
            rel_pos: slot.pos,
            fixed: !slot.allows_rotation,
            under_ship: slot.under_ship,
            gun: None,
            detected: false,
            rel_angle: 0.0,
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn rel_pos(&self) -> Vec2 {
        self.rel_pos
    }

    pub fn gun(&self) -> Option<&Gun> {
        self.gun.as_ref()
    }

    pub fn gun_item(&self) -> Option<&GunItem> {
        self.gun.as_ref().map(Gun::item)
    }

    /// An auto-rotating mount has a firing solution this tick.
    pub fn is_detected(&self) -> bool {
        self.detected
    }

    /// Aim relative to the hull heading, degrees.
    pub fn rel_angle(&self) -> f32 {
        self.rel_angle
    }

    /// Swap the mounted gun. Returns the previously mounted item.
    ///
    /// A gun whose fixed flag differs from the mount's is rejected before
    /// anything changes.
    pub fn set_gun(
        &mut self,
        ship: Entity,
        slot: u8,
        item: Option<GunItem>,
        events: &mut Vec<CombatEvent>,
    ) -> Result<Option<GunItem>, CombatError> {
        if let Some(new) = &item {
            if new.config.fixed != self.fixed {
                log::warn!("rejected gun `{}` for slot {slot}", new.config.code);
                return Err(CombatError::IncompatibleMount {
                    gun: new.config.code.clone(),
                    gun_kind: if new.config.fixed { "fixed" } else { "free" },
                    mount_kind: if self.fixed { "fixed" } else { "free" },
                });
            }
        }

        let ship_id = ship.to_bits().get();
        let old = self.gun.take().map(|gun| {
            let mut old = gun.into_item();
            old.equipped = None;
            events.push(CombatEvent::GunDetached {
                ship: ship_id,
                slot,
                gun: old.config.code.clone(),
            });
            old
        });

        if let Some(mut new) = item {
            new.equipped = Some(slot);
            let gun = Gun::new(new, self.rel_pos);
            events.push(CombatEvent::GunAttached {
                ship: ship_id,
                slot,
                gun: gun.config().code.clone(),
                tex_len: gun.tex_len(),
                under_ship: self.under_ship,
            });
            self.gun = Some(gun);
        }
        self.rel_angle = 0.0;
        self.detected = false;
        Ok(old)
    }

    /// Aim and run the mounted gun. Returns whether it fired.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        inventory: &mut ItemContainer,
        frame: &MountFrame,
        should_shoot: bool,
        ts: f32,
        rng: &mut ChaCha8Rng,
        spawns: &mut Vec<SpawnRequest>,
        events: &mut Vec<CombatEvent>,
    ) -> bool {
        let Some(gun) = self.gun.as_mut() else {
            return false;
        };
        let base = &frame.gun;

        if frame.hull_type != HullType::Station {
            self.rel_angle = 0.0;
        }
        self.detected = false;

        if let (false, Some(enemy)) = (self.fixed, frame.enemy) {
            let dst = base.base_pos.distance(enemy.pos) - frame.approx_radius - enemy.approx_radius;
            let near_ground = base.planet.is_some_and(|p| p.is_near_ground(base.base_pos));
            let det_dst = if near_ground {
                AUTO_SHOOT_GROUND
            } else {
                AUTO_SHOOT_SPACE
            };
            if dst < det_dst {
                let mount_pos = to_world(self.rel_pos, base.base_angle, base.base_pos);
                let solution = solve_intercept(
                    mount_pos,
                    base.base_spd,
                    enemy.pos,
                    enemy.spd,
                    gun.config().projectile().speed,
                    frame.is_player,
                );
                if let Some(solution) = solution {
                    self.rel_angle = solution.angle - base.base_angle;
                    self.detected = true;
                }
            }
        }

        let gun_angle = base.base_angle + self.rel_angle;
        gun.update(inventory, gun_angle, base, should_shoot, ts, rng, spawns, events)
    }
}

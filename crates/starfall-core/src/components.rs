//! ECS components for hecs entities.
//!
//! Components here are plain data. Components that own physics handles or
//! runtime guns live in the simulation crate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Faction;

/// Pose and velocity mirrored from the physics world after every step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub pos: Vec2,
    pub spd: Vec2,
    /// Heading in degrees.
    pub angle: f32,
    /// Degrees per second.
    pub rot_spd: f32,
}

/// Control inputs of a ship, written by the player or the AI each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pilot {
    pub faction: Option<Faction>,
    pub kind: PilotKind,
    /// How far the pilot looks for enemies, surface to surface.
    pub detection_dist: f32,
    /// Primary trigger (first mount).
    pub shoot: bool,
    /// Secondary trigger (second mount).
    pub shoot2: bool,
    pub use_ability: bool,
    pub turn: Option<TurnDirection>,
    /// Forbids the AI from turning the hull toward its aim.
    #[serde(default)]
    pub hold_heading: bool,
    /// Remaining EM disable time. Controls are ignored while positive.
    pub disabled_secs: f32,
}

impl Pilot {
    pub fn is_player(&self) -> bool {
        self.kind == PilotKind::Player
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_secs > 0.0
    }

    pub fn trigger(&self, secondary: bool) -> bool {
        if secondary {
            self.shoot2
        } else {
            self.shoot
        }
    }
}

/// Hit points and protection of a ship.
///
/// Shields soak bullets and explosions until depleted. Armor reduces energy,
/// explosion and crash damage by its fraction. Fire bypasses both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Durability {
    pub life: f32,
    pub max_life: f32,
    pub armor_perc: f32,
    pub shield_life: f32,
}

impl Durability {
    pub fn new(max_life: f32) -> Self {
        Self {
            life: max_life,
            max_life,
            ..Default::default()
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    /// Apply damage and return how much hull life was lost.
    pub fn receive_damage(&mut self, dmg: f32, dmg_type: DamageType) -> f32 {
        if dmg <= 0.0 || self.is_dead() {
            return 0.0;
        }
        let mut dmg = dmg;
        if matches!(dmg_type, DamageType::Bullet | DamageType::Explosion) && self.shield_life > 0.0
        {
            let absorbed = dmg.min(self.shield_life);
            self.shield_life -= absorbed;
            dmg -= absorbed;
        }
        if matches!(
            dmg_type,
            DamageType::Energy | DamageType::Explosion | DamageType::Crash
        ) {
            dmg *= 1.0 - self.armor_perc;
        }
        let lost = dmg.min(self.life);
        self.life -= lost;
        lost
    }
}

/// Marker: the entity is pulled by planets and stars.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ReceivesGravity;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shield_soaks_bullets_before_hull() {
        let mut d = Durability {
            shield_life: 5.0,
            ..Durability::new(20.0)
        };
        assert_relative_eq!(d.receive_damage(8.0, DamageType::Bullet), 3.0);
        assert_relative_eq!(d.shield_life, 0.0);
        assert_relative_eq!(d.life, 17.0);
    }

    #[test]
    fn test_armor_reduces_energy_but_not_fire() {
        let mut d = Durability {
            armor_perc: 0.5,
            shield_life: 100.0,
            ..Durability::new(20.0)
        };
        assert_relative_eq!(d.receive_damage(10.0, DamageType::Energy), 5.0);
        assert_relative_eq!(d.receive_damage(4.0, DamageType::Fire), 4.0);
        assert_relative_eq!(d.shield_life, 100.0);
        assert_relative_eq!(d.life, 11.0);
    }

    #[test]
    fn test_dead_hull_takes_no_more_damage() {
        let mut d = Durability::new(5.0);
        assert_relative_eq!(d.receive_damage(50.0, DamageType::Crash), 5.0);
        assert!(d.is_dead());
        assert_relative_eq!(d.receive_damage(1.0, DamageType::Fire), 0.0);
    }
}

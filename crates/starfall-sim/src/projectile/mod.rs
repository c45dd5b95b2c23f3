//! Projectiles and their two motion strategies.
//!
//! Projectiles with a physical size fly as simulated balls; the rest are
//! points stepped along their velocity with a ray cast each tick.

mod ball;
mod point;

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use hecs::Entity;

use starfall_core::config::ProjectileConfig;
use starfall_core::enums::ProjectileBodyKind;
use starfall_core::types::Faction;

use crate::physics::{BodyHandle, PhysicsWorld, RayHit};

pub use ball::BallBody;
pub use point::PointBody;

/// What a projectile ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// `None` for scenery.
    pub owner: Option<Entity>,
    pub point: Vec2,
}

/// Common contract of projectile motion strategies.
pub trait ProjectileMotion {
    /// Advance one tick. Returns the obstacle hit while moving, if the
    /// strategy detects hits itself.
    fn update(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        ts: f32,
        collide: &dyn Fn(&RayHit) -> bool,
    ) -> Option<Obstacle>;

    /// Re-read state after the physics step.
    fn sync(&mut self, _physics: &dyn PhysicsWorld) {}

    fn pos(&self) -> Vec2;
    fn spd(&self) -> Vec2;
    fn angle(&self) -> f32;

    /// Turn by `diff` degrees.
    fn change_angle(&mut self, physics: &mut dyn PhysicsWorld, diff: f32);

    /// Apply a force. Acceleration-type forces (gravity) act regardless of
    /// mass.
    fn receive_force(&mut self, physics: &mut dyn PhysicsWorld, force: Vec2, ts: f32, acc: bool);

    fn on_remove(&mut self, physics: &mut dyn PhysicsWorld);

    /// Heading that steers the projectile onto a target at `target_pos`
    /// moving at `target_spd`.
    fn desired_angle(&self, target_pos: Vec2, target_spd: Vec2) -> f32;
}

#[derive(Debug, Clone)]
pub enum ProjectileBody {
    Ball(BallBody),
    Point(PointBody),
}

impl ProjectileBody {
    /// Launch a body at `angle` with the configured muzzle speed on top of
    /// `base_spd`.
    pub fn launch(
        physics: &mut dyn PhysicsWorld,
        config: &ProjectileConfig,
        pos: Vec2,
        angle: f32,
        base_spd: Vec2,
        owner: Entity,
    ) -> Self {
        match config.body_kind() {
            ProjectileBodyKind::Ball => {
                ProjectileBody::Ball(BallBody::new(physics, config, pos, angle, base_spd, owner))
            }
            ProjectileBodyKind::Point => {
                ProjectileBody::Point(PointBody::new(config, pos, angle, base_spd))
            }
        }
    }

    pub fn physics_body(&self) -> Option<BodyHandle> {
        match self {
            ProjectileBody::Ball(b) => Some(b.handle()),
            ProjectileBody::Point(_) => None,
        }
    }

    fn motion(&self) -> &dyn ProjectileMotion {
        match self {
            ProjectileBody::Ball(b) => b,
            ProjectileBody::Point(p) => p,
        }
    }

    fn motion_mut(&mut self) -> &mut dyn ProjectileMotion {
        match self {
            ProjectileBody::Ball(b) => b,
            ProjectileBody::Point(p) => p,
        }
    }
}

impl ProjectileMotion for ProjectileBody {
    fn update(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        ts: f32,
        collide: &dyn Fn(&RayHit) -> bool,
    ) -> Option<Obstacle> {
        self.motion_mut().update(physics, ts, collide)
    }

    fn sync(&mut self, physics: &dyn PhysicsWorld) {
        self.motion_mut().sync(physics)
    }

    fn pos(&self) -> Vec2 {
        self.motion().pos()
    }

    fn spd(&self) -> Vec2 {
        self.motion().spd()
    }

    fn angle(&self) -> f32 {
        self.motion().angle()
    }

    fn change_angle(&mut self, physics: &mut dyn PhysicsWorld, diff: f32) {
        self.motion_mut().change_angle(physics, diff)
    }

    fn receive_force(&mut self, physics: &mut dyn PhysicsWorld, force: Vec2, ts: f32, acc: bool) {
        self.motion_mut().receive_force(physics, force, ts, acc)
    }

    fn on_remove(&mut self, physics: &mut dyn PhysicsWorld) {
        self.motion_mut().on_remove(physics)
    }

    fn desired_angle(&self, target_pos: Vec2, target_spd: Vec2) -> f32 {
        self.motion().desired_angle(target_pos, target_spd)
    }
}

/// Live projectile component.
pub struct Projectile {
    pub config: Arc<ProjectileConfig>,
    pub faction: Option<Faction>,
    /// Ship that fired it.
    pub shooter: Entity,
    pub body: ProjectileBody,
    /// Seconds since launch.
    pub age: f32,
    pub obstacle: Option<Obstacle>,
}

/// Kind of entity a body belongs to, as far as collisions care.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectKind {
    Ship { faction: Option<Faction> },
    Projectile,
}

/// Collision filter of projectiles.
///
/// Scenery always stops a projectile. Other projectiles, the shooter and
/// ships of the projectile's own faction never do.
pub fn should_collide(
    faction: Option<Faction>,
    shooter: Entity,
    other: Option<Entity>,
    kinds: &HashMap<Entity, ObjectKind>,
) -> bool {
    let Some(other) = other else {
        return true;
    };
    if other == shooter {
        return false;
    }
    match kinds.get(&other) {
        Some(ObjectKind::Ship { faction: f }) => !(f.is_some() && *f == faction),
        Some(ObjectKind::Projectile) => false,
        None => true,
    }
}

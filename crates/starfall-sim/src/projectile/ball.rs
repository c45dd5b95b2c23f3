use glam::Vec2;
use hecs::Entity;

use starfall_core::config::ProjectileConfig;
use starfall_core::constants::{MIN_GUIDE_SPD, ZERO_ABS_SPD_SPIN};
use starfall_core::math::{angle, angle_between, can_accelerate, from_al};

use super::{Obstacle, ProjectileMotion};
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld, RayHit};

/// Projectile backed by a physics body. Hits are reported by the physics
/// step as contacts.
#[derive(Debug, Clone)]
pub struct BallBody {
    body: BodyHandle,
    pos: Vec2,
    spd: Vec2,
    angle: f32,
    acc: f32,
    mass: f32,
}

impl BallBody {
    pub fn new(
        physics: &mut dyn PhysicsWorld,
        config: &ProjectileConfig,
        pos: Vec2,
        angle: f32,
        base_spd: Vec2,
        owner: Entity,
    ) -> Self {
        let density = config.density.filter(|d| *d > 0.0).unwrap_or(1.0);
        let spd = from_al(angle, config.speed) + base_spd;
        let body = physics.create_body(BodyDesc {
            pos,
            angle,
            spd,
            rot_spd: if config.zero_abs_spd { ZERO_ABS_SPD_SPIN } else { 0.0 },
            radius: config.phys_size / 2.0,
            density,
            massless: config.massless,
            owner: Some(owner),
            fixed: false,
            projectile: true,
        });
        let mut ball = Self {
            body,
            pos,
            spd,
            angle,
            acc: config.acc,
            mass: 0.0,
        };
        ball.sync(physics);
        ball
    }

    pub fn handle(&self) -> BodyHandle {
        self.body
    }
}

impl ProjectileMotion for BallBody {
    fn update(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        _ts: f32,
        _collide: &dyn Fn(&RayHit) -> bool,
    ) -> Option<Obstacle> {
        self.sync(physics);
        if self.acc > 0.0 && can_accelerate(self.angle, self.spd) {
            physics.apply_force(self.body, from_al(self.angle, self.acc * self.mass));
        }
        None
    }

    fn sync(&mut self, physics: &dyn PhysicsWorld) {
        if let Some(state) = physics.state(self.body) {
            self.pos = state.pos;
            self.spd = state.spd;
            self.angle = state.angle;
            self.mass = state.mass;
        }
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn spd(&self) -> Vec2 {
        self.spd
    }

    fn angle(&self) -> f32 {
        self.angle
    }

    fn change_angle(&mut self, physics: &mut dyn PhysicsWorld, diff: f32) {
        self.angle += diff;
        physics.set_transform(self.body, self.pos, self.angle);
        physics.set_angular_velocity(self.body, 0.0);
    }

    fn receive_force(&mut self, physics: &mut dyn PhysicsWorld, force: Vec2, _ts: f32, acc: bool) {
        let force = if acc { force * self.mass } else { force };
        physics.apply_force(self.body, force);
    }

    fn on_remove(&mut self, physics: &mut dyn PhysicsWorld) {
        physics.destroy_body(self.body);
    }

    /// Steer the velocity, not the nose: aim at the difference between the
    /// velocity that would reach the target and the current one.
    fn desired_angle(&self, target_pos: Vec2, target_spd: Vec2) -> f32 {
        let spd_len = self.spd.length().max(MIN_GUIDE_SPD);
        let desired_spd = from_al(angle_between(self.pos, target_pos), spd_len) + target_spd;
        angle(desired_spd - self.spd)
    }
}

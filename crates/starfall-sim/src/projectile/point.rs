use glam::Vec2;

use starfall_core::config::ProjectileConfig;
use starfall_core::constants::{MAX_MOVE_SPD, POINT_FORCE_MUL};
use starfall_core::math::{angle, angle_between, can_accelerate, from_al, rotate};

use super::{Obstacle, ProjectileMotion};
use crate::physics::{PhysicsWorld, RayControl, RayHit};

/// Kinematic projectile. Moves along its velocity and ray casts the path
/// covered each tick.
#[derive(Debug, Clone)]
pub struct PointBody {
    pos: Vec2,
    spd: Vec2,
    acc: f32,
}

impl PointBody {
    pub fn new(config: &ProjectileConfig, pos: Vec2, angle: f32, base_spd: Vec2) -> Self {
        Self {
            pos,
            spd: from_al(angle, config.speed) + base_spd,
            acc: config.acc,
        }
    }
}

impl ProjectileMotion for PointBody {
    fn update(
        &mut self,
        physics: &mut dyn PhysicsWorld,
        ts: f32,
        collide: &dyn Fn(&RayHit) -> bool,
    ) -> Option<Obstacle> {
        if self.acc > 0.0 && can_accelerate(angle(self.spd), self.spd) {
            let len = self.spd.length();
            if len > 0.0 && len < MAX_MOVE_SPD {
                let new_len = (len + self.acc * ts).min(MAX_MOVE_SPD);
                self.spd *= new_len / len;
            }
        }

        let prev = self.pos;
        let next = self.pos + self.spd * ts;
        let mut obstacle = None;
        physics.ray_cast(prev, next, &mut |hit| {
            if !hit.massless && collide(hit) {
                obstacle = Some(Obstacle {
                    owner: hit.owner,
                    point: hit.point,
                });
                RayControl::Stop
            } else {
                RayControl::Continue
            }
        });
        self.pos = obstacle.map_or(next, |o| o.point);
        obstacle
    }

    fn pos(&self) -> Vec2 {
        self.pos
    }

    fn spd(&self) -> Vec2 {
        self.spd
    }

    fn angle(&self) -> f32 {
        angle(self.spd)
    }

    fn change_angle(&mut self, _physics: &mut dyn PhysicsWorld, diff: f32) {
        self.spd = rotate(self.spd, diff);
    }

    /// Points have no mass; non-acceleration forces are boosted so impulses
    /// such as knock-back still move them noticeably.
    fn receive_force(&mut self, _physics: &mut dyn PhysicsWorld, force: Vec2, ts: f32, acc: bool) {
        let mut dv = force * ts;
        if !acc {
            dv *= POINT_FORCE_MUL;
        }
        self.spd += dv;
    }

    fn on_remove(&mut self, _physics: &mut dyn PhysicsWorld) {}

    fn desired_angle(&self, target_pos: Vec2, _target_spd: Vec2) -> f32 {
        angle_between(self.pos, target_pos)
    }
}

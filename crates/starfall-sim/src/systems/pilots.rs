//! Pilot system: AI fire and turn decisions, EM disable countdown, and hull
//! rotation from the turn input.

use hecs::World;

use starfall_ai::shooter::{self, GunContext, ShooterContext, TargetContext};
use starfall_core::components::{Kinematics, Pilot};
use starfall_core::enums::TurnDirection;
use starfall_core::math::approach;

use crate::components::Hull;
use crate::mount::GunMount;
use crate::physics::PhysicsWorld;
use crate::systems::projectiles::collision_kinds;
use crate::targeting::{has_obstacle, nearest_enemy, Target};

pub fn run(world: &mut World, physics: &mut dyn PhysicsWorld, targets: &[Target], ts: f32) {
    let kinds = collision_kinds(world);
    for (entity, (hull, kin, pilot)) in world.query_mut::<(&Hull, &Kinematics, &mut Pilot)>() {
        if pilot.is_disabled() {
            pilot.disabled_secs = (pilot.disabled_secs - ts).max(0.0);
            pilot.shoot = false;
            pilot.shoot2 = false;
            pilot.turn = None;
        } else if !pilot.is_player() {
            let max_dist = pilot.detection_dist + hull.config.approx_radius;
            let enemy = nearest_enemy(targets, kin.pos, pilot.faction, max_dist);
            let can_shoot = enemy.is_some_and(|e| {
                !has_obstacle(physics, &kinds, kin.pos, e.pos, Some(entity), Some(e.entity))
            });
            let engine = &hull.config.engine;
            let ctx = ShooterContext {
                ship_pos: kin.pos,
                ship_spd: kin.spd,
                ship_angle: kin.angle,
                rot_spd: kin.rot_spd,
                rot_acc: engine.rot_acc(),
                guns: [gun_context(hull.mounts.first()), gun_context(hull.mounts.get(1))],
                target: enemy.map(|e| TargetContext {
                    pos: e.pos,
                    spd: e.spd,
                    approx_radius: e.approx_radius,
                }),
                can_shoot,
                dont_rotate: pilot.hold_heading,
            };
            let decision = shooter::decide(&ctx);
            pilot.shoot = decision.shoot;
            pilot.shoot2 = decision.shoot2;
            pilot.turn = decision.turn;
        }

        rotate(physics, hull, kin, pilot.turn, ts);
    }
}

fn gun_context(mount: Option<&GunMount>) -> Option<GunContext> {
    let mount = mount?;
    let gun = mount.gun()?;
    let projectile = gun.config().projectile();
    Some(GunContext {
        rel_pos: mount.rel_pos(),
        fixed: mount.is_fixed(),
        detected: mount.is_detected(),
        ammo: gun.item().ammo,
        proj_spd: projectile.speed,
        proj_acc: projectile.acc,
        guide_rot_spd: projectile.guide_rot_spd,
        zero_abs_spd: projectile.zero_abs_spd,
    })
}

/// Spin the hull toward the engine's top rotation speed in the requested
/// direction, or brake when no turn is requested.
fn rotate(
    physics: &mut dyn PhysicsWorld,
    hull: &Hull,
    kin: &Kinematics,
    turn: Option<TurnDirection>,
    ts: f32,
) {
    let engine = &hull.config.engine;
    let desired = match turn {
        Some(TurnDirection::Left) => engine.max_rot_spd(),
        Some(TurnDirection::Right) => -engine.max_rot_spd(),
        None => 0.0,
    };
    if kin.rot_spd != desired {
        let rot_spd = approach(kin.rot_spd, desired, engine.rot_acc() * ts);
        physics.set_angular_velocity(hull.body, rot_spd);
    }
}

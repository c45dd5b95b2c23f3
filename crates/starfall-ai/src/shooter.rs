//! AI fire and turn decision.
//!
//! Pure functions over plain data. The simulation fills a
//! [`ShooterContext`] from the ship's mounts and target and copies the
//! [`ShooterDecision`] into the pilot.

use glam::Vec2;

use starfall_core::constants::{MIN_SHOOT_AAD, SHOOT_ANGLE_MARGIN};
use starfall_core::enums::TurnDirection;
use starfall_core::math::{angle_between, angle_diff, angular_width_of_sphere, norm_angle, to_world};

use crate::intercept::solve_intercept;

/// What the shooter needs to know about one mounted gun.
#[derive(Debug, Clone, Copy, Default)]
pub struct GunContext {
    /// Mount position in hull space.
    pub rel_pos: Vec2,
    pub fixed: bool,
    /// A free mount has a firing solution on a target this tick.
    pub detected: bool,
    pub ammo: u32,
    pub proj_spd: f32,
    pub proj_acc: f32,
    pub guide_rot_spd: f32,
    pub zero_abs_spd: bool,
}

impl GunContext {
    /// Nominal projectile speed used to rank fixed guns.
    fn nominal_spd(&self) -> f32 {
        self.proj_spd + self.proj_acc
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TargetContext {
    pub pos: Vec2,
    pub spd: Vec2,
    pub approx_radius: f32,
}

pub struct ShooterContext {
    pub ship_pos: Vec2,
    pub ship_spd: Vec2,
    pub ship_angle: f32,
    pub rot_spd: f32,
    pub rot_acc: f32,
    /// Primary and secondary mount.
    pub guns: [Option<GunContext>; 2],
    pub target: Option<TargetContext>,
    pub can_shoot: bool,
    /// The hull must keep its heading (e.g. while docking or fleeing).
    pub dont_rotate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShooterDecision {
    pub shoot: bool,
    pub shoot2: bool,
    pub turn: Option<TurnDirection>,
}

impl ShooterDecision {
    fn set_trigger(&mut self, secondary: bool) {
        if secondary {
            self.shoot2 = true;
        } else {
            self.shoot = true;
        }
    }
}

/// Decide triggers and turning for one AI ship.
pub fn decide(ctx: &ShooterContext) -> ShooterDecision {
    let mut decision = ShooterDecision::default();
    let Some(target) = ctx.target else {
        return decision;
    };
    if !ctx.can_shoot {
        return decision;
    }

    // Self-aiming guns fire on their own; fixed guns need the hull.
    let mut candidates: [Option<(bool, GunContext)>; 2] = [None, None];
    for (idx, gun) in ctx.guns.iter().enumerate() {
        let secondary = idx == 1;
        let Some(gun) = gun else { continue };
        if gun.ammo == 0 {
            continue;
        }
        if gun.zero_abs_spd || gun.guide_rot_spd > 0.0 {
            decision.set_trigger(secondary);
        } else if gun.fixed {
            candidates[idx] = Some((secondary, *gun));
        } else if gun.detected {
            decision.set_trigger(secondary);
        }
    }

    let chosen = match candidates {
        [Some(a), Some(b)] => {
            if a.1.nominal_spd() < b.1.nominal_spd() {
                b
            } else {
                a
            }
        }
        [Some(a), None] => a,
        [None, Some(b)] => b,
        [None, None] => return decision,
    };
    let gun = chosen.1;
    let proj_spd = gun.nominal_spd();

    let gun_pos = to_world(gun.rel_pos, ctx.ship_angle, ctx.ship_pos);
    let Some(solution) = solve_intercept(
        gun_pos,
        ctx.ship_spd,
        target.pos,
        target.spd,
        proj_spd,
        false,
    ) else {
        return decision;
    };

    // The gun is off the hull's center line: shift the aim by the angle
    // between gun and hull center as seen from the target.
    let to_ship = angle_between(target.pos, ctx.ship_pos);
    let to_gun = angle_between(target.pos, gun_pos);
    let aim = solution.angle + (to_gun - to_ship);

    let dst = target.pos.distance(ctx.ship_pos);
    let mut max_angle_diff = angular_width_of_sphere(target.approx_radius, dst) + SHOOT_ANGLE_MARGIN;
    if proj_spd > 0.0 && gun.guide_rot_spd > 0.0 {
        max_angle_diff += gun.guide_rot_spd * dst / proj_spd;
    }
    if angle_diff(aim, ctx.ship_angle) < max_angle_diff {
        decision.shoot = true;
        decision.shoot2 = true;
        return decision;
    }

    if !ctx.dont_rotate {
        decision.turn = needs_to_turn(ctx.ship_angle, aim, ctx.rot_spd, ctx.rot_acc, MIN_SHOOT_AAD);
    }
    decision
}

/// Which way to turn from `angle` toward `dest_angle`, or `None` inside the
/// dead zone `allowed_diff`.
///
/// Accounts for the rotation already under way: if braking from `rot_spd`
/// at `rot_acc` would carry the hull past the destination, the direction
/// flips so the hull starts braking now.
pub fn needs_to_turn(
    angle: f32,
    dest_angle: f32,
    rot_spd: f32,
    rot_acc: f32,
    allowed_diff: f32,
) -> Option<TurnDirection> {
    if angle_diff(dest_angle, angle) < allowed_diff || rot_acc == 0.0 {
        return None;
    }
    let brake_way = rot_spd * rot_spd / rot_acc / 2.0;
    let angle_after_brake = angle + brake_way * rot_spd.signum();
    let rel = norm_angle(angle - dest_angle);
    let rel_after_brake = norm_angle(angle_after_brake - dest_angle);
    let turn_right = if (rel > 0.0) == (rel_after_brake > 0.0) {
        rel > 0.0
    } else {
        rel < 0.0
    };
    Some(if turn_right {
        TurnDirection::Right
    } else {
        TurnDirection::Left
    })
}

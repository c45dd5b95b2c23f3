//! Ballistic intercept solver.
//!
//! Computes the direction to fire a projectile of constant speed so that it
//! meets a target moving in a straight line. The target velocity is damped
//! by `TARGET_SPD_LEAD` unless the shooter aims "sharp" (the player), which
//! makes AI leads deliberately imperfect.

use glam::Vec2;

use starfall_core::constants::TARGET_SPD_LEAD;
use starfall_core::math::{angle, gen_quad, rotate};

/// Fire direction and the time after which the projectile meets the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptSolution {
    /// World angle in degrees.
    pub angle: f32,
    /// Seconds until impact.
    pub time: f32,
}

/// Solve for the lead angle.
///
/// Works in a frame rotated so the target's velocity relative to the gun
/// lies on +X. With the target at `(x, y)` in that frame moving at `v`, the
/// flight time `t` satisfies `(v² − s²)t² + 2xv·t + (x² + y²) = 0`.
/// Returns `None` when no non-negative root exists, e.g. the target
/// outruns the projectile.
pub fn solve_intercept(
    gun_pos: Vec2,
    gun_spd: Vec2,
    target_pos: Vec2,
    target_spd: Vec2,
    proj_spd: f32,
    sharp: bool,
) -> Option<InterceptSolution> {
    let lead = if sharp { target_spd } else { target_spd * TARGET_SPD_LEAD };
    let rel_spd = lead - gun_spd;
    let rot_angle = angle(rel_spd);
    let v = rel_spd.length();

    let mut to_target = rotate(target_pos - gun_pos, -rot_angle);
    let (x, y) = (to_target.x, to_target.y);
    let a = v * v - proj_spd * proj_spd;
    let b = 2.0 * x * v;
    let c = x * x + y * y;
    let t = gen_quad(a, b, c)?;

    to_target.x += t * v;
    Some(InterceptSolution {
        angle: angle(to_target) + rot_angle,
        time: t,
    })
}

/// Sentinel form of [`solve_intercept`]: the fire angle, or `NaN` when the
/// target cannot be reached.
pub fn shoot_angle(
    gun_pos: Vec2,
    gun_spd: Vec2,
    target_pos: Vec2,
    target_spd: Vec2,
    proj_spd: f32,
    sharp: bool,
) -> f32 {
    solve_intercept(gun_pos, gun_spd, target_pos, target_spd, proj_spd, sharp)
        .map_or(f32::NAN, |s| s.angle)
}

//! 2D vector and angle helpers shared by every simulation layer.
//!
//! Angles are in degrees, counter-clockwise from +X, matching the
//! configuration files (guidance speeds, spread, mount tolerances are all
//! authored in degrees). Vectors are plain `glam::Vec2` values.

use glam::Vec2;

use crate::constants::MAX_MOVE_SPD;

pub const DEG_RAD: f32 = std::f32::consts::PI / 180.0;
pub const RAD_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Angle of a vector in degrees. The zero vector has angle 0.
pub fn angle(v: Vec2) -> f32 {
    v.y.atan2(v.x) * RAD_DEG
}

/// Angle of the vector pointing from `from` to `to`.
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    angle(to - from)
}

/// Vector of length `len` pointing at `angle` degrees.
pub fn from_al(angle: f32, len: f32) -> Vec2 {
    let (sin, cos) = (angle * DEG_RAD).sin_cos();
    Vec2::new(cos * len, sin * len)
}

/// Rotate `v` by `angle` degrees.
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = (angle * DEG_RAD).sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Transform a hull-relative point into world space.
pub fn to_world(rel: Vec2, base_angle: f32, base_pos: Vec2) -> Vec2 {
    rotate(rel, base_angle) + base_pos
}

/// Transform a world point into the frame of a body at `base_pos`/`base_angle`.
pub fn to_rel(world: Vec2, base_angle: f32, base_pos: Vec2) -> Vec2 {
    rotate(world - base_pos, -base_angle)
}

/// Normalize an angle into `(-180, 180]`.
pub fn norm_angle(a: f32) -> f32 {
    let mut a = a % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Absolute smallest difference between two angles, in `[0, 180]`.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    norm_angle(a - b).abs()
}

/// Move `src` toward `dst` by at most `step`, never overshooting.
pub fn approach(src: f32, dst: f32, step: f32) -> f32 {
    if dst - step <= src && src <= dst + step {
        return dst;
    }
    if src < dst {
        src + step
    } else {
        src - step
    }
}

pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.max(min).min(max)
}

/// Root of `b·t + c = 0`, or `None` when negative or undefined.
pub fn gen_lin(b: f32, c: f32) -> Option<f32> {
    if b == 0.0 {
        return None;
    }
    let t = -c / b;
    (t >= 0.0).then_some(t)
}

/// Smallest non-negative real root of `a·t² + b·t + c = 0`.
///
/// Falls back to the linear solution when `a == 0`. Returns `None` when the
/// discriminant is negative or both roots are negative.
pub fn gen_quad(a: f32, b: f32, c: f32) -> Option<f32> {
    if a == 0.0 {
        return gen_lin(b, c);
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);
    match (t1 >= 0.0, t2 >= 0.0) {
        (true, true) => Some(t1.min(t2)),
        (true, false) => Some(t1),
        (false, true) => Some(t2),
        (false, false) => None,
    }
}

/// Half-angle (degrees) a sphere of `radius` subtends from `dist` away.
pub fn angular_width_of_sphere(radius: f32, dist: f32) -> f32 {
    if dist <= radius {
        return 180.0;
    }
    (radius / dist).asin() * RAD_DEG
}

/// Whether thrusting along `acc_angle` keeps the body under the speed cap.
///
/// Thrust is allowed below `MAX_MOVE_SPD`, or when it points more than 90°
/// away from the current velocity (i.e. it slows the body down).
pub fn can_accelerate(acc_angle: f32, spd: Vec2) -> bool {
    spd.length() < MAX_MOVE_SPD || angle_diff(angle(spd), acc_angle) > 90.0
}

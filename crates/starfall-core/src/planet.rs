//! Planets, star systems and their gravity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::math::{angle, from_al, DEG_RAD};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub pos: Vec2,
    /// Radius of the terrain's outer edge.
    pub ground_height: f32,
    /// Radius of the lowest terrain. Ships below it are stuck in rock.
    pub min_ground_height: f32,
    pub grav_const: f32,
    /// Surface rotation, degrees per second counter-clockwise.
    #[serde(default)]
    pub rot_spd: f32,
}

impl Planet {
    /// Radius of the gravity well: ground plus atmosphere.
    pub fn full_height(&self) -> f32 {
        self.ground_height + ATM_HEIGHT
    }

    pub fn is_near_ground(&self, pos: Vec2) -> bool {
        self.pos.distance(pos) < self.ground_height + ATM_HEIGHT * NEAR_GROUND_ATM_FRACTION
    }

    /// Velocity of the co-rotating surface frame at `pos`.
    pub fn spd_at_pos(&self, pos: Vec2) -> Vec2 {
        let to_pos = pos - self.pos;
        let len = to_pos.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        from_al(angle(to_pos) + 90.0, len * self.rot_spd * DEG_RAD)
    }
}

/// A star and its planets. The star sits at `pos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub pos: Vec2,
    #[serde(default)]
    pub planets: Vec<Planet>,
}

pub fn nearest_planet<'a>(systems: &'a [StarSystem], pos: Vec2) -> Option<&'a Planet> {
    systems
        .iter()
        .flat_map(|s| s.planets.iter())
        .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
}

pub fn nearest_system(systems: &[StarSystem], pos: Vec2) -> Option<&StarSystem> {
    systems
        .iter()
        .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
}

/// The body currently dominating an object's gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravitySource {
    Planet {
        pos: Vec2,
        /// Below this distance the pull stops growing.
        min_dist: f32,
        grav_const: f32,
    },
    Star { pos: Vec2 },
}

impl GravitySource {
    pub fn pos(&self) -> Vec2 {
        match *self {
            GravitySource::Planet { pos, .. } | GravitySource::Star { pos } => pos,
        }
    }

    fn min_dist(&self) -> f32 {
        match *self {
            GravitySource::Planet { min_dist, .. } => min_dist,
            GravitySource::Star { .. } => SUN_HOT_RAD,
        }
    }

    fn grav_const(&self) -> f32 {
        match *self {
            GravitySource::Planet { grav_const, .. } => grav_const,
            GravitySource::Star { .. } => SUN_GRAV_CONST,
        }
    }
}

/// Planet inside its full height wins; otherwise the star inside its
/// radius; otherwise nothing pulls.
pub fn select_source(
    pos: Vec2,
    planet: Option<&Planet>,
    system: Option<&StarSystem>,
) -> Option<GravitySource> {
    if let Some(p) = planet {
        if p.pos.distance(pos) < p.full_height() {
            return Some(GravitySource::Planet {
                pos: p.pos,
                min_dist: p.ground_height,
                grav_const: p.grav_const,
            });
        }
    }
    if let Some(s) = system {
        if s.pos.distance(pos) < SUN_RADIUS {
            return Some(GravitySource::Star { pos: s.pos });
        }
    }
    None
}

/// Acceleration toward `source`. Zero when exactly at its center.
pub fn gravity_acceleration(pos: Vec2, source: &GravitySource) -> Vec2 {
    let to_src = source.pos() - pos;
    let len = to_src.length();
    if len == 0.0 {
        return Vec2::ZERO;
    }
    let dist = len.max(source.min_dist());
    to_src / len * (source.grav_const() / (dist * dist))
}

/// Where a ship sunk into `planet` is lifted to: the same bearing at full
/// height, or straight "up" from the exact center.
pub fn recovery_pos(planet: &Planet, pos: Vec2) -> Vec2 {
    let to_ship = pos - planet.pos;
    let len = to_ship.length();
    let fh = planet.full_height();
    if len == 0.0 {
        planet.pos + Vec2::new(0.0, fh)
    } else {
        planet.pos + to_ship * (fh / len)
    }
}

/// Whether a ship at `pos` is below the planet's lowest terrain.
pub fn needs_recovery(planet: &Planet, pos: Vec2) -> bool {
    planet.pos.distance(pos) <= planet.min_ground_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn planet() -> Planet {
        Planet {
            pos: Vec2::new(100.0, 0.0),
            ground_height: 10.0,
            min_ground_height: 7.0,
            grav_const: 50.0,
            rot_spd: 2.0,
        }
    }

    #[test]
    fn test_planet_gravity_starts_at_full_height() {
        let p = planet();
        let fh = p.full_height();
        let outside = p.pos + Vec2::new(fh + 0.01, 0.0);
        let inside = p.pos + Vec2::new(fh - 0.01, 0.0);
        assert!(select_source(outside, Some(&p), None).is_none());
        let src = select_source(inside, Some(&p), None).unwrap();
        let acc = gravity_acceleration(inside, &src);
        assert!(acc.x < 0.0);
        assert_relative_eq!(acc.y, 0.0);
        assert_relative_eq!(acc.length(), 50.0 / ((fh - 0.01) * (fh - 0.01)), epsilon = 1e-6);
    }

    #[test]
    fn test_pull_saturates_inside_min_dist() {
        let p = planet();
        let src = select_source(p.pos + Vec2::new(3.0, 0.0), Some(&p), None).unwrap();
        let acc = gravity_acceleration(p.pos + Vec2::new(3.0, 0.0), &src);
        assert_relative_eq!(acc.length(), 50.0 / 100.0, epsilon = 1e-6);
        assert_eq!(gravity_acceleration(p.pos, &src), Vec2::ZERO);
    }

    #[test]
    fn test_star_pull_when_outside_planet() {
        let p = planet();
        let sys = StarSystem {
            pos: Vec2::ZERO,
            planets: vec![p],
        };
        let pos = Vec2::new(0.0, SUN_RADIUS - 1.0);
        let src = select_source(pos, Some(&p), Some(&sys)).unwrap();
        assert_eq!(src, GravitySource::Star { pos: Vec2::ZERO });
        let acc = gravity_acceleration(pos, &src);
        assert!(acc.y < 0.0);
        assert!(select_source(Vec2::new(0.0, SUN_RADIUS + 1.0), Some(&p), Some(&sys)).is_none());
    }

    #[test]
    fn test_recovery_pos_is_at_full_height() {
        let p = planet();
        let r = recovery_pos(&p, p.pos + Vec2::new(-1.0, 1.0));
        assert_relative_eq!(r.distance(p.pos), p.full_height(), epsilon = 1e-4);
        assert_eq!(recovery_pos(&p, p.pos), p.pos + Vec2::new(0.0, p.full_height()));
    }

    #[test]
    fn test_surface_speed_is_tangential() {
        let p = planet();
        let pos = p.pos + Vec2::new(10.0, 0.0);
        let v = p.spd_at_pos(pos);
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, 10.0 * 2.0 * DEG_RAD, epsilon = 1e-5);
    }

    #[test]
    fn test_nearest_planet_and_system() {
        let far = Planet {
            pos: Vec2::new(-300.0, 0.0),
            ..planet()
        };
        let systems = vec![
            StarSystem {
                pos: Vec2::ZERO,
                planets: vec![planet()],
            },
            StarSystem {
                pos: Vec2::new(-400.0, 0.0),
                planets: vec![far],
            },
        ];
        assert_eq!(nearest_planet(&systems, Vec2::new(-250.0, 0.0)).unwrap().pos, far.pos);
        assert_eq!(nearest_system(&systems, Vec2::new(-250.0, 0.0)).unwrap().pos, Vec2::new(-400.0, 0.0));
        assert!(nearest_planet(&[], Vec2::ZERO).is_none());
    }
}

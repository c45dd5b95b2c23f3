//! Gravity system: pulls ships and projectiles toward the dominant body,
//! lifts ships sunk into a planet, and burns ships too close to the star.

use glam::Vec2;
use hecs::World;

use starfall_core::components::{Durability, Kinematics, ReceivesGravity};
use starfall_core::constants::{SUN_DMG, SUN_HOT_RAD};
use starfall_core::enums::{DamageType, HullType};
use starfall_core::events::CombatEvent;
use starfall_core::planet::{
    gravity_acceleration, needs_recovery, recovery_pos, select_source, GravitySource, Planet,
    StarSystem,
};

use crate::components::Hull;
use crate::physics::PhysicsWorld;
use crate::projectile::{Projectile, ProjectileMotion};

/// Apply one tick of gravity. `planet` and `system` are the ones nearest
/// the simulation focus.
pub fn run(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    planet: Option<&Planet>,
    system: Option<&StarSystem>,
    ts: f32,
    events: &mut Vec<CombatEvent>,
) {
    for (entity, (hull, kin, durability, _)) in
        world.query_mut::<(&Hull, &mut Kinematics, &mut Durability, &ReceivesGravity)>()
    {
        let ship = entity.to_bits().get();

        if let Some(p) = planet {
            if hull.config.hull_type != HullType::Station && needs_recovery(p, kin.pos) {
                let pos = recovery_pos(p, kin.pos);
                log::warn!("ship {ship} sunk into a planet, lifting to {pos}");
                physics.set_transform(hull.body, pos, 0.0);
                physics.set_linear_velocity(hull.body, Vec2::ZERO);
                kin.pos = pos;
                kin.angle = 0.0;
                kin.spd = Vec2::ZERO;
                events.push(CombatEvent::ShipRecovered { ship, pos });
                continue;
            }
        }

        let Some(source) = select_source(kin.pos, planet, system) else {
            continue;
        };
        let acc = gravity_acceleration(kin.pos, &source);
        let mass = physics.state(hull.body).map_or(0.0, |s| s.mass);
        physics.apply_force(hull.body, acc * mass);

        // A planet's atmosphere shields ships from the star
        if let GravitySource::Star { pos } = source {
            if pos.distance(kin.pos) < SUN_HOT_RAD {
                let lost = durability.receive_damage(SUN_DMG * ts, DamageType::Fire);
                events.push(CombatEvent::SunBurn { ship, damage: lost });
            }
        }
    }

    for (_entity, (projectile, _)) in world.query_mut::<(&mut Projectile, &ReceivesGravity)>() {
        let pos = projectile.body.pos();
        if let Some(source) = select_source(pos, planet, system) {
            let acc = gravity_acceleration(pos, &source);
            projectile.body.receive_force(physics, acc, ts, true);
        }
    }
}

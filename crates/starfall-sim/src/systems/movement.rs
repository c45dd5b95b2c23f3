//! Movement system: steps the physics world and mirrors the result back
//! into ship kinematics and ball projectiles.

use hecs::World;

use starfall_core::components::Kinematics;

use crate::components::Hull;
use crate::physics::{Contact, PhysicsWorld};
use crate::projectile::{Projectile, ProjectileMotion};

pub fn run(world: &mut World, physics: &mut dyn PhysicsWorld, ts: f32, contacts: &mut Vec<Contact>) {
    contacts.clear();
    physics.step(ts, contacts);

    for (_entity, (hull, kin)) in world.query_mut::<(&Hull, &mut Kinematics)>() {
        if let Some(state) = physics.state(hull.body) {
            kin.pos = state.pos;
            kin.spd = state.spd;
            kin.angle = state.angle;
            kin.rot_spd = state.rot_spd;
        }
    }

    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        projectile.body.sync(physics);
    }
}

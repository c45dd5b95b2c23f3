//! Sweep system: the only place entities leave or join the world.
//!
//! Destroyed ships and retired projectiles queued during the tick are
//! despawned together with their physics bodies, then queued projectile
//! spawns become live.

use std::sync::Arc;

use hecs::{Entity, World};

use starfall_core::components::{Durability, Kinematics, ReceivesGravity};
use starfall_core::events::CombatEvent;

use crate::components::{Hull, Scenery};
use crate::gun::SpawnRequest;
use crate::physics::PhysicsWorld;
use crate::projectile::{Projectile, ProjectileBody, ProjectileMotion};

pub fn run(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    despawn_buffer: &mut Vec<Entity>,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<CombatEvent>,
) {
    for (entity, (_hull, kin, durability)) in
        world.query_mut::<(&Hull, &Kinematics, &Durability)>()
    {
        if durability.is_dead() {
            log::debug!("ship {} destroyed", entity.to_bits());
            events.push(CombatEvent::ShipDestroyed {
                ship: entity.to_bits().get(),
                pos: kin.pos,
            });
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Ok(mut projectile) = world.remove_one::<Projectile>(entity) {
            projectile.body.on_remove(physics);
        }
        if let Ok(hull) = world.remove_one::<Hull>(entity) {
            physics.destroy_body(hull.body);
        }
        if let Ok(scenery) = world.remove_one::<Scenery>(entity) {
            physics.destroy_body(scenery.body);
        }
        let _ = world.despawn(entity);
    }

    for request in spawns.drain(..) {
        spawn_projectile(world, physics, request);
    }
}

/// Make a queued projectile live.
pub fn spawn_projectile(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    request: SpawnRequest,
) -> Entity {
    let entity = world.spawn(());
    let body = ProjectileBody::launch(
        physics,
        &request.config,
        request.pos,
        request.angle,
        request.base_spd,
        entity,
    );
    let massless = request.config.massless;
    let projectile = Projectile {
        config: Arc::clone(&request.config),
        faction: request.faction,
        shooter: request.shooter,
        body,
        age: 0.0,
        obstacle: None,
    };
    let inserted = if massless {
        world.insert(entity, (projectile,))
    } else {
        world.insert(entity, (projectile, ReceivesGravity))
    };
    if let Err(err) = inserted {
        log::warn!("projectile {} lost on spawn: {err}", request.config.code);
    }
    entity
}

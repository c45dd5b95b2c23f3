//! Projectile system: aging, homing guidance, motion, and hit resolution.
//!
//! Point projectiles report hits from their own ray casts during `run`.
//! Ball projectiles report them as physics contacts, resolved after the
//! step by `resolve_contacts`.

use std::collections::HashMap;

use glam::Vec2;
use hecs::{Entity, World};

use starfall_core::components::{Durability, Pilot};
use starfall_core::constants::{ACTIVE_AREA_RADIUS, PROJECTILE_VIEW_DIST};
use starfall_core::enums::{DamageType, ProjectileEnd};
use starfall_core::events::CombatEvent;
use starfall_core::math::{clamp, norm_angle};

use crate::components::Hull;
use crate::physics::{Contact, PhysicsWorld, RayHit};
use crate::projectile::{should_collide, ObjectKind, Obstacle, Projectile, ProjectileMotion};
use crate::targeting::{nearest_enemy, Target};

/// A projectile striking something, applied once iteration is over.
struct Hit {
    projectile: Entity,
    code: String,
    obstacle: Obstacle,
    damage: f32,
    dmg_type: DamageType,
    em_time: f32,
}

/// How each live ship and projectile takes part in collision filtering.
pub fn collision_kinds(world: &World) -> HashMap<Entity, ObjectKind> {
    let mut kinds = HashMap::new();
    for (entity, (_, pilot)) in world.query::<(&Hull, &Pilot)>().iter() {
        kinds.insert(entity, ObjectKind::Ship { faction: pilot.faction });
    }
    for (entity, _) in world.query::<&Projectile>().iter() {
        kinds.insert(entity, ObjectKind::Projectile);
    }
    kinds
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    targets: &[Target],
    focus: Vec2,
    ts: f32,
    events: &mut Vec<CombatEvent>,
    despawn: &mut Vec<Entity>,
) {
    let kinds = collision_kinds(world);
    let mut hits = Vec::new();

    for (entity, projectile) in world.query_mut::<&mut Projectile>() {
        projectile.age += ts;
        if projectile.age > projectile.config.lifetime {
            remove(entity, projectile, ProjectileEnd::Expired, events, despawn);
            continue;
        }

        if projectile.config.is_guided() {
            let pos = projectile.body.pos();
            if let Some(enemy) = nearest_enemy(targets, pos, projectile.faction, PROJECTILE_VIEW_DIST) {
                let desired = projectile.body.desired_angle(enemy.pos, enemy.spd);
                let max_rot = projectile.config.guide_rot_spd * ts;
                let diff = clamp(norm_angle(desired - projectile.body.angle()), -max_rot, max_rot);
                projectile.body.change_angle(physics, diff);
            }
        }

        let (faction, shooter) = (projectile.faction, projectile.shooter);
        let collide = |hit: &RayHit| should_collide(faction, shooter, hit.owner, &kinds);
        if let Some(obstacle) = projectile.body.update(physics, ts, &collide) {
            projectile.obstacle = Some(obstacle);
            hits.push(hit_of(entity, projectile, obstacle));
            continue;
        }

        if projectile.body.pos().distance(focus) > ACTIVE_AREA_RADIUS {
            remove(entity, projectile, ProjectileEnd::LeftArea, events, despawn);
        }
    }

    apply_hits(world, hits, events, despawn);
}

/// Turn ball contacts from the last physics step into hits.
pub fn resolve_contacts(
    world: &mut World,
    contacts: &[Contact],
    events: &mut Vec<CombatEvent>,
    despawn: &mut Vec<Entity>,
) {
    if contacts.is_empty() {
        return;
    }
    let kinds = collision_kinds(world);
    let mut hits = Vec::new();

    for contact in contacts {
        for (mine, other) in [
            (contact.owner_a, contact.owner_b),
            (contact.owner_b, contact.owner_a),
        ] {
            let Some(entity) = mine else { continue };
            let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
                continue;
            };
            if projectile.obstacle.is_some() || despawn.contains(&entity) {
                continue;
            }
            if !should_collide(projectile.faction, projectile.shooter, other, &kinds) {
                continue;
            }
            let obstacle = Obstacle {
                owner: other,
                point: contact.point,
            };
            projectile.obstacle = Some(obstacle);
            hits.push(hit_of(entity, &projectile, obstacle));
        }
    }

    apply_hits(world, hits, events, despawn);
}

fn hit_of(entity: Entity, projectile: &Projectile, obstacle: Obstacle) -> Hit {
    Hit {
        projectile: entity,
        code: projectile.config.code.clone(),
        obstacle,
        damage: projectile.config.damage,
        dmg_type: projectile.config.dmg_type,
        em_time: projectile.config.em_time,
    }
}

fn remove(
    entity: Entity,
    projectile: &Projectile,
    reason: ProjectileEnd,
    events: &mut Vec<CombatEvent>,
    despawn: &mut Vec<Entity>,
) {
    events.push(CombatEvent::ProjectileGone {
        projectile: projectile.config.code.clone(),
        reason,
    });
    despawn.push(entity);
}

/// Damage and EM-disable the struck ships, then retire the projectiles.
fn apply_hits(
    world: &mut World,
    hits: Vec<Hit>,
    events: &mut Vec<CombatEvent>,
    despawn: &mut Vec<Entity>,
) {
    for hit in hits {
        let mut dealt = 0.0;
        if let Some(target) = hit.obstacle.owner {
            if let Ok((durability, pilot)) =
                world.query_one_mut::<(&mut Durability, Option<&mut Pilot>)>(target)
            {
                dealt = durability.receive_damage(hit.damage, hit.dmg_type);
                if let Some(pilot) = pilot {
                    if hit.em_time > 0.0 {
                        pilot.disabled_secs = pilot.disabled_secs.max(hit.em_time);
                    }
                }
            }
        }
        log::trace!("{} hit {:?} for {dealt}", hit.code, hit.obstacle.owner);
        events.push(CombatEvent::ProjectileHit {
            projectile: hit.code.clone(),
            target: hit.obstacle.owner.map(|e| e.to_bits().get()),
            pos: hit.obstacle.point,
            damage: dealt,
        });
        events.push(CombatEvent::ProjectileGone {
            projectile: hit.code,
            reason: ProjectileEnd::Impact,
        });
        despawn.push(hit.projectile);
    }
}

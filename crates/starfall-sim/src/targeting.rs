//! Faction targeting queries: nearest hostile ship and line of sight.

use std::collections::HashMap;

use glam::Vec2;
use hecs::{Entity, World};

use starfall_core::components::{Durability, Kinematics, Pilot};
use starfall_core::types::{are_enemies, Faction};

use crate::components::Hull;
use crate::physics::{PhysicsWorld, RayControl};
use crate::projectile::ObjectKind;

/// A ship as seen by targeting, captured once per tick.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub entity: Entity,
    pub pos: Vec2,
    pub spd: Vec2,
    pub approx_radius: f32,
    pub faction: Option<Faction>,
}

/// Every live ship that can be targeted, in entity order.
pub fn collect_targets(world: &World) -> Vec<Target> {
    let mut targets: Vec<Target> = world
        .query::<(&Hull, &Kinematics, &Pilot, &Durability)>()
        .iter()
        .filter(|(_, (_, _, _, durability))| !durability.is_dead())
        .map(|(entity, (hull, kin, pilot, _))| Target {
            entity,
            pos: kin.pos,
            spd: kin.spd,
            approx_radius: hull.config.approx_radius,
            faction: pilot.faction,
        })
        .collect();
    targets.sort_by_key(|t| t.entity.to_bits());
    targets
}

/// Nearest enemy of `faction` measured surface-first (center distance minus
/// the target's radius), no farther than `max_dist`. Ties go to the later
/// target.
pub fn nearest_enemy<'a>(
    targets: &'a [Target],
    origin: Vec2,
    faction: Option<Faction>,
    max_dist: f32,
) -> Option<&'a Target> {
    let mut best = None;
    let mut best_dst = max_dist;
    for target in targets {
        if !are_enemies(faction, target.faction) {
            continue;
        }
        let dst = target.pos.distance(origin) - target.approx_radius;
        if dst <= best_dst {
            best_dst = dst;
            best = Some(target);
        }
    }
    best
}

/// Whether a solid body other than the two endpoints' own bodies crosses
/// the segment between them. Massless bodies and projectiles in flight never
/// block.
pub fn has_obstacle(
    physics: &dyn PhysicsWorld,
    kinds: &HashMap<Entity, ObjectKind>,
    from: Vec2,
    to: Vec2,
    from_owner: Option<Entity>,
    to_owner: Option<Entity>,
) -> bool {
    let mut blocked = false;
    physics.ray_cast(from, to, &mut |hit| {
        let is_endpoint = hit.owner.is_some() && (hit.owner == from_owner || hit.owner == to_owner);
        let is_projectile = hit
            .owner
            .is_some_and(|o| matches!(kinds.get(&o), Some(ObjectKind::Projectile)));
        if is_endpoint || is_projectile || hit.massless {
            RayControl::Continue
        } else {
            blocked = true;
            RayControl::Stop
        }
    });
    blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDesc, RapierWorld};

    fn target(world: &mut World, pos: Vec2, radius: f32, faction: Option<Faction>) -> Target {
        Target {
            entity: world.spawn(()),
            pos,
            spd: Vec2::ZERO,
            approx_radius: radius,
            faction,
        }
    }

    #[test]
    fn test_nearest_enemy_ignores_friends_and_neutrals() {
        let mut world = World::new();
        let targets = vec![
            target(&mut world, Vec2::new(1.0, 0.0), 0.5, Some(Faction::LAANI)),
            target(&mut world, Vec2::new(2.0, 0.0), 0.5, None),
            target(&mut world, Vec2::new(6.0, 0.0), 0.5, Some(Faction::EHAR)),
        ];
        let found = nearest_enemy(&targets, Vec2::ZERO, Some(Faction::LAANI), 10.0).unwrap();
        assert_eq!(found.entity, targets[2].entity);
        assert!(nearest_enemy(&targets, Vec2::ZERO, Some(Faction::LAANI), 5.0).is_none());
        assert!(nearest_enemy(&targets, Vec2::ZERO, None, 100.0).is_none());
    }

    #[test]
    fn test_nearest_enemy_measures_to_surface() {
        let mut world = World::new();
        let targets = vec![
            target(&mut world, Vec2::new(5.0, 0.0), 0.2, Some(Faction::EHAR)),
            // Farther center but a much bigger hull
            target(&mut world, Vec2::new(6.0, 0.0), 3.0, Some(Faction::EHAR)),
        ];
        let found = nearest_enemy(&targets, Vec2::ZERO, Some(Faction::LAANI), 10.0).unwrap();
        assert_eq!(found.entity, targets[1].entity);
    }

    #[test]
    fn test_has_obstacle_skips_endpoints() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let mut physics = RapierWorld::new();
        physics.create_body(BodyDesc {
            owner: Some(a),
            ..Default::default()
        });
        physics.create_body(BodyDesc {
            pos: Vec2::new(10.0, 0.0),
            owner: Some(b),
            ..Default::default()
        });
        let kinds = HashMap::new();
        let to = Vec2::new(10.0, 0.0);
        assert!(!has_obstacle(&physics, &kinds, Vec2::ZERO, to, Some(a), Some(b)));

        physics.create_body(BodyDesc {
            pos: Vec2::new(5.0, 0.2),
            ..Default::default()
        });
        assert!(has_obstacle(&physics, &kinds, Vec2::ZERO, to, Some(a), Some(b)));
    }

    #[test]
    fn test_has_obstacle_ignores_projectiles_and_massless_bodies() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let ball = world.spawn(());
        let mut kinds = HashMap::new();
        kinds.insert(ball, ObjectKind::Projectile);

        let mut physics = RapierWorld::new();
        physics.create_body(BodyDesc {
            pos: Vec2::new(3.0, 0.0),
            radius: 0.1,
            owner: Some(ball),
            projectile: true,
            ..Default::default()
        });
        physics.create_body(BodyDesc {
            pos: Vec2::new(6.0, 0.0),
            massless: true,
            ..Default::default()
        });
        let to = Vec2::new(10.0, 0.0);
        assert!(!has_obstacle(&physics, &kinds, Vec2::ZERO, to, Some(a), Some(b)));

        // Once the ball is no longer a projectile it is solid again
        kinds.clear();
        assert!(has_obstacle(&physics, &kinds, Vec2::ZERO, to, Some(a), Some(b)));
    }

    #[test]
    fn test_nearest_enemy_includes_max_dist_and_prefers_later_tie() {
        let mut world = World::new();
        let targets = vec![
            target(&mut world, Vec2::new(5.5, 0.0), 0.5, Some(Faction::EHAR)),
            target(&mut world, Vec2::new(0.0, 5.5), 0.5, Some(Faction::EHAR)),
        ];
        let found = nearest_enemy(&targets, Vec2::ZERO, Some(Faction::LAANI), 5.0).unwrap();
        assert_eq!(found.entity, targets[1].entity);

        let single = &targets[..1];
        let found = nearest_enemy(single, Vec2::ZERO, Some(Faction::LAANI), 5.0).unwrap();
        assert_eq!(found.entity, targets[0].entity);
    }
}

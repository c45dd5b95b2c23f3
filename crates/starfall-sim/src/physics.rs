//! Physics world seam.
//!
//! The simulation talks to rigid-body physics only through
//! [`PhysicsWorld`]. [`RapierWorld`] implements it on rapier2d: circle
//! colliders, no global gravity (the gravity system applies forces itself),
//! continuous collision detection on projectile bodies, and collision
//! events surfaced as [`Contact`]s.

use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use hecs::Entity;
use rapier2d::prelude::*;

/// Handle of a body in the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Parameters for a new body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub pos: Vec2,
    /// Degrees.
    pub angle: f32,
    pub spd: Vec2,
    /// Degrees per second.
    pub rot_spd: f32,
    pub radius: f32,
    pub density: f32,
    /// Ray casts report massless bodies but projectiles fly through them.
    pub massless: bool,
    /// Entity the body belongs to. `None` for scenery.
    pub owner: Option<Entity>,
    /// Fixed bodies never move.
    pub fixed: bool,
    /// Fast projectile: swept against obstacles every step and never in
    /// contact with other projectiles.
    pub projectile: bool,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            angle: 0.0,
            spd: Vec2::ZERO,
            rot_spd: 0.0,
            radius: 0.5,
            density: 1.0,
            massless: false,
            owner: None,
            fixed: false,
            projectile: false,
        }
    }
}

/// Snapshot of a body's pose and motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub pos: Vec2,
    pub angle: f32,
    pub spd: Vec2,
    pub rot_spd: f32,
    pub mass: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body: BodyHandle,
    pub owner: Option<Entity>,
    pub point: Vec2,
    /// Position along the ray, 0 at the start and 1 at the end.
    pub fraction: f32,
    pub massless: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayControl {
    Continue,
    Stop,
}

/// Two bodies that started touching during a step.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
    pub owner_a: Option<Entity>,
    pub owner_b: Option<Entity>,
    pub point: Vec2,
}

pub trait PhysicsWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle;
    fn destroy_body(&mut self, body: BodyHandle);
    fn state(&self, body: BodyHandle) -> Option<BodyState>;
    fn set_transform(&mut self, body: BodyHandle, pos: Vec2, angle: f32);
    fn set_linear_velocity(&mut self, body: BodyHandle, spd: Vec2);
    fn set_angular_velocity(&mut self, body: BodyHandle, rot_spd: f32);
    /// Accumulate a force for the next step.
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);
    /// Report bodies crossed by the segment, nearest first, until the
    /// callback returns [`RayControl::Stop`].
    fn ray_cast(&self, from: Vec2, to: Vec2, callback: &mut dyn FnMut(&RayHit) -> RayControl);
    /// Integrate by `ts` and append the pairs that started touching to
    /// `contacts`.
    fn step(&mut self, ts: f32, contacts: &mut Vec<Contact>);
}

const SOLID_GROUP: Group = Group::GROUP_1;
const PROJECTILE_GROUP: Group = Group::GROUP_2;

#[derive(Debug, Clone, Copy)]
struct BodyMeta {
    owner: Option<Entity>,
    massless: bool,
    radius: f32,
}

/// Collects the collider pairs that started touching during a step.
#[derive(Default)]
struct ContactCollector {
    started: Mutex<Vec<(ColliderHandle, ColliderHandle)>>,
}

impl EventHandler for ContactCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let CollisionEvent::Started(a, b, _) = event {
            if let Ok(mut started) = self.started.lock() {
                started.push((a, b));
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Rigid-body physics on rapier2d.
pub struct RapierWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    meta: HashMap<RigidBodyHandle, BodyMeta>,
    collector: ContactCollector,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            meta: HashMap::new(),
            collector: ContactCollector::default(),
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn body_of(&self, collider: ColliderHandle) -> Option<RigidBodyHandle> {
        self.colliders.get(collider).and_then(|c| c.parent())
    }

    fn contact_of(&self, a: ColliderHandle, b: ColliderHandle) -> Option<Contact> {
        let (ha, hb) = (self.body_of(a)?, self.body_of(b)?);
        let (ma, mb) = (self.meta.get(&ha)?, self.meta.get(&hb)?);
        let pa = to_vec2(self.bodies.get(ha)?.translation());
        let pb = to_vec2(self.bodies.get(hb)?.translation());
        Some(Contact {
            a: BodyHandle(ha),
            b: BodyHandle(hb),
            owner_a: ma.owner,
            owner_b: mb.owner,
            point: pa + (pb - pa).normalize_or_zero() * ma.radius,
        })
    }
}

impl PhysicsWorld for RapierWorld {
    fn create_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let builder = if desc.fixed {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
        };
        let body = builder
            .translation(vector![desc.pos.x, desc.pos.y])
            .rotation(desc.angle.to_radians())
            .linvel(vector![desc.spd.x, desc.spd.y])
            .angvel(desc.rot_spd.to_radians())
            .ccd_enabled(desc.projectile)
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let groups = if desc.projectile {
            InteractionGroups::new(PROJECTILE_GROUP, SOLID_GROUP)
        } else {
            InteractionGroups::new(SOLID_GROUP, Group::ALL)
        };
        let collider = ColliderBuilder::ball(desc.radius)
            .density(desc.density)
            .collision_groups(groups)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        if let Some(body) = self.bodies.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.colliders);
        }

        self.meta.insert(
            handle,
            BodyMeta {
                owner: desc.owner,
                massless: desc.massless,
                radius: desc.radius,
            },
        );
        self.query_pipeline.update(&self.colliders);
        BodyHandle(handle)
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        self.bodies.remove(
            body.0,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.meta.remove(&body.0);
        self.query_pipeline.update(&self.colliders);
    }

    fn state(&self, body: BodyHandle) -> Option<BodyState> {
        self.bodies.get(body.0).map(|b| BodyState {
            pos: to_vec2(b.translation()),
            angle: b.rotation().angle().to_degrees(),
            spd: to_vec2(b.linvel()),
            rot_spd: b.angvel().to_degrees(),
            mass: b.mass(),
        })
    }

    fn set_transform(&mut self, body: BodyHandle, pos: Vec2, angle: f32) {
        let iso = Isometry::new(vector![pos.x, pos.y], angle.to_radians());
        let Some(b) = self.bodies.get_mut(body.0) else {
            return;
        };
        b.set_position(iso, true);
        let attached = b.colliders().to_vec();
        for handle in attached {
            if let Some(collider) = self.colliders.get_mut(handle) {
                collider.set_position(iso);
            }
        }
        self.query_pipeline.update(&self.colliders);
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, spd: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_linvel(vector![spd.x, spd.y], true);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, rot_spd: f32) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.set_angvel(rot_spd.to_radians(), true);
        }
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.add_force(vector![force.x, force.y], true);
        }
    }

    fn ray_cast(&self, from: Vec2, to: Vec2, callback: &mut dyn FnMut(&RayHit) -> RayControl) {
        let dir = to - from;
        if dir.length_squared() == 0.0 {
            return;
        }
        // Direction spans the whole segment so time of impact is the fraction.
        let ray = Ray::new(point![from.x, from.y], vector![dir.x, dir.y]);
        let mut hits: Vec<RayHit> = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            1.0,
            true,
            QueryFilter::default(),
            |collider, intersection: RayIntersection| {
                let Some(body) = self.body_of(collider) else {
                    return true;
                };
                let meta = self.meta.get(&body);
                let fraction = intersection.time_of_impact;
                hits.push(RayHit {
                    body: BodyHandle(body),
                    owner: meta.and_then(|m| m.owner),
                    point: from + dir * fraction,
                    fraction,
                    massless: meta.is_some_and(|m| m.massless),
                });
                true
            },
        );
        hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        for hit in &hits {
            if callback(hit) == RayControl::Stop {
                break;
            }
        }
    }

    fn step(&mut self, ts: f32, contacts: &mut Vec<Contact>) {
        if ts > 0.0 {
            self.integration_parameters.dt = ts;
            self.physics_pipeline.step(
                &vector![0.0, 0.0],
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &self.collector,
            );
        }
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }

        let started = match self.collector.started.lock() {
            Ok(mut started) => std::mem::take(&mut *started),
            Err(_) => Vec::new(),
        };
        contacts.extend(started.into_iter().filter_map(|(a, b)| self.contact_of(a, b)));
    }
}

fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_accelerates_by_mass() {
        let mut world = RapierWorld::new();
        let body = world.create_body(BodyDesc {
            radius: 1.0,
            density: 2.0,
            ..Default::default()
        });
        let mass = world.state(body).unwrap().mass;
        assert_relative_eq!(mass, 2.0 * std::f32::consts::PI, epsilon = 1e-4);
        world.apply_force(body, Vec2::new(mass, 0.0));
        world.step(0.5, &mut Vec::new());
        let s = world.state(body).unwrap();
        assert_relative_eq!(s.spd.x, 0.5, epsilon = 1e-4);
        assert!(s.pos.x > 0.0);

        // Forces are consumed by the step
        world.step(0.5, &mut Vec::new());
        assert_relative_eq!(world.state(body).unwrap().spd.x, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_cast_reports_nearest_first() {
        let mut world = RapierWorld::new();
        let far = world.create_body(BodyDesc {
            pos: Vec2::new(8.0, 0.0),
            ..Default::default()
        });
        let near = world.create_body(BodyDesc {
            pos: Vec2::new(4.0, 0.0),
            ..Default::default()
        });
        world.create_body(BodyDesc {
            pos: Vec2::new(4.0, 5.0),
            ..Default::default()
        });

        let mut seen = Vec::new();
        world.ray_cast(Vec2::ZERO, Vec2::new(10.0, 0.0), &mut |hit| {
            seen.push((hit.body, hit.point));
            RayControl::Continue
        });
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, near);
        assert_eq!(seen[1].0, far);
        assert_relative_eq!(seen[0].1.x, 3.5, epsilon = 1e-4);

        let mut count = 0;
        world.ray_cast(Vec2::ZERO, Vec2::new(10.0, 0.0), &mut |_| {
            count += 1;
            RayControl::Stop
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fast_projectile_reports_contact_with_thin_obstacle() {
        let mut world = RapierWorld::new();
        let rock = world.create_body(BodyDesc {
            pos: Vec2::new(2.55, 0.0),
            radius: 0.1,
            fixed: true,
            ..Default::default()
        });
        let ball = world.create_body(BodyDesc {
            pos: Vec2::new(0.3, 0.0),
            spd: Vec2::new(90.0, 0.0),
            radius: 0.05,
            projectile: true,
            ..Default::default()
        });

        let mut contacts = Vec::new();
        for _ in 0..10 {
            world.step(1.0 / 60.0, &mut contacts);
        }
        assert!(contacts
            .iter()
            .any(|c| (c.a == ball && c.b == rock) || (c.a == rock && c.b == ball)));
        assert!(world.state(ball).unwrap().pos.x < 2.55);
    }

    #[test]
    fn test_projectiles_pass_through_each_other() {
        let mut world = RapierWorld::new();
        for x in [0.0, 0.05] {
            world.create_body(BodyDesc {
                pos: Vec2::new(x, 0.0),
                radius: 0.1,
                projectile: true,
                ..Default::default()
            });
        }
        let mut contacts = Vec::new();
        world.step(1.0 / 60.0, &mut contacts);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_fixed_body_does_not_move() {
        let mut world = RapierWorld::new();
        let body = world.create_body(BodyDesc {
            spd: Vec2::new(1.0, 0.0),
            fixed: true,
            ..Default::default()
        });
        world.apply_force(body, Vec2::new(10.0, 0.0));
        world.step(1.0, &mut Vec::new());
        assert_eq!(world.state(body).unwrap().pos, Vec2::ZERO);
        world.destroy_body(body);
        assert!(world.state(body).is_none());
        assert_eq!(world.body_count(), 0);
    }
}

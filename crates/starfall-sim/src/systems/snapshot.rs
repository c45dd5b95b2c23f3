//! Snapshot system: builds a `CombatSnapshot` from the world.
//!
//! Read-only; never modifies the world.

use hecs::World;

use starfall_core::components::{Durability, Kinematics, Pilot};
use starfall_core::enums::GamePhase;
use starfall_core::events::CombatEvent;
use starfall_core::state::{CombatSnapshot, MountView, ProjectileView, ShipView};
use starfall_core::types::SimTime;

use crate::components::Hull;
use crate::mount::GunMount;
use crate::projectile::{Projectile, ProjectileMotion};

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    time_factor: f32,
    events: Vec<CombatEvent>,
) -> CombatSnapshot {
    CombatSnapshot {
        time: *time,
        phase,
        time_factor,
        ships: build_ships(world),
        projectiles: build_projectiles(world),
        events,
    }
}

fn build_ships(world: &World) -> Vec<ShipView> {
    let mut ships: Vec<ShipView> = world
        .query::<(&Hull, &Kinematics, &Pilot, &Durability)>()
        .iter()
        .map(|(entity, (hull, kin, pilot, durability))| ShipView {
            id: entity.to_bits().get(),
            hull: hull.config.code.clone(),
            faction: pilot.faction,
            pos: kin.pos,
            spd: kin.spd,
            angle: kin.angle,
            life: durability.life,
            shield_life: durability.shield_life,
            mounts: hull.mounts.iter().map(build_mount).collect(),
        })
        .collect();
    ships.sort_by_key(|s| s.id);
    ships
}

fn build_mount(mount: &GunMount) -> MountView {
    let item = mount.gun_item();
    MountView {
        gun: item.map(|i| i.config.code.clone()),
        ammo: item.map_or(0, |i| i.ammo),
        reload_await: item.map_or(0.0, |i| i.reload_await),
        rel_angle: mount.rel_angle(),
        detected: mount.is_detected(),
    }
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .map(|(entity, projectile)| ProjectileView {
            id: entity.to_bits().get(),
            projectile: projectile.config.code.clone(),
            faction: projectile.faction,
            pos: projectile.body.pos(),
            spd: projectile.body.spd(),
            angle: projectile.body.angle(),
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

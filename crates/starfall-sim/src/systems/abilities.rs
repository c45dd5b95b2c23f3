//! Ability system: recharge, use on request, and KnockBack pushes.

use glam::Vec2;
use hecs::{Entity, World};

use starfall_core::components::{Kinematics, Pilot, ReceivesGravity};
use starfall_core::events::CombatEvent;
use starfall_core::items::ItemContainer;

use crate::abilities::{knock_back_force, Ability, ShipAbility};
use crate::components::Hull;
use crate::physics::PhysicsWorld;
use crate::projectile::{Projectile, ProjectileMotion};

pub fn run(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    ts: f32,
    events: &mut Vec<CombatEvent>,
) {
    let mut pushes: Vec<(Entity, Vec2, f32)> = Vec::new();

    for (entity, (ability, pilot, inventory, kin)) in world.query_mut::<(
        &mut ShipAbility,
        &mut Pilot,
        &mut ItemContainer,
        &Kinematics,
    )>() {
        let wants = pilot.use_ability && !pilot.is_disabled();
        pilot.use_ability = false;
        if !ability.update(wants, inventory, ts) {
            continue;
        }
        log::debug!("ship {} used {:?}", entity.to_bits(), ability.ability.kind());
        events.push(CombatEvent::AbilityUsed {
            ship: entity.to_bits().get(),
            ability: ability.ability.kind(),
            pos: kin.pos,
        });
        if let Ability::KnockBack { force } = ability.ability {
            pushes.push((entity, kin.pos, force));
        }
    }

    for (owner, origin, force) in pushes {
        for (entity, (hull, kin, _)) in world.query_mut::<(&Hull, &Kinematics, &ReceivesGravity)>() {
            if entity == owner {
                continue;
            }
            if let Some(push) = knock_back_force(origin, kin.pos, force) {
                physics.apply_force(hull.body, push);
            }
        }
        for (_entity, (projectile, _)) in world.query_mut::<(&mut Projectile, &ReceivesGravity)>() {
            if let Some(push) = knock_back_force(origin, projectile.body.pos(), force) {
                projectile.body.receive_force(physics, push, ts, false);
            }
        }
    }
}

/// Time factor imposed by the player's SloMo, 1 when none is active.
pub fn player_time_factor(world: &World) -> f32 {
    world
        .query::<(&ShipAbility, &Pilot)>()
        .iter()
        .find(|(_, (_, pilot))| pilot.is_player())
        .map_or(1.0, |(_, (ability, _))| ability.time_factor())
}

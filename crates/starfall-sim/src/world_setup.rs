//! Entity spawn factories for ships and scenery.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use starfall_core::components::{Durability, Kinematics, Pilot, ReceivesGravity};
use starfall_core::config::{ItemGroup, ShipConfig};
use starfall_core::enums::HullType;
use starfall_core::events::CombatEvent;
use starfall_core::items::{Item, ItemContainer};

use crate::abilities::ShipAbility;
use crate::components::{Hull, Scenery};
use crate::error::CombatError;
use crate::physics::{BodyDesc, PhysicsWorld};

/// Spawn a ship with a loadout rolled from `config`.
///
/// Each item group is included with its chance and contributes one of its
/// options. Guns are mounted in the first compatible slot; the rest of the
/// loadout goes to the hold. Armor and shields set the ship's protection.
#[allow(clippy::too_many_arguments)]
pub fn spawn_ship(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    rng: &mut ChaCha8Rng,
    config: &ShipConfig,
    pos: Vec2,
    angle: f32,
    pilot: Pilot,
    events: &mut Vec<CombatEvent>,
) -> Result<Entity, CombatError> {
    let mut inventory = roll_loadout(rng, &config.items);
    let hull_config = &config.hull;

    let (armor_perc, shield_life) = inventory.protection();
    let durability = Durability {
        armor_perc,
        shield_life,
        ..Durability::new(hull_config.max_life)
    };
    let kin = Kinematics {
        pos,
        angle,
        ..Default::default()
    };
    let entity = world.spawn((kin, pilot, durability, ReceivesGravity));

    let body = physics.create_body(BodyDesc {
        pos,
        angle,
        radius: hull_config.approx_radius,
        density: hull_config.density,
        owner: Some(entity),
        fixed: hull_config.hull_type == HullType::Station,
        ..Default::default()
    });
    let mut hull = Hull::new(hull_config.clone(), body);

    let guns: Vec<(String, bool)> = inventory
        .iter()
        .filter_map(|item| match item {
            Item::Gun(gun) => Some((gun.config.code.clone(), gun.config.fixed)),
            _ => None,
        })
        .collect();
    for (code, fixed) in guns {
        let Some(slot) = hull.free_slot_for(fixed) else {
            continue;
        };
        let item = inventory.take_gun(&code);
        hull.set_gun(entity, slot, item, events)?;
    }

    log::debug!(
        "spawned {} as {} at {pos} ({} items in hold)",
        config.code,
        entity.to_bits(),
        inventory.len()
    );
    world.insert(entity, (hull, inventory))?;
    if let Some(ability) = &config.ability {
        world.insert_one(entity, ShipAbility::new(ability))?;
    }
    Ok(entity)
}

fn roll_loadout(rng: &mut ChaCha8Rng, groups: &[ItemGroup]) -> ItemContainer {
    let mut inventory = ItemContainer::new();
    for group in groups {
        if group.options.is_empty() || rng.gen::<f32>() >= group.chance {
            continue;
        }
        let pick = &group.options[rng.gen_range(0..group.options.len())];
        inventory.add(Item::from(pick));
    }
    inventory
}

/// Spawn a fixed round obstacle.
pub fn spawn_scenery(
    world: &mut World,
    physics: &mut dyn PhysicsWorld,
    pos: Vec2,
    radius: f32,
) -> Result<Entity, CombatError> {
    let entity = world.spawn(());
    let body = physics.create_body(BodyDesc {
        pos,
        radius,
        owner: Some(entity),
        fixed: true,
        ..Default::default()
    });
    world.insert_one(entity, Scenery { body, radius })?;
    Ok(entity)
}

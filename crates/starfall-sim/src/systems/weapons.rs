//! Weapons system: aims every mount and runs its gun. Fired projectiles are
//! queued as spawn requests for the sweep.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use starfall_core::components::{Kinematics, Pilot};
use starfall_core::events::CombatEvent;
use starfall_core::items::ItemContainer;
use starfall_core::planet::Planet;

use crate::components::Hull;
use crate::gun::{GunFrame, SpawnRequest};
use crate::mount::MountFrame;
use crate::targeting::{nearest_enemy, Target};

#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    targets: &[Target],
    planet: Option<&Planet>,
    ts: f32,
    rng: &mut ChaCha8Rng,
    spawns: &mut Vec<SpawnRequest>,
    events: &mut Vec<CombatEvent>,
) {
    for (entity, (hull, kin, pilot, inventory)) in
        world.query_mut::<(&mut Hull, &Kinematics, &Pilot, &mut ItemContainer)>()
    {
        let max_dist = pilot.detection_dist + hull.config.approx_radius;
        let enemy = nearest_enemy(targets, kin.pos, pilot.faction, max_dist);
        let hull_type = hull.config.hull_type;
        let approx_radius = hull.config.approx_radius;

        for (idx, mount) in hull.mounts.iter_mut().enumerate() {
            let slot = idx as u8;
            let frame = MountFrame {
                gun: GunFrame {
                    ship: entity,
                    slot,
                    base_pos: kin.pos,
                    base_angle: kin.angle,
                    base_spd: kin.spd,
                    faction: pilot.faction,
                    planet,
                },
                hull_type,
                approx_radius,
                is_player: pilot.is_player(),
                enemy,
            };
            let should_shoot = pilot.trigger(slot == 1) && !pilot.is_disabled();
            mount.update(inventory, &frame, should_shoot, ts, rng, spawns, events);
        }
    }
}

//! Combat effectiveness estimates derived from configuration alone.
//!
//! Used to rank guns in shops and to decide whether an encounter is too
//! dangerous for a given ship.

use crate::config::{GunConfig, HullConfig, ItemGroup, ItemTemplate, ShipConfig};
use crate::constants::*;
use crate::error::ConfigError;
use crate::math::clamp;

/// Damage per second for a gun whose single projectile deals `shot_dmg`.
///
/// A gun with no delay between shots empties the whole clip as one volley
/// and is then limited by its reload.
pub fn shot_dps(gun: &GunConfig, shot_dmg: f32) -> f32 {
    let mut projectiles = gun.clip.projectiles_per_shot;
    if gun.time_between_shots == 0.0 {
        projectiles = gun.clip.size;
    }
    let mut dmg = shot_dmg;
    if projectiles > 1 {
        dmg *= VOLLEY_EFFICIENCY * projectiles as f32;
    }
    let period = if gun.time_between_shots == 0.0 {
        gun.reload_time
    } else {
        gun.time_between_shots
    };
    dmg / period
}

/// Probability that a single projectile of this gun hits.
pub fn hit_chance(gun: &GunConfig) -> f32 {
    let projectile = gun.projectile();
    if projectile.is_guided() {
        return GUIDED_HIT_CHANCE;
    }
    if projectile.zero_abs_spd {
        return ZERO_ABS_SPD_HIT_CHANCE;
    }
    let mut chance = (projectile.speed + projectile.acc) / 6.0;
    if projectile.phys_size > 0.0 {
        chance += projectile.phys_size;
    }
    chance = clamp(chance, 0.1, 1.0);
    if gun.fixed {
        chance *= FIXED_MOUNT_HIT_MUL;
    }
    chance
}

/// Expected damage per second, crediting EM and knock-back effects with
/// nominal damage.
pub fn gun_mean_dps(gun: &GunConfig) -> f32 {
    let projectile = gun.projectile();
    let dmg = if projectile.em_time > 0.0 {
        EM_NOMINAL_DMG
    } else if projectile.knocks_back() {
        projectile.damage + DENSITY_DMG_BONUS
    } else {
        projectile.damage
    };
    shot_dps(gun, dmg * hit_chance(gun))
}

/// Mean DPS of a gun loadout group, weighted by the group's chance.
pub fn item_group_dps(group: &ItemGroup, fixed: bool) -> Result<f32, ConfigError> {
    if group.options.is_empty() {
        return Ok(0.0);
    }
    let mut dps = 0.0;
    for option in &group.options {
        let ItemTemplate::Gun(gun) = option else {
            return Err(ConfigError::MixedItemTypes {
                items: ItemGroup::names(&group.options),
            });
        };
        if gun.fixed != fixed {
            return Err(ConfigError::MixedFixedGuns {
                items: ItemGroup::names(&group.options),
            });
        }
        dps += gun.mean_dps;
    }
    Ok(dps / group.options.len() as f32 * group.chance)
}

/// DPS of a loadout on a hull. Gun groups are assigned in order to the
/// first unused compatible slot; groups without a free slot are ignored.
pub fn ship_config_dps(hull: &HullConfig, items: &[ItemGroup]) -> Result<f32, ConfigError> {
    let mut unused = hull.gun_slots.clone();
    let mut dps = 0.0;
    for group in items {
        if unused.is_empty() {
            break;
        }
        let Some(ItemTemplate::Gun(first)) = group.options.first() else {
            continue;
        };
        if let Some(idx) = unused.iter().position(|slot| slot.accepts(first)) {
            dps += item_group_dps(group, first.fixed)?;
            unused.remove(idx);
        }
    }
    Ok(dps)
}

/// Damage a loadout can absorb: hull life scaled by the first armor group,
/// plus the first shield group's life.
pub fn ship_config_dmg_cap(hull: &HullConfig, items: &[ItemGroup]) -> f32 {
    let mut shield_life = 0.0;
    let mut armor_perc = 0.0;
    for group in items {
        if group.options.is_empty() {
            continue;
        }
        let n = group.options.len() as f32;
        match group.options.first() {
            Some(ItemTemplate::Shield { .. }) if shield_life == 0.0 => {
                let sum: f32 = group
                    .options
                    .iter()
                    .map(|o| match o {
                        ItemTemplate::Shield { life, .. } => *life,
                        _ => 0.0,
                    })
                    .sum();
                shield_life = sum / n * group.chance;
            }
            Some(ItemTemplate::Armor { .. }) if armor_perc == 0.0 => {
                let sum: f32 = group
                    .options
                    .iter()
                    .map(|o| match o {
                        ItemTemplate::Armor { perc, .. } => *perc,
                        _ => 0.0,
                    })
                    .sum();
                armor_perc = sum / n * group.chance;
            }
            _ => {}
        }
    }
    dmg_cap(hull.max_life, armor_perc, shield_life)
}

/// Damage capacity of a hull with the given armor fraction and shield life.
pub fn dmg_cap(max_life: f32, armor_perc: f32, shield_life: f32) -> f32 {
    max_life / (1.0 - armor_perc) + shield_life * SHIELD_MUL
}

/// Strongest ship of an encounter list.
pub fn ship_list_dps<'a>(ships: impl IntoIterator<Item = &'a ShipConfig>) -> f32 {
    ships.into_iter().map(|s| s.dps).fold(0.0, f32::max)
}

/// Threat near a planet's surface; stronger gravity makes fights harder.
pub fn ground_dps(ground: &[ShipConfig], low_orbit: &[ShipConfig], grav: f32) -> f32 {
    let dps = ship_list_dps(ground).max(ship_list_dps(low_orbit));
    dps * (1.0 + grav * GROUND_GRAV_DPS_FACTOR)
}

pub fn atm_dps(high_orbit: &[ShipConfig]) -> f32 {
    ship_list_dps(high_orbit)
}

pub fn maze_dps(outer: &[ShipConfig], inner: &[ShipConfig]) -> f32 {
    ship_list_dps(outer).max(ship_list_dps(inner)) * MAZE_DPS_MUL
}

pub fn belt_dps(temp: &[ShipConfig]) -> f32 {
    BELT_DPS_MUL * ship_list_dps(temp)
}

/// Combined mean DPS of the guns a ship currently has mounted.
pub fn mounted_dps<'a>(guns: impl IntoIterator<Item = Option<&'a GunConfig>>) -> f32 {
    guns.into_iter().flatten().map(|g| g.mean_dps).sum()
}

/// A target is dangerous when it can kill `dmg_cap` in under five seconds.
pub fn is_dangerous(dmg_cap: f32, dps: f32) -> bool {
    dmg_cap / dps < DANGER_KILL_TIME
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::*;
    use approx::assert_relative_eq;

    fn projectile(speed: f32) -> ProjectileConfig {
        ProjectileConfig {
            code: "bullet".into(),
            damage: 10.0,
            dmg_type: Default::default(),
            speed,
            acc: 0.0,
            phys_size: 0.0,
            density: None,
            guide_rot_spd: 0.0,
            zero_abs_spd: false,
            em_time: 0.0,
            massless: false,
            lifetime: DEFAULT_PROJECTILE_LIFETIME,
        }
    }

    fn gun_with(projectile: ProjectileConfig, tbs: f32, fixed: bool) -> GunConfig {
        let clip = ClipConfig {
            code: "clip".into(),
            projectile: Arc::new(projectile),
            size: 10,
            infinite: true,
            projectiles_per_shot: 1,
            plural: "bullets".into(),
            price: 0.0,
        };
        let record = GunRecord {
            display_name: "Gun".into(),
            min_angle_var: 0.0,
            max_angle_var: 5.0,
            angle_var_damp: 2.0,
            angle_var_per_shot: 1.0,
            time_between_shots: tbs,
            reload_time: 2.0,
            gun_length: 0.3,
            tex_len_perc: 1.0,
            light_on_shot: false,
            price: 0.0,
            fixed,
            clip_name: "clip".into(),
        };
        GunConfig::build("gun", record, Arc::new(clip)).unwrap()
    }

    #[test]
    fn test_shot_dps_single_projectile() {
        let gun = gun_with(projectile(6.0), 0.5, false);
        assert_relative_eq!(shot_dps(&gun, 10.0), 20.0);
        assert_relative_eq!(gun.dps, 20.0);
    }

    #[test]
    fn test_zero_time_between_shots_uses_clip_over_reload() {
        let gun = gun_with(projectile(6.0), 0.0, false);
        // 10 projectiles at 60% efficiency over a 2 s reload
        assert_relative_eq!(shot_dps(&gun, 10.0), 10.0 * 0.6 * 10.0 / 2.0);
    }

    #[test]
    fn test_hit_chance_rules() {
        let free = gun_with(projectile(3.0), 0.5, false);
        assert_relative_eq!(hit_chance(&free), 0.5);
        let fixed = gun_with(projectile(3.0), 0.5, true);
        assert_relative_eq!(hit_chance(&fixed), 0.15, epsilon = 1e-6);
        let fast = gun_with(projectile(60.0), 0.5, false);
        assert_relative_eq!(hit_chance(&fast), 1.0);
        let slow = gun_with(projectile(0.1), 0.5, false);
        assert_relative_eq!(hit_chance(&slow), 0.1);

        let mut guided = projectile(3.0);
        guided.guide_rot_spd = 90.0;
        assert_relative_eq!(hit_chance(&gun_with(guided, 0.5, true)), 0.9);

        let mut mine = projectile(0.0);
        mine.zero_abs_spd = true;
        assert_relative_eq!(hit_chance(&gun_with(mine, 0.5, false)), 0.1);
    }

    #[test]
    fn test_mean_dps_credits_em_and_density() {
        let mut em = projectile(6.0);
        em.damage = 0.0;
        em.em_time = 3.0;
        let gun = gun_with(em, 1.0, false);
        assert_relative_eq!(gun.mean_dps, 150.0);

        let mut heavy = projectile(6.0);
        heavy.density = Some(2.0);
        let gun = gun_with(heavy, 1.0, false);
        assert_relative_eq!(gun.mean_dps, 20.0);
    }

    #[test]
    fn test_item_group_dps_rejects_mixed_fixed_flags() {
        let a = Arc::new(gun_with(projectile(6.0), 1.0, false));
        let b = Arc::new(gun_with(projectile(6.0), 1.0, true));
        let group = ItemGroup::new(vec![ItemTemplate::Gun(a), ItemTemplate::Gun(b)], 1.0).unwrap();
        assert!(matches!(
            item_group_dps(&group, false),
            Err(ConfigError::MixedFixedGuns { .. })
        ));
    }

    #[test]
    fn test_item_group_dps_is_weighted_mean() {
        let a = Arc::new(gun_with(projectile(6.0), 1.0, false));
        let b = Arc::new(gun_with(projectile(6.0), 0.5, false));
        let group = ItemGroup::new(vec![ItemTemplate::Gun(a), ItemTemplate::Gun(b)], 0.5).unwrap();
        assert_relative_eq!(item_group_dps(&group, false).unwrap(), (10.0 + 20.0) / 2.0 * 0.5);
    }

    #[test]
    fn test_ship_config_dps_matches_slots_greedily() {
        let free = Arc::new(gun_with(projectile(6.0), 1.0, false));
        let fixed = Arc::new(gun_with(projectile(6.0), 1.0, true));
        let hull = HullConfig {
            code: "hull".into(),
            hull_type: Default::default(),
            approx_radius: 0.5,
            max_life: 100.0,
            density: 1.0,
            gun_slots: vec![GunSlot {
                pos: glam::Vec2::ZERO,
                allows_rotation: true,
                under_ship: false,
            }],
            engine: Default::default(),
        };
        let items = vec![
            ItemGroup::new(vec![ItemTemplate::Gun(fixed)], 1.0).unwrap(),
            ItemGroup::new(vec![ItemTemplate::Gun(free.clone())], 1.0).unwrap(),
            ItemGroup::new(vec![ItemTemplate::Gun(free.clone())], 1.0).unwrap(),
        ];
        // Fixed gun finds no slot, first free gun takes the only one
        assert_relative_eq!(ship_config_dps(&hull, &items).unwrap(), free.mean_dps);
    }

    #[test]
    fn test_dmg_cap_and_danger() {
        assert_relative_eq!(dmg_cap(100.0, 0.5, 10.0), 212.0);
        assert!(is_dangerous(40.0, 10.0));
        assert!(!is_dangerous(60.0, 10.0));
        assert!(!is_dangerous(60.0, 0.0));
    }
}

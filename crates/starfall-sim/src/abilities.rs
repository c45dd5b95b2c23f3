//! Ship abilities: KnockBack pushes nearby objects away, SloMo slows time.

use glam::Vec2;

use starfall_core::config::AbilityConfig;
use starfall_core::constants::{KNOCK_BACK_RADIUS, SLO_MO_CHG_SPD};
use starfall_core::enums::AbilityKind;
use starfall_core::items::ItemContainer;
use starfall_core::math::approach;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ability {
    KnockBack { force: f32 },
    SloMo { factor: f32, current: f32 },
}

impl Ability {
    pub fn kind(&self) -> AbilityKind {
        match self {
            Ability::KnockBack { .. } => AbilityKind::KnockBack,
            Ability::SloMo { .. } => AbilityKind::SloMo,
        }
    }

    /// Run the ability for one tick. Returns whether it was used.
    fn update(&mut self, try_to_use: bool, ts: f32) -> bool {
        match self {
            Ability::KnockBack { .. } => try_to_use,
            Ability::SloMo { factor, current } => {
                if try_to_use {
                    *current = *factor;
                    return true;
                }
                *current = approach(*current, 1.0, SLO_MO_CHG_SPD * ts);
                false
            }
        }
    }
}

/// A ship's ability with its recharge timer.
#[derive(Debug, Clone, Copy)]
pub struct ShipAbility {
    pub ability: Ability,
    pub recharge_time: f32,
    pub recharge_await: f32,
}

impl ShipAbility {
    pub fn new(config: &AbilityConfig) -> Self {
        let ability = match *config {
            AbilityConfig::KnockBack { force, .. } => Ability::KnockBack { force },
            AbilityConfig::SloMo { factor, .. } => Ability::SloMo {
                factor,
                current: 1.0,
            },
        };
        Self {
            ability,
            recharge_time: config.recharge_time(),
            recharge_await: 0.0,
        }
    }

    /// Time scale factor this ability imposes. Always 1 for KnockBack.
    pub fn time_factor(&self) -> f32 {
        match self.ability {
            Ability::SloMo { current, .. } => current,
            Ability::KnockBack { .. } => 1.0,
        }
    }

    /// Advance the recharge and use the ability when requested, charged and
    /// a charge item is in the hold. The charge is consumed on use.
    pub fn update(&mut self, wants: bool, inventory: &mut ItemContainer, ts: f32) -> bool {
        if self.recharge_await > 0.0 {
            self.recharge_await -= ts;
        }
        let kind = self.ability.kind();
        let try_to_use = wants && self.recharge_await <= 0.0 && inventory.has_charge(kind);
        if !self.ability.update(try_to_use, ts) {
            return false;
        }
        inventory.try_consume_charge(kind);
        self.recharge_await = self.recharge_time;
        true
    }
}

/// Share of the KnockBack force felt `dst` away: full strength inside half
/// the radius, fading linearly to nothing at the radius.
pub fn knock_back_perc(dst: f32, radius: f32) -> f32 {
    if radius < dst {
        return 0.0;
    }
    let half = radius / 2.0;
    if dst < half {
        return 1.0;
    }
    1.0 - (dst - half) / half
}

/// Push felt by an object at `pos` from a KnockBack at `origin`. `None`
/// when the object is out of range or exactly at the origin.
pub fn knock_back_force(origin: Vec2, pos: Vec2, force: f32) -> Option<Vec2> {
    let to_obj = pos - origin;
    let dst = to_obj.length();
    if dst == 0.0 {
        return None;
    }
    let perc = knock_back_perc(dst, KNOCK_BACK_RADIUS);
    if perc <= 0.0 {
        return None;
    }
    Some(to_obj * (force * perc / dst))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use starfall_core::items::Item;

    #[test]
    fn test_knock_back_falloff() {
        assert_relative_eq!(knock_back_perc(1.0, 8.0), 1.0);
        assert_relative_eq!(knock_back_perc(6.0, 8.0), 0.5);
        assert_relative_eq!(knock_back_perc(8.0, 8.0), 0.0);
        assert_relative_eq!(knock_back_perc(9.0, 8.0), 0.0);
    }

    #[test]
    fn test_knock_back_force_points_away() {
        let f = knock_back_force(Vec2::ZERO, Vec2::new(0.0, 2.0), 10.0).unwrap();
        assert_relative_eq!(f.x, 0.0);
        assert_relative_eq!(f.y, 10.0);
        assert!(knock_back_force(Vec2::ONE, Vec2::ONE, 10.0).is_none());
        assert!(knock_back_force(Vec2::ZERO, Vec2::new(20.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_use_consumes_charge_and_recharges() {
        let mut inventory = ItemContainer::new();
        inventory.add(Item::AbilityCharge(AbilityKind::KnockBack));
        let mut ability = ShipAbility::new(&AbilityConfig::KnockBack {
            recharge_time: 1.0,
            force: 5.0,
        });

        assert!(ability.update(true, &mut inventory, 0.25));
        assert!(inventory.is_empty());
        assert_relative_eq!(ability.recharge_await, 1.0);

        // Recharging and out of charges
        assert!(!ability.update(true, &mut inventory, 0.25));
        inventory.add(Item::AbilityCharge(AbilityKind::KnockBack));
        for _ in 0..2 {
            assert!(!ability.update(true, &mut inventory, 0.25));
        }
        assert!(ability.update(true, &mut inventory, 0.25));
    }

    #[test]
    fn test_slo_mo_relaxes_back_to_one() {
        let mut inventory = ItemContainer::new();
        inventory.add(Item::AbilityCharge(AbilityKind::SloMo));
        let mut ability = ShipAbility::new(&AbilityConfig::SloMo {
            recharge_time: 10.0,
            factor: 0.4,
        });
        assert_relative_eq!(ability.time_factor(), 1.0);
        assert!(ability.update(true, &mut inventory, 1.0));
        assert_relative_eq!(ability.time_factor(), 0.4);
        ability.update(false, &mut inventory, 10.0);
        assert_relative_eq!(ability.time_factor(), 0.7, epsilon = 1e-5);
        ability.update(false, &mut inventory, 20.0);
        assert_relative_eq!(ability.time_factor(), 1.0);
    }
}

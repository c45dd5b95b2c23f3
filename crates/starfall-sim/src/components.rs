//! Simulation-side components: the ones that own physics handles or
//! runtime guns.

use std::sync::Arc;

use hecs::Entity;

use starfall_core::config::HullConfig;
use starfall_core::effectiveness;
use starfall_core::events::CombatEvent;
use starfall_core::items::GunItem;

use crate::error::CombatError;
use crate::mount::GunMount;
use crate::physics::BodyHandle;

/// A ship's hull: its physics body and gun mounts, one per slot.
#[derive(Debug, Clone)]
pub struct Hull {
    pub config: Arc<HullConfig>,
    pub body: BodyHandle,
    pub mounts: Vec<GunMount>,
}

impl Hull {
    pub fn new(config: Arc<HullConfig>, body: BodyHandle) -> Self {
        let mounts = config.gun_slots.iter().map(GunMount::new).collect();
        Self {
            config,
            body,
            mounts,
        }
    }

    pub fn mount(&self, slot: u8) -> Option<&GunMount> {
        self.mounts.get(slot as usize)
    }

    /// Equip `item` in `slot`, or empty the slot with `None`. Returns the
    /// gun that was mounted there before.
    pub fn set_gun(
        &mut self,
        ship: Entity,
        slot: u8,
        item: Option<GunItem>,
        events: &mut Vec<CombatEvent>,
    ) -> Result<Option<GunItem>, CombatError> {
        let mount = self
            .mounts
            .get_mut(slot as usize)
            .ok_or(CombatError::NoSuchSlot { slot })?;
        mount.set_gun(ship, slot, item, events)
    }

    /// First empty slot that takes a gun with the given fixed flag.
    pub fn free_slot_for(&self, fixed: bool) -> Option<u8> {
        self.mounts
            .iter()
            .position(|m| m.gun().is_none() && m.is_fixed() == fixed)
            .map(|idx| idx as u8)
    }

    /// Mean DPS of the guns currently mounted.
    pub fn mounted_dps(&self) -> f32 {
        effectiveness::mounted_dps(self.mounts.iter().map(|m| m.gun().map(|g| &**g.config())))
    }
}

/// Static obstacle such as an asteroid. Stops every projectile.
#[derive(Debug, Clone, Copy)]
pub struct Scenery {
    pub body: BodyHandle,
    pub radius: f32,
}

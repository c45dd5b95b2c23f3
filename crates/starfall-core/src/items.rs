//! Mutable item instances and the inventory that holds them.

use std::sync::Arc;

use crate::config::{ClipConfig, GunConfig, ItemTemplate};
use crate::enums::AbilityKind;

/// One gun. Small and cloneable; the heavy description lives in the shared
/// config.
#[derive(Debug, Clone)]
pub struct GunItem {
    pub config: Arc<GunConfig>,
    pub ammo: u32,
    /// Seconds left until the current reload completes; `<= 0` when idle.
    pub reload_await: f32,
    /// Mount slot this gun is equipped in.
    pub equipped: Option<u8>,
}

impl GunItem {
    /// A gun with an empty magazine. It reloads on its first update.
    pub fn new(config: Arc<GunConfig>) -> Self {
        Self {
            config,
            ammo: 0,
            reload_await: 0.0,
            equipped: None,
        }
    }

    pub fn loaded(config: Arc<GunConfig>) -> Self {
        let ammo = config.clip.size;
        Self {
            ammo,
            ..Self::new(config)
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_await > 0.0
    }
}

#[derive(Debug, Clone)]
pub enum Item {
    Gun(GunItem),
    Clip(Arc<ClipConfig>),
    Armor { code: String, perc: f32 },
    Shield { code: String, life: f32 },
    AbilityCharge(AbilityKind),
}

impl From<&ItemTemplate> for Item {
    fn from(template: &ItemTemplate) -> Self {
        match template {
            ItemTemplate::Gun(config) => Item::Gun(GunItem::new(config.clone())),
            ItemTemplate::Clip(config) => Item::Clip(config.clone()),
            ItemTemplate::Armor { code, perc } => Item::Armor {
                code: code.clone(),
                perc: *perc,
            },
            ItemTemplate::Shield { code, life } => Item::Shield {
                code: code.clone(),
                life: *life,
            },
            ItemTemplate::AbilityCharge(kind) => Item::AbilityCharge(*kind),
        }
    }
}

/// A ship's cargo hold.
#[derive(Debug, Clone, Default)]
pub struct ItemContainer {
    items: Vec<Item>,
}

impl ItemContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clip_count(&self, clip: &ClipConfig) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, Item::Clip(c) if c.code == clip.code))
            .count()
    }

    /// Remove one clip of the given kind. Returns whether one was found.
    pub fn try_consume_clip(&mut self, clip: &ClipConfig) -> bool {
        self.remove_first(|i| matches!(i, Item::Clip(c) if c.code == clip.code))
            .is_some()
    }

    pub fn has_charge(&self, kind: AbilityKind) -> bool {
        self.items
            .iter()
            .any(|i| matches!(i, Item::AbilityCharge(k) if *k == kind))
    }

    pub fn try_consume_charge(&mut self, kind: AbilityKind) -> bool {
        self.remove_first(|i| matches!(i, Item::AbilityCharge(k) if *k == kind))
            .is_some()
    }

    /// Take an unequipped gun of the given kind out of the hold.
    pub fn take_gun(&mut self, code: &str) -> Option<GunItem> {
        match self.remove_first(|i| matches!(i, Item::Gun(g) if g.config.code == code))? {
            Item::Gun(gun) => Some(gun),
            _ => None,
        }
    }

    /// Best armor and shield carried, as `(armor fraction, shield life)`.
    pub fn protection(&self) -> (f32, f32) {
        self.items.iter().fold((0.0, 0.0), |(armor, shield), item| match item {
            Item::Armor { perc, .. } => (armor.max(*perc), shield),
            Item::Shield { life, .. } => (armor, shield.max(*life)),
            _ => (armor, shield),
        })
    }

    fn remove_first(&mut self, pred: impl Fn(&Item) -> bool) -> Option<Item> {
        let idx = self.items.iter().position(pred)?;
        Some(self.items.remove(idx))
    }
}

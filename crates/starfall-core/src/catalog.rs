//! Loading of the configuration catalog from JSON.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::config::*;
use crate::enums::AbilityKind;
use crate::error::ConfigError;

fn one() -> f32 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CatalogFile {
    projectiles: BTreeMap<String, ProjectileConfig>,
    clips: BTreeMap<String, ClipRecord>,
    guns: BTreeMap<String, GunRecord>,
    hulls: BTreeMap<String, HullConfig>,
    /// Armor code to damage fraction absorbed.
    armors: BTreeMap<String, f32>,
    /// Shield code to shield life.
    shields: BTreeMap<String, f32>,
    ships: BTreeMap<String, ShipRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShipRecord {
    hull: String,
    #[serde(default)]
    items: Vec<ItemGroupRecord>,
    #[serde(default)]
    ability: Option<AbilityConfig>,
}

#[derive(Debug, Deserialize)]
struct ItemGroupRecord {
    options: Vec<String>,
    #[serde(default = "one")]
    chance: f32,
}

/// Every shared config known to the game, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub projectiles: BTreeMap<String, Arc<ProjectileConfig>>,
    pub clips: BTreeMap<String, Arc<ClipConfig>>,
    pub guns: BTreeMap<String, Arc<GunConfig>>,
    pub hulls: BTreeMap<String, Arc<HullConfig>>,
    pub armors: BTreeMap<String, f32>,
    pub shields: BTreeMap<String, f32>,
    pub ships: BTreeMap<String, Arc<ShipConfig>>,
}

impl Catalog {
    /// Parse and validate a catalog. Any inconsistency rejects the whole
    /// catalog.
    pub fn from_json(json: &str) -> Result<Catalog, ConfigError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Catalog::default();

        for (code, mut projectile) in file.projectiles {
            projectile.code = code.clone();
            projectile.validate()?;
            catalog.projectiles.insert(code, Arc::new(projectile));
        }

        for (code, record) in file.clips {
            let projectile = lookup(&catalog.projectiles, "projectile", &record.projectile_code)?;
            let clip = ClipConfig::build(&code, record, projectile)?;
            catalog.clips.insert(code, Arc::new(clip));
        }

        for (code, record) in file.guns {
            let clip = lookup(&catalog.clips, "clip", &record.clip_name)?;
            let gun = GunConfig::build(&code, record, clip)?;
            catalog.guns.insert(code, Arc::new(gun));
        }

        for (code, mut hull) in file.hulls {
            hull.code = code.clone();
            hull.validate()?;
            catalog.hulls.insert(code, Arc::new(hull));
        }

        for (code, &perc) in &file.armors {
            if !(0.0..1.0).contains(&perc) {
                return Err(ConfigError::InvalidValue {
                    code: code.clone(),
                    field: "perc",
                    reason: "must be within [0, 1)",
                });
            }
        }
        catalog.armors = file.armors;
        catalog.shields = file.shields;

        for (code, record) in file.ships {
            let hull = lookup(&catalog.hulls, "hull", &record.hull)?;
            let mut groups = Vec::with_capacity(record.items.len());
            for group in record.items {
                let options = group
                    .options
                    .iter()
                    .map(|c| {
                        catalog.item(c).ok_or_else(|| ConfigError::UnknownReference {
                            kind: "item",
                            code: c.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                groups.push(ItemGroup::new(options, group.chance)?);
            }
            let ship = ShipConfig::build(&code, hull, groups, record.ability)?;
            catalog.ships.insert(code, Arc::new(ship));
        }

        log::info!(
            "catalog loaded: {} projectiles, {} clips, {} guns, {} hulls, {} ships",
            catalog.projectiles.len(),
            catalog.clips.len(),
            catalog.guns.len(),
            catalog.hulls.len(),
            catalog.ships.len()
        );
        Ok(catalog)
    }

    pub fn gun(&self, code: &str) -> Option<&Arc<GunConfig>> {
        self.guns.get(code)
    }

    pub fn clip(&self, code: &str) -> Option<&Arc<ClipConfig>> {
        self.clips.get(code)
    }

    pub fn hull(&self, code: &str) -> Option<&Arc<HullConfig>> {
        self.hulls.get(code)
    }

    pub fn ship(&self, code: &str) -> Option<&Arc<ShipConfig>> {
        self.ships.get(code)
    }

    /// Resolve an item code used in a loadout.
    pub fn item(&self, code: &str) -> Option<ItemTemplate> {
        if let Some(gun) = self.guns.get(code) {
            return Some(ItemTemplate::Gun(gun.clone()));
        }
        if let Some(clip) = self.clips.get(code) {
            return Some(ItemTemplate::Clip(clip.clone()));
        }
        if let Some(&perc) = self.armors.get(code) {
            return Some(ItemTemplate::Armor {
                code: code.to_string(),
                perc,
            });
        }
        if let Some(&life) = self.shields.get(code) {
            return Some(ItemTemplate::Shield {
                code: code.to_string(),
                life,
            });
        }
        match code {
            "knockBackCharge" => Some(ItemTemplate::AbilityCharge(AbilityKind::KnockBack)),
            "sloMoCharge" => Some(ItemTemplate::AbilityCharge(AbilityKind::SloMo)),
            _ => None,
        }
    }
}

fn lookup<T>(
    map: &BTreeMap<String, Arc<T>>,
    kind: &'static str,
    code: &str,
) -> Result<Arc<T>, ConfigError> {
    map.get(code).cloned().ok_or_else(|| {
        log::warn!("catalog references unknown {kind} `{code}`");
        ConfigError::UnknownReference {
            kind,
            code: code.to_string(),
        }
    })
}

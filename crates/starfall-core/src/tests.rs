#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use crate::catalog::Catalog;
    use crate::commands::PlayerCommand;
    use crate::config::*;
    use crate::constants::*;
    use crate::effectiveness;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::CombatEvent;
    use crate::items::{GunItem, Item, ItemContainer};
    use crate::state::CombatSnapshot;
    use crate::types::{are_enemies, Faction, SimTime};

    const CATALOG: &str = r#"{
        "projectiles": {
            "bullet": { "dmg": 5, "dmgType": "bullet", "speedLen": 6 },
            "rocket": {
                "dmg": 40, "dmgType": "explosion", "speedLen": 2, "acc": 4,
                "physSize": 0.2, "guideRotSpd": 90
            }
        },
        "clips": {
            "bullets": { "projectile": "bullet", "size": 20, "infinite": true, "plural": "bullets" },
            "rockets": { "projectile": "rocket", "size": 4, "plural": "rockets" }
        },
        "guns": {
            "blaster": {
                "displayName": "Blaster", "minAngleVar": 0, "maxAngleVar": 6,
                "angleVarDamp": 3, "angleVarPerShot": 1.5, "timeBetweenShots": 0.25,
                "reloadTime": 1.5, "gunLength": 0.3, "clipName": "bullets"
            },
            "launcher": {
                "displayName": "Launcher", "maxAngleVar": 0, "angleVarDamp": 0,
                "angleVarPerShot": 0, "timeBetweenShots": 1.0, "reloadTime": 4,
                "gunLength": 0.4, "fixed": true, "clipName": "rockets"
            }
        },
        "hulls": {
            "fighter": {
                "type": "std", "approxRadius": 0.4, "maxLife": 60,
                "gunSlots": [
                    { "pos": [0.2, 0.0], "allowsRotation": false },
                    { "pos": [-0.1, 0.0], "allowsRotation": true }
                ]
            }
        },
        "armors": { "lightArmor": 0.2 },
        "shields": { "lightShield": 30 },
        "ships": {
            "raider": {
                "hull": "fighter",
                "items": [
                    { "options": ["launcher"] },
                    { "options": ["blaster"], "chance": 0.5 },
                    { "options": ["lightArmor"] },
                    { "options": ["rockets", "rockets"] }
                ],
                "ability": { "type": "knockBack", "rechargeTime": 5, "force": 20 }
            }
        }
    }"#;

    fn catalog_with(patch: impl FnOnce(&mut serde_json::Value)) -> Result<Catalog, ConfigError> {
        let mut value: serde_json::Value = serde_json::from_str(CATALOG).unwrap();
        patch(&mut value);
        Catalog::from_json(&value.to_string())
    }

    fn bullet_gun(projectiles_per_shot: u32, time_between_shots: f32) -> GunConfig {
        let projectile = ProjectileConfig {
            code: "pellet".into(),
            damage: 3.0,
            dmg_type: DamageType::Bullet,
            speed: 5.0,
            acc: 0.0,
            phys_size: 0.0,
            density: None,
            guide_rot_spd: 0.0,
            zero_abs_spd: false,
            em_time: 0.0,
            massless: false,
            lifetime: DEFAULT_PROJECTILE_LIFETIME,
        };
        let clip = ClipConfig {
            code: "shells".into(),
            projectile: Arc::new(projectile),
            size: 8,
            infinite: false,
            projectiles_per_shot,
            plural: "shells".into(),
            price: 10.0,
        };
        let record = GunRecord {
            display_name: "Scatter".into(),
            min_angle_var: 1.0,
            max_angle_var: 10.0,
            angle_var_damp: 4.0,
            angle_var_per_shot: 3.0,
            time_between_shots,
            reload_time: 2.0,
            gun_length: 0.25,
            tex_len_perc: 1.0,
            light_on_shot: true,
            price: 100.0,
            fixed: false,
            clip_name: "shells".into(),
        };
        GunConfig::build("scatter", record, Arc::new(clip)).unwrap()
    }

    // --- Factions ---

    #[test]
    fn test_missing_faction_is_never_an_enemy() {
        assert!(!are_enemies(None, None));
        assert!(!are_enemies(Some(Faction::LAANI), None));
        assert!(!are_enemies(None, Some(Faction::EHAR)));
        assert!(are_enemies(Some(Faction::LAANI), Some(Faction::EHAR)));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_enemy_relation_is_symmetric_and_irreflexive(
            a in proptest::option::of(0u16..8),
            b in proptest::option::of(0u16..8),
        ) {
            let fa = a.map(Faction);
            let fb = b.map(Faction);
            prop_assert_eq!(are_enemies(fa, fb), are_enemies(fb, fa));
            prop_assert!(!are_enemies(fa, fa));
        }

        #[test]
        fn prop_more_projectiles_per_shot_raise_mean_dps(
            n in 1u32..12,
            tbs in 0.05f32..3.0,
        ) {
            let fewer = bullet_gun(n, tbs);
            let more = bullet_gun(n + 1, tbs);
            prop_assert!(more.mean_dps > fewer.mean_dps);
        }
    }

    // --- Catalog ---

    #[test]
    fn test_catalog_builds_shared_configs() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let blaster = catalog.gun("blaster").unwrap();
        let launcher = catalog.gun("launcher").unwrap();
        assert!(!blaster.fixed);
        assert!(launcher.fixed);
        assert!(Arc::ptr_eq(
            &blaster.clip,
            catalog.clip("bullets").unwrap()
        ));
        assert_eq!(launcher.projectile().body_kind(), ProjectileBodyKind::Ball);
        assert_eq!(blaster.projectile().body_kind(), ProjectileBodyKind::Point);
        assert_relative_eq!(blaster.dps, 20.0);
        assert!(blaster.desc.contains("Infinite ammo"));
        assert!(launcher.desc.contains("Uses rockets"));
    }

    #[test]
    fn test_catalog_ship_estimates() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let raider = catalog.ship("raider").unwrap();
        // Launcher: 40 dmg * 0.9 guided / 1 s; blaster: 5 / 0.25 at half chance
        assert_relative_eq!(raider.dps, 36.0 + 10.0, epsilon = 1e-4);
        assert_relative_eq!(raider.dmg_cap, 75.0, epsilon = 1e-4);
        assert_eq!(raider.ability.map(|a| a.kind()), Some(AbilityKind::KnockBack));
        assert_eq!(raider.hull.engine.max_rot_spd(), ENGINE_MAX_ROT_SPD);
    }

    #[test]
    fn test_catalog_rejects_unknown_clip() {
        let err = catalog_with(|v| v["guns"]["blaster"]["clipName"] = "nope".into()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownReference { kind: "clip", .. }
        ));
    }

    #[test]
    fn test_catalog_rejects_inverted_angle_variance() {
        let err = catalog_with(|v| v["guns"]["blaster"]["minAngleVar"] = 9.0.into()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { field: "maxAngleVar", .. }
        ));
    }

    #[test]
    fn test_catalog_rejects_mixed_item_group() {
        let err = catalog_with(|v| {
            v["ships"]["raider"]["items"][1]["options"] = serde_json::json!(["blaster", "lightArmor"])
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MixedItemTypes { .. }));
    }

    #[test]
    fn test_catalog_rejects_mixed_fixed_guns() {
        let err = catalog_with(|v| {
            v["ships"]["raider"]["items"][1]["options"] = serde_json::json!(["blaster", "launcher"])
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MixedFixedGuns { .. }));
    }

    #[test]
    fn test_catalog_rejects_malformed_json() {
        assert!(matches!(
            Catalog::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    // --- Items ---

    #[test]
    fn test_item_container_consumes_one_clip() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let rockets = catalog.clip("rockets").unwrap().clone();
        let mut hold = ItemContainer::new();
        hold.add(Item::Clip(rockets.clone()));
        hold.add(Item::Clip(rockets.clone()));
        hold.add(Item::AbilityCharge(AbilityKind::SloMo));

        assert!(hold.try_consume_clip(&rockets));
        assert_eq!(hold.clip_count(&rockets), 1);
        assert!(hold.try_consume_clip(&rockets));
        assert!(!hold.try_consume_clip(&rockets));
        assert!(!hold.try_consume_charge(AbilityKind::KnockBack));
        assert!(hold.try_consume_charge(AbilityKind::SloMo));
        assert!(hold.is_empty());
    }

    #[test]
    fn test_gun_item_copies_are_independent() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let mut gun = GunItem::loaded(catalog.gun("blaster").unwrap().clone());
        let copy = gun.clone();
        gun.ammo -= 1;
        assert_eq!(copy.ammo, 20);
        assert_eq!(gun.ammo, 19);
        assert!(!GunItem::new(gun.config.clone()).is_reloading());
    }

    #[test]
    fn test_mounted_dps_sums_guns() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let blaster = catalog.gun("blaster").unwrap();
        let dps = effectiveness::mounted_dps([Some(blaster.as_ref()), None]);
        assert_relative_eq!(dps, blaster.mean_dps);
    }

    // --- Serde ---

    #[test]
    fn test_player_command_serde() {
        let cmds = vec![
            PlayerCommand::SetTriggers {
                primary: true,
                secondary: false,
            },
            PlayerCommand::Turn {
                direction: Some(TurnDirection::Left),
            },
            PlayerCommand::UseAbility,
            PlayerCommand::SetTimeScale { scale: 2.0 },
            PlayerCommand::Pause,
            PlayerCommand::Resume,
        ];
        for cmd in cmds {
            let json = serde_json::to_string(&cmd).unwrap();
            let _back: PlayerCommand = serde_json::from_str(&json).unwrap();
        }
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = CombatSnapshot {
            time: SimTime {
                tick: 3,
                elapsed_secs: 0.05,
            },
            time_factor: 1.0,
            events: vec![CombatEvent::ReloadSound {
                ship: 7,
                gun: "blaster".into(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"type\":\"ReloadSound\""));
        let back: CombatSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time.tick, 3);
        assert_eq!(back.events, snapshot.events);
    }

    #[test]
    fn test_damage_type_uses_data_file_names() {
        let t: DamageType = serde_json::from_str("\"explosion\"").unwrap();
        assert_eq!(t, DamageType::Explosion);
        let h: HullType = serde_json::from_str("\"station\"").unwrap();
        assert_eq!(h, HullType::Station);
    }
}

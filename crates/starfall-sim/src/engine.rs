//! Simulation engine.
//!
//! `SimulationEngine` owns the hecs world, the physics world and the star
//! systems, processes player commands, runs all systems in a fixed order
//! and produces `CombatSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starfall_core::catalog::Catalog;
use starfall_core::commands::PlayerCommand;
use starfall_core::components::{Kinematics, Pilot};
use starfall_core::config::ShipConfig;
use starfall_core::constants::DT;
use starfall_core::enums::GamePhase;
use starfall_core::events::CombatEvent;
use starfall_core::items::GunItem;
use starfall_core::planet::{nearest_planet, nearest_system, StarSystem};
use starfall_core::state::CombatSnapshot;
use starfall_core::types::SimTime;

use crate::components::Hull;
use crate::error::CombatError;
use crate::gun::SpawnRequest;
use crate::physics::{Contact, PhysicsWorld, RapierWorld};
use crate::systems;
use crate::targeting;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f32,
    /// Center of the active area while there is no player ship.
    pub focus: Vec2,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            focus: Vec2::ZERO,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    physics: Box<dyn PhysicsWorld>,
    star_systems: Vec<StarSystem>,
    time: SimTime,
    phase: GamePhase,
    time_scale: f32,
    /// Player SloMo factor applied on top of the time scale.
    time_factor: f32,
    default_focus: Vec2,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    spawn_queue: Vec<SpawnRequest>,
    contacts: Vec<Contact>,
    events: Vec<CombatEvent>,
}

impl SimulationEngine {
    /// Create an engine backed by [`RapierWorld`].
    pub fn new(config: SimConfig) -> Self {
        Self::with_physics(config, Box::new(RapierWorld::new()))
    }

    /// Create an engine on top of an external physics world.
    pub fn with_physics(config: SimConfig, physics: Box<dyn PhysicsWorld>) -> Self {
        log::info!("simulation started with seed {}", config.seed);
        Self {
            world: World::new(),
            physics,
            star_systems: Vec::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            time_scale: config.time_scale,
            time_factor: 1.0,
            default_focus: config.focus,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            spawn_queue: Vec::new(),
            contacts: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn add_star_system(&mut self, system: StarSystem) {
        self.star_systems.push(system);
    }

    /// Spawn a ship rolled from `config` and flown by `pilot`.
    pub fn spawn_ship(
        &mut self,
        config: &ShipConfig,
        pos: Vec2,
        angle: f32,
        pilot: Pilot,
    ) -> Result<Entity, CombatError> {
        world_setup::spawn_ship(
            &mut self.world,
            self.physics.as_mut(),
            &mut self.rng,
            config,
            pos,
            angle,
            pilot,
            &mut self.events,
        )
    }

    /// Spawn a ship by its catalog code.
    pub fn spawn_catalog_ship(
        &mut self,
        catalog: &Catalog,
        code: &str,
        pos: Vec2,
        angle: f32,
        pilot: Pilot,
    ) -> Result<Entity, CombatError> {
        let config = catalog
            .ship(code)
            .ok_or_else(|| CombatError::UnknownShip(code.to_string()))?
            .clone();
        self.spawn_ship(&config, pos, angle, pilot)
    }

    pub fn spawn_scenery(&mut self, pos: Vec2, radius: f32) -> Result<Entity, CombatError> {
        world_setup::spawn_scenery(&mut self.world, self.physics.as_mut(), pos, radius)
    }

    /// Swap the gun in one of a ship's slots. Returns the gun taken out.
    pub fn set_gun(
        &mut self,
        ship: Entity,
        slot: u8,
        item: Option<GunItem>,
    ) -> Result<Option<GunItem>, CombatError> {
        let mut hull = self.world.get::<&mut Hull>(ship).map_err(|_| hecs::NoSuchEntity)?;
        hull.set_gun(ship, slot, item, &mut self.events)
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> CombatSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let ts = DT * self.time_scale * self.time_factor;
            self.run_systems(ts);
            self.time.advance(ts);
            self.time_factor = systems::abilities::player_time_factor(&self.world);
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.time_factor,
            events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn physics(&self) -> &dyn PhysicsWorld {
        self.physics.as_ref()
    }

    /// Mutable access for tests and scripted scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn physics_mut(&mut self) -> &mut dyn PhysicsWorld {
        self.physics.as_mut()
    }

    /// The player ship position, or the configured focus without one.
    pub fn focus(&self) -> Vec2 {
        self.world
            .query::<(&Kinematics, &Pilot)>()
            .iter()
            .find(|(_, (_, pilot))| pilot.is_player())
            .map_or(self.default_focus, |(_, (kin, _))| kin.pos)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SetTriggers { primary, secondary } => {
                if let Some(pilot) = self.player_pilot() {
                    pilot.shoot = primary;
                    pilot.shoot2 = secondary;
                }
            }
            PlayerCommand::Turn { direction } => {
                if let Some(pilot) = self.player_pilot() {
                    pilot.turn = direction;
                }
            }
            PlayerCommand::UseAbility => {
                if let Some(pilot) = self.player_pilot() {
                    pilot.use_ability = true;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn player_pilot(&mut self) -> Option<&mut Pilot> {
        self.world
            .query_mut::<&mut Pilot>()
            .into_iter()
            .map(|(_, pilot)| pilot)
            .find(|pilot| pilot.is_player())
    }

    /// Run all systems in order.
    fn run_systems(&mut self, ts: f32) {
        let focus = self.focus();
        let planet = nearest_planet(&self.star_systems, focus);
        let system = nearest_system(&self.star_systems, focus);
        let physics = self.physics.as_mut();

        // 1. Gravity, recovery and star burn
        systems::gravity::run(&mut self.world, physics, planet, system, ts, &mut self.events);
        // 2. Abilities
        systems::abilities::run(&mut self.world, physics, ts, &mut self.events);
        // 3. Pilots: AI decisions and rotation
        let targets = targeting::collect_targets(&self.world);
        systems::pilots::run(&mut self.world, physics, &targets, ts);
        // 4. Weapons: mounts and guns, projectile spawns queued
        systems::weapons::run(
            &mut self.world,
            &targets,
            planet,
            ts,
            &mut self.rng,
            &mut self.spawn_queue,
            &mut self.events,
        );
        // 5. Projectiles: guidance, motion, ray hits
        systems::projectiles::run(
            &mut self.world,
            physics,
            &targets,
            focus,
            ts,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 6. Physics step and pose sync
        systems::movement::run(&mut self.world, physics, ts, &mut self.contacts);
        // 7. Ball contacts
        systems::projectiles::resolve_contacts(
            &mut self.world,
            &self.contacts,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 8. Sweep: removals, then queued spawns
        systems::cleanup::run(
            &mut self.world,
            physics,
            &mut self.despawn_buffer,
            &mut self.spawn_queue,
            &mut self.events,
        );
    }
}

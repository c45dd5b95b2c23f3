//! Simulation constants and tuning parameters.
//!
//! Distances are in world units (a small fighter hull is ~0.5 units across),
//! speeds in units per second, angles in degrees.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Movement ---

/// Speed above which bodies may no longer thrust forward.
pub const MAX_MOVE_SPD: f32 = 8.0;

/// Objects farther than this from the simulation focus leave the active area.
pub const ACTIVE_AREA_RADIUS: f32 = 60.0;

// --- Planets and stars ---

/// Atmosphere thickness above the tallest terrain.
pub const ATM_HEIGHT: f32 = 14.0;

/// Tallest terrain a planet can have above its core.
pub const MAX_GROUND_HEIGHT: f32 = 25.0;

/// Star gravity influence radius.
pub const SUN_RADIUS: f32 = 2.0 * (MAX_GROUND_HEIGHT + ATM_HEIGHT);

/// Inside this radius objects burn, and star gravity stops growing.
pub const SUN_HOT_RAD: f32 = 0.75 * SUN_RADIUS;

/// Star gravitational constant.
pub const SUN_GRAV_CONST: f32 = 2000.0;

/// Burn damage per second inside the hot radius.
pub const SUN_DMG: f32 = 4.0;

/// A point is "near ground" when within this fraction of the atmosphere
/// height above the planet ground.
pub const NEAR_GROUND_ATM_FRACTION: f32 = 0.25;

// --- Targeting ---

/// Auto-rotating mount detection range in open space (surface to surface).
pub const AUTO_SHOOT_SPACE: f32 = 4.0;

/// Auto-rotating mount detection range near a planet's ground.
pub const AUTO_SHOOT_GROUND: f32 = 1.5;

/// Search radius for homing projectiles.
pub const PROJECTILE_VIEW_DIST: f32 = 16.0;

// --- Intercept / shooter ---

/// Fraction of the target velocity used when leading a target.
/// 0 ignores target motion, 1 leads perfectly.
pub const TARGET_SPD_LEAD: f32 = 0.6;

/// Dead zone (degrees) inside which the AI stops turning toward its aim.
pub const MIN_SHOOT_AAD: f32 = 2.0;

/// Extra angular tolerance (degrees) when deciding whether the hull points
/// at the target closely enough to fire.
pub const SHOOT_ANGLE_MARGIN: f32 = 10.0;

// --- Guns ---

/// Added to every reload so a reload started this tick cannot finish on
/// the same tick.
pub const RELOAD_EPSILON: f32 = 0.0001;

// --- Projectiles ---

/// Impulse multiplier for non-acceleration forces on point projectiles,
/// which have no mass.
pub const POINT_FORCE_MUL: f32 = 10.0;

/// Minimum speed used when a ball projectile computes its steering target.
pub const MIN_GUIDE_SPD: f32 = 3.0;

/// Spin (degrees/second) given to zero-absolute-speed ball projectiles.
pub const ZERO_ABS_SPD_SPIN: f32 = 15.0;

/// Lifetime of projectiles whose config leaves it unset (seconds).
pub const DEFAULT_PROJECTILE_LIFETIME: f32 = 8.0;

// --- Effectiveness estimator ---

/// Damage efficiency of each projectile in a multi-projectile volley.
pub const VOLLEY_EFFICIENCY: f32 = 0.6;

/// Hit chance multiplier for guns that cannot track a target.
pub const FIXED_MOUNT_HIT_MUL: f32 = 0.3;

/// Hit chance of guided projectiles.
pub const GUIDED_HIT_CHANCE: f32 = 0.9;

/// Hit chance of zero-absolute-speed (mine-like) projectiles.
pub const ZERO_ABS_SPD_HIT_CHANCE: f32 = 0.1;

/// Nominal damage credited to EM-disable projectiles.
pub const EM_NOMINAL_DMG: f32 = 150.0;

/// Damage bonus credited to projectiles that knock targets back.
pub const DENSITY_DMG_BONUS: f32 = 10.0;

/// Shield life is worth this much hull life.
pub const SHIELD_MUL: f32 = 1.2;

/// Targets that die faster than this (seconds) are dangerous.
pub const DANGER_KILL_TIME: f32 = 5.0;

/// Ground encounter DPS grows by this fraction per unit of gravity.
pub const GROUND_GRAV_DPS_FACTOR: f32 = 0.5;

/// Maze encounter DPS multiplier.
pub const MAZE_DPS_MUL: f32 = 1.25;

/// Asteroid belt encounter DPS multiplier.
pub const BELT_DPS_MUL: f32 = 1.2;

// --- Abilities ---

/// KnockBack influence radius.
pub const KNOCK_BACK_RADIUS: f32 = 8.0;

/// Rate at which the SloMo factor relaxes back to 1 (per second).
pub const SLO_MO_CHG_SPD: f32 = 0.03;

// --- Engines ---

/// Rotation acceleration / max rotation speed of small engines.
pub const ENGINE_ROT_ACC: f32 = 515.0;
pub const ENGINE_MAX_ROT_SPD: f32 = 230.0;

/// Rotation acceleration / max rotation speed of big engines.
pub const BIG_ENGINE_ROT_ACC: f32 = 100.0;
pub const BIG_ENGINE_MAX_ROT_SPD: f32 = 40.0;

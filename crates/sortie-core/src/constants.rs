//! Simulation constants and tuning parameters.
//!
//! Distances are world units, velocities are world units per tick, and
//! durations are ticks unless the name says otherwise.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World ---

/// Default battlefield width.
pub const WORLD_WIDTH: f64 = 8192.0;

/// Default top of the flyable area.
pub const WORLD_CEILING: f64 = 380.0;

/// Default zone (broad-phase bucket) width.
pub const ZONE_WIDTH: f64 = 512.0;

/// A unit whose box comes within this distance of a zone boundary is also
/// registered in the neighbouring zone.
pub const ZONE_EDGE_MARGIN: f64 = 16.0;

// --- Collision ---

/// How far ahead of itself a tank engages ground targets.
pub const TANK_LOOKAHEAD: f64 = 12.0;

// --- Targeting ---

/// Below this altitude a unit is "near the ground" for targeting bias.
pub const NEAR_GROUND_ALTITUDE: f64 = 40.0;

/// Near the ground, candidates further than this vertically are ignored.
pub const NEAR_GROUND_VERTICAL_DELTA: f64 = 24.0;

/// Missile launchers are visible within this horizontal range even when
/// not yet detected.
pub const LAUNCHER_SPOT_RANGE: f64 = 320.0;

/// Trigger distance forced on proximity probes in replicated sessions.
pub const NETWORK_PROBE_DISTANCE: f64 = 256.0;

/// Horizontal trigger distance for priority target scans.
pub const PRIORITY_SCAN_RANGE: f64 = 1536.0;

/// Cloud cover is only sought within this horizontal range.
pub const CLOUD_SCAN_RANGE: f64 = 768.0;

/// Radius for opportunistic light-target bombing.
pub const OPPORTUNISTIC_RADIUS: f64 = 96.0;

/// Horizontal range inside which opposing aircraft are considered for shots.
pub const AIRCRAFT_ENGAGE_RANGE: f64 = 480.0;

/// Vertical band inside which aimed fire can connect.
pub const AIM_VERTICAL_BAND: f64 = 48.0;

/// Horizontal half-window under the unit inside which a bomb can land.
pub const BOMB_WINDOW: f64 = 32.0;

/// Range at which incoming threats trigger a defensive ammo vote.
pub const THREAT_RANGE: f64 = 200.0;

/// Width of the synthetic bucket grouping infantry for the bomb ledger.
pub const INFANTRY_GROUP_WIDTH: f64 = 64.0;

// --- AI cadence and speed ---

/// Behavior-mode vector is re-rolled this often.
pub const MODE_REROLL_TICKS: u64 = 30 * TICK_RATE as u64;

/// Configured top speed of a helicopter, per axis.
pub const HELICOPTER_MAX_SPEED: f64 = 10.0;

/// Autonomous units fly at this fraction of max speed.
pub const AI_SPEED_FRACTION: f64 = 0.5;

/// Multiplier on the AI speed cap while retaliating.
pub const RETALIATION_SPEED_BOOST: f64 = 2.0;

/// Landing pad contact tolerance above the ground.
pub const LANDING_ALTITUDE: f64 = 2.0;

// --- Resources ---

/// Fuel below which a refit is always required.
pub const NEEDS_FUEL: f64 = 25.0;

/// Ammo fraction below which ammunition counts as low.
pub const LOW_AMMO_FRACTION: f64 = 0.25;

/// Energy fraction below which energy counts as low.
pub const LOW_ENERGY_FRACTION: f64 = 0.33;

/// Fuel burned per tick while airborne.
pub const FUEL_BURN_PER_TICK: f64 = 0.01;

/// Per-tick refit rates while landed.
pub const REFUEL_PER_TICK: f64 = 0.5;
pub const REPAIR_PER_TICK: f64 = 0.1;
pub const REARM_INTERVAL_TICKS: u64 = 5;

// --- Cooldowns ---

/// Window during which a second hit cannot re-roll the hunt decision.
pub const HIT_RESPONSE_TICKS: u64 = 5 * TICK_RATE as u64;

/// Retaliation mode lasts this long once triggered.
pub const RETALIATION_TICKS: u64 = 20 * TICK_RATE as u64;

/// Delay window before a retaliation missile leaves the rail.
pub const MISSILE_DELAY_MIN_TICKS: u64 = 8;
pub const MISSILE_DELAY_MAX_TICKS: u64 = 30;

/// Minimum spacing between missile launches.
pub const MISSILE_COOLDOWN_TICKS: u64 = 3 * TICK_RATE as u64;

/// Extra spacing for each additional missile against the same target.
pub const MISSILE_REPEAT_COOLDOWN_TICKS: u64 = 10 * TICK_RATE as u64;

/// Spacing between paratrooper or decoy deployments.
pub const DROP_COOLDOWN_TICKS: u64 = 4 * TICK_RATE as u64;

/// Staggered drops release at most this many at once.
pub const DROP_MAX_BATCH: u32 = 5;

/// Delay window before a staggered drop releases.
pub const DROP_DELAY_MIN_TICKS: u64 = 10;
pub const DROP_DELAY_MAX_TICKS: u64 = 45;

/// Horizontal range from a structure target at which paratroopers drop.
pub const DROP_RANGE: f64 = 64.0;

/// Grace period before a bomb-ledger entry for a live target is cleared.
pub const LEDGER_CLEAR_TICKS: u64 = 2 * TICK_RATE as u64;

// --- Projectiles ---

pub const GUNFIRE_SPEED: f64 = 18.0;
pub const GUNFIRE_LIFETIME_TICKS: u32 = 20;
pub const SMART_MISSILE_SPEED: f64 = 12.0;
pub const SMART_MISSILE_LIFETIME_TICKS: u32 = 150;
pub const DECOY_LIFETIME_TICKS: u32 = 90;
pub const BOMB_FALL_SPEED: f64 = 6.0;
pub const PARACHUTE_FALL_SPEED: f64 = 1.5;

/// Ticks between gunfire rounds while the fire intent is held.
pub const GUN_INTERVAL_TICKS: u64 = 3;

/// Ticks between bomb releases while the bomb intent is held.
pub const BOMB_INTERVAL_TICKS: u64 = 10;

// --- Flight ---

/// Altitude AI helicopters hold when they have nowhere better to be.
pub const CRUISE_ALTITUDE: f64 = 220.0;

/// Height above a ground target an AI helicopter hovers at to bomb it.
pub const BOMB_RUN_ALTITUDE: f64 = 90.0;

/// Ground vehicles roll at this speed.
pub const VEHICLE_SPEED: f64 = 1.0;

//! Simulation constants and default tuning parameters.
//!
//! These seed `CombatConfig::default()`. Gameplay code reads the
//! configuration, not these constants, except for the tick rate.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Velocities are tuned in units per reference frame at this rate.
pub const FRAME_RATE_SCALAR: f32 = 60.0;

// --- Arena ---

/// Arena width in world units.
pub const ARENA_WIDTH: f32 = 800.0;

/// Arena height in world units. y = 0 is the top edge.
pub const ARENA_HEIGHT: f32 = 600.0;

// --- Fighter body ---

pub const CHARACTER_WIDTH: f32 = 100.0;
pub const CHARACTER_HEIGHT: f32 = 200.0;

/// Downward acceleration per reference frame.
pub const GRAVITY: f32 = 0.8;

/// Initial vertical velocity of a jump (negative is up).
pub const JUMP_FORCE: f32 = -15.0;

/// Horizontal walk speed per reference frame.
pub const WALK_SPEED: f32 = 5.0;

pub const MAX_HEALTH: u32 = 100;

// --- Attacks ---

/// Lockout after a completed swing (seconds).
pub const ATTACK_COOLDOWN_SECS: f32 = 1.2;

/// Hits are rejected when centers are further apart than width × this.
pub const REACH_MULTIPLIER: f32 = 2.0;

/// How far an attack hitbox overlaps the attacker's own body.
pub const HITBOX_BODY_OVERLAP: f32 = 20.0;

/// Hit-stun duration after taking unblocked damage (seconds).
pub const HIT_STUN_SECS: f32 = 0.4;

/// Knockback speed per point of damage dealt.
pub const KNOCKBACK_PER_DAMAGE: f32 = 0.5;

pub const LIGHT_PUNCH_DAMAGE: u32 = 2;
pub const HEAVY_PUNCH_DAMAGE: u32 = 3;
pub const LIGHT_KICK_DAMAGE: u32 = 2;
pub const HEAVY_KICK_DAMAGE: u32 = 4;

pub const LIGHT_ATTACK_DURATION_SECS: f32 = 0.3;
pub const HEAVY_ATTACK_DURATION_SECS: f32 = 0.5;

// --- Collision ---

/// Minimum neutral-stance separation as a fraction of actor width.
pub const MIN_SEPARATION_FRACTION: f32 = 1.0;

/// Fraction of the overlap each actor is pushed per resolve.
pub const SEPARATION_PUSH_FACTOR: f32 = 0.7;

// --- Round ---

/// Round length (seconds).
pub const ROUND_DURATION_SECS: f32 = 99.0;

/// Spawn x of side One and side Two.
pub const SPAWN_X: [f32; 2] = [30.0, 670.0];

// --- AI difficulty ---

/// Reaction time per difficulty tier (easy, normal, hard).
pub const AI_REACTION_TIME_SECS: [f32; 3] = [0.3, 0.15, 0.05];

/// Decision interval per difficulty tier (easy, normal, hard).
pub const AI_DECISION_INTERVAL_SECS: [f32; 3] = [0.5, 0.3, 0.1];

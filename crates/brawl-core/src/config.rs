//! Static combat configuration, loaded once before a match.
//!
//! Everything here is data. A configuration is validated on load so that
//! a bad table fails at startup instead of mid-round.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{AttackKind, Difficulty};
use crate::error::ConfigError;

/// Complete tuning for a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub fighter: FighterConfig,
    /// Omitting the section uses the defaults; a partial table is an error.
    #[serde(default)]
    pub attacks: AttackTable,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub round: RoundConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

/// Body, movement and combat parameters shared by every fighter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterConfig {
    pub width: f32,
    pub height: f32,
    /// Per reference frame.
    pub gravity: f32,
    /// Per reference frame; negative is up.
    pub jump_force: f32,
    /// Per reference frame.
    pub walk_speed: f32,
    pub max_health: u32,
    pub attack_cooldown_secs: f32,
    pub hit_stun_secs: f32,
    pub knockback_per_damage: f32,
    pub reach_multiplier: f32,
    pub hitbox_body_overlap: f32,
    pub min_separation_fraction: f32,
    pub separation_push_factor: f32,
    /// Velocities are multiplied by `dt * frame_rate_scalar` when integrated.
    pub frame_rate_scalar: f32,
}

/// Fraction of an attack's duration during which hits are checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitWindow {
    pub start: f32,
    pub end: f32,
}

/// Hitbox geometry relative to the attacker's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxSpec {
    pub width: f32,
    pub height: f32,
    /// Distance from the top of the body to the top of the hitbox.
    pub offset_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackSpec {
    pub damage: u32,
    pub duration_secs: f32,
    pub hit_window: HitWindow,
    pub hitbox: HitboxSpec,
}

/// One entry per attack kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackTable {
    pub light_punch: AttackSpec,
    pub heavy_punch: AttackSpec,
    pub light_kick: AttackSpec,
    pub heavy_kick: AttackSpec,
}

/// Per-difficulty AI timing, indexed easy/normal/hard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    pub reaction_time_secs: [f32; 3],
    pub decision_interval_secs: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub duration_secs: f32,
    /// Spawn x of side One and side Two.
    pub spawn_x: [f32; 2],
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Default for FighterConfig {
    fn default() -> Self {
        Self {
            width: CHARACTER_WIDTH,
            height: CHARACTER_HEIGHT,
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            walk_speed: WALK_SPEED,
            max_health: MAX_HEALTH,
            attack_cooldown_secs: ATTACK_COOLDOWN_SECS,
            hit_stun_secs: HIT_STUN_SECS,
            knockback_per_damage: KNOCKBACK_PER_DAMAGE,
            reach_multiplier: REACH_MULTIPLIER,
            hitbox_body_overlap: HITBOX_BODY_OVERLAP,
            min_separation_fraction: MIN_SEPARATION_FRACTION,
            separation_push_factor: SEPARATION_PUSH_FACTOR,
            frame_rate_scalar: FRAME_RATE_SCALAR,
        }
    }
}

impl Default for AttackTable {
    fn default() -> Self {
        Self {
            light_punch: AttackSpec {
                damage: LIGHT_PUNCH_DAMAGE,
                duration_secs: LIGHT_ATTACK_DURATION_SECS,
                hit_window: HitWindow {
                    start: 0.2,
                    end: 0.8,
                },
                hitbox: HitboxSpec {
                    width: 60.0,
                    height: 45.0,
                    offset_y: 40.0,
                },
            },
            heavy_punch: AttackSpec {
                damage: HEAVY_PUNCH_DAMAGE,
                duration_secs: HEAVY_ATTACK_DURATION_SECS,
                hit_window: HitWindow {
                    start: 0.3,
                    end: 0.8,
                },
                hitbox: HitboxSpec {
                    width: 75.0,
                    height: 60.0,
                    offset_y: 35.0,
                },
            },
            light_kick: AttackSpec {
                damage: LIGHT_KICK_DAMAGE,
                duration_secs: LIGHT_ATTACK_DURATION_SECS,
                hit_window: HitWindow {
                    start: 0.2,
                    end: 0.8,
                },
                hitbox: HitboxSpec {
                    width: 70.0,
                    height: 40.0,
                    offset_y: 70.0,
                },
            },
            heavy_kick: AttackSpec {
                damage: HEAVY_KICK_DAMAGE,
                duration_secs: HEAVY_ATTACK_DURATION_SECS,
                hit_window: HitWindow {
                    start: 0.3,
                    end: 0.85,
                },
                hitbox: HitboxSpec {
                    width: 90.0,
                    height: 45.0,
                    offset_y: 65.0,
                },
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            reaction_time_secs: AI_REACTION_TIME_SECS,
            decision_interval_secs: AI_DECISION_INTERVAL_SECS,
        }
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration_secs: ROUND_DURATION_SECS,
            spawn_x: SPAWN_X,
        }
    }
}

impl ArenaConfig {
    /// y of a grounded actor's top edge.
    pub fn ground_y(&self, actor_height: f32) -> f32 {
        self.height - actor_height
    }
}

impl HitWindow {
    pub fn contains(&self, progress: f32) -> bool {
        progress >= self.start && progress <= self.end
    }
}

impl AttackTable {
    pub fn get(&self, kind: AttackKind) -> &AttackSpec {
        match kind {
            AttackKind::LightPunch => &self.light_punch,
            AttackKind::HeavyPunch => &self.heavy_punch,
            AttackKind::LightKick => &self.light_kick,
            AttackKind::HeavyKick => &self.heavy_kick,
        }
    }
}

impl AiConfig {
    pub fn reaction_time(&self, difficulty: Difficulty) -> f32 {
        self.reaction_time_secs[difficulty.index()]
    }

    pub fn decision_interval(&self, difficulty: Difficulty) -> f32 {
        self.decision_interval_secs[difficulty.index()]
    }
}

impl CombatConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fighter;
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        positive("fighter.width", f.width)?;
        positive("fighter.height", f.height)?;
        positive("fighter.gravity", f.gravity)?;
        positive("fighter.walk_speed", f.walk_speed)?;
        positive("fighter.reach_multiplier", f.reach_multiplier)?;
        positive("fighter.hit_stun_secs", f.hit_stun_secs)?;
        positive("fighter.min_separation_fraction", f.min_separation_fraction)?;
        positive("fighter.separation_push_factor", f.separation_push_factor)?;
        positive("fighter.frame_rate_scalar", f.frame_rate_scalar)?;
        // A jump must go up.
        positive("fighter.jump_force (magnitude)", -f.jump_force)?;
        non_negative("fighter.attack_cooldown_secs", f.attack_cooldown_secs)?;
        if f.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        if self.arena.width < f.width * 2.0 || self.arena.height < f.height {
            return Err(ConfigError::ArenaTooNarrow {
                arena_width: self.arena.width,
                actor_width: f.width,
            });
        }

        for kind in AttackKind::ALL {
            let spec = self.attacks.get(kind);
            if spec.damage == 0 {
                return Err(ConfigError::ZeroDamage { kind });
            }
            positive("attack.duration_secs", spec.duration_secs)?;
            positive("attack.hitbox.width", spec.hitbox.width)?;
            positive("attack.hitbox.height", spec.hitbox.height)?;
            let window = spec.hit_window;
            if !(0.0..=1.0).contains(&window.start)
                || !(0.0..=1.0).contains(&window.end)
                || window.start >= window.end
            {
                return Err(ConfigError::InvalidHitWindow {
                    kind,
                    start: window.start,
                    end: window.end,
                });
            }
        }

        for secs in self.ai.reaction_time_secs {
            non_negative("ai.reaction_time_secs", secs)?;
        }
        for secs in self.ai.decision_interval_secs {
            positive("ai.decision_interval_secs", secs)?;
        }

        positive("round.duration_secs", self.round.duration_secs)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN fails this check too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

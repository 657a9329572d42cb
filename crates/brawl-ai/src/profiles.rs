//! Behavior profiles and controller tuning.
//!
//! Consolidates the weights and thresholds the rule-based controller reads.
//! Profiles are derived from the behavior mode and difficulty; identity
//! preferences come from the actor's `ControlKind`.

use serde::{Deserialize, Serialize};

use brawl_core::enums::{AttackKind, BehaviorMode, ControlKind, Difficulty};

/// Decision weights, each roughly in `0.0..=1.3`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    pub aggression: f32,
    pub defense: f32,
    pub movement: f32,
}

impl BehaviorProfile {
    /// Derive weights from a behavior mode and difficulty tier.
    pub fn for_mode(mode: BehaviorMode, difficulty: Difficulty) -> Self {
        let d = difficulty.level() as f32;
        let (aggression, defense, movement) = match mode {
            BehaviorMode::Aggressive => (0.6 + 0.1 * d, 0.1 + 0.1 * d, 0.5 + 0.1 * d),
            BehaviorMode::Defensive => (0.2 + 0.1 * d, 0.5 + 0.1 * d, 0.3 + 0.1 * d),
            BehaviorMode::Balanced => (0.4 + 0.1 * d, 0.4 + 0.1 * d, 0.4 + 0.1 * d),
            BehaviorMode::Standard => (0.3 + 0.2 * d, 0.2 + 0.2 * d, 0.4 + 0.1 * d),
        };
        // Global bias toward defense and footsies over raw aggression.
        Self {
            aggression: aggression * 0.6,
            defense: defense * 1.2,
            movement: movement * 1.3,
        }
    }
}

/// Idle-movement choices, in the order of `IdentityPreference::idle_weights`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdleMove {
    Approach,
    Retreat,
    Jump,
    Wait,
}

impl IdleMove {
    pub const ALL: [IdleMove; 4] = [
        IdleMove::Approach,
        IdleMove::Retreat,
        IdleMove::Jump,
        IdleMove::Wait,
    ];
}

/// Identity-specific style: which attacks to favor and how to move when
/// not attacking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdentityPreference {
    /// Uniformly sampled; repeated entries weight a kind.
    pub attack_pool: [AttackKind; 4],
    /// Weights for approach, retreat, jump and wait.
    pub idle_weights: [f32; 4],
}

/// Style preferences for a control identity.
pub fn identity_preference(control: ControlKind) -> IdentityPreference {
    use AttackKind::*;

    match control {
        // Punches, closes in.
        ControlKind::ProfileA => IdentityPreference {
            attack_pool: [LightPunch, HeavyPunch, LightPunch, LightKick],
            idle_weights: [0.5, 0.2, 0.2, 0.1],
        },
        // Kicks, keeps distance.
        ControlKind::ProfileB => IdentityPreference {
            attack_pool: [LightKick, HeavyKick, LightKick, LightPunch],
            idle_weights: [0.3, 0.4, 0.1, 0.2],
        },
        ControlKind::Autonomous | ControlKind::Human => IdentityPreference {
            attack_pool: [LightPunch, LightKick, HeavyPunch, HeavyKick],
            idle_weights: [0.4, 0.3, 0.2, 0.1],
        },
    }
}

/// Distances (world units) and timings (seconds) for the rule-based
/// controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerTuning {
    /// Below this distance, with nobody attacking, the controller disengages
    /// every tick.
    pub close_range: f32,
    /// Repositioning ends once the distance exceeds this.
    pub release_range: f32,
    /// Closer than this, retreat instead of acting.
    pub min_safe_distance: f32,
    pub ideal_attack_distance: f32,
    pub ideal_attack_tolerance: f32,
    /// Random blocking only happens within this distance.
    pub cautious_range: f32,
    pub min_attack_interval_secs: f32,
    /// With no attack for this long, the next decision must attack.
    pub force_attack_after_secs: f32,
    pub max_consecutive_attacks: u32,
    /// Anti-overlap switches to jump-and-retreat after this many
    /// consecutive triggers.
    pub overlap_escalation_after: u32,
    pub base_attack_chance: f32,
    pub mid_range_attack_bonus: f32,
    /// Distance band that earns `mid_range_attack_bonus`.
    pub mid_range: [f32; 2],
    /// Attack chance is multiplied by this shortly after an attack.
    pub recent_attack_damping: f32,
}

impl Default for ControllerTuning {
    fn default() -> Self {
        Self {
            close_range: 100.0,
            release_range: 200.0,
            min_safe_distance: 120.0,
            ideal_attack_distance: 150.0,
            ideal_attack_tolerance: 50.0,
            cautious_range: 250.0,
            min_attack_interval_secs: 2.5,
            force_attack_after_secs: 10.0,
            max_consecutive_attacks: 2,
            overlap_escalation_after: 5,
            base_attack_chance: 0.8,
            mid_range_attack_bonus: 0.15,
            mid_range: [120.0, 220.0],
            recent_attack_damping: 0.7,
        }
    }
}

//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Horizontal facing of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Right,
    Left,
}

impl Direction {
    /// +1.0 for Right, -1.0 for Left.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Right => 1.0,
            Direction::Left => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Direction pointing from `from_x` toward `to_x`. Ties face right.
    pub fn toward(from_x: f32, to_x: f32) -> Self {
        if to_x < from_x {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// The four attack kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    LightPunch,
    HeavyPunch,
    LightKick,
    HeavyKick,
}

impl AttackKind {
    pub const ALL: [AttackKind; 4] = [
        AttackKind::LightPunch,
        AttackKind::HeavyPunch,
        AttackKind::LightKick,
        AttackKind::HeavyKick,
    ];

    pub fn is_heavy(self) -> bool {
        matches!(self, AttackKind::HeavyPunch | AttackKind::HeavyKick)
    }

    pub fn is_kick(self) -> bool {
        matches!(self, AttackKind::LightKick | AttackKind::HeavyKick)
    }
}

/// Discrete actor state. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Falling,
    Crouching,
    Attack(AttackKind),
    Blocking,
    Hit,
    /// Terminal until the round is reset.
    Defeated,
}

impl ActorState {
    pub fn is_attacking(self) -> bool {
        matches!(self, ActorState::Attack(_))
    }

    pub fn attack_kind(self) -> Option<AttackKind> {
        match self {
            ActorState::Attack(kind) => Some(kind),
            _ => None,
        }
    }

    /// Airborne-by-jump states.
    pub fn is_jumping(self) -> bool {
        matches!(self, ActorState::Jumping | ActorState::Falling)
    }

    /// States from which an attack may be started (before the airborne
    /// and cooldown checks).
    pub fn can_start_attack(self) -> bool {
        matches!(
            self,
            ActorState::Idle | ActorState::Walking | ActorState::Crouching | ActorState::Blocking
        )
    }
}

/// Which slot of the match an actor occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Who drives an actor, and which AI identity it carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    #[default]
    Human,
    /// Autonomous with no identity preference.
    Autonomous,
    /// Autonomous, prefers punches and closing in.
    ProfileA,
    /// Autonomous, prefers kicks and keeping distance.
    ProfileB,
}

impl ControlKind {
    pub fn is_autonomous(self) -> bool {
        !matches!(self, ControlKind::Human)
    }
}

/// Playable characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    #[default]
    Ryu,
    Ken,
}

/// AI difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Map a 1..=3 level to a tier, clamping out-of-range values.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Difficulty::Easy,
            2 => Difficulty::Normal,
            _ => Difficulty::Hard,
        }
    }

    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn index(self) -> usize {
        self.level() as usize - 1
    }
}

/// Weighting of a rule-based controller's behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorMode {
    Aggressive,
    Defensive,
    Balanced,
    #[default]
    Standard,
}

/// Match engine lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    RoundOver,
}

/// Result of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Winner(Side),
    Draw,
}

/// How the two sides of a match are driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Two human-driven sides.
    Versus,
    /// Side One human, side Two autonomous.
    #[default]
    VersusAi,
    /// Both sides autonomous.
    AiVsAi,
}

//! Read-only snapshots: the state contract consumed by controllers and by
//! any presentation layer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::CombatEvent;
use crate::types::SimTime;

/// One actor's visible state after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub side: Side,
    pub name: String,
    pub character: CharacterKind,
    pub control: ControlKind,
    /// Top-left corner, y grows downward.
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub is_jumping: bool,
    pub is_crouching: bool,
    pub is_blocking: bool,
    pub is_attacking: bool,
    pub health: u32,
    pub max_health: u32,
    pub state: ActorState,
    pub direction: Direction,
    /// Seconds until another attack may start.
    pub attack_cooldown: f32,
}

impl ActorSnapshot {
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    /// Horizontal distance between the two actors' x coordinates.
    pub fn distance_to(&self, other: &ActorSnapshot) -> f32 {
        (self.x - other.x).abs()
    }

    /// Direction from this actor toward `other`.
    pub fn direction_to(&self, other: &ActorSnapshot) -> Direction {
        Direction::toward(self.x, other.x)
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Round clock for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub duration_secs: f32,
    pub remaining_secs: f32,
    pub over: bool,
    pub outcome: Option<RoundOutcome>,
}

/// Complete match state produced by each engine tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub round: RoundView,
    /// Indexed by `Side::index`.
    pub fighters: [ActorSnapshot; 2],
    /// Events raised during this tick, in emission order.
    pub events: Vec<CombatEvent>,
}

impl MatchSnapshot {
    pub fn fighter(&self, side: Side) -> &ActorSnapshot {
        &self.fighters[side.index()]
    }
}

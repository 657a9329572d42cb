//! Commands sent to actors and to the match engine.
//!
//! Actor commands are the whole command surface of a fighter. Illegal
//! commands are silently ignored by the actor, never rejected.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// A single actor command, issued by a player or by a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActorCommand {
    MoveLeft,
    MoveRight,
    StopMoving,
    Jump,
    Crouch,
    StandUp,
    Block,
    StopBlocking,
    Attack { kind: AttackKind },
}

impl ActorCommand {
    /// Walk in the given direction.
    pub fn walk(direction: Direction) -> Self {
        match direction {
            Direction::Left => ActorCommand::MoveLeft,
            Direction::Right => ActorCommand::MoveRight,
        }
    }

    pub fn attack(kind: AttackKind) -> Self {
        ActorCommand::Attack { kind }
    }

    pub fn is_attack(&self) -> bool {
        matches!(self, ActorCommand::Attack { .. })
    }
}

/// Commands processed by the match engine at the next tick boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineCommand {
    /// Forward a command to one actor.
    Actor { side: Side, command: ActorCommand },
    /// Freeze the simulation clock.
    Pause,
    /// Resume after a pause.
    Resume,
}

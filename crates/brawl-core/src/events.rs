//! Discrete combat events for presentation collaborators (effects, audio,
//! damage numbers). The core only emits them; it never consumes them.

use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A swing began.
    AttackStarted { side: Side, kind: AttackKind },
    /// A swing connected.
    Hit {
        attacker: Side,
        kind: AttackKind,
        damage: u32,
        defender_health: u32,
    },
    /// A swing would have connected but the defender was blocking.
    Blocked { attacker: Side, kind: AttackKind },
    /// An actor's health reached zero.
    KnockedOut { side: Side },
    /// The round resolved.
    RoundOver { outcome: RoundOutcome },
}

//! Static character roster.
//!
//! Geometry and damage come from the shared attack table; a character only
//! carries what differs per fighter.

use crate::enums::{AttackKind, CharacterKind};

/// Per-character data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterProfile {
    pub name: &'static str,
    /// Extra forward reach per attack kind, indexed like `AttackKind::ALL`.
    pub reach_bonus: [f32; 4],
}

impl CharacterProfile {
    pub fn reach_bonus(&self, kind: AttackKind) -> f32 {
        let index = match kind {
            AttackKind::LightPunch => 0,
            AttackKind::HeavyPunch => 1,
            AttackKind::LightKick => 2,
            AttackKind::HeavyKick => 3,
        };
        self.reach_bonus[index]
    }
}

/// Look up the roster entry for a character.
pub fn character_profile(kind: CharacterKind) -> CharacterProfile {
    match kind {
        CharacterKind::Ryu => CharacterProfile {
            name: "Ryu",
            // Heavy punch lunges further than the shared hitbox.
            reach_bonus: [0.0, 10.0, 0.0, 0.0],
        },
        CharacterKind::Ken => CharacterProfile {
            name: "Ken",
            reach_bonus: [0.0; 4],
        },
    }
}

impl CharacterKind {
    pub fn profile(self) -> CharacterProfile {
        character_profile(self)
    }

    pub fn display_name(self) -> &'static str {
        character_profile(self).name
    }
}

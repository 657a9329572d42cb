//! Combat simulation for brawl.
//!
//! Owns both actors, steps physics, attacks and separation at a fixed tick
//! rate, drives autonomous controllers, and produces `MatchSnapshot`s for
//! whatever presents the match.

pub mod actor;
pub mod attack;
pub mod collision;
pub mod engine;
pub mod physics;
pub mod round;

pub use brawl_core as core;
pub use actor::{Actor, ActorSpawn, AttackSession};
pub use engine::{MatchEngine, MatchSetup, SideSetup};
pub use round::MatchRound;

#[cfg(test)]
mod tests;

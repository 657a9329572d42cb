//! Core types and definitions for the brawl combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! enums, geometry, commands, events, snapshots, configuration and
//! constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod roster;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

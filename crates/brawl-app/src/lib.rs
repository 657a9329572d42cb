//! Headless front end for the brawl combat simulation.
//!
//! Wires configuration, controllers and the match engine together and runs
//! matches from the command line.

pub mod game_loop;
pub mod launch;

pub use brawl_core as core;

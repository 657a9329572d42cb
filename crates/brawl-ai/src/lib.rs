//! Autonomous controllers for brawl.
//!
//! Rule-based, learned-policy and simple controllers behind one
//! `DecisionMaker` interface. Controllers read plain snapshots and emit
//! actor commands; they never touch the simulation directly.

pub mod controller;
pub mod decision;
pub mod policy;
pub mod profiles;
pub mod simple;

pub use brawl_core as core;
pub use decision::{Controller, ControllerSpec, DecisionMaker};

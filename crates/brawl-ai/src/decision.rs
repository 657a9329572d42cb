//! The decision interface shared by every controller variant.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use brawl_core::commands::ActorCommand;
use brawl_core::config::AiConfig;
use brawl_core::enums::{BehaviorMode, ControlKind, Difficulty};
use brawl_core::state::ActorSnapshot;

use crate::controller::AutonomousController;
use crate::policy::{PolicyController, PolicyModel};
use crate::simple::SimpleController;

/// Something that turns two snapshots into actor commands once per tick.
///
/// Implementations throttle themselves; `dt` is the tick length in seconds.
pub trait DecisionMaker {
    fn decide(
        &mut self,
        dt: f32,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        out: &mut Vec<ActorCommand>,
    );
}

/// Every controller the match engine can drive a side with.
pub enum Controller {
    Rule(AutonomousController),
    Policy(PolicyController),
    Simple(SimpleController),
}

impl Controller {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Controller::Rule(_) => "rule",
            Controller::Policy(_) => "policy",
            Controller::Simple(_) => "simple",
        }
    }
}

impl DecisionMaker for Controller {
    fn decide(
        &mut self,
        dt: f32,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        out: &mut Vec<ActorCommand>,
    ) {
        match self {
            Controller::Rule(c) => c.decide(dt, me, opponent, out),
            Controller::Policy(c) => c.decide(dt, me, opponent, out),
            Controller::Simple(c) => c.decide(dt, me, opponent, out),
        }
    }
}

/// How to build a side's controller once the match seed is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControllerSpec {
    Rule {
        mode: BehaviorMode,
    },
    /// A learned policy. Without a model every decision falls back to a
    /// rule-based controller playing `mode`.
    Policy {
        mode: BehaviorMode,
        #[serde(skip)]
        model: Option<Arc<dyn PolicyModel>>,
    },
    Simple,
}

impl ControllerSpec {
    pub fn build(
        &self,
        control: ControlKind,
        difficulty: Difficulty,
        ai: &AiConfig,
        seed: u64,
    ) -> Controller {
        match self {
            ControllerSpec::Rule { mode } => Controller::Rule(AutonomousController::new(
                control, *mode, difficulty, ai, seed,
            )),
            ControllerSpec::Policy { mode, model } => {
                let fallback = AutonomousController::new(
                    control,
                    *mode,
                    difficulty,
                    ai,
                    seed.wrapping_add(1),
                );
                Controller::Policy(PolicyController::new(model.clone(), fallback, seed))
            }
            ControllerSpec::Simple => Controller::Simple(SimpleController::new(seed)),
        }
    }
}

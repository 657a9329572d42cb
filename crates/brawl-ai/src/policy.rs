//! Learned-policy controller.
//!
//! A `PolicyModel` maps a fixed feature vector to action probabilities.
//! `PolicyController` layers strategy adjustments, combos and per-action
//! cooldowns on top of the raw model output. With no model it hands every
//! decision to a rule-based `AutonomousController`.

use std::collections::VecDeque;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use brawl_core::commands::ActorCommand;
use brawl_core::constants::{ARENA_HEIGHT, ARENA_WIDTH};
use brawl_core::enums::AttackKind;
use brawl_core::state::ActorSnapshot;

use crate::controller::AutonomousController;
use crate::decision::DecisionMaker;

pub const FEATURE_COUNT: usize = 10;
pub const ACTION_COUNT: usize = 10;

/// Seconds between policy decisions.
pub const POLICY_DECISION_INTERVAL_SECS: f32 = 0.2;

/// Only this many of the most likely actions are tried per decision.
const TOP_ACTIONS: usize = 3;

/// A combo in progress is dropped after this long without a step.
const COMBO_TIMEOUT_SECS: f32 = 1.0;

const COMBO_START_RANGE: f32 = 150.0;
const COMBO_START_CHANCE: f32 = 0.3;

/// Strategy weights are capped so a long low-health stretch cannot swamp
/// the model output.
const MAX_STRATEGY_WEIGHT: f32 = 3.0;

#[derive(Debug)]
pub enum PolicyError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// A weight or bias array has the wrong length.
    Shape {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// A weight or bias is NaN or infinite.
    NonFinite,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read policy weights: {err}"),
            Self::Parse(err) => write!(f, "failed to parse policy weights: {err}"),
            Self::Shape {
                what,
                expected,
                got,
            } => write!(f, "policy {what} has length {got}, expected {expected}"),
            Self::NonFinite => write!(f, "policy weights must be finite"),
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PolicyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// The ten policy outputs, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyAction {
    Idle,
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    Block,
    LightPunch,
    HeavyPunch,
    LightKick,
    HeavyKick,
}

impl PolicyAction {
    pub const ALL: [PolicyAction; ACTION_COUNT] = [
        PolicyAction::Idle,
        PolicyAction::MoveLeft,
        PolicyAction::MoveRight,
        PolicyAction::Jump,
        PolicyAction::Crouch,
        PolicyAction::Block,
        PolicyAction::LightPunch,
        PolicyAction::HeavyPunch,
        PolicyAction::LightKick,
        PolicyAction::HeavyKick,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn attack_kind(self) -> Option<AttackKind> {
        match self {
            PolicyAction::LightPunch => Some(AttackKind::LightPunch),
            PolicyAction::HeavyPunch => Some(AttackKind::HeavyPunch),
            PolicyAction::LightKick => Some(AttackKind::LightKick),
            PolicyAction::HeavyKick => Some(AttackKind::HeavyKick),
            _ => None,
        }
    }

    fn category(self) -> Option<Category> {
        match self {
            PolicyAction::Idle => None,
            PolicyAction::MoveLeft | PolicyAction::MoveRight => Some(Category::Move),
            PolicyAction::Jump => Some(Category::Jump),
            PolicyAction::Crouch => Some(Category::Crouch),
            PolicyAction::Block => Some(Category::Block),
            _ => Some(Category::Attack),
        }
    }

    /// Cooldown started on this action's category when it runs.
    fn cooldown_secs(self) -> f32 {
        match self {
            PolicyAction::Idle => 0.0,
            PolicyAction::MoveLeft | PolicyAction::MoveRight => 0.1,
            PolicyAction::Jump => 1.0,
            PolicyAction::Crouch | PolicyAction::Block => 0.5,
            PolicyAction::LightPunch | PolicyAction::LightKick => 0.5,
            PolicyAction::HeavyPunch | PolicyAction::HeavyKick => 0.7,
        }
    }
}

/// Cooldown buckets. All attacks share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Move,
    Jump,
    Crouch,
    Block,
    Attack,
}

impl Category {
    fn index(self) -> usize {
        self as usize
    }
}

/// One step of a scripted combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComboStep {
    Attack(AttackKind),
    Jump,
    Approach,
}

pub const COMBOS: [&[ComboStep]; 4] = [
    &[
        ComboStep::Attack(AttackKind::LightPunch),
        ComboStep::Attack(AttackKind::LightPunch),
        ComboStep::Attack(AttackKind::HeavyPunch),
    ],
    &[
        ComboStep::Attack(AttackKind::LightKick),
        ComboStep::Attack(AttackKind::HeavyKick),
    ],
    &[ComboStep::Jump, ComboStep::Attack(AttackKind::HeavyKick)],
    &[
        ComboStep::Approach,
        ComboStep::Attack(AttackKind::LightPunch),
        ComboStep::Attack(AttackKind::LightKick),
    ],
];

/// A model producing action probabilities from the feature vector.
pub trait PolicyModel: fmt::Debug + Send + Sync {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> [f32; ACTION_COUNT];
}

/// Single dense layer followed by softmax.
///
/// JSON form: `{"weights": [[f32; 10]; 10], "bias": [f32; 10]}`, one weight
/// row per action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LinearPolicy {
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let policy: LinearPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.weights.len() != ACTION_COUNT {
            return Err(PolicyError::Shape {
                what: "weights",
                expected: ACTION_COUNT,
                got: self.weights.len(),
            });
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != FEATURE_COUNT) {
            return Err(PolicyError::Shape {
                what: "weight row",
                expected: FEATURE_COUNT,
                got: row.len(),
            });
        }
        if self.bias.len() != ACTION_COUNT {
            return Err(PolicyError::Shape {
                what: "bias",
                expected: ACTION_COUNT,
                got: self.bias.len(),
            });
        }
        let finite = self
            .weights
            .iter()
            .flatten()
            .chain(self.bias.iter())
            .all(|w| w.is_finite());
        if !finite {
            return Err(PolicyError::NonFinite);
        }
        Ok(())
    }
}

impl PolicyModel for LinearPolicy {
    fn predict(&self, features: &[f32; FEATURE_COUNT]) -> [f32; ACTION_COUNT] {
        let mut logits = [0.0f32; ACTION_COUNT];
        for (i, logit) in logits.iter_mut().enumerate() {
            let row = self.weights.get(i).map(Vec::as_slice).unwrap_or(&[]);
            let dot: f32 = row.iter().zip(features).map(|(w, x)| w * x).sum();
            *logit = dot + self.bias.get(i).copied().unwrap_or(0.0);
        }
        softmax(&logits)
    }
}

fn softmax(logits: &[f32; ACTION_COUNT]) -> [f32; ACTION_COUNT] {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut out = logits.map(|l| (l - max).exp());
    let total: f32 = out.iter().sum();
    if total > 0.0 {
        for p in &mut out {
            *p /= total;
        }
    }
    out
}

/// Model input for `me` facing `opponent`, normalized to roughly `0..=1`.
pub fn features(me: &ActorSnapshot, opponent: &ActorSnapshot) -> [f32; FEATURE_COUNT] {
    let flag = |b: bool| -> f32 { if b { 1.0 } else { 0.0 } };
    [
        me.x / ARENA_WIDTH,
        me.y / ARENA_HEIGHT,
        me.health_fraction(),
        opponent.x / ARENA_WIDTH,
        opponent.y / ARENA_HEIGHT,
        opponent.health_fraction(),
        flag(opponent.is_attacking),
        flag(me.is_blocking),
        (opponent.x - me.x).abs() / ARENA_WIDTH,
        (opponent.y - me.y).abs() / ARENA_HEIGHT,
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyWeights {
    pub aggressive: f32,
    pub defensive: f32,
    pub reactive: f32,
    pub unpredictable: f32,
}

impl Default for StrategyWeights {
    fn default() -> Self {
        Self {
            aggressive: 0.5,
            defensive: 0.3,
            reactive: 0.2,
            unpredictable: 0.1,
        }
    }
}

pub struct PolicyController {
    model: Option<Arc<dyn PolicyModel>>,
    fallback: AutonomousController,
    warned: bool,
    rng: ChaCha8Rng,
    clock: f64,
    last_decision_at: f64,
    cooldowns: [f32; 5],
    combo: VecDeque<ComboStep>,
    combo_timer: f32,
    strategy: StrategyWeights,
    /// How often each opponent attack kind has been seen, by `AttackKind::ALL`
    /// order.
    observed_attacks: [u32; 4],
    last_action: Option<PolicyAction>,
}

impl PolicyController {
    /// `fallback` drives the side whenever no model is loaded.
    pub fn new(
        model: Option<Arc<dyn PolicyModel>>,
        fallback: AutonomousController,
        seed: u64,
    ) -> Self {
        Self {
            model,
            fallback,
            warned: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            last_decision_at: 0.0,
            cooldowns: [0.0; 5],
            combo: VecDeque::new(),
            combo_timer: 0.0,
            strategy: StrategyWeights::default(),
            observed_attacks: [0; 4],
            last_action: None,
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn fallback(&self) -> &AutonomousController {
        &self.fallback
    }

    pub fn strategy(&self) -> &StrategyWeights {
        &self.strategy
    }

    /// Remaining combo steps.
    pub fn combo(&self) -> impl Iterator<Item = &ComboStep> {
        self.combo.iter()
    }

    pub fn last_action(&self) -> Option<PolicyAction> {
        self.last_action
    }

    fn cooldown(&self, category: Category) -> f32 {
        self.cooldowns[category.index()]
    }

    fn step(&mut self, dt: f32, me: &ActorSnapshot, opponent: &ActorSnapshot, out: &mut Vec<ActorCommand>) {
        let Some(model) = self.model.clone() else {
            if !self.warned {
                warn!("no policy model loaded, using the rule-based controller");
                self.warned = true;
            }
            self.fallback.decide(dt, me, opponent, out);
            return;
        };

        self.clock += dt as f64;
        if self.clock - self.last_decision_at < POLICY_DECISION_INTERVAL_SECS as f64 {
            return;
        }
        self.last_decision_at = self.clock;

        for cd in &mut self.cooldowns {
            *cd = (*cd - POLICY_DECISION_INTERVAL_SECS).max(0.0);
        }
        self.combo_timer += POLICY_DECISION_INTERVAL_SECS;
        if self.combo_timer > COMBO_TIMEOUT_SECS {
            self.combo.clear();
        }
        if let Some(kind) = opponent.state.attack_kind() {
            let index = AttackKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
            self.observed_attacks[index] += 1;
        }

        let distance = me.distance_to(opponent);
        let raw = model.predict(&features(me, opponent));
        let probs = self.adjust(raw, me, opponent, distance);

        if let Some(&step) = self.combo.front() {
            if self.combo_timer < COMBO_TIMEOUT_SECS && self.run_combo_step(step, me, opponent, out) {
                self.combo.pop_front();
                self.combo_timer = 0.0;
                return;
            }
        }

        if self.combo.is_empty()
            && distance < COMBO_START_RANGE
            && self.rng.gen::<f32>() < COMBO_START_CHANCE
        {
            let combo = COMBOS[self.rng.gen_range(0..COMBOS.len())];
            self.combo = combo.iter().copied().collect();
            self.combo_timer = 0.0;
            debug!(?combo, "starting combo");
            if let Some(step) = self.combo.pop_front() {
                if self.run_combo_step(step, me, opponent, out) {
                    return;
                }
            }
        }

        let mut order: Vec<usize> = (0..ACTION_COUNT).collect();
        order.sort_by(|a, b| probs[*b].total_cmp(&probs[*a]));
        for index in order.into_iter().take(TOP_ACTIONS) {
            if self.try_action(PolicyAction::ALL[index], me, out) {
                break;
            }
        }
    }

    /// Reweight raw model output by the match situation, then normalize.
    fn adjust(
        &mut self,
        mut probs: [f32; ACTION_COUNT],
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        distance: f32,
    ) -> [f32; ACTION_COUNT] {
        if opponent.health_fraction() < 0.3 {
            self.strategy.aggressive = (self.strategy.aggressive + 0.2).min(MAX_STRATEGY_WEIGHT);
        }
        if me.health_fraction() < 0.3 {
            self.strategy.defensive = (self.strategy.defensive + 0.2).min(MAX_STRATEGY_WEIGHT);
        }

        let block = PolicyAction::Block.index();
        if opponent.is_attacking && distance < 150.0 {
            probs[block] *= 1.0 + self.strategy.defensive * 2.0;
        }

        if distance > 200.0 {
            let toward = if me.x > opponent.x {
                PolicyAction::MoveLeft
            } else {
                PolicyAction::MoveRight
            };
            probs[toward.index()] *= 1.5;
            probs[PolicyAction::Jump.index()] *= 1.3;
        } else if distance < 100.0 {
            for action in PolicyAction::ALL.iter().filter(|a| a.attack_kind().is_some()) {
                probs[action.index()] *= 1.0 + self.strategy.aggressive;
            }
        }

        if self.rng.gen::<f32>() < self.strategy.unpredictable {
            let pick = self.rng.gen_range(0..ACTION_COUNT);
            probs[pick] *= 1.5;
        }

        if self.observed_attacks.iter().any(|n| *n > 0) {
            probs[block] *= 1.2;
        }

        let total: f32 = probs.iter().sum();
        if total > 0.0 {
            for p in &mut probs {
                *p /= total;
            }
        }
        probs
    }

    fn try_action(&mut self, action: PolicyAction, me: &ActorSnapshot, out: &mut Vec<ActorCommand>) -> bool {
        let category = action.category();
        if let Some(category) = category {
            if self.cooldown(category) > 0.0 {
                return false;
            }
        }

        self.release_stance(me, Some(action), out);
        let command = match action {
            PolicyAction::Idle => ActorCommand::StopMoving,
            PolicyAction::MoveLeft => ActorCommand::MoveLeft,
            PolicyAction::MoveRight => ActorCommand::MoveRight,
            PolicyAction::Jump => ActorCommand::Jump,
            PolicyAction::Crouch => ActorCommand::Crouch,
            PolicyAction::Block => ActorCommand::Block,
            PolicyAction::LightPunch
            | PolicyAction::HeavyPunch
            | PolicyAction::LightKick
            | PolicyAction::HeavyKick => match action.attack_kind() {
                Some(kind) => ActorCommand::attack(kind),
                None => return false,
            },
        };
        out.push(command);
        if let Some(category) = category {
            self.cooldowns[category.index()] = action.cooldown_secs();
        }
        self.last_action = Some(action);
        true
    }

    /// Combo steps use shorter cooldowns than free actions.
    fn run_combo_step(
        &mut self,
        step: ComboStep,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        out: &mut Vec<ActorCommand>,
    ) -> bool {
        let (category, command, cooldown) = match step {
            ComboStep::Attack(kind) => (
                Category::Attack,
                ActorCommand::attack(kind),
                if kind.is_heavy() { 0.4 } else { 0.3 },
            ),
            ComboStep::Jump => (Category::Jump, ActorCommand::Jump, 0.7),
            ComboStep::Approach => (
                Category::Move,
                ActorCommand::walk(me.direction_to(opponent)),
                0.1,
            ),
        };
        if self.cooldown(category) > 0.0 {
            return false;
        }
        self.release_stance(me, None, out);
        out.push(command);
        self.cooldowns[category.index()] = cooldown;
        true
    }

    /// Crouch and block latch on the actor; leave them before acting
    /// otherwise.
    fn release_stance(
        &self,
        me: &ActorSnapshot,
        action: Option<PolicyAction>,
        out: &mut Vec<ActorCommand>,
    ) {
        if me.is_crouching && action != Some(PolicyAction::Crouch) {
            out.push(ActorCommand::StandUp);
        }
        if me.is_blocking && action != Some(PolicyAction::Block) {
            out.push(ActorCommand::StopBlocking);
        }
    }
}

impl DecisionMaker for PolicyController {
    fn decide(
        &mut self,
        dt: f32,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        out: &mut Vec<ActorCommand>,
    ) {
        self.step(dt, me, opponent, out);
    }
}

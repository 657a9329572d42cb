//! Rule-based autonomous controller.
//!
//! Runs a timed action queue against snapshot data. Each call to `decide`
//! advances the controller's own simulation clock by `dt`; nothing here
//! reads wall-clock time. Decisions are layered by priority:
//!
//! 1. emergency anti-overlap (every tick, not throttled)
//! 2. force-attack after a long attack-free stretch
//! 3. repositioning bias after repeated overlaps
//! 4. range management
//! 5. reactive defense
//! 6. attack
//! 7. idle movement or cautious blocking

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use brawl_core::commands::ActorCommand;
use brawl_core::config::AiConfig;
use brawl_core::enums::{AttackKind, BehaviorMode, ControlKind, Difficulty, Direction};
use brawl_core::state::ActorSnapshot;

use crate::decision::DecisionMaker;
use crate::profiles::{
    identity_preference, BehaviorProfile, ControllerTuning, IdentityPreference, IdleMove,
};

/// One unit of work the controller can hold for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiAction {
    Move(Direction),
    Jump,
    Block,
    Attack(AttackKind),
    /// Stand still.
    Stop,
}

/// An action with how long it stays current.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    pub action: AiAction,
    pub duration_secs: f32,
}

/// Which branch the most recent decision took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    AntiOverlap { escalated: bool },
    Reposition,
    Retreat,
    Defend,
    /// Approach to the ideal range, then attack.
    ApproachAttack { kind: AttackKind },
    Attack { kind: AttackKind, forced: bool },
    Idle(IdleMove),
    CautiousBlock,
    Observe,
}

/// Input the actor is currently holding because of this controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Held {
    Walk,
    Block,
}

pub struct AutonomousController {
    difficulty: Difficulty,
    profile: BehaviorProfile,
    preference: IdentityPreference,
    tuning: ControllerTuning,
    reaction_time: f64,
    decision_interval: f64,
    rng: ChaCha8Rng,

    clock: f64,
    last_decision_at: f64,
    current: Option<TimedAction>,
    action_started_at: f64,
    queue: VecDeque<TimedAction>,
    held: Option<Held>,

    last_attack_at: f64,
    attack_count: u32,
    overlap_counter: u32,
    repositioning: bool,
    opponent_attack_seen_at: Option<f64>,
    last_decision: Option<Decision>,
}

impl AutonomousController {
    /// Controller with the profile derived from `mode` and the identity
    /// preference of `control`.
    pub fn new(
        control: ControlKind,
        mode: BehaviorMode,
        difficulty: Difficulty,
        ai: &AiConfig,
        seed: u64,
    ) -> Self {
        Self::with_profile(
            BehaviorProfile::for_mode(mode, difficulty),
            identity_preference(control),
            ControllerTuning::default(),
            difficulty,
            ai,
            seed,
        )
    }

    pub fn with_profile(
        profile: BehaviorProfile,
        preference: IdentityPreference,
        tuning: ControllerTuning,
        difficulty: Difficulty,
        ai: &AiConfig,
        seed: u64,
    ) -> Self {
        // Start as if an attack happened exactly one interval ago, so the
        // first decision may attack but is not forced to.
        let last_attack_at = -(tuning.min_attack_interval_secs as f64);
        Self {
            difficulty,
            profile,
            preference,
            reaction_time: ai.reaction_time(difficulty) as f64,
            decision_interval: ai.decision_interval(difficulty) as f64,
            tuning,
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock: 0.0,
            last_decision_at: 0.0,
            current: None,
            action_started_at: 0.0,
            queue: VecDeque::new(),
            held: None,
            last_attack_at,
            attack_count: 0,
            overlap_counter: 0,
            repositioning: false,
            opponent_attack_seen_at: None,
            last_decision: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &BehaviorProfile {
        &self.profile
    }

    pub fn tuning(&self) -> &ControllerTuning {
        &self.tuning
    }

    /// Controller clock (seconds of simulation time seen so far).
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    pub fn current_action(&self) -> Option<TimedAction> {
        self.current
    }

    pub fn queued(&self) -> impl Iterator<Item = &TimedAction> {
        self.queue.iter()
    }

    pub fn is_repositioning(&self) -> bool {
        self.repositioning
    }

    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision
    }

    /// Pretend the last attack happened `secs_ago` seconds before now.
    pub fn set_last_attack_ago(&mut self, secs_ago: f64) {
        self.last_attack_at = self.clock - secs_ago;
    }

    /// Replace the pending queue.
    pub fn set_queue(&mut self, actions: impl IntoIterator<Item = TimedAction>) {
        self.queue = actions.into_iter().collect();
    }

    fn since_last_attack(&self) -> f64 {
        self.clock - self.last_attack_at
    }

    fn force_attack_due(&self) -> bool {
        self.since_last_attack() > self.tuning.force_attack_after_secs as f64
    }

    fn step(&mut self, dt: f32, me: &ActorSnapshot, opponent: &ActorSnapshot, out: &mut Vec<ActorCommand>) {
        self.clock += dt as f64;

        if opponent.is_attacking {
            self.opponent_attack_seen_at.get_or_insert(self.clock);
        } else {
            self.opponent_attack_seen_at = None;
        }

        if !me.is_alive() || !opponent.is_alive() {
            self.current = None;
            self.queue.clear();
            self.release(None, out);
            return;
        }

        let distance = me.distance_to(opponent);
        let away = me.direction_to(opponent).opposite();

        if distance < self.tuning.close_range && !me.is_attacking && !opponent.is_attacking {
            self.anti_overlap(away, out);
            return;
        }
        self.overlap_counter = self.overlap_counter.saturating_sub(1);
        if distance > self.tuning.release_range {
            self.repositioning = false;
        }

        let expired = self
            .current
            .is_some_and(|c| self.clock - self.action_started_at > c.duration_secs as f64);
        if expired || (self.current.is_none() && !self.queue.is_empty()) {
            let had_current = self.current.take().is_some();
            match self.next_runnable(me) {
                Some(next) => self.start(next, out),
                None if had_current => self.release(None, out),
                None => {}
            }
        }

        if self.current.is_none() && self.clock - self.last_decision_at >= self.decision_interval {
            self.make_decision(me, opponent, out);
            self.last_decision_at = self.clock;
        }
    }

    /// Cancel everything and back away. Escalates to jump-and-retreat after
    /// repeated triggers.
    fn anti_overlap(&mut self, away: Direction, out: &mut Vec<ActorCommand>) {
        self.current = None;
        self.queue.clear();
        self.overlap_counter += 1;
        self.repositioning = true;

        let escalated = self.overlap_counter > self.tuning.overlap_escalation_after;
        if escalated {
            self.start(
                TimedAction {
                    action: AiAction::Jump,
                    duration_secs: 0.5,
                },
                out,
            );
            self.enqueue(AiAction::Move(away), 0.8);
            if self.rng.gen::<f32>() < 0.4 {
                self.enqueue(AiAction::Jump, 0.5);
                self.enqueue(AiAction::Move(away), 0.5);
            }
            self.overlap_counter = 0;
            debug!(?away, "anti-overlap escalated to jump retreat");
        } else {
            self.release(Some(AiAction::Move(away)), out);
            out.push(ActorCommand::walk(away));
            self.held = Some(Held::Walk);
        }
        self.last_decision = Some(Decision::AntiOverlap { escalated });
    }

    /// Pop queued actions until one may run. Attacks are skipped while the
    /// actor is cooling down or too soon after the last attack.
    fn next_runnable(&mut self, me: &ActorSnapshot) -> Option<TimedAction> {
        let force = self.force_attack_due();
        while let Some(next) = self.queue.pop_front() {
            match next.action {
                AiAction::Attack(kind) => {
                    let too_soon =
                        self.since_last_attack() < self.tuning.min_attack_interval_secs as f64;
                    if me.attack_cooldown > 0.0 || (too_soon && !force) {
                        debug!(?kind, "skipping queued attack");
                        continue;
                    }
                    self.last_attack_at = self.clock;
                    self.attack_count += 1;
                }
                AiAction::Move(_) => self.attack_count = 0,
                _ => {}
            }
            return Some(next);
        }
        None
    }

    fn make_decision(&mut self, me: &ActorSnapshot, opponent: &ActorSnapshot, out: &mut Vec<ActorCommand>) {
        let distance = me.distance_to(opponent);
        let toward = me.direction_to(opponent);
        let away = toward.opposite();
        let since_attack = self.since_last_attack();
        let min_interval = self.tuning.min_attack_interval_secs as f64;

        let force = self.force_attack_due();
        if force {
            debug!(since_attack, "force-attack window elapsed");
        }

        if self.repositioning && !force {
            self.begin(AiAction::Move(away), 0.8, out);
            if self.rng.gen::<f32>() < 0.3 {
                self.enqueue(AiAction::Jump, 0.6);
            }
            if self.rng.gen::<f32>() < 0.2 {
                self.repositioning = false;
            }
            self.record(Decision::Reposition, distance);
            return;
        }

        if distance < self.tuning.min_safe_distance && !force {
            self.begin(AiAction::Move(away), 1.0, out);
            if self.rng.gen::<f32>() < 0.5 {
                self.enqueue(AiAction::Jump, 0.6);
            }
            self.record(Decision::Retreat, distance);
            return;
        }

        let allow_attack = me.attack_cooldown <= 0.0
            && (since_attack >= min_interval || force)
            && (self.attack_count < self.tuning.max_consecutive_attacks || force);

        let mut attack_chance = self.tuning.base_attack_chance;
        let [band_lo, band_hi] = self.tuning.mid_range;
        if (band_lo..=band_hi).contains(&distance) {
            attack_chance += self.tuning.mid_range_attack_bonus;
        }
        if since_attack < min_interval * 1.5 && !force {
            attack_chance *= self.tuning.recent_attack_damping;
        }

        let reacted = self
            .opponent_attack_seen_at
            .is_some_and(|seen| self.clock - seen >= self.reaction_time);
        if reacted
            && !force
            && distance < self.tuning.cautious_range
            && self.rng.gen::<f32>() < self.profile.defense * 1.2
        {
            self.begin(AiAction::Block, 0.7, out);
            if self.rng.gen::<f32>() < 0.7 {
                self.enqueue(AiAction::Move(away), 0.6);
            }
            self.record(Decision::Defend, distance);
            return;
        }

        if force || (allow_attack && self.rng.gen::<f32>() < attack_chance) {
            let kind = self.pick_attack();
            let off_ideal = (distance - self.tuning.ideal_attack_distance).abs()
                > self.tuning.ideal_attack_tolerance;
            if off_ideal && !force {
                self.begin(AiAction::Move(self.standoff_direction(distance, toward)), 0.5, out);
                self.enqueue(AiAction::Attack(kind), 0.4);
                self.enqueue(AiAction::Move(away), 0.6);
                self.record(Decision::ApproachAttack { kind }, distance);
            } else {
                self.begin(AiAction::Attack(kind), 0.5, out);
                self.last_attack_at = self.clock;
                self.attack_count += 1;
                self.enqueue(AiAction::Move(away), 0.7);
                self.record(Decision::Attack { kind, forced: force }, distance);
            }
            return;
        }

        if self.rng.gen::<f32>() < self.profile.movement * 1.2 {
            let choice = self.pick_idle_move();
            match choice {
                IdleMove::Approach => {
                    let secs = self.rng.gen_range(0.5..0.8);
                    self.begin(AiAction::Move(self.standoff_direction(distance, toward)), secs, out);
                    if self.rng.gen::<f32>() < 0.3 {
                        self.enqueue(AiAction::Jump, 0.5);
                    }
                }
                IdleMove::Retreat => {
                    let secs = self.rng.gen_range(0.6..1.0);
                    self.begin(AiAction::Move(away), secs, out);
                }
                IdleMove::Jump => {
                    self.begin(AiAction::Jump, 0.6, out);
                    if self.rng.gen::<f32>() < 0.7 {
                        let dir = self.random_direction();
                        self.enqueue(AiAction::Move(dir), 0.4);
                    }
                }
                IdleMove::Wait => {
                    self.begin(AiAction::Stop, 0.3, out);
                    if self.rng.gen::<f32>() < 0.5 {
                        self.enqueue(AiAction::Jump, 0.5);
                    } else {
                        let dir = self.random_direction();
                        self.enqueue(AiAction::Move(dir), 0.5);
                    }
                }
            }
            self.record(Decision::Idle(choice), distance);
        } else if distance < self.tuning.cautious_range && self.rng.gen::<f32>() < self.profile.defense {
            let secs = self.rng.gen_range(0.3..0.7);
            self.begin(AiAction::Block, secs, out);
            self.enqueue(AiAction::Move(away), 0.5);
            self.record(Decision::CautiousBlock, distance);
        } else {
            self.begin(AiAction::Stop, 0.2, out);
            self.enqueue(AiAction::Move(toward), 0.4);
            self.record(Decision::Observe, distance);
        }
    }

    fn record(&mut self, decision: Decision, distance: f32) {
        debug!(
            ?decision,
            distance,
            aggression = self.profile.aggression,
            attack_count = self.attack_count,
            "controller decision"
        );
        self.last_decision = Some(decision);
    }

    /// Toward the opponent when beyond the ideal attack distance, away when
    /// inside it.
    fn standoff_direction(&self, distance: f32, toward: Direction) -> Direction {
        if distance > self.tuning.ideal_attack_distance {
            toward
        } else {
            toward.opposite()
        }
    }

    fn pick_attack(&mut self) -> AttackKind {
        let pool = self.preference.attack_pool;
        pool[self.rng.gen_range(0..pool.len())]
    }

    fn pick_idle_move(&mut self) -> IdleMove {
        let weights = self.preference.idle_weights;
        let total: f32 = weights.iter().sum();
        let mut roll = self.rng.gen::<f32>() * total;
        for (choice, weight) in IdleMove::ALL.into_iter().zip(weights) {
            if roll < weight {
                return choice;
            }
            roll -= weight;
        }
        IdleMove::Wait
    }

    fn random_direction(&mut self) -> Direction {
        if self.rng.gen::<bool>() {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    fn enqueue(&mut self, action: AiAction, duration_secs: f32) {
        self.queue.push_back(TimedAction {
            action,
            duration_secs,
        });
    }

    fn begin(&mut self, action: AiAction, duration_secs: f32, out: &mut Vec<ActorCommand>) {
        self.start(
            TimedAction {
                action,
                duration_secs,
            },
            out,
        );
    }

    /// Make `timed` the current action and issue its commands.
    fn start(&mut self, timed: TimedAction, out: &mut Vec<ActorCommand>) {
        let was_walking = self.held == Some(Held::Walk);
        self.release(Some(timed.action), out);
        match timed.action {
            AiAction::Move(direction) => {
                out.push(ActorCommand::walk(direction));
                self.held = Some(Held::Walk);
            }
            AiAction::Jump => out.push(ActorCommand::Jump),
            AiAction::Block => {
                out.push(ActorCommand::Block);
                self.held = Some(Held::Block);
            }
            AiAction::Attack(kind) => out.push(ActorCommand::attack(kind)),
            AiAction::Stop => {
                if !was_walking {
                    out.push(ActorCommand::StopMoving);
                }
            }
        }
        self.current = Some(timed);
        self.action_started_at = self.clock;
    }

    /// Let go of held input unless `next` keeps it.
    fn release(&mut self, next: Option<AiAction>, out: &mut Vec<ActorCommand>) {
        let keep = matches!(
            (self.held, next),
            (Some(Held::Walk), Some(AiAction::Move(_) | AiAction::Jump))
                | (Some(Held::Block), Some(AiAction::Block))
        );
        if keep {
            return;
        }
        match self.held.take() {
            Some(Held::Walk) => out.push(ActorCommand::StopMoving),
            Some(Held::Block) => out.push(ActorCommand::StopBlocking),
            None => {}
        }
    }
}

impl DecisionMaker for AutonomousController {
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

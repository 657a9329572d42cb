//! Single timed round with win/draw resolution.

use tracing::info;

use brawl_core::enums::{RoundOutcome, Side};
use brawl_core::state::RoundView;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRound {
    duration_secs: f32,
    remaining_secs: f32,
    /// Simulation time at which the round started.
    started_at: f64,
    outcome: Option<RoundOutcome>,
}

impl MatchRound {
    pub fn new(duration_secs: f32, started_at: f64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            started_at,
            outcome: None,
        }
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Side> {
        match self.outcome {
            Some(RoundOutcome::Winner(side)) => Some(side),
            _ => None,
        }
    }

    /// Run the clock down. A finished round does not tick.
    pub fn advance(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }
        self.remaining_secs = (self.remaining_secs - dt).max(0.0);
    }

    /// Resolve the round from both sides' health, indexed by `Side::index`.
    ///
    /// Both down is a draw; one down loses; when the clock runs out the
    /// healthier side wins and equal health draws. Returns the outcome the
    /// first time the round ends, `None` otherwise.
    pub fn evaluate(&mut self, health: [u32; 2]) -> Option<RoundOutcome> {
        if self.is_over() {
            return None;
        }
        let [one, two] = health;
        let outcome = match (one == 0, two == 0) {
            (true, true) => RoundOutcome::Draw,
            (false, true) => RoundOutcome::Winner(Side::One),
            (true, false) => RoundOutcome::Winner(Side::Two),
            (false, false) if self.remaining_secs <= 0.0 => match one.cmp(&two) {
                std::cmp::Ordering::Greater => RoundOutcome::Winner(Side::One),
                std::cmp::Ordering::Less => RoundOutcome::Winner(Side::Two),
                std::cmp::Ordering::Equal => RoundOutcome::Draw,
            },
            (false, false) => return None,
        };
        info!(?outcome, remaining_secs = self.remaining_secs, "round over");
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            duration_secs: self.duration_secs,
            remaining_secs: self.remaining_secs,
            over: self.is_over(),
            outcome: self.outcome,
        }
    }
}

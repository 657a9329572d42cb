//! Match loop: drives a `MatchEngine` until the round resolves or the tick
//! budget runs out, either as fast as possible or paced at the tick rate.
//!
//! Every snapshot can be streamed as one JSON object per line. Combat events
//! are tallied into a `MatchSummary`.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use brawl_core::constants::TICK_RATE;
use brawl_core::enums::*;
use brawl_core::events::CombatEvent;
use brawl_core::state::MatchSnapshot;
use brawl_sim::MatchEngine;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// Stop after this many ticks even if the round is still running.
    pub max_ticks: u64,
    /// Sleep between ticks so the match plays out in real time.
    pub realtime: bool,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            // A full round plus a second of slack.
            max_ticks: 100 * TICK_RATE as u64,
            realtime: false,
        }
    }
}

/// Per-side totals over a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FighterSummary {
    pub name: String,
    pub character: CharacterKind,
    pub control: ControlKind,
    pub health: u32,
    pub max_health: u32,
    pub attacks_started: u32,
    pub hits_landed: u32,
    pub damage_dealt: u32,
    /// Opponent swings this side blocked.
    pub blocks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub ticks: u64,
    pub elapsed_secs: f64,
    /// `false` when the tick budget ran out first.
    pub finished: bool,
    pub outcome: Option<RoundOutcome>,
    pub fighters: [FighterSummary; 2],
}

impl MatchSummary {
    fn new(engine: &MatchEngine) -> Self {
        let setup = engine.setup();
        let fighter = |side: Side| {
            let actor = engine.actor(side);
            FighterSummary {
                name: actor.name().to_string(),
                character: actor.character(),
                control: actor.control(),
                health: actor.health(),
                max_health: engine.config().fighter.max_health,
                attacks_started: 0,
                hits_landed: 0,
                damage_dealt: 0,
                blocks: 0,
            }
        };
        Self {
            mode: setup.mode,
            difficulty: setup.difficulty,
            seed: setup.seed,
            ticks: 0,
            elapsed_secs: 0.0,
            finished: false,
            outcome: None,
            fighters: [fighter(Side::One), fighter(Side::Two)],
        }
    }

    fn record(&mut self, snapshot: &MatchSnapshot) {
        for event in &snapshot.events {
            match *event {
                CombatEvent::AttackStarted { side, .. } => {
                    self.fighters[side.index()].attacks_started += 1;
                }
                CombatEvent::Hit {
                    attacker, damage, ..
                } => {
                    let f = &mut self.fighters[attacker.index()];
                    f.hits_landed += 1;
                    f.damage_dealt += damage;
                }
                CombatEvent::Blocked { attacker, .. } => {
                    self.fighters[attacker.other().index()].blocks += 1;
                }
                CombatEvent::KnockedOut { .. } | CombatEvent::RoundOver { .. } => {}
            }
        }
        for (summary, actor) in self.fighters.iter_mut().zip(&snapshot.fighters) {
            summary.health = actor.health;
        }
        self.ticks = snapshot.time.tick;
        self.elapsed_secs = snapshot.time.elapsed_secs;
        self.outcome = snapshot.round.outcome;
        self.finished = snapshot.phase == GamePhase::RoundOver;
    }
}

/// Run `engine` to completion. Each snapshot is written to `snapshots` as a
/// JSON line when a writer is given.
pub fn run_match(
    engine: &mut MatchEngine,
    options: LoopOptions,
    mut snapshots: Option<&mut dyn Write>,
) -> Result<MatchSummary> {
    let mut summary = MatchSummary::new(engine);
    let mut next_tick_time = Instant::now();

    for _ in 0..options.max_ticks {
        let snapshot = engine.tick();
        summary.record(&snapshot);

        if let Some(out) = snapshots.as_mut() {
            serde_json::to_writer(&mut **out, &snapshot).context("failed to encode snapshot")?;
            writeln!(out).context("failed to write snapshot")?;
        }

        if summary.finished {
            break;
        }

        if options.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind; resync instead of bursting.
                next_tick_time = now;
            }
        }
    }

    if let Some(out) = snapshots.as_mut() {
        out.flush().context("failed to flush snapshots")?;
    }

    if summary.finished {
        info!(outcome = ?summary.outcome, ticks = summary.ticks, "match finished");
    } else {
        warn!(ticks = summary.ticks, "tick budget exhausted before the round resolved");
    }
    Ok(summary)
}

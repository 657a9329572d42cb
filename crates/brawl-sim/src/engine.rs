//! Match engine: the fixed-timestep match loop.
//!
//! `MatchEngine` owns both actors, their controllers and the round clock,
//! processes queued commands, and produces `MatchSnapshot`s. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use brawl_ai::policy::PolicyModel;
use brawl_ai::{Controller, ControllerSpec, DecisionMaker};
use brawl_core::commands::{ActorCommand, EngineCommand};
use brawl_core::config::CombatConfig;
use brawl_core::enums::*;
use brawl_core::error::ConfigError;
use brawl_core::events::CombatEvent;
use brawl_core::state::MatchSnapshot;
use brawl_core::types::SimTime;

use crate::actor::{Actor, ActorSpawn};
use crate::round::MatchRound;

/// One side of a match.
#[derive(Debug, Clone)]
pub struct SideSetup {
    pub name: String,
    pub character: CharacterKind,
    pub control: ControlKind,
    /// `None` for a side driven only by queued commands.
    pub controller: Option<ControllerSpec>,
}

/// Who fights whom, and how each side is driven.
#[derive(Debug, Clone)]
pub struct MatchSetup {
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    /// RNG seed. Same seed and setup = same match.
    pub seed: u64,
    /// Indexed by `Side::index`.
    pub sides: [SideSetup; 2],
}

impl MatchSetup {
    /// Standard controller assignment for a mode. The hardest difficulty
    /// swaps rule-based controllers for learned-policy ones.
    pub fn for_mode(mode: MatchMode, difficulty: Difficulty, seed: u64) -> Self {
        let learned = difficulty == Difficulty::Hard;
        let ai = |mode: BehaviorMode| {
            Some(if learned {
                ControllerSpec::Policy { mode, model: None }
            } else {
                ControllerSpec::Rule { mode }
            })
        };

        let sides = match mode {
            MatchMode::Versus => [
                side("Player 1", CharacterKind::Ryu, ControlKind::Human, None),
                side("Player 2", CharacterKind::Ken, ControlKind::Human, None),
            ],
            MatchMode::VersusAi => [
                side("Player", CharacterKind::Ryu, ControlKind::Human, None),
                side(
                    "CPU",
                    CharacterKind::Ken,
                    ControlKind::Autonomous,
                    ai(BehaviorMode::Balanced),
                ),
            ],
            MatchMode::AiVsAi => [
                side(
                    "AI 1",
                    CharacterKind::Ryu,
                    ControlKind::ProfileA,
                    ai(BehaviorMode::Aggressive),
                ),
                side(
                    "AI 2",
                    CharacterKind::Ken,
                    ControlKind::ProfileB,
                    ai(BehaviorMode::Defensive),
                ),
            ],
        };

        Self {
            mode,
            difficulty,
            seed,
            sides,
        }
    }

    pub fn with_characters(mut self, one: CharacterKind, two: CharacterKind) -> Self {
        self.sides[0].character = one;
        self.sides[1].character = two;
        self
    }

    /// Hand `model` to every learned-policy side.
    pub fn with_policy_model(mut self, model: Arc<dyn PolicyModel>) -> Self {
        for side in &mut self.sides {
            if let Some(ControllerSpec::Policy { model: slot, .. }) = side.controller.as_mut() {
                *slot = Some(model.clone());
            }
        }
        self
    }

    pub fn side(&self, side: Side) -> &SideSetup {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideSetup {
        &mut self.sides[side.index()]
    }
}

fn side(
    name: &str,
    character: CharacterKind,
    control: ControlKind,
    controller: Option<ControllerSpec>,
) -> SideSetup {
    SideSetup {
        name: name.to_string(),
        character,
        control,
        controller,
    }
}

/// The match engine. Owns the actors and all match state.
pub struct MatchEngine {
    config: Arc<CombatConfig>,
    setup: MatchSetup,
    actors: [Actor; 2],
    controllers: [Option<Controller>; 2],
    time: SimTime,
    phase: GamePhase,
    round: MatchRound,
    command_queue: VecDeque<EngineCommand>,
    events: Vec<CombatEvent>,
    scratch: Vec<ActorCommand>,
}

impl MatchEngine {
    /// Validate `config` and set up a fresh round.
    pub fn new(config: CombatConfig, setup: MatchSetup) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Arc::new(config);
        let actors = [Side::One, Side::Two].map(|s| spawn_actor(&config, &setup, s));
        let controllers = build_controllers(&config, &setup);
        let round = MatchRound::new(config.round.duration_secs, 0.0);

        info!(
            mode = ?setup.mode,
            difficulty = ?setup.difficulty,
            seed = setup.seed,
            one = %setup.sides[0].name,
            two = %setup.sides[1].name,
            "match created"
        );

        Ok(Self {
            config,
            setup,
            actors,
            controllers,
            time: SimTime::default(),
            phase: GamePhase::Active,
            round,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            scratch: Vec::new(),
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: EngineCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = EngineCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the match by one tick and return the resulting snapshot.
    ///
    /// Order: queued commands, controllers (side One then Two), actor One
    /// against Two, actor Two against One, round clock and resolution.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            let dt = self.time.dt();
            self.run_controllers(dt);
            self.update_actors(dt);
            self.time.advance();
            self.round.advance(dt);

            let health = [self.actors[0].health(), self.actors[1].health()];
            if let Some(outcome) = self.round.evaluate(health) {
                self.phase = GamePhase::RoundOver;
                self.events.push(CombatEvent::RoundOver { outcome });
            }
        }

        self.snapshot()
    }

    /// Start the round again with the same setup and seed.
    pub fn restart(&mut self) {
        for side in [Side::One, Side::Two] {
            let x = self.config.round.spawn_x[side.index()];
            self.actors[side.index()].reset(x);
        }
        self.controllers = build_controllers(&self.config, &self.setup);
        self.time = SimTime::default();
        self.round = MatchRound::new(self.config.round.duration_secs, 0.0);
        self.phase = GamePhase::Active;
        self.command_queue.clear();
        self.events.clear();
    }

    /// Current snapshot without advancing. Drains pending events.
    pub fn snapshot(&mut self) -> MatchSnapshot {
        MatchSnapshot {
            time: self.time,
            phase: self.phase,
            round: self.round.view(),
            fighters: [self.actors[0].snapshot(), self.actors[1].snapshot()],
            events: std::mem::take(&mut self.events),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::RoundOver
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn round(&self) -> &MatchRound {
        &self.round
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn setup(&self) -> &MatchSetup {
        &self.setup
    }

    pub fn actor(&self, side: Side) -> &Actor {
        &self.actors[side.index()]
    }

    /// Mutable actor access, for staging scenarios.
    pub fn actor_mut(&mut self, side: Side) -> &mut Actor {
        &mut self.actors[side.index()]
    }

    pub fn controller(&self, side: Side) -> Option<&Controller> {
        self.controllers[side.index()].as_ref()
    }

    pub fn controller_mut(&mut self, side: Side) -> Option<&mut Controller> {
        self.controllers[side.index()].as_mut()
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Actor { side, command } => {
                if self.phase == GamePhase::Active {
                    self.actors[side.index()].apply(command);
                }
            }
            EngineCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            EngineCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
        }
    }

    fn run_controllers(&mut self, dt: f32) {
        let snapshots = [self.actors[0].snapshot(), self.actors[1].snapshot()];
        for side in [Side::One, Side::Two] {
            let i = side.index();
            let Some(controller) = self.controllers[i].as_mut() else {
                continue;
            };
            self.scratch.clear();
            controller.decide(dt, &snapshots[i], &snapshots[side.other().index()], &mut self.scratch);
            for command in self.scratch.drain(..) {
                self.actors[i].apply(command);
            }
        }
    }

    fn update_actors(&mut self, dt: f32) {
        let [one, two] = &mut self.actors;

        one.update(dt, two);
        self.events.extend(one.drain_events());
        self.events.extend(two.drain_events());

        two.update(dt, one);
        self.events.extend(two.drain_events());
        self.events.extend(one.drain_events());
    }
}

fn spawn_actor(config: &Arc<CombatConfig>, setup: &MatchSetup, side: Side) -> Actor {
    let s = setup.side(side);
    Actor::new(
        ActorSpawn {
            side,
            name: s.name.clone(),
            character: s.character,
            control: s.control,
            x: config.round.spawn_x[side.index()],
        },
        Arc::clone(config),
    )
}

/// Each side gets its own seed derived from the match seed.
fn build_controllers(config: &CombatConfig, setup: &MatchSetup) -> [Option<Controller>; 2] {
    let mut rng = ChaCha8Rng::seed_from_u64(setup.seed);
    let seeds: [u64; 2] = [rng.gen(), rng.gen()];
    [Side::One, Side::Two].map(|side| {
        let s = setup.side(side);
        let controller = s.controller.as_ref().map(|spec| {
            spec.build(s.control, setup.difficulty, &config.ai, seeds[side.index()])
        });
        if let Some(c) = &controller {
            debug!(?side, kind = c.kind_name(), "controller attached");
        }
        controller
    })
}

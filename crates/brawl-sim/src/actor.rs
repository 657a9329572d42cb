//! Actor state machine: one combatant's kinematics, health, discrete state
//! and attack timing.
//!
//! Commands never fail. A command that is illegal in the current state is
//! ignored and leaves the actor untouched.

use std::sync::Arc;

use glam::Vec2;
use tracing::info;

use brawl_core::commands::ActorCommand;
use brawl_core::config::CombatConfig;
use brawl_core::enums::*;
use brawl_core::events::CombatEvent;
use brawl_core::roster::character_profile;
use brawl_core::state::ActorSnapshot;
use brawl_core::types::Rect;

use crate::{attack, collision, physics};

/// An attack in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackSession {
    pub kind: AttackKind,
    /// Seconds since the swing started, within `0..=duration`.
    pub timer: f32,
    pub duration: f32,
    /// Set once the swing has dealt damage. A swing hits at most once.
    pub hit_registered: bool,
    /// Set once a block against this swing has been reported.
    pub blocked_reported: bool,
    pub hitbox: Rect,
}

impl AttackSession {
    pub fn progress(&self) -> f32 {
        self.timer / self.duration
    }
}

/// Construction parameters for an actor.
#[derive(Debug, Clone)]
pub struct ActorSpawn {
    pub side: Side,
    pub name: String,
    pub character: CharacterKind,
    pub control: ControlKind,
    pub x: f32,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub(crate) side: Side,
    pub(crate) name: String,
    pub(crate) character: CharacterKind,
    pub(crate) control: ControlKind,
    pub(crate) config: Arc<CombatConfig>,
    pub(crate) pos: Vec2,
    pub(crate) vel: Vec2,
    pub(crate) facing: Direction,
    pub(crate) health: u32,
    pub(crate) state: ActorState,
    pub(crate) attack: Option<AttackSession>,
    pub(crate) attack_cooldown: f32,
    pub(crate) hit_stun: f32,
    pub(crate) events: Vec<CombatEvent>,
}

impl Actor {
    /// A fresh actor standing on the ground at `spawn.x`, facing right.
    pub fn new(spawn: ActorSpawn, config: Arc<CombatConfig>) -> Self {
        let ground = config.arena.ground_y(config.fighter.height);
        let health = config.fighter.max_health;
        Self {
            side: spawn.side,
            name: spawn.name,
            character: spawn.character,
            control: spawn.control,
            pos: Vec2::new(spawn.x, ground),
            vel: Vec2::ZERO,
            facing: Direction::Right,
            health,
            state: ActorState::Idle,
            attack: None,
            attack_cooldown: 0.0,
            hit_stun: 0.0,
            events: Vec::new(),
            config,
        }
    }

    /// Back to round-start condition at `x`.
    pub fn reset(&mut self, x: f32) {
        self.pos = Vec2::new(x, self.ground_y());
        self.vel = Vec2::ZERO;
        self.facing = Direction::Right;
        self.health = self.config.fighter.max_health;
        self.state = ActorState::Idle;
        self.attack = None;
        self.attack_cooldown = 0.0;
        self.hit_stun = 0.0;
        self.events.clear();
    }

    // --- Accessors ---

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn character(&self) -> CharacterKind {
        self.character
    }

    pub fn control(&self) -> ControlKind {
        self.control
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn is_attacking(&self) -> bool {
        self.state.is_attacking()
    }

    pub fn is_jumping(&self) -> bool {
        self.state.is_jumping()
    }

    pub fn is_crouching(&self) -> bool {
        self.state == ActorState::Crouching
    }

    pub fn is_blocking(&self) -> bool {
        self.state == ActorState::Blocking
    }

    pub fn attack_cooldown(&self) -> f32 {
        self.attack_cooldown
    }

    pub fn hit_stun(&self) -> f32 {
        self.hit_stun
    }

    pub fn attack_session(&self) -> Option<&AttackSession> {
        self.attack.as_ref()
    }

    /// Current attack hitbox. `None` unless attacking.
    pub fn hitbox(&self) -> Option<Rect> {
        self.attack.map(|s| s.hitbox)
    }

    pub fn width(&self) -> f32 {
        self.config.fighter.width
    }

    pub fn height(&self) -> f32 {
        self.config.fighter.height
    }

    /// Body rectangle in arena space.
    pub fn body(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width(), self.height())
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width() * 0.5
    }

    pub(crate) fn ground_y(&self) -> f32 {
        self.config.arena.ground_y(self.config.fighter.height)
    }

    /// On the ground and not already launched upward this tick.
    pub fn is_grounded(&self) -> bool {
        self.pos.y >= self.ground_y() && self.vel.y >= 0.0
    }

    /// Largest x that keeps the body inside the arena.
    pub(crate) fn max_x(&self) -> f32 {
        self.config.arena.width - self.width()
    }

    pub(crate) fn clamp_x(&mut self) -> bool {
        let clamped = self.pos.x.clamp(0.0, self.max_x());
        let hit_wall = clamped != self.pos.x;
        self.pos.x = clamped;
        hit_wall
    }

    /// Move the actor, e.g. to stage a scenario. The position is clamped
    /// to the arena.
    pub fn place(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y.clamp(0.0, self.ground_y()));
        self.clamp_x();
    }

    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Set health directly (clamped to max). Zero defeats the actor.
    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.config.fighter.max_health);
        if self.health == 0 && self.state != ActorState::Defeated {
            self.defeat();
        }
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            side: self.side,
            name: self.name.clone(),
            character: self.character,
            control: self.control,
            x: self.pos.x,
            y: self.pos.y,
            vx: self.vel.x,
            vy: self.vel.y,
            width: self.width(),
            height: self.height(),
            is_jumping: self.is_jumping(),
            is_crouching: self.is_crouching(),
            is_blocking: self.is_blocking(),
            is_attacking: self.is_attacking(),
            health: self.health,
            max_health: self.config.fighter.max_health,
            state: self.state,
            direction: self.facing,
            attack_cooldown: self.attack_cooldown,
        }
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Commands ---

    pub fn apply(&mut self, command: ActorCommand) {
        match command {
            ActorCommand::MoveLeft => self.move_left(),
            ActorCommand::MoveRight => self.move_right(),
            ActorCommand::StopMoving => self.stop_moving(),
            ActorCommand::Jump => self.jump(),
            ActorCommand::Crouch => self.crouch(),
            ActorCommand::StandUp => self.stand_up(),
            ActorCommand::Block => self.block(),
            ActorCommand::StopBlocking => self.stop_blocking(),
            ActorCommand::Attack { kind } => self.start_attack(kind),
        }
    }

    pub fn move_left(&mut self) {
        self.walk(Direction::Left);
    }

    pub fn move_right(&mut self) {
        self.walk(Direction::Right);
    }

    fn walk(&mut self, direction: Direction) {
        if matches!(
            self.state,
            ActorState::Defeated
                | ActorState::Hit
                | ActorState::Attack(_)
                | ActorState::Blocking
                | ActorState::Crouching
        ) {
            return;
        }
        self.vel.x = direction.sign() * self.config.fighter.walk_speed;
        self.facing = direction;
        if self.is_grounded() && matches!(self.state, ActorState::Idle | ActorState::Walking) {
            self.state = ActorState::Walking;
        }
    }

    pub fn stop_moving(&mut self) {
        if matches!(self.state, ActorState::Defeated | ActorState::Hit) {
            return;
        }
        self.vel.x = 0.0;
        if self.state == ActorState::Walking {
            self.state = ActorState::Idle;
        }
    }

    pub fn jump(&mut self) {
        let allowed = matches!(
            self.state,
            ActorState::Idle | ActorState::Walking | ActorState::Crouching | ActorState::Blocking
        );
        if !allowed || !self.is_grounded() {
            return;
        }
        self.vel.y = self.config.fighter.jump_force;
        self.state = ActorState::Jumping;
    }

    pub fn crouch(&mut self) {
        let allowed = matches!(
            self.state,
            ActorState::Idle | ActorState::Walking | ActorState::Blocking
        );
        if !allowed || !self.is_grounded() {
            return;
        }
        self.vel.x = 0.0;
        self.state = ActorState::Crouching;
    }

    pub fn stand_up(&mut self) {
        if self.state == ActorState::Crouching {
            self.state = ActorState::Idle;
        }
    }

    pub fn block(&mut self) {
        if matches!(
            self.state,
            ActorState::Defeated | ActorState::Hit | ActorState::Attack(_)
        ) {
            return;
        }
        if self.is_grounded() {
            self.vel.x = 0.0;
        }
        self.state = ActorState::Blocking;
    }

    pub fn stop_blocking(&mut self) {
        if self.state == ActorState::Blocking {
            self.state = if self.is_grounded() {
                ActorState::Idle
            } else {
                ActorState::Falling
            };
        }
    }

    pub fn light_punch(&mut self) {
        self.start_attack(AttackKind::LightPunch);
    }

    pub fn heavy_punch(&mut self) {
        self.start_attack(AttackKind::HeavyPunch);
    }

    pub fn light_kick(&mut self) {
        self.start_attack(AttackKind::LightKick);
    }

    pub fn heavy_kick(&mut self) {
        self.start_attack(AttackKind::HeavyKick);
    }

    fn start_attack(&mut self, kind: AttackKind) {
        if !self.state.can_start_attack() || !self.is_grounded() || self.attack_cooldown > 0.0 {
            return;
        }
        let spec = self.config.attacks.get(kind);
        self.vel.x = 0.0;
        self.state = ActorState::Attack(kind);
        self.attack = Some(AttackSession {
            kind,
            timer: 0.0,
            duration: spec.duration_secs,
            hit_registered: false,
            blocked_reported: false,
            hitbox: self.compute_hitbox(kind),
        });
        self.events.push(CombatEvent::AttackStarted {
            side: self.side,
            kind,
        });
    }

    pub(crate) fn compute_hitbox(&self, kind: AttackKind) -> Rect {
        let spec = self.config.attacks.get(kind);
        let bonus = character_profile(self.character).reach_bonus(kind);
        attack::hitbox(
            self.body(),
            self.facing,
            &spec.hitbox,
            self.config.fighter.hitbox_body_overlap,
            bonus,
        )
    }

    /// Apply damage unless blocking. Returns the health actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        if matches!(self.state, ActorState::Blocking | ActorState::Defeated) {
            return 0;
        }
        let before = self.health;
        self.health = self.health.saturating_sub(amount);
        self.attack = None;
        if self.health == 0 {
            self.defeat();
        } else {
            self.state = ActorState::Hit;
            self.hit_stun = self.config.fighter.hit_stun_secs;
        }
        before - self.health
    }

    fn defeat(&mut self) {
        self.state = ActorState::Defeated;
        self.attack = None;
        self.hit_stun = 0.0;
        self.vel.x = 0.0;
        info!(side = ?self.side, name = %self.name, "knocked out");
        self.events.push(CombatEvent::KnockedOut { side: self.side });
    }

    // --- Tick ---

    /// Advance one tick against `opponent`.
    ///
    /// Order: facing, physics, hit-stun, cooldown, attack timing and hit
    /// resolution, then separation from the opponent.
    pub fn update(&mut self, dt: f32, opponent: &mut Actor) {
        if self.control.is_autonomous()
            && !self.is_attacking()
            && self.state != ActorState::Defeated
        {
            self.facing = Direction::toward(self.center_x(), opponent.center_x());
        }

        physics::integrate(self, dt);

        if self.state == ActorState::Hit {
            self.hit_stun -= dt;
            if self.hit_stun <= 0.0 {
                self.hit_stun = 0.0;
                self.vel.x = 0.0;
                self.state = ActorState::Idle;
            }
        }

        if self.attack_cooldown > 0.0 {
            self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        }

        self.advance_attack(dt, opponent);

        collision::separate(self, opponent);
    }

    fn advance_attack(&mut self, dt: f32, opponent: &mut Actor) {
        let Some(kind) = self.attack.map(|s| s.kind) else {
            return;
        };
        let hitbox = self.compute_hitbox(kind);
        let finished = match self.attack.as_mut() {
            Some(session) => {
                session.timer = (session.timer + dt).min(session.duration);
                session.hitbox = hitbox;
                session.timer >= session.duration
            }
            None => return,
        };

        if finished {
            self.attack = None;
            self.state = ActorState::Idle;
            self.attack_cooldown = self.config.fighter.attack_cooldown_secs;
        } else {
            attack::resolve_swing(self, opponent);
        }
    }
}

//! Per-tick kinematics: gravity, integration and arena bounds.
//!
//! Velocities are tuned per reference frame, so every change is scaled by
//! `dt * frame_rate_scalar`.

use brawl_core::enums::ActorState;

use crate::actor::Actor;

pub(crate) fn integrate(actor: &mut Actor, dt: f32) {
    let scale = dt * actor.config.fighter.frame_rate_scalar;
    let gravity = actor.config.fighter.gravity;
    let ground = actor.ground_y();
    let max_x = actor.max_x();

    if actor.state == ActorState::Defeated {
        actor.vel.x = 0.0;
    }

    let airborne = actor.pos.y < ground || actor.vel.y < 0.0;
    if airborne {
        actor.vel.y += gravity * scale;
        if actor.state == ActorState::Jumping && actor.vel.y > 0.0 {
            actor.state = ActorState::Falling;
        }
    }

    actor.pos += actor.vel * scale;

    if actor.pos.x < 0.0 {
        actor.pos.x = 0.0;
        actor.vel.x = 0.0;
    } else if actor.pos.x > max_x {
        actor.pos.x = max_x;
        actor.vel.x = 0.0;
    }

    if actor.pos.y < 0.0 {
        actor.pos.y = 0.0;
        actor.vel.y = 0.0;
    }

    if actor.pos.y >= ground {
        actor.pos.y = ground;
        if actor.vel.y > 0.0 {
            actor.vel.y = 0.0;
        }
        if actor.state.is_jumping() {
            actor.state = ActorState::Idle;
        }
    }
}

//! Attack resolution: hitbox geometry and the per-tick hit test of a swing
//! in progress.

use tracing::debug;

use brawl_core::config::HitboxSpec;
use brawl_core::enums::Direction;
use brawl_core::events::CombatEvent;
use brawl_core::types::Rect;

use crate::actor::Actor;

/// Result of one hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingOutcome {
    /// Not attacking, already connected, or outside the hit window.
    Inactive,
    OutOfReach,
    NoOverlap,
    Blocked,
    Hit { damage: u32 },
}

/// Hitbox in front of `body`. The box overlaps the body by `body_overlap`
/// and extends `reach_bonus` further forward.
pub fn hitbox(
    body: Rect,
    facing: Direction,
    spec: &HitboxSpec,
    body_overlap: f32,
    reach_bonus: f32,
) -> Rect {
    let width = spec.width + reach_bonus;
    let y = body.min.y + spec.offset_y;
    let x = match facing {
        Direction::Right => body.max().x - body_overlap,
        Direction::Left => body.min.x - width + body_overlap,
    };
    Rect::new(x, y, width, spec.height)
}

/// Hit test for `attacker`'s current swing against `defender`.
///
/// Checked in order: hit window, reach (center distance), hitbox overlap,
/// blocking. A blocked swing stays live for the rest of its window; a
/// connecting swing is spent.
pub fn resolve_swing(attacker: &mut Actor, defender: &mut Actor) -> SwingOutcome {
    let Some(session) = attacker.attack else {
        return SwingOutcome::Inactive;
    };
    if session.hit_registered || !defender.is_alive() {
        return SwingOutcome::Inactive;
    }

    let spec = *attacker.config.attacks.get(session.kind);
    if !spec.hit_window.contains(session.progress()) {
        return SwingOutcome::Inactive;
    }

    let distance = (attacker.center_x() - defender.center_x()).abs();
    let reach = attacker.width() * attacker.config.fighter.reach_multiplier;
    if distance > reach {
        debug!(attacker = ?attacker.side, kind = ?session.kind, distance, reach, "swing out of reach");
        return SwingOutcome::OutOfReach;
    }

    if !session.hitbox.intersects(&defender.body()) {
        debug!(attacker = ?attacker.side, kind = ?session.kind, "swing hitbox missed");
        return SwingOutcome::NoOverlap;
    }

    if defender.is_blocking() {
        if !session.blocked_reported {
            if let Some(s) = attacker.attack.as_mut() {
                s.blocked_reported = true;
            }
            attacker.events.push(CombatEvent::Blocked {
                attacker: attacker.side,
                kind: session.kind,
            });
            debug!(attacker = ?attacker.side, defender = ?defender.side, kind = ?session.kind, "swing blocked");
        }
        return SwingOutcome::Blocked;
    }

    if let Some(s) = attacker.attack.as_mut() {
        s.hit_registered = true;
    }
    let damage = defender.take_damage(spec.damage);
    if damage > 0 && defender.is_alive() {
        // Knockback pushes the defender the way the attacker faces.
        defender.vel.x =
            attacker.facing.sign() * attacker.config.fighter.knockback_per_damage * damage as f32;
    }
    debug!(
        attacker = ?attacker.side,
        defender = ?defender.side,
        kind = ?session.kind,
        damage,
        defender_health = defender.health,
        "swing connected"
    );
    attacker.events.push(CombatEvent::Hit {
        attacker: attacker.side,
        kind: session.kind,
        damage,
        defender_health: defender.health,
    });
    SwingOutcome::Hit { damage }
}

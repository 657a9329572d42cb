//! Neutral-stance separation between the two actors.
//!
//! A positional constraint, solved every tick. Attacks and hit reactions
//! may overlap; only grounded actors standing in neutral are pushed apart.

use brawl_core::enums::ActorState;

use crate::actor::Actor;

fn in_neutral(actor: &Actor) -> bool {
    actor.is_grounded()
        && !actor.is_attacking()
        && !matches!(actor.state(), ActorState::Hit | ActorState::Defeated)
}

/// Push `a` and `b` apart symmetrically when they stand closer than the
/// minimum separation. Returns the distance each actor was pushed before
/// clamping, or `None` when nothing moved.
pub fn separate(a: &mut Actor, b: &mut Actor) -> Option<f32> {
    if !in_neutral(a) || !in_neutral(b) {
        return None;
    }

    let distance = (a.pos.x - b.pos.x).abs();
    let min_distance = a.width() * a.config.fighter.min_separation_fraction;
    if distance >= min_distance {
        return None;
    }

    // Direction from a to b; coincident actors split with a going right.
    let toward_b = if a.pos.x < b.pos.x { 1.0 } else { -1.0 };
    let push = (min_distance - distance) * a.config.fighter.separation_push_factor;
    a.pos.x -= toward_b * push;
    b.pos.x += toward_b * push;
    a.clamp_x();
    b.clamp_x();
    Some(push)
}

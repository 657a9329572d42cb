//! Minimal approach-and-strike controller.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use brawl_core::commands::ActorCommand;
use brawl_core::enums::AttackKind;
use brawl_core::state::ActorSnapshot;

use crate::decision::DecisionMaker;

/// Strike when closer than this, otherwise walk in.
pub const SIMPLE_STRIKE_RANGE: f32 = 100.0;

pub struct SimpleController {
    rng: ChaCha8Rng,
}

impl SimpleController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Issue this tick's commands.
    pub fn act(&mut self, me: &ActorSnapshot, opponent: &ActorSnapshot, out: &mut Vec<ActorCommand>) {
        if me.distance_to(opponent) > SIMPLE_STRIKE_RANGE {
            out.push(ActorCommand::walk(me.direction_to(opponent)));
        } else {
            out.push(ActorCommand::StopMoving);
            let kind = AttackKind::ALL[self.rng.gen_range(0..AttackKind::ALL.len())];
            out.push(ActorCommand::attack(kind));
        }
    }
}

impl DecisionMaker for SimpleController {
    fn decide(
        &mut self,
        _dt: f32,
        me: &ActorSnapshot,
        opponent: &ActorSnapshot,
        out: &mut Vec<ActorCommand>,
    ) {
        self.act(me, opponent, out);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use brawl_core::config::{CombatConfig, HitboxSpec};
    use brawl_core::constants::DT;
    use brawl_core::enums::*;
    use brawl_core::events::CombatEvent;
    use brawl_core::types::Rect;

    use crate::actor::{Actor, ActorSpawn};
    use crate::attack::{self, SwingOutcome};
    use crate::collision;
    use crate::physics;
    use crate::round::MatchRound;

    const GROUND: f32 = 400.0;

    fn fighter(side: Side, control: ControlKind, character: CharacterKind, x: f32) -> Actor {
        Actor::new(
            ActorSpawn {
                side,
                name: format!("{side:?}"),
                character,
                control,
                x,
            },
            Arc::new(CombatConfig::default()),
        )
    }

    fn human(side: Side, x: f32) -> Actor {
        fighter(side, ControlKind::Human, CharacterKind::Ken, x)
    }

    /// Put the current swing at `progress` through its duration.
    fn set_progress(actor: &mut Actor, progress: f32) {
        if let Some(session) = actor.attack.as_mut() {
            session.timer = session.duration * progress;
        }
    }

    // ---- Actor commands ----

    #[test]
    fn test_new_actor_stands_on_ground() {
        let a = human(Side::One, 30.0);
        assert_eq!(a.position().x, 30.0);
        assert_eq!(a.position().y, GROUND);
        assert!(a.is_grounded());
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(a.health(), 100);
        assert_eq!(a.facing(), Direction::Right);
    }

    #[test]
    fn test_walk_and_stop() {
        let mut a = human(Side::One, 300.0);
        a.move_left();
        assert_eq!(a.state(), ActorState::Walking);
        assert_eq!(a.velocity().x, -5.0);
        assert_eq!(a.facing(), Direction::Left);

        a.stop_moving();
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(a.velocity().x, 0.0);
    }

    #[test]
    fn test_moves_ignored_while_blocking_or_crouching() {
        let mut a = human(Side::One, 300.0);
        a.block();
        a.move_right();
        assert_eq!(a.state(), ActorState::Blocking);
        assert_eq!(a.velocity().x, 0.0);
        a.stop_blocking();
        assert_eq!(a.state(), ActorState::Idle);

        a.move_right();
        a.crouch();
        assert_eq!(a.state(), ActorState::Crouching);
        assert_eq!(a.velocity().x, 0.0);
        a.move_left();
        assert_eq!(a.velocity().x, 0.0);
        a.stand_up();
        assert_eq!(a.state(), ActorState::Idle);
    }

    #[test]
    fn test_jump_arc_lands_idle() {
        let mut a = human(Side::One, 300.0);
        a.jump();
        assert_eq!(a.state(), ActorState::Jumping);
        assert_eq!(a.velocity().y, -15.0);

        physics::integrate(&mut a, DT);
        assert!(a.position().y < GROUND);
        let vy = a.velocity().y;
        a.jump();
        assert_eq!(a.velocity().y, vy, "no double jump");

        let mut saw_falling = false;
        for _ in 0..200 {
            physics::integrate(&mut a, DT);
            saw_falling |= a.state() == ActorState::Falling;
            if a.state() == ActorState::Idle {
                break;
            }
        }
        assert!(saw_falling);
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(a.position().y, GROUND);
        assert_eq!(a.velocity().y, 0.0);
    }

    #[test]
    fn test_walls_clamp_and_stop() {
        let mut a = human(Side::One, 0.0);
        a.move_left();
        physics::integrate(&mut a, DT);
        assert_eq!(a.position().x, 0.0);
        assert_eq!(a.velocity().x, 0.0);

        let mut b = human(Side::Two, 700.0);
        b.move_right();
        physics::integrate(&mut b, DT);
        assert_eq!(b.position().x, 700.0);
        assert_eq!(b.velocity().x, 0.0);
    }

    #[test]
    fn test_attack_rejected_when_airborne() {
        let mut a = human(Side::One, 300.0);
        a.jump();
        physics::integrate(&mut a, DT);
        a.light_punch();
        assert!(!a.is_attacking());
        assert!(a.drain_events().is_empty());
    }

    #[test]
    fn test_attack_lifecycle_and_cooldown() {
        let mut a = human(Side::One, 100.0);
        let mut far = human(Side::Two, 600.0);

        a.move_right();
        a.light_punch();
        assert_eq!(a.state(), ActorState::Attack(AttackKind::LightPunch));
        assert_eq!(a.velocity().x, 0.0);
        assert_eq!(
            a.drain_events(),
            vec![CombatEvent::AttackStarted {
                side: Side::One,
                kind: AttackKind::LightPunch
            }]
        );

        // A second swing cannot interrupt the first.
        a.heavy_kick();
        assert_eq!(a.state(), ActorState::Attack(AttackKind::LightPunch));

        for _ in 0..25 {
            a.update(DT, &mut far);
        }
        assert_eq!(a.state(), ActorState::Idle);
        assert!(a.attack_session().is_none());
        assert!(a.attack_cooldown() > 0.0);

        a.light_punch();
        assert_eq!(a.state(), ActorState::Idle, "cooldown blocks the next swing");

        for _ in 0..80 {
            a.update(DT, &mut far);
        }
        assert_eq!(a.attack_cooldown(), 0.0);
        a.light_punch();
        assert!(a.is_attacking());
    }

    #[test]
    fn test_damage_hit_stun_and_recovery() {
        let mut a = human(Side::One, 100.0);
        let mut far = human(Side::Two, 600.0);

        assert_eq!(a.take_damage(4), 4);
        assert_eq!(a.health(), 96);
        assert_eq!(a.state(), ActorState::Hit);
        assert!(a.hit_stun() > 0.0);

        a.move_right();
        assert_eq!(a.velocity().x, 0.0, "no control during hit-stun");

        for _ in 0..30 {
            a.update(DT, &mut far);
        }
        assert_eq!(a.state(), ActorState::Idle);
        assert_eq!(a.hit_stun(), 0.0);
    }

    #[test]
    fn test_blocking_absorbs_damage() {
        let mut a = human(Side::One, 100.0);
        a.block();
        assert_eq!(a.take_damage(4), 0);
        assert_eq!(a.health(), 100);
        assert_eq!(a.state(), ActorState::Blocking);
    }

    #[test]
    fn test_lethal_damage_saturates_and_defeats() {
        let mut a = human(Side::One, 100.0);
        a.set_health(3);
        assert_eq!(a.take_damage(4), 3);
        assert_eq!(a.health(), 0);
        assert_eq!(a.state(), ActorState::Defeated);
        assert_eq!(
            a.drain_events(),
            vec![CombatEvent::KnockedOut { side: Side::One }]
        );

        a.move_right();
        a.jump();
        a.light_punch();
        a.block();
        assert_eq!(a.state(), ActorState::Defeated);
        assert_eq!(a.velocity(), glam::Vec2::ZERO);
        assert_eq!(a.take_damage(4), 0);
    }

    #[test]
    fn test_autonomous_actor_faces_opponent() {
        let mut a = fighter(Side::Two, ControlKind::Autonomous, CharacterKind::Ken, 500.0);
        let mut opponent = human(Side::One, 100.0);
        a.update(DT, &mut opponent);
        assert_eq!(a.facing(), Direction::Left);

        let mut h = human(Side::One, 500.0);
        let mut left = human(Side::Two, 100.0);
        h.update(DT, &mut left);
        assert_eq!(h.facing(), Direction::Right, "human facing follows input");
    }

    // ---- Hitbox geometry ----

    #[test]
    fn test_hitbox_in_front_of_body() {
        let body = Rect::new(100.0, 400.0, 100.0, 200.0);
        let spec = HitboxSpec {
            width: 60.0,
            height: 45.0,
            offset_y: 40.0,
        };
        assert_eq!(
            attack::hitbox(body, Direction::Right, &spec, 20.0, 0.0),
            Rect::new(180.0, 440.0, 60.0, 45.0)
        );
        assert_eq!(
            attack::hitbox(body, Direction::Left, &spec, 20.0, 0.0),
            Rect::new(60.0, 440.0, 60.0, 45.0)
        );
        assert_eq!(
            attack::hitbox(body, Direction::Left, &spec, 20.0, 10.0),
            Rect::new(50.0, 440.0, 70.0, 45.0)
        );
    }

    #[test]
    fn test_character_reach_bonus_widens_hitbox() {
        let ryu = fighter(Side::One, ControlKind::Human, CharacterKind::Ryu, 100.0);
        let ken = human(Side::One, 100.0);
        let ryu_box = ryu.compute_hitbox(AttackKind::HeavyPunch);
        let ken_box = ken.compute_hitbox(AttackKind::HeavyPunch);
        assert_eq!(ken_box.size.x, 75.0);
        assert_eq!(ryu_box.size.x, 85.0);
        assert_eq!(ryu_box.min.x, ken_box.min.x);
        assert_eq!(
            ryu.compute_hitbox(AttackKind::LightPunch),
            ken.compute_hitbox(AttackKind::LightPunch)
        );
    }

    // ---- Swing resolution ----

    #[test]
    fn test_swing_connects_once() {
        let mut a = human(Side::One, 100.0);
        let mut d = human(Side::Two, 200.0);
        a.light_punch();
        a.drain_events();

        set_progress(&mut a, 0.5);
        assert_eq!(
            attack::resolve_swing(&mut a, &mut d),
            SwingOutcome::Hit { damage: 2 }
        );
        assert_eq!(d.health(), 98);
        assert_eq!(d.state(), ActorState::Hit);
        assert_eq!(d.velocity().x, 1.0, "knocked back along attacker facing");
        assert_eq!(
            a.drain_events(),
            vec![CombatEvent::Hit {
                attacker: Side::One,
                kind: AttackKind::LightPunch,
                damage: 2,
                defender_health: 98,
            }]
        );

        set_progress(&mut a, 0.6);
        assert_eq!(attack::resolve_swing(&mut a, &mut d), SwingOutcome::Inactive);
        assert_eq!(d.health(), 98);
    }

    #[test]
    fn test_swing_outside_window_is_inactive() {
        let mut a = human(Side::One, 100.0);
        let mut d = human(Side::Two, 200.0);
        a.light_punch();
        set_progress(&mut a, 0.0);
        assert_eq!(attack::resolve_swing(&mut a, &mut d), SwingOutcome::Inactive);
        set_progress(&mut a, 0.95);
        assert_eq!(attack::resolve_swing(&mut a, &mut d), SwingOutcome::Inactive);
        assert_eq!(d.health(), 100);
    }

    #[test]
    fn test_swing_reach_and_overlap_rejections() {
        let mut a = human(Side::One, 100.0);
        a.light_punch();
        set_progress(&mut a, 0.5);

        let mut distant = human(Side::Two, 350.0);
        assert_eq!(
            attack::resolve_swing(&mut a, &mut distant),
            SwingOutcome::OutOfReach
        );

        let mut near = human(Side::Two, 260.0);
        assert_eq!(
            attack::resolve_swing(&mut a, &mut near),
            SwingOutcome::NoOverlap
        );
        assert_eq!(distant.health(), 100);
        assert_eq!(near.health(), 100);
    }

    #[test]
    fn test_blocked_swing_reported_once() {
        let mut a = human(Side::One, 100.0);
        let mut d = human(Side::Two, 200.0);
        d.block();
        a.light_punch();
        a.drain_events();

        set_progress(&mut a, 0.3);
        assert_eq!(attack::resolve_swing(&mut a, &mut d), SwingOutcome::Blocked);
        set_progress(&mut a, 0.4);
        assert_eq!(attack::resolve_swing(&mut a, &mut d), SwingOutcome::Blocked);

        assert_eq!(
            a.drain_events(),
            vec![CombatEvent::Blocked {
                attacker: Side::One,
                kind: AttackKind::LightPunch
            }]
        );
        assert_eq!(d.health(), 100);

        // Dropping the guard mid-window lets the same swing land.
        d.stop_blocking();
        set_progress(&mut a, 0.5);
        assert_eq!(
            attack::resolve_swing(&mut a, &mut d),
            SwingOutcome::Hit { damage: 2 }
        );
    }

    #[test]
    fn test_swing_through_update_hits_once() {
        let mut a = human(Side::One, 100.0);
        let mut d = human(Side::Two, 200.0);
        a.heavy_kick();
        for _ in 0..40 {
            a.update(DT, &mut d);
        }
        assert_eq!(d.health(), 96);
        assert_eq!(a.state(), ActorState::Idle);
    }

    #[test]
    fn test_hit_interrupts_defender_swing_without_cooldown() {
        let mut a = human(Side::One, 100.0);
        let mut d = human(Side::Two, 200.0);
        d.light_punch();
        a.light_punch();
        set_progress(&mut a, 0.5);
        attack::resolve_swing(&mut a, &mut d);
        assert!(d.attack_session().is_none());
        assert_eq!(d.state(), ActorState::Hit);
        assert_eq!(d.attack_cooldown(), 0.0);
    }

    // ---- Separation ----

    #[test]
    fn test_separation_is_symmetric() {
        let mut a = human(Side::One, 300.0);
        let mut b = human(Side::Two, 350.0);
        let push = collision::separate(&mut a, &mut b);
        assert_eq!(push, Some(35.0));
        assert_eq!(a.position().x, 265.0);
        assert_eq!(b.position().x, 385.0);
        assert_eq!(a.position().x + b.position().x, 650.0);
    }

    #[test]
    fn test_separation_skips_far_or_busy_actors() {
        let mut a = human(Side::One, 100.0);
        let mut b = human(Side::Two, 200.0);
        assert_eq!(collision::separate(&mut a, &mut b), None);

        let mut c = human(Side::One, 300.0);
        let mut d = human(Side::Two, 320.0);
        c.light_punch();
        assert_eq!(collision::separate(&mut c, &mut d), None);
        assert_eq!(d.position().x, 320.0);

        let mut e = human(Side::One, 300.0);
        let mut f = human(Side::Two, 320.0);
        f.jump();
        physics::integrate(&mut f, DT);
        assert_eq!(collision::separate(&mut e, &mut f), None);
    }

    #[test]
    fn test_separation_coincident_and_walls() {
        let mut a = human(Side::One, 300.0);
        let mut b = human(Side::Two, 300.0);
        assert_eq!(collision::separate(&mut a, &mut b), Some(70.0));
        assert_eq!(a.position().x, 370.0);
        assert_eq!(b.position().x, 230.0);

        let mut c = human(Side::One, 0.0);
        let mut d = human(Side::Two, 20.0);
        collision::separate(&mut c, &mut d);
        assert_eq!(c.position().x, 0.0);
        assert_eq!(d.position().x, 76.0);
    }

    // ---- Round ----

    #[test]
    fn test_round_knockout_outcomes() {
        let mut round = MatchRound::new(99.0, 0.0);
        assert_eq!(round.evaluate([100, 100]), None);
        assert_eq!(
            round.evaluate([40, 0]),
            Some(RoundOutcome::Winner(Side::One))
        );
        assert!(round.is_over());
        assert_eq!(round.winner(), Some(Side::One));
        assert_eq!(round.evaluate([0, 40]), None, "resolves once");

        let mut round = MatchRound::new(99.0, 0.0);
        assert_eq!(
            round.evaluate([0, 7]),
            Some(RoundOutcome::Winner(Side::Two))
        );

        let mut round = MatchRound::new(99.0, 0.0);
        assert_eq!(round.evaluate([0, 0]), Some(RoundOutcome::Draw));
        assert_eq!(round.winner(), None);
    }

    #[test]
    fn test_round_timeout_outcomes() {
        let mut round = MatchRound::new(1.0, 0.0);
        round.advance(0.5);
        assert_eq!(round.evaluate([50, 60]), None);
        round.advance(0.75);
        assert_eq!(round.remaining_secs(), 0.0);
        assert_eq!(
            round.evaluate([50, 60]),
            Some(RoundOutcome::Winner(Side::Two))
        );

        let mut round = MatchRound::new(1.0, 0.0);
        round.advance(2.0);
        assert_eq!(round.evaluate([70, 70]), Some(RoundOutcome::Draw));

        let view = round.view();
        assert!(view.over);
        assert_eq!(view.outcome, Some(RoundOutcome::Draw));
        assert_eq!(view.duration_secs, 1.0);
    }

    #[test]
    fn test_round_clock_stops_when_over() {
        let mut round = MatchRound::new(10.0, 5.0);
        round.advance(1.0);
        round.evaluate([0, 10]);
        round.advance(3.0);
        assert_eq!(round.remaining_secs(), 9.0);
        assert_eq!(round.started_at(), 5.0);
    }
}

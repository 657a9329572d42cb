//! Combat invariants exercised through the public actor API.

use std::sync::Arc;

use brawl_core::commands::ActorCommand;
use brawl_core::config::CombatConfig;
use brawl_core::enums::*;
use brawl_core::events::CombatEvent;
use brawl_sim::actor::{Actor, ActorSpawn};

fn actor(side: Side, x: f32) -> Actor {
    Actor::new(
        ActorSpawn {
            side,
            name: format!("{side:?}"),
            character: CharacterKind::Ken,
            control: ControlKind::Human,
            x,
        },
        Arc::new(CombatConfig::default()),
    )
}

/// Run `attacker`'s swing to completion against `defender` and return the
/// events it raised.
fn full_swing(attacker: &mut Actor, defender: &mut Actor, kind: AttackKind, dt: f32) -> Vec<CombatEvent> {
    attacker.apply(ActorCommand::attack(kind));
    assert!(attacker.is_attacking());
    let mut events = attacker.drain_events();
    for _ in 0..2000 {
        if !attacker.is_attacking() {
            break;
        }
        attacker.update(dt, defender);
        events.extend(attacker.drain_events());
    }
    assert!(!attacker.is_attacking(), "swing never finished");
    events
}

fn hits(events: &[CombatEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, CombatEvent::Hit { .. }))
        .count()
}

#[test]
fn health_stays_within_bounds() {
    let mut a = actor(Side::One, 100.0);
    let max = a.config().fighter.max_health;

    a.set_health(max * 5);
    assert_eq!(a.health(), max);

    for amount in [0, 1, 7, 3, 50, 200, 9] {
        a.take_damage(amount);
        assert!(a.health() <= max);
    }
    assert_eq!(a.health(), 0);
    assert_eq!(a.state(), ActorState::Defeated);
}

#[test]
fn blocking_absorbs_every_attack() {
    let mut a = actor(Side::One, 100.0);
    a.apply(ActorCommand::Block);
    for kind in AttackKind::ALL {
        let damage = a.config().attacks.get(kind).damage;
        assert_eq!(a.take_damage(damage), 0);
        assert_eq!(a.health(), 100);
        assert_eq!(a.state(), ActorState::Blocking);
    }
}

#[test]
fn single_hit_per_swing_at_any_tick_rate() {
    for dt in [1.0 / 60.0, 1.0 / 240.0] {
        for kind in AttackKind::ALL {
            let mut attacker = actor(Side::One, 100.0);
            let mut defender = actor(Side::Two, 200.0);
            let damage = attacker.config().attacks.get(kind).damage;

            let events = full_swing(&mut attacker, &mut defender, kind, dt);

            assert_eq!(hits(&events), 1, "{kind:?} at dt {dt}");
            assert_eq!(defender.health(), 100 - damage, "{kind:?} at dt {dt}");
        }
    }
}

#[test]
fn cooldown_rejects_every_attack_command() {
    let mut a = actor(Side::One, 100.0);
    let mut far = actor(Side::Two, 600.0);
    full_swing(&mut a, &mut far, AttackKind::LightPunch, 1.0 / 60.0);
    assert!(a.attack_cooldown() > 0.0);

    for kind in AttackKind::ALL {
        a.apply(ActorCommand::attack(kind));
        assert_eq!(a.state(), ActorState::Idle);
    }

    a.apply(ActorCommand::Crouch);
    for kind in AttackKind::ALL {
        a.apply(ActorCommand::attack(kind));
        assert_eq!(a.state(), ActorState::Crouching);
    }
    assert!(a.drain_events().is_empty());
}

#[test]
fn out_of_range_swings_deal_no_damage() {
    // Centers 250 apart: beyond reach.
    let mut a = actor(Side::One, 100.0);
    let mut distant = actor(Side::Two, 350.0);
    let events = full_swing(&mut a, &mut distant, AttackKind::HeavyKick, 1.0 / 60.0);
    assert_eq!(hits(&events), 0);
    assert_eq!(distant.health(), 100);

    // Within reach, but the light punch hitbox stops short of the body.
    let mut b = actor(Side::One, 100.0);
    let mut near = actor(Side::Two, 260.0);
    let events = full_swing(&mut b, &mut near, AttackKind::LightPunch, 1.0 / 60.0);
    assert_eq!(hits(&events), 0);
    assert_eq!(near.health(), 100);
}

#[test]
fn separation_moves_both_actors_equally() {
    let mut a = actor(Side::One, 300.0);
    let mut b = actor(Side::Two, 340.0);
    let min_distance = a.width() * a.config().fighter.min_separation_fraction;

    let mut distance = b.position().x - a.position().x;
    for _ in 0..10 {
        let (a0, b0) = (a.position().x, b.position().x);
        a.update(1.0 / 60.0, &mut b);
        let moved_a = a0 - a.position().x;
        let moved_b = b.position().x - b0;
        assert!((moved_a - moved_b).abs() < 1e-3);
        distance = b.position().x - a.position().x;
    }
    assert!(distance >= min_distance - 1e-3, "distance {distance}");
    assert!((a.position().x + b.position().x - 640.0).abs() < 1e-3);
}

/// Release every held input and tick until the actor is idle again.
fn recover(a: &mut Actor, opponent: &mut Actor) -> bool {
    for _ in 0..600 {
        if a.state() == ActorState::Idle {
            return true;
        }
        for command in [
            ActorCommand::StopMoving,
            ActorCommand::StandUp,
            ActorCommand::StopBlocking,
        ] {
            a.apply(command);
        }
        a.update(1.0 / 60.0, opponent);
    }
    a.state() == ActorState::Idle
}

#[test]
fn every_live_state_returns_to_idle() {
    let setups: [(&str, fn(&mut Actor)); 8] = [
        ("walking", |a| a.apply(ActorCommand::MoveRight)),
        ("jumping", |a| a.apply(ActorCommand::Jump)),
        ("falling", |a| {
            a.apply(ActorCommand::Jump);
            for _ in 0..25 {
                let mut far = actor(Side::Two, 700.0);
                a.update(1.0 / 60.0, &mut far);
            }
        }),
        ("crouching", |a| a.apply(ActorCommand::Crouch)),
        ("blocking", |a| a.apply(ActorCommand::Block)),
        ("airborne block", |a| {
            a.apply(ActorCommand::Jump);
            a.apply(ActorCommand::Block);
        }),
        ("attacking", |a| a.apply(ActorCommand::attack(AttackKind::HeavyKick))),
        ("hit", |a| {
            a.take_damage(3);
        }),
    ];

    for (name, setup) in setups {
        let mut a = actor(Side::One, 300.0);
        let mut far = actor(Side::Two, 700.0);
        setup(&mut a);
        assert_ne!(a.state(), ActorState::Idle, "{name} setup");
        assert!(recover(&mut a, &mut far), "{name} stuck in {:?}", a.state());
        assert!(a.is_grounded(), "{name}");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::commands::{ActorCommand, EngineCommand};
    use crate::config::CombatConfig;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::ConfigError;
    use crate::events::CombatEvent;
    use crate::roster::character_profile;
    use crate::types::{Rect, SimTime};

    #[test]
    fn test_actor_state_serde() {
        let mut variants = vec![
            ActorState::Idle,
            ActorState::Walking,
            ActorState::Jumping,
            ActorState::Falling,
            ActorState::Crouching,
            ActorState::Blocking,
            ActorState::Hit,
            ActorState::Defeated,
        ];
        variants.extend(AttackKind::ALL.iter().map(|k| ActorState::Attack(*k)));
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: ActorState = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_actor_command_tagged_json() {
        let cmd = ActorCommand::attack(AttackKind::HeavyKick);
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"{"type":"Attack","kind":"HeavyKick"}"#);

        let back: ActorCommand = serde_json::from_str(r#"{"type":"MoveLeft"}"#).unwrap();
        assert_eq!(back, ActorCommand::MoveLeft);
    }

    #[test]
    fn test_engine_command_serde() {
        let cmd = EngineCommand::Actor {
            side: Side::Two,
            command: ActorCommand::Block,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: EngineCommand = serde_json::from_str(&json).unwrap();
        match back {
            EngineCommand::Actor { side, command } => {
                assert_eq!(side, Side::Two);
                assert_eq!(command, ActorCommand::Block);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_combat_event_serde() {
        let events = vec![
            CombatEvent::AttackStarted {
                side: Side::One,
                kind: AttackKind::LightPunch,
            },
            CombatEvent::Hit {
                attacker: Side::One,
                kind: AttackKind::HeavyPunch,
                damage: 3,
                defender_health: 97,
            },
            CombatEvent::Blocked {
                attacker: Side::Two,
                kind: AttackKind::LightKick,
            },
            CombatEvent::KnockedOut { side: Side::Two },
            CombatEvent::RoundOver {
                outcome: RoundOutcome::Winner(Side::One),
            },
            CombatEvent::RoundOver {
                outcome: RoundOutcome::Draw,
            },
        ];
        for e in events {
            let json = serde_json::to_string(&e).unwrap();
            let back: CombatEvent = serde_json::from_str(&json).unwrap();
            assert_eq!(e, back);
        }
    }

    #[test]
    fn test_difficulty_from_level_clamps() {
        assert_eq!(Difficulty::from_level(0), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(1), Difficulty::Easy);
        assert_eq!(Difficulty::from_level(2), Difficulty::Normal);
        assert_eq!(Difficulty::from_level(3), Difficulty::Hard);
        assert_eq!(Difficulty::from_level(9), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.index(), 2);
    }

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(100.0, 300.0), Direction::Right);
        assert_eq!(Direction::toward(300.0, 100.0), Direction::Left);
        assert_eq!(Direction::Left.sign(), -1.0);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_state_predicates() {
        assert!(ActorState::Attack(AttackKind::LightKick).is_attacking());
        assert!(!ActorState::Blocking.is_attacking());
        assert!(ActorState::Falling.is_jumping());
        assert!(ActorState::Blocking.can_start_attack());
        assert!(!ActorState::Hit.can_start_attack());
        assert!(!ActorState::Jumping.can_start_attack());
        assert!(!ActorState::Defeated.can_start_attack());
    }

    #[test]
    fn test_rect_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let touching = Rect::new(100.0, 0.0, 50.0, 50.0);
        let overlapping = Rect::new(99.0, 10.0, 50.0, 50.0);
        let below = Rect::new(10.0, 100.0, 50.0, 50.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
        assert!(!a.intersects(&below));
        assert_eq!(a.center().x, 50.0);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        for _ in 0..TICK_RATE {
            t.advance();
        }
        assert_eq!(t.tick, TICK_RATE as u64);
        assert!((t.elapsed_secs - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = CombatConfig::default();
        config.validate().unwrap();
        assert_eq!(config.attacks.get(AttackKind::HeavyKick).damage, 4);
        assert_eq!(config.arena.ground_y(config.fighter.height), 400.0);
        assert_eq!(config.ai.decision_interval(Difficulty::Normal), 0.3);
        assert_eq!(config.ai.reaction_time(Difficulty::Hard), 0.05);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CombatConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CombatConfig::default());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let mut config = CombatConfig::default();
        config.round.duration_secs = 60.0;
        config.attacks.light_punch.damage = 5;
        let json = config.to_json_pretty().unwrap();
        let back = CombatConfig::from_json_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_missing_attack_entry_is_parse_error() {
        let mut value = serde_json::to_value(CombatConfig::default()).unwrap();
        value["attacks"]
            .as_object_mut()
            .unwrap()
            .remove("heavy_kick");
        let err = CombatConfig::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
    }

    #[test]
    fn test_invalid_hit_window_rejected() {
        let mut config = CombatConfig::default();
        config.attacks.light_kick.hit_window.start = 0.9;
        config.attacks.light_kick.hit_window.end = 0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidHitWindow {
                kind: AttackKind::LightKick,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_damage_rejected() {
        let mut config = CombatConfig::default();
        config.attacks.heavy_punch.damage = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDamage {
                kind: AttackKind::HeavyPunch
            })
        ));
    }

    #[test]
    fn test_non_positive_values_rejected() {
        let mut config = CombatConfig::default();
        config.attacks.heavy_punch.duration_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));

        let mut config = CombatConfig::default();
        config.round.duration_secs = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));

        let mut config = CombatConfig::default();
        config.ai.decision_interval_secs[1] = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { .. })
        ));

        let mut config = CombatConfig::default();
        config.fighter.max_health = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroHealth)));
    }

    #[test]
    fn test_validate_rejects_negative_or_nan_timers() {
        let mut config = CombatConfig::default();
        config.fighter.attack_cooldown_secs = 0.0;
        config.ai.reaction_time_secs[2] = 0.0;
        assert!(config.validate().is_ok());

        let mut config = CombatConfig::default();
        config.fighter.attack_cooldown_secs = -0.5;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative {
                field: "fighter.attack_cooldown_secs",
                ..
            }
        ));
        assert!(err.to_string().contains("zero or positive"));

        let mut config = CombatConfig::default();
        config.ai.reaction_time_secs[0] = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "ai.reaction_time_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_narrow_arena_rejected() {
        let mut config = CombatConfig::default();
        config.arena.width = 150.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ArenaTooNarrow { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut config = CombatConfig::default();
        config.fighter.walk_speed = 7.5;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json_pretty().unwrap().as_bytes())
            .unwrap();

        let loaded = CombatConfig::load(file.path()).unwrap();
        assert_eq!(loaded.fighter.walk_speed, 7.5);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CombatConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_roster_reach_bonus() {
        let ryu = character_profile(CharacterKind::Ryu);
        assert_eq!(ryu.reach_bonus(AttackKind::HeavyPunch), 10.0);
        assert_eq!(ryu.reach_bonus(AttackKind::LightPunch), 0.0);
        assert_eq!(CharacterKind::Ken.display_name(), "Ken");
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::commands::SimCommand;
    use crate::config::SimConfig;
    use crate::enums::*;
    use crate::error::SimError;
    use crate::events::SimEvent;
    use crate::state::Snapshot;
    use crate::types::{Kinematics, Rect, SimTime, UnitId};

    /// Every unit type token parses back to the same type.
    #[test]
    fn test_unit_type_tokens() {
        for t in UnitType::ALL {
            assert_eq!(UnitType::from_str(t.token()).unwrap(), t);
            assert_eq!(t.to_string(), t.token());
        }
    }

    #[test]
    fn test_unknown_unit_type_token_is_an_error() {
        let err = UnitType::from_str("zeppelin").unwrap_err();
        assert!(matches!(err, SimError::UnknownUnitType(ref t) if t == "zeppelin"));
        assert!(err.to_string().contains("zeppelin"));
    }

    #[test]
    fn test_bomb_limits() {
        assert_eq!(UnitType::Tank.bomb_limit(), Some(3));
        assert_eq!(UnitType::Helicopter.bomb_limit(), Some(3));
        assert_eq!(UnitType::Turret.bomb_limit(), None);
        assert_eq!(UnitType::Van.bomb_limit(), Some(1));
        assert_eq!(UnitType::Infantry.bomb_limit(), Some(1));
    }

    #[test]
    fn test_type_traits() {
        assert!(UnitType::Bunker.is_blocking());
        assert!(!UnitType::Turret.is_blocking());
        assert!(UnitType::Tank.is_ground_bound());
        assert!(!UnitType::Helicopter.is_ground_bound());
        assert!(UnitType::Gunfire.is_single_use());
        assert!(!UnitType::Decoy.is_single_use());
        assert_eq!(UnitType::Engineer.rng_stream(), RngStream::Infantry);
    }

    #[test]
    fn test_unit_type_serde_is_snake_case() {
        let json = serde_json::to_string(&UnitType::SuperBunker).unwrap();
        assert_eq!(json, "\"super_bunker\"");
    }

    #[test]
    fn test_command_serde() {
        let commands = vec![
            SimCommand::StartBattle,
            SimCommand::SpawnUnit {
                unit_type: UnitType::Tank,
                is_enemy: true,
                x: 100.0,
                y: 0.0,
                ai: false,
            },
            SimCommand::DestroyUnit { unit: UnitId(4) },
            SimCommand::MoveUnit {
                unit: UnitId(1),
                vx: 3.0,
                vy: -1.0,
                flipped: true,
            },
            SimCommand::SetNetworkMode { enabled: true },
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: SimCommand = serde_json::from_str(&json).unwrap();
            assert_eq!(*cmd, back);
        }
    }

    #[test]
    fn test_event_serde_is_tagged() {
        let event = SimEvent::MissileLaunched {
            unit: UnitId(2),
            target: UnitId(9),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"MissileLaunched\""));
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = Snapshot::default();
        let json = snapshot.to_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
        assert_eq!(back.live_units(), 0);
    }

    // ---- Configuration ----

    #[test]
    fn test_config_defaults_validate() {
        let config = SimConfig::default();
        config.validate().unwrap();
        assert_eq!(config.zone_count(), 16);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config =
            SimConfig::from_json_str(r#"{"seed": 7, "difficulty": "extreme", "ai": {"area_ordnance": true}}"#)
                .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.difficulty, Difficulty::Extreme);
        assert!(config.ai.area_ordnance);
        assert!(config.ai.allow_hunt, "unspecified gates keep their defaults");
        assert_eq!(config.zone_width, SimConfig::default().zone_width);
    }

    #[test]
    fn test_config_rejects_bad_zone_width() {
        let err = SimConfig::from_json_str(r#"{"zone_width": 0.0}"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));

        let err = SimConfig::from_json_str(r#"{"world_width": 100.0, "zone_width": 200.0}"#)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        let err = SimConfig::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, SimError::Json(_)));
    }

    #[test]
    fn test_zone_count_rounds_up() {
        let config = SimConfig {
            world_width: 1000.0,
            zone_width: 300.0,
            ..Default::default()
        };
        assert_eq!(config.zone_count(), 4);
    }

    // ---- Geometry ----

    #[test]
    fn test_rect_edges_and_center() {
        let r = Rect::new(10.0, 4.0, 20.0, 6.0);
        assert_eq!(r.right(), 30.0);
        assert_eq!(r.top(), 10.0);
        assert_eq!(r.center().x, 20.0);
        assert_eq!(r.center().y, 7.0);
        assert_eq!(r.offset(-5.0, 1.0).x, 5.0);
    }

    #[test]
    fn test_kinematics_distances() {
        let a = Kinematics::new(0.0, 0.0, 2.0, 2.0);
        let b = Kinematics::new(3.0, 4.0, 2.0, 2.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
        assert_eq!(a.axis_distance_to(&b), 3.0);
        assert_eq!(b.with_velocity(-2.0, 0.0).direction(), -1.0);
        assert_eq!(a.direction(), 0.0);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::from_enemy_flag(true), Side::Enemy);
        assert_eq!(Side::Friendly.opposite(), Side::Enemy);
    }

    /// Verify SimTime advancement.
    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..30 {
            time.advance();
        }
        assert_eq!(time.tick, 30);
        // 30 ticks at 30Hz = 1 second
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
    }
}

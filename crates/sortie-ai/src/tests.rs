#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use sortie_core::components::{BehaviorModes, Energy, Resources, Vote};
    use sortie_core::config::AiConfig;
    use sortie_core::constants::*;
    use sortie_core::enums::{Difficulty, UnitType};
    use sortie_core::types::UnitId;

    use crate::modes::{reroll, ModeInputs, DRAWS_PER_REROLL};
    use crate::profiles::get_profile;
    use crate::refit::{needs_refit, refit_step, RefitThresholds};
    use crate::retaliation::*;
    use crate::special::{plan_drop, DropContext, DropPlan};
    use crate::weapons::{clamp_velocity, resolve_intent, speed_cap};

    fn full_loadout() -> Resources {
        Resources {
            fuel: 100.0,
            max_fuel: 100.0,
            ammo: 64,
            max_ammo: 64,
            bombs: 10,
            max_bombs: 10,
            smart_missiles: 2,
            max_smart_missiles: 2,
            paratroopers: 10,
            max_paratroopers: 10,
            decoys: 4,
            max_decoys: 4,
        }
    }

    fn struck(energy: f64, difficulty: Difficulty, missiles_at_target: u32) -> StruckContext {
        StruckContext {
            energy,
            attacker_type: UnitType::Helicopter,
            ammo: 30,
            smart_missiles: 2,
            missiles_at_target,
            missile_cooldown_active: false,
            difficulty,
            ammo_restricted: false,
        }
    }

    // ---- Behavior modes ----

    #[test]
    fn test_reroll_is_deterministic_for_same_seed() {
        let config = AiConfig::default();
        let profile = get_profile(Difficulty::Hard);
        let inputs = ModeInputs {
            config: &config,
            profile: &profile,
            has_bombs: true,
            has_ammo: true,
            retaliation_active: false,
        };

        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(reroll(&mut a, &inputs), reroll(&mut b, &inputs));
        }
    }

    #[test]
    fn test_reroll_consumes_fixed_draws_regardless_of_gates() {
        let open = AiConfig::default();
        let closed = AiConfig {
            allow_steal: false,
            target_helicopters: false,
            target_tanks: false,
            target_bunkers: false,
            target_clouds: false,
            ..AiConfig::default()
        };
        let profile = get_profile(Difficulty::Easy);

        let mut a = ChaCha8Rng::seed_from_u64(5);
        let mut b = ChaCha8Rng::seed_from_u64(5);
        reroll(
            &mut a,
            &ModeInputs {
                config: &open,
                profile: &profile,
                has_bombs: true,
                has_ammo: true,
                retaliation_active: false,
            },
        );
        reroll(
            &mut b,
            &ModeInputs {
                config: &closed,
                profile: &profile,
                has_bombs: false,
                has_ammo: false,
                retaliation_active: false,
            },
        );
        assert_eq!(a.get_word_pos(), b.get_word_pos());
        assert!(DRAWS_PER_REROLL >= 12);
    }

    #[test]
    fn test_reroll_respects_gates_and_loadout() {
        let config = AiConfig {
            target_helicopters: false,
            ..AiConfig::default()
        };
        let profile = get_profile(Difficulty::Extreme);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let modes = reroll(
                &mut rng,
                &ModeInputs {
                    config: &config,
                    profile: &profile,
                    has_bombs: false,
                    has_ammo: true,
                    retaliation_active: false,
                },
            );
            assert!(!modes.target_helicopters, "gated off by config");
            assert!(!modes.target_tanks, "needs bombs");
            assert!(!modes.target_men, "needs bombs");
            assert!(modes.attack || modes.defend, "never idle");
        }
    }

    #[test]
    fn test_retaliation_is_sticky_across_reroll() {
        let config = AiConfig::default();
        let profile = get_profile(Difficulty::Hard);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let modes = reroll(
            &mut rng,
            &ModeInputs {
                config: &config,
                profile: &profile,
                has_bombs: true,
                has_ammo: true,
                retaliation_active: true,
            },
        );
        assert!(modes.retaliation);
    }

    // ---- Resource need ----

    #[test]
    fn test_low_fuel_alone_needs_refit() {
        let mut res = full_loadout();
        res.fuel = 10.0;
        let energy = Energy::full(10.0);
        assert!(needs_refit(&res, &energy, &RefitThresholds::default()));
    }

    #[test]
    fn test_single_low_resource_is_not_enough() {
        let mut res = full_loadout();
        res.bombs = 0;
        let energy = Energy::full(10.0);
        assert!(!needs_refit(&res, &energy, &RefitThresholds::default()));
    }

    #[test]
    fn test_two_low_resources_need_refit() {
        let mut res = full_loadout();
        res.bombs = 0;
        res.ammo = 2;
        let energy = Energy::full(10.0);
        assert!(needs_refit(&res, &energy, &RefitThresholds::default()));

        let mut res = full_loadout();
        res.ammo = 2;
        let energy = Energy {
            current: 1.0,
            max: 10.0,
        };
        assert!(needs_refit(&res, &energy, &RefitThresholds::default()));
    }

    #[test]
    fn test_refit_step_restores_everything() {
        let mut res = full_loadout();
        res.fuel = 0.0;
        res.ammo = 0;
        res.bombs = 0;
        let mut energy = Energy {
            current: 2.0,
            max: 10.0,
        };
        let mut done = false;
        for tick in 0..1_000 {
            if refit_step(&mut res, &mut energy, tick) {
                done = true;
                break;
            }
        }
        assert!(done);
        assert_eq!(res, full_loadout());
        assert_eq!(energy.current, energy.max);
    }

    // ---- Weapon intents ----

    #[test]
    fn test_resolve_intent_requires_votes_and_stock() {
        let votes = [Vote {
            target: UnitId(1),
            dx: 40.0,
        }];
        let mut res = full_loadout();
        let intent = resolve_intent(&votes, &[], &res);
        assert!(intent.firing);
        assert!(!intent.bombing);

        res.ammo = 0;
        let intent = resolve_intent(&votes, &votes, &res);
        assert!(!intent.firing, "no ammunition left");
        assert!(intent.bombing);
    }

    #[test]
    fn test_vote_target_is_horizontally_nearest() {
        let ammo = [
            Vote {
                target: UnitId(1),
                dx: 90.0,
            },
            Vote {
                target: UnitId(2),
                dx: -30.0,
            },
        ];
        let bombs = [Vote {
            target: UnitId(3),
            dx: 45.0,
        }];
        let intent = resolve_intent(&ammo, &bombs, &full_loadout());
        assert_eq!(intent.vote_target, Some(UnitId(2)));

        let intent = resolve_intent(&[], &[], &full_loadout());
        assert_eq!(intent.vote_target, None);
    }

    #[test]
    fn test_velocity_clamp_doubles_only_when_retaliating() {
        assert_eq!(speed_cap(10.0, false), 5.0);
        assert_eq!(speed_cap(10.0, true), 10.0);
        assert_eq!(clamp_velocity(9.0, -9.0, 10.0, false), (5.0, -5.0));
        assert_eq!(clamp_velocity(9.0, -12.0, 10.0, true), (9.0, -10.0));
    }

    // ---- Retaliation ----

    #[test]
    fn test_missile_retaliation_below_threshold() {
        let profile = get_profile(Difficulty::Hard);
        assert_eq!(profile.retaliation_energy, 2.0);
        let decision = evaluate_missile(&struck(1.0, Difficulty::Hard, 0), &profile);
        assert_eq!(
            decision,
            MissileDecision::Launch {
                cooldown_ticks: MISSILE_COOLDOWN_TICKS
            }
        );
    }

    #[test]
    fn test_no_retaliation_above_threshold_or_wrong_attacker() {
        let profile = get_profile(Difficulty::Hard);
        assert_eq!(
            evaluate_missile(&struck(5.0, Difficulty::Hard, 0), &profile),
            MissileDecision::Hold
        );

        let mut ctx = struck(1.0, Difficulty::Hard, 0);
        ctx.attacker_type = UnitType::Turret;
        assert_eq!(evaluate_missile(&ctx, &profile), MissileDecision::Hold);
    }

    #[test]
    fn test_second_missile_suppressed_unless_extreme() {
        let hard = get_profile(Difficulty::Hard);
        assert_eq!(
            evaluate_missile(&struck(1.0, Difficulty::Hard, 1), &hard),
            MissileDecision::Hold
        );

        let extreme = get_profile(Difficulty::Extreme);
        assert_eq!(
            evaluate_missile(&struck(1.0, Difficulty::Extreme, 1), &extreme),
            MissileDecision::Launch {
                cooldown_ticks: MISSILE_COOLDOWN_TICKS + MISSILE_REPEAT_COOLDOWN_TICKS
            }
        );
    }

    #[test]
    fn test_ammo_restricted_loadout_fires_when_dry() {
        let profile = get_profile(Difficulty::Easy);
        let mut ctx = struck(9.0, Difficulty::Easy, 0);
        ctx.attacker_type = UnitType::Tank;
        ctx.ammo = 0;
        assert_eq!(evaluate_missile(&ctx, &profile), MissileDecision::Hold);

        ctx.ammo_restricted = true;
        assert!(matches!(
            evaluate_missile(&ctx, &profile),
            MissileDecision::Launch { .. }
        ));
    }

    #[test]
    fn test_missile_held_during_cooldown_or_without_stock() {
        let profile = get_profile(Difficulty::Extreme);
        let mut ctx = struck(1.0, Difficulty::Extreme, 0);
        ctx.missile_cooldown_active = true;
        assert_eq!(evaluate_missile(&ctx, &profile), MissileDecision::Hold);

        let mut ctx = struck(1.0, Difficulty::Extreme, 0);
        ctx.smart_missiles = 0;
        assert_eq!(evaluate_missile(&ctx, &profile), MissileDecision::Hold);
    }

    #[test]
    fn test_hunt_roll_gating() {
        let config = AiConfig::default();
        let modes = BehaviorModes::default();
        assert!(should_roll_hunt(&modes, &config, false));
        assert!(!should_roll_hunt(&modes, &config, true), "throttled");

        let hunting = BehaviorModes {
            target_helicopters: true,
            ..Default::default()
        };
        assert!(!should_roll_hunt(&hunting, &config, false));

        let no_hunt = AiConfig {
            allow_hunt: false,
            ..AiConfig::default()
        };
        assert!(!should_roll_hunt(&modes, &no_hunt, false));
    }

    #[test]
    fn test_launch_delay_within_window() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..500 {
            let delay = launch_delay(&mut rng);
            assert!((MISSILE_DELAY_MIN_TICKS..=MISSILE_DELAY_MAX_TICKS).contains(&delay));
        }
    }

    // ---- Deployment planning ----

    #[test]
    fn test_drop_all_for_big_targets_or_low_resources() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let plan = plan_drop(
            &mut rng,
            &DropContext {
                available: 7,
                low_resources: false,
                target_type: Some(UnitType::SuperBunker),
            },
        );
        assert_eq!(plan, Some(DropPlan::All { count: 7 }));

        let plan = plan_drop(
            &mut rng,
            &DropContext {
                available: 3,
                low_resources: true,
                target_type: Some(UnitType::Bunker),
            },
        );
        assert_eq!(plan, Some(DropPlan::All { count: 3 }));
    }

    #[test]
    fn test_nothing_to_drop() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ctx = DropContext {
            available: 0,
            low_resources: true,
            target_type: None,
        };
        assert_eq!(plan_drop(&mut rng, &ctx), None);
    }

    proptest! {
        #[test]
        fn prop_staggered_drop_is_bounded(seed in any::<u64>(), available in 1u32..40) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let plan = plan_drop(&mut rng, &DropContext {
                available,
                low_resources: false,
                target_type: Some(UnitType::Bunker),
            }).unwrap();
            match plan {
                DropPlan::Staggered { count, delay_ticks } => {
                    prop_assert!(count >= 1 && count <= available.min(DROP_MAX_BATCH));
                    prop_assert!((DROP_DELAY_MIN_TICKS..=DROP_DELAY_MAX_TICKS).contains(&delay_ticks));
                }
                DropPlan::All { .. } => prop_assert!(false, "bunker target should stagger"),
            }
        }
    }
}

//! Decision system for autonomous units.
//!
//! Runs the per-tick pipeline for every AI unit in id order:
//!
//! 1. reset votes
//! 2. resource-need check, possibly diverting to a landing pad
//! 3. target continuity
//! 4. priority target search
//! 5. opportunistic targeting
//! 6. threat response
//! 7. weapon-intent resolution
//! 8. steering and the speed clamp
//!
//! Behavior modes are re-rolled on a fixed cadence before step 1. Reactions
//! to being struck run separately from [`on_struck`].

use glam::DVec2;
use tracing::{debug, info};

use sortie_ai::modes::{reroll, ModeInputs};
use sortie_ai::refit::{needs_refit, refit_step, RefitThresholds};
use sortie_ai::retaliation::{
    evaluate_missile, launch_delay, roll_hunt, should_roll_hunt, MissileDecision, StruckContext,
};
use sortie_ai::special::{plan_drop, DropContext, DropPlan};
use sortie_ai::weapons::{clamp_velocity, resolve_intent};
use sortie_core::components::*;
use sortie_core::constants::*;
use sortie_core::enums::{Cooldown, SpecialAction, UnitType};
use sortie_core::events::SimEvent;
use sortie_core::types::{Kinematics, UnitId};

use crate::battlefield::Battlefield;
use crate::damage::Struck;
use crate::registry::{UnitLookup, UnitView};
use crate::steering::Steering;
use crate::targeting::{
    flipped_for, in_view, in_view_first, is_facing, nearest, proximity_probe, InView, Nearest, ProbeMetric,
};
use crate::timers::TimerCommand;
use crate::world_setup::{dimensions, Blueprint};

/// Standoff kept from an aircraft being engaged with guns.
const GUN_STANDOFF: f64 = 120.0;

/// Clear one-shot intent flags left from the previous tick.
pub fn begin_tick(field: &mut Battlefield) {
    for id in field.registry.ids_with::<AiState>() {
        if let Some(mut ai) = field.registry.get_mut::<AiState>(id) {
            ai.intent.missile_launching = false;
            ai.intent.parachuting = false;
            ai.intent.decoying = false;
        }
    }
}

pub fn run(field: &mut Battlefield, steering: &mut dyn Steering) {
    for id in field.registry.ids_with::<AiControlled>() {
        think(field, steering, id);
    }
}

fn think(field: &mut Battlefield, steering: &mut dyn Steering, id: UnitId) {
    let now = field.tick();
    let Some(view) = field.registry.unit(id) else {
        return;
    };
    if !view.status.alive || view.status.respawning {
        return;
    }
    let (Some(mut res), Some(mut energy)) =
        (field.registry.component::<Resources>(id), field.registry.component::<Energy>(id))
    else {
        return;
    };
    if res.fuel <= 0.0 {
        return;
    }
    let Some(mut ai) = field.registry.take::<AiState>(id) else {
        return;
    };
    let mut cds = field.registry.take::<Cooldowns>(id).unwrap_or_default();
    let mut kin = view.kinematics;

    if now >= ai.next_reroll_tick {
        let inputs = ModeInputs {
            config: &field.config.ai,
            profile: &field.profile,
            has_bombs: res.bombs > 0,
            has_ammo: res.ammo > 0,
            retaliation_active: field.scheduler.cooldown_active(&cds, Cooldown::Retaliation),
        };
        ai.modes = reroll(field.rng.instance(view.unit_type.rng_stream(), id), &inputs);
        ai.next_reroll_tick = now + MODE_REROLL_TICKS;
        debug!(unit = %id, modes = ?ai.modes, "modes re-rolled");
        field.events.push(SimEvent::ModesRerolled { unit: id });
    }

    // 1.
    ai.ammo_votes.clear();
    ai.bomb_votes.clear();
    ai.intent.firing = false;
    ai.intent.bombing = false;
    ai.intent.vote_target = None;
    ai.steer = None;

    // 2.
    if ai.refit || needs_refit(&res, &energy, &RefitThresholds::default()) {
        refit(field, &view, &mut ai, &mut res, &mut energy, &mut kin, now);
    } else {
        ai.landed = false;
        acquire(field, &view, &mut ai, &mut cds, &mut res, &energy);
        if ai.steer.is_none() {
            ai.steer = Some(patrol_point(field, &view, &ai.modes));
        }
    }

    // 8.
    let retaliating = ai.modes.retaliation;
    if let Some(target) = ai.steer {
        steering.steer(&mut kin, &target, HELICOPTER_MAX_SPEED, !retaliating);
    }
    let (vx, vy) = clamp_velocity(kin.vx, kin.vy, HELICOPTER_MAX_SPEED, retaliating);
    (kin.vx, kin.vy) = if ai.landed { (0.0, 0.0) } else { (vx, vy) };

    let mut heading = view.heading;
    if kin.vx != 0.0 {
        heading.flipped = flipped_for(view.unit_type, view.allegiance.is_enemy, kin.vx > 0.0);
    }

    field.registry.set(id, kin);
    field.registry.set(id, heading);
    field.registry.set(id, res);
    field.registry.set(id, energy);
    field.registry.set(id, ai);
    field.registry.set(id, cds);
}

/// Head for the nearest friendly pad, then refuel, repair and rearm on it.
fn refit(
    field: &mut Battlefield,
    view: &UnitView,
    ai: &mut AiState,
    res: &mut Resources,
    energy: &mut Energy,
    kin: &mut Kinematics,
    now: u64,
) {
    if !ai.refit {
        ai.refit = true;
        ai.target = None;
        debug!(unit = %view.id, fuel = res.fuel, "heading home to refit");
        field.events.push(SimEvent::Refit { unit: view.id, complete: false });
    }

    let query = InView::friends(&[UnitType::LandingPad], field.config.world_width);
    let Some(pad) = in_view_first(&field.registry, view, &query).and_then(|p| field.registry.unit(p)) else {
        ai.landed = false;
        return;
    };
    let pad_x = pad.kinematics.center().x;
    let over_pad = (kin.center().x - pad_x).abs() <= pad.kinematics.width / 2.0;

    if over_pad && kin.y <= LANDING_ALTITUDE {
        ai.landed = true;
        kin.vx = 0.0;
        kin.vy = 0.0;
        if refit_step(res, energy, now) {
            ai.refit = false;
            info!(unit = %view.id, "refit complete");
            field.events.push(SimEvent::Refit { unit: view.id, complete: true });
        }
    } else {
        ai.landed = false;
        ai.steer = Some(SteerTarget { x: pad_x, y: 0.0, unit_type: Some(UnitType::LandingPad) });
    }
}

/// Steps 3 to 7.
fn acquire(
    field: &mut Battlefield,
    view: &UnitView,
    ai: &mut AiState,
    cds: &mut Cooldowns,
    res: &mut Resources,
    energy: &Energy,
) {
    let network_mode = field.config.network_mode;

    // 3.
    if let Some(target) = ai.target {
        let keep = field.registry.unit(target).is_some_and(|t| {
            t.status.alive
                && !t.status.cloaked
                && !(t.unit_type == UnitType::Tank && res.bombs == 0)
                && !(t.unit_type == UnitType::Cloud && !ai.modes.target_clouds)
                && (t.allegiance.is_neutral || t.allegiance.side() != view.allegiance.side())
        });
        if !keep {
            ai.target = None;
        }
    }

    // 4. Cloud cover is held only until something worth attacking shows up.
    let in_cloud_cover = ai
        .target
        .and_then(|t| field.registry.unit(t))
        .is_some_and(|t| t.unit_type == UnitType::Cloud);
    if ai.target.is_none() || in_cloud_cover {
        ai.target = priority_target(field, view, &ai.modes, res).or(ai.target);
    }

    // 5.
    if ai.modes.attack {
        let query = InView::enemies(&[UnitType::Helicopter], AIRCRAFT_ENGAGE_RANGE);
        for aircraft in in_view(&field.registry, view, &query) {
            if let Some(t) = field.registry.unit(aircraft) {
                cast_votes(field, view, &t, ai);
            }
        }
    }
    if res.bombs > 0 {
        let light = light_targets(&ai.modes);
        let probe = proximity_probe(&field.registry, view, &light, OPPORTUNISTIC_RADIUS, ProbeMetric::Circle, network_mode);
        if let Some(t) = probe.and_then(|p| field.registry.unit(p)) {
            cast_bomb_vote(field, view, &t, ai);
        }
    }

    if let Some(t) = ai.target.and_then(|t| field.registry.unit(t)) {
        engage(field, view, &t, ai, cds, res, energy);
    }

    // 6.
    let threats: &[UnitType] = if field.config.ai.shoot_missiles {
        &[UnitType::ParachuteInfantry, UnitType::SmartMissile]
    } else {
        &[UnitType::ParachuteInfantry]
    };
    let query = Nearest { types: threats, use_facing_filter: true, ignore_overlap: true };
    if let Some(t) = nearest(&field.registry, view, &query).and_then(|t| field.registry.unit(t)) {
        let dx = t.kinematics.center().x - view.kinematics.center().x;
        let dy = t.kinematics.center().y - view.kinematics.center().y;
        if dy.abs() <= AIM_VERTICAL_BAND && dx.abs() <= THREAT_RANGE {
            ai.ammo_votes.push(Vote { target: t.id, dx });
        }
    }

    if res.decoys > 0 {
        let incoming = proximity_probe(
            &field.registry,
            view,
            &[UnitType::SmartMissile],
            THREAT_RANGE,
            ProbeMetric::Circle,
            network_mode,
        );
        if incoming.is_some() {
            start_drop(field, view, ai, cds, res, energy, SpecialAction::Decoys, None);
        }
    }

    // 7.
    let intent = resolve_intent(&ai.ammo_votes, &ai.bomb_votes, res);
    ai.intent.firing = intent.firing;
    ai.intent.bombing = intent.bombing;
    ai.intent.vote_target = intent.vote_target;
}

/// First enabled category, in fixed priority order, with something in view.
/// Falls back to balloons when carrying gun ammunition.
fn priority_target(field: &Battlefield, view: &UnitView, modes: &BehaviorModes, res: &Resources) -> Option<UnitId> {
    let order = [
        (modes.target_helicopters, UnitType::Helicopter),
        (modes.target_tanks, UnitType::Tank),
        (modes.target_bunkers, UnitType::Bunker),
        (modes.target_super_bunkers, UnitType::SuperBunker),
        (modes.target_end_bunkers, UnitType::EndBunker),
        (modes.target_clouds, UnitType::Cloud),
    ];
    for (enabled, unit_type) in order {
        if !enabled {
            continue;
        }
        let types = [unit_type];
        let query = if unit_type == UnitType::Cloud {
            InView::any(&types, CLOUD_SCAN_RANGE)
        } else {
            InView::enemies(&types, PRIORITY_SCAN_RANGE)
        };
        if let Some(found) = in_view_first(&field.registry, view, &query) {
            return Some(found);
        }
    }

    if res.ammo > 0 {
        let query = InView::enemies(&[UnitType::Balloon], PRIORITY_SCAN_RANGE);
        return in_view_first(&field.registry, view, &query);
    }
    None
}

fn light_targets(modes: &BehaviorModes) -> Vec<UnitType> {
    let mut types = Vec::new();
    if modes.target_men {
        types.extend([UnitType::Infantry, UnitType::Engineer]);
    }
    if modes.target_vans {
        types.push(UnitType::Van);
    }
    if modes.target_turrets {
        types.push(UnitType::Turret);
    }
    types
}

/// Aimed fire when level with and facing the target; a bomb when over it.
fn cast_votes(field: &Battlefield, view: &UnitView, target: &UnitView, ai: &mut AiState) {
    let dx = target.kinematics.center().x - view.kinematics.center().x;
    let dy = target.kinematics.center().y - view.kinematics.center().y;
    if dy.abs() <= AIM_VERTICAL_BAND && is_facing(target, view) {
        ai.ammo_votes.push(Vote { target: target.id, dx });
    }
    cast_bomb_vote(field, view, target, ai);
}

fn cast_bomb_vote(field: &Battlefield, view: &UnitView, target: &UnitView, ai: &mut AiState) {
    let dx = target.kinematics.center().x - view.kinematics.center().x;
    let below = target.kinematics.rect().top() <= view.kinematics.y;
    if below && dx.abs() <= BOMB_WINDOW && field.can_bomb_target(target.id) {
        ai.bomb_votes.push(Vote { target: target.id, dx });
    }
}

/// Votes, positioning and special actions against the primary target.
fn engage(
    field: &mut Battlefield,
    view: &UnitView,
    target: &UnitView,
    ai: &mut AiState,
    cds: &mut Cooldowns,
    res: &mut Resources,
    energy: &Energy,
) {
    let tc = target.kinematics.center();
    let here = view.kinematics.center();
    let steer = |x: f64, y: f64| SteerTarget { x, y, unit_type: Some(target.unit_type) };

    match target.unit_type {
        UnitType::Cloud => {
            ai.steer = Some(steer(tc.x, target.kinematics.y));
        }
        UnitType::Helicopter | UnitType::Balloon => {
            cast_votes(field, view, target, ai);
            let side = if here.x < tc.x { -1.0 } else { 1.0 };
            ai.steer = Some(steer(tc.x + side * GUN_STANDOFF, target.kinematics.y));
        }
        UnitType::Bunker | UnitType::SuperBunker | UnitType::EndBunker => {
            cast_bomb_vote(field, view, target, ai);
            ai.steer = Some(steer(tc.x, BOMB_RUN_ALTITUDE));
            if ai.modes.steal && (tc.x - here.x).abs() <= DROP_RANGE {
                let target_type = Some(target.unit_type);
                start_drop(field, view, ai, cds, res, energy, SpecialAction::Paratroopers, target_type);
            }
        }
        _ => {
            cast_votes(field, view, target, ai);
            ai.steer = Some(steer(tc.x, BOMB_RUN_ALTITUDE));
        }
    }
}

/// Where to fly with no target: press toward the far side when attacking,
/// otherwise hold over home ground.
fn patrol_point(field: &Battlefield, view: &UnitView, modes: &BehaviorModes) -> SteerTarget {
    let w = field.config.world_width;
    let here = view.kinematics.center().x;
    let toward_enemy = if view.allegiance.is_enemy { -1.0 } else { 1.0 };
    let x = if modes.attack {
        (here + toward_enemy * PRIORITY_SCAN_RANGE / 2.0).clamp(0.0, w)
    } else if view.allegiance.is_enemy {
        w * 0.85
    } else {
        w * 0.15
    };
    SteerTarget { x, y: CRUISE_ALTITUDE, unit_type: None }
}

/// Plan and start a paratrooper or decoy deployment, honouring its cooldown
/// and the one-pending-action rule.
#[allow(clippy::too_many_arguments)]
fn start_drop(
    field: &mut Battlefield,
    view: &UnitView,
    ai: &mut AiState,
    cds: &mut Cooldowns,
    res: &mut Resources,
    energy: &Energy,
    action: SpecialAction,
    target_type: Option<UnitType>,
) {
    if ai.pending_action.is_some() || field.scheduler.cooldown_active(cds, action.cooldown()) {
        return;
    }
    let ctx = DropContext {
        available: available(res, action),
        low_resources: energy.current < energy.max * LOW_ENERGY_FRACTION,
        target_type,
    };
    let Some(plan) = plan_drop(field.rng.instance(view.unit_type.rng_stream(), view.id), &ctx) else {
        return;
    };

    let now = field.tick();
    field.scheduler.start_plain_cooldown(cds, view.id, action.cooldown(), DROP_COOLDOWN_TICKS, now);
    match plan {
        DropPlan::All { count } => release(field, view, ai, res, action, count),
        DropPlan::Staggered { count, delay_ticks } => {
            ai.pending_action = Some(action);
            let command = TimerCommand::Deploy { action, count };
            field.scheduler.schedule(now, delay_ticks, Some(view.id), command);
        }
    }
}

fn available(res: &Resources, action: SpecialAction) -> u32 {
    match action {
        SpecialAction::Paratroopers => res.paratroopers,
        SpecialAction::Decoys => res.decoys,
    }
}

/// Spawn up to `count` troops or decoys under the unit.
fn release(
    field: &mut Battlefield,
    view: &UnitView,
    ai: &mut AiState,
    res: &mut Resources,
    action: SpecialAction,
    count: u32,
) {
    let count = count.min(available(res, action));
    if count == 0 {
        return;
    }
    match action {
        SpecialAction::Paratroopers => {
            res.paratroopers -= count;
            ai.intent.parachuting = true;
        }
        SpecialAction::Decoys => {
            res.decoys -= count;
            ai.intent.decoying = true;
        }
    }

    let unit_type = action.spawns();
    let (w, h) = dimensions(unit_type);
    let kin = &view.kinematics;
    for i in 0..count {
        let x = kin.center().x - w / 2.0 + f64::from(i) * (w + 2.0);
        let y = (kin.y - h).max(0.0);
        let (vx, vy) = match action {
            SpecialAction::Paratroopers => (0.0, -PARACHUTE_FALL_SPEED),
            SpecialAction::Decoys => (-kin.vx.signum(), -0.5),
        };
        let blueprint = Blueprint::new(unit_type, view.allegiance.is_enemy, x, y)
            .with_velocity(vx, vy)
            .with_owner(view.id, view.unit_type);
        field.spawn(blueprint);
    }
    debug!(unit = %view.id, ?action, count, "deployed");
    field.events.push(SimEvent::Deployed { unit: view.id, action, count });
}

/// Timer entry point for a staggered deployment.
pub fn deploy(field: &mut Battlefield, unit: UnitId, action: SpecialAction, count: u32) {
    let Some(view) = field.registry.unit(unit) else {
        return;
    };
    let Some(mut res) = field.registry.component::<Resources>(unit) else {
        return;
    };
    let Some(mut ai) = field.registry.take::<AiState>(unit) else {
        return;
    };
    release(field, &view, &mut ai, &mut res, action, count);
    ai.pending_action = None;
    field.registry.set(unit, res);
    field.registry.set(unit, ai);
}

/// Timer entry point for a retaliation missile. Skipped if the target is
/// gone or hidden, or the rails are empty.
pub fn launch_missile(field: &mut Battlefield, unit: UnitId, target: UnitId) {
    let (Some(view), Some(t)) = (field.registry.unit(unit), field.registry.unit(target)) else {
        return;
    };
    if !t.status.alive || t.status.cloaked {
        return;
    }
    match field.registry.get_mut::<Resources>(unit) {
        Some(mut res) if res.smart_missiles > 0 => res.smart_missiles -= 1,
        _ => return,
    }
    if let Some(mut ai) = field.registry.get_mut::<AiState>(unit) {
        *ai.missiles_fired_at.entry(target).or_insert(0) += 1;
        ai.intent.missile_launching = true;
    }

    let origin = view.kinematics.center();
    let dir = (t.kinematics.center() - origin).normalize_or_zero();
    let dir = if dir == DVec2::ZERO { DVec2::NEG_Y } else { dir };
    let v = dir * SMART_MISSILE_SPEED;
    let (w, h) = dimensions(UnitType::SmartMissile);
    let missile = Blueprint::new(UnitType::SmartMissile, view.allegiance.is_enemy, origin.x - w / 2.0, origin.y - h / 2.0)
        .with_velocity(v.x, v.y)
        .with_owner(unit, view.unit_type);
    field.spawn(missile);

    info!(unit = %unit, target = %target, "missile launched");
    field.events.push(SimEvent::MissileLaunched { unit, target });
}

/// React to a hit: maybe start hunting aircraft, maybe answer with a missile.
pub fn on_struck(field: &mut Battlefield, struck: &Struck) {
    let id = struck.target;
    if struck.killed || !field.registry.is_alive(id) {
        return;
    }
    let (Some(res), Some(energy)) = (field.registry.component::<Resources>(id), field.registry.component::<Energy>(id))
    else {
        return;
    };
    let Some(mut ai) = field.registry.take::<AiState>(id) else {
        return;
    };
    let mut cds = field.registry.take::<Cooldowns>(id).unwrap_or_default();
    let now = field.tick();
    let stream = UnitType::Helicopter.rng_stream();

    let hit_response = field.scheduler.cooldown_active(&cds, Cooldown::HitResponse);
    if should_roll_hunt(&ai.modes, &field.config.ai, hit_response) {
        field.scheduler.start_plain_cooldown(&mut cds, id, Cooldown::HitResponse, HIT_RESPONSE_TICKS, now);
        if roll_hunt(field.rng.instance(stream, id), &field.profile) {
            ai.modes.target_helicopters = true;
            if struck.attacker_type.is_aircraft() && field.registry.is_alive(struck.attacker) {
                ai.target = Some(struck.attacker);
            }
            debug!(unit = %id, attacker = %struck.attacker, "hunt started");
            field.events.push(SimEvent::HuntStarted { unit: id });
        }
    }

    let ctx = StruckContext {
        energy: energy.current,
        attacker_type: struck.attacker_type,
        ammo: res.ammo,
        smart_missiles: res.smart_missiles,
        missiles_at_target: ai.missiles_fired_at.get(&struck.attacker).copied().unwrap_or(0),
        missile_cooldown_active: field.scheduler.cooldown_active(&cds, Cooldown::MissileLaunch),
        difficulty: field.config.difficulty,
        ammo_restricted: field.config.ai.ammo_restricted,
    };
    if let MissileDecision::Launch { cooldown_ticks } = evaluate_missile(&ctx, &field.profile) {
        let delay = launch_delay(field.rng.instance(stream, id));
        let command = TimerCommand::LaunchMissile { target: struck.attacker };
        field.scheduler.schedule(now, delay, Some(id), command);
        field
            .scheduler
            .start_plain_cooldown(&mut cds, id, Cooldown::MissileLaunch, cooldown_ticks.max(delay + 1), now);

        ai.modes.retaliation = true;
        let end = TimerCommand::EndRetaliation;
        field.scheduler.start_cooldown(&mut cds, id, Cooldown::Retaliation, RETALIATION_TICKS, now, end);
        info!(unit = %id, attacker = %struck.attacker, delay, "retaliating");
        field.events.push(SimEvent::Retaliation { unit: id, active: true });
    }

    field.registry.set(id, ai);
    field.registry.set(id, cds);
}

//! Weapon-intent resolution and the autonomous speed cap.

use sortie_core::components::{Resources, Vote, WeaponIntent};
use sortie_core::constants::{AI_SPEED_FRACTION, RETALIATION_SPEED_BOOST};

/// Turn this tick's votes into fire/bomb intents.
pub fn resolve_intent(ammo_votes: &[Vote], bomb_votes: &[Vote], res: &Resources) -> WeaponIntent {
    let firing = !ammo_votes.is_empty() && res.ammo > 0;
    let bombing = !bomb_votes.is_empty() && res.bombs > 0;

    // Earliest vote wins ties, so the result depends only on vote order.
    let mut nearest: Option<Vote> = None;
    for vote in ammo_votes.iter().chain(bomb_votes.iter()) {
        match nearest {
            Some(best) if vote.dx.abs() >= best.dx.abs() => {}
            _ => nearest = Some(*vote),
        }
    }

    WeaponIntent {
        firing,
        bombing,
        vote_target: nearest.map(|v| v.target),
        ..Default::default()
    }
}

/// Speed cap for autonomous units: a fraction of the configured max, relaxed
/// only while retaliating.
pub fn speed_cap(max_speed: f64, retaliating: bool) -> f64 {
    let cap = max_speed * AI_SPEED_FRACTION;
    if retaliating {
        cap * RETALIATION_SPEED_BOOST
    } else {
        cap
    }
}

/// Clamp each velocity component to the autonomous speed cap.
pub fn clamp_velocity(vx: f64, vy: f64, max_speed: f64, retaliating: bool) -> (f64, f64) {
    let cap = speed_cap(max_speed, retaliating);
    (vx.clamp(-cap, cap), vy.clamp(-cap, cap))
}

//! Narrow-phase collision: box overlap, lookahead and tunneling checks, and
//! the per-source dispatch loop that walks the zone index.

use std::collections::BTreeSet;

use sortie_core::components::{CollisionSpec, CollisionTarget};
use sortie_core::enums::{FactionGroup, UnitType};
use sortie_core::types::{Kinematics, Rect, UnitId};

use crate::registry::{UnitLookup, UnitView};
use crate::zones::ZoneIndex;

/// Strict overlap of two boxes. A positive `lookahead` stretches `a` to the
/// right, a negative one to the left. Touching edges do not overlap.
pub fn overlaps(a: &Rect, b: &Rect, lookahead: f64) -> bool {
    let (mut left, mut right) = (a.x, a.right());
    if lookahead > 0.0 {
        right += lookahead;
    } else {
        left += lookahead;
    }
    left < b.right() && right > b.x && a.y < b.top() && a.top() > b.y
}

/// Overlap of `a` displaced by `(dx, dy)` against `b`.
pub fn overlaps_with_offset(a: &Rect, b: &Rect, dx: f64, dy: f64) -> bool {
    overlaps(&a.offset(dx, dy), b, 0.0)
}

/// Sample the path travelled this tick and return the first offset (relative
/// to the current position) at which the source overlaps `target`.
///
/// The samples include both endpoints, so any hit an endpoint check would
/// find is found here too.
pub fn tween_offset(source: &Kinematics, target: &Rect) -> Option<(f64, f64)> {
    let (vx, vy) = (source.vx, source.vy);
    let steps = ((vx.abs().max(vy.abs()) / 2.0).floor() as u32).max(2);
    let (ix, iy) = (vx / f64::from(steps + 1), vy / f64::from(steps + 1));
    let rect = source.rect();

    (0..=steps + 1).find_map(|k| {
        let (dx, dy) = if k == steps + 1 {
            (0.0, 0.0)
        } else {
            let k = f64::from(k);
            (-vx + ix * k, -vy + iy * k)
        };
        overlaps_with_offset(&rect, target, dx, dy).then_some((dx, dy))
    })
}

/// Tunneling check. With `reposition`, a hit moves the source to where it
/// first touched the target.
pub fn tween_check(source: &mut Kinematics, target: &Rect, reposition: bool) -> bool {
    match tween_offset(source, target) {
        Some((dx, dy)) => {
            if reposition {
                source.x += dx;
                source.y += dy;
            }
            true
        }
        None => false,
    }
}

/// Same-side pairs that still collide: aircraft against fortified bunkers,
/// and foot soldiers entering or manning their own structures.
pub fn same_side_exception(source: UnitType, candidate: UnitType) -> bool {
    use UnitType::*;
    matches!(
        (source, candidate),
        (Helicopter, Bunker | SuperBunker) | (Infantry | Engineer, Bunker | SuperBunker | Turret)
    )
}

fn eligible(source: &UnitView, candidate: &UnitView, target: &CollisionTarget, spec: &CollisionSpec) -> bool {
    if candidate.id == source.id || !candidate.status.alive || candidate.status.exclude_from_collision {
        return false;
    }
    let same_side = candidate.allegiance.side() == source.allegiance.side();
    if spec.friendly_only {
        return same_side;
    }
    // Hostile and neutral units collide with everyone.
    if source.allegiance.is_hostile || candidate.allegiance.is_hostile || candidate.allegiance.is_neutral {
        return true;
    }
    match target.group {
        FactionGroup::All => true,
        FactionGroup::Friendly => same_side,
        FactionGroup::Enemy => !same_side || same_side_exception(source.unit_type, candidate.unit_type),
    }
}

/// Outcome of one source's dispatch pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    pub hits: Vec<UnitId>,
    /// Set when a tween hit pulled the source back along its path.
    pub repositioned: Option<Kinematics>,
}

/// Test `source` against every eligible candidate in its zones and report
/// each hit to `on_hit` in a fixed order: spec target order, then front zone
/// before rear, then ascending id. A candidate is reported at most once.
pub fn dispatch<L, F>(
    spec: &CollisionSpec,
    source: &UnitView,
    lookup: &L,
    zones: &ZoneIndex,
    mut on_hit: F,
) -> DispatchOutcome
where
    L: UnitLookup + ?Sized,
    F: FnMut(UnitId, UnitId),
{
    let mut outcome = DispatchOutcome::default();
    let status = source.status;
    if !status.alive || status.inert || (status.expired && !source.allegiance.is_hostile) {
        return outcome;
    }
    let Some(membership) = zones.membership(source.id).copied() else {
        return outcome;
    };

    let mut kin = source.kinematics;
    let lookahead = spec.lookahead.unwrap_or(0.0) * kin.direction();
    let mut seen = BTreeSet::new();

    for target in &spec.targets {
        for zone in membership.zones() {
            for id in zones.query_zone(zone, FactionGroup::All, target.unit_type) {
                if seen.contains(&id) {
                    continue;
                }
                let Some(candidate) = lookup.unit(id) else {
                    continue;
                };
                if !eligible(source, &candidate, target, spec) {
                    continue;
                }
                let rect = candidate.kinematics.rect();
                let hit = if spec.tween {
                    let before = kin;
                    if tween_check(&mut kin, &rect, true) {
                        if kin != before {
                            outcome.repositioned = Some(kin);
                        }
                        true
                    } else {
                        overlaps(&kin.rect(), &rect, lookahead)
                    }
                } else {
                    overlaps(&kin.rect(), &rect, lookahead)
                };
                if hit {
                    seen.insert(id);
                    outcome.hits.push(id);
                    on_hit(source.id, id);
                }
            }
        }
    }
    outcome
}

//! Target acquisition queries.
//!
//! All queries read through [`UnitLookup`] and visit candidates in type order
//! then ascending id, so equal inputs give equal answers on every peer.

use std::cmp::Ordering;

use sortie_core::constants::{
    LAUNCHER_SPOT_RANGE, NEAR_GROUND_ALTITUDE, NEAR_GROUND_VERTICAL_DELTA, NETWORK_PROBE_DISTANCE,
};
use sortie_core::enums::UnitType;
use sortie_core::types::UnitId;
use sortie_core::{Result, SimError};

use crate::collision::overlaps;
use crate::registry::{UnitLookup, UnitView};

/// A validated, non-empty list of unit types to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQuery(Vec<UnitType>);

impl TypeQuery {
    pub fn new(types: &[UnitType]) -> Result<Self> {
        if types.is_empty() {
            return Err(SimError::EmptyTypeQuery);
        }
        Ok(Self(types.to_vec()))
    }

    /// Parse a comma or whitespace separated list of type tokens.
    pub fn parse(spec: &str) -> Result<Self> {
        let types = spec
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<UnitType>>>()?;
        Self::new(&types)
    }

    pub fn types(&self) -> &[UnitType] {
        &self.0
    }
}

/// Transient per-query candidate record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCandidate {
    pub unit_id: UnitId,
    pub total_distance: f64,
    pub is_facing: bool,
    unit_type: UnitType,
}

/// Whether `source` is pointed at `target`'s side of it.
///
/// The heading flag is inverted for aircraft, whose art faces the other way,
/// and mirrored again for the enemy side.
pub fn is_facing(target: &UnitView, source: &UnitView) -> bool {
    let facing_right = heading_faces_right(source.unit_type, source.allegiance.is_enemy, source.heading.flipped);
    let target_right = target.kinematics.center().x >= source.kinematics.center().x;
    facing_right == target_right
}

/// Resolve a heading flag to a screen direction.
pub fn heading_faces_right(unit_type: UnitType, is_enemy: bool, flipped: bool) -> bool {
    !flipped ^ unit_type.is_aircraft() ^ is_enemy
}

/// The heading flag that points a unit right or left.
pub fn flipped_for(unit_type: UnitType, is_enemy: bool, face_right: bool) -> bool {
    !(face_right ^ unit_type.is_aircraft() ^ is_enemy)
}

/// Options for [`in_view`].
#[derive(Debug, Clone, Copy)]
pub struct InView<'a> {
    pub types: &'a [UnitType],
    pub friendly_only: bool,
    pub enemy_only: bool,
    /// Maximum horizontal distance between centers.
    pub trigger_distance: f64,
}

impl<'a> InView<'a> {
    pub fn enemies(types: &'a [UnitType], trigger_distance: f64) -> Self {
        Self { types, friendly_only: false, enemy_only: true, trigger_distance }
    }

    pub fn friends(types: &'a [UnitType], trigger_distance: f64) -> Self {
        Self { types, friendly_only: true, enemy_only: false, trigger_distance }
    }

    pub fn any(types: &'a [UnitType], trigger_distance: f64) -> Self {
        Self { types, friendly_only: false, enemy_only: false, trigger_distance }
    }
}

fn relation_ok(source: &UnitView, candidate: &UnitView, friendly_only: bool, enemy_only: bool) -> bool {
    let same_side = candidate.allegiance.side() == source.allegiance.side();
    let neutral = candidate.allegiance.is_neutral;
    let hostile = candidate.allegiance.is_hostile;
    if friendly_only {
        return same_side && !hostile && !neutral;
    }
    if enemy_only {
        return (!same_side || hostile) && !neutral;
    }
    true
}

fn candidates<'a, L: UnitLookup + ?Sized>(
    lookup: &'a L,
    source: &'a UnitView,
    types: &'a [UnitType],
) -> impl Iterator<Item = UnitView> + 'a {
    types
        .iter()
        .flat_map(move |&t| lookup.ids_of_type(t))
        .filter(move |&id| id != source.id)
        .filter_map(move |id| lookup.unit(id))
}

/// Live, visible candidates within a horizontal distance, nearest first.
pub fn in_view<L: UnitLookup + ?Sized>(lookup: &L, source: &UnitView, query: &InView) -> Vec<UnitId> {
    let mut found: Vec<(f64, UnitId)> = candidates(lookup, source, query.types)
        .filter(|c| c.status.alive && !c.status.cloaked && !c.status.inert)
        .filter(|c| relation_ok(source, c, query.friendly_only, query.enemy_only))
        .map(|c| (source.kinematics.axis_distance_to(&c.kinematics), c.id))
        .filter(|&(dist, _)| dist <= query.trigger_distance)
        .collect();
    found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    found.into_iter().map(|(_, id)| id).collect()
}

/// Head of [`in_view`].
pub fn in_view_first<L: UnitLookup + ?Sized>(lookup: &L, source: &UnitView, query: &InView) -> Option<UnitId> {
    in_view(lookup, source, query).into_iter().next()
}

/// Options for [`nearest`].
#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a> {
    pub types: &'a [UnitType],
    pub use_facing_filter: bool,
    /// When false, candidates already overlapping the source are skipped.
    pub ignore_overlap: bool,
}

/// Full target arbitration with the game's bias rules:
///
/// - missile launchers must be close or already spotted,
/// - near the ground, only candidates at about the same height count,
/// - enemy aircraft walk the list farthest first,
/// - a blocking structure at the head hides ground units behind it.
pub fn nearest<L: UnitLookup + ?Sized>(lookup: &L, source: &UnitView, query: &Nearest) -> Option<UnitId> {
    let src = &source.kinematics;
    let near_ground = src.y <= NEAR_GROUND_ALTITUDE;

    let mut list: Vec<TargetCandidate> = candidates(lookup, source, query.types)
        .filter(|c| c.status.alive && !c.status.cloaked)
        .filter(|c| c.allegiance.side() != source.allegiance.side() || c.allegiance.is_hostile)
        .filter(|c| {
            c.unit_type != UnitType::MissileLauncher
                || c.status.detected
                || src.axis_distance_to(&c.kinematics) <= LAUNCHER_SPOT_RANGE
        })
        .filter(|c| query.ignore_overlap || !overlaps(&src.rect(), &c.kinematics.rect(), 0.0))
        .filter(|c| !near_ground || (c.kinematics.y - src.y).abs() <= NEAR_GROUND_VERTICAL_DELTA)
        .map(|c| TargetCandidate {
            unit_id: c.id,
            total_distance: src.distance_to(&c.kinematics),
            is_facing: is_facing(&c, source),
            unit_type: c.unit_type,
        })
        .filter(|c| !query.use_facing_filter || c.is_facing)
        .collect();

    list.sort_by(|a, b| match a.total_distance.total_cmp(&b.total_distance) {
        Ordering::Equal => a.unit_id.cmp(&b.unit_id),
        other => other,
    });
    if source.unit_type.is_aircraft() && source.allegiance.is_enemy {
        list.reverse();
    }

    let first = list.first()?;
    if !first.unit_type.is_blocking() {
        return Some(first.unit_id);
    }
    match list.get(1) {
        Some(next) if !next.unit_type.is_ground_bound() => Some(next.unit_id),
        _ => None,
    }
}

/// How [`proximity_probe`] measures distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMetric {
    Axis,
    Circle,
}

/// First live, visible opposing unit of the given types within range, or
/// `None`. In network mode the range is fixed so every peer agrees.
pub fn proximity_probe<L: UnitLookup + ?Sized>(
    lookup: &L,
    source: &UnitView,
    types: &[UnitType],
    trigger_distance: f64,
    metric: ProbeMetric,
    network_mode: bool,
) -> Option<UnitId> {
    let range = if network_mode { NETWORK_PROBE_DISTANCE } else { trigger_distance };
    candidates(lookup, source, types)
        .filter(|c| c.status.alive && !c.status.cloaked && !c.status.inert)
        .filter(|c| relation_ok(source, c, false, true))
        .find(|c| {
            let dist = match metric {
                ProbeMetric::Axis => source.kinematics.axis_distance_to(&c.kinematics),
                ProbeMetric::Circle => source.kinematics.distance_to(&c.kinematics),
            };
            dist <= range
        })
        .map(|c| c.id)
}

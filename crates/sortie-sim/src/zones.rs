//! Horizontal broad-phase partitioning.
//!
//! The battlefield is cut into fixed-width zones. Every live unit sits in one
//! or two zones (two when its box is within [`ZONE_EDGE_MARGIN`] of a
//! boundary), bucketed by side and type so a query for "enemy tanks in zone 3"
//! touches exactly one set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sortie_core::constants::ZONE_EDGE_MARGIN;
use sortie_core::enums::{FactionGroup, Side, UnitType};
use sortie_core::types::UnitId;

/// The zones a unit is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneMembership {
    pub side: Side,
    pub unit_type: UnitType,
    /// Zone containing the unit's left edge.
    pub front: usize,
    /// Neighbouring zone when the box straddles or nearly touches a boundary.
    pub rear: Option<usize>,
}

impl ZoneMembership {
    pub fn is_multi_zone(&self) -> bool {
        self.rear.is_some()
    }

    pub fn zones(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.front).chain(self.rear)
    }
}

#[derive(Debug, Default)]
struct Zone {
    buckets: BTreeMap<(Side, UnitType), BTreeSet<UnitId>>,
}

impl Zone {
    fn insert(&mut self, side: Side, unit_type: UnitType, id: UnitId) {
        self.buckets.entry((side, unit_type)).or_default().insert(id);
    }

    fn remove(&mut self, side: Side, unit_type: UnitType, id: UnitId) {
        if let Some(bucket) = self.buckets.get_mut(&(side, unit_type)) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.buckets.remove(&(side, unit_type));
            }
        }
    }
}

#[derive(Debug)]
pub struct ZoneIndex {
    zone_width: f64,
    zones: Vec<Zone>,
    membership: HashMap<UnitId, ZoneMembership>,
}

impl ZoneIndex {
    pub fn new(world_width: f64, zone_width: f64) -> Self {
        let count = ((world_width / zone_width).ceil() as usize).max(1);
        Self {
            zone_width,
            zones: (0..count).map(|_| Zone::default()).collect(),
            membership: HashMap::new(),
        }
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn zone_width(&self) -> f64 {
        self.zone_width
    }

    /// Zone containing `x`, clamped to the battlefield.
    pub fn zone_of(&self, x: f64) -> usize {
        let raw = (x / self.zone_width).floor();
        let last = (self.zones.len() - 1) as f64;
        raw.clamp(0.0, last) as usize
    }

    /// Zones a box starting at `x` with the given width belongs in.
    pub fn zones_for(&self, x: f64, width: f64) -> (usize, Option<usize>) {
        let front = self.zone_of(x);
        let ahead = self.zone_of(x + width + ZONE_EDGE_MARGIN);
        if ahead != front {
            return (front, Some(ahead));
        }
        let behind = self.zone_of(x - ZONE_EDGE_MARGIN);
        if behind != front {
            return (front, Some(behind));
        }
        (front, None)
    }

    pub fn register(&mut self, id: UnitId, unit_type: UnitType, side: Side, x: f64, width: f64) {
        self.unregister(id);
        let (front, rear) = self.zones_for(x, width);
        let membership = ZoneMembership { side, unit_type, front, rear };
        for zone in membership.zones() {
            self.zones[zone].insert(side, unit_type, id);
        }
        self.membership.insert(id, membership);
    }

    /// Recompute membership after a move. Only zones that actually changed
    /// are touched. Returns true if membership changed.
    pub fn update(&mut self, id: UnitId, x: f64, width: f64) -> bool {
        let Some(old) = self.membership.get(&id).copied() else {
            return false;
        };
        let (front, rear) = self.zones_for(x, width);
        if front == old.front && rear == old.rear {
            return false;
        }
        let new = ZoneMembership { front, rear, ..old };

        for zone in old.zones() {
            if !new.zones().any(|z| z == zone) {
                self.zones[zone].remove(old.side, old.unit_type, id);
            }
        }
        for zone in new.zones() {
            if !old.zones().any(|z| z == zone) {
                self.zones[zone].insert(new.side, new.unit_type, id);
            }
        }
        self.membership.insert(id, new);
        true
    }

    /// Move a unit to the other side's buckets, keeping its zones.
    pub fn set_side(&mut self, id: UnitId, side: Side) {
        let Some(old) = self.membership.get(&id).copied() else {
            return;
        };
        if old.side == side {
            return;
        }
        for zone in old.zones() {
            self.zones[zone].remove(old.side, old.unit_type, id);
            self.zones[zone].insert(side, old.unit_type, id);
        }
        self.membership.insert(id, ZoneMembership { side, ..old });
    }

    pub fn unregister(&mut self, id: UnitId) -> bool {
        let Some(old) = self.membership.remove(&id) else {
            return false;
        };
        for zone in old.zones() {
            self.zones[zone].remove(old.side, old.unit_type, id);
        }
        true
    }

    pub fn membership(&self, id: UnitId) -> Option<&ZoneMembership> {
        self.membership.get(&id)
    }

    /// Units of a type in one zone, ascending by id. `group` is absolute:
    /// `Enemy` means the enemy side, not "opposed to the caller".
    pub fn query_zone(&self, zone: usize, group: FactionGroup, unit_type: UnitType) -> Vec<UnitId> {
        let Some(zone) = self.zones.get(zone) else {
            return Vec::new();
        };
        let bucket = |side: Side| zone.buckets.get(&(side, unit_type)).into_iter().flatten().copied();
        match group {
            FactionGroup::Friendly => bucket(Side::Friendly).collect(),
            FactionGroup::Enemy => bucket(Side::Enemy).collect(),
            FactionGroup::All => {
                let mut ids: Vec<UnitId> = bucket(Side::Friendly).chain(bucket(Side::Enemy)).collect();
                ids.sort_unstable();
                ids
            }
        }
    }

    pub fn len(&self) -> usize {
        self.membership.len()
    }

    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn index() -> ZoneIndex {
        ZoneIndex::new(8192.0, 512.0)
    }

    #[test]
    fn test_zone_of_clamps() {
        let zones = index();
        assert_eq!(zones.zone_count(), 16);
        assert_eq!(zones.zone_of(-50.0), 0);
        assert_eq!(zones.zone_of(0.0), 0);
        assert_eq!(zones.zone_of(511.9), 0);
        assert_eq!(zones.zone_of(512.0), 1);
        assert_eq!(zones.zone_of(99_999.0), 15);
    }

    #[test]
    fn test_near_boundary_is_multi_zone() {
        let mut zones = index();
        zones.register(UnitId(1), UnitType::Tank, Side::Friendly, 480.0, 20.0);
        let m = zones.membership(UnitId(1)).copied().unwrap();
        assert_eq!(m.front, 0);
        assert_eq!(m.rear, Some(1));
        assert!(m.is_multi_zone());

        zones.register(UnitId(2), UnitType::Tank, Side::Friendly, 520.0, 20.0);
        let m = zones.membership(UnitId(2)).copied().unwrap();
        assert_eq!((m.front, m.rear), (1, Some(0)));

        zones.register(UnitId(3), UnitType::Tank, Side::Friendly, 200.0, 20.0);
        assert!(!zones.membership(UnitId(3)).unwrap().is_multi_zone());
    }

    #[test]
    fn test_query_by_side_and_type() {
        let mut zones = index();
        zones.register(UnitId(1), UnitType::Tank, Side::Friendly, 100.0, 20.0);
        zones.register(UnitId(2), UnitType::Tank, Side::Enemy, 120.0, 20.0);
        zones.register(UnitId(3), UnitType::Van, Side::Enemy, 140.0, 20.0);

        assert_eq!(zones.query_zone(0, FactionGroup::Friendly, UnitType::Tank), vec![UnitId(1)]);
        assert_eq!(zones.query_zone(0, FactionGroup::Enemy, UnitType::Tank), vec![UnitId(2)]);
        assert_eq!(
            zones.query_zone(0, FactionGroup::All, UnitType::Tank),
            vec![UnitId(1), UnitId(2)]
        );
        assert!(zones.query_zone(1, FactionGroup::All, UnitType::Tank).is_empty());
        assert!(zones.query_zone(99, FactionGroup::All, UnitType::Tank).is_empty());
    }

    #[test]
    fn test_update_moves_between_zones() {
        let mut zones = index();
        zones.register(UnitId(1), UnitType::Helicopter, Side::Enemy, 100.0, 48.0);
        assert!(!zones.update(UnitId(1), 110.0, 48.0));
        assert!(zones.update(UnitId(1), 1100.0, 48.0));
        assert!(zones.query_zone(0, FactionGroup::Enemy, UnitType::Helicopter).is_empty());
        assert_eq!(
            zones.query_zone(2, FactionGroup::Enemy, UnitType::Helicopter),
            vec![UnitId(1)]
        );
    }

    #[test]
    fn test_unregister_and_side_change() {
        let mut zones = index();
        zones.register(UnitId(1), UnitType::Bunker, Side::Enemy, 490.0, 51.0);
        zones.set_side(UnitId(1), Side::Friendly);
        assert!(zones.query_zone(0, FactionGroup::Enemy, UnitType::Bunker).is_empty());
        assert_eq!(zones.query_zone(1, FactionGroup::Friendly, UnitType::Bunker), vec![UnitId(1)]);

        assert!(zones.unregister(UnitId(1)));
        assert!(!zones.unregister(UnitId(1)));
        assert!(zones.is_empty());
        assert!(zones.query_zone(0, FactionGroup::All, UnitType::Bunker).is_empty());
    }

    proptest! {
        #[test]
        fn membership_tracks_current_position(
            moves in proptest::collection::vec((0.0f64..8192.0, 1.0f64..120.0), 1..40)
        ) {
            let mut zones = index();
            let id = UnitId(7);
            zones.register(id, UnitType::Tank, Side::Enemy, 0.0, 10.0);
            for &(x, width) in &moves {
                zones.update(id, x, width);
            }
            let (x, width) = *moves.last().unwrap();
            let expected = zones.zones_for(x, width);
            let m = *zones.membership(id).unwrap();
            prop_assert_eq!((m.front, m.rear), expected);

            // The unit is listed in exactly its member zones.
            for zone in 0..zones.zone_count() {
                let listed = zones.query_zone(zone, FactionGroup::Enemy, UnitType::Tank).contains(&id);
                prop_assert_eq!(listed, m.zones().any(|z| z == zone));
            }
        }
    }
}

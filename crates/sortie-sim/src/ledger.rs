//! Per-target bomb quota bookkeeping.
//!
//! An entry counts bombs committed against one target (or, with area
//! ordnance, one group of infantry). When the count reaches the target's
//! limit no further bombs may be committed until an outcome releases one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sortie_core::components::TimerHandle;
use sortie_core::constants::INFANTRY_GROUP_WIDTH;
use sortie_core::enums::Side;
use sortie_core::types::UnitId;

use crate::registry::UnitView;
use crate::timers::{Scheduler, TimerCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerKey {
    Unit { id: UnitId },
    /// Foot soldiers within one horizontal bucket share a quota.
    InfantryGroup { side: Side, bucket: i64 },
}

impl LedgerKey {
    pub fn for_target(target: &UnitView, area_ordnance: bool) -> Self {
        if area_ordnance && target.unit_type.is_infantry() {
            let bucket = (target.kinematics.center().x / INFANTRY_GROUP_WIDTH).floor() as i64;
            Self::InfantryGroup { side: target.allegiance.side(), bucket }
        } else {
            Self::Unit { id: target.id }
        }
    }

    /// Quota for the key. Infantry groups take one bomb at a time.
    pub fn limit(&self, target: &UnitView) -> Option<u32> {
        match self {
            Self::Unit { .. } => target.unit_type.bomb_limit(),
            Self::InfantryGroup { .. } => Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub count: u32,
    /// `None` means unlimited.
    pub limit: Option<u32>,
    pub pending_clear: Option<TimerHandle>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BombLedger {
    entries: BTreeMap<LedgerKey, LedgerEntry>,
}

impl BombLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether one more bomb may be committed against `key`.
    pub fn can_add(&self, key: LedgerKey, limit: Option<u32>) -> bool {
        match self.entries.get(&key) {
            Some(entry) => entry.limit.map_or(true, |max| entry.count < max),
            None => limit.map_or(true, |max| max > 0),
        }
    }

    /// Commit a bomb. Creates the entry on first use and cancels any pending
    /// clear. Returns false, changing nothing, when the quota is full.
    pub fn add(&mut self, key: LedgerKey, limit: Option<u32>, scheduler: &mut Scheduler) -> bool {
        if !self.can_add(key, limit) {
            return false;
        }
        let entry = self.entries.entry(key).or_insert(LedgerEntry { count: 0, limit, pending_clear: None });
        if let Some(handle) = entry.pending_clear.take() {
            scheduler.cancel(handle);
        }
        entry.count += 1;
        true
    }

    /// Release one bomb. The entry is dropped when its count reaches zero.
    pub fn remove(&mut self, key: LedgerKey, scheduler: &mut Scheduler) -> bool {
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        entry.count = entry.count.saturating_sub(1);
        if entry.count == 0 {
            if let Some(handle) = entry.pending_clear {
                scheduler.cancel(handle);
            }
            self.entries.remove(&key);
        }
        true
    }

    /// Drop the whole entry after a grace period, unless a new bomb is
    /// committed first. `owner` ties the timer to the target's lifetime.
    pub fn clear_after_delay(
        &mut self,
        key: LedgerKey,
        delay: u64,
        now: u64,
        owner: Option<UnitId>,
        scheduler: &mut Scheduler,
    ) -> Option<TimerHandle> {
        let entry = self.entries.get_mut(&key)?;
        if let Some(old) = entry.pending_clear.take() {
            scheduler.cancel(old);
        }
        let handle = scheduler.schedule(now, delay, owner, TimerCommand::ClearBombEntry { key });
        entry.pending_clear = Some(handle);
        Some(handle)
    }

    /// A clear timer fired. Ignored if the entry was re-armed since.
    pub fn expire(&mut self, key: LedgerKey, handle: TimerHandle) -> bool {
        match self.entries.get(&key) {
            Some(entry) if entry.pending_clear == Some(handle) => {
                self.entries.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Remove the entry referencing a destroyed unit.
    pub fn purge_unit(&mut self, id: UnitId, scheduler: &mut Scheduler) {
        if let Some(entry) = self.entries.remove(&LedgerKey::Unit { id }) {
            if let Some(handle) = entry.pending_clear {
                scheduler.cancel(handle);
            }
        }
    }

    pub fn count(&self, key: LedgerKey) -> u32 {
        self.entries.get(&key).map_or(0, |e| e.count)
    }

    pub fn entry(&self, key: LedgerKey) -> Option<&LedgerEntry> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: LedgerKey = LedgerKey::Unit { id: UnitId(1) };

    #[test]
    fn test_stale_clear_is_ignored() {
        let mut sched = Scheduler::new();
        let mut ledger = BombLedger::new();
        ledger.add(KEY, Some(3), &mut sched);
        let stale = ledger.clear_after_delay(KEY, 10, 0, None, &mut sched).unwrap();
        let fresh = ledger.clear_after_delay(KEY, 10, 5, None, &mut sched).unwrap();

        assert!(!sched.is_pending(stale));
        assert!(!ledger.expire(KEY, stale));
        assert!(ledger.expire(KEY, fresh));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_purge_cancels_clear() {
        let mut sched = Scheduler::new();
        let mut ledger = BombLedger::new();
        ledger.add(KEY, Some(1), &mut sched);
        ledger.clear_after_delay(KEY, 10, 0, None, &mut sched);
        ledger.purge_unit(UnitId(1), &mut sched);
        assert!(ledger.is_empty());
        assert!(sched.is_empty());
    }

    proptest! {
        #[test]
        fn prop_count_tracks_adds_and_removes(limit in 1u32..6, ops in proptest::collection::vec(any::<bool>(), 0..40)) {
            let mut sched = Scheduler::new();
            let mut ledger = BombLedger::new();
            let mut model = 0u32;
            for add in ops {
                if add {
                    let accepted = ledger.add(KEY, Some(limit), &mut sched);
                    prop_assert_eq!(accepted, model < limit);
                    if accepted {
                        model += 1;
                    }
                } else {
                    let present = ledger.remove(KEY, &mut sched);
                    prop_assert_eq!(present, model > 0);
                    model = model.saturating_sub(1);
                }
                prop_assert_eq!(ledger.count(KEY), model);
                prop_assert!(ledger.count(KEY) <= limit);
                prop_assert_eq!(ledger.can_add(KEY, Some(limit)), model < limit);
                prop_assert_eq!(ledger.is_empty(), model == 0);
            }
        }
    }
}

//! Deferred-timer scheduler and named cooldowns.
//!
//! Timers are plain data: a fire tick, an optional owning unit and a tagged
//! [`TimerCommand`]. The engine drains due timers once per tick, checks the
//! owner is still alive, then applies the command. Nothing here holds a
//! closure, so pending timers can be inspected and serialized.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use sortie_core::components::{Cooldowns, TimerHandle};
use sortie_core::enums::{Cooldown, SpecialAction};
use sortie_core::types::UnitId;

use crate::ledger::LedgerKey;

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimerCommand {
    /// A cooldown ran out. Nothing to do beyond bookkeeping.
    CooldownExpired { cooldown: Cooldown },
    LaunchMissile { target: UnitId },
    Deploy { action: SpecialAction, count: u32 },
    EndRetaliation,
    ClearBombEntry { key: LedgerKey },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTimer {
    pub handle: TimerHandle,
    pub fire_tick: u64,
    pub owner: Option<UnitId>,
    pub command: TimerCommand,
}

/// Min-heap of pending timers ordered by (fire tick, schedule order).
/// Cancellation is lazy: cancelled entries stay in the heap and are skipped.
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    pending: HashMap<u64, ScheduledTimer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `command` to fire `delay` ticks after `now` (at least one).
    pub fn schedule(&mut self, now: u64, delay: u64, owner: Option<UnitId>, command: TimerCommand) -> TimerHandle {
        self.next_seq += 1;
        let seq = self.next_seq;
        let fire_tick = now + delay.max(1);
        let handle = TimerHandle(seq);
        self.heap.push(Reverse((fire_tick, seq)));
        self.pending.insert(seq, ScheduledTimer { handle, fire_tick, owner, command });
        handle
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle.0).is_some()
    }

    /// Cancel every timer owned by `owner`. Returns how many were pending.
    pub fn cancel_owner(&mut self, owner: UnitId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, t| t.owner != Some(owner));
        before - self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle.0)
    }

    /// Ticks until `handle` fires, if still pending.
    pub fn remaining(&self, handle: TimerHandle, now: u64) -> Option<u64> {
        self.pending.get(&handle.0).map(|t| t.fire_tick.saturating_sub(now))
    }

    /// Remove and return every timer due at or before `now`, in firing order.
    /// Each timer is returned at most once.
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledTimer> {
        let mut due = Vec::new();
        while let Some(&Reverse((fire_tick, seq))) = self.heap.peek() {
            if fire_tick > now {
                break;
            }
            self.heap.pop();
            if let Some(timer) = self.pending.remove(&seq) {
                due.push(timer);
            }
        }
        due
    }

    /// Pending timers, ordered by firing order.
    pub fn pending(&self) -> Vec<ScheduledTimer> {
        let mut timers: Vec<ScheduledTimer> = self.pending.values().copied().collect();
        timers.sort_by_key(|t| (t.fire_tick, t.handle));
        timers
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    // --- Named cooldowns ---

    /// Start (or restart) a named cooldown. `on_expire` runs when it ends.
    pub fn start_cooldown(
        &mut self,
        cooldowns: &mut Cooldowns,
        owner: UnitId,
        name: Cooldown,
        duration: u64,
        now: u64,
        on_expire: TimerCommand,
    ) -> TimerHandle {
        self.cancel_cooldown(cooldowns, name);
        let handle = self.schedule(now, duration, Some(owner), on_expire);
        cooldowns.active.insert(name, handle);
        handle
    }

    /// Start a cooldown whose expiry does nothing.
    pub fn start_plain_cooldown(
        &mut self,
        cooldowns: &mut Cooldowns,
        owner: UnitId,
        name: Cooldown,
        duration: u64,
        now: u64,
    ) -> TimerHandle {
        self.start_cooldown(cooldowns, owner, name, duration, now, TimerCommand::CooldownExpired { cooldown: name })
    }

    pub fn cancel_cooldown(&mut self, cooldowns: &mut Cooldowns, name: Cooldown) -> bool {
        match cooldowns.active.remove(&name) {
            Some(handle) => self.cancel(handle),
            None => false,
        }
    }

    pub fn cooldown_active(&self, cooldowns: &Cooldowns, name: Cooldown) -> bool {
        cooldowns.active.get(&name).is_some_and(|&h| self.is_pending(h))
    }

    pub fn cooldown_remaining(&self, cooldowns: &Cooldowns, name: Cooldown, now: u64) -> Option<u64> {
        cooldowns.active.get(&name).and_then(|&h| self.remaining(h, now))
    }
}

/// Drop the cooldown entry a fired timer belonged to, if any.
pub fn retire_cooldown(cooldowns: &mut Cooldowns, handle: TimerHandle) -> Option<Cooldown> {
    let name = cooldowns.active.iter().find(|(_, &h)| h == handle).map(|(&name, _)| name)?;
    cooldowns.active.remove(&name);
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_order_exactly_once() {
        let mut sched = Scheduler::new();
        let late = sched.schedule(0, 10, None, TimerCommand::EndRetaliation);
        let early = sched.schedule(0, 5, None, TimerCommand::EndRetaliation);
        let tie = sched.schedule(0, 5, None, TimerCommand::EndRetaliation);

        assert!(sched.drain_due(4).is_empty());
        let fired: Vec<_> = sched.drain_due(5).iter().map(|t| t.handle).collect();
        assert_eq!(fired, vec![early, tie]);
        assert!(sched.drain_due(5).is_empty());

        let fired: Vec<_> = sched.drain_due(100).iter().map(|t| t.handle).collect();
        assert_eq!(fired, vec![late]);
        assert!(sched.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut sched = Scheduler::new();
        sched.schedule(7, 0, None, TimerCommand::EndRetaliation);
        assert!(sched.drain_due(7).is_empty());
        assert_eq!(sched.drain_due(8).len(), 1);
    }

    #[test]
    fn test_cancel_and_cancel_owner() {
        let mut sched = Scheduler::new();
        let a = sched.schedule(0, 3, Some(UnitId(1)), TimerCommand::EndRetaliation);
        sched.schedule(0, 3, Some(UnitId(1)), TimerCommand::EndRetaliation);
        sched.schedule(0, 3, Some(UnitId(2)), TimerCommand::EndRetaliation);

        assert!(sched.cancel(a));
        assert!(!sched.cancel(a));
        assert_eq!(sched.cancel_owner(UnitId(1)), 1);
        let fired = sched.drain_due(3);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].owner, Some(UnitId(2)));
    }

    #[test]
    fn test_cooldown_lifecycle() {
        let mut sched = Scheduler::new();
        let mut cds = Cooldowns::default();
        let owner = UnitId(4);

        assert!(!sched.cooldown_active(&cds, Cooldown::MissileLaunch));
        let first = sched.start_plain_cooldown(&mut cds, owner, Cooldown::MissileLaunch, 90, 0);
        assert!(sched.cooldown_active(&cds, Cooldown::MissileLaunch));
        assert_eq!(sched.cooldown_remaining(&cds, Cooldown::MissileLaunch, 30), Some(60));

        // Restarting replaces the old timer.
        let second = sched.start_plain_cooldown(&mut cds, owner, Cooldown::MissileLaunch, 10, 0);
        assert!(!sched.is_pending(first));
        assert_eq!(sched.len(), 1);

        let fired = sched.drain_due(10);
        assert_eq!(fired.len(), 1);
        assert_eq!(retire_cooldown(&mut cds, second), Some(Cooldown::MissileLaunch));
        assert!(!sched.cooldown_active(&cds, Cooldown::MissileLaunch));
    }

    #[test]
    fn test_timer_command_serde() {
        let cmd = TimerCommand::Deploy { action: SpecialAction::Decoys, count: 3 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Deploy\""));
        let back: TimerCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }
}

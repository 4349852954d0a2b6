//! Virtual clock with cancellable delayed effects.
//!
//! Nothing here reads wall-clock time. The owner decides how far the clock
//! moves and pulls due effects one at a time, so effects that schedule
//! further effects still fire in deadline order within a single advance.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for cancelling one scheduled effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), E>,
    deadlines: HashMap<u64, Duration>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Schedules `effect` to fire `delay` after the current virtual time.
    /// Effects with equal deadlines fire in scheduling order.
    pub fn schedule(&mut self, delay: Duration, effect: E) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;

        let deadline = self.now + delay;
        self.pending.insert((deadline, seq), effect);
        self.deadlines.insert(seq, deadline);

        TimerId(seq)
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<E> {
        let deadline = self.deadlines.remove(&id.0)?;
        self.pending.remove(&(deadline, id.0))
    }

    /// Drops every pending effect and returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        dropped
    }

    /// Removes every pending effect matching `predicate`, returned in the
    /// order they would have fired.
    pub fn take_where(&mut self, mut predicate: impl FnMut(&E) -> bool) -> Vec<E> {
        let keys: Vec<(Duration, u64)> = self
            .pending
            .iter()
            .filter(|(_, effect)| predicate(*effect))
            .map(|(key, _)| *key)
            .collect();

        keys.into_iter()
            .filter_map(|key| {
                self.deadlines.remove(&key.1);
                self.pending.remove(&key)
            })
            .collect()
    }

    /// Pops the earliest effect due at or before `until`, moving the clock to
    /// its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<E> {
        let key = *self.pending.keys().next()?;
        if key.0 > until {
            return None;
        }

        self.deadlines.remove(&key.1);
        self.now = self.now.max(key.0);
        self.pending.remove(&key)
    }

    /// Moves the clock forward to `until`; never moves it backwards.
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn drain(timeline: &mut Timeline<&'static str>, until: Duration) -> Vec<&'static str> {
        let mut fired = Vec::new();
        while let Some(effect) = timeline.pop_due(until) {
            fired.push(effect);
        }
        timeline.advance_to(until);
        fired
    }

    #[test]
    fn fires_in_deadline_then_schedule_order() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(2000), "commit");
        timeline.schedule(ms(600), "modal");
        timeline.schedule(ms(600), "second-modal");

        assert_eq!(drain(&mut timeline, ms(599)), Vec::<&str>::new());
        assert_eq!(drain(&mut timeline, ms(600)), vec!["modal", "second-modal"]);
        assert_eq!(drain(&mut timeline, ms(5000)), vec!["commit"]);
        assert_eq!(timeline.now(), ms(5000));
    }

    #[test]
    fn delays_measure_from_current_time() {
        let mut timeline = Timeline::new();
        timeline.advance_to(ms(1000));
        timeline.schedule(ms(500), "later");

        assert_eq!(timeline.next_deadline(), Some(ms(1500)));
    }

    #[test]
    fn cancelled_effect_never_fires() {
        let mut timeline = Timeline::new();
        let id = timeline.schedule(ms(10), "cancelled");
        timeline.schedule(ms(20), "kept");

        assert_eq!(timeline.cancel(id), Some("cancelled"));
        assert_eq!(timeline.cancel(id), None);
        assert_eq!(drain(&mut timeline, ms(100)), vec!["kept"]);
    }

    #[test]
    fn take_where_keeps_the_rest() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(30), "commit");
        timeline.schedule(ms(10), "modal");
        timeline.schedule(ms(20), "clear");

        let taken = timeline.take_where(|effect| *effect != "clear");

        assert_eq!(taken, vec!["modal", "commit"]);
        assert_eq!(timeline.pending_len(), 1);
        assert_eq!(drain(&mut timeline, ms(100)), vec!["clear"]);
    }

    #[test]
    fn cancel_all_leaves_timeline_idle() {
        let mut timeline = Timeline::new();
        timeline.schedule(ms(10), "a");
        timeline.schedule(ms(20), "b");

        assert_eq!(timeline.cancel_all(), 2);
        assert!(timeline.is_idle());
        assert_eq!(drain(&mut timeline, ms(100)), Vec::<&str>::new());
    }
}

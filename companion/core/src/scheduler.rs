//! Deferred Effect Scheduler
//!
//! One-shot effects that should happen "a bit later" (recovering from a
//! startled wake-up, the end of a timed greeting) are queued here instead
//! of being fired from ad hoc timers.
//!
//! Each actor has a generation counter. Scheduling records the current
//! generation; anything that makes pending effects meaningless (a drag,
//! an external state change, a new greeting) bumps it. When an effect
//! comes due with an old generation it is dropped.
//!
//! ```text
//!   schedule(Pet, +1000ms, Recover)   gen(Pet)=3  ──► entry{gen: 3}
//!   pointer_down → invalidate(Pet)    gen(Pet)=4
//!   drain_due(now)                    entry.gen 3 != 4 → discarded
//! ```

use crate::actor::ActorKind;

/// Effects the engine can defer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Deferred {
    /// Leave SURPRISE and walk somewhere random
    RecoverFromSurprise,
    /// Clear the owner's timed talking flag
    StopTalking,
}

#[derive(Clone, Debug)]
struct Entry {
    due_ms: f64,
    channel: ActorKind,
    generation: u64,
    effect: Deferred,
}

/// Generation-keyed queue of deferred effects
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    pet_generation: u64,
    owner_generation: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation for an actor
    #[must_use]
    pub fn generation(&self, channel: ActorKind) -> u64 {
        match channel {
            ActorKind::Pet => self.pet_generation,
            ActorKind::Owner => self.owner_generation,
        }
    }

    /// Make every pending effect for an actor stale
    pub fn invalidate(&mut self, channel: ActorKind) {
        let generation = match channel {
            ActorKind::Pet => &mut self.pet_generation,
            ActorKind::Owner => &mut self.owner_generation,
        };
        *generation += 1;
        tracing::trace!(actor = channel.label(), generation = *generation, "Deferred effects invalidated");
    }

    /// Queue an effect to run `delay_ms` after `now_ms`
    pub fn schedule(&mut self, channel: ActorKind, now_ms: f64, delay_ms: u64, effect: Deferred) {
        self.entries.push(Entry {
            due_ms: now_ms + delay_ms as f64,
            channel,
            generation: self.generation(channel),
            effect,
        });
    }

    /// Remove and return every effect due at `now_ms`, oldest first
    ///
    /// Stale effects are discarded without being returned.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<(ActorKind, Deferred)> {
        let (mut due, pending): (Vec<Entry>, Vec<Entry>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.due_ms <= now_ms);
        self.entries = pending;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter()
            .filter(|entry| {
                let fresh = entry.generation == self.generation(entry.channel);
                if !fresh {
                    tracing::trace!(effect = ?entry.effect, "Discarding stale deferred effect");
                }
                fresh
            })
            .map(|entry| (entry.channel, entry.effect))
            .collect()
    }

    /// Number of queued effects (stale ones included until they come due)
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_fires_when_due() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ActorKind::Pet, 0.0, 1000, Deferred::RecoverFromSurprise);

        assert!(scheduler.drain_due(999.0).is_empty());
        assert_eq!(
            scheduler.drain_due(1000.0),
            vec![(ActorKind::Pet, Deferred::RecoverFromSurprise)]
        );
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_invalidated_effect_is_dropped() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ActorKind::Pet, 0.0, 1000, Deferred::RecoverFromSurprise);
        scheduler.schedule(ActorKind::Owner, 0.0, 3000, Deferred::StopTalking);
        scheduler.invalidate(ActorKind::Pet);

        assert!(scheduler.drain_due(1500.0).is_empty());
        // The owner's channel was untouched
        assert_eq!(
            scheduler.drain_due(3000.0),
            vec![(ActorKind::Owner, Deferred::StopTalking)]
        );
    }

    #[test]
    fn test_effect_scheduled_after_invalidate_survives() {
        let mut scheduler = Scheduler::new();
        scheduler.invalidate(ActorKind::Owner);
        scheduler.schedule(ActorKind::Owner, 100.0, 3000, Deferred::StopTalking);
        assert_eq!(scheduler.drain_due(3100.0).len(), 1);
    }

    #[test]
    fn test_due_effects_come_out_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ActorKind::Owner, 0.0, 3000, Deferred::StopTalking);
        scheduler.schedule(ActorKind::Pet, 0.0, 1000, Deferred::RecoverFromSurprise);
        let due = scheduler.drain_due(5000.0);
        assert_eq!(
            due,
            vec![
                (ActorKind::Pet, Deferred::RecoverFromSurprise),
                (ActorKind::Owner, Deferred::StopTalking),
            ]
        );
    }
}

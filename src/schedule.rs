/// Delayed actions keyed by the game clock.
///
/// The clock only moves when the simulation calls [`Scheduler::advance`],
/// so a paused game freezes every timer for free. Each key holds at most
/// one entry: re-scheduling a key replaces it, which rules out double
/// firing.

#[derive(Clone, Copy, Debug, PartialEq)]
enum Slot {
    Pending { due: f64 },
    Paused { remaining: f64 },
}

#[derive(Clone, Debug)]
struct Entry<K> {
    key: K,
    slot: Slot,
}

#[derive(Clone, Debug)]
pub struct Scheduler<K> {
    now: f64,
    entries: Vec<Entry<K>>,
}

impl<K> Default for Scheduler<K> {
    fn default() -> Self {
        Self {
            now: 0.0,
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> Scheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `key` to fire `delay` seconds from now, replacing any pending or
    /// paused entry for the same key.
    pub fn schedule(&mut self, key: K, delay: f32) {
        let due = self.now + f64::from(delay.max(0.0));
        self.cancel(key);
        self.entries.push(Entry {
            key,
            slot: Slot::Pending { due },
        });
    }

    pub fn cancel(&mut self, key: K) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Pending or paused.
    pub fn is_armed(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Seconds until `key` fires, counting a paused entry's frozen delay.
    pub fn remaining(&self, key: K) -> Option<f64> {
        self.entries.iter().find(|e| e.key == key).map(|e| match e.slot {
            Slot::Pending { due } => (due - self.now).max(0.0),
            Slot::Paused { remaining } => remaining,
        })
    }

    /// Freezes `key` with whatever delay it has left. Returns `false` when
    /// nothing was pending.
    pub fn pause(&mut self, key: K) -> bool {
        let now = self.now;
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                if let Slot::Pending { due } = entry.slot {
                    entry.slot = Slot::Paused {
                        remaining: (due - now).max(0.0),
                    };
                }
                true
            }
            None => false,
        }
    }

    /// Re-arms a paused `key` with its preserved delay. Returns `false` when
    /// there was no entry for it.
    pub fn resume(&mut self, key: K) -> bool {
        let now = self.now;
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                if let Slot::Paused { remaining } = entry.slot {
                    entry.slot = Slot::Pending {
                        due: now + remaining,
                    };
                }
                true
            }
            None => false,
        }
    }

    /// Moves the clock forward and takes every entry that came due, earliest
    /// first. Handlers may re-schedule the returned keys; those new entries
    /// are measured from the advanced clock.
    pub fn advance(&mut self, dt: f32) -> Vec<K> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;

        let mut due: Vec<(f64, K)> = self
            .entries
            .iter()
            .filter_map(|e| match e.slot {
                Slot::Pending { due } if due <= now => Some((due, e.key)),
                _ => None,
            })
            .collect();
        self.entries
            .retain(|e| !matches!(e.slot, Slot::Pending { due } if due <= now));

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, key)| key).collect()
    }
}

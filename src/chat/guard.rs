use ahash::RandomState;
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Entries beyond this count trigger a prune of senders whose last message
/// is already outside the interval.
const PRUNE_THRESHOLD: usize = 1024;

/// Enforces a minimum gap between accepted messages from the same sender.
/// Check-and-record happens under the entry lock for that sender, so two
/// concurrent sends from one sender cannot both pass.
pub struct SendGuard {
    interval: Duration,
    last_accepted: DashMap<String, DateTime<Utc>, RandomState>,
}

impl SendGuard {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Record a send at `now` for `sender`, or return how many milliseconds
    /// remain before the sender may send again.
    pub fn try_acquire(&self, sender: &str, now: DateTime<Utc>) -> Result<(), u64> {
        if self.last_accepted.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }
        match self.last_accepted.entry(sender.to_owned()) {
            Entry::Occupied(mut slot) => {
                // A clock that stepped backwards counts as no time elapsed.
                let elapsed = (now - *slot.get()).max(Duration::zero());
                if elapsed < self.interval {
                    let remaining = (self.interval - elapsed).num_milliseconds().max(1);
                    return Err(remaining as u64);
                }
                slot.insert(now);
                Ok(())
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                Ok(())
            }
        }
    }

    fn prune(&self, now: DateTime<Utc>) {
        let interval = self.interval;
        self.last_accepted.retain(|_, last| now - *last < interval);
    }

    pub fn tracked_senders(&self) -> usize {
        self.last_accepted.len()
    }
}

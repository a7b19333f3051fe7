//! Per-request result cache with single-flight computation.
//!
//! Entries are keyed by `(symbol, period, data version)` and expire after a
//! TTL. While one caller computes a key, later callers for the same key
//! block on a condition variable and then share the stored result. A failed
//! (or panicking) computation stores nothing; a blocked caller then runs
//! the computation itself.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use types::Period;

use crate::report::AnalysisReport;

/// Cache of complete analysis reports.
pub type AnalysisCache = ResultCache<AnalysisReport>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub period: Period,
    pub version: u64,
}

impl CacheKey {
    pub fn new(symbol: impl Into<String>, period: Period, version: u64) -> Self {
        Self {
            symbol: symbol.into(),
            period,
            version,
        }
    }
}

enum Slot<V> {
    Ready { value: Arc<V>, stored: Instant },
    Pending,
}

pub struct ResultCache<V> {
    ttl: Duration,
    slots: Mutex<HashMap<CacheKey, Slot<V>>>,
    ready: Condvar,
}

impl<V> ResultCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
            ready: Condvar::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the fresh entry for `key`, or run `compute` and store its
    /// result.
    ///
    /// At most one `compute` runs per key at a time.
    pub fn get_or_compute<E>(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        let mut slots = self.slots.lock();
        loop {
            match slots.get(&key) {
                Some(Slot::Ready { value, stored }) if stored.elapsed() < self.ttl => {
                    debug!(symbol = %key.symbol, period = %key.period, "cache hit");
                    return Ok(Arc::clone(value));
                }
                Some(Slot::Pending) => {}
                _ => break,
            }
            self.ready.wait(&mut slots);
        }
        slots.insert(key.clone(), Slot::Pending);
        drop(slots);

        debug!(symbol = %key.symbol, period = %key.period, "cache miss");
        let guard = PendingGuard {
            cache: self,
            key: &key,
            armed: true,
        };
        let value = Arc::new(compute()?);

        {
            let mut slots = self.slots.lock();
            // Older versions of this (symbol, period) can never be hit again
            slots.retain(|k, slot| match slot {
                Slot::Pending => true,
                Slot::Ready { stored, .. } => {
                    let superseded = k.symbol == key.symbol && k.period == key.period;
                    !superseded && stored.elapsed() < self.ttl
                }
            });
            slots.insert(
                key.clone(),
                Slot::Ready {
                    value: Arc::clone(&value),
                    stored: Instant::now(),
                },
            );
        }
        guard.disarm();
        self.ready.notify_all();
        Ok(value)
    }

    /// Fresh entry for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        match self.slots.lock().get(key) {
            Some(Slot::Ready { value, stored }) if stored.elapsed() < self.ttl => {
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    /// Drop every stored entry for `symbol` (any period or version).
    ///
    /// In-flight computations are left alone. Returns the number removed.
    pub fn invalidate(&self, symbol: &str) -> usize {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|key, slot| {
            matches!(slot, Slot::Pending) || !key.symbol.eq_ignore_ascii_case(symbol)
        });
        before - slots.len()
    }

    /// Drop every stored entry.
    pub fn clear(&self) {
        self.slots.lock().retain(|_, slot| matches!(slot, Slot::Pending));
    }

    /// Drop entries older than the TTL. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|_, slot| match slot {
            Slot::Ready { stored, .. } => stored.elapsed() < self.ttl,
            Slot::Pending => true,
        });
        before - slots.len()
    }

    /// Number of stored entries, fresh or expired.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> fmt::Debug for ResultCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}

/// Clears a pending slot if the computation fails or unwinds.
struct PendingGuard<'a, V> {
    cache: &'a ResultCache<V>,
    key: &'a CacheKey,
    armed: bool,
}

impl<V> PendingGuard<'_, V> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<V> Drop for PendingGuard<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slots = self.cache.slots.lock();
        if matches!(slots.get(self.key), Some(Slot::Pending)) {
            slots.remove(self.key);
        }
        drop(slots);
        self.cache.ready.notify_all();
    }
}

//! In-flight table for analysis deduplication
//!
//! One entry per key with an outstanding computation:
//! - The first caller for a key becomes the leader and starts the pipeline
//! - Later callers attach as followers and await the same outcome
//! - Retiring removes the entry; delivering on the settlement wakes every waiter
//!
//! All mutations go through a single mutex that is never held across an
//! `.await`. Outcomes are broadcast through a `watch` channel that keeps the
//! value, so a waiter that subscribed before removal always observes it.

use crate::error::AnalysisError;
use fra_model::{AnalysisResult, QueryKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Shared outcome delivered to every waiter of a key
pub type Outcome = Result<Arc<AnalysisResult>, AnalysisError>;

/// Coordination record for one outstanding computation
#[derive(Debug)]
struct InFlightEntry {
    /// Distinguishes successive computations of the same key
    generation: u64,
    /// When the computation started
    started_at: Instant,
    /// Currently attached waiters
    waiters: usize,
    /// Fan-out channel
    sender: watch::Sender<Option<Outcome>>,
}

/// How a caller joined a key
#[derive(Debug)]
pub enum Registration {
    /// Caller created the entry and must start the computation
    Leader(WaiterTicket),
    /// Caller attached to an existing computation
    Follower(WaiterTicket),
}

impl Registration {
    /// Ticket to await the outcome with
    #[inline]
    #[must_use]
    pub fn into_ticket(self) -> WaiterTicket {
        match self {
            Registration::Leader(ticket) | Registration::Follower(ticket) => ticket,
        }
    }

    /// Check if caller must start the computation
    #[inline]
    #[must_use]
    pub fn is_leader(&self) -> bool {
        matches!(self, Registration::Leader(_))
    }
}

/// Waiter count and age of a retired entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retired {
    /// Waiters attached at retirement
    pub waiters: usize,
    /// Milliseconds the entry existed
    pub age_ms: u64,
}

/// Entry removed from the table whose waiters still await an outcome
///
/// Waiters stay blocked until [`Settlement::deliver`]; a settlement dropped
/// without delivering fails them with a coordinator error.
#[derive(Debug)]
pub struct Settlement {
    sender: watch::Sender<Option<Outcome>>,
    retired: Retired,
}

impl Settlement {
    /// Waiter count and age at removal
    #[inline]
    #[must_use]
    pub fn retired(&self) -> Retired {
        self.retired
    }

    /// Wake every waiter with `outcome`
    pub fn deliver(self, outcome: Outcome) -> Retired {
        self.sender.send_replace(Some(outcome));
        self.retired
    }
}

impl From<InFlightEntry> for Settlement {
    fn from(entry: InFlightEntry) -> Self {
        Self {
            retired: Retired {
                waiters: entry.waiters,
                age_ms: entry.started_at.elapsed().as_millis() as u64,
            },
            sender: entry.sender,
        }
    }
}

/// A waiter's claim on one computation's outcome
///
/// Dropping the ticket before the outcome arrives detaches this waiter
/// only; the computation and other waiters are unaffected.
#[derive(Debug)]
pub struct WaiterTicket {
    table: Arc<InFlightTable>,
    key: QueryKey,
    generation: u64,
    receiver: watch::Receiver<Option<Outcome>>,
    finished: bool,
}

impl WaiterTicket {
    /// Key this ticket waits on
    #[inline]
    #[must_use]
    pub fn key(&self) -> QueryKey {
        self.key
    }

    /// Computation generation this ticket waits on
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Await the shared outcome
    pub async fn wait(mut self) -> Outcome {
        let outcome = match self.receiver.wait_for(Option::is_some).await {
            Ok(value) => Option::clone(&value),
            Err(_) => None,
        };
        self.finished = true;

        outcome.unwrap_or_else(|| {
            Err(AnalysisError::pipeline(
                "coordinator",
                "in-flight entry dropped without an outcome",
            ))
        })
    }
}

impl Drop for WaiterTicket {
    fn drop(&mut self) {
        if !self.finished {
            self.table.detach(self.key, self.generation);
        }
    }
}

/// Key → in-flight entry map
#[derive(Debug, Default)]
pub struct InFlightTable {
    entries: Mutex<HashMap<QueryKey, InFlightEntry>>,
    next_generation: AtomicU64,
}

impl InFlightTable {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the computation for `key`, creating it if none is outstanding
    pub fn register(self: &Arc<Self>, key: QueryKey) -> Registration {
        let mut entries = self.entries.lock();

        if let Some(entry) = entries.get_mut(&key) {
            entry.waiters += 1;
            let ticket = self.ticket(key, entry.generation, entry.sender.subscribe());
            tracing::debug!(%key, generation = entry.generation, waiters = entry.waiters, "Attached to in-flight analysis");
            return Registration::Follower(ticket);
        }

        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = watch::channel(None);
        entries.insert(
            key,
            InFlightEntry {
                generation,
                started_at: Instant::now(),
                waiters: 1,
                sender,
            },
        );

        Registration::Leader(self.ticket(key, generation, receiver))
    }

    /// Remove the entry of `key` if `generation` still owns it
    ///
    /// Returns `None` when the key was cancelled or re-registered since; the
    /// caller then discards its outcome.
    pub fn retire(&self, key: QueryKey, generation: u64) -> Option<Settlement> {
        let mut entries = self.entries.lock();
        let owned = entries
            .get(&key)
            .is_some_and(|entry| entry.generation == generation);
        if !owned {
            return None;
        }
        entries.remove(&key).map(Settlement::from)
    }

    /// Remove the entry of `key` whatever its generation
    pub fn retire_any(&self, key: QueryKey) -> Option<Settlement> {
        self.entries.lock().remove(&key).map(Settlement::from)
    }

    /// Check if a computation for `key` is outstanding
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Waiters attached to `key`
    #[must_use]
    pub fn waiters(&self, key: &QueryKey) -> usize {
        self.entries.lock().get(key).map_or(0, |e| e.waiters)
    }

    /// Outstanding computations
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing is in flight
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn ticket(
        self: &Arc<Self>,
        key: QueryKey,
        generation: u64,
        receiver: watch::Receiver<Option<Outcome>>,
    ) -> WaiterTicket {
        WaiterTicket {
            table: Arc::clone(self),
            key,
            generation,
            receiver,
            finished: false,
        }
    }

    fn detach(&self, key: QueryKey, generation: u64) {
        let mut entries = self.entries.lock();
        if let Some(entry) = entries.get_mut(&key) {
            if entry.generation == generation {
                entry.waiters = entry.waiters.saturating_sub(1);
                tracing::debug!(%key, generation, waiters = entry.waiters, "Waiter detached");
            }
        }
    }
}

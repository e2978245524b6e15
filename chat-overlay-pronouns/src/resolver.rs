//! Memoizing, non-blocking pronoun resolver.
//!
//! [`PronounResolver::lookup`] never waits on the network. The first request
//! for an author marks the entry pending and queues the fetch for a small,
//! fixed pool of `pronoun-lookup` worker threads; whatever a worker learns is
//! visible to later lookups only. Entries are never invalidated and failed
//! lookups are never retried.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use parking_lot::Mutex;

use crate::fetch::PronounFetcher;

/// Worker threads used by [`PronounResolver::new`].
pub const DEFAULT_WORKERS: usize = 2;

/// Answer to a single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PronounLookup {
    /// The author's pronoun display string is known.
    Present(String),
    /// Nothing to show right now: unset, failed, or still in flight.
    Absent,
}

/// Cached state for one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState {
    /// A fetch has been queued and has not completed.
    Pending,
    /// The fetch completed with a pronoun.
    Resolved(String),
    /// Tombstone: no pronoun set, or the fetch failed.
    Unset,
}

/// Shared author -> state map keyed by lowercased author name.
type Cache = Arc<Mutex<HashMap<String, CacheState>>>;

/// Resolves author pronouns through a [`PronounFetcher`], caching every answer.
///
/// Dropping the resolver closes the queue; workers finish their current fetch
/// and exit.
pub struct PronounResolver {
    cache: Cache,
    /// Queued plus running fetches that have not yet stored their result
    in_flight: Arc<AtomicUsize>,
    queue: mpsc::Sender<String>,
    workers: usize,
}

impl PronounResolver {
    pub fn new(fetcher: Arc<dyn PronounFetcher>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    /// Resolver with at most `workers` fetches running at once (minimum 1).
    pub fn with_workers(fetcher: Arc<dyn PronounFetcher>, workers: usize) -> Self {
        let cache: Cache = Arc::new(Mutex::new(HashMap::new()));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let (queue, jobs) = mpsc::channel::<String>();
        let jobs = Arc::new(Mutex::new(jobs));

        let mut spawned = 0;
        for index in 0..workers.max(1) {
            let fetcher = Arc::clone(&fetcher);
            let cache = Arc::clone(&cache);
            let in_flight = Arc::clone(&in_flight);
            let jobs = Arc::clone(&jobs);
            let result = std::thread::Builder::new()
                .name(format!("pronoun-lookup-{index}"))
                .spawn(move || worker_loop(fetcher.as_ref(), &cache, &in_flight, &jobs));
            match result {
                Ok(_) => spawned += 1,
                Err(e) => log::warn!("Failed to spawn pronoun lookup worker: {}", e),
            }
        }
        // With no workers the receiver is dropped here and every lookup
        // becomes a tombstone when its send fails.

        Self {
            cache,
            in_flight,
            queue,
            workers: spawned,
        }
    }

    /// Look up the pronoun for `author` without blocking.
    ///
    /// On a cache miss this queues a fetch and returns
    /// [`PronounLookup::Absent`]; the result benefits later calls only.
    pub fn lookup(&self, author: &str) -> PronounLookup {
        let key = author.trim().to_lowercase();
        if key.is_empty() {
            return PronounLookup::Absent;
        }

        {
            let mut cache = self.cache.lock();
            match cache.get(&key) {
                Some(CacheState::Resolved(display)) => {
                    return PronounLookup::Present(display.clone());
                }
                Some(CacheState::Pending | CacheState::Unset) => return PronounLookup::Absent,
                None => {
                    cache.insert(key.clone(), CacheState::Pending);
                }
            }
        }

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        if let Err(mpsc::SendError(key)) = self.queue.send(key) {
            log::warn!("No pronoun lookup worker available for {}", key);
            self.cache.lock().insert(key, CacheState::Unset);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        PronounLookup::Absent
    }

    /// Current cache state for `author`, if any lookup was ever issued.
    pub fn state(&self, author: &str) -> Option<CacheState> {
        self.cache.lock().get(&author.trim().to_lowercase()).cloned()
    }

    /// Number of fetches queued or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Number of worker threads serving the queue.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

fn worker_loop(
    fetcher: &dyn PronounFetcher,
    cache: &Mutex<HashMap<String, CacheState>>,
    in_flight: &AtomicUsize,
    jobs: &Mutex<mpsc::Receiver<String>>,
) {
    loop {
        // The guard is released before the fetch so other workers can dequeue.
        let next = jobs.lock().recv();
        let Ok(login) = next else {
            return;
        };
        let state = match fetcher.fetch(&login) {
            Ok(Some(display)) => {
                log::debug!("Pronoun for {} resolved to {}", login, display);
                CacheState::Resolved(display)
            }
            Ok(None) => CacheState::Unset,
            Err(e) => {
                log::warn!("Pronoun lookup for {} failed: {}", login, e);
                CacheState::Unset
            }
        };
        cache.lock().insert(login, state);
        in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for PronounResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PronounResolver")
            .field("cached", &self.cache.lock().len())
            .field("in_flight", &self.in_flight())
            .field("workers", &self.workers)
            .finish()
    }
}

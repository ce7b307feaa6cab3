use crate::traits::{FeedSource, Notifier};
use crate::watch::Watcher;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// How long the gate stays held after a dispatch acquires it, independent
/// of how fast the poll pipeline runs. Serializes poll starts against the
/// upstream source without blocking on slow deliveries.
pub const GATE_HOLD: Duration = Duration::from_millis(2_000);

/// A dispatch that finds the gate held retries after this much time per
/// queue position.
pub const QUEUE_RETRY_STEP: Duration = Duration::from_millis(2_000);

/// The single-flight gate and its contention queue depth. Both counters
/// are shared across every in-flight timer, so updates go through
/// compare-and-set.
#[derive(Debug, Default)]
struct Gate {
    locked: AtomicBool,
    queued: AtomicUsize,
}

impl Gate {
    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn release(&self) {
        self.locked.store(false, Ordering::SeqCst);
    }

    /// Registers one deferred dispatch and returns its queue position.
    fn enqueue(&self) -> usize {
        self.queued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Drops one queued attempt, saturating at zero.
    fn dequeue(&self) {
        let _ = self
            .queued
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
                depth.checked_sub(1)
            });
    }
}

struct Inner<S, N> {
    source: S,
    notifier: N,
    watchers: HashMap<String, Mutex<Watcher>>,
    gate: Gate,
}

/// Owns the scheduling loop across all watchers: per-subreddit timers, the
/// global single-flight gate, and the overflow delay queue. Each watcher is
/// rescheduled after its own pipeline completes, so slow polls self-throttle
/// instead of overlapping.
pub struct Dispatcher<S, N> {
    inner: Arc<Inner<S, N>>,
}

impl<S, N> Clone for Dispatcher<S, N> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, N> Dispatcher<S, N>
where
    S: FeedSource + 'static,
    N: Notifier + 'static,
{
    pub fn new(watchers: Vec<Watcher>, source: S, notifier: N) -> Self {
        let watchers = watchers
            .into_iter()
            .map(|watcher| (watcher.subreddit.clone(), Mutex::new(watcher)))
            .collect();

        Self {
            inner: Arc::new(Inner {
                source,
                notifier,
                watchers,
                gate: Gate::default(),
            }),
        }
    }

    /// Schedules the first poll of every enabled watcher. Disabled watchers
    /// stay in memory but never enter the timer loop.
    pub async fn start(&self) {
        for (subreddit, cell) in &self.inner.watchers {
            let watcher = cell.lock().await;
            if !watcher.enabled {
                info!("r/{}: disabled, not scheduling", subreddit);
                continue;
            }
            info!(
                "r/{}: scheduling first poll in {}ms",
                subreddit,
                watcher.interval.as_millis()
            );
            self.schedule_dispatch(subreddit.clone(), watcher.interval);
        }
    }

    fn schedule_dispatch(&self, subreddit: String, delay: Duration) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.dispatch(subreddit).await;
        });
    }

    async fn dispatch(&self, subreddit: String) {
        let Some(cell) = self.inner.watchers.get(&subreddit) else {
            return;
        };
        // Timers are never retracted, so a watcher disabled after being
        // scheduled lands here and completes as a no-op.
        if !cell.lock().await.enabled {
            return;
        }

        if self.inner.gate.try_acquire() {
            self.inner.gate.dequeue();

            let held = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(GATE_HOLD).await;
                held.inner.gate.release();
            });

            let this = self.clone();
            tokio::spawn(async move {
                let interval = {
                    let Some(cell) = this.inner.watchers.get(&subreddit) else {
                        return;
                    };
                    let mut watcher = cell.lock().await;
                    watcher.check(&this.inner.source, &this.inner.notifier).await;
                    watcher.interval
                };
                // Reschedule from completion, not from trigger time.
                this.schedule_dispatch(subreddit, interval);
            });
        } else {
            let position = self.inner.gate.enqueue();
            debug!(
                "r/{}: gate held, retrying at queue position {}",
                subreddit, position
            );
            self.schedule_dispatch(subreddit, QUEUE_RETRY_STEP * position as u32);
        }
    }
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::Candle;
use crate::replay::{Replay, Tick};

/// Shortest accepted tick period; tokio intervals reject zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Shared stop flag between a replay task and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives revealed candles.
///
/// The token is passed along so a sink guarding shared state can re-check it after taking its
/// own lock; an owner that cancels and then takes the same lock is guaranteed no later writes.
pub trait ReplaySink: Send + 'static {
    fn reveal(&mut self, candle: &Candle, cancel: &CancelToken);
}

impl<F> ReplaySink for F
where
    F: FnMut(&Candle, &CancelToken) + Send + 'static,
{
    fn reveal(&mut self, candle: &Candle, cancel: &CancelToken) {
        self(candle, cancel)
    }
}

/// A running replay timer.
///
/// The timer stops by itself once the slice is revealed; [`ReplayHandle::cancel`] (or dropping
/// the handle) stops it early.
pub struct ReplayHandle {
    cancel: CancelToken,
    ticks: Arc<AtomicUsize>,
    task: Option<JoinHandle<()>>,
}

impl ReplayHandle {
    /// Starts ticking every `period`, the first reveal one period after the call. A zero period
    /// is raised to 1 ms.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<S: ReplaySink>(mut replay: Replay, period: Duration, mut sink: S) -> Self {
        let cancel = CancelToken::new();
        let ticks = Arc::new(AtomicUsize::new(0));

        let token = cancel.clone();
        let counter = ticks.clone();
        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period.max(MIN_PERIOD));
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick of a tokio interval completes immediately
            timer.tick().await;
            loop {
                timer.tick().await;
                if token.is_cancelled() {
                    break;
                }
                match replay.tick() {
                    Tick::Reveal(batch) => {
                        for candle in &batch {
                            sink.reveal(candle, &token);
                        }
                        counter.fetch_add(1, Ordering::SeqCst);
                        if replay.is_finished() {
                            break;
                        }
                    }
                    Tick::Finished => break,
                }
            }
            tracing::debug!(
                ticks = counter.load(Ordering::SeqCst),
                cancelled = token.is_cancelled(),
                "replay timer cleared"
            );
        });

        Self {
            cancel,
            ticks,
            task: Some(task),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Ticks that revealed at least one candle.
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stops the timer and raises the cancel token.
    pub fn cancel(&self) {
        self.cancel.cancel();
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Waits for the timer to clear, whether by completion or cancellation.
    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            // a cancelled task reports JoinError::Cancelled, which is expected here
            let _ = task.await;
        }
    }
}

impl Drop for ReplayHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

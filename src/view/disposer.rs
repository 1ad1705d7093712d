use std::sync::{Arc, Mutex};

use crate::chart::{ChartAdapter, ChartBackend, SubscriptionId};
use crate::internal::lock::lock;
use crate::overlay::{OverlaySynchronizer, ResizeRegistration};
use crate::replay::ReplayHandle;

/// Everything a mounted trade view must release, handed back by setup and consumed once by
/// teardown.
///
/// Release order: stop the replay timer, detach resize and chart subscriptions, then remove the
/// overlay elements. Failures while detaching are logged and swallowed.
pub struct Disposer<B: ChartBackend> {
    chart: Arc<Mutex<ChartAdapter<B>>>,
    subscriptions: Vec<SubscriptionId>,
    replay: Option<ReplayHandle>,
    resize: Option<ResizeRegistration>,
    overlay: Option<Arc<OverlaySynchronizer>>,
}

impl<B: ChartBackend> Disposer<B> {
    pub(crate) fn new(chart: Arc<Mutex<ChartAdapter<B>>>) -> Self {
        Self {
            chart,
            subscriptions: Vec::new(),
            replay: None,
            resize: None,
            overlay: None,
        }
    }

    pub(crate) fn subscriptions(mut self, ids: Vec<SubscriptionId>) -> Self {
        self.subscriptions = ids;
        self
    }

    pub(crate) fn replay(mut self, handle: ReplayHandle) -> Self {
        self.replay = Some(handle);
        self
    }

    pub(crate) fn resize(mut self, registration: ResizeRegistration) -> Self {
        self.resize = Some(registration);
        self
    }

    pub(crate) fn overlay(mut self, overlay: Arc<OverlaySynchronizer>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub(crate) fn replay_handle(&self) -> Option<&ReplayHandle> {
        self.replay.as_ref()
    }

    pub fn dispose(mut self) {
        if let Some(replay) = self.replay.take() {
            replay.cancel();
        }
        if let Some(registration) = self.resize.take() {
            registration.unregister();
        }
        {
            let mut chart = lock(&self.chart);
            for id in self.subscriptions.drain(..) {
                if let Err(e) = chart.unsubscribe(id) {
                    tracing::debug!(error = %e, subscription = id.0, "ignoring unsubscribe failure");
                }
            }
        }
        if let Some(overlay) = self.overlay.take() {
            overlay.release();
        }
    }
}

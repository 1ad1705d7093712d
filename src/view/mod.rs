//! Mountable chart views: the animated trade view and the plain candle/volume views.

mod disposer;
mod setup;
mod static_view;

pub use disposer::Disposer;
pub use setup::TradeSetup;
pub use static_view::{LinkedView, StaticView};

use std::sync::{Arc, Mutex};

use crate::chart::options::{DOWN_COLOR, UP_COLOR};
use crate::chart::{ChartAdapter, ChartBackend, Marker, MarkerPosition, MarkerShape, Point, Size};
use crate::core::{Candle, PriceSeries, TvClient, TvError};
use crate::ingest::SeriesBuilder;
use crate::internal::lock::lock;
use crate::overlay::{Layer, OverlaySynchronizer, ResizeDispatcher, TradeLevels};
use crate::replay::{CancelToken, Replay, ReplayHandle, ReplayPlan};

/// Candle chart that replays a trade with a take-profit/stop-loss overlay.
///
/// Mounting creates the chart, loads the data, draws the candles before the buy point, starts
/// the replay timer and keeps the overlay aligned on every chart event and window resize.
/// [`TradeView::unmount`] (also run on drop) releases all of it once.
pub struct TradeView<B: ChartBackend + 'static> {
    chart: Arc<Mutex<ChartAdapter<B>>>,
    layer: Arc<Mutex<Layer>>,
    overlay: Option<Arc<OverlaySynchronizer>>,
    plan: Option<ReplayPlan>,
    disposer: Option<Disposer<B>>,
}

impl<B: ChartBackend + 'static> TradeView<B> {
    /// Fetches the client's data file and mounts the view.
    ///
    /// A failed fetch is logged and leaves an empty chart; it never fails the mount.
    #[tracing::instrument(skip_all)]
    pub async fn mount(
        client: &TvClient,
        backend: B,
        setup: TradeSetup,
        resize: &ResizeDispatcher,
    ) -> Self {
        let chart = ChartAdapter::new(backend, setup.theme);
        match SeriesBuilder::new(client).fetch().await {
            Ok(series) => Self::assemble(chart, series, &setup, resize),
            Err(e) => {
                tracing::error!(error = %e, "error loading CSV");
                Self::bare(chart)
            }
        }
    }

    /// Mounts over already loaded data.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime while the data fits a replay plan, since the
    /// replay timer is spawned onto the current runtime.
    pub fn with_series(
        backend: B,
        series: PriceSeries,
        setup: &TradeSetup,
        resize: &ResizeDispatcher,
    ) -> Self {
        Self::assemble(ChartAdapter::new(backend, setup.theme), series, setup, resize)
    }

    fn bare(chart: ChartAdapter<B>) -> Self {
        Self {
            chart: Arc::new(Mutex::new(chart)),
            layer: Arc::new(Mutex::new(Layer::new())),
            overlay: None,
            plan: None,
            disposer: None,
        }
    }

    fn assemble(
        mut chart: ChartAdapter<B>,
        series: PriceSeries,
        setup: &TradeSetup,
        resize: &ResizeDispatcher,
    ) -> Self {
        let (plan, levels) = match trade_levels(&series, setup) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, candles = series.len(), "no trade overlay; drawing static chart");
                chart.bind(&series);
                return Self::bare(chart);
            }
        };

        let PriceSeries { candles, volumes } = series;
        let replay = Replay::new(candles, plan);
        chart.bind_candles(replay.initial());
        chart.bind_volume(&volumes);
        chart.set_markers(&[
            Marker {
                time: levels.entry_time,
                position: MarkerPosition::BelowBar,
                color: UP_COLOR,
                shape: MarkerShape::ArrowUp,
                text: "Buy".into(),
            },
            Marker {
                time: levels.exit_time,
                position: MarkerPosition::AboveBar,
                color: DOWN_COLOR,
                shape: MarkerShape::ArrowDown,
                text: "Sell".into(),
            },
        ]);

        let mut view = Self::bare(chart);
        let overlay = OverlaySynchronizer::mount(view.layer.clone(), levels, setup.overlay);

        let subscriptions = {
            let mut chart = lock(&view.chart);
            let ids = overlay.attach(&mut *chart);
            overlay.sync(&chart.projector());
            ids
        };

        let registration = {
            let chart = Arc::downgrade(&view.chart);
            let overlay = overlay.clone();
            resize.register(move |size: Size| {
                let Some(chart) = chart.upgrade() else {
                    return;
                };
                let mut chart = lock(&chart);
                chart.backend_mut().set_size(size);
                overlay.sync(&chart.projector());
            })
        };

        let replay = {
            let chart = view.chart.clone();
            ReplayHandle::spawn(replay, setup.tick, move |candle: &Candle, cancel: &CancelToken| {
                let mut chart = lock(&chart);
                if cancel.is_cancelled() || chart.is_removed() {
                    return;
                }
                if let Err(e) = chart.push_candle(candle) {
                    tracing::debug!(error = %e, "replay candle rejected");
                }
            })
        };

        view.disposer = Some(
            Disposer::new(view.chart.clone())
                .subscriptions(subscriptions)
                .resize(registration)
                .replay(replay)
                .overlay(overlay.clone()),
        );
        view.overlay = Some(overlay);
        view.plan = Some(plan);
        view
    }

    /// Runs `f` against the chart under its lock.
    pub fn with_chart<R>(&self, f: impl FnOnce(&mut ChartAdapter<B>) -> R) -> R {
        f(&mut lock(&self.chart))
    }

    /// Runs `f` against the overlay layer under its lock.
    pub fn with_layer<R>(&self, f: impl FnOnce(&Layer) -> R) -> R {
        f(&lock(&self.layer))
    }

    pub fn overlay(&self) -> Option<&Arc<OverlaySynchronizer>> {
        self.overlay.as_ref()
    }

    pub fn plan(&self) -> Option<ReplayPlan> {
        self.plan
    }

    pub fn is_mounted(&self) -> bool {
        self.disposer.is_some()
    }

    /// Whether the replay timer has cleared. `true` when there is no replay.
    pub fn replay_finished(&self) -> bool {
        self.disposer
            .as_ref()
            .and_then(Disposer::replay_handle)
            .is_none_or(ReplayHandle::is_finished)
    }

    /// Ticks the replay timer has delivered so far.
    pub fn replay_ticks(&self) -> usize {
        self.disposer
            .as_ref()
            .and_then(Disposer::replay_handle)
            .map_or(0, ReplayHandle::ticks)
    }

    /* ---------------- user input ---------------- */

    pub fn pan(&self, bars: f64) {
        self.with_chart(|c| c.backend_mut().scroll_by(bars));
    }

    pub fn zoom(&self, factor: f64) {
        self.with_chart(|c| c.backend_mut().zoom(factor));
    }

    pub fn move_crosshair(&self, point: Option<Point>) {
        self.with_chart(|c| c.backend_mut().move_crosshair(point));
    }

    /// Cancels the replay, detaches every subscription, removes the overlay and the chart.
    /// Later calls do nothing.
    pub fn unmount(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer.dispose();
        }
        let mut chart = lock(&self.chart);
        if !chart.is_removed() {
            chart.remove();
        }
    }
}

impl<B: ChartBackend + 'static> Drop for TradeView<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Resolves the replay plan and the trade levels it implies.
fn trade_levels(series: &PriceSeries, setup: &TradeSetup) -> Result<(ReplayPlan, TradeLevels), TvError> {
    if setup.tick.is_zero() {
        return Err(TvError::Plan("replay tick period must be non-zero".into()));
    }
    let plan = ReplayPlan::from_offsets(series.len(), setup.buy_offset, setup.sell_offset)?;
    let buy = &series.candles[plan.buy_index()];
    let sell = &series.candles[plan.sell_index()];
    let (Some(entry_time), Some(exit_time)) = (buy.chart_date(), sell.chart_date()) else {
        return Err(TvError::Plan("buy or sell candle has no valid date".into()));
    };
    let levels = TradeLevels::from_entry(
        buy.close,
        setup.take_profit_ratio,
        setup.stop_loss_ratio,
        entry_time,
        exit_time,
    );
    Ok((plan, levels))
}

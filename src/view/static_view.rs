use std::sync::{Arc, Mutex};

use crate::chart::{ChartAdapter, ChartBackend, LinkedCharts, Theme};
use crate::core::{PriceSeries, TvClient};
use crate::ingest::SeriesBuilder;
use crate::internal::lock::lock;
use crate::overlay::{ResizeDispatcher, ResizeRegistration};

/// Candles with volume pinned to the bottom of the same chart. No overlay, no replay.
pub struct StaticView<B: ChartBackend> {
    chart: ChartAdapter<B>,
}

impl<B: ChartBackend> StaticView<B> {
    /// Fetches the client's data file and binds it. A failed fetch is logged and leaves the chart empty.
    #[tracing::instrument(skip_all)]
    pub async fn mount(client: &TvClient, backend: B, theme: Theme) -> Self {
        let mut chart = ChartAdapter::new(backend, theme);
        match SeriesBuilder::new(client).fetch().await {
            Ok(series) => chart.bind(&series),
            Err(e) => tracing::error!(error = %e, "error loading CSV"),
        }
        Self { chart }
    }

    pub fn with_series(backend: B, theme: Theme, series: &PriceSeries) -> Self {
        let mut chart = ChartAdapter::new(backend, theme);
        chart.bind(series);
        Self { chart }
    }

    pub fn chart(&self) -> &ChartAdapter<B> {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartAdapter<B> {
        &mut self.chart
    }
}

impl<B: ChartBackend> Drop for StaticView<B> {
    fn drop(&mut self) {
        if !self.chart.is_removed() {
            self.chart.remove();
        }
    }
}

/// Light-theme price and volume charts with linked visible ranges that follow window width.
pub struct LinkedView<B: ChartBackend + 'static> {
    charts: Arc<Mutex<LinkedCharts<B>>>,
    registration: Option<ResizeRegistration>,
}

impl<B: ChartBackend + 'static> LinkedView<B> {
    /// Fetches the client's data file and binds it to both panes. A failed fetch is logged and
    /// leaves both charts empty.
    #[tracing::instrument(skip_all)]
    pub async fn mount(client: &TvClient, price: B, volume: B, resize: &ResizeDispatcher) -> Self {
        let mut charts = LinkedCharts::new(price, volume, Theme::Light);
        match SeriesBuilder::new(client).fetch().await {
            Ok(series) => charts.bind(&series),
            Err(e) => tracing::error!(error = %e, "error loading CSV"),
        }
        Self::wire(charts, resize)
    }

    pub fn with_series(price: B, volume: B, series: &PriceSeries, resize: &ResizeDispatcher) -> Self {
        let mut charts = LinkedCharts::new(price, volume, Theme::Light);
        charts.bind(series);
        Self::wire(charts, resize)
    }

    fn wire(charts: LinkedCharts<B>, resize: &ResizeDispatcher) -> Self {
        let charts = Arc::new(Mutex::new(charts));
        let weak = Arc::downgrade(&charts);
        let registration = resize.register(move |size| {
            if let Some(charts) = weak.upgrade() {
                lock(&charts).resize(size.width);
            }
        });
        Self {
            charts,
            registration: Some(registration),
        }
    }

    pub fn with_charts<R>(&self, f: impl FnOnce(&mut LinkedCharts<B>) -> R) -> R {
        f(&mut lock(&self.charts))
    }

    /// Detaches the resize listener and removes both charts. Later calls do nothing.
    pub fn unmount(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.unregister();
            lock(&self.charts).remove();
        }
    }
}

impl<B: ChartBackend + 'static> Drop for LinkedView<B> {
    fn drop(&mut self) {
        self.unmount();
    }
}

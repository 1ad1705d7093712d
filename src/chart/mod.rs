//! Chart adapter: builds a themed candle + volume chart on a [`ChartBackend`] and exposes the
//! projections and subscriptions the overlay depends on.

pub mod backend;
mod linked;
pub mod options;
mod viewport;

pub use backend::{
    ChartBackend, ChartBar, ChartCandle, ChartEvent, Handler, Marker, MarkerPosition, MarkerShape,
    Point, Projection, SeriesId, Size, SubscriptionId, TimeRange,
};
pub use linked::{LinkedCharts, Pane};
pub use options::{
    CandleStyle, ChartOptions, Color, CrosshairMode, HistogramStyle, ScaleMargins, Theme,
};
pub use viewport::ViewportChart;

use std::sync::Arc;

use crate::core::{Candle, ChartDate, PriceSeries, TvError, VolumeBar};

/// Coordinate queries against the adapter's candle series.
///
/// This is all the overlay needs from a chart.
pub trait Projector {
    fn price_to_pixel(&self, price: f64) -> Option<f64>;
    fn time_to_pixel(&self, time: ChartDate) -> Option<f64>;
    fn container_size(&self) -> Size;
}

/// A [`Projection`] bound to one series.
#[derive(Clone, Copy)]
pub struct SeriesProjector<'a> {
    surface: &'a dyn Projection,
    series: Option<SeriesId>,
}

impl<'a> SeriesProjector<'a> {
    pub fn new(surface: &'a dyn Projection, series: Option<SeriesId>) -> Self {
        Self { surface, series }
    }
}

impl Projector for SeriesProjector<'_> {
    fn price_to_pixel(&self, price: f64) -> Option<f64> {
        self.surface
            .price_to_coordinate(self.series?, price)
            .filter(|y| !y.is_nan())
    }

    fn time_to_pixel(&self, time: ChartDate) -> Option<f64> {
        self.surface.time_to_coordinate(time).filter(|x| !x.is_nan())
    }

    fn container_size(&self) -> Size {
        self.surface.container_size()
    }
}

/// Owns a chart surface and its candle/volume series.
pub struct ChartAdapter<B> {
    backend: B,
    theme: Theme,
    candles: Option<SeriesId>,
    volume: Option<SeriesId>,
}

impl<B: ChartBackend> ChartAdapter<B> {
    /// Candles on the right scale with volume pinned to the bottom 15% of the same pane.
    pub fn new(backend: B, theme: Theme) -> Self {
        let mut adapter = Self::bare(backend, theme);
        adapter.candles = Some(adapter.backend.add_candlestick_series(CandleStyle::default()));
        let volume = adapter
            .backend
            .add_histogram_series(HistogramStyle::volume_overlay());
        adapter.backend.set_scale_margins(volume, ScaleMargins::VOLUME);
        adapter.volume = Some(volume);
        adapter
    }

    /// Candles only.
    pub fn price_pane(backend: B, theme: Theme) -> Self {
        let mut adapter = Self::bare(backend, theme);
        adapter.candles = Some(adapter.backend.add_candlestick_series(CandleStyle::default()));
        adapter
    }

    /// Volume only, on the right scale of its own chart.
    pub fn volume_pane(backend: B, theme: Theme) -> Self {
        let mut adapter = Self::bare(backend, theme);
        adapter.volume = Some(adapter.backend.add_histogram_series(HistogramStyle::volume_pane()));
        adapter
    }

    fn bare(mut backend: B, theme: Theme) -> Self {
        backend.apply_options(&ChartOptions::themed(theme));
        Self {
            backend,
            theme,
            candles: None,
            volume: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn candle_series(&self) -> Option<SeriesId> {
        self.candles
    }

    pub fn volume_series(&self) -> Option<SeriesId> {
        self.volume
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /* ---------------- data binding ---------------- */

    /// Binds every candle and volume bar.
    pub fn bind(&mut self, series: &PriceSeries) {
        self.bind_candles(&series.candles);
        self.bind_volume(&series.volumes);
    }

    /// Replaces the candle data. Rows without a valid time are skipped.
    pub fn bind_candles(&mut self, candles: &[Candle]) {
        if let Some(id) = self.candles {
            let data: Vec<ChartCandle> = candles.iter().filter_map(to_chart_candle).collect();
            self.backend.set_candles(id, &data);
        }
    }

    /// Replaces the volume data, colouring each bar by its direction.
    pub fn bind_volume(&mut self, volumes: &[VolumeBar]) {
        if let Some(id) = self.volume {
            let data: Vec<ChartBar> = volumes.iter().filter_map(to_chart_bar).collect();
            self.backend.set_histogram(id, &data);
        }
    }

    /// Appends (or replaces the last) candle.
    ///
    /// # Errors
    ///
    /// Fails if the candle has no valid time or the surface rejects the update.
    pub fn push_candle(&mut self, candle: &Candle) -> Result<(), TvError> {
        let id = self
            .candles
            .ok_or_else(|| TvError::Chart("no candle series".into()))?;
        let bar = to_chart_candle(candle)
            .ok_or_else(|| TvError::Chart("candle has no valid time".into()))?;
        self.backend.update_candle(id, bar)
    }

    pub fn set_markers(&mut self, markers: &[Marker]) {
        if let Some(id) = self.candles {
            self.backend.set_markers(id, markers);
        }
    }

    /* ---------------- projections ---------------- */

    pub fn projector(&self) -> SeriesProjector<'_> {
        SeriesProjector::new(&self.backend, self.candles)
    }

    pub fn price_to_pixel(&self, price: f64) -> Option<f64> {
        self.projector().price_to_pixel(price)
    }

    pub fn time_to_pixel(&self, time: ChartDate) -> Option<f64> {
        self.projector().time_to_pixel(time)
    }

    /* ---------------- subscriptions ---------------- */

    /// Registers `f` for `event`; it receives a projector bound to the candle series.
    pub fn subscribe<F>(&mut self, event: ChartEvent, f: F) -> SubscriptionId
    where
        F: Fn(&dyn Projector) + Send + Sync + 'static,
    {
        let series = self.candles;
        let handler: Handler = Arc::new(move |surface: &dyn Projection| {
            f(&SeriesProjector::new(surface, series));
        });
        self.backend.subscribe(event, handler)
    }

    pub fn on_size_change<F>(&mut self, f: F) -> SubscriptionId
    where
        F: Fn(&dyn Projector) + Send + Sync + 'static,
    {
        self.subscribe(ChartEvent::SizeChange, f)
    }

    pub fn on_visible_range_change<F>(&mut self, f: F) -> SubscriptionId
    where
        F: Fn(&dyn Projector) + Send + Sync + 'static,
    {
        self.subscribe(ChartEvent::VisibleRangeChange, f)
    }

    pub fn on_crosshair_move<F>(&mut self, f: F) -> SubscriptionId
    where
        F: Fn(&dyn Projector) + Send + Sync + 'static,
    {
        self.subscribe(ChartEvent::CrosshairMove, f)
    }

    /// # Errors
    ///
    /// Propagates the surface's refusal (unknown id, removed chart).
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TvError> {
        self.backend.unsubscribe(id)
    }

    pub fn remove(&mut self) {
        self.backend.remove();
    }

    pub fn is_removed(&self) -> bool {
        self.backend.is_removed()
    }
}

fn to_chart_candle(c: &Candle) -> Option<ChartCandle> {
    Some(ChartCandle {
        time: c.chart_date()?,
        open: c.open,
        high: c.high,
        low: c.low,
        close: c.close,
    })
}

fn to_chart_bar(v: &VolumeBar) -> Option<ChartBar> {
    Some(ChartBar {
        time: v.chart_date()?,
        value: v.value,
        color: Some(options::volume_color(v.color)),
    })
}

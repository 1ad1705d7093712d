//! The seam to the charting surface.
//!
//! Everything the crate needs from a chart is expressed by [`ChartBackend`]: series factories,
//! data binding, the price/time projections and event subscriptions. [`ViewportChart`]
//! implements it in-process; an embedding that drives a real rendering surface implements it
//! over that surface instead.
//!
//! [`ViewportChart`]: crate::chart::ViewportChart

use std::sync::Arc;

use serde::Serialize;

use crate::chart::options::{CandleStyle, ChartOptions, Color, HistogramStyle, ScaleMargins};
use crate::core::{ChartDate, TvError};

/// Handle to a series registered on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(pub u32);

/// Handle to an event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// Events the overlay listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartEvent {
    SizeChange,
    VisibleRangeChange,
    CrosshairMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub from: ChartDate,
    pub to: ChartDate,
}

/// A candle keyed by calendar day, as bound to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartCandle {
    pub time: ChartDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A histogram bar keyed by calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub time: ChartDate,
    pub value: f64,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerShape {
    ArrowUp,
    ArrowDown,
}

/// An annotation drawn by the surface next to a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub time: ChartDate,
    pub position: MarkerPosition,
    pub color: Color,
    pub shape: MarkerShape,
    pub text: String,
}

/// Read-only coordinate queries.
///
/// Every projection may return `None` when the requested price or day is outside the current
/// viewport. Callers hide whatever depends on it; `None` is never a zero.
pub trait Projection {
    fn price_to_coordinate(&self, series: SeriesId, price: f64) -> Option<f64>;
    fn time_to_coordinate(&self, time: ChartDate) -> Option<f64>;
    fn container_size(&self) -> Size;
}

/// Event callback. Runs synchronously after the surface has applied the change that caused it.
pub type Handler = Arc<dyn Fn(&dyn Projection) + Send + Sync>;

/// An imperative charting surface.
pub trait ChartBackend: Projection + Send {
    fn apply_options(&mut self, options: &ChartOptions);

    fn add_candlestick_series(&mut self, style: CandleStyle) -> SeriesId;
    fn add_histogram_series(&mut self, style: HistogramStyle) -> SeriesId;
    fn set_scale_margins(&mut self, series: SeriesId, margins: ScaleMargins);

    /// Replaces all data of a candle series. Data is expected in ascending day order.
    fn set_candles(&mut self, series: SeriesId, data: &[ChartCandle]);
    /// Replaces the last bar when `bar.time` equals it, appends when newer.
    ///
    /// # Errors
    ///
    /// Fails for a bar older than the last one, an unknown series, or a removed surface.
    fn update_candle(&mut self, series: SeriesId, bar: ChartCandle) -> Result<(), TvError>;
    fn set_histogram(&mut self, series: SeriesId, data: &[ChartBar]);
    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]);

    fn subscribe(&mut self, event: ChartEvent, handler: Handler) -> SubscriptionId;
    /// # Errors
    ///
    /// Fails for an unknown id or a removed surface.
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TvError>;

    fn visible_time_range(&self) -> Option<TimeRange>;
    fn set_visible_time_range(&mut self, range: TimeRange);

    /* user input forwarded by the host */
    fn set_size(&mut self, size: Size);
    /// Pans by a number of bars; positive moves towards newer data.
    fn scroll_by(&mut self, bars: f64);
    /// Multiplies the bar spacing, anchored at the right edge.
    fn zoom(&mut self, factor: f64);
    fn move_crosshair(&mut self, point: Option<Point>);

    /// Detaches the surface. Later mutations are ignored and projections return `None`.
    fn remove(&mut self);
    fn is_removed(&self) -> bool;
}

//! An in-process chart surface with real viewport math.
//!
//! The time axis is a sequence of logical bar slots, one per distinct day across all series,
//! laid out right-to-left from the right edge at a fixed bar spacing. Each series auto-scales
//! its prices to the bars currently in view, inside its scale margins.

use std::collections::BTreeMap;

use crate::chart::backend::{
    ChartBackend, ChartBar, ChartCandle, ChartEvent, Handler, Marker, Point, Projection, SeriesId,
    Size, SubscriptionId, TimeRange,
};
use crate::chart::options::{CandleStyle, ChartOptions, HistogramStyle, ScaleMargins};
use crate::core::{ChartDate, TvError};

const DEFAULT_BAR_SPACING: f64 = 6.0;
const MIN_BAR_SPACING: f64 = 0.5;
const MAX_BAR_SPACING: f64 = 50.0;
/// Slack when rounding fractional slot bounds, so a range set from whole bars reads back intact.
const SLOT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
enum SeriesData {
    Candles(Vec<ChartCandle>),
    Histogram(Vec<ChartBar>),
}

#[derive(Debug, Clone)]
enum SeriesStyle {
    Candles(CandleStyle),
    Histogram(HistogramStyle),
}

#[derive(Debug, Clone)]
struct SeriesEntry {
    style: SeriesStyle,
    data: SeriesData,
    margins: ScaleMargins,
    markers: Vec<Marker>,
}

impl SeriesEntry {
    fn days(&self) -> Box<dyn Iterator<Item = ChartDate> + '_> {
        match &self.data {
            SeriesData::Candles(c) => Box::new(c.iter().map(|b| b.time)),
            SeriesData::Histogram(h) => Box::new(h.iter().map(|b| b.time)),
        }
    }
}

/// Headless [`ChartBackend`].
pub struct ViewportChart {
    size: Size,
    options: Option<ChartOptions>,
    series: BTreeMap<SeriesId, SeriesEntry>,
    next_series: u32,
    days: Vec<ChartDate>,
    bar_spacing: f64,
    right_offset: f64,
    crosshair: Option<Point>,
    handlers: BTreeMap<SubscriptionId, (ChartEvent, Handler)>,
    next_subscription: u64,
    removed: bool,
}

impl ViewportChart {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            options: None,
            series: BTreeMap::new(),
            next_series: 0,
            days: Vec::new(),
            bar_spacing: DEFAULT_BAR_SPACING,
            right_offset: 0.0,
            crosshair: None,
            handlers: BTreeMap::new(),
            next_subscription: 0,
            removed: false,
        }
    }

    pub fn options(&self) -> Option<&ChartOptions> {
        self.options.as_ref()
    }

    pub fn bar_spacing(&self) -> f64 {
        self.bar_spacing
    }

    pub fn crosshair(&self) -> Option<Point> {
        self.crosshair
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.handlers.len()
    }

    /// Distinct days across all series, ascending.
    pub fn days(&self) -> &[ChartDate] {
        &self.days
    }

    pub fn candles(&self, series: SeriesId) -> Option<&[ChartCandle]> {
        match &self.series.get(&series)?.data {
            SeriesData::Candles(c) => Some(c),
            SeriesData::Histogram(_) => None,
        }
    }

    pub fn histogram(&self, series: SeriesId) -> Option<&[ChartBar]> {
        match &self.series.get(&series)?.data {
            SeriesData::Histogram(h) => Some(h),
            SeriesData::Candles(_) => None,
        }
    }

    pub fn markers(&self, series: SeriesId) -> &[Marker] {
        self.series.get(&series).map(|s| s.markers.as_slice()).unwrap_or(&[])
    }

    pub fn scale_margins(&self, series: SeriesId) -> Option<ScaleMargins> {
        self.series.get(&series).map(|s| s.margins)
    }

    pub fn histogram_style(&self, series: SeriesId) -> Option<&HistogramStyle> {
        match &self.series.get(&series)?.style {
            SeriesStyle::Histogram(s) => Some(s),
            SeriesStyle::Candles(_) => None,
        }
    }

    /* ---------------- viewport math ---------------- */

    fn last_index(&self) -> f64 {
        self.days.len() as f64 - 1.0
    }

    fn right_edge(&self) -> f64 {
        self.last_index() + self.right_offset
    }

    fn visible_bars(&self) -> f64 {
        self.size.width / self.bar_spacing
    }

    /// Logical (fractional) slot range currently in view.
    fn visible_logical(&self) -> (f64, f64) {
        let to = self.right_edge();
        (to - self.visible_bars() + 1.0, to)
    }

    fn slot_x(&self, slot: f64) -> f64 {
        self.size.width - (self.right_edge() - slot + 0.5) * self.bar_spacing
    }

    fn visible_slots(&self) -> Option<(usize, usize)> {
        if self.days.is_empty() {
            return None;
        }
        let (from, to) = self.visible_logical();
        let lo = (from - SLOT_EPSILON).ceil().max(0.0);
        let hi = (to + SLOT_EPSILON).floor().min(self.last_index());
        if lo > hi {
            return None;
        }
        Some((lo as usize, hi as usize))
    }

    fn slot_of(&self, day: ChartDate) -> Option<usize> {
        self.days.binary_search(&day).ok()
    }

    /// Price extent of a series over the visible slots, padded when flat.
    fn price_extent(&self, entry: &SeriesEntry) -> Option<(f64, f64)> {
        let (lo, hi) = self.visible_slots()?;
        let in_view = |day: ChartDate| self.slot_of(day).is_some_and(|s| s >= lo && s <= hi);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        match &entry.data {
            SeriesData::Candles(bars) => {
                for b in bars.iter().filter(|b| in_view(b.time)) {
                    for v in [b.low, b.high] {
                        if v.is_finite() {
                            min = min.min(v);
                            max = max.max(v);
                        }
                    }
                }
            }
            SeriesData::Histogram(bars) => {
                for b in bars.iter().filter(|b| in_view(b.time) && b.value.is_finite()) {
                    min = min.min(b.value.min(0.0));
                    max = max.max(b.value);
                }
            }
        }
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        if max - min < f64::EPSILON {
            let pad = max.abs().max(1.0) * 0.005;
            min -= pad;
            max += pad;
        }
        Some((min, max))
    }

    fn rebuild_days(&mut self) {
        let mut days: Vec<ChartDate> = self.series.values().flat_map(|s| s.days()).collect();
        days.sort_unstable();
        days.dedup();
        self.days = days;
    }

    fn fire(&self, event: ChartEvent) {
        for (kind, handler) in self.handlers.values() {
            if *kind == event {
                handler(self);
            }
        }
    }

    fn add_series(&mut self, style: SeriesStyle, data: SeriesData, margins: ScaleMargins) -> SeriesId {
        let id = SeriesId(self.next_series);
        self.next_series += 1;
        self.series.insert(
            id,
            SeriesEntry {
                style,
                data,
                margins,
                markers: Vec::new(),
            },
        );
        id
    }
}

impl Projection for ViewportChart {
    fn price_to_coordinate(&self, series: SeriesId, price: f64) -> Option<f64> {
        if self.removed || !price.is_finite() {
            return None;
        }
        let entry = self.series.get(&series)?;
        let (min, max) = self.price_extent(entry)?;
        let top = self.size.height * entry.margins.top;
        let inner = self.size.height * (1.0 - entry.margins.top - entry.margins.bottom);
        let y = top + (max - price) / (max - min) * inner;
        (0.0..=self.size.height).contains(&y).then_some(y)
    }

    fn time_to_coordinate(&self, time: ChartDate) -> Option<f64> {
        if self.removed {
            return None;
        }
        let slot = self.slot_of(time)?;
        let x = self.slot_x(slot as f64);
        (0.0..=self.size.width).contains(&x).then_some(x)
    }

    fn container_size(&self) -> Size {
        self.size
    }
}

impl ChartBackend for ViewportChart {
    fn apply_options(&mut self, options: &ChartOptions) {
        self.options = Some(options.clone());
    }

    fn add_candlestick_series(&mut self, style: CandleStyle) -> SeriesId {
        self.add_series(
            SeriesStyle::Candles(style),
            SeriesData::Candles(Vec::new()),
            ScaleMargins::default(),
        )
    }

    fn add_histogram_series(&mut self, style: HistogramStyle) -> SeriesId {
        self.add_series(
            SeriesStyle::Histogram(style),
            SeriesData::Histogram(Vec::new()),
            ScaleMargins::default(),
        )
    }

    fn set_scale_margins(&mut self, series: SeriesId, margins: ScaleMargins) {
        if let Some(entry) = self.series.get_mut(&series) {
            entry.margins = margins;
        }
    }

    fn set_candles(&mut self, series: SeriesId, data: &[ChartCandle]) {
        if self.removed {
            return;
        }
        if let Some(entry) = self.series.get_mut(&series) {
            entry.data = SeriesData::Candles(data.to_vec());
            self.rebuild_days();
            self.fire(ChartEvent::VisibleRangeChange);
        }
    }

    fn update_candle(&mut self, series: SeriesId, bar: ChartCandle) -> Result<(), TvError> {
        if self.removed {
            return Err(TvError::Chart("chart has been removed".into()));
        }
        let entry = self
            .series
            .get_mut(&series)
            .ok_or_else(|| TvError::Chart(format!("unknown series {}", series.0)))?;
        let SeriesData::Candles(bars) = &mut entry.data else {
            return Err(TvError::Chart(format!("series {} is not a candle series", series.0)));
        };

        match bars.last_mut() {
            Some(last) if last.time == bar.time => *last = bar,
            Some(last) if last.time > bar.time => {
                return Err(TvError::Chart(format!(
                    "cannot update {} before last bar {}",
                    bar.time, last.time
                )));
            }
            _ => bars.push(bar),
        }

        if self.slot_of(bar.time).is_none() {
            self.rebuild_days();
        }
        // a new bar can move both the time axis and the auto-scaled price range
        self.fire(ChartEvent::VisibleRangeChange);
        Ok(())
    }

    fn set_histogram(&mut self, series: SeriesId, data: &[ChartBar]) {
        if self.removed {
            return;
        }
        if let Some(entry) = self.series.get_mut(&series) {
            entry.data = SeriesData::Histogram(data.to_vec());
            self.rebuild_days();
            self.fire(ChartEvent::VisibleRangeChange);
        }
    }

    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]) {
        if let Some(entry) = self.series.get_mut(&series) {
            entry.markers = markers.to_vec();
        }
    }

    fn subscribe(&mut self, event: ChartEvent, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        if !self.removed {
            self.handlers.insert(id, (event, handler));
        }
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TvError> {
        if self.removed {
            return Err(TvError::Chart("chart has been removed".into()));
        }
        self.handlers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| TvError::Chart(format!("unknown subscription {}", id.0)))
    }

    fn visible_time_range(&self) -> Option<TimeRange> {
        let (lo, hi) = self.visible_slots()?;
        Some(TimeRange {
            from: self.days[lo],
            to: self.days[hi],
        })
    }

    fn set_visible_time_range(&mut self, range: TimeRange) {
        if self.removed || self.days.is_empty() {
            return;
        }
        let from = self.days.partition_point(|d| *d < range.from);
        let to = self.days.partition_point(|d| *d <= range.to);
        if to == 0 || to <= from {
            return;
        }
        let to = to - 1;
        let bars = (to - from + 1) as f64;
        self.bar_spacing = (self.size.width / bars).clamp(MIN_BAR_SPACING, MAX_BAR_SPACING);
        self.right_offset = to as f64 - self.last_index();
        self.fire(ChartEvent::VisibleRangeChange);
    }

    fn set_size(&mut self, size: Size) {
        if self.removed || size == self.size {
            return;
        }
        self.size = size;
        self.fire(ChartEvent::SizeChange);
        self.fire(ChartEvent::VisibleRangeChange);
    }

    fn scroll_by(&mut self, bars: f64) {
        if self.removed || !bars.is_finite() {
            return;
        }
        let min = -self.last_index().max(0.0);
        let max = self.visible_bars().max(0.0);
        self.right_offset = (self.right_offset + bars).clamp(min, max);
        self.fire(ChartEvent::VisibleRangeChange);
    }

    fn zoom(&mut self, factor: f64) {
        if self.removed || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.bar_spacing = (self.bar_spacing * factor).clamp(MIN_BAR_SPACING, MAX_BAR_SPACING);
        self.fire(ChartEvent::VisibleRangeChange);
    }

    fn move_crosshair(&mut self, point: Option<Point>) {
        if self.removed {
            return;
        }
        self.crosshair = point;
        self.fire(ChartEvent::CrosshairMove);
    }

    fn remove(&mut self) {
        self.removed = true;
        self.handlers.clear();
        self.series.clear();
        self.days.clear();
    }

    fn is_removed(&self) -> bool {
        self.removed
    }
}

#![allow(dead_code)]

use httpmock::{Method::GET, Mock, MockServer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{fs, path::Path, time::Duration};
use tradeview_rs::chart::{
    CandleStyle, ChartBackend, ChartBar, ChartCandle, ChartEvent, ChartOptions, Handler,
    HistogramStyle, Marker, Point, Projection, ScaleMargins, SeriesId, SubscriptionId, TimeRange,
};
use tradeview_rs::{ChartDate, PriceSeries, Size, TvClient, TvError, ViewportChart, parse_csv};
use url::Url;

pub const DATA_PATH: &str = "/data.csv";

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn mock_csv<'a>(server: &'a MockServer, path: &'a str, body: String) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("content-type", "text/csv")
            .body(body);
    })
}

pub fn mock_status<'a>(server: &'a MockServer, path: &'a str, status: u16) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(status).body("nope");
    })
}

pub fn client_for(server: &MockServer) -> TvClient {
    TvClient::builder()
        .base_url(Url::parse(&server.base_url()).unwrap())
        .build()
        .unwrap()
}

pub fn cached_client_for(server: &MockServer) -> TvClient {
    TvClient::builder()
        .base_url(Url::parse(&server.base_url()).unwrap())
        .cache_ttl(Duration::from_secs(60))
        .build()
        .unwrap()
}

/// `rows` daily candles from 2020-01-01, drifting upwards with every third candle bearish.
pub fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from("Date,Close,High,Low,Open,Volume\n");
    let start = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    for i in 0..rows {
        let day = start + chrono::Duration::days(i as i64);
        let open = 100.0 + i as f64 * 0.5;
        let close = if i % 3 == 0 { open - 0.4 } else { open + 0.6 };
        let high = open.max(close) + 1.0;
        let low = open.min(close) - 1.0;
        let volume = 1_000 + i * 10;
        out.push_str(&format!(
            "{},{close:.2},{high:.2},{low:.2},{open:.2},{volume}\n",
            day.format("%Y-%m-%d")
        ));
    }
    out
}

pub fn synthetic_series(rows: usize) -> PriceSeries {
    parse_csv(&synthetic_csv(rows)).unwrap()
}

pub fn viewport() -> ViewportChart {
    ViewportChart::new(Size::new(800.0, 500.0))
}

/// A [`ViewportChart`] that counts every incremental candle write it receives.
pub struct CountingChart {
    inner: ViewportChart,
    updates: Arc<AtomicUsize>,
}

impl CountingChart {
    pub fn new(inner: ViewportChart) -> (Self, Arc<AtomicUsize>) {
        let updates = Arc::new(AtomicUsize::new(0));
        (
            Self {
                inner,
                updates: updates.clone(),
            },
            updates,
        )
    }
}

impl Projection for CountingChart {
    fn price_to_coordinate(&self, series: SeriesId, price: f64) -> Option<f64> {
        self.inner.price_to_coordinate(series, price)
    }
    fn time_to_coordinate(&self, time: ChartDate) -> Option<f64> {
        self.inner.time_to_coordinate(time)
    }
    fn container_size(&self) -> Size {
        self.inner.container_size()
    }
}

impl ChartBackend for CountingChart {
    fn apply_options(&mut self, options: &ChartOptions) {
        self.inner.apply_options(options)
    }
    fn add_candlestick_series(&mut self, style: CandleStyle) -> SeriesId {
        self.inner.add_candlestick_series(style)
    }
    fn add_histogram_series(&mut self, style: HistogramStyle) -> SeriesId {
        self.inner.add_histogram_series(style)
    }
    fn set_scale_margins(&mut self, series: SeriesId, margins: ScaleMargins) {
        self.inner.set_scale_margins(series, margins)
    }
    fn set_candles(&mut self, series: SeriesId, data: &[ChartCandle]) {
        self.inner.set_candles(series, data)
    }
    fn update_candle(&mut self, series: SeriesId, bar: ChartCandle) -> Result<(), TvError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_candle(series, bar)
    }
    fn set_histogram(&mut self, series: SeriesId, data: &[ChartBar]) {
        self.inner.set_histogram(series, data)
    }
    fn set_markers(&mut self, series: SeriesId, markers: &[Marker]) {
        self.inner.set_markers(series, markers)
    }
    fn subscribe(&mut self, event: ChartEvent, handler: Handler) -> SubscriptionId {
        self.inner.subscribe(event, handler)
    }
    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), TvError> {
        self.inner.unsubscribe(id)
    }
    fn visible_time_range(&self) -> Option<TimeRange> {
        self.inner.visible_time_range()
    }
    fn set_visible_time_range(&mut self, range: TimeRange) {
        self.inner.set_visible_time_range(range)
    }
    fn set_size(&mut self, size: Size) {
        self.inner.set_size(size)
    }
    fn scroll_by(&mut self, bars: f64) {
        self.inner.scroll_by(bars)
    }
    fn zoom(&mut self, factor: f64) {
        self.inner.zoom(factor)
    }
    fn move_crosshair(&mut self, point: Option<Point>) {
        self.inner.move_crosshair(point)
    }
    fn remove(&mut self) {
        self.inner.remove()
    }
    fn is_removed(&self) -> bool {
        self.inner.is_removed()
    }
}

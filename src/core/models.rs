use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;

/// Seconds since the Unix epoch (UTC).
pub type EpochSeconds = i64;

/* ----- PRICE DATA (shared by ingest/, chart/, replay/) ----- */

/// One OHLC row.
///
/// `time` is `None` when the source date cell could not be parsed. Such rows are kept so the
/// candle and volume sequences stay index-aligned with the input; chart surfaces skip them.
/// Prices are not validated and may be `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candle {
    pub time: Option<EpochSeconds>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// Up when the bar closed at or above its open.
    pub fn direction(&self) -> Direction {
        Direction::of(self.open, self.close)
    }

    /// Calendar day the chart surface indexes this candle by.
    pub fn chart_date(&self) -> Option<ChartDate> {
        self.time.and_then(ChartDate::from_epoch)
    }
}

/// One volume histogram bar, sharing the time keyspace of its [`Candle`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeBar {
    pub time: Option<EpochSeconds>,
    pub value: f64,
    pub color: Direction,
}

impl VolumeBar {
    pub fn chart_date(&self) -> Option<ChartDate> {
        self.time.and_then(ChartDate::from_epoch)
    }
}

/// Colour tag of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` iff `close >= open`. Any `NaN` operand yields `Down`.
    pub fn of(open: f64, close: f64) -> Self {
        if close >= open {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Calendar projection of an epoch timestamp at UTC.
///
/// Time of day is discarded: two timestamps on the same UTC day map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ChartDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl ChartDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Projects epoch seconds onto the UTC calendar. `None` outside chrono's representable range.
    pub fn from_epoch(ts: EpochSeconds) -> Option<Self> {
        let dt = DateTime::from_timestamp(ts, 0)?;
        Some(Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
        })
    }

    /// Midnight UTC of this day, or `None` for an impossible date.
    pub fn to_epoch(self) -> Option<EpochSeconds> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp())
    }
}

impl std::fmt::Display for ChartDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Parallel, index-aligned candle and volume sequences as produced by the ingestor.
///
/// Loaded once per view mount and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    pub candles: Vec<Candle>,
    pub volumes: Vec<VolumeBar>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

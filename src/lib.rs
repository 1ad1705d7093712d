//! tradeview-rs: headless trade-replay charts.
//!
//! Loads an OHLCV CSV, binds it to a chart surface, replays the last stretch of price action
//! one candle per tick and keeps a take-profit/stop-loss overlay aligned with the chart's pixel
//! space through pans, zooms, resizes and crosshair moves.

pub mod chart;
pub mod core;
pub mod form;
pub mod ingest;
pub(crate) mod internal {
    pub(crate) mod lock;
}
pub mod overlay;
pub mod replay;
pub mod view;

pub use chart::{ChartAdapter, ChartBackend, Projector, Size, Theme, ViewportChart};
pub use crate::core::{Candle, ChartDate, Direction, PriceSeries, TvClient, TvError, VolumeBar};
pub use form::SignupForm;
pub use ingest::{SeriesBuilder, parse_csv};
pub use overlay::{OverlayConfig, OverlaySynchronizer, ResizeDispatcher, SplitPolicy, TradeLevels};
pub use replay::{Replay, ReplayHandle, ReplayPlan};
pub use view::{LinkedView, StaticView, TradeSetup, TradeView};

/// Installs a `tracing` subscriber honouring `RUST_LOG` (default `info`). Later calls are no-ops.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

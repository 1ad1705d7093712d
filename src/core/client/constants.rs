//! Centralized constants for default endpoints and UA.

pub(crate) const USER_AGENT: &str = concat!("tradeview-rs/", env!("CARGO_PKG_VERSION"));

/// Origin the static data file is served from.
pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:3000/";

/// Path of the OHLCV file, resolved against the base URL.
pub(crate) const DEFAULT_DATA_PATH: &str = "/data.csv";

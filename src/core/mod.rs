//! Core components of the `tradeview-rs` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The [`TvClient`] used to fetch price data, and its builder.
//! - The primary [`TvError`] type.
//! - Shared data models like [`Candle`], [`VolumeBar`] and [`ChartDate`].

/// The client (`TvClient`), builder, and configuration.
pub mod client;
/// The primary error type (`TvError`) for the crate.
pub mod error;
/// Shared data models used by the ingestor, chart adapter and replay animator.
pub mod models;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::TvClient`
pub use client::{CacheMode, TvClient, TvClientBuilder};
pub use error::TvError;
pub use models::{Candle, ChartDate, Direction, EpochSeconds, PriceSeries, VolumeBar};

//! CSV ingestor: turns a static OHLCV file into index-aligned candle and volume sequences.

mod date;
mod parse;

pub use date::parse_date;
pub use parse::parse_csv;

use std::path::Path;

use crate::core::{CacheMode, PriceSeries, TvClient, TvError};

/// A builder for fetching and parsing the OHLCV file served next to the chart page.
#[derive(Clone)]
pub struct SeriesBuilder {
    #[doc(hidden)]
    pub(crate) client: TvClient,
    #[doc(hidden)]
    pub(crate) path: Option<String>,
    #[doc(hidden)]
    pub(crate) cache_mode: CacheMode,
}

impl SeriesBuilder {
    /// Creates a builder that fetches the client's configured data path.
    pub fn new(client: &TvClient) -> Self {
        Self {
            client: client.clone(),
            path: None,
            cache_mode: CacheMode::Use,
        }
    }

    /// Fetch a different file, resolved against the client's base URL.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the cache mode for this specific fetch.
    pub fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// Downloads and parses the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built, the request fails, the server answers with a
    /// non-success status, or the body cannot be split into CSV records. Malformed cells are not
    /// errors.
    #[tracing::instrument(skip(self), err)]
    pub async fn fetch(self) -> Result<PriceSeries, TvError> {
        let url = match &self.path {
            Some(p) => self.client.resolve(p)?,
            None => self.client.data_url()?,
        };

        if self.cache_mode == CacheMode::Use
            && let Some(body) = self.client.cache_get(&url).await
        {
            return parse_csv(&body);
        }

        let resp = self.client.http().get(url.clone()).send().await?;
        let body = crate::core::net::get_text(resp).await?;

        if self.cache_mode != CacheMode::Bypass {
            self.client.cache_put(&url, &body).await;
        }

        parse_csv(&body)
    }
}

/// Reads and parses an OHLCV file from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or split into CSV records.
pub fn load_path(path: impl AsRef<Path>) -> Result<PriceSeries, TvError> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text)
}

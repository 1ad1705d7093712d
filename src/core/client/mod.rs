//! Public client surface + builder.
//! Endpoint defaults live in `constants`.

mod constants;

use crate::core::TvError;
use constants::{DEFAULT_BASE_URL, DEFAULT_DATA_PATH, USER_AGENT};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

/// Defines the behavior of the in-memory cache for a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Read from the cache if a non-expired entry is present; otherwise, fetch from the network
    /// and write the response to the cache. (Default)
    #[default]
    Use,
    /// Always fetch from the network, bypassing any cached entry, and write the new response to the cache.
    Refresh,
    /// Always fetch from the network and do not read from or write to the cache.
    Bypass,
}

#[derive(Debug)]
struct CacheEntry {
    body: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheStore {
    map: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

/// HTTP client used to fetch the static OHLCV file.
///
/// Cheap to clone; clones share the connection pool and the optional body cache.
#[derive(Debug, Clone)]
pub struct TvClient {
    http: Client,
    base_url: Url,
    data_path: String,
    cache: Option<Arc<CacheStore>>,
}

impl TvClient {
    /// Create a new builder.
    pub fn builder() -> TvClientBuilder {
        TvClientBuilder::default()
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a path (absolute or relative) against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, TvError> {
        Ok(self.base_url.join(path)?)
    }

    /// The configured OHLCV file URL.
    pub fn data_url(&self) -> Result<Url, TvError> {
        self.resolve(&self.data_path)
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub(crate) async fn cache_get(&self, url: &Url) -> Option<String> {
        let store = self.cache.as_ref()?;
        let guard = store.map.read().await;
        if let Some(entry) = guard.get(url.as_str())
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.body.clone());
        }
        None
    }

    pub(crate) async fn cache_put(&self, url: &Url, body: &str) {
        let Some(store) = self.cache.as_ref() else {
            return;
        };
        let entry = CacheEntry {
            body: body.to_string(),
            expires_at: Instant::now() + store.default_ttl,
        };
        store.map.write().await.insert(url.as_str().to_string(), entry);
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct TvClientBuilder {
    user_agent: Option<String>,
    base_url: Option<Url>,
    data_path: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
}

impl TvClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the origin the data file is served from (e.g., `http://localhost:3000/`).
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Override the data file path. Default: `/data.csv`.
    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Enable in-memory caching of fetched bodies with a default TTL.
    /// If not set, caching is disabled.
    pub fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    pub fn build(self) -> Result<TvClient, TvError> {
        let base_url = match self.base_url {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));
        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        Ok(TvClient {
            http: httpb.build()?,
            base_url,
            data_path: self.data_path.unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
            cache: self.cache_ttl.map(|ttl| {
                Arc::new(CacheStore {
                    map: RwLock::new(HashMap::new()),
                    default_ttl: ttl,
                })
            }),
        })
    }
}

use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum TvError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Reading a local data file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader could not split the input into records.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// A replay plan does not fit the loaded data (e.g. offsets larger than the series).
    #[error("invalid replay plan: {0}")]
    Plan(String),

    /// The chart surface rejected an operation (e.g. it was already removed).
    #[error("chart error: {0}")]
    Chart(String),
}

// Error kinds shared by the client and the CLI. The library returns
// `ShareError`; the binary wraps it in `anyhow` with context.

use thiserror::Error;

/// Every failure is fatal for the current invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum ShareError {
    /// Bad input from the command line (missing argument, empty secret,
    /// unusable base URL).
    #[error("{0}")]
    Usage(String),
    /// Transport failure or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),
    /// Something we expected in a response page is not there. This is also
    /// how an expired or already consumed link shows up.
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ShareError>;

impl From<reqwest::Error> for ShareError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            return ShareError::Network(format!(
                "could not connect to {}: {}",
                err.url().map(|u| u.as_str()).unwrap_or("service"),
                err
            ));
        }
        match err.status() {
            Some(status) => ShareError::Network(format!(
                "{} returned {}",
                err.url().map(|u| u.as_str()).unwrap_or("request"),
                status
            )),
            None => ShareError::Network(err.to_string()),
        }
    }
}

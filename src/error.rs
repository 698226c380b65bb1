use thiserror::Error;

/// Failure talking to one of the upstream HTTP APIs.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout, or non-2xx status.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The completion API could not produce an answer.
#[derive(Debug, Error)]
#[error("completion failed: {0}")]
pub struct CompletionError(#[from] pub FetchError);

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        Self(FetchError::Transport(err))
    }
}

/// Startup configuration problems. Fatal: nothing is built when one occurs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to create HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

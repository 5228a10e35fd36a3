use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure (connect, TLS, timeout) before a response
    /// arrived. Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The response body did not match the endpoint's schema.
    #[error("malformed response: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

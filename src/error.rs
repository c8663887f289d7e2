use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Login and token-refresh errors.
///
/// A failed refresh never clobbers a previously stored token, so callers can
/// keep using the old one until it actually expires upstream.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("login rejected (HTTP {status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("login response has no token: {detail}")]
    MissingToken { detail: String },

    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Errors from authenticated seller-API calls.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Still unauthorized after one forced token refresh. The URL is
    /// pre-redacted (`token=***`).
    #[error("unauthorized after token refresh: {url}")]
    Unauthorized { url: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// 2xx response that is not the JSON payload we asked for. The upstream
    /// occasionally serves an HTML error page with a 200 status.
    #[error("non-JSON response (HTTP {status}, {content_type}): {snippet}")]
    Protocol {
        status: u16,
        content_type: String,
        snippet: String,
    },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, Error>;

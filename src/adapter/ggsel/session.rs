//! Signed-auth session: token acquisition, caching, and refresh.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use tracing::{debug, info};

use super::dto::{LoginRequest, LoginResponse};
use super::sign::login_signature;
use crate::config::GgselConfig;
use crate::domain::truncate;
use crate::error::{AuthError, ConfigError};

/// Refresh this long before the server-side expiry.
const REFRESH_MARGIN: i64 = 30;
/// Assumed token lifetime when the server does not say.
const DEFAULT_TOKEN_TTL: i64 = 1800;
/// How much of a rejection body to keep in the error.
const DETAIL_LIMIT: usize = 160;

#[derive(Debug)]
struct TokenState {
    token: Option<String>,
    expires_at: DateTime<Utc>,
}

/// Lazily acquired, transparently refreshed login session.
///
/// The token/expiry pair lives behind a mutex that is only held for reads
/// and writes of the pair itself, never across the login request.
/// Concurrent refreshes therefore race benignly: last writer wins, and a
/// failed refresh leaves the previous token in place.
#[derive(Debug)]
pub struct SignedSession {
    http: reqwest::Client,
    login_url: String,
    seller_id: i64,
    api_key: String,
    state: Mutex<TokenState>,
}

impl SignedSession {
    /// Build a session from config. Fails fast when the seller identity or
    /// the API secret is absent; nothing here touches the network.
    pub fn new(http: reqwest::Client, config: &GgselConfig) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_key" });
        }
        if config.seller_id <= 0 {
            return Err(ConfigError::MissingField { field: "seller_id" });
        }

        Ok(Self {
            http,
            login_url: format!("{}/apilogin", config.api_base.trim_end_matches('/')),
            seller_id: config.seller_id,
            api_key: config.api_key.clone(),
            state: Mutex::new(TokenState {
                token: None,
                expires_at: DateTime::<Utc>::MIN_UTC,
            }),
        })
    }

    /// Return a usable token, logging in only when needed.
    ///
    /// With `force == false` a cached token with more than the safety margin
    /// remaining is returned without any network call. `force == true`
    /// always logs in — the 401-retry path uses it to discard a token the
    /// server stopped accepting before its nominal expiry.
    pub async fn ensure_token(&self, force: bool) -> Result<String, AuthError> {
        if !force {
            if let Some(token) = self.cached_token() {
                return Ok(token);
            }
        }
        self.login().await
    }

    /// Seller account id, for endpoints that need it as a query parameter.
    #[must_use]
    pub const fn seller_id(&self) -> i64 {
        self.seller_id
    }

    fn cached_token(&self) -> Option<String> {
        let state = self.state.lock();
        let token = state.token.clone()?;
        let remaining = state.expires_at - Utc::now();
        (remaining > TimeDelta::seconds(REFRESH_MARGIN)).then_some(token)
    }

    async fn login(&self) -> Result<String, AuthError> {
        let signature = login_signature(&self.api_key);
        let body = LoginRequest {
            seller_id: self.seller_id,
            timestamp: signature.timestamp,
            sign: signature.sign,
        };

        debug!(seller_id = self.seller_id, "Requesting seller API token");

        let response = self
            .http
            .post(&self.login_url)
            .header("locale", "ru")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                detail: truncate(&text, DETAIL_LIMIT),
            });
        }

        // A 200 with an unparseable body is treated like a token-less reply;
        // either way the stored token stays untouched.
        let parsed: LoginResponse = serde_json::from_str(&text).unwrap_or_default();
        let Some(token) = parsed.token.clone() else {
            return Err(AuthError::MissingToken {
                detail: parsed.denial_reason(),
            });
        };

        let expires_at = parsed
            .valid_thru
            .as_deref()
            .and_then(parse_valid_thru)
            .unwrap_or_else(|| Utc::now() + TimeDelta::seconds(DEFAULT_TOKEN_TTL));

        {
            let mut state = self.state.lock();
            state.token = Some(token.clone());
            state.expires_at = expires_at;
        }

        info!(seller_id = self.seller_id, "Seller API token refreshed");
        Ok(token)
    }

    /// Raw login round-trip for diagnostics. Returns the HTTP status code,
    /// or 0 when the request never got an HTTP answer. Token state is not
    /// touched.
    pub async fn probe_login(&self) -> u16 {
        let signature = login_signature(&self.api_key);
        let body = LoginRequest {
            seller_id: self.seller_id,
            timestamp: signature.timestamp,
            sign: signature.sign,
        };

        let result = self
            .http
            .post(&self.login_url)
            .header("locale", "ru")
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) => response.status().as_u16(),
            Err(_) => 0,
        }
    }

    /// Install a token directly, bypassing login.
    #[cfg(any(test, feature = "testkit"))]
    pub fn prime_token(&self, token: &str, expires_in: TimeDelta) {
        let mut state = self.state.lock();
        state.token = Some(token.to_string());
        state.expires_at = Utc::now() + expires_in;
    }

    /// Currently stored token, regardless of expiry.
    #[cfg(any(test, feature = "testkit"))]
    pub fn stored_token(&self) -> Option<String> {
        self.state.lock().token.clone()
    }
}

/// Parse the server's "valid until" timestamp. Tolerates RFC 3339 (with
/// offset or `Z`) and naive datetimes, which are taken as UTC.
fn parse_valid_thru(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

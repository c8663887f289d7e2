//! GGSEL seller-API REST client.
//!
//! All authenticated calls go through [`GgselClient::authed_get`]: the token
//! is sent both as a `token` query parameter and as a bearer header, a 401
//! triggers exactly one forced re-login and retry, and 200-with-HTML replies
//! (which the upstream serves when it dislikes the request) surface as
//! protocol errors instead of decode panics.
//!
//! The client mimics a browser session: the upstream returns HTML error
//! pages to requests without the Accept/Referer/Origin profile below.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER,
    USER_AGENT,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::dto::{ChatItem, ChatsPage, MessageItem, PurchaseInfo, SalesResponse};
use super::session::SignedSession;
use crate::config::GgselConfig;
use crate::domain::{ChatMessage, ChatSummary, PurchaseDetail, SaleStub};
use crate::error::{ApiError, ConfigError, Result};
use crate::port::{ApiProbe, Marketplace};

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const ACCEPT_LANGUAGE_VALUE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Upstream caps message/sales fetch sizes at this.
const MAX_FETCH_COUNT: u32 = 100;
/// How much response body to keep in error snippets.
const SNIPPET_LIMIT: usize = 300;

/// HTTP client for the GGSEL seller API.
#[derive(Debug)]
pub struct GgselClient {
    http: HttpClient,
    /// API base URL without a trailing slash.
    base_url: String,
    session: SignedSession,
}

impl GgselClient {
    /// Build a client from config. Fails when the base URL does not parse
    /// or the seller credentials are absent; nothing here touches the
    /// network.
    pub fn from_config(config: &GgselConfig) -> std::result::Result<Self, ConfigError> {
        let origin = parse_origin(&config.api_base)?;

        let http = HttpClient::builder()
            .default_headers(browser_headers(&origin)?)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        let session = SignedSession::new(http.clone(), config)?;

        Ok(Self {
            http,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Unread (or all) conversations, one page.
    pub async fn list_chats(
        &self,
        unread_only: bool,
        page: u32,
        pagesize: u32,
    ) -> std::result::Result<Vec<ChatSummary>, ApiError> {
        let mut params = vec![
            ("page", page.to_string()),
            ("pagesize", pagesize.to_string()),
        ];
        if unread_only {
            params.push(("filter_new", "1".to_string()));
        }

        let page: ChatsPage = self.authed_get("debates/v2/chats", &params, false).await?;
        let chats: Vec<ChatSummary> = page
            .items
            .into_iter()
            .filter_map(ChatItem::into_summary)
            .collect();

        debug!(count = chats.len(), unread_only, "Fetched conversations");
        Ok(chats)
    }

    /// Messages of one conversation, newest window first per upstream
    /// ordering. `count` is clamped to the upstream cap.
    pub async fn list_messages(
        &self,
        conversation_id: i64,
        count: u32,
        newer_than: Option<i64>,
    ) -> std::result::Result<Vec<ChatMessage>, ApiError> {
        let mut params = vec![
            ("id_i", conversation_id.to_string()),
            ("count", clamp_fetch_count(count).to_string()),
        ];
        if let Some(newer) = newer_than {
            params.push(("newer", newer.to_string()));
        }

        let items: Vec<MessageItem> = self.authed_get("debates/v2", &params, false).await?;
        Ok(items.into_iter().map(MessageItem::into_message).collect())
    }

    /// Most recent sales, newest first. `top` is clamped to the upstream cap.
    pub async fn last_sales(&self, top: u32) -> std::result::Result<Vec<SaleStub>, ApiError> {
        let params = vec![
            ("seller_id", self.session.seller_id().to_string()),
            ("top", clamp_fetch_count(top).to_string()),
        ];

        let response: SalesResponse = self.authed_get("seller-last-sales", &params, true).await?;
        let sales: Vec<SaleStub> = response.sales.into_iter().map(|s| s.into_stub()).collect();

        debug!(count = sales.len(), "Fetched recent sales");
        Ok(sales)
    }

    /// Detail record for one invoice. A reply without `content` decodes to
    /// an all-empty detail, which downstream treats as unpaid.
    pub async fn purchase_detail(
        &self,
        invoice_id: i64,
    ) -> std::result::Result<PurchaseDetail, ApiError> {
        let path = format!("purchase/info/{invoice_id}");
        let info: PurchaseInfo = self.authed_get(&path, &[], true).await?;
        Ok(info.into_detail())
    }

    /// One status code per API surface, for the diagnostics command.
    /// 0 means the request never got an HTTP answer.
    pub async fn probe(&self) -> ApiProbe {
        let login = self.session.probe_login().await;

        let (chats, sales) = match self.session.ensure_token(false).await {
            Ok(token) => {
                let chat_params = vec![
                    ("filter_new", "1".to_string()),
                    ("page", "1".to_string()),
                    ("pagesize", "1".to_string()),
                ];
                let sale_params = vec![
                    ("seller_id", self.session.seller_id().to_string()),
                    ("top", "1".to_string()),
                ];
                (
                    self.probe_status("debates/v2/chats", &chat_params, false, &token)
                        .await,
                    self.probe_status("seller-last-sales", &sale_params, true, &token)
                        .await,
                )
            }
            Err(_) => (0, 0),
        };

        ApiProbe {
            login,
            chats,
            sales,
        }
    }

    async fn probe_status(
        &self,
        path: &str,
        params: &[(&str, String)],
        ru_locale: bool,
        token: &str,
    ) -> u16 {
        let url = format!("{}/{}", self.base_url, path);
        let mut request = self
            .http
            .get(&url)
            .query(&[("token", token)])
            .query(params)
            .bearer_auth(token);
        if ru_locale {
            request = request.header("locale", "ru");
        }

        match request.send().await {
            Ok(response) => response.status().as_u16(),
            Err(_) => 0,
        }
    }

    /// Authenticated GET with the one-shot 401 recovery described in the
    /// module docs.
    async fn authed_get<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
        ru_locale: bool,
    ) -> std::result::Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let mut force = false;

        loop {
            let token = self.session.ensure_token(force).await?;

            let mut request = self
                .http
                .get(&url)
                .query(&[("token", token.as_str())])
                .query(params)
                .bearer_auth(&token);
            if ru_locale {
                request = request.header("locale", "ru");
            }

            let response = request.send().await?;
            let status = response.status();
            // Logged and reported URLs never carry the live token.
            let redacted_url = redact_token(response.url().as_str());

            if status == StatusCode::UNAUTHORIZED {
                if !force {
                    debug!(url = %redacted_url, "Token rejected, refreshing and retrying once");
                    force = true;
                    continue;
                }
                return Err(ApiError::Unauthorized { url: redacted_url });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            let text = response.text().await?;

            if !status.is_success() {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    body: flatten_snippet(&text, SNIPPET_LIMIT),
                });
            }

            debug!(url = %redacted_url, status = status.as_u16(), "Seller API response");

            if !content_type.starts_with("application/json") {
                return Err(ApiError::Protocol {
                    status: status.as_u16(),
                    content_type,
                    snippet: flatten_snippet(&text, SNIPPET_LIMIT),
                });
            }

            return serde_json::from_str(&text).map_err(|_| ApiError::Protocol {
                status: status.as_u16(),
                content_type,
                snippet: flatten_snippet(&text, SNIPPET_LIMIT),
            });
        }
    }
}

#[async_trait]
impl Marketplace for GgselClient {
    async fn list_chats(
        &self,
        unread_only: bool,
        page: u32,
        pagesize: u32,
    ) -> Result<Vec<ChatSummary>> {
        Ok(self.list_chats(unread_only, page, pagesize).await?)
    }

    async fn list_messages(
        &self,
        conversation_id: i64,
        count: u32,
        newer_than: Option<i64>,
    ) -> Result<Vec<ChatMessage>> {
        Ok(self.list_messages(conversation_id, count, newer_than).await?)
    }

    async fn last_sales(&self, top: u32) -> Result<Vec<SaleStub>> {
        Ok(self.last_sales(top).await?)
    }

    async fn purchase_detail(&self, invoice_id: i64) -> Result<PurchaseDetail> {
        Ok(self.purchase_detail(invoice_id).await?)
    }

    async fn probe(&self) -> ApiProbe {
        self.probe().await
    }
}

fn clamp_fetch_count(count: u32) -> u32 {
    count.clamp(1, MAX_FETCH_COUNT)
}

/// Origin (scheme + host + port) of the API base, for the Referer/Origin
/// headers the upstream insists on.
fn parse_origin(api_base: &str) -> std::result::Result<String, ConfigError> {
    let url = Url::parse(api_base).map_err(|err| ConfigError::InvalidValue {
        field: "api_base",
        reason: err.to_string(),
    })?;
    let origin = url.origin();
    if !matches!(origin, url::Origin::Tuple(..)) {
        return Err(ConfigError::InvalidValue {
            field: "api_base",
            reason: "URL has no host".to_string(),
        });
    }
    Ok(origin.ascii_serialization())
}

fn browser_headers(origin: &str) -> std::result::Result<HeaderMap, ConfigError> {
    let origin_value = HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidValue {
        field: "api_base",
        reason: "origin is not a valid header value".to_string(),
    })?;
    let referer_value =
        HeaderValue::from_str(&format!("{origin}/")).map_err(|_| ConfigError::InvalidValue {
            field: "api_base",
            reason: "origin is not a valid header value".to_string(),
        })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(REFERER, referer_value);
    headers.insert(ORIGIN, origin_value);
    Ok(headers)
}

/// Replace every `token=` query value with `***`.
fn redact_token(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut rest = url;
    while let Some(idx) = rest.find("token=") {
        let value_start = idx + "token=".len();
        out.push_str(&rest[..value_start]);
        out.push_str("***");
        let tail = &rest[value_start..];
        let value_end = tail.find('&').unwrap_or(tail.len());
        rest = &tail[value_end..];
    }
    out.push_str(rest);
    out
}

/// Single-line body excerpt for error messages.
fn flatten_snippet(body: &str, limit: usize) -> String {
    let snippet: String = body.chars().take(limit).collect();
    snippet.replace('\n', " ")
}


// -------------------------------------------------------------------------
// Integration tests (behind feature flag, need live credentials)
// -------------------------------------------------------------------------

use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Top-level configuration, loaded from a TOML file with environment
/// overrides for secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ggsel: GgselConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Seller-API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GgselConfig {
    /// Seller account identifier. Overridable via `SELLER_ID`.
    #[serde(default)]
    pub seller_id: i64,
    /// API secret used to sign logins. Overridable via `GGSEL_API_KEY`;
    /// never log this.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the seller API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Page size for the unread-conversations listing.
    #[serde(default = "default_chats_pagesize")]
    pub chats_pagesize: u32,
    /// Messages fetched on the first, cheap probe of a conversation.
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,
    /// Messages fetched when the probe yields nothing usable. The upstream
    /// caps this at 100.
    #[serde(default = "default_refetch_count")]
    pub refetch_count: u32,
    /// How many recent sales to examine per order check.
    #[serde(default = "default_sales_top")]
    pub sales_top: u32,
}

/// Telegram bot settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token from BotFather. Overridable via `TG_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: String,
    /// Chats allowed to start sessions. Empty means any chat may.
    #[serde(default)]
    pub allowed_chats: Vec<i64>,
}

/// Periodic-check cadence and scheduling strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct ChecksConfig {
    #[serde(default = "default_message_interval_secs")]
    pub message_interval_secs: u64,
    #[serde(default = "default_message_first_delay_secs")]
    pub message_first_delay_secs: u64,
    #[serde(default = "default_order_interval_secs")]
    pub order_interval_secs: u64,
    #[serde(default = "default_order_first_delay_secs")]
    pub order_first_delay_secs: u64,
    #[serde(default)]
    pub scheduler: SchedulerKind,
}

/// Which scheduling strategy drives the periodic checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// Named jobs on a shared timer service, fixed cadence.
    #[default]
    Timer,
    /// One cooperative task per job that sleeps between runs.
    Loop,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_api_base() -> String {
    "https://seller.ggsel.net/api_sellers/api/".into()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_chats_pagesize() -> u32 {
    20
}

const fn default_probe_count() -> u32 {
    1
}

const fn default_refetch_count() -> u32 {
    100
}

const fn default_sales_top() -> u32 {
    4
}

const fn default_message_interval_secs() -> u64 {
    60
}

const fn default_message_first_delay_secs() -> u64 {
    5
}

const fn default_order_interval_secs() -> u64 {
    60
}

const fn default_order_first_delay_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for GgselConfig {
    fn default() -> Self {
        Self {
            seller_id: 0,
            api_key: String::new(),
            api_base: default_api_base(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            chats_pagesize: default_chats_pagesize(),
            probe_count: default_probe_count(),
            refetch_count: default_refetch_count(),
            sales_top: default_sales_top(),
        }
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            message_interval_secs: default_message_interval_secs(),
            message_first_delay_secs: default_message_first_delay_secs(),
            order_interval_secs: default_order_interval_secs(),
            order_first_delay_secs: default_order_first_delay_secs(),
            scheduler: SchedulerKind::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ggsel: GgselConfig::default(),
            telegram: TelegramConfig::default(),
            checks: ChecksConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Secrets come from the environment when present (never logged, never
    /// required in the config file).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(key) = std::env::var("GGSEL_API_KEY") {
            if !key.trim().is_empty() {
                self.ggsel.api_key = key.trim().to_string();
            }
        }
        if let Ok(token) = std::env::var("TG_BOT_TOKEN") {
            if !token.trim().is_empty() {
                self.telegram.bot_token = token.trim().to_string();
            }
        }
        if let Ok(raw) = std::env::var("SELLER_ID") {
            let raw = raw.trim();
            if !raw.is_empty() {
                self.ggsel.seller_id =
                    raw.parse().map_err(|_| ConfigError::InvalidValue {
                        field: "seller_id",
                        reason: format!("SELLER_ID is not an integer: {raw:?}"),
                    })?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.ggsel.api_key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api_key" }.into());
        }
        if self.ggsel.seller_id <= 0 {
            return Err(ConfigError::MissingField { field: "seller_id" }.into());
        }
        if Url::parse(&self.ggsel.api_base).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "api_base",
                reason: format!("not a valid URL: {}", self.ggsel.api_base),
            }
            .into());
        }
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "bot_token" }.into());
        }
        // BotFather tokens look like "<numeric id>:<secret>" and are never short.
        if !self.telegram.bot_token.contains(':') || self.telegram.bot_token.len() < 30 {
            return Err(ConfigError::InvalidValue {
                field: "bot_token",
                reason: "expected a BotFather token of the form 123456789:XXXX...".into(),
            }
            .into());
        }
        if self.checks.message_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "message_interval_secs",
                reason: "interval must be greater than zero".into(),
            }
            .into());
        }
        if self.checks.order_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "order_interval_secs",
                reason: "interval must be greater than zero".into(),
            }
            .into());
        }
        if self.ggsel.refetch_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "refetch_count",
                reason: "must fetch at least one message".into(),
            }
            .into());
        }
        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

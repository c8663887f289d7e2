//! sellwatch - GGSel seller notifications in Telegram.
//!
//! Polls the GGSel seller API for unread buyer conversations and freshly
//! paid orders, and pushes formatted alerts to the Telegram chats that
//! started a watch.
//!
//! # Architecture
//!
//! Hexagonal: pure check logic in the middle, traits at the seams, one
//! adapter per external system.
//!
//! - [`domain`] - platform-agnostic types: conversations, orders, alert
//!   texts, dedup keys
//! - [`port`] - trait seams: [`Marketplace`](port::Marketplace),
//!   [`AlertSink`](port::AlertSink), [`JobScheduler`](port::JobScheduler),
//!   [`WatchControl`](port::WatchControl)
//! - [`adapter`] - the GGSel HTTP client with its signed-login session, and
//!   the Telegram bot surface (requires the `telegram` feature)
//! - [`app`] - the watcher core: sessions, change detection, scheduling,
//!   composition root
//! - [`cli`] - clap definitions and command handlers
//! - [`config`] - TOML configuration with env-var overrides for secrets
//! - [`error`] - Error types for the crate
//!
//! # Features
//!
//! - `telegram` (default) - Telegram bot adapter via teloxide
//! - `testkit` - scripted doubles and builders for tests
//! - `integration-tests` - enable tests that hit the real seller API
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sellwatch::app::{build_scheduler, build_watcher};
//! use sellwatch::config::Config;
//! use sellwatch::port::NullSink;
//!
//! # async fn demo() -> sellwatch::Result<()> {
//! let config = Config::load("config.toml")?;
//! let scheduler = build_scheduler(config.checks.scheduler);
//! let watcher = build_watcher(&config, scheduler, Arc::new(NullSink))?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use config::Config;
pub use error::{Error, Result};

//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`marketplace`] — [`ScriptedMarketplace`](marketplace::ScriptedMarketplace),
//!   a scripted [`Marketplace`](crate::port::Marketplace) double with failure
//!   switches and call recording.
//! - [`sink`] — [`RecordingSink`](sink::RecordingSink), an
//!   [`AlertSink`](crate::port::AlertSink) that remembers what it was asked
//!   to deliver.
//! - [`domain`] — Builders for conversations, messages, sales, and details.
//! - [`config`] — Canonical valid configurations.

pub mod config;
pub mod domain;
pub mod marketplace;
pub mod sink;

//! Implementations of ports (hexagonal adapters).

pub mod ggsel;

#[cfg(feature = "telegram")]
pub mod telegram;

//! GGSEL seller-API adapter: signed login plus the REST endpoints the
//! watcher polls.

mod client;
mod dto;
mod session;
mod sign;

pub use client::GgselClient;
pub use session::SignedSession;
pub use sign::{login_signature, login_signature_with_timestamp, LoginSignature};

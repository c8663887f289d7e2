//! Trait definitions (hexagonal ports). Depend only on domain.

mod control;
mod marketplace;
mod notifier;
mod scheduler;

pub use control::WatchControl;
pub use marketplace::{ApiProbe, Marketplace};
pub use notifier::{AlertSink, NullSink};
pub use scheduler::{tick_fn, JobScheduler, JobSpec, TickFn};

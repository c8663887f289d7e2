//! Application layer - watcher core, sessions, scheduling, and composition.

mod detector;
mod orchestrator;
mod scheduler;
mod session;
mod watcher;

pub use detector::{ChangeDetector, DetectorLimits};
pub use orchestrator::{build_scheduler, build_watcher, App};
pub use scheduler::{LoopScheduler, TimerService};
pub use session::{ChatSession, SessionRegistry};
pub use watcher::{CheckCadence, Watcher};

mod config;
mod engine;

pub use config::SchedulerConfig;
pub use engine::{Phase, SchedulerState, SessionScheduler};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scheduler::Phase;

/// Every scheduler state change produces an Event.
/// The CLI prints them as JSON lines; the notifier consumes `PhaseCompleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SchedulerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SchedulerPaused {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SchedulerReset {
        at: DateTime<Utc>,
    },
    /// One logical second elapsed within the current phase.
    Tick {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase ran down to zero. Emitted exactly once per exhausted phase.
    PhaseCompleted {
        finished_phase: Phase,
        next_phase: Phase,
        completed_focus_count: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        completed_focus_count: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
}

//! Session scheduler implementation.
//!
//! The scheduler is a tick-driven state machine. It owns no timers -- the
//! host delivers one `tick()` per logical second while it considers the
//! scheduler active, and the scheduler owns only the state transition.
//!
//! ## Phase cycle
//!
//! ```text
//! Focus -> ShortBreak -> Focus -> ... -> Focus -> LongBreak -> Focus
//! ```
//!
//! The break after the Nth completed focus phase is a long break iff
//! `N % cycle_length == 0`. A phase never auto-starts: each completion
//! leaves the scheduler paused on the next phase until `start()`.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::config::SchedulerConfig;
use crate::events::Event;
use crate::notify::Notifier;
use crate::session::{CompletedSession, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Focus => write!(f, "focus"),
            Phase::ShortBreak => write!(f, "short break"),
            Phase::LongBreak => write!(f, "long break"),
        }
    }
}

/// Serializable snapshot of the scheduler's mutable state.
///
/// The CLI persists this between invocations (kv table) and rebuilds the
/// scheduler around it with fresh collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerState {
    pub config: SchedulerConfig,
    /// Config replacement staged while running; applied at the next
    /// transition so the countdown is not disturbed mid-flight.
    #[serde(default)]
    pub staged_config: Option<SchedulerConfig>,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub running: bool,
    pub completed_focus_count: u64,
}

impl SchedulerState {
    fn fresh(config: SchedulerConfig) -> Self {
        Self {
            config,
            staged_config: None,
            phase: Phase::Focus,
            remaining_secs: config.focus_secs(),
            running: false,
            completed_focus_count: 0,
        }
    }
}

/// The focus/break session scheduler.
///
/// Owns its state exclusively; callers observe it through query methods
/// and drive it through `start`/`pause`/`reset`/`tick`. The session store
/// and notifier are injected so tests can substitute fakes.
pub struct SessionScheduler {
    state: SchedulerState,
    store: Box<dyn SessionStore>,
    notifier: Box<dyn Notifier>,
}

impl SessionScheduler {
    /// Create a scheduler at `(Focus, paused, remaining = focus duration)`.
    pub fn new(
        config: SchedulerConfig,
        store: Box<dyn SessionStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            state: SchedulerState::fresh(config),
            store,
            notifier,
        }
    }

    /// Rebuild a scheduler from a persisted snapshot.
    ///
    /// `remaining_secs` is clamped into `[1, phase duration]` so a
    /// hand-edited snapshot cannot put the machine in an unreachable state.
    pub fn from_state(
        mut state: SchedulerState,
        store: Box<dyn SessionStore>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let total = state.config.duration_of(state.phase);
        state.remaining_secs = state.remaining_secs.clamp(1, total);
        Self { state, store, notifier }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn completed_focus_count(&self) -> u64 {
        self.state.completed_focus_count
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.state.config
    }

    /// Full duration of the current phase, in seconds.
    pub fn total_secs(&self) -> u64 {
        self.state.config.duration_of(self.state.phase)
    }

    /// `1 - remaining / duration`, recomputed from current state.
    ///
    /// Never stored, so it cannot drift; always within `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.state.remaining_secs as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Copy of the persistable state.
    pub fn state(&self) -> SchedulerState {
        self.state.clone()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            running: self.state.running,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.total_secs(),
            completed_focus_count: self.state.completed_focus_count,
            progress: self.progress_fraction(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) consuming ticks. No-op if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        Some(Event::SchedulerStarted {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop consuming ticks; `phase` and `remaining` are preserved exactly.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.running = false;
        Some(Event::SchedulerPaused {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the current attempt: back to a paused Focus phase at full
    /// duration. `completed_focus_count` survives, so the next break is
    /// still long every Nth cycle.
    pub fn reset(&mut self) -> Event {
        self.state.running = false;
        if let Some(staged) = self.state.staged_config.take() {
            self.state.config = staged;
        }
        self.state.phase = Phase::Focus;
        self.state.remaining_secs = self.state.config.focus_secs();
        Event::SchedulerReset { at: Utc::now() }
    }

    /// Replace the configuration.
    ///
    /// While paused it takes effect immediately and the current phase's
    /// `remaining` is recomputed to that phase's new duration. While
    /// running it is staged and applied at the next phase transition.
    pub fn set_config(&mut self, config: SchedulerConfig) {
        if self.state.running {
            self.state.staged_config = Some(config);
        } else {
            self.state.config = config;
            self.state.staged_config = None;
            self.state.remaining_secs = config.duration_of(self.state.phase);
        }
    }

    /// Consume one logical second.
    ///
    /// Returns `None` while paused (a tick delivered by a racing host is a
    /// safe no-op, not an error). The tick that drives `remaining` to zero
    /// performs the phase-completion transition and returns the
    /// `PhaseCompleted` event; any further ticks in the same burst land on
    /// the new, not-yet-started phase and are no-ops.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        // A running phase always has time left; the completion transition
        // refills `remaining` before the flag can be observed again.
        debug_assert!(self.state.remaining_secs > 0, "running phase already exhausted");
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs == 0 {
            return Some(self.complete_phase());
        }
        Some(Event::Tick {
            phase: self.state.phase,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Phase-completion transition; fires exactly once per exhausted phase.
    fn complete_phase(&mut self) -> Event {
        let finished = self.state.phase;

        if finished == Phase::Focus {
            let session = CompletedSession {
                duration_secs: self.state.config.focus_secs(),
                timestamp: Utc::now(),
                completed: true,
            };
            if let Err(err) = self.store.append(session) {
                tracing::warn!(error = %err, "session store append failed; session not recorded");
            }
            self.state.completed_focus_count += 1;
        }

        let next = match finished {
            Phase::Focus => {
                if self.state.completed_focus_count % self.state.config.cycle_length() == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };

        // A config staged mid-flight lands here, between phases.
        if let Some(staged) = self.state.staged_config.take() {
            self.state.config = staged;
        }

        self.state.phase = next;
        self.state.remaining_secs = self.state.config.duration_of(next);
        self.state.running = false;

        let event = Event::PhaseCompleted {
            finished_phase: finished,
            next_phase: next,
            completed_focus_count: self.state.completed_focus_count,
            at: Utc::now(),
        };
        if let Err(err) = self.notifier.notify(&event) {
            tracing::warn!(error = %err, "notifier dispatch failed; cue dropped");
        }
        event
    }
}

impl fmt::Debug for SessionScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionScheduler")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

//! Phase-transition notifiers.
//!
//! The scheduler hands each `PhaseCompleted` event to a notifier and moves
//! on; delivery is fire-and-forget. A failed cue never touches timer state.

use std::io::Write;

use crate::error::NotifyError;
use crate::events::Event;
use crate::scheduler::Phase;

/// Fire-and-forget consumer of phase-transition events.
pub trait Notifier {
    /// Surface a `PhaseCompleted` event to the user.
    ///
    /// # Errors
    /// Implementation-specific; the scheduler logs and discards failures.
    fn notify(&self, event: &Event) -> Result<(), NotifyError>;
}

/// Notifier that does nothing. Used in tests and when cues are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: &Event) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Terminal notifier: phase-change message plus a BEL audio cue on stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    /// Emit the BEL character so the terminal beeps.
    pub sound: bool,
}

impl ConsoleNotifier {
    pub fn new(sound: bool) -> Self {
        Self { sound }
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self { sound: true }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        let Event::PhaseCompleted { finished_phase, next_phase, .. } = event else {
            return Ok(());
        };
        let (headline, detail) = match finished_phase {
            Phase::Focus => ("Focus session completed!", "Take a well-deserved break!"),
            Phase::ShortBreak | Phase::LongBreak => ("Break finished!", "Time to focus again!"),
        };
        let mut stderr = std::io::stderr().lock();
        if self.sound {
            stderr.write_all(b"\x07")?;
        }
        writeln!(stderr, "{headline} {detail} (up next: {next_phase})")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn null_notifier_accepts_everything() {
        let event = Event::PhaseCompleted {
            finished_phase: Phase::Focus,
            next_phase: Phase::ShortBreak,
            completed_focus_count: 1,
            at: Utc::now(),
        };
        assert!(NullNotifier.notify(&event).is_ok());
    }

    #[test]
    fn console_notifier_ignores_non_completion_events() {
        let event = Event::SchedulerReset { at: Utc::now() };
        assert!(ConsoleNotifier::new(false).notify(&event).is_ok());
    }
}

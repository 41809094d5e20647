//! End-to-end scheduler cycle tests.
//!
//! Drives the state machine through whole focus/break cycles the way a
//! host would: explicit start, one tick per logical second, explicit
//! acknowledgement of each phase change.

use focusdeck_core::{
    Event, MemorySessionStore, NullNotifier, Phase, SchedulerConfig, SessionScheduler,
};
use proptest::prelude::*;

fn scheduler_with_store(
    focus: u64,
    short: u64,
    long: u64,
    cycle: u64,
) -> (SessionScheduler, MemorySessionStore) {
    let store = MemorySessionStore::new();
    let cfg = SchedulerConfig::new(focus, short, long, cycle).unwrap();
    let sched = SessionScheduler::new(cfg, Box::new(store.clone()), Box::new(NullNotifier));
    (sched, store)
}

/// Start the current phase and tick it to completion.
fn run_phase(sched: &mut SessionScheduler) -> Event {
    sched.start();
    let ticks = sched.total_secs();
    let mut last = None;
    for _ in 0..ticks {
        last = sched.tick();
    }
    last.expect("phase must complete after its full duration")
}

#[test]
fn classic_pomodoro_scenario() {
    // 25-minute focus, 5/15-minute breaks, long break every 4th focus.
    let (mut sched, store) = scheduler_with_store(1500, 300, 900, 4);

    sched.start();
    let mut completions = 0;
    for _ in 0..1500 {
        if let Some(Event::PhaseCompleted { .. }) = sched.tick() {
            completions += 1;
        }
    }

    assert_eq!(completions, 1);
    assert_eq!(sched.phase(), Phase::ShortBreak);
    assert_eq!(sched.remaining_secs(), 300);
    assert!(!sched.is_running());
    assert_eq!(sched.completed_focus_count(), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.sessions()[0].duration_secs, 1500);
}

#[test]
fn break_pattern_over_eight_focuses() {
    let (mut sched, _) = scheduler_with_store(4, 2, 3, 4);
    let mut pattern = Vec::new();
    for _ in 0..8 {
        match run_phase(&mut sched) {
            Event::PhaseCompleted { next_phase, .. } => pattern.push(next_phase),
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        run_phase(&mut sched); // sit through the break
    }
    use Phase::{LongBreak as L, ShortBreak as S};
    assert_eq!(pattern, vec![S, S, S, L, S, S, S, L]);
}

#[test]
fn two_full_cycles_store_two_sessions() {
    let (mut sched, store) = scheduler_with_store(3, 2, 4, 4);
    for _ in 0..2 {
        run_phase(&mut sched); // focus
        run_phase(&mut sched); // break
    }
    assert_eq!(store.len(), 2);
    assert!(store.sessions().iter().all(|s| s.completed));
}

#[test]
fn reset_mid_break_returns_to_focus() {
    let (mut sched, _) = scheduler_with_store(3, 10, 4, 4);
    run_phase(&mut sched);
    assert_eq!(sched.phase(), Phase::ShortBreak);
    sched.start();
    sched.tick();
    sched.reset();
    assert_eq!(sched.phase(), Phase::Focus);
    assert_eq!(sched.remaining_secs(), 3);
    assert!(!sched.is_running());
    assert_eq!(sched.completed_focus_count(), 1);
}

#[test]
fn progress_is_monotone_within_a_phase() {
    let (mut sched, _) = scheduler_with_store(60, 5, 10, 4);
    assert_eq!(sched.progress_fraction(), 0.0);
    sched.start();
    let mut last = sched.progress_fraction();
    for _ in 0..59 {
        sched.tick();
        let p = sched.progress_fraction();
        assert!(p >= last, "progress regressed within a phase");
        assert!((0.0..=1.0).contains(&p));
        last = p;
    }
    sched.tick(); // completes the phase
    assert_eq!(sched.progress_fraction(), 0.0);
}

proptest! {
    /// Progress stays in [0, 1] and the count of stored sessions equals
    /// the count of completed focus phases, for arbitrary valid configs
    /// and arbitrarily long tick runs with periodic restarts.
    #[test]
    fn progress_bounded_and_sessions_match_focus_completions(
        focus in 1u64..40,
        short in 1u64..20,
        long in 1u64..30,
        cycle in 1u64..6,
        ticks in 1usize..600,
    ) {
        let store = MemorySessionStore::new();
        let cfg = SchedulerConfig::new(focus, short, long, cycle).unwrap();
        let mut sched =
            SessionScheduler::new(cfg, Box::new(store.clone()), Box::new(NullNotifier));

        let mut focus_completions = 0u64;
        sched.start();
        for _ in 0..ticks {
            if let Some(Event::PhaseCompleted { finished_phase, .. }) = sched.tick() {
                if finished_phase == Phase::Focus {
                    focus_completions += 1;
                }
                // Acknowledge the phase change, as a host would.
                sched.start();
            }
            let p = sched.progress_fraction();
            prop_assert!((0.0..=1.0).contains(&p));
            prop_assert!(sched.remaining_secs() <= sched.total_secs());
            prop_assert!(sched.remaining_secs() >= 1);
        }

        prop_assert_eq!(store.len() as u64, focus_completions);
        prop_assert_eq!(sched.completed_focus_count(), focus_completions);
    }

    /// The break after focus #N is long exactly when N is a multiple of
    /// the cycle length.
    #[test]
    fn long_break_on_every_nth_focus(cycle in 1u64..8, rounds in 1u64..20) {
        let (mut sched, _) = scheduler_with_store(2, 1, 1, cycle);
        for n in 1..=rounds {
            let event = run_phase(&mut sched);
            let expected = if n % cycle == 0 { Phase::LongBreak } else { Phase::ShortBreak };
            match event {
                Event::PhaseCompleted { next_phase, completed_focus_count, .. } => {
                    prop_assert_eq!(next_phase, expected);
                    prop_assert_eq!(completed_focus_count, n);
                }
                other => panic!("expected PhaseCompleted, got {other:?}"),
            }
            run_phase(&mut sched);
        }
    }
}

//! Timer control commands.
//!
//! The CLI is the scheduler's host: it owns wall-clock time (`timer run`
//! delivers one tick per second) and persists the machine's state between
//! invocations in the database kv table.

use clap::Subcommand;
use focusdeck_core::storage::Database;
use focusdeck_core::{
    Config, ConsoleNotifier, Event, Notifier, NullNotifier, SchedulerState, SessionScheduler,
};

const STATE_KEY: &str = "scheduler_state";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start (or resume) the countdown
    Start,
    /// Pause the countdown, preserving phase and remaining time
    Pause,
    /// Abandon the current attempt: paused focus phase at full duration
    Reset,
    /// Print current scheduler state as JSON
    Status,
    /// Drive the scheduler in real time, one tick per second
    Run {
        /// Stop after this many ticks instead of at the phase boundary
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn load_scheduler(db: &Database) -> Result<SessionScheduler, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let file_cfg = config.scheduler_config()?;

    // The store gets its own connection; the scheduler owns it outright.
    let store = Box::new(Database::open()?);
    let notifier: Box<dyn Notifier> = if config.notifications.enabled {
        Box::new(ConsoleNotifier::new(config.notifications.sound))
    } else {
        Box::new(NullNotifier)
    };

    if let Ok(Some(json)) = db.kv_get(STATE_KEY) {
        if let Ok(state) = serde_json::from_str::<SchedulerState>(&json) {
            let mut sched = SessionScheduler::from_state(state, store, notifier);
            // Pick up config.toml edits made since the state was saved.
            if *sched.config() != file_cfg {
                sched.set_config(file_cfg);
            }
            return Ok(sched);
        }
    }
    Ok(SessionScheduler::new(file_cfg, store, notifier))
}

fn save_scheduler(db: &Database, sched: &SessionScheduler) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(&sched.state())?;
    db.kv_set(STATE_KEY, &json)?;
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut sched = load_scheduler(&db)?;

    match action {
        TimerAction::Start => {
            match sched.start() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&sched.snapshot())?),
            }
            save_scheduler(&db, &sched)?;
        }
        TimerAction::Pause => {
            match sched.pause() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&sched.snapshot())?),
            }
            save_scheduler(&db, &sched)?;
        }
        TimerAction::Reset => {
            let event = sched.reset();
            println!("{}", serde_json::to_string_pretty(&event)?);
            save_scheduler(&db, &sched)?;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&sched.snapshot())?);
        }
        TimerAction::Run { ticks } => {
            if let Some(event) = sched.start() {
                println!("{}", serde_json::to_string(&event)?);
            }
            save_scheduler(&db, &sched)?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(async {
                let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
                interval.tick().await; // first tick resolves immediately
                let mut delivered = 0u64;
                loop {
                    interval.tick().await;
                    let Some(event) = sched.tick() else {
                        break;
                    };
                    println!("{}", serde_json::to_string(&event)?);
                    save_scheduler(&db, &sched)?;
                    if matches!(event, Event::PhaseCompleted { .. }) {
                        break;
                    }
                    delivered += 1;
                    if let Some(limit) = ticks {
                        if delivered >= limit {
                            break;
                        }
                    }
                }
                Ok::<(), Box<dyn std::error::Error>>(())
            })?;
            save_scheduler(&db, &sched)?;
        }
    }
    Ok(())
}

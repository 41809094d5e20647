//! # FocusDeck Core Library
//!
//! Core business logic for the FocusDeck productivity dashboard. The only
//! component with real state-machine complexity is the focus/break session
//! scheduler; everything else on the dashboard reads from or appends to the
//! storage this crate owns.
//!
//! ## Architecture
//!
//! - **SessionScheduler**: a tick-driven state machine. It holds no timers;
//!   the host calls `tick()` once per logical second while active.
//! - **Storage**: SQLite session/task storage and TOML configuration.
//! - **Collaborators**: the session store and notifier are injected traits,
//!   so hosts and tests choose their own persistence and cue delivery.
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: the focus/break state machine
//! - [`Database`]: session, task, and statistics persistence
//! - [`Config`]: application configuration management
//! - [`Notifier`]: fire-and-forget phase-change cues

pub mod error;
pub mod events;
pub mod notify;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, NotifyError, StoreError};
pub use events::Event;
pub use notify::{ConsoleNotifier, Notifier, NullNotifier};
pub use scheduler::{Phase, SchedulerConfig, SchedulerState, SessionScheduler};
pub use session::{CompletedSession, MemorySessionStore, SessionStore};
pub use storage::{Config, Database, Stats};
pub use task::Task;

//! # Pomotrack Core Library
//!
//! Core logic for the Pomotrack Pomodoro timer. The `pomotrack` CLI is a
//! thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session Engine**: a deadline-based state machine; the caller invokes
//!   `tick()` periodically and remaining time is derived from the wall clock
//! - **Board**: tasks and projects, with time attribution and pomodoro progress
//! - **Storage**: SQLite key-value records and TOML configuration
//! - **App**: wires engine, board, store, clock and completion cues together
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: timer state machine and HHMMSS time entry
//! - [`TaskBoard`]: task and project collection
//! - [`App`]: application context driving both
//! - [`Database`]: persistent record store

pub mod app;
pub mod board;
pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;

pub use app::App;
pub use board::{ActiveTarget, NewTask, Project, ProjectId, Task, TaskBoard, TaskId, TaskProgress};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{AudioCue, Notifier, NotifyError, Tone};
pub use storage::{Config, Database, MemoryStore, Store};
pub use timer::{EditKey, Mode, SessionEngine, Settings, TimerState};

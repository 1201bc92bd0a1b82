//! # ChronoZen Core Library
//!
//! This library provides the core business logic for ChronoZen, a personal
//! productivity tool combining a Pomodoro timer, a stopwatch and a to-do list.
//! The CLI binary is a thin shell over the same library: it feeds key presses
//! and one-second ticks into the [`App`] controller and carries out the
//! side effects the controller hands back.
//!
//! ## Architecture
//!
//! - **Timer Engine**: tick-driven reducers for the Pomodoro countdown and the
//!   stopwatch. They never sleep or spawn; the caller invokes `tick()` once
//!   per second while a timer runs.
//! - **Tasks**: ordered task list with pending/completed partitioning
//! - **Storage**: SQLite-backed key-value persistence and TOML configuration
//! - **Congrats**: asynchronous message generator called when a task is done
//! - **Shell**: app controller, title/location reflection, keyboard routing
//!   and the first-run onboarding flow
//!
//! ## Key Components
//!
//! - [`App`]: state controller binding all subsystems together
//! - [`PomodoroState`]: work/break countdown state machine
//! - [`TaskList`]: the to-do list
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management
//! - [`MessageGenerator`]: trait for congratulatory message providers

pub mod congrats;
pub mod error;
pub mod events;
pub mod notify;
pub mod shell;
pub mod storage;
pub mod task;
pub mod timer;

pub use congrats::{congratulate, CongratsMessage, CongratsRequest, HttpMessageGenerator, MessageGenerator};
pub use error::{ConfigError, CoreError, GeneratorError, StorageError, ValidationError};
pub use events::Event;
pub use notify::{Notifier, Permission};
pub use shell::{App, Focus, Key, KeyOutcome, Location, Shortcut, Tab};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use task::{Task, TaskList, Toggle};
pub use timer::{CycleDirection, Mode, PomodoroSettings, PomodoroState, StopwatchState, TimerKind};

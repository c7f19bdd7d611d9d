//! # Timekeep Core Library
//!
//! This library provides the core logic for timekeep, a two-timer desktop
//! utility: an up-counting stopwatch and a down-counting countdown, with a
//! persisted, annotatable history of finished sessions. It implements a
//! CLI-first philosophy where all operations are available via a standalone
//! CLI binary; any GUI is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer engines**: wall-clock-based state machines that require the
//!   caller to periodically invoke `tick()` for progress updates. Elapsed
//!   and remaining time are recomputed from anchor timestamps, never by
//!   accumulating tick deltas.
//! - **History**: JSON-file-backed list of finished sessions, newest-first,
//!   capped at 1000, rewritten synchronously on every mutation.
//! - **Config**: TOML-based display/tick preferences.
//!
//! ## Key Components
//!
//! - [`Stopwatch`] / [`Countdown`]: the two engine state machines
//! - [`Controller`]: owns both engines, the history store, and the config
//! - [`HistoryStore`]: session persistence with rename/delete/clear
//! - [`Event`]: serde-tagged state-change notifications for the
//!   presentation layer

pub mod controller;
pub mod error;
pub mod events;
pub mod format;
pub mod storage;
pub mod timer;

pub use controller::{Controller, EXIT_AUTOSAVE_NAME};
pub use error::{ConfigError, CoreError, HistoryError, ValidationError};
pub use events::{Event, TimerView};
pub use format::{format_duration, DisplayMode};
pub use storage::{Config, HistoryStore, TimerKind, TimerRecord, HISTORY_CAP};
pub use timer::{Countdown, Phase, Stopwatch, DEFAULT_TARGET_MS};

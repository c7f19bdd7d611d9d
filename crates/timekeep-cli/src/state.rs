//! Engine state persisted between CLI invocations.
//!
//! Both engines are serde-serializable and anchored to wall-clock
//! timestamps, so a running timer keeps counting while no process is alive.
//! State lives as JSON at `~/.config/timekeep/state.json`; an unreadable
//! file falls back to fresh engines.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use timekeep_core::storage::data_dir;
use timekeep_core::{Config, Controller, Countdown, HistoryStore, Stopwatch};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionState {
    #[serde(default)]
    stopwatch: Stopwatch,
    #[serde(default)]
    countdown: Countdown,
}

fn state_path() -> std::io::Result<PathBuf> {
    Ok(data_dir()?.join("state.json"))
}

/// Assemble a controller from config, history, and any persisted engines.
/// A corrupt history file is reported as a warning and abandoned.
pub fn load_controller() -> Result<Controller, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (history, warning) = HistoryStore::load_or_empty(HistoryStore::default_path()?);
    if let Some(w) = warning {
        eprintln!("warning: {w}; starting with an empty history");
    }

    let state = std::fs::read_to_string(state_path()?)
        .ok()
        .and_then(|json| serde_json::from_str::<SessionState>(&json).ok());

    Ok(match state {
        Some(s) => Controller::from_parts(config, s.stopwatch, s.countdown, history),
        None => Controller::new(config, history),
    })
}

pub fn save_controller(controller: &Controller) -> Result<(), Box<dyn std::error::Error>> {
    let state = SessionState {
        stopwatch: controller.stopwatch().clone(),
        countdown: controller.countdown().clone(),
    };
    let json = serde_json::to_string(&state)?;
    std::fs::write(state_path()?, json)?;
    Ok(())
}

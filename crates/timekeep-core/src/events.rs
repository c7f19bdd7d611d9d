use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::TimerRecord;
use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// The presentation layer polls for these and renders them; stopped and
/// expired sessions carry the record that was appended to history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StopwatchStarted {
        at: DateTime<Utc>,
    },
    StopwatchPaused {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchResumed {
        elapsed_ms: u64,
        at: DateTime<Utc>,
    },
    StopwatchStopped {
        record: TimerRecord,
        at: DateTime<Utc>,
    },
    CountdownConfigured {
        target_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownStarted {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownStopped {
        record: TimerRecord,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. Expiry counts as full completion.
    CountdownExpired {
        record: TimerRecord,
        at: DateTime<Utc>,
    },
    /// Full display state for both timers, refreshed on every tick and on
    /// format changes.
    Snapshot {
        stopwatch: TimerView,
        countdown: TimerView,
        at: DateTime<Utc>,
    },
}

/// Display-facing view of one timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub phase: Phase,
    /// Formatted under the configured display mode.
    pub text: String,
    /// Elapsed milliseconds (stopwatch) or remaining milliseconds (countdown).
    pub value_ms: u64,
    /// Countdown only: within the final ten seconds.
    #[serde(default)]
    pub warning: bool,
}

mod countdown;
mod stopwatch;

pub use countdown::{Countdown, DEFAULT_TARGET_MS};
pub use stopwatch::Stopwatch;

use serde::{Deserialize, Serialize};

/// Engine phase. Both timers share the same three-phase lifecycle; the
/// countdown's expiry is a transient that lands back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

use chrono::{DateTime, Utc};

/// Whole milliseconds from `from` to `to`, clamped at zero.
fn elapsed_ms_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0) as u64
}

//! Countdown engine.
//!
//! Wall-clock-based like the stopwatch: while running, the engine remembers
//! the instant it will hit zero and every tick recomputes the remainder from
//! that anchor. Expiry is a transient -- the engine emits a completed record
//! with the full target as its duration and lands back in `Idle` with the
//! remainder reset to the configured target.
//!
//! Target validation accepts 0..=60 for each of hours/minutes/seconds. The
//! inclusive upper bound (60 minutes, 60 seconds) is a compatibility quirk
//! kept on purpose.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{elapsed_ms_between, Phase};
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::{TimerKind, TimerRecord};

/// Default countdown target: 30 seconds.
pub const DEFAULT_TARGET_MS: u64 = 30_000;

/// Remaining time at or below this flags the display as near expiry.
const WARNING_THRESHOLD_MS: u64 = 10_000;

/// Down-counting timer from a configured target to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    phase: Phase,
    /// Remaining milliseconds as of the last tick (or the frozen value while
    /// paused / the full target while idle).
    remaining_ms: u64,
    /// The configured target. Fixed until the next `set_target`.
    original_ms: u64,
    /// Wall-clock instant the running segment hits zero.
    #[serde(default)]
    ends_at: Option<DateTime<Utc>>,
    /// Start of the current run segment, carried into the emitted record.
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::with_target_ms(DEFAULT_TARGET_MS)
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_ms(target_ms: u64) -> Self {
        Self {
            phase: Phase::Idle,
            remaining_ms: target_ms,
            original_ms: target_ms,
            ends_at: None,
            started_at: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn original_ms(&self) -> u64 {
        self.original_ms
    }

    /// True within the final ten seconds (but not at zero).
    pub fn near_expiry(&self) -> bool {
        self.remaining_ms > 0 && self.remaining_ms <= WARNING_THRESHOLD_MS
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Configure a new target from hour/minute/second components.
    ///
    /// Each component must be in 0..=60 and the total must be positive.
    /// Allowed in any phase; overwrites both the target and the remainder,
    /// but a running segment keeps counting against its old end time until
    /// paused or stopped.
    pub fn set_target(
        &mut self,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Result<u64, ValidationError> {
        for (field, value) in [("hours", hours), ("minutes", minutes), ("seconds", seconds)] {
            if !(0..=60).contains(&value) {
                return Err(ValidationError::ComponentOutOfRange { field, value });
            }
        }
        let target_ms = ((hours * 3600 + minutes * 60 + seconds) * 1000) as u64;
        if target_ms == 0 {
            return Err(ValidationError::ZeroTarget);
        }
        self.remaining_ms = target_ms;
        self.original_ms = target_ms;
        Ok(target_ms)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(Utc::now())
    }

    /// Start only applies while `Idle` with a positive remainder.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Idle if self.remaining_ms > 0 => {
                self.phase = Phase::Running;
                self.started_at = Some(now);
                self.ends_at = Some(now + chrono::Duration::milliseconds(self.remaining_ms as i64));
                Some(Event::CountdownStarted {
                    remaining_ms: self.remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(Utc::now())
    }

    pub fn pause_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Running => {
                self.remaining_ms = elapsed_ms_between(now, self.ends_at?);
                self.ends_at = None;
                self.phase = Phase::Paused;
                Some(Event::CountdownPaused {
                    remaining_ms: self.remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    pub fn resume(&mut self) -> Option<Event> {
        self.resume_at(Utc::now())
    }

    pub fn resume_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.phase {
            Phase::Paused if self.remaining_ms > 0 => {
                self.phase = Phase::Running;
                self.started_at = Some(now);
                self.ends_at = Some(now + chrono::Duration::milliseconds(self.remaining_ms as i64));
                Some(Event::CountdownResumed {
                    remaining_ms: self.remaining_ms,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Stop early and emit the session. The duration is the consumed part of
    /// the target, which may be less than the wall-clock span when paused.
    pub fn stop(&mut self) -> Option<TimerRecord> {
        self.stop_at(Utc::now())
    }

    pub fn stop_at(&mut self, now: DateTime<Utc>) -> Option<TimerRecord> {
        let remaining_ms = match self.phase {
            Phase::Running => elapsed_ms_between(now, self.ends_at?),
            Phase::Paused => self.remaining_ms,
            Phase::Idle => return None,
        };
        let record = TimerRecord::new(
            TimerKind::Countdown,
            self.started_at?,
            now,
            self.original_ms.saturating_sub(remaining_ms),
            self.original_ms,
        );
        self.reset();
        Some(record)
    }

    /// Call periodically while running. On expiry the engine stops itself
    /// and returns the completed record; the full target counts as the
    /// duration even if the tick granularity overshoots slightly.
    pub fn tick(&mut self) -> Option<TimerRecord> {
        self.tick_at(Utc::now())
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<TimerRecord> {
        if self.phase != Phase::Running {
            return None;
        }
        self.remaining_ms = elapsed_ms_between(now, self.ends_at?);
        if self.remaining_ms > 0 {
            return None;
        }
        let record = TimerRecord::new(
            TimerKind::Countdown,
            self.started_at?,
            now,
            self.original_ms,
            self.original_ms,
        );
        self.reset();
        Some(record)
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.remaining_ms = self.original_ms;
        self.ends_at = None;
        self.started_at = None;
    }
}

//! Duration display formatting.
//!
//! Three display modes, selected per timer in the configuration. Formatting
//! is pure; durations are non-negative millisecond counts, so callers clamp
//! before converting (the engines use saturating arithmetic throughout).

/// How a duration is rendered. The leading unit is unbounded -- `hh:mm:ss`
/// shows `100:00:00` after a hundred hours rather than wrapping at 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    HoursMinutesSeconds,
    MinutesSeconds,
    Seconds,
}

impl DisplayMode {
    /// Parse a mode string. Unknown strings fall back to `hh:mm:ss`.
    pub fn parse(s: &str) -> Self {
        match s {
            "mm:ss" => Self::MinutesSeconds,
            "ss" => Self::Seconds,
            _ => Self::HoursMinutesSeconds,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HoursMinutesSeconds => "hh:mm:ss",
            Self::MinutesSeconds => "mm:ss",
            Self::Seconds => "ss",
        }
    }
}

/// Format a duration in milliseconds under the given mode.
///
/// Each component is zero-padded to two digits; sub-second remainders are
/// truncated.
pub fn format_duration(ms: u64, mode: DisplayMode) -> String {
    let total_secs = ms / 1000;
    match mode {
        DisplayMode::HoursMinutesSeconds => format!(
            "{:02}:{:02}:{:02}",
            total_secs / 3600,
            total_secs % 3600 / 60,
            total_secs % 60
        ),
        DisplayMode::MinutesSeconds => {
            format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
        }
        DisplayMode::Seconds => format!("{:02}", total_secs),
    }
}

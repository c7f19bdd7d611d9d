pub mod config;
pub mod countdown;
pub mod flush;
pub mod history;
pub mod stopwatch;
pub mod watch;

use timekeep_core::{Controller, Event};

/// Print the transition event if it applied, otherwise the current snapshot
/// (a mismatched trigger is a no-op; the display just refreshes).
pub(crate) fn print_event_or_snapshot(
    event: Option<Event>,
    controller: &Controller,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
        None => println!("{}", serde_json::to_string_pretty(&controller.snapshot())?),
    }
    Ok(())
}

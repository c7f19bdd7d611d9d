use clap::Subcommand;

use crate::commands::print_event_or_snapshot;
use crate::state;

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Start counting from zero
    Start,
    /// Pause a running stopwatch
    Pause,
    /// Resume a paused stopwatch
    Resume,
    /// Stop and record the session to history
    Stop,
    /// Print the current state as JSON
    Status,
}

pub fn run(action: StopwatchAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = state::load_controller()?;

    match action {
        StopwatchAction::Start => {
            let event = controller.stopwatch_start();
            print_event_or_snapshot(event, &controller)?;
        }
        StopwatchAction::Pause => {
            let event = controller.stopwatch_pause();
            print_event_or_snapshot(event, &controller)?;
        }
        StopwatchAction::Resume => {
            let event = controller.stopwatch_resume();
            print_event_or_snapshot(event, &controller)?;
        }
        StopwatchAction::Stop => {
            let event = controller.stopwatch_stop()?;
            print_event_or_snapshot(event, &controller)?;
        }
        StopwatchAction::Status => {
            // Tick first so the snapshot reflects wall-clock time now.
            let expired = controller.tick()?;
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
            if let Some(event) = expired {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
    }

    state::save_controller(&controller)?;
    Ok(())
}

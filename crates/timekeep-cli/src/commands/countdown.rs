use clap::Subcommand;

use crate::commands::print_event_or_snapshot;
use crate::state;

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Configure the countdown target (components each accept 0..=60)
    Set {
        #[arg(long, default_value_t = 0)]
        hours: i64,
        #[arg(long, default_value_t = 0)]
        minutes: i64,
        #[arg(long, default_value_t = 0)]
        seconds: i64,
    },
    /// Start counting down
    Start,
    /// Pause a running countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop early and record the consumed time to history
    Stop,
    /// Print the current state as JSON
    Status,
}

pub fn run(action: CountdownAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = state::load_controller()?;

    match action {
        CountdownAction::Set {
            hours,
            minutes,
            seconds,
        } => {
            let event = controller.countdown_set_target(hours, minutes, seconds)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        CountdownAction::Start => {
            let event = controller.countdown_start();
            print_event_or_snapshot(event, &controller)?;
        }
        CountdownAction::Pause => {
            let event = controller.countdown_pause();
            print_event_or_snapshot(event, &controller)?;
        }
        CountdownAction::Resume => {
            let event = controller.countdown_resume();
            print_event_or_snapshot(event, &controller)?;
        }
        CountdownAction::Stop => {
            let event = controller.countdown_stop()?;
            print_event_or_snapshot(event, &controller)?;
        }
        CountdownAction::Status => {
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

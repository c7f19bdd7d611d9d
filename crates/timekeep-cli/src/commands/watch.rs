//! The periodic tick loop.
//!
//! Drives both engines at the configured interval and reprints the display
//! line whenever it changes; exits once both engines are idle. The engines
//! recompute from wall-clock anchors, so an interrupted watch loses nothing.

use timekeep_core::{Event, Phase, TimerView};

use crate::state;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = state::load_controller()?;
    if !controller.any_active() {
        println!("nothing running");
        return Ok(());
    }

    let interval = std::time::Duration::from_millis(controller.config().tick.interval_ms.max(10));
    let mut last_line = String::new();

    while controller.any_active() {
        if let Some(event) = controller.tick()? {
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        if let Event::Snapshot {
            stopwatch,
            countdown,
            ..
        } = controller.snapshot()
        {
            let line = format!(
                "stopwatch {}  countdown {}",
                render(&stopwatch),
                render(&countdown)
            );
            if line != last_line {
                println!("{line}");
                last_line = line;
            }
        }
        std::thread::sleep(interval);
    }

    state::save_controller(&controller)?;
    Ok(())
}

fn render(view: &TimerView) -> String {
    let phase = match view.phase {
        Phase::Idle => "idle",
        Phase::Running => "running",
        Phase::Paused => "paused",
    };
    if view.warning {
        format!("{} [{phase}, near expiry]", view.text)
    } else {
        format!("{} [{phase}]", view.text)
    }
}

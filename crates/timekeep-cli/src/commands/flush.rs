//! Shutdown path: any non-idle engine is forced through its stop transition
//! so the session lands in history before the engines reset.

use crate::state;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = state::load_controller()?;
    let events = controller.flush_running()?;

    if events.is_empty() {
        println!("nothing to flush");
    } else {
        for event in &events {
            println!("{}", serde_json::to_string_pretty(event)?);
        }
    }

    state::save_controller(&controller)?;
    Ok(())
}

use clap::Subcommand;
use uuid::Uuid;

use timekeep_core::HistoryStore;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recent records, newest first
    List {
        /// How many records to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Rename a record
    Rename { id: Uuid, name: String },
    /// Delete a record
    Delete { id: Uuid },
    /// Delete all records
    Clear,
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut history, warning) = HistoryStore::load_or_empty(HistoryStore::default_path()?);
    if let Some(w) = warning {
        eprintln!("warning: {w}; starting with an empty history");
    }

    match action {
        HistoryAction::List { limit } => {
            println!("{}", serde_json::to_string_pretty(history.recent(limit))?);
        }
        HistoryAction::Rename { id, name } => {
            history.rename(id, &name)?;
            println!("ok");
        }
        HistoryAction::Delete { id } => {
            let record = history.remove(id)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        HistoryAction::Clear => {
            history.clear()?;
            println!("history cleared");
        }
    }
    Ok(())
}

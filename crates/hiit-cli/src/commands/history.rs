use std::path::PathBuf;

use clap::Subcommand;
use hiit_core::HistoryStore;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Most recent workouts, newest first
    List {
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the full history as a text report
    Export {
        /// Destination file
        path: PathBuf,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = HistoryStore::open()?;

    match action {
        HistoryAction::List { limit, json } => {
            let recent = store.recent(limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&recent)?);
            } else if recent.is_empty() {
                println!("No workout history yet.");
            } else {
                for record in recent {
                    println!("{}", record.summary());
                }
            }
        }
        HistoryAction::Export { path } => {
            let count = store.export_text(&path)?;
            if count == 0 {
                println!("No workout history to export.");
            } else {
                println!("History exported to {} ({count} workouts)", path.display());
            }
        }
    }
    Ok(())
}

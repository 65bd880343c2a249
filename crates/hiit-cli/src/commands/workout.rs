use clap::Subcommand;
use hiit_core::format::format_time;
use hiit_core::WorkoutStore;

use super::plan::PlanArgs;

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Save a plan under a name (replaces an existing one)
    Save {
        /// Workout name
        name: String,
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Show a saved workout
    Load {
        name: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved workouts
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved workout
    Delete { name: String },
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = WorkoutStore::open()?;

    match action {
        WorkoutAction::Save { name, plan } => {
            let saved = store.save(&name, &plan.resolve()?)?;
            println!("Workout '{}' saved.", saved.name);
        }
        WorkoutAction::Load { name, json } => {
            let saved = store.load(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&saved)?);
            } else {
                print!("{}", saved.plan().preview());
            }
        }
        WorkoutAction::List { json } => {
            let all = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else if all.is_empty() {
                println!("No saved workouts.");
            } else {
                for w in all {
                    println!(
                        "{} ({} sets, {} intervals, {})",
                        w.name,
                        w.sets,
                        w.intervals.len(),
                        format_time(w.plan().total_duration_secs())
                    );
                }
            }
        }
        WorkoutAction::Delete { name } => {
            store.delete(&name)?;
            println!("Workout '{name}' deleted.");
        }
    }
    Ok(())
}

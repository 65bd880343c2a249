use clap::{Args, Subcommand};
use hiit_core::{Interval, WorkoutPlan, WorkoutStore};

/// How a command gets its workout plan.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Number of sets
    #[arg(long, default_value_t = 1)]
    pub sets: u32,
    /// Interval as NAME:SECONDS, repeat in order (e.g. --interval Work:30 --interval Rest:10)
    #[arg(long = "interval", value_name = "NAME:SECS", value_parser = parse_interval)]
    pub intervals: Vec<Interval>,
    /// Use a saved workout
    #[arg(long, conflicts_with_all = ["intervals", "tabata"])]
    pub workout: Option<String>,
    /// Quick Tabata: 8 sets of Work 20s / Rest 10s
    #[arg(long, conflicts_with = "intervals")]
    pub tabata: bool,
}

impl PlanArgs {
    pub fn resolve(&self) -> Result<WorkoutPlan, Box<dyn std::error::Error>> {
        if self.tabata {
            return Ok(WorkoutPlan::quick_tabata());
        }
        if let Some(name) = &self.workout {
            return Ok(WorkoutStore::open()?.load(name)?.plan());
        }
        Ok(WorkoutPlan::new(self.sets, self.intervals.clone()))
    }
}

fn parse_interval(s: &str) -> Result<Interval, String> {
    let (name, secs) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:SECONDS, got '{s}'"))?;
    let secs: u64 = secs
        .trim()
        .parse()
        .map_err(|_| format!("'{secs}' is not a number of seconds"))?;
    Ok(Interval::new(name.trim(), secs))
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Print the plan's sets, total time and intervals
    Preview {
        #[command(flatten)]
        plan: PlanArgs,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Preview { plan } => {
            let plan = plan.resolve()?;
            plan.validate()?;
            print!("{}", plan.preview());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_seconds() {
        assert_eq!(parse_interval("Work:30").unwrap(), Interval::new("Work", 30));
        assert_eq!(
            parse_interval("Jump rope: 45").unwrap(),
            Interval::new("Jump rope", 45)
        );
    }

    #[test]
    fn rejects_malformed_intervals() {
        assert!(parse_interval("Work").is_err());
        assert!(parse_interval("Work:abc").is_err());
        assert!(parse_interval("Work:-5").is_err());
    }
}

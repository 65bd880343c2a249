//! Real-time workout runner.
//!
//! The tick driver and a stdin reader thread feed one event loop that owns
//! the terminal. Keys (followed by Enter): `p` pause/resume, `r` reset, `q` quit.

use std::io::{BufRead, Write};
use std::time::Duration;

use chrono::Utc;
use clap::Args;
use hiit_core::format::{format_countdown, format_time};
use hiit_core::storage::CuesConfig;
use hiit_core::timer::{self, TickDriver};
use hiit_core::{
    Config, Event, HistoryStore, IntervalSequencer, RunState, SharedSequencer, WorkoutPlan,
    WorkoutRecord,
};
use tokio::sync::mpsc;

use super::plan::PlanArgs;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
    /// Print events as JSON lines instead of the countdown display
    #[arg(long)]
    pub json: bool,
    /// Milliseconds per tick (defaults to timer.tick_ms from config)
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Do not record the workout in history
    #[arg(long)]
    pub no_history: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    TogglePause,
    Reset,
    Quit,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let plan = args.plan.resolve()?;
    let mut sequencer = IntervalSequencer::with_plan(plan.clone())?;
    let tick = Duration::from_millis(args.tick_ms.unwrap_or(config.timer.tick_ms));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut screen = Screen::new(args.json, config.ui.dark_mode, config.cues.clone(), &plan);
    if !args.json {
        print!("{}", plan.preview());
        println!("\nControls: p + Enter = pause/resume, r = reset, q = quit\n");
    }
    tracing::debug!(tick_ms = tick.as_millis() as u64, sets = plan.sets, "starting workout");
    screen.show(&sequencer.start()?)?;

    let total = runtime.block_on(drive(timer::shared(sequencer), tick, &mut screen))?;

    if let Some(total_elapsed) = total {
        if !args.no_history {
            HistoryStore::open()?.append(WorkoutRecord::new(&plan, total_elapsed, Utc::now()))?;
        }
    }
    Ok(())
}

/// Run the event loop until the workout completes or the user stops it.
///
/// Returns the total elapsed seconds of a completed workout.
async fn drive(
    sequencer: SharedSequencer,
    tick: Duration,
    screen: &mut Screen,
) -> Result<Option<u64>, Box<dyn std::error::Error>> {
    let (event_tx, mut events) = mpsc::unbounded_channel();
    let driver = TickDriver::spawn(sequencer.clone(), tick, event_tx);
    let mut keys = spawn_key_reader();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    screen.show(&event)?;
                    if let Event::WorkoutCompleted { total_elapsed_secs } = event {
                        screen.completion_cue().await?;
                        driver.finished().await;
                        return Ok(Some(total_elapsed_secs));
                    }
                }
                None => break,
            },
            Some(key) = keys.recv() => {
                let mut seq = sequencer.lock().await;
                let result = match key {
                    Key::TogglePause if seq.run_state() == RunState::Paused => seq.resume(),
                    Key::TogglePause => seq.pause(),
                    Key::Reset | Key::Quit => Ok(seq.reset()),
                };
                drop(seq);
                match result {
                    Ok(event) => screen.show(&event)?,
                    Err(e) => screen.notice(&e.to_string())?,
                }
                if matches!(key, Key::Reset | Key::Quit) {
                    break;
                }
            }
        }
    }

    driver.stop();
    Ok(None)
}

/// Blocking stdin reads stay off the runtime; lines become [`Key`]s.
fn spawn_key_reader() -> mpsc::UnboundedReceiver<Key> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let key = match line.trim() {
                "p" | "P" => Key::TogglePause,
                "r" | "R" => Key::Reset,
                "q" | "Q" => Key::Quit,
                _ => continue,
            };
            if tx.send(key).is_err() {
                break;
            }
        }
    });
    rx
}

struct Palette {
    work: &'static str,
    rest: &'static str,
    done: &'static str,
}

const DARK: Palette = Palette {
    work: "\x1b[38;5;202m",
    rest: "\x1b[38;5;117m",
    done: "\x1b[38;5;71m",
};
const LIGHT: Palette = Palette {
    work: "\x1b[38;5;160m",
    rest: "\x1b[38;5;25m",
    done: "\x1b[38;5;28m",
};
const RESET_COLOUR: &str = "\x1b[0m";
const BELL: &str = "\x07";

/// Terminal rendering of sequencer events.
struct Screen {
    json: bool,
    palette: &'static Palette,
    cues: CuesConfig,
    sets: u32,
    total_secs: u64,
    mid_line: bool,
}

impl Screen {
    fn new(json: bool, dark_mode: bool, cues: CuesConfig, plan: &WorkoutPlan) -> Self {
        Self {
            json,
            palette: if dark_mode { &DARK } else { &LIGHT },
            cues,
            sets: plan.sets,
            total_secs: plan.total_duration_secs(),
            mid_line: false,
        }
    }

    fn show(&mut self, event: &Event) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.json {
            let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
            writeln!(out, "{line}")?;
            return out.flush();
        }

        match event {
            Event::Progress {
                time_remaining_secs,
                total_elapsed_secs,
                fraction_complete,
            } => {
                write!(
                    out,
                    "\r  {}  {}  Elapsed: {}  Remaining: {}   ",
                    format_countdown(*time_remaining_secs),
                    progress_bar(*fraction_complete, 20),
                    format_time(*total_elapsed_secs),
                    format_time(self.total_secs.saturating_sub(*total_elapsed_secs)),
                )?;
                self.mid_line = true;
            }
            Event::IntervalStarted {
                set_index,
                name,
                duration_secs,
                rest,
                ..
            } => {
                self.end_line(&mut out)?;
                let colour = if *rest { self.palette.rest } else { self.palette.work };
                let bell = if self.cues.enabled { BELL } else { "" };
                writeln!(
                    out,
                    "{bell}Set {} of {} - {colour}{name}{RESET_COLOUR} ({})",
                    set_index + 1,
                    self.sets,
                    format_countdown(*duration_secs)
                )?;
            }
            Event::SetAdvanced { .. } => {}
            Event::WorkoutCompleted { total_elapsed_secs } => {
                self.end_line(&mut out)?;
                writeln!(
                    out,
                    "{}Workout Complete!{RESET_COLOUR} Great job, you finished in {}.",
                    self.palette.done,
                    format_time(*total_elapsed_secs)
                )?;
            }
            Event::Paused { time_remaining_secs } => {
                self.end_line(&mut out)?;
                writeln!(out, "Paused at {}", format_countdown(*time_remaining_secs))?;
            }
            Event::Resumed { .. } => {
                self.end_line(&mut out)?;
                writeln!(out, "Resumed")?;
            }
            Event::Reset => {
                self.end_line(&mut out)?;
                writeln!(out, "Workout reset.")?;
            }
            Event::Snapshot { .. } => {}
        }
        out.flush()
    }

    fn notice(&mut self, message: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        self.end_line(&mut out)?;
        writeln!(out, "! {message}")?;
        out.flush()
    }

    async fn completion_cue(&self) -> std::io::Result<()> {
        if self.json || !self.cues.enabled {
            return Ok(());
        }
        for _ in 0..self.cues.completion_beeps {
            {
                let mut out = std::io::stdout().lock();
                write!(out, "{BELL}")?;
                out.flush()?;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Ok(())
    }

    fn end_line(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        if self.mid_line {
            writeln!(out)?;
            self.mid_line = false;
        }
        Ok(())
    }
}

fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

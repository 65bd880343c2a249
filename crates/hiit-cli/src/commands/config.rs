//! `hiit config`: settings in `config.toml` under the data directory.

use clap::Subcommand;
use hiit_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the settings file
    #[command(alias = "list")]
    Show,
    /// Print one setting (e.g. "ui.dark_mode", "cues.completion_beeps")
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Flip an on/off setting such as "ui.dark_mode" or "cues.enabled"
    Toggle { key: String },
    /// Print where the settings file lives
    Path,
    /// Restore the default settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => print!("{}", Config::load()?.to_toml()?),
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::Toggle { key } => {
            let mut config = Config::load()?;
            let now = config.toggle(&key)?;
            config.save()?;
            println!("{key} = {now}");
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("Settings restored to defaults.");
        }
    }
    Ok(())
}

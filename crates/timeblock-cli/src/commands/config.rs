use clap::Subcommand;
use timeblock_core::EngineConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "preferences.wakeTime", "timeOfDay.evening")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
    /// Print the config file location
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = EngineConfig::load_or_default();
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = EngineConfig::load_or_default();
            config.set(&key, &value)?;
            config.save_to(&EngineConfig::path()?)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = EngineConfig::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            EngineConfig::default().save_to(&EngineConfig::path()?)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => {
            println!("{}", EngineConfig::path()?.display());
        }
    }
    Ok(())
}

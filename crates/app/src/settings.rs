//! Settings of the `nolkan` binary.
//!
//! Sources, lowest precedence first: defaults, the TOML file
//! (`config/nolkan.toml` unless `--config` says otherwise), `NOLKAN_*`
//! environment variables, then command-line overrides.

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/nolkan.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: String,
    pub level: String,
    pub load_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: "sqlite:./nolkan.db?mode=rwc".to_string(),
            level: "info".to_string(),
            load_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("NOLKAN"));
        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply(args);
        Ok(settings)
    }

    fn apply(&mut self, args: &GlobalArgs) {
        if let Some(database) = &args.database {
            self.database.clone_from(database);
        }
        if let Some(level) = &args.level {
            self.level.clone_from(level);
        }
    }

    /// Env filter directive for the subscriber.
    pub fn log_filter(&self) -> String {
        format!("nolkan={level},engine={level}", level = self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_wins_over_file_values() {
        let mut settings = Settings {
            database: "sqlite:./from-file.db".to_string(),
            level: "warn".to_string(),
            load_timeout_secs: 3,
        };
        let args = GlobalArgs {
            config: None,
            database: Some("sqlite::memory:".to_string()),
            level: None,
        };

        settings.apply(&args);

        assert_eq!(settings.database, "sqlite::memory:");
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.load_timeout_secs, 3);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let args = GlobalArgs {
            config: Some("does/not/exist.toml".to_string()),
            database: None,
            level: Some("debug".to_string()),
        };

        let settings = Settings::load(&args).unwrap();

        assert_eq!(settings.level, "debug");
        assert_eq!(settings.log_filter(), "nolkan=debug,engine=debug");
    }
}

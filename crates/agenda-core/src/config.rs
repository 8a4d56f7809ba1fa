use anyhow::Result;
use chrono::NaiveDate;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_NOTIFIER_TICK_MILLIS, DEFAULT_REPEAT_END_DATE, DEFAULT_STORAGE_PATH,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageConfig,
    pub schedule: ScheduleConfig,
    pub notifier: NotifierConfig,
    pub logging: LoggingConfig,
}

/// What to do when a submitted event overlaps stored events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Report the overlap and let the caller acknowledge it before saving.
    #[default]
    Warn,
    /// Refuse to save overlapping events.
    Block,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Ceiling for repeating events submitted without an end date.
    pub default_repeat_end: NaiveDate,
    pub conflict_policy: ConflictPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_repeat_end: DEFAULT_REPEAT_END_DATE,
            conflict_policy: ConflictPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    pub tick_millis: u64,
}

impl NotifierConfig {
    #[must_use]
    pub const fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, environment variables and an optional
    /// `config.toml`. Environment variables use the `AGENDA__SECTION__KEY` form.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating it fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("storage.path", DEFAULT_STORAGE_PATH)?
            .set_default(
                "schedule.default_repeat_end",
                DEFAULT_REPEAT_END_DATE.to_string(),
            )?
            .set_default("schedule.conflict_policy", "warn")?
            .set_default("notifier.tick_millis", DEFAULT_NOTIFIER_TICK_MILLIS)?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::with_prefix("AGENDA")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Rejects settings that would make the scheduler misbehave.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` when the notifier tick is zero or the
    /// storage path is empty.
    pub fn validate(&self) -> CoreResult<()> {
        if self.notifier.tick_millis == 0 {
            return Err(CoreError::ConfigError(
                "notifier.tick_millis must be greater than zero".to_string(),
            ));
        }
        if self.storage.path.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "storage.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!(error = %err, "No .env file loaded");
    }

    Settings::load()
}

//! Configuration file support for the HOS planner.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/hos-planner/config.toml`.
//! The `[rules]` table carries the regulatory constants the simulation
//! engine runs on; every key is optional and falls back to the
//! defaults: 11 hours of driving per day, a 70-hour cycle, 55 mph.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minutes in one hour, used for every hours/minutes conversion.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rules: HosRules,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Hours-of-service rule set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HosRules {
    #[serde(default = "default_max_daily_drive_hours")]
    pub max_daily_drive_hours: f64,

    #[serde(default = "default_max_cycle_hours")]
    pub max_cycle_hours: f64,

    #[serde(default = "default_speed_mph")]
    pub speed_mph: f64,

    /// Continuous driving allowed before a break is required
    #[serde(default = "default_break_after_hours")]
    pub break_after_hours: f64,

    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,

    /// Off-duty block that opens every day
    #[serde(default = "default_off_duty_start_minutes")]
    pub off_duty_start_minutes: u32,

    #[serde(default = "default_pickup_minutes")]
    pub pickup_minutes: u32,

    #[serde(default = "default_dropoff_minutes")]
    pub dropoff_minutes: u32,

    #[serde(default = "default_fuel_interval_miles")]
    pub fuel_interval_miles: f64,

    #[serde(default = "default_fuel_minutes")]
    pub fuel_minutes: u32,

    #[serde(default = "default_day_minutes")]
    pub day_minutes: u32,
}

impl Default for HosRules {
    fn default() -> Self {
        Self {
            max_daily_drive_hours: default_max_daily_drive_hours(),
            max_cycle_hours: default_max_cycle_hours(),
            speed_mph: default_speed_mph(),
            break_after_hours: default_break_after_hours(),
            break_minutes: default_break_minutes(),
            off_duty_start_minutes: default_off_duty_start_minutes(),
            pickup_minutes: default_pickup_minutes(),
            dropoff_minutes: default_dropoff_minutes(),
            fuel_interval_miles: default_fuel_interval_miles(),
            fuel_minutes: default_fuel_minutes(),
            day_minutes: default_day_minutes(),
        }
    }
}

/// Export location configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
        }
    }
}

// Default value functions
fn default_max_daily_drive_hours() -> f64 {
    11.0
}

fn default_max_cycle_hours() -> f64 {
    70.0
}

fn default_speed_mph() -> f64 {
    55.0
}

fn default_break_after_hours() -> f64 {
    8.0
}

fn default_break_minutes() -> u32 {
    30
}

fn default_off_duty_start_minutes() -> u32 {
    60
}

fn default_pickup_minutes() -> u32 {
    60
}

fn default_dropoff_minutes() -> u32 {
    60
}

fn default_fuel_interval_miles() -> f64 {
    1000.0
}

fn default_fuel_minutes() -> u32 {
    30
}

fn default_day_minutes() -> u32 {
    1440
}

fn default_export_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hos-planner")
}

impl HosRules {
    /// Check that the rule set describes a schedule the engine can run
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_daily_drive_hours", self.max_daily_drive_hours),
            ("max_cycle_hours", self.max_cycle_hours),
            ("speed_mph", self.speed_mph),
            ("break_after_hours", self.break_after_hours),
            ("fuel_interval_miles", self.fuel_interval_miles),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        let durations = [
            ("break_minutes", self.break_minutes),
            ("pickup_minutes", self.pickup_minutes),
            ("dropoff_minutes", self.dropoff_minutes),
            ("fuel_minutes", self.fuel_minutes),
            ("day_minutes", self.day_minutes),
        ];
        for (name, value) in durations {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than zero", name)));
            }
        }

        let activities = [
            ("break_minutes", self.break_minutes),
            ("off_duty_start_minutes", self.off_duty_start_minutes),
            ("pickup_minutes", self.pickup_minutes),
            ("dropoff_minutes", self.dropoff_minutes),
            ("fuel_minutes", self.fuel_minutes),
        ];
        for (name, value) in activities {
            if value > self.day_minutes {
                return Err(Error::Config(format!(
                    "{} ({}) is longer than a {}-minute day",
                    name, value, self.day_minutes
                )));
            }
        }

        // Day 1 must leave room to drive after the off-duty block and pickup
        if self.off_duty_start_minutes.saturating_add(self.pickup_minutes) >= self.day_minutes {
            return Err(Error::Config(format!(
                "off_duty_start_minutes ({}) plus pickup_minutes ({}) leave no driving time in a {}-minute day",
                self.off_duty_start_minutes, self.pickup_minutes, self.day_minutes
            )));
        }

        if self.break_threshold_minutes() == 0 {
            return Err(Error::Config(
                "break_after_hours must be at least one minute".into(),
            ));
        }

        if self.max_daily_drive_hours * MINUTES_PER_HOUR > f64::from(self.day_minutes) {
            return Err(Error::Config(format!(
                "max_daily_drive_hours ({}) does not fit in a {}-minute day",
                self.max_daily_drive_hours, self.day_minutes
            )));
        }

        Ok(())
    }

    /// Break threshold expressed in whole minutes
    pub fn break_threshold_minutes(&self) -> u32 {
        hours_to_minutes(self.break_after_hours)
    }

    /// Distance covered by `minutes` of driving at the configured speed
    pub fn miles_for_minutes(&self, minutes: u32) -> f64 {
        f64::from(minutes) / MINUTES_PER_HOUR * self.speed_mph
    }
}

/// Convert hours to whole minutes, truncating any sub-minute remainder
pub fn hours_to_minutes(hours: f64) -> u32 {
    if hours <= 0.0 {
        return 0;
    }
    (hours * MINUTES_PER_HOUR).floor() as u32
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.rules.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("hos-planner").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

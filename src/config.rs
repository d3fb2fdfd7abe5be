use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

const ENV_PREFIX: &str = "FITMATCH";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub default_radius_miles: Option<u32>,
    pub default_limit: Option<u32>,
    /// Upper bound on each repository call; unset means wait indefinitely
    pub repository_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Points awarded per scoring component
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_activities_weight")]
    pub activities: f64,
    #[serde(default = "default_schedule_weight")]
    pub schedule: f64,
    #[serde(default = "default_fitness_level_weight")]
    pub fitness_level: f64,
    #[serde(default = "default_points_per_shared_goal")]
    pub points_per_shared_goal: f64,
    #[serde(default = "default_goal_cap")]
    pub goal_cap: f64,
    #[serde(default = "default_home_gym_bonus")]
    pub home_gym: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            distance: default_distance_weight(),
            activities: default_activities_weight(),
            schedule: default_schedule_weight(),
            fitness_level: default_fitness_level_weight(),
            points_per_shared_goal: default_points_per_shared_goal(),
            goal_cap: default_goal_cap(),
            home_gym: default_home_gym_bonus(),
        }
    }
}

impl WeightsConfig {
    /// Every factor must be a finite, non-negative number of points
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("distance", self.distance),
            ("activities", self.activities),
            ("schedule", self.schedule),
            ("fitness_level", self.fitness_level),
            ("points_per_shared_goal", self.points_per_shared_goal),
            ("goal_cap", self.goal_cap),
            ("home_gym", self.home_gym),
        ];

        match fields.iter().find(|(_, value)| !value.is_finite() || *value < 0.0) {
            Some((name, value)) => Err(ConfigError::Message(format!(
                "scoring.weights.{} must be a finite non-negative number, got {}",
                name, value
            ))),
            None => Ok(()),
        }
    }
}

impl TryFrom<&WeightsConfig> for ScoringWeights {
    type Error = ConfigError;

    fn try_from(config: &WeightsConfig) -> Result<Self, Self::Error> {
        config.validate()?;

        Ok(Self {
            distance: config.distance,
            activities: config.activities,
            schedule: config.schedule,
            fitness_level: config.fitness_level,
            points_per_shared_goal: config.points_per_shared_goal,
            goal_cap: config.goal_cap,
            home_gym: config.home_gym,
        })
    }
}

fn default_distance_weight() -> f64 { 40.0 }
fn default_activities_weight() -> f64 { 30.0 }
fn default_schedule_weight() -> f64 { 20.0 }
fn default_fitness_level_weight() -> f64 { 10.0 }
fn default_points_per_shared_goal() -> f64 { 3.0 }
fn default_goal_cap() -> f64 { 10.0 }
fn default_home_gym_bonus() -> f64 { 5.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Later sources override earlier ones:
    /// 1. Default values in the structs
    /// 2. config/default.toml, then config/local.toml
    /// 3. Environment variables prefixed with FITMATCH__
    /// 4. DATABASE_URL, when set
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g. FITMATCH__MATCHING__DEFAULT_LIMIT -> matching.default_limit
            .add_source(environment())
            .build()?;

        Self::from_config(database_url_override(settings)?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::from_config(settings)
    }

    /// Deserialize assembled sources and reject values the engine cannot use
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Self = config.try_deserialize()?;
        settings.scoring.weights.validate()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// The conventional DATABASE_URL wins over anything in files
fn database_url_override(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

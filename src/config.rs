use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reports: ReportsConfig,
    #[serde(default)]
    pub proximity: ProximityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// How many entries the top-stores ranking returns when the caller
    /// does not pass an explicit limit.
    #[serde(default = "default_top_stores_limit")]
    pub top_stores_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProximityConfig {
    /// Default search radius for proximity queries, in meters.
    #[serde(default = "default_radius_meters")]
    pub radius_meters: f64,
    /// Cap on the number of stores a proximity query returns.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_top_stores_limit() -> usize {
    10
}

fn default_radius_meters() -> f64 {
    10_000.0
}

fn default_max_results() -> usize {
    10
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            top_stores_limit: default_top_stores_limit(),
        }
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            max_results: default_max_results(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        if !Path::new(config_path).exists() {
            debug!("No config file at '{}', using defaults", config_path);
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub booking_rules: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub storage_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    #[serde(default = "default_quantity")]
    pub default_quantity: u32,
    /// Refetch the inventory snapshot and re-validate the draft before the
    /// confirmation panel. Off by default to keep the historical flow.
    #[serde(default)]
    pub refetch_before_submit: bool,
}

fn default_quantity() -> u32 {
    1
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            default_quantity: default_quantity(),
            refetch_before_submit: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of TROPA)
            // Eg.. `TROPA__API__BASE_URL=...` would set the api.base_url key
            .add_source(config::Environment::with_prefix("TROPA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

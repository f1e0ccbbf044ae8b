use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Products at or below this stock count show up in the dashboard
    /// low-stock list.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
    /// Cadence of the background availability sweep. Zero disables it.
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_seconds: u64,
}

fn default_low_stock_threshold() -> i32 {
    5
}

fn default_reconcile_interval() -> u64 {
    60
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
            reconcile_interval_seconds: default_reconcile_interval(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Per-environment file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Environment variables with a prefix of BODEGA
            // E.g. `BODEGA__SERVER__PORT=9000` would set `server.port`
            .add_source(config::Environment::with_prefix("BODEGA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

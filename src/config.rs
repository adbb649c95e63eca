//! Runtime configuration, read from the environment (and `.env` via dotenv).

use std::env;

/// Default plan file when `NETBUILDER_PLAN` is unset.
pub const DEFAULT_PLAN: &str = "plan.json";
/// Default log4rs config when `NETBUILDER_LOG_CONFIG` is unset.
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the allocation plan JSON.
    pub plan_file: String,
    /// Path of the log4rs YAML config.
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            plan_file: DEFAULT_PLAN.to_string(),
            log_config: DEFAULT_LOG_CONFIG.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read `NETBUILDER_*` variables.
    pub fn from_env() -> Config {
        dotenv::dotenv().ok();
        Config::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let defaults = Config::default();
        Config {
            plan_file: lookup("NETBUILDER_PLAN").unwrap_or(defaults.plan_file),
            log_config: lookup("NETBUILDER_LOG_CONFIG").unwrap_or(defaults.log_config),
        }
    }
}

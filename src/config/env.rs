//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "RUN_SUMMARY";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Output format from RUN_SUMMARY_FORMAT
    pub format: Option<String>,
    /// Failures section from RUN_SUMMARY_SHOW_FAILURES
    pub show_failures: Option<bool>,
    /// Parallel replay from RUN_SUMMARY_PARALLEL
    pub parallel: Option<bool>,
    /// Concurrency from RUN_SUMMARY_MAX_CONCURRENT
    pub max_concurrent: Option<usize>,
    /// Log level from RUN_SUMMARY_LOG_LEVEL
    pub log_level: Option<String>,
    /// Config file from RUN_SUMMARY_CONFIG
    pub config_file: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            format: get_env("FORMAT"),
            show_failures: get_env_bool("SHOW_FAILURES"),
            parallel: get_env_bool("PARALLEL"),
            max_concurrent: get_env_parse("MAX_CONCURRENT"),
            log_level: get_env("LOG_LEVEL"),
            config_file: get_env("CONFIG"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.format.is_some()
            || self.show_failures.is_some()
            || self.parallel.is_some()
            || self.max_concurrent.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Print all RUN_SUMMARY environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_FORMAT          Output format (text, json, json-pretty)");
    println!("  {ENV_PREFIX}_SHOW_FAILURES   Print the failures section (true/false)");
    println!("  {ENV_PREFIX}_PARALLEL        Replay node events in parallel (true/false)");
    println!("  {ENV_PREFIX}_MAX_CONCURRENT  Maximum concurrent event chains");
    println!("  {ENV_PREFIX}_LOG_LEVEL       Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_FORMAT=json");
    println!("  run-summary summarize run.yaml");
}

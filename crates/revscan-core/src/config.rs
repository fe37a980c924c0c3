use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, LocatorMode, SourceMode};
use crate::ConfigError;

/// Desktop browser user agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("REVSCAN_LOG_LEVEL", "info");
    let input_path = PathBuf::from(or_default("REVSCAN_INPUT_PATH", "./roofers-data.json"));
    let output_path = PathBuf::from(or_default(
        "REVSCAN_OUTPUT_PATH",
        "./yelp-reviews-analysis.json",
    ));
    let progress_path = PathBuf::from(or_default(
        "REVSCAN_PROGRESS_PATH",
        "./yelp-scrape-progress.json",
    ));
    let urls_path = PathBuf::from(or_default("REVSCAN_URLS_PATH", "./yelp-urls.csv"));
    let report_path = PathBuf::from(or_default(
        "REVSCAN_REPORT_PATH",
        "./yelp-analysis-report.md",
    ));

    let locator = LocatorMode::from_str(&or_default("REVSCAN_LOCATOR", "lookup")).map_err(
        |reason| ConfigError::InvalidEnvVar {
            var: "REVSCAN_LOCATOR".to_string(),
            reason,
        },
    )?;
    let source = SourceMode::from_str(&or_default("REVSCAN_SOURCE", "scrape")).map_err(
        |reason| ConfigError::InvalidEnvVar {
            var: "REVSCAN_SOURCE".to_string(),
            reason,
        },
    )?;

    let site_base_url = or_default("REVSCAN_SITE_BASE_URL", "https://www.yelp.com");
    let api_base_url = or_default("REVSCAN_API_BASE_URL", "https://api.yelp.com/v3");
    let api_key = lookup("YELP_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());

    let request_timeout_secs = parse_u64("REVSCAN_REQUEST_TIMEOUT_SECS", "15")?;
    let connect_timeout_secs = parse_u64("REVSCAN_CONNECT_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("REVSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("REVSCAN_INTER_REQUEST_DELAY_MS", "1000")?;
    let rate_limit_cooldown_secs = parse_u64("REVSCAN_RATE_LIMIT_COOLDOWN_SECS", "60")?;

    Ok(AppConfig {
        log_level,
        input_path,
        output_path,
        progress_path,
        urls_path,
        report_path,
        locator,
        source,
        site_base_url,
        api_base_url,
        api_key,
        request_timeout_secs,
        connect_timeout_secs,
        user_agent,
        inter_request_delay_ms,
        rate_limit_cooldown_secs,
    })
}

impl AppConfig {
    /// Check cross-field requirements that only apply to some modes.
    ///
    /// Call after CLI overrides are applied; loading alone does not check
    /// these so that commands which never touch the network still work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the API source is selected
    /// without `YELP_API_KEY`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source == SourceMode::Api && self.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar("YELP_API_KEY".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

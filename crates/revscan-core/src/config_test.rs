use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_when_env_is_empty() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.input_path, PathBuf::from("./roofers-data.json"));
    assert_eq!(cfg.output_path, PathBuf::from("./yelp-reviews-analysis.json"));
    assert_eq!(cfg.progress_path, PathBuf::from("./yelp-scrape-progress.json"));
    assert_eq!(cfg.urls_path, PathBuf::from("./yelp-urls.csv"));
    assert_eq!(cfg.locator, LocatorMode::Lookup);
    assert_eq!(cfg.source, SourceMode::Scrape);
    assert_eq!(cfg.site_base_url, "https://www.yelp.com");
    assert_eq!(cfg.api_base_url, "https://api.yelp.com/v3");
    assert!(cfg.api_key.is_none());
    assert_eq!(cfg.request_timeout_secs, 15);
    assert_eq!(cfg.connect_timeout_secs, 10);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.inter_request_delay_ms, 1000);
    assert_eq!(cfg.rate_limit_cooldown_secs, 60);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_LOCATOR", "Search");
    map.insert("REVSCAN_INTER_REQUEST_DELAY_MS", "2000");
    map.insert("REVSCAN_RATE_LIMIT_COOLDOWN_SECS", "90");
    map.insert("REVSCAN_INPUT_PATH", "/data/roofers.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.locator, LocatorMode::Search);
    assert_eq!(cfg.inter_request_delay_ms, 2000);
    assert_eq!(cfg.rate_limit_cooldown_secs, 90);
    assert_eq!(cfg.input_path, PathBuf::from("/data/roofers.json"));
}

#[test]
fn build_app_config_rejects_invalid_number() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCAN_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(REVSCAN_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_unknown_locator() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_LOCATOR", "guess");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCAN_LOCATOR"),
        "expected InvalidEnvVar(REVSCAN_LOCATOR), got: {result:?}"
    );
}

#[test]
fn api_source_without_key_fails_validation() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_SOURCE", "api");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let result = cfg.validate();
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "YELP_API_KEY"),
        "expected MissingEnvVar(YELP_API_KEY), got: {result:?}"
    );
}

#[test]
fn blank_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_SOURCE", "api");
    map.insert("YELP_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.api_key.is_none());
    assert!(cfg.validate().is_err());
}

#[test]
fn api_source_with_key_passes_validation() {
    let mut map = HashMap::new();
    map.insert("REVSCAN_SOURCE", "api");
    map.insert("YELP_API_KEY", "secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source, SourceMode::Api);
    assert!(cfg.validate().is_ok());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("YELP_API_KEY", "super-secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret-key"));
    assert!(rendered.contains("[redacted]"));
}

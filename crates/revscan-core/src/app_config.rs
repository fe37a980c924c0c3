use std::path::PathBuf;

/// How the candidate review-page URL for a business is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorMode {
    /// Externally supplied name → URL table. No network call when a name is absent.
    Lookup,
    /// Fetch the directory's search page and take the first business-profile link.
    Search,
    /// Ask an operator on the terminal to paste the URL.
    Prompt,
}

impl std::fmt::Display for LocatorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocatorMode::Lookup => write!(f, "lookup"),
            LocatorMode::Search => write!(f, "search"),
            LocatorMode::Prompt => write!(f, "prompt"),
        }
    }
}

impl std::str::FromStr for LocatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lookup" => Ok(LocatorMode::Lookup),
            "search" => Ok(LocatorMode::Search),
            "prompt" => Ok(LocatorMode::Prompt),
            other => Err(format!(
                "unknown locator mode \"{other}\" (expected lookup, search or prompt)"
            )),
        }
    }
}

/// Where rating and review data come from once a business is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Locate a review page, fetch its HTML and run the page extractor.
    Scrape,
    /// Query the directory's JSON API with a bearer token.
    Api,
}

impl std::fmt::Display for SourceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceMode::Scrape => write!(f, "scrape"),
            SourceMode::Api => write!(f, "api"),
        }
    }
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scrape" => Ok(SourceMode::Scrape),
            "api" => Ok(SourceMode::Api),
            other => Err(format!(
                "unknown source mode \"{other}\" (expected scrape or api)"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub progress_path: PathBuf,
    pub urls_path: PathBuf,
    pub report_path: PathBuf,
    pub locator: LocatorMode,
    pub source: SourceMode,
    pub site_base_url: String,
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub rate_limit_cooldown_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("input_path", &self.input_path)
            .field("output_path", &self.output_path)
            .field("progress_path", &self.progress_path)
            .field("urls_path", &self.urls_path)
            .field("report_path", &self.report_path)
            .field("locator", &self.locator)
            .field("source", &self.source)
            .field("site_base_url", &self.site_base_url)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("rate_limit_cooldown_secs", &self.rate_limit_cooldown_secs)
            .finish()
    }
}

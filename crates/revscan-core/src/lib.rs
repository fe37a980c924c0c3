//! Shared data model and configuration for the review acquisition pipeline.
//!
//! Business records come in from an external import step, business results go
//! out to an external merge step. Everything in between (fetching, extraction,
//! classification, persistence) lives in the sibling crates and exchanges the
//! types defined here.

pub mod app_config;
pub mod config;
pub mod error;
pub mod records;
pub mod results;
pub mod url_map;

pub use app_config::{AppConfig, LocatorMode, SourceMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use records::{load_business_records, normalize_name, BusinessRecord};
pub use results::{BusinessResult, ClassifiedReview, RawReview, ReviewAnalysis};
pub use url_map::{absolutize_listing_url, load_url_map, UrlMap};

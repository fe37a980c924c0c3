//! Network side of the review pipeline: the rate-limited fetcher, the
//! business locators, the page extractor and the API-backed source.

pub mod client;
pub mod error;
pub mod extract;
pub mod fusion;
pub mod locator;
mod rate_limit;
pub mod source;

pub use client::ReviewClient;
pub use error::ScraperError;
pub use extract::{extract, BusinessExtract};
pub use fusion::FusionClient;
pub use locator::{Located, Locator, PromptLocator, SearchLocator};
pub use source::{ListingOutcome, ReviewSource};

//! Business Locator: derives a candidate review-page URL for a record.
//!
//! Three strategies share one `locate(record)` contract and are selected by
//! configuration. Every URL returned is absolute.

mod prompt;
mod search;

use revscan_core::{BusinessRecord, UrlMap};

use crate::client::{build_url, ReviewClient};
use crate::error::ScraperError;

pub use prompt::PromptLocator;
pub use search::{first_listing_link, SearchLocator};

/// What a locator found for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Listing(String),
    /// The business is not on the directory. Final for this record.
    NoListing,
    /// The search page could not be fetched; the record is retried next run.
    SearchFailed,
}

impl From<Option<String>> for Located {
    fn from(url: Option<String>) -> Self {
        url.map_or(Located::NoListing, Located::Listing)
    }
}

#[derive(Debug)]
pub enum Locator {
    /// Externally supplied name → URL table; never touches the network.
    Lookup(UrlMap),
    /// First business-profile link on the directory's search results page.
    Search(SearchLocator),
    /// An operator pastes the URL on the terminal.
    Prompt(PromptLocator),
}

impl Locator {
    /// Candidate review-page URL for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the search URL cannot be built,
    /// or [`ScraperError::Terminal`] if the prompt cannot read or write, or
    /// its input has ended.
    pub async fn locate(
        &mut self,
        client: &ReviewClient,
        record: &BusinessRecord,
    ) -> Result<Located, ScraperError> {
        match self {
            Locator::Lookup(map) => Ok(map.get(&record.name).map(str::to_owned).into()),
            Locator::Search(search) => search.locate(client, record).await,
            Locator::Prompt(prompt) => Ok(prompt.locate(record).await?.into()),
        }
    }
}

/// The directory's search page for `"{name} roofing"` near the record's location.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] if `site_base_url` is not an absolute URL.
pub fn search_url(site_base_url: &str, record: &BusinessRecord) -> Result<String, ScraperError> {
    let term = format!("{} roofing", record.name);
    let location = record.location();
    build_url(
        site_base_url,
        "search",
        &[("find_desc", term.as_str()), ("find_loc", location.as_str())],
    )
}

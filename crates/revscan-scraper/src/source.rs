//! Where a record's review data comes from: scraped pages or the API.

use revscan_core::BusinessRecord;

use crate::client::ReviewClient;
use crate::error::ScraperError;
use crate::extract::{extract, BusinessExtract};
use crate::fusion::FusionClient;
use crate::locator::{Located, Locator};

/// Result of looking up one business.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    /// The business has no listing on the directory.
    NoListing,
    /// A listing may exist but its data could not be fetched this run.
    FetchFailed { url: Option<String> },
    Found { url: String, extract: BusinessExtract },
}

#[derive(Debug)]
pub enum ReviewSource {
    /// Locate a review page, fetch it and run the page extractor.
    Scrape(Locator),
    /// Query the directory's JSON API.
    Api(FusionClient),
}

impl ReviewSource {
    /// Locate, fetch and extract one record's review data.
    ///
    /// Network failures are part of the outcome, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] only for problems that are not about the
    /// remote site: an unusable base URL or a broken terminal prompt.
    pub async fn acquire(
        &mut self,
        client: &ReviewClient,
        record: &BusinessRecord,
    ) -> Result<ListingOutcome, ScraperError> {
        match self {
            ReviewSource::Scrape(locator) => {
                let url = match locator.locate(client, record).await? {
                    Located::Listing(url) => url,
                    Located::NoListing => return Ok(ListingOutcome::NoListing),
                    Located::SearchFailed => return Ok(ListingOutcome::FetchFailed { url: None }),
                };
                match client.fetch(&url).await {
                    Some(html) => {
                        let extract = extract(&html);
                        Ok(ListingOutcome::Found { url, extract })
                    }
                    None => Ok(ListingOutcome::FetchFailed { url: Some(url) }),
                }
            }
            ReviewSource::Api(fusion) => fusion.acquire(client, record).await,
        }
    }
}

//! Review data from the directory's JSON API instead of scraped pages.

use serde::Deserialize;

use revscan_core::BusinessRecord;

use crate::client::{build_url, ReviewClient};
use crate::error::ScraperError;
use crate::extract::{BusinessExtract, ReviewCollector};
use crate::source::ListingOutcome;

/// Businesses requested per search; only the first is used.
const SEARCH_LIMIT: &str = "5";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    businesses: Vec<ApiBusiness>,
}

#[derive(Debug, Deserialize)]
struct ApiBusiness {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    review_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ReviewsResponse {
    #[serde(default)]
    reviews: Vec<ApiReview>,
}

#[derive(Debug, Deserialize)]
struct ApiReview {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
}

/// Bearer-authenticated client for the business search and reviews endpoints.
#[derive(Clone)]
pub struct FusionClient {
    api_base_url: String,
    api_key: String,
}

impl std::fmt::Debug for FusionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FusionClient")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

impl FusionClient {
    #[must_use]
    pub fn new(api_base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Search for the record's business and pull its reviews.
    ///
    /// The first search hit is taken without re-ranking. A failed search is a
    /// failed fetch; a failed reviews call still yields the business with no
    /// reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the API base URL is unusable.
    pub async fn acquire(
        &self,
        client: &ReviewClient,
        record: &BusinessRecord,
    ) -> Result<ListingOutcome, ScraperError> {
        let term = format!("{} roofing", record.name);
        let location = record.location();
        let search_url = build_url(
            &self.api_base_url,
            "businesses/search",
            &[
                ("term", term.as_str()),
                ("location", location.as_str()),
                ("limit", SEARCH_LIMIT),
            ],
        )?;

        let search = match client
            .get_json::<SearchResponse>(&search_url, Some(&self.api_key))
            .await
        {
            Ok(search) => search,
            Err(e) => {
                tracing::warn!(name = %record.name, error = %e, "business search failed");
                return Ok(ListingOutcome::FetchFailed { url: None });
            }
        };

        let Some(business) = search.businesses.into_iter().next() else {
            return Ok(ListingOutcome::NoListing);
        };

        let reviews_url = build_url(
            &self.api_base_url,
            &format!("businesses/{}/reviews", business.id),
            &[],
        )?;
        let mut collector = ReviewCollector::default();
        match client
            .get_json::<ReviewsResponse>(&reviews_url, Some(&self.api_key))
            .await
        {
            Ok(response) => {
                for review in response.reviews {
                    let rating = review.rating.and_then(crate::extract::star_rating);
                    collector.push(review.text.as_deref().unwrap_or_default(), rating);
                }
            }
            Err(e) => {
                tracing::warn!(
                    name = %record.name,
                    id = %business.id,
                    error = %e,
                    "reviews request failed"
                );
            }
        }

        let url = match business.url {
            Some(url) => url,
            None => build_url(
                &self.api_base_url,
                &format!("businesses/{}", business.id),
                &[],
            )?,
        };
        let extract = BusinessExtract {
            rating: business.rating.filter(|r| (0.0..=5.0).contains(r)),
            review_count: business.review_count.unwrap_or(0),
            reviews: collector.into_reviews(),
        };
        Ok(ListingOutcome::Found { url, extract })
    }
}

use std::sync::LazyLock;

use regex::Regex;
use revscan_core::{absolutize_listing_url, BusinessRecord};
use scraper::{Html, Selector};

use crate::client::ReviewClient;
use crate::error::ScraperError;

use super::Located;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));
static PROFILE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://[^/]+)?/biz/[^/?#\s]+").expect("valid regex"));

/// Fetches the directory's search page and takes the first profile link.
#[derive(Debug, Clone)]
pub struct SearchLocator {
    site_base_url: String,
}

impl SearchLocator {
    #[must_use]
    pub fn new(site_base_url: impl Into<String>) -> Self {
        Self {
            site_base_url: site_base_url.into(),
        }
    }

    /// No profile link on a fetched page is a missing listing; a page that
    /// could not be fetched at all is not.
    pub(super) async fn locate(
        &self,
        client: &ReviewClient,
        record: &BusinessRecord,
    ) -> Result<Located, ScraperError> {
        let url = super::search_url(&self.site_base_url, record)?;
        let Some(html) = client.fetch(&url).await else {
            return Ok(Located::SearchFailed);
        };
        let link = first_listing_link(&html, &self.site_base_url);
        tracing::debug!(name = %record.name, search_url = %url, ?link, "searched directory");
        Ok(link.into())
    }
}

/// First anchor whose target is a business-profile path, made absolute.
///
/// No relevance ranking: the first match in document order wins.
#[must_use]
pub fn first_listing_link(html: &str, site_base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| PROFILE_PATH_RE.is_match(href))
        .map(|href| absolutize_listing_url(href, site_base_url))
}

//! Review-page extraction.
//!
//! Each field is produced by an ordered chain of independent strategies over
//! the parsed document; the first strategy that yields a value wins. Nothing
//! here returns an error: a page with no usable markup yields an empty
//! [`BusinessExtract`].

mod jsonld;
mod rating;
mod reviews;
mod text;

use std::collections::HashSet;

use revscan_core::RawReview;
use scraper::Html;

/// Reviews kept per business, in document order.
pub const MAX_REVIEWS: usize = 20;
/// Review text is truncated to this many characters.
pub const MAX_REVIEW_CHARS: usize = 1000;

/// Normalized page data for one business.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BusinessExtract {
    /// Aggregate star rating, always within `[0, 5]` when present.
    pub rating: Option<f64>,
    pub review_count: u64,
    pub reviews: Vec<RawReview>,
}

impl BusinessExtract {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.review_count == 0 && self.reviews.is_empty()
    }
}

/// Extracts rating, review count and reviews from a review page.
#[must_use]
pub fn extract(html: &str) -> BusinessExtract {
    let document = Html::parse_document(html);
    let items = jsonld::jsonld_items(&document);
    let page_text = text::visible_text(document.root_element());

    let extract = BusinessExtract {
        rating: rating::extract_rating(&document, &items, &page_text),
        review_count: text::review_count(&page_text)
            .or_else(|| jsonld::aggregate_review_count(&items))
            .unwrap_or(0),
        reviews: reviews::extract_reviews(&document, &items),
    };
    tracing::debug!(
        rating = ?extract.rating,
        review_count = extract.review_count,
        reviews = extract.reviews.len(),
        "extracted review page"
    );
    extract
}

/// Accumulates reviews with exact-text dedup, truncation and the
/// [`MAX_REVIEWS`] cap.
#[derive(Debug, Default)]
pub(crate) struct ReviewCollector {
    seen: HashSet<String>,
    reviews: Vec<RawReview>,
}

impl ReviewCollector {
    /// Adds a review unless its text is blank, a duplicate, or the cap is reached.
    pub(crate) fn push(&mut self, text: &str, rating: Option<u8>) {
        let text = text.trim();
        if text.is_empty() || self.is_full() || self.seen.contains(text) {
            return;
        }
        self.seen.insert(text.to_owned());
        let truncated: String = text.chars().take(MAX_REVIEW_CHARS).collect();
        self.reviews.push(RawReview::new(truncated, rating));
    }

    pub(crate) fn is_full(&self) -> bool {
        self.reviews.len() >= MAX_REVIEWS
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub(crate) fn into_reviews(self) -> Vec<RawReview> {
        self.reviews
    }
}

/// A per-review star rating, accepted only when it lies in `1..=5`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn star_rating(value: f64) -> Option<u8> {
    (1.0..=5.0)
        .contains(&value)
        .then(|| value.round() as u8)
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;

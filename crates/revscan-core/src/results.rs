//! Review data and per-business results, serialized in the output contract.

use serde::{Deserialize, Serialize};

use crate::records::{default_state, normalize_name, BusinessRecord};

/// Synopsis used whenever there is nothing to summarize.
pub const NO_REVIEWS_SYNOPSIS: &str = "No reviews available for analysis.";

/// One review as extracted from a page or API, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    pub text: String,
    /// Star rating 1–5 when the source exposed one.
    pub rating: Option<u8>,
}

impl RawReview {
    #[must_use]
    pub fn new(text: impl Into<String>, rating: Option<u8>) -> Self {
        Self {
            text: text.into(),
            rating,
        }
    }
}

/// A review after scoring. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedReview {
    pub text: String,
    pub rating: Option<u8>,
    /// Positive keyword hits minus negative keyword hits.
    pub sentiment_score: i32,
    /// Implied by which partition the review sits in, so not written out.
    #[serde(skip)]
    pub is_positive: bool,
}

/// Positive/negative partition of one business's reviews plus a synopsis.
///
/// `total_analyzed` always equals `positive.len() + negative.len()`. Build
/// through [`ReviewAnalysis::new`]; deserialization derives it the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReviewAnalysisWire")]
pub struct ReviewAnalysis {
    pub positive: Vec<ClassifiedReview>,
    pub negative: Vec<ClassifiedReview>,
    pub total_analyzed: usize,
    pub synopsis: String,
}

impl ReviewAnalysis {
    #[must_use]
    pub fn new(
        positive: Vec<ClassifiedReview>,
        negative: Vec<ClassifiedReview>,
        synopsis: String,
    ) -> Self {
        let total_analyzed = positive.len() + negative.len();
        Self {
            positive,
            negative,
            total_analyzed,
            synopsis,
        }
    }

    /// Analysis of zero reviews.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), NO_REVIEWS_SYNOPSIS.to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_analyzed == 0
    }
}

impl Default for ReviewAnalysis {
    fn default() -> Self {
        Self::empty()
    }
}

/// Results files written by older runs may lack a synopsis or carry a stale
/// `total_analyzed`; both are re-derived here.
#[derive(Deserialize)]
struct ReviewAnalysisWire {
    #[serde(default)]
    positive: Vec<ClassifiedReview>,
    #[serde(default)]
    negative: Vec<ClassifiedReview>,
    #[serde(default)]
    synopsis: Option<String>,
}

impl From<ReviewAnalysisWire> for ReviewAnalysis {
    fn from(wire: ReviewAnalysisWire) -> Self {
        let positive = wire
            .positive
            .into_iter()
            .map(|r| ClassifiedReview {
                is_positive: true,
                ..r
            })
            .collect();
        let negative = wire
            .negative
            .into_iter()
            .map(|r| ClassifiedReview {
                is_positive: false,
                ..r
            })
            .collect();
        Self::new(
            positive,
            negative,
            wire.synopsis
                .unwrap_or_else(|| NO_REVIEWS_SYNOPSIS.to_string()),
        )
    }
}

/// Output unit and unit of progress tracking, keyed by case-insensitive name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessResult {
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(rename = "yelp_found", default)]
    pub found: bool,
    #[serde(rename = "yelp_url", default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub star_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u64,
    /// Copy of the analysis synopsis, `None` when no reviews were analysed.
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub review_analysis: ReviewAnalysis,
}

impl BusinessResult {
    /// A `found = false` result carrying the record's identity and contact data.
    #[must_use]
    pub fn not_found(record: &BusinessRecord) -> Self {
        Self {
            name: record.name.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
            phone: record.phone.clone(),
            website: record.website.clone(),
            found: false,
            source_url: None,
            star_rating: None,
            review_count: 0,
            synopsis: None,
            review_analysis: ReviewAnalysis::empty(),
        }
    }

    /// Attach a review analysis, mirroring its synopsis at the top level
    /// when at least one review was analysed.
    #[must_use]
    pub fn with_analysis(mut self, analysis: ReviewAnalysis) -> Self {
        self.synopsis = if analysis.is_empty() {
            None
        } else {
            Some(analysis.synopsis.clone())
        };
        self.review_analysis = analysis;
        self
    }

    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

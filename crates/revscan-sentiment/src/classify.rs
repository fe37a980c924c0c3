//! Per-review classification and batch partitioning.

use revscan_core::{ClassifiedReview, RawReview, ReviewAnalysis};

use crate::lexicon::keyword_score;
use crate::synopsis::synopsis;

/// Ratings at or above this count as positive.
const POSITIVE_RATING: u8 = 4;

/// Score and classify one review.
///
/// A star rating is authoritative: `rating >= 4` is positive whatever the
/// text says. Without a rating the keyword counts decide. Equal counts are
/// positive only when both are non-zero; a review with no indicator words at
/// all is negative.
#[must_use]
pub fn classify_review(review: &RawReview) -> ClassifiedReview {
    let score = keyword_score(&review.text);
    let is_positive = match review.rating {
        Some(rating) => rating >= POSITIVE_RATING,
        None => {
            score.positive > score.negative
                || (score.positive == score.negative && score.positive > 0)
        }
    };
    ClassifiedReview {
        text: review.text.clone(),
        rating: review.rating,
        sentiment_score: score.differential(),
        is_positive,
    }
}

/// Classify a batch, partitioning it while keeping input order within each side.
#[must_use]
pub fn classify(reviews: &[RawReview]) -> ReviewAnalysis {
    if reviews.is_empty() {
        return ReviewAnalysis::empty();
    }
    let (positive, negative): (Vec<_>, Vec<_>) = reviews
        .iter()
        .map(classify_review)
        .partition(|r| r.is_positive);
    let summary = synopsis(&positive, &negative);
    tracing::debug!(
        positive = positive.len(),
        negative = negative.len(),
        "classified reviews"
    );
    ReviewAnalysis::new(positive, negative, summary)
}

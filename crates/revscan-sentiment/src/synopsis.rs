//! One-paragraph summary of a classified batch.

use revscan_core::results::NO_REVIEWS_SYNOPSIS;
use revscan_core::ClassifiedReview;

const MAX_THEMES: usize = 3;

/// Theme name and the substrings that indicate it, in reporting order.
const THEMES: &[(&str, &[&str])] = &[
    ("professionalism", &["professional", "expert", "skilled"]),
    ("punctuality", &["timely", "on time", "schedule"]),
    ("cleanliness", &["clean", "cleanup", "mess"]),
    ("pricing", &["price", "cost", "affordable", "expensive"]),
    ("communication", &["communication", "responsive", "contact"]),
    ("work quality", &["quality", "workmanship", "craftsmanship"]),
];

fn distribution_sentence(positive_pct: f64) -> String {
    if positive_pct >= 80.0 {
        format!("Highly rated with {positive_pct:.0}% positive reviews.")
    } else if positive_pct >= 60.0 {
        format!("Generally positive with {positive_pct:.0}% positive reviews.")
    } else if positive_pct >= 40.0 {
        format!("Mixed reviews with {positive_pct:.0}% positive feedback.")
    } else {
        format!("More negative feedback with only {positive_pct:.0}% positive reviews.")
    }
}

fn detect_themes<'a>(reviews: impl Iterator<Item = &'a ClassifiedReview>) -> Vec<&'static str> {
    let all_text = reviews
        .map(|r| r.text.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    THEMES
        .iter()
        .filter(|(_, words)| words.iter().any(|w| all_text.contains(w)))
        .map(|(theme, _)| *theme)
        .take(MAX_THEMES)
        .collect()
}

fn overall_sentence(mean_score: f64) -> &'static str {
    if mean_score > 2.0 {
        "Overall sentiment is very positive."
    } else if mean_score > 0.0 {
        "Overall sentiment is positive."
    } else if mean_score > -2.0 {
        "Overall sentiment is mixed."
    } else {
        "Overall sentiment is negative."
    }
}

fn recommendation_sentence(positive: usize, negative: usize) -> Option<&'static str> {
    if positive > negative * 2 {
        Some("Customers frequently recommend this business.")
    } else if negative > positive {
        Some("Some customers have expressed concerns.")
    } else {
        None
    }
}

/// Summarize a classified batch.
///
/// Sentences, in fixed order: positive share, common themes (when any),
/// overall keyword sentiment, recommendation frequency (when notable).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn synopsis(positive: &[ClassifiedReview], negative: &[ClassifiedReview]) -> String {
    let total = positive.len() + negative.len();
    if total == 0 {
        return NO_REVIEWS_SYNOPSIS.to_string();
    }

    let positive_pct = positive.len() as f64 / total as f64 * 100.0;
    let score_sum: i64 = positive
        .iter()
        .chain(negative)
        .map(|r| i64::from(r.sentiment_score))
        .sum();
    let mean_score = score_sum as f64 / total as f64;

    let mut parts = vec![distribution_sentence(positive_pct)];
    let themes = detect_themes(positive.iter().chain(negative));
    if !themes.is_empty() {
        parts.push(format!("Common themes include: {}.", themes.join(", ")));
    }
    parts.push(overall_sentence(mean_score).to_string());
    if let Some(sentence) = recommendation_sentence(positive.len(), negative.len()) {
        parts.push(sentence.to_string());
    }
    parts.join(" ")
}

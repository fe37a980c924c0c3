//! Aggregate star rating: ARIA label, then JSON-LD, then free text.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::jsonld;

static ARIA_LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[aria-label]").expect("valid selector"));
static ARIA_RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*star").expect("valid regex"));
static TEXT_RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:out of|/)\s*5\b").expect("valid regex")
});

pub(super) fn in_star_range(value: f64) -> Option<f64> {
    (0.0..=5.0).contains(&value).then_some(value)
}

pub(super) fn extract_rating(document: &Html, items: &[Value], page_text: &str) -> Option<f64> {
    from_aria_labels(document)
        .or_else(|| jsonld::aggregate_rating(items))
        .or_else(|| from_text(page_text))
}

fn first_in_range(re: &Regex, haystack: &str) -> Option<f64> {
    re.captures_iter(haystack)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
        .find_map(in_star_range)
}

fn from_aria_labels(document: &Html) -> Option<f64> {
    document
        .select(&ARIA_LABEL_SELECTOR)
        .filter_map(|el| el.value().attr("aria-label"))
        .find_map(|label| first_in_range(&ARIA_RATING_RE, label))
}

fn from_text(page_text: &str) -> Option<f64> {
    first_in_range(&TEXT_RATING_RE, page_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating_of(html: &str) -> Option<f64> {
        let document = Html::parse_document(html);
        let items = jsonld::jsonld_items(&document);
        let text = super::super::text::visible_text(document.root_element());
        extract_rating(&document, &items, &text)
    }

    #[test]
    fn aria_label_wins_over_later_strategies() {
        let html = r#"<div aria-label="4.5 star rating"></div>
            <script type="application/ld+json">{"aggregateRating":{"ratingValue":"3.0"}}</script>
            <p>2 out of 5</p>"#;
        assert_eq!(rating_of(html), Some(4.5));
    }

    #[test]
    fn out_of_range_aria_value_falls_through_to_jsonld() {
        let html = r#"<span aria-label="50 stars given"></span>
            <script type="application/ld+json">{"aggregateRating":{"ratingValue":"4.0"}}</script>"#;
        assert_eq!(rating_of(html), Some(4.0));
    }

    #[test]
    fn text_patterns_are_last_resort() {
        assert_eq!(rating_of("<p>Rated 3.5 out of 5 by locals</p>"), Some(3.5));
        assert_eq!(rating_of("<p>Score: 4/5</p>"), Some(4.0));
    }

    #[test]
    fn text_pattern_ignores_script_content() {
        assert_eq!(rating_of("<script>var x = '4.8 out of 5';</script>"), None);
    }

    #[test]
    fn no_strategy_matches() {
        assert_eq!(rating_of("<p>Call us today</p>"), None);
        assert_eq!(rating_of("<p>Scored 4/50 in tests</p>"), None);
    }
}

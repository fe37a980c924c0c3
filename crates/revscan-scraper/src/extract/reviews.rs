//! Individual reviews: container scan with a JSON-LD fallback.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use revscan_core::RawReview;

use super::text::visible_text;
use super::{jsonld, star_rating, ReviewCollector};

const MIN_REVIEW_CHARS: usize = 30;
const MAX_CANDIDATE_CHARS: usize = 2000;
/// A candidate whose opening characters mention "review" or "rating" is a
/// UI label rather than prose.
const LABEL_PREFIX_CHARS: usize = 15;

static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div, li, article, section").expect("valid selector"));
static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p[class]").expect("valid selector"));
static SPAN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span[class]").expect("valid selector"));
static RATED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[aria-label], [itemprop="ratingValue"]"#).expect("valid selector")
});

static CONTAINER_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)review|comment").expect("valid regex"));
static TEXT_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)comment|text|review").expect("valid regex"));
static STAR_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)(?:\.\d+)?\s*star").expect("valid regex"));

pub(super) fn extract_reviews(document: &Html, items: &[Value]) -> Vec<RawReview> {
    let mut collector = ReviewCollector::default();

    for container in document
        .select(&CONTAINER_SELECTOR)
        .filter(|el| is_review_container(el) && !wraps_review_container(*el))
    {
        if collector.is_full() {
            break;
        }
        let text = visible_text(text_element(container));
        if is_review_prose(&text) {
            collector.push(&text, rating_near(container));
        }
    }

    if collector.is_empty() {
        for (body, rating) in jsonld::reviews(items) {
            collector.push(&body, rating);
        }
    }

    collector.into_reviews()
}

fn is_review_container(el: &ElementRef<'_>) -> bool {
    let element = el.value();
    element
        .attr("class")
        .is_some_and(|class| CONTAINER_CLASS_RE.is_match(class))
        || element.attr("data-review-id").is_some()
        || element
            .attr("itemprop")
            .is_some_and(|prop| prop.trim().eq_ignore_ascii_case("review"))
}

/// A list wrapper such as `<section class="reviews">` holding the real
/// review containers. Only innermost containers are read.
fn wraps_review_container(el: ElementRef<'_>) -> bool {
    el.select(&CONTAINER_SELECTOR)
        .any(|inner| inner.id() != el.id() && is_review_container(&inner))
}

/// The review body inside a container: a `<p>`, then a `<span>`, whose
/// class looks like comment text, else the container itself.
fn text_element(container: ElementRef<'_>) -> ElementRef<'_> {
    [&*PARAGRAPH_SELECTOR, &*SPAN_SELECTOR]
        .into_iter()
        .find_map(|selector| {
            container.select(selector).find(|el| {
                el.value()
                    .attr("class")
                    .is_some_and(|class| TEXT_CLASS_RE.is_match(class))
            })
        })
        .unwrap_or(container)
}

fn is_review_prose(text: &str) -> bool {
    let len = text.chars().count();
    if !(MIN_REVIEW_CHARS..=MAX_CANDIDATE_CHARS).contains(&len) {
        return false;
    }
    let prefix: String = text
        .chars()
        .take(LABEL_PREFIX_CHARS)
        .collect::<String>()
        .to_lowercase();
    !prefix.contains("review") && !prefix.contains("rating")
}

/// A star rating on the container or anything inside it, else on its parent.
fn rating_near(container: ElementRef<'_>) -> Option<u8> {
    rating_within(container).or_else(|| {
        container
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(rating_within)
    })
}

fn rating_within(scope: ElementRef<'_>) -> Option<u8> {
    std::iter::once(scope)
        .chain(scope.select(&RATED_SELECTOR))
        .find_map(element_rating)
}

fn element_rating(el: ElementRef<'_>) -> Option<u8> {
    let element = el.value();
    if let Some(label) = element.attr("aria-label") {
        let from_label = STAR_LABEL_RE
            .captures(label)
            .and_then(|cap| cap.get(1)?.as_str().parse::<u8>().ok())
            .filter(|r| (1..=5).contains(r));
        if from_label.is_some() {
            return from_label;
        }
    }
    if element
        .attr("itemprop")
        .is_some_and(|prop| prop.eq_ignore_ascii_case("ratingValue"))
    {
        let raw = element
            .attr("content")
            .map_or_else(|| el.text().collect::<String>(), str::to_owned);
        return raw.trim().parse::<f64>().ok().and_then(star_rating);
    }
    None
}

//! schema.org JSON-LD blocks embedded in the page.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use super::rating::in_star_range;
use super::star_rating;

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script[type]").expect("valid selector"));

/// Every JSON object found in `<script type="application/ld+json">` blocks.
///
/// Top-level arrays and `{"@graph": [...]}` containers are flattened so
/// callers see one list of candidate items. Blocks that fail to parse are
/// skipped.
pub(super) fn jsonld_items(document: &Html) -> Vec<Value> {
    let mut items = Vec::new();
    for script in document.select(&SCRIPT_SELECTOR) {
        let is_jsonld = script
            .value()
            .attr("type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"));
        if !is_jsonld {
            continue;
        }
        let body: String = script.text().collect();
        match serde_json::from_str::<Value>(body.trim()) {
            Ok(value) => flatten_into(value, &mut items),
            Err(e) => tracing::debug!(error = %e, "skipping unparsable JSON-LD block"),
        }
    }
    items
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(values) => {
            for value in values {
                flatten_into(value, out);
            }
        }
        Value::Object(mut map) => {
            let graph = map.remove("@graph");
            out.push(Value::Object(map));
            if let Some(graph) = graph {
                flatten_into(graph, out);
            }
        }
        _ => {}
    }
}

/// Numbers in the wild arrive as JSON numbers or as strings.
pub(super) fn value_as_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
}

/// `aggregateRating` may be a single object or a list of them.
fn aggregate_ratings(items: &[Value]) -> impl Iterator<Item = &Value> {
    items
        .iter()
        .filter_map(|item| item.get("aggregateRating"))
        .flat_map(|node| match node {
            Value::Array(values) => values.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
}

/// First `aggregateRating.ratingValue` within `[0, 5]`.
pub(super) fn aggregate_rating(items: &[Value]) -> Option<f64> {
    aggregate_ratings(items)
        .filter_map(|rating| rating.get("ratingValue").and_then(value_as_f64))
        .find_map(in_star_range)
}

/// First `aggregateRating.reviewCount` (or `ratingCount`).
pub(super) fn aggregate_review_count(items: &[Value]) -> Option<u64> {
    aggregate_ratings(items).find_map(|rating| {
        ["reviewCount", "ratingCount"].iter().find_map(|key| {
            let value = rating.get(*key)?;
            value
                .as_u64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        })
    })
}

/// `(reviewBody, rating)` pairs from Review items and from `review` fields
/// on business items, in document order.
pub(super) fn reviews(items: &[Value]) -> Vec<(String, Option<u8>)> {
    let mut found = Vec::new();
    for item in items {
        push_review(item, &mut found);
        match item.get("review") {
            Some(Value::Array(values)) => {
                for value in values {
                    push_review(value, &mut found);
                }
            }
            Some(value) => push_review(value, &mut found),
            None => {}
        }
    }
    found
}

fn push_review(item: &Value, out: &mut Vec<(String, Option<u8>)>) {
    let Some(body) = item.get("reviewBody").and_then(Value::as_str) else {
        return;
    };
    let rating = item
        .get("reviewRating")
        .and_then(|r| r.get("ratingValue"))
        .and_then(value_as_f64)
        .and_then(star_rating);
    out.push((body.to_owned(), rating));
}

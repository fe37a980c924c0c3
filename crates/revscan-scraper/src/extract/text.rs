use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

static REVIEW_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d[\d,]*)\s+reviews?\b").expect("valid regex"));

const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Text content under `root` with whitespace collapsed, skipping
/// non-rendered elements such as `<script>`.
pub(super) fn visible_text(root: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| HIDDEN_TAGS.contains(&el.value().name()));
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

/// First integer preceding "review" or "reviews".
pub(super) fn review_count(page_text: &str) -> Option<u64> {
    REVIEW_COUNT_RE
        .captures_iter(page_text)
        .find_map(|cap| cap.get(1)?.as_str().replace(',', "").parse::<u64>().ok())
}

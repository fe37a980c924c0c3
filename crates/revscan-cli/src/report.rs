//! Markdown report over a results file, for `revscan report`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Local};
use revscan_core::{BusinessResult, ClassifiedReview};

/// Reviews shown per polarity in each business section.
const REVIEWS_PER_SECTION: usize = 5;
const REVIEW_PREVIEW_CHARS: usize = 300;
const NOT_FOUND_LISTED: usize = 50;

/// Read `results_path` and write the rendered report to `output_path`.
///
/// # Errors
///
/// Returns an error if the results file is missing or is not a JSON array of
/// results, or if the report cannot be written.
pub(crate) fn write_report(results_path: &Path, output_path: &Path) -> anyhow::Result<()> {
    if !results_path.exists() {
        anyhow::bail!("results file not found: {}", results_path.display());
    }
    let content = std::fs::read_to_string(results_path)
        .with_context(|| format!("failed to read {}", results_path.display()))?;
    let results: Vec<BusinessResult> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", results_path.display()))?;

    let report = render_report(&results, Local::now());
    std::fs::write(output_path, report)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let found = results.iter().filter(|r| r.found).count();
    tracing::info!(
        path = %output_path.display(),
        found,
        not_found = results.len() - found,
        "report written"
    );
    Ok(())
}

pub(crate) fn render_report(results: &[BusinessResult], generated: DateTime<Local>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Yelp Review Analysis Report");
    let _ = writeln!(
        out,
        "\n*Generated: {}*\n",
        generated.format("%Y-%m-%d %H:%M:%S")
    );

    summary_section(&mut out, results);
    distribution_section(&mut out, results);

    let _ = writeln!(out, "## Detailed Results\n");
    let mut found: Vec<&BusinessResult> = results.iter().filter(|r| r.found).collect();
    found.sort_by(|a, b| {
        let rating_a = a.star_rating.unwrap_or(0.0);
        let rating_b = b.star_rating.unwrap_or(0.0);
        rating_b
            .total_cmp(&rating_a)
            .then(b.review_count.cmp(&a.review_count))
    });
    for (i, result) in found.iter().enumerate() {
        business_section(&mut out, i + 1, result);
    }

    not_found_section(&mut out, results);
    out
}

#[allow(clippy::cast_precision_loss)]
fn summary_section(out: &mut String, results: &[BusinessResult]) {
    let total = results.len();
    let found = results.iter().filter(|r| r.found).count();
    let ratings: Vec<f64> = results.iter().filter_map(|r| r.star_rating).collect();
    let with_reviews = results
        .iter()
        .filter(|r| r.review_analysis.total_analyzed > 0)
        .count();
    let found_pct = if total == 0 {
        0.0
    } else {
        found as f64 / total as f64 * 100.0
    };

    let _ = writeln!(out, "## Summary Statistics\n");
    let _ = writeln!(out, "- **Total Businesses Analyzed:** {total}");
    let _ = writeln!(out, "- **Found on Yelp:** {found} ({found_pct:.1}%)");
    let _ = writeln!(out, "- **With Star Ratings:** {}", ratings.len());
    let _ = writeln!(out, "- **With Review Analysis:** {with_reviews}");
    if !ratings.is_empty() {
        let average = ratings.iter().sum::<f64>() / ratings.len() as f64;
        let _ = writeln!(out, "- **Average Rating:** {average:.2} stars");
    }
    out.push('\n');
}

#[allow(clippy::cast_possible_truncation)]
fn distribution_section(out: &mut String, results: &[BusinessResult]) {
    let mut distribution: BTreeMap<i64, usize> = BTreeMap::new();
    for rating in results.iter().filter_map(|r| r.star_rating) {
        *distribution.entry(rating.round() as i64).or_default() += 1;
    }
    let Some(&largest) = distribution.values().max() else {
        return;
    };
    let per_block = (largest / 20).max(1);

    let _ = writeln!(out, "## Rating Distribution\n");
    for (stars, count) in distribution.iter().rev() {
        let bar = "█".repeat(count / per_block);
        let _ = writeln!(out, "- **{stars} stars:** {count} businesses {bar}");
    }
    out.push('\n');
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn business_section(out: &mut String, position: usize, result: &BusinessResult) {
    let _ = writeln!(out, "### {position}. {}", result.name);
    if let Some(city) = &result.city {
        let _ = writeln!(out, "**Location:** {city}, {}", result.state);
    }
    if let Some(phone) = &result.phone {
        let _ = writeln!(out, "**Phone:** {phone}");
    }
    if let Some(url) = &result.source_url {
        let _ = writeln!(out, "**Yelp:** [View Profile]({url})");
    }

    let rating = result.star_rating.filter(|r| *r > 0.0);
    if let Some(rating) = rating {
        let half = if rating.fract() >= 0.5 { "½" } else { "" };
        let stars = "⭐".repeat(rating.trunc() as usize);
        let _ = writeln!(out, "\n**Overall Rating:** {rating:.1} stars {stars}{half}");
        let _ = writeln!(out, "**Total Reviews:** {}", result.review_count);
    }

    let synopsis = result
        .synopsis
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| Some(result.review_analysis.synopsis.as_str()).filter(|s| !s.is_empty()));
    if let Some(synopsis) = synopsis {
        let _ = writeln!(out, "\n#### Synopsis");
        let _ = writeln!(out, "{synopsis}\n");
    }

    let analysis = &result.review_analysis;
    review_list(out, "Positive Reviews", &analysis.positive);
    review_list(out, "Negative Reviews", &analysis.negative);
    if analysis.positive.is_empty() && analysis.negative.is_empty() && rating.is_some() {
        let _ = writeln!(out, "\n*No detailed reviews extracted, but rating available.*\n");
    }

    let _ = writeln!(out, "\n---\n");
}

fn review_list(out: &mut String, heading: &str, reviews: &[ClassifiedReview]) {
    if reviews.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n#### {heading} ({})\n", reviews.len());
    for (i, review) in reviews.iter().take(REVIEWS_PER_SECTION).enumerate() {
        let rating = review
            .rating
            .map(|r| format!(" ({r}⭐)"))
            .unwrap_or_default();
        let _ = writeln!(out, "{}. {}{rating}\n", i + 1, preview(&review.text));
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > REVIEW_PREVIEW_CHARS {
        let head: String = text.chars().take(REVIEW_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn not_found_section(out: &mut String, results: &[BusinessResult]) {
    let not_found: Vec<&BusinessResult> = results.iter().filter(|r| !r.found).collect();
    if not_found.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Businesses Not Found on Yelp\n");
    let _ = writeln!(
        out,
        "*{} businesses could not be located on Yelp:*\n",
        not_found.len()
    );
    for result in not_found.iter().take(NOT_FOUND_LISTED) {
        match &result.city {
            Some(city) => {
                let _ = writeln!(out, "- {} ({city})", result.name);
            }
            None => {
                let _ = writeln!(out, "- {}", result.name);
            }
        }
    }
    if not_found.len() > NOT_FOUND_LISTED {
        let _ = writeln!(out, "\n*... and {} more*", not_found.len() - NOT_FOUND_LISTED);
    }
}

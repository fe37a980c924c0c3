//! Pipeline orchestration for `revscan run`.
//!
//! Records are processed strictly one at a time. After each record the
//! merged result set and the progress file are written in full, so a killed
//! run loses at most the record in flight. Per-record failures are logged
//! and the loop moves on; only fatal preconditions and store write errors
//! end the run early.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use revscan_core::{
    load_url_map, AppConfig, BusinessRecord, BusinessResult, ConfigError, LocatorMode,
    SourceMode,
};
use revscan_scraper::{
    FusionClient, ListingOutcome, Locator, PromptLocator, ReviewClient, ReviewSource,
    ScraperError, SearchLocator,
};
use revscan_store::{ProgressStore, ResultsStore};

#[derive(Debug, Clone)]
pub(crate) struct RunOptions {
    /// Cap on records considered, counted from `start_from`.
    pub limit: Option<usize>,
    pub start_from: usize,
    pub reset: bool,
    pub inter_request_delay: Duration,
}

/// Counts reported at the end of a run, interrupted or not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub considered: usize,
    pub processed: usize,
    pub skipped: usize,
    pub no_listing: usize,
    pub fetch_failed: usize,
    pub failed: usize,
    pub found_total: usize,
    pub interrupted: bool,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.interrupted {
            writeln!(f, "Interrupted. Progress saved.")?;
        }
        writeln!(f, "Records considered:  {}", self.considered)?;
        writeln!(f, "Processed:           {}", self.processed)?;
        writeln!(f, "Skipped:             {}", self.skipped)?;
        writeln!(f, "No listing:          {}", self.no_listing)?;
        writeln!(f, "Fetch failures:      {}", self.fetch_failed)?;
        writeln!(f, "Failed:              {}", self.failed)?;
        write!(f, "Total found:         {}", self.found_total)
    }
}

/// How one record ended. `FetchFailed` results are kept in the result set
/// but the record is left unprocessed so the next run tries it again.
enum RecordOutcome {
    Found(BusinessResult),
    NoListing(BusinessResult),
    FetchFailed(BusinessResult),
}

/// Load inputs and state, then process every selected record.
///
/// `shutdown` resolving stops the loop at the next await point; state is
/// flushed and the summary returned as for a normal finish.
///
/// # Errors
///
/// Returns an error if the input file is missing or unreadable, the URL
/// mapping file is malformed, the HTTP client cannot be built, or the
/// results or progress file cannot be written.
pub(crate) async fn run<S>(
    config: &AppConfig,
    options: &RunOptions,
    shutdown: S,
) -> anyhow::Result<RunSummary>
where
    S: Future<Output = ()>,
{
    let records = revscan_core::load_business_records(&config.input_path)?;
    let mut source = build_source(config)?;
    let client = ReviewClient::new(
        config.request_timeout_secs,
        config.connect_timeout_secs,
        &config.user_agent,
        Duration::from_secs(config.rate_limit_cooldown_secs),
    )
    .context("failed to build HTTP client")?;

    if options.reset && ProgressStore::reset(&config.progress_path)? {
        tracing::info!(path = %config.progress_path.display(), "progress reset");
    }
    let mut progress = ProgressStore::load(&config.progress_path);
    let mut results = ResultsStore::load(&config.output_path);

    tracing::info!(
        records = records.len(),
        start_from = options.start_from,
        limit = ?options.limit,
        locator = %config.locator,
        source = %config.source,
        already_processed = progress.state().processed.len(),
        "starting review run"
    );

    let summary = process_records(
        &records,
        &mut source,
        &client,
        &mut progress,
        &mut results,
        options,
        shutdown,
    )
    .await?;

    tracing::info!(
        considered = summary.considered,
        processed = summary.processed,
        skipped = summary.skipped,
        no_listing = summary.no_listing,
        fetch_failed = summary.fetch_failed,
        failed = summary.failed,
        found_total = summary.found_total,
        interrupted = summary.interrupted,
        "review run finished"
    );
    Ok(summary)
}

/// Review source selected by configuration.
///
/// # Errors
///
/// Returns [`ConfigError`] when the URL mapping file is malformed or the
/// API source has no key.
fn build_source(config: &AppConfig) -> Result<ReviewSource, ConfigError> {
    match config.source {
        SourceMode::Api => {
            let key = config
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingEnvVar("YELP_API_KEY".to_string()))?;
            Ok(ReviewSource::Api(FusionClient::new(
                config.api_base_url.clone(),
                key,
            )))
        }
        SourceMode::Scrape => {
            let locator = match config.locator {
                LocatorMode::Lookup => {
                    Locator::Lookup(load_url_map(&config.urls_path, &config.site_base_url)?)
                }
                LocatorMode::Search => {
                    Locator::Search(SearchLocator::new(config.site_base_url.clone()))
                }
                LocatorMode::Prompt => {
                    Locator::Prompt(PromptLocator::stdio(config.site_base_url.clone()))
                }
            };
            Ok(ReviewSource::Scrape(locator))
        }
    }
}

/// The per-record loop over `records[start_from..][..limit]`.
async fn process_records<S>(
    records: &[BusinessRecord],
    source: &mut ReviewSource,
    client: &ReviewClient,
    progress: &mut ProgressStore,
    results: &mut ResultsStore,
    options: &RunOptions,
    shutdown: S,
) -> anyhow::Result<RunSummary>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = RunSummary::default();
    let total = records.len();
    let selected = records
        .iter()
        .enumerate()
        .skip(options.start_from)
        .take(options.limit.unwrap_or(usize::MAX));

    for (index, record) in selected {
        summary.considered += 1;

        if progress.is_processed(index) || results.is_found(&record.name) {
            tracing::info!(index, total, name = %record.name, "skipped, already processed");
            if !progress.is_processed(index) {
                progress.record_processed(index)?;
            }
            summary.skipped += 1;
            continue;
        }

        tracing::info!(index, total, name = %record.name, "processing");
        let outcome = tokio::select! {
            biased;
            () = &mut shutdown => {
                summary.interrupted = true;
                break;
            }
            outcome = process_record(source, client, record) => outcome,
        };

        match outcome {
            Ok(RecordOutcome::Found(result)) => {
                tracing::info!(
                    index,
                    name = %record.name,
                    rating = ?result.star_rating,
                    review_count = result.review_count,
                    positive = result.review_analysis.positive.len(),
                    negative = result.review_analysis.negative.len(),
                    "done"
                );
                commit(results, result)?;
                progress.record_processed(index)?;
                summary.processed += 1;
            }
            Ok(RecordOutcome::NoListing(result)) => {
                tracing::info!(index, name = %record.name, "no listing");
                commit(results, result)?;
                progress.record_processed(index)?;
                summary.processed += 1;
                summary.no_listing += 1;
            }
            Ok(RecordOutcome::FetchFailed(result)) => {
                tracing::warn!(
                    index,
                    name = %record.name,
                    url = ?result.source_url,
                    "fetch failed, will retry on next run"
                );
                commit(results, result)?;
                summary.fetch_failed += 1;
            }
            Err(e) => {
                tracing::error!(index, name = %record.name, error = %e, "failed");
                summary.failed += 1;
            }
        }

        tokio::select! {
            biased;
            () = &mut shutdown => {
                summary.interrupted = true;
                break;
            }
            () = tokio::time::sleep(options.inter_request_delay) => {}
        }
    }

    if summary.interrupted {
        results.save().context("failed to save results")?;
        progress.save().context("failed to save progress")?;
    }
    summary.found_total = results.found_count();
    Ok(summary)
}

/// Locate, fetch, extract and classify one record.
async fn process_record(
    source: &mut ReviewSource,
    client: &ReviewClient,
    record: &BusinessRecord,
) -> Result<RecordOutcome, ScraperError> {
    let outcome = match source.acquire(client, record).await? {
        ListingOutcome::NoListing => RecordOutcome::NoListing(BusinessResult::not_found(record)),
        ListingOutcome::FetchFailed { url } => {
            let mut result = BusinessResult::not_found(record);
            result.source_url = url;
            RecordOutcome::FetchFailed(result)
        }
        ListingOutcome::Found { url, extract } => {
            let analysis = revscan_sentiment::classify(&extract.reviews);
            let mut result = BusinessResult::not_found(record);
            result.found = true;
            result.source_url = Some(url);
            result.star_rating = extract.rating;
            result.review_count = extract.review_count;
            RecordOutcome::Found(result.with_analysis(analysis))
        }
    };
    Ok(outcome)
}

fn commit(results: &mut ResultsStore, result: BusinessResult) -> anyhow::Result<()> {
    results.merge(result);
    results.save().context("failed to save results")
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

use std::path::Path;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const REVIEW_PAGE: &str = r#"<html><head>
<script type="application/ld+json">
{"@type":"LocalBusiness","aggregateRating":{"ratingValue":"4.5","reviewCount":"23"},
 "review":[
   {"reviewBody":"Excellent, professional, and timely!","reviewRating":{"ratingValue":5}},
   {"reviewBody":"Terrible, rude, and overpriced.","reviewRating":{"ratingValue":1}}
 ]}
</script></head><body><h1>Ace Roofing</h1></body></html>"#;

fn test_config(dir: &TempDir, site_base_url: &str) -> AppConfig {
    AppConfig {
        log_level: "info".to_string(),
        input_path: dir.path().join("roofers.json"),
        output_path: dir.path().join("results.json"),
        progress_path: dir.path().join("progress.json"),
        urls_path: dir.path().join("urls.csv"),
        report_path: dir.path().join("report.md"),
        locator: LocatorMode::Lookup,
        source: SourceMode::Scrape,
        site_base_url: site_base_url.to_string(),
        api_base_url: site_base_url.to_string(),
        api_key: None,
        request_timeout_secs: 5,
        connect_timeout_secs: 5,
        user_agent: "revscan-test".to_string(),
        inter_request_delay_ms: 0,
        rate_limit_cooldown_secs: 0,
    }
}

fn options() -> RunOptions {
    RunOptions {
        limit: None,
        start_from: 0,
        reset: false,
        inter_request_delay: Duration::ZERO,
    }
}

fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn write_input(config: &AppConfig, names: &[&str]) {
    let rows: Vec<Value> = names
        .iter()
        .map(|name| json!({"Name": name, "City": "Tampa", "State": "FL"}))
        .collect();
    write_json(&config.input_path, &Value::Array(rows));
}

fn write_urls(config: &AppConfig, rows: &[(&str, String)]) {
    let mut csv = String::from("name,yelp_url\n");
    for (name, url) in rows {
        csv.push_str(&format!("{name},{url}\n"));
    }
    std::fs::write(&config.urls_path, csv).unwrap();
}

async fn run_to_end(config: &AppConfig, options: &RunOptions) -> RunSummary {
    run(config, options, std::future::pending()).await.unwrap()
}

#[tokio::test]
async fn unmapped_record_is_written_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    write_input(&config, &["Ace Roofing"]);

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.no_listing, 1);
    assert_eq!(summary.found_total, 0);

    let results = read_json(&config.output_path);
    let result = &results[0];
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(result["name"], "Ace Roofing");
    assert_eq!(result["yelp_found"], false);
    assert_eq!(result["review_count"], 0);
    assert_eq!(result["synopsis"], Value::Null);
    assert_eq!(result["review_analysis"]["positive"], json!([]));
    assert_eq!(result["review_analysis"]["negative"], json!([]));
    assert_eq!(result["review_analysis"]["total_analyzed"], 0);

    let progress = read_json(&config.progress_path);
    assert_eq!(progress["processed"], json!([0]));
    assert_eq!(progress["last_index"], 0);
}

#[tokio::test]
async fn mapped_record_is_fetched_extracted_and_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/biz/ace-roofing-tampa"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    write_input(&config, &["Ace Roofing"]);
    write_urls(&config, &[("ace roofing ", "/biz/ace-roofing-tampa".to_string())]);

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.found_total, 1);

    let result = &read_json(&config.output_path)[0];
    assert_eq!(result["yelp_found"], true);
    assert_eq!(
        result["yelp_url"],
        format!("{}/biz/ace-roofing-tampa", server.uri())
    );
    assert_eq!(result["star_rating"], 4.5);
    assert_eq!(result["review_count"], 23);
    assert_eq!(result["review_analysis"]["total_analyzed"], 2);
    assert_eq!(result["review_analysis"]["positive"][0]["rating"], 5);
    assert_eq!(result["review_analysis"]["negative"][0]["rating"], 1);
    assert_eq!(result["synopsis"], result["review_analysis"]["synopsis"]);
}

#[tokio::test]
async fn found_results_are_not_fetched_again() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    write_input(&config, &["Ace Roofing"]);
    write_urls(&config, &[("Ace Roofing", "/biz/ace-roofing-tampa".to_string())]);
    let existing = json!([{
        "name": "ACE ROOFING",
        "state": "FL",
        "yelp_found": true,
        "yelp_url": "https://www.yelp.com/biz/ace-roofing-tampa",
        "star_rating": 3.0,
        "review_count": 7,
        "synopsis": "Kept from an earlier run.",
        "review_analysis": {"positive": [], "negative": [], "total_analyzed": 0, "synopsis": "Kept from an earlier run."}
    }]);
    write_json(&config.output_path, &existing);

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.processed, 0);

    let results = read_json(&config.output_path);
    assert_eq!(results[0]["star_rating"], 3.0);
    assert_eq!(results[0]["review_count"], 7);
    assert_eq!(results[0]["synopsis"], "Kept from an earlier run.");
    assert_eq!(read_json(&config.progress_path)["processed"], json!([0]));
}

#[tokio::test]
async fn resumed_run_processes_only_unrecorded_records() {
    let server = MockServer::start().await;
    for slug in ["first", "second"] {
        Mock::given(path(format!("/biz/{slug}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
            .expect(0)
            .mount(&server)
            .await;
    }
    Mock::given(path("/biz/third"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVIEW_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    write_input(&config, &["First", "Second", "Third"]);
    write_urls(
        &config,
        &[
            ("First", "/biz/first".to_string()),
            ("Second", "/biz/second".to_string()),
            ("Third", "/biz/third".to_string()),
        ],
    );
    write_json(
        &config.progress_path,
        &json!({"processed": [0, 1], "last_index": 1}),
    );

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.considered, 3);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.processed, 1);

    let progress = read_json(&config.progress_path);
    assert_eq!(progress["processed"], json!([0, 1, 2]));
    assert_eq!(progress["last_index"], 2);
}

#[tokio::test]
async fn failed_fetch_keeps_url_and_leaves_record_unprocessed() {
    let server = MockServer::start().await;
    Mock::given(path("/biz/ace-roofing-tampa"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, &server.uri());
    write_input(&config, &["Ace Roofing"]);
    write_urls(&config, &[("Ace Roofing", "/biz/ace-roofing-tampa".to_string())]);

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.fetch_failed, 1);
    assert_eq!(summary.processed, 0);

    let result = &read_json(&config.output_path)[0];
    assert_eq!(result["yelp_found"], false);
    assert_eq!(
        result["yelp_url"],
        format!("{}/biz/ace-roofing-tampa", server.uri())
    );
    assert!(!config.progress_path.exists());
}

#[tokio::test]
async fn failed_search_leaves_record_unprocessed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, &server.uri());
    config.locator = LocatorMode::Search;
    write_input(&config, &["Ace Roofing"]);

    let summary = run_to_end(&config, &options()).await;
    assert_eq!(summary.fetch_failed, 1);
    assert_eq!(summary.no_listing, 0);
    assert_eq!(summary.processed, 0);

    let result = &read_json(&config.output_path)[0];
    assert_eq!(result["yelp_found"], false);
    assert_eq!(result["yelp_url"], Value::Null);
    assert!(!config.progress_path.exists());
}

#[tokio::test]
async fn closed_prompt_input_fails_the_record() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    let records = vec![BusinessRecord::new("Ace Roofing", Some("Tampa"), Some("FL"))];
    let mut source = ReviewSource::Scrape(Locator::Prompt(PromptLocator::new(
        config.site_base_url.clone(),
        Box::new(std::io::Cursor::new(Vec::new())),
        Box::new(std::io::sink()),
    )));
    let client = ReviewClient::new(5, 5, "revscan-test", Duration::ZERO).unwrap();
    let mut progress = ProgressStore::load(&config.progress_path);
    let mut results = ResultsStore::load(&config.output_path);

    let summary = process_records(
        &records,
        &mut source,
        &client,
        &mut progress,
        &mut results,
        &options(),
        std::future::pending(),
    )
    .await
    .unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.no_listing, 0);
    assert!(!progress.is_processed(0));
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn start_from_and_limit_select_a_window() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    write_input(&config, &["A", "B", "C", "D"]);

    let summary = run_to_end(
        &config,
        &RunOptions {
            limit: Some(2),
            start_from: 1,
            ..options()
        },
    )
    .await;
    assert_eq!(summary.considered, 2);

    let names: Vec<Value> = read_json(&config.output_path)
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("B"), json!("C")]);
    assert_eq!(read_json(&config.progress_path)["processed"], json!([1, 2]));
}

#[tokio::test]
async fn reset_discards_previous_progress() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    write_input(&config, &["A"]);
    write_json(
        &config.progress_path,
        &json!({"processed": [0], "last_index": 0}),
    );

    let summary = run_to_end(
        &config,
        &RunOptions {
            reset: true,
            ..options()
        },
    )
    .await;
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.no_listing, 1);
}

#[tokio::test]
async fn interrupt_stops_before_the_next_record() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");
    write_input(&config, &["A", "B"]);

    let summary = run(&config, &options(), std::future::ready(()))
        .await
        .unwrap();
    assert!(summary.interrupted);
    assert_eq!(summary.considered, 1);
    assert_eq!(summary.processed, 0);
    assert_eq!(read_json(&config.output_path), json!([]));
}

#[tokio::test]
async fn missing_input_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir, "http://127.0.0.1:9");

    let err = run(&config, &options(), std::future::pending())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("input file not found"));
    assert!(!config.output_path.exists());
}

#[test]
fn api_source_requires_a_key() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir, "http://127.0.0.1:9");
    config.source = SourceMode::Api;
    assert!(matches!(
        build_source(&config),
        Err(ConfigError::MissingEnvVar(var)) if var == "YELP_API_KEY"
    ));

    config.api_key = Some("secret".to_string());
    assert!(matches!(build_source(&config), Ok(ReviewSource::Api(_))));
}

#[test]
fn summary_lists_every_count() {
    let summary = RunSummary {
        considered: 4,
        processed: 2,
        skipped: 1,
        no_listing: 1,
        fetch_failed: 1,
        failed: 0,
        found_total: 3,
        interrupted: true,
    };
    let text = summary.to_string();
    assert!(text.starts_with("Interrupted. Progress saved."));
    assert!(text.contains("Records considered:  4"));
    assert!(text.contains("Fetch failures:      1"));
    assert!(text.ends_with("Total found:         3"));
}

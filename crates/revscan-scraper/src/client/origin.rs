//! URL construction and host extraction helpers.

/// Extracts the hostname from a URL for use in logs and error messages.
///
/// Falls back to the full URL string if parsing fails.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Joins `path` onto `base_url` and appends URL-encoded query pairs.
///
/// `base_url` may carry a path prefix (`https://api.example.com/v3`); `path`
/// is appended after it rather than replacing it.
///
/// # Errors
///
/// Returns [`crate::ScraperError::InvalidUrl`] if the result is not a valid
/// absolute URL.
pub fn build_url(
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
) -> Result<String, crate::ScraperError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = reqwest::Url::parse(&joined).map_err(|e| crate::ScraperError::InvalidUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query {
            pairs.append_pair(key, value);
        }
    }
    Ok(url.to_string())
}

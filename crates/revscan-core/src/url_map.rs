//! Name → review-page URL table supplied alongside the input records.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::records::normalize_name;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
struct UrlRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    yelp_url: String,
}

/// Lookup table keyed by normalized business name.
#[derive(Debug, Clone, Default)]
pub struct UrlMap {
    urls: HashMap<String, String>,
}

impl UrlMap {
    /// Insert a mapping. Blank names or URLs are ignored.
    pub fn insert(&mut self, name: &str, url: &str, site_base_url: &str) {
        let key = normalize_name(name);
        let url = url.trim();
        if key.is_empty() || url.is_empty() {
            return;
        }
        self.urls
            .insert(key, absolutize_listing_url(url, site_base_url));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.urls.get(&normalize_name(name)).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Load the `name,yelp_url` CSV at `path`.
///
/// A missing file is not an error: it yields an empty table, so every
/// business is reported as not found.
///
/// # Errors
///
/// - [`ConfigError::UrlFileIo`] if the file exists but cannot be opened.
/// - [`ConfigError::UrlFileParse`] if a row cannot be decoded.
pub fn load_url_map(path: &Path, site_base_url: &str) -> Result<UrlMap, ConfigError> {
    let mut map = UrlMap::default();
    if !path.exists() {
        tracing::info!(path = %path.display(), "no URL mapping file; every lookup will miss");
        return Ok(map);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ConfigError::UrlFileIo {
            path: path.display().to_string(),
            source: e.into(),
        })?;

    for row in reader.deserialize::<UrlRow>() {
        let row = row.map_err(|e| ConfigError::UrlFileParse {
            path: path.display().to_string(),
            source: e,
        })?;
        map.insert(&row.name, &row.yelp_url, site_base_url);
    }

    tracing::info!(path = %path.display(), entries = map.len(), "loaded URL mapping");
    Ok(map)
}

/// Normalize a business-page link to an absolute URL.
///
/// - `http://` and `https://` URLs are kept as given.
/// - Host-relative paths (`/biz/...`) are joined to `site_base_url`.
/// - Anything else is assumed to be missing its scheme and gets `https://`.
#[must_use]
pub fn absolutize_listing_url(raw: &str, site_base_url: &str) -> String {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        raw.to_string()
    } else if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{rest}")
    } else if raw.starts_with('/') {
        format!("{}{raw}", site_base_url.trim_end_matches('/'))
    } else {
        format!("https://{raw}")
    }
}

//! Input business records as produced by the external import step.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::ConfigError;

/// State used when a record has none.
pub const DEFAULT_STATE: &str = "FL";

/// One directory entry to be enriched with review data.
///
/// Field names on the wire are the import step's contract (`Name`, `City`,
/// `State`, `Phone Number`, `website`) and are read exactly as given. Values
/// that arrive as numbers (phone numbers out of a spreadsheet) are accepted
/// as strings; blank strings are treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "City", default, deserialize_with = "lenient_optional_string")]
    pub city: Option<String>,
    #[serde(rename = "State", default = "default_state", deserialize_with = "lenient_state")]
    pub state: String,
    #[serde(
        rename = "Phone Number",
        default,
        deserialize_with = "lenient_optional_string"
    )]
    pub phone: Option<String>,
    #[serde(rename = "website", default, deserialize_with = "lenient_optional_string")]
    pub website: Option<String>,
}

impl BusinessRecord {
    /// Convenience constructor used by tests and callers that build records in code.
    #[must_use]
    pub fn new(name: &str, city: Option<&str>, state: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            city: city.map(str::to_string),
            state: state.map_or_else(default_state, str::to_string),
            phone: None,
            website: None,
        }
    }

    /// `"{city}, {state}"` or just the state when the city is unknown.
    #[must_use]
    pub fn location(&self) -> String {
        match &self.city {
            Some(city) => format!("{city}, {}", self.state),
            None => self.state.clone(),
        }
    }
}

/// Case-insensitive identity key for a business name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read the ordered list of business records from a JSON array file.
///
/// # Errors
///
/// - [`ConfigError::InputFileMissing`] if `path` does not exist.
/// - [`ConfigError::InputFileIo`] if it cannot be read.
/// - [`ConfigError::InputFileParse`] if it is not a JSON array of records.
pub fn load_business_records(path: &Path) -> Result<Vec<BusinessRecord>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::InputFileMissing {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::InputFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::InputFileParse {
        path: path.display().to_string(),
        source: e,
    })
}

pub(crate) fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

fn value_to_string(value: Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_to_string))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

fn lenient_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_else(default_state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_external_field_names() {
        let json = r#"[{
            "Name": "Ace Roofing",
            "City": "Tampa",
            "State": "FL",
            "Phone Number": "(813) 555-0100",
            "website": "https://aceroofing.example"
        }]"#;
        let records: Vec<BusinessRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name, "Ace Roofing");
        assert_eq!(r.city.as_deref(), Some("Tampa"));
        assert_eq!(r.state, "FL");
        assert_eq!(r.phone.as_deref(), Some("(813) 555-0100"));
        assert_eq!(r.website.as_deref(), Some("https://aceroofing.example"));
    }

    #[test]
    fn missing_state_defaults_to_florida() {
        let records: Vec<BusinessRecord> =
            serde_json::from_str(r#"[{"Name": "Ace Roofing"}]"#).unwrap();
        assert_eq!(records[0].state, "FL");
        assert!(records[0].city.is_none());
    }

    #[test]
    fn null_and_blank_values_are_absent() {
        let records: Vec<BusinessRecord> = serde_json::from_str(
            r#"[{"Name": "Ace", "City": "  ", "State": null, "Phone Number": null, "website": ""}]"#,
        )
        .unwrap();
        let r = &records[0];
        assert!(r.city.is_none());
        assert_eq!(r.state, "FL");
        assert!(r.phone.is_none());
        assert!(r.website.is_none());
    }

    #[test]
    fn numeric_phone_is_read_as_string() {
        let records: Vec<BusinessRecord> =
            serde_json::from_str(r#"[{"Name": "Ace", "Phone Number": 8135550100}]"#).unwrap();
        assert_eq!(records[0].phone.as_deref(), Some("8135550100"));
    }

    #[test]
    fn location_falls_back_to_state() {
        let with_city = BusinessRecord::new("Ace", Some("Tampa"), Some("FL"));
        let without_city = BusinessRecord::new("Ace", None, None);
        assert_eq!(with_city.location(), "Tampa, FL");
        assert_eq!(without_city.location(), "FL");
    }

    #[test]
    fn normalize_name_is_case_and_whitespace_insensitive() {
        assert_eq!(normalize_name("  ACE Roofing "), normalize_name("ace roofing"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_business_records(&dir.path().join("absent.json"));
        assert!(
            matches!(result, Err(ConfigError::InputFileMissing { .. })),
            "expected InputFileMissing, got: {result:?}"
        );
    }

    #[test]
    fn load_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roofers.json");
        std::fs::write(&path, "{not json").unwrap();
        let result = load_business_records(&path);
        assert!(matches!(result, Err(ConfigError::InputFileParse { .. })));
    }

    #[test]
    fn load_reads_array_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roofers.json");
        std::fs::write(&path, r#"[{"Name": "First"}, {"Name": "Second"}]"#).unwrap();
        let records = load_business_records(&path).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }
}

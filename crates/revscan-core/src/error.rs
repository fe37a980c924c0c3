use thiserror::Error;

/// Fatal precondition errors: reported once, before any record is processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("input file not found: {path}")]
    InputFileMissing { path: String },

    #[error("failed to read input file {path}: {source}")]
    InputFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input file {path}: {source}")]
    InputFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open URL mapping file {path}: {source}")]
    UrlFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse URL mapping file {path}: {source}")]
    UrlFileParse {
        path: String,
        #[source]
        source: csv::Error,
    },
}

use thiserror::Error;

/// Failure of one of the read calls (center list, members, member detail).
///
/// Carries no structured cause beyond "the round-trip failed" or "the payload
/// did not decode"; status codes are folded into `Network`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Local check that fails before any network call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Exit date is required")]
    MissingExitDate,
}

/// Failure of the exit-registration POST.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {status}")]
    Server { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

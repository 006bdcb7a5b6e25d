use std::fmt;

/// Startup-fatal error types for linkpulse operations.
///
/// Per-tier probe failures are values ([`crate::types::ProbeOutcome`])
/// consumed by the resolver; they never surface here. Only input-source,
/// configuration, and report-writing failures abort a run.
#[derive(Debug)]
pub enum LinkPulseError {
    /// IO error (report writing, etc.)
    Io(std::io::Error),

    /// HTTP client error outside of probing (link-list fetch)
    Http(reqwest::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// CSV source error
    Csv(csv::Error),

    /// Link-list source rejected the request or returned a bad document
    Source(String),

    /// Configuration error
    Config(String),
}

impl fmt::Display for LinkPulseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkPulseError::Io(err) => write!(f, "IO error: {err}"),
            LinkPulseError::Http(err) => write!(f, "HTTP error: {err}"),
            LinkPulseError::Json(err) => write!(f, "JSON error: {err}"),
            LinkPulseError::Csv(err) => write!(f, "CSV error: {err}"),
            LinkPulseError::Source(msg) => write!(f, "Link list error: {msg}"),
            LinkPulseError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for LinkPulseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkPulseError::Io(err) => Some(err),
            LinkPulseError::Http(err) => Some(err),
            LinkPulseError::Json(err) => Some(err),
            LinkPulseError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LinkPulseError {
    fn from(err: std::io::Error) -> Self {
        LinkPulseError::Io(err)
    }
}

impl From<reqwest::Error> for LinkPulseError {
    fn from(err: reqwest::Error) -> Self {
        LinkPulseError::Http(err)
    }
}

impl From<serde_json::Error> for LinkPulseError {
    fn from(err: serde_json::Error) -> Self {
        LinkPulseError::Json(err)
    }
}

impl From<csv::Error> for LinkPulseError {
    fn from(err: csv::Error) -> Self {
        LinkPulseError::Csv(err)
    }
}

/// Type alias for Results using LinkPulseError
pub type Result<T> = std::result::Result<T, LinkPulseError>;

use serde::{Deserialize, Serialize};

use std::fmt;

/// Latency value reported for a link that was never successfully measured.
pub const UNMEASURED_LATENCY: f64 = -1.0;

/// A named link to probe, as supplied by one of the input sources.
///
/// Records are immutable once read; each one flows into exactly one
/// resolution and produces exactly one [`LinkResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub name: String,
    pub link: String,
}

impl LinkRecord {
    pub fn new<S: Into<String>>(name: S, link: S) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

/// Why a single probe attempt failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// The attempt exceeded the per-probe timeout
    Timeout,
    /// Connection-level failure (refused, reset, DNS, TLS handshake)
    Transport(String),
    /// The tier answered but rejected the target: HTTP status for the
    /// direct and proxy tiers, the body `code` for the API tier
    BadStatus(u16),
    /// Anything else (invalid URL, malformed payload)
    Unknown(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Timeout => write!(f, "timed out"),
            FailureReason::Transport(msg) => write!(f, "transport error: {msg}"),
            FailureReason::BadStatus(code) => write!(f, "rejected with status {code}"),
            FailureReason::Unknown(msg) => write!(f, "unknown error: {msg}"),
        }
    }
}

/// Tagged result of one tier attempt: a measured latency or a failure
/// signal, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { latency_secs: f64 },
    Failure(FailureReason),
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success { .. })
    }
}

/// Terminal accessibility of a link after all applicable tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Accessible,
    Inaccessible,
}

/// Terminal outcome for one input record, produced exactly once per
/// record and immutable after the resolver returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkResult {
    pub name: String,
    pub link: String,
    /// Seconds, rounded to 2 decimals; [`UNMEASURED_LATENCY`] when the
    /// link was never reached
    pub latency: f64,
    pub status: LinkStatus,
}

impl LinkResult {
    /// Terminal result for a link that some tier reached successfully.
    pub fn accessible(record: &LinkRecord, latency_secs: f64) -> Self {
        Self {
            name: record.name.clone(),
            link: record.link.clone(),
            latency: round_latency(latency_secs),
            status: LinkStatus::Accessible,
        }
    }

    /// Terminal result for a link that no tier could reach.
    pub fn inaccessible(record: &LinkRecord) -> Self {
        Self {
            name: record.name.clone(),
            link: record.link.clone(),
            latency: UNMEASURED_LATENCY,
            status: LinkStatus::Inaccessible,
        }
    }

    pub fn is_accessible(&self) -> bool {
        self.status == LinkStatus::Accessible
    }
}

impl fmt::Display for LinkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            LinkStatus::Accessible => {
                write!(f, "{} - accessible - {:.2}s", self.link, self.latency)
            }
            LinkStatus::Inaccessible => write!(f, "{} - inaccessible", self.link),
        }
    }
}

/// Round a measured latency to two decimals for reporting.
pub fn round_latency(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_latency() {
        assert_eq!(round_latency(0.374_9), 0.37);
        assert_eq!(round_latency(1.234), 1.23);
        assert_eq!(round_latency(1.236), 1.24);
        assert_eq!(round_latency(0.0), 0.0);
    }

    #[test]
    fn test_round_latency_is_idempotent() {
        let rounded = round_latency(2.718_281);
        assert_eq!(round_latency(rounded), rounded);
    }

    #[test]
    fn test_link_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::Accessible).unwrap(),
            "\"accessible\""
        );
        assert_eq!(
            serde_json::to_string(&LinkStatus::Inaccessible).unwrap(),
            "\"inaccessible\""
        );
    }

    #[test]
    fn test_accessible_result_rounds_latency() {
        let record = LinkRecord::new("Example", "https://example.com");
        let result = LinkResult::accessible(&record, 0.374_9);

        assert_eq!(result.latency, 0.37);
        assert_eq!(result.status, LinkStatus::Accessible);
        assert!(result.is_accessible());
    }

    #[test]
    fn test_inaccessible_result_uses_sentinel() {
        let record = LinkRecord::new("Example", "https://example.com");
        let result = LinkResult::inaccessible(&record);

        assert_eq!(result.latency, UNMEASURED_LATENCY);
        assert_eq!(result.status, LinkStatus::Inaccessible);
        assert!(!result.is_accessible());
    }

    #[test]
    fn test_probe_outcome_is_success() {
        assert!(ProbeOutcome::Success { latency_secs: 0.5 }.is_success());
        assert!(!ProbeOutcome::Failure(FailureReason::Timeout).is_success());
    }

    #[test]
    fn test_failure_reason_display() {
        assert_eq!(FailureReason::Timeout.to_string(), "timed out");
        assert_eq!(
            FailureReason::BadStatus(503).to_string(),
            "rejected with status 503"
        );
        assert_eq!(
            FailureReason::Transport("connection refused".to_string()).to_string(),
            "transport error: connection refused"
        );
    }

    #[test]
    fn test_link_result_display() {
        let record = LinkRecord::new("Example", "https://example.com");

        let up = LinkResult::accessible(&record, 0.37);
        assert_eq!(up.to_string(), "https://example.com - accessible - 0.37s");

        let down = LinkResult::inaccessible(&record);
        assert_eq!(down.to_string(), "https://example.com - inaccessible");
    }

    #[test]
    fn test_link_record_deserializes_from_source_shape() {
        let record: LinkRecord =
            serde_json::from_str(r#"{"name": "博客", "link": "https://example.com"}"#).unwrap();

        assert_eq!(record.name, "博客");
        assert_eq!(record.link, "https://example.com");
    }
}

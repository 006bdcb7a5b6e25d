//! linkpulse probes a list of named links for reachability and latency.
//!
//! Each link is resolved through an ordered fallback chain: direct access
//! first, then a configured proxy rewrite, then a rate-limited third-party
//! query API. The first tier to succeed decides the outcome; a link whose
//! applicable tiers are all exhausted is reported inaccessible with a
//! latency sentinel of `-1`. All resolutions run concurrently under a
//! shared connection cap, and the final report preserves input order.
//!
//! The link list comes from a remote JSON document or a local CSV file;
//! the outcome is written to `result.json`.

pub mod config;
pub mod error;
pub mod logging;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{LinkPulseError, Result};
pub use probe::Prober;
pub use report::RunSummary;
pub use resolver::{ResolveLinks, Resolver};
pub use types::{FailureReason, LinkRecord, LinkResult, LinkStatus, ProbeOutcome};

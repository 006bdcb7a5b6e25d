use log::{info, warn};
use reqwest::redirect::Policy;
use serde::Deserialize;
use tokio::time::{Duration, Instant};

use crate::config::{self, Config};
use crate::error::{LinkPulseError, Result};
use crate::types::{FailureReason, ProbeOutcome};

/// Response body of the query API. Success is signaled by `code == 200`
/// inside the body, and `exec_time` is the API's own round-trip
/// measurement against the target.
#[derive(Debug, Deserialize)]
struct ApiReply {
    code: u16,
    exec_time: Option<f64>,
}

/// Issues single reachability attempts against one target URL.
///
/// One `Prober` wraps the shared HTTP client used by every tier of every
/// concurrent resolution. Certificate verification is disabled: many
/// probed targets run self-signed or misconfigured certs, and an
/// unreachable verdict for those would be wrong.
#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
}

impl Prober {
    pub fn new(config: &Config) -> Result<Self> {
        if config.timeout == 0 {
            return Err(LinkPulseError::Config(
                "probe timeout must be positive".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout_duration())
            .redirect(Policy::limited(10))
            .user_agent(config::USER_AGENT)
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(20)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self { client })
    }

    /// Probe a direct or proxied target.
    ///
    /// Success is any status below 400; latency is wall-clock time from
    /// request start to response headers. A status of 400 or above is a
    /// returned failure, never an error, so the resolver can move on to
    /// the next tier.
    pub async fn probe(&self, target: &str) -> ProbeOutcome {
        let start = Instant::now();

        match self.client.get(target).send().await {
            Ok(response) => {
                let latency_secs = start.elapsed().as_secs_f64();
                let status = response.status().as_u16();

                if status < 400 {
                    info!("probe {target} succeeded with status {status}, {latency_secs:.2}s");
                    ProbeOutcome::Success { latency_secs }
                } else {
                    info!("probe {target} rejected with status {status}");
                    ProbeOutcome::Failure(FailureReason::BadStatus(status))
                }
            }
            Err(err) => {
                let reason = classify_error(&err);
                info!("probe {target} failed: {reason}");
                ProbeOutcome::Failure(reason)
            }
        }
    }

    /// Probe via the query API.
    ///
    /// The status line is not authoritative here: success lives in the
    /// JSON body (`code == 200`), and the reported latency is the body's
    /// `exec_time`, not the caller's observed elapsed time.
    pub async fn probe_api(&self, target: &str) -> ProbeOutcome {
        let response = match self.client.get(target).send().await {
            Ok(response) => response,
            Err(err) => {
                let reason = classify_error(&err);
                info!("api probe {target} failed: {reason}");
                return ProbeOutcome::Failure(reason);
            }
        };

        match response.json::<ApiReply>().await {
            Ok(reply) if reply.code == 200 => match reply.exec_time {
                Some(latency_secs) => {
                    info!("api probe {target} succeeded, {latency_secs:.2}s");
                    ProbeOutcome::Success { latency_secs }
                }
                None => {
                    warn!("api probe {target} returned code 200 without exec_time");
                    ProbeOutcome::Failure(FailureReason::Unknown(
                        "api reply missing exec_time".to_string(),
                    ))
                }
            },
            Ok(reply) => {
                warn!("api probe {target} rejected with body code {}", reply.code);
                ProbeOutcome::Failure(FailureReason::BadStatus(reply.code))
            }
            Err(err) => {
                let reason = classify_error(&err);
                info!("api probe {target} returned an unreadable body: {reason}");
                ProbeOutcome::Failure(reason)
            }
        }
    }
}

/// Map a client error onto the failure taxonomy. Timeouts, connection
/// failures, invalid URLs, and malformed bodies all become outcomes; no
/// network condition escapes as a fault.
fn classify_error(err: &reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        FailureReason::Timeout
    } else if err.is_connect() {
        FailureReason::Transport(source_message(err))
    } else if err.is_builder() || err.is_decode() {
        FailureReason::Unknown(source_message(err))
    } else {
        FailureReason::Transport(source_message(err))
    }
}

fn source_message(err: &reqwest::Error) -> String {
    std::error::Error::source(err)
        .map(|e| e.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn test_config() -> Config {
        Config {
            timeout: 2,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_probe_success_below_400() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/ok").with_status(200).create_async().await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe(&(server.url() + "/ok")).await;

        match outcome {
            ProbeOutcome::Success { latency_secs } => assert!(latency_secs >= 0.0),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_probe_bad_status_is_failure_not_error() {
        let mut server = Server::new_async().await;
        let _m = server.mock("GET", "/gone").with_status(503).create_async().await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe(&(server.url() + "/gone")).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Failure(FailureReason::BadStatus(503))
        );
    }

    #[tokio::test]
    async fn test_probe_connection_refused() {
        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe("http://127.0.0.1:1/unreachable").await;

        match outcome {
            ProbeOutcome::Failure(FailureReason::Transport(_))
            | ProbeOutcome::Failure(FailureReason::Timeout) => {}
            other => panic!("expected transport failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_probe_malformed_url_is_failure() {
        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe("not a url").await;

        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_probe_empty_url_is_failure() {
        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe("").await;

        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_probe_api_takes_latency_from_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": 200, "exec_time": 1.234}"#)
            .create_async()
            .await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe_api(&server.url()).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Success {
                latency_secs: 1.234
            }
        );
    }

    #[tokio::test]
    async fn test_probe_api_body_code_rules_over_status_line() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": 403}"#)
            .create_async()
            .await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe_api(&server.url()).await;

        assert_eq!(
            outcome,
            ProbeOutcome::Failure(FailureReason::BadStatus(403))
        );
    }

    #[tokio::test]
    async fn test_probe_api_malformed_body_is_failure() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe_api(&server.url()).await;

        match outcome {
            ProbeOutcome::Failure(FailureReason::Unknown(_)) => {}
            other => panic!("expected unknown failure, got {other:?}"),
        }
    }

    #[test]
    fn test_prober_rejects_zero_timeout() {
        let config = Config {
            timeout: 0,
            ..Config::default()
        };

        assert!(matches!(
            Prober::new(&config),
            Err(LinkPulseError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_probe_api_missing_exec_time_is_failure() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(r#"{"code": 200}"#)
            .create_async()
            .await;

        let prober = Prober::new(&test_config()).unwrap();
        let outcome = prober.probe_api(&server.url()).await;

        assert!(!outcome.is_success());
    }
}

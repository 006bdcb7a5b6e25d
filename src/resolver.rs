use async_trait::async_trait;
use futures::{StreamExt, stream};
use log::{debug, info};
use tokio::sync::Semaphore;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::probe::Prober;
use crate::types::{LinkRecord, LinkResult, ProbeOutcome};

#[async_trait]
pub trait ResolveLinks {
    /// Resolve every record to a terminal result, concurrently, preserving
    /// input order in the output.
    async fn resolve_all(&self, records: Vec<LinkRecord>) -> Vec<LinkResult>;
}

/// Walks each link through the ordered tier chain: direct access first,
/// then the proxy rewrite, then the rate-limited query API.
///
/// Tier availability comes from the configuration resolved at startup.
/// The API tier is gated by a permit pool independent of the connection
/// cap, because the third-party API has its own rate policy distinct from
/// raw transport limits.
pub struct Resolver {
    prober: Prober,
    proxy_base: Option<String>,
    api_key: Option<String>,
    api_endpoint: String,
    max_connections: usize,
    api_permits: Arc<Semaphore>,
}

impl Resolver {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            prober: Prober::new(config)?,
            proxy_base: config.proxy_base.clone(),
            api_key: config.api_key.clone(),
            api_endpoint: config.api_endpoint.clone(),
            max_connections: config.max_connections.max(1),
            api_permits: Arc::new(Semaphore::new(config.api_permits.max(1))),
        })
    }

    /// Resolve one record to its terminal outcome.
    ///
    /// Strictly ordered and short-circuiting: each tier is attempted at
    /// most once, the first success wins, and a record with every
    /// applicable tier exhausted is marked inaccessible. Probe failures
    /// are consumed here; nothing a single link does can abort the run.
    pub async fn resolve(&self, record: &LinkRecord) -> LinkResult {
        if let ProbeOutcome::Success { latency_secs } = self.prober.probe(&record.link).await {
            info!("{} reachable directly, {latency_secs:.2}s", record.link);
            return LinkResult::accessible(record, latency_secs);
        }

        if let Some(base) = &self.proxy_base {
            let target = format!("{base}{}", record.link);
            if let ProbeOutcome::Success { latency_secs } = self.prober.probe(&target).await {
                info!("{} reachable via proxy, {latency_secs:.2}s", record.link);
                return LinkResult::accessible(record, latency_secs);
            }
        } else {
            debug!("proxy tier disabled, skipping for {}", record.link);
        }

        if let Some(key) = &self.api_key {
            let target = format!("{}?key={key}&url={}", self.api_endpoint, record.link);

            // Permit scope covers exactly the probe; released on all paths.
            let outcome = {
                let _permit = self
                    .api_permits
                    .acquire()
                    .await
                    .expect("api permit pool is never closed");
                self.prober.probe_api(&target).await
            };

            if let ProbeOutcome::Success { latency_secs } = outcome {
                info!("{} reachable via query api, {latency_secs:.2}s", record.link);
                return LinkResult::accessible(record, latency_secs);
            }
        } else {
            debug!("api tier disabled, skipping for {}", record.link);
        }

        info!("{} unreachable through all tiers", record.link);
        LinkResult::inaccessible(record)
    }
}

#[async_trait]
impl ResolveLinks for Resolver {
    async fn resolve_all(&self, records: Vec<LinkRecord>) -> Vec<LinkResult> {
        let total = records.len();

        let mut completions = stream::iter(records.into_iter().enumerate())
            .map(|(index, record)| async move { (index, self.resolve(&record).await) })
            .buffer_unordered(self.max_connections);

        let mut indexed = Vec::with_capacity(total);
        while let Some(completion) = completions.next().await {
            indexed.push(completion);
        }

        // Completion order is immaterial; the report is index-aligned
        // with the input list.
        indexed.sort_unstable_by_key(|(index, _)| *index);
        indexed.into_iter().map(|(_, result)| result).collect()
    }
}

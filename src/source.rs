use log::{debug, info};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{LinkPulseError, Result};
use crate::types::LinkRecord;

/// Envelope of the remote link-list document.
#[derive(Debug, Deserialize)]
struct RemoteDocument {
    link_list: Vec<LinkRecord>,
}

/// Fetch the link list from the remote JSON document.
///
/// A non-200 answer or a malformed body is fatal: the run aborts before
/// any resolution starts and no partial report is written.
pub async fn fetch_remote_list(config: &Config) -> Result<Vec<LinkRecord>> {
    let response = reqwest::get(&config.source_url).await?;
    let status = response.status();

    if status.as_u16() != 200 {
        return Err(LinkPulseError::Source(format!(
            "{} returned status {status}",
            config.source_url
        )));
    }

    let document: RemoteDocument = response
        .json()
        .await
        .map_err(|err| LinkPulseError::Source(format!("malformed link list document: {err}")))?;

    info!(
        "loaded {} links from {}",
        document.link_list.len(),
        config.source_url
    );
    Ok(document.link_list)
}

/// Read the link list from a local two-column CSV file (`name,link` rows,
/// no header). Rows of any other arity are skipped; an unreadable file is
/// fatal.
pub fn read_csv_list(path: &str) -> Result<Vec<LinkRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.len() == 2 {
            records.push(LinkRecord::new(row[0].to_string(), row[1].to_string()));
        } else {
            debug!("skipping csv row with {} fields", row.len());
        }
    }

    info!("loaded {} links from {path}", records.len());
    Ok(records)
}

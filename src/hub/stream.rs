// file: src/hub/stream.rs
// description: paginated record streaming from the hub rows API
// reference: https://huggingface.co/docs/datasets-server

use crate::config::SourceConfig;
use crate::error::{PipelineError, Result};
use crate::models::SourceRecord;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::debug;

/// Incremental record supply for the pipeline. One record at a time, order
/// preserved, exhaustion signalled with `Ok(None)`.
#[async_trait]
pub trait RecordSource: Send {
    async fn next_record(&mut self) -> Result<Option<SourceRecord>>;

    /// Total record count when the source knows it, for progress reporting.
    fn size_hint(&self) -> Option<u64> {
        None
    }
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEnvelope>,
    #[serde(default)]
    num_rows_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RowEnvelope {
    row: SourceRecord,
}

/// Streams a remote dataset through the rows API, holding one page in memory
/// and fetching the next lazily. The caller blocks during each page fetch.
pub struct HubRowStream {
    http: Client,
    endpoint: String,
    dataset: String,
    config_name: String,
    split: String,
    page_size: usize,
    offset: usize,
    page: VecDeque<SourceRecord>,
    total: Option<u64>,
    exhausted: bool,
}

impl HubRowStream {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            http: Client::new(),
            endpoint: config.rows_endpoint.clone(),
            dataset: config.dataset.clone(),
            config_name: config.config_name.clone(),
            split: config.split.clone(),
            page_size: config.page_size,
            offset: 0,
            page: VecDeque::new(),
            total: None,
            exhausted: false,
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let url = format!("{}/rows", self.endpoint);
        debug!(
            "Fetching rows {}..{} of {}",
            self.offset,
            self.offset + self.page_size,
            self.dataset
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config_name.as_str()),
                ("split", self.split.as_str()),
                ("offset", &self.offset.to_string()),
                ("length", &self.page_size.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(PipelineError::hub(status, message));
        }

        let page: RowsPage = response
            .json()
            .await
            .map_err(|e| PipelineError::Stream(format!("Malformed rows page: {e}")))?;

        if page.num_rows_total.is_some() {
            self.total = page.num_rows_total;
        }

        // a short or empty page is the last one
        if page.rows.len() < self.page_size {
            self.exhausted = true;
        }

        self.offset += page.rows.len();
        self.page
            .extend(page.rows.into_iter().map(|envelope| envelope.row));

        if let Some(total) = self.total
            && self.offset as u64 >= total
        {
            self.exhausted = true;
        }

        Ok(())
    }
}

#[async_trait]
impl RecordSource for HubRowStream {
    async fn next_record(&mut self) -> Result<Option<SourceRecord>> {
        loop {
            if let Some(record) = self.page.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    fn size_hint(&self) -> Option<u64> {
        self.total
    }
}

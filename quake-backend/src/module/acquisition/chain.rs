//! Ordered fallback over report sources.

use quake_common::{EarthquakeFeed, EarthquakeRecord, FeedSource};
use std::time::Duration;

use super::fallback::sample_records;
use super::source::{build_client, HttpSource, ReportSource, SourceError};
use crate::config::AcquisitionConfig;
use crate::module::report::parse_report;

/// Sources tried strictly one after another; the first stage that yields at
/// least one parsed record wins. Ends in the bundled sample dataset, so a
/// cycle never fails.
pub struct AcquisitionChain {
    sources: Vec<Box<dyn ReportSource>>,
    stage_timeout: Duration,
}

impl AcquisitionChain {
    pub fn new(sources: Vec<Box<dyn ReportSource>>, stage_timeout: Duration) -> Self {
        Self {
            sources,
            stage_timeout,
        }
    }

    /// Direct → local relay → public relay, sharing one HTTP client.
    pub fn from_config(config: &AcquisitionConfig) -> anyhow::Result<Self> {
        let stage_timeout = config.stage_timeout();
        let client = build_client(&config.user_agent, stage_timeout)?;

        let sources: Vec<Box<dyn ReportSource>> = vec![
            Box::new(HttpSource::direct(config, client.clone())),
            Box::new(HttpSource::local_relay(config, client.clone())),
            Box::new(HttpSource::public_relay(config, client)),
        ];

        Ok(Self::new(sources, stage_timeout))
    }

    /// Run one acquisition cycle.
    pub async fn fetch_feed(&self) -> EarthquakeFeed {
        for source in &self.sources {
            match self.attempt(source.as_ref()).await {
                Ok(records) => {
                    tracing::info!(
                        "Fetched {} earthquakes via {} stage",
                        records.len(),
                        source.kind()
                    );
                    return EarthquakeFeed::new(source.kind(), records);
                }
                Err(e) => {
                    tracing::warn!(
                        "{} stage ({}) failed: {}",
                        source.kind(),
                        source.endpoint(),
                        e
                    );
                }
            }
        }

        tracing::warn!("All live sources failed, serving sample data");
        EarthquakeFeed::new(FeedSource::Fallback, sample_records())
    }

    /// Records of one acquisition cycle; never fails.
    pub async fn fetch_earthquake_data(&self) -> Vec<EarthquakeRecord> {
        self.fetch_feed().await.records
    }

    async fn attempt(&self, source: &dyn ReportSource) -> Result<Vec<EarthquakeRecord>, SourceError> {
        let text = tokio::time::timeout(self.stage_timeout, source.fetch_text())
            .await
            .map_err(|_| SourceError::Timeout(self.stage_timeout.as_secs()))??;

        let records = parse_report(&text);
        if records.is_empty() {
            return Err(SourceError::NoRecords(text.len()));
        }
        Ok(records)
    }
}

//! Process-wide metrics.
//!
//! Everything hangs off an explicit [`RelayMetrics`] value that is cloned
//! into whatever needs to record. Collectors are internally synchronized,
//! so clones share the same underlying series.

use chrono::Utc;
use prometheus::{Encoder, Gauge, IntCounterVec, Opts, Registry, TextEncoder};

use courier_core::MediaKind;

/// Counters and gauges exported on `/metrics`.
#[derive(Clone)]
pub struct RelayMetrics {
    registry: Registry,
    files_processed: IntCounterVec,
    last_processed: Gauge,
}

impl RelayMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let files_processed = IntCounterVec::new(
            Opts::new(
                "telegram_bot_files_processed_total",
                "Number of files processed, by media type",
            ),
            &["type"],
        )?;
        registry.register(Box::new(files_processed.clone()))?;

        let last_processed = Gauge::new(
            "telegram_bot_last_processed_timestamp",
            "Unix timestamp of the last successfully processed media",
        )?;
        registry.register(Box::new(last_processed.clone()))?;

        Ok(Self {
            registry,
            files_processed,
            last_processed,
        })
    }

    /// Count one processed file of the given kind.
    pub fn inc_processed(&self, kind: MediaKind) {
        self.files_processed.with_label_values(&[kind.label()]).inc();
    }

    /// Move the last-activity gauge to the current time.
    pub fn touch_last_processed(&self) {
        self.last_processed
            .set(Utc::now().timestamp_millis() as f64 / 1000.0);
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

use crate::core::{fallback, normalizer};
use crate::domain::model::{CropPrice, FieldMapping, PriceReport};
use crate::domain::ports::PriceSource;
use crate::utils::error::Result;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Runs one fetch → normalize → respond cycle per call. Holds no mutable state,
/// so a single instance is shared by every request.
#[derive(Clone)]
pub struct PriceService {
    source: Arc<dyn PriceSource>,
    fields: FieldMapping,
}

impl PriceService {
    pub fn new(source: Arc<dyn PriceSource>, fields: FieldMapping) -> Self {
        Self { source, fields }
    }

    /// Live prices or the first error hit along the way. No retries.
    pub async fn fetch_prices(&self) -> Result<Vec<CropPrice>> {
        // Fetching
        let payload = self.source.fetch().await?;

        // Normalizing
        let upstream_count = payload
            .get(&self.fields.records)
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let records = normalizer::normalize(&payload, &self.fields)?;

        fallback::require_records(records, upstream_count)
    }

    /// Always succeeds: any failure resolves to the fallback list.
    pub async fn current_prices(&self) -> PriceReport {
        let started = Instant::now();
        let report = fallback::resolve(self.fetch_prices().await);

        tracing::info!(
            origin = report.origin.as_str(),
            records = report.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Price report ready"
        );

        report
    }
}

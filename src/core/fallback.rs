use crate::domain::model::{CropPrice, PriceOrigin, PriceReport};
use crate::utils::error::{PriceError, Result};

/// Served whenever live data is unavailable. Order is part of the contract.
pub const FALLBACK_PRICES: [(&str, f64); 5] = [
    ("Tomato", 3200.0),
    ("Onion", 2500.0),
    ("Potato", 2000.0),
    ("Wheat", 2800.0),
    ("Rice", 3500.0),
];

pub fn fallback_prices() -> Vec<CropPrice> {
    FALLBACK_PRICES
        .iter()
        .map(|(crop, price)| CropPrice::new(*crop, *price))
        .collect()
}

/// Resolve a pipeline outcome into something that can always be served.
///
/// Errors and empty lists both collapse into the fallback list; the error is
/// logged here and goes no further.
pub fn resolve(outcome: Result<Vec<CropPrice>>) -> PriceReport {
    match outcome {
        Ok(records) if !records.is_empty() => PriceReport {
            records,
            origin: PriceOrigin::Live,
        },
        Ok(_) => {
            tracing::warn!("⚠️ Upstream returned no usable records, serving fallback prices");
            fallback_report()
        }
        Err(e) => {
            tracing::warn!(
                category = e.category().as_str(),
                timeout = e.is_timeout(),
                "⚠️ Price fetch failed, serving fallback prices: {}",
                e
            );
            fallback_report()
        }
    }
}

/// Turn an empty normalization result into an explicit error so the cause is
/// visible in logs.
pub fn require_records(records: Vec<CropPrice>, upstream_count: usize) -> Result<Vec<CropPrice>> {
    if records.is_empty() {
        return Err(PriceError::EmptyAfterFiltering {
            discarded: upstream_count,
        });
    }
    Ok(records)
}

fn fallback_report() -> PriceReport {
    PriceReport {
        records: fallback_prices(),
        origin: PriceOrigin::Fallback,
    }
}

//! Turns loosely-typed upstream payloads into validated [`CropPrice`] lists.
//!
//! The upstream shape is never trusted: every field is looked up and checked
//! individually, and anything that does not yield a strictly positive price
//! is dropped.

use crate::domain::model::{CropPrice, FieldMapping, UNKNOWN_CROP};
use crate::utils::error::{PriceError, Result};
use serde_json::Value;

/// Normalize a whole payload.
///
/// Fails with [`PriceError::MalformedPayload`] when the record field is missing
/// or not an array. An `Ok` result may be empty; turning that into a fallback is
/// the caller's decision.
pub fn normalize(payload: &Value, fields: &FieldMapping) -> Result<Vec<CropPrice>> {
    let records = match payload.get(&fields.records) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(PriceError::malformed(format!(
                "field '{}' is {}, expected an array",
                fields.records,
                type_name(other)
            )))
        }
        None => {
            return Err(PriceError::malformed(format!(
                "field '{}' is missing",
                fields.records
            )))
        }
    };

    let normalized: Vec<CropPrice> = records
        .iter()
        .map(|item| normalize_record(item, fields))
        .filter(|record| record.price > 0.0)
        .collect();

    tracing::debug!(
        "Normalized {} of {} upstream records",
        normalized.len(),
        records.len()
    );

    Ok(normalized)
}

/// Map a single raw record, applying name defaulting and price coercion but no
/// filtering.
pub fn normalize_record(item: &Value, fields: &FieldMapping) -> CropPrice {
    CropPrice {
        crop: crop_name(item.get(&fields.name)),
        price: coerce_price(item.get(&fields.price)),
    }
}

fn crop_name(value: Option<&Value>) -> String {
    match value.and_then(Value::as_str).map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => UNKNOWN_CROP.to_string(),
    }
}

/// Numeric coercion with the usual loose-JSON rules: numeric strings parse,
/// blank strings and `null` are zero, booleans are 1/0. Anything that is not a
/// finite number comes back as 0.
pub fn coerce_price(value: Option<&Value>) -> f64 {
    let number = match value {
        None => f64::NAN,
        Some(Value::Null) => 0.0,
        Some(Value::Bool(flag)) => {
            if *flag {
                1.0
            } else {
                0.0
            }
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_)) | Some(Value::Object(_)) => f64::NAN,
    };

    if number.is_finite() {
        number
    } else {
        0.0
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

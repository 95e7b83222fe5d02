use serde::{Deserialize, Serialize, Serializer};

pub const UNKNOWN_CROP: &str = "Unknown";

/// One crop and its modal market price, in currency per quintal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPrice {
    pub crop: String,
    #[serde(serialize_with = "serialize_price")]
    pub price: f64,
}

impl CropPrice {
    pub fn new(crop: impl Into<String>, price: f64) -> Self {
        Self {
            crop: crop.into(),
            price,
        }
    }
}

// 整數價格輸出為 3400 而非 3400.0
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if price.fract() == 0.0 && price.abs() <= MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// Body of `GET /api/prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricesResponse {
    pub records: Vec<CropPrice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceOrigin {
    Live,
    Fallback,
}

impl PriceOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceOrigin::Live => "live",
            PriceOrigin::Fallback => "fallback",
        }
    }
}

/// Outcome of one pipeline cycle. Always non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceReport {
    pub records: Vec<CropPrice>,
    pub origin: PriceOrigin,
}

impl PriceReport {
    pub fn into_body(self) -> PricesResponse {
        PricesResponse {
            records: self.records,
        }
    }
}

/// Names of the upstream fields the normalizer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub records: String,
    pub name: String,
    pub price: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            records: "records".to_string(),
            name: "commodity".to_string(),
            price: "modal_price".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_prices_serialize_as_integers() {
        let value = serde_json::to_value(CropPrice::new("Tomato", 3400.0)).unwrap();
        assert_eq!(value, json!({"crop": "Tomato", "price": 3400}));
    }

    #[test]
    fn test_fractional_prices_keep_decimals() {
        let body = serde_json::to_string(&CropPrice::new("Onion", 2512.5)).unwrap();
        assert_eq!(body, r#"{"crop":"Onion","price":2512.5}"#);
    }

    #[test]
    fn test_response_deserializes_integer_prices() {
        let response: PricesResponse =
            serde_json::from_str(r#"{"records":[{"crop":"Rice","price":3500}]}"#).unwrap();
        assert_eq!(response.records, vec![CropPrice::new("Rice", 3500.0)]);
    }

    #[test]
    fn test_field_mapping_partial_override() {
        let mapping: FieldMapping = toml::from_str(r#"price = "max_price""#).unwrap();
        assert_eq!(mapping.records, "records");
        assert_eq!(mapping.name, "commodity");
        assert_eq!(mapping.price, "max_price");
    }
}

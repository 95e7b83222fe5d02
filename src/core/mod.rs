pub mod fallback;
pub mod normalizer;
pub mod price_service;

pub use crate::domain::model::{CropPrice, FieldMapping, PriceOrigin, PriceReport, PricesResponse};
pub use crate::domain::ports::{ConfigProvider, PriceSource};
pub use crate::utils::error::Result;

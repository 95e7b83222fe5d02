use crate::domain::model::FieldMapping;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn record_limit(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn bind_address(&self) -> &str;
    fn field_mapping(&self) -> FieldMapping;
}

/// Where raw upstream payloads come from.
///
/// Implementations perform exactly one request per call and return the parsed
/// body untouched; shape validation belongs to the normalizer.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<serde_json::Value>;
}

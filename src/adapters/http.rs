use crate::domain::ports::{ConfigProvider, PriceSource};
use crate::utils::error::{PriceError, Result};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_ENDPOINT: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";

/// reqwest-backed [`PriceSource`] for the data.gov.in commodity resource.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut url = Url::parse(config.api_endpoint()).map_err(|e| {
            PriceError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: config.api_endpoint().to_string(),
                reason: format!("Invalid URL format: {}", e),
            }
        })?;

        {
            let mut query = url.query_pairs_mut();
            if let Some(key) = config.api_key() {
                query.append_pair("api-key", key);
            }
            query
                .append_pair("format", "json")
                .append_pair("limit", &config.record_limit().to_string());
        }

        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("crop-prices/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url,
            timeout,
        })
    }

    /// Endpoint without the query string, safe to log.
    pub fn redacted_endpoint(&self) -> String {
        let mut shown = self.url.clone();
        shown.set_query(None);
        shown.to_string()
    }
}

#[async_trait]
impl PriceSource for UpstreamClient {
    async fn fetch(&self) -> Result<serde_json::Value> {
        tracing::debug!(
            "Making API request to: {} (timeout {:?})",
            self.redacted_endpoint(),
            self.timeout
        );

        // 每次都取最新資料，不使用任何快取
        let response = self
            .client
            .get(self.url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(PriceError::UpstreamBadStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(PriceError::malformed("empty response body"));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

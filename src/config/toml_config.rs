use crate::adapters::http::DEFAULT_API_ENDPOINT;
use crate::core::{ConfigProvider, FieldMapping};
use crate::utils::error::{PriceError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_RECORD_LIMIT: usize = 20;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: Option<String>,
    pub limit: Option<usize>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub fields: FieldMapping,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            limit: None,
            timeout_seconds: None,
            fields: FieldMapping::default(),
        }
    }
}

// api_key 不可出現在日誌中
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("limit", &self.limit)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("fields", &self.fields)
            .finish()
    }
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_API_ENDPOINT.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PriceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PriceError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_GOV_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static regex is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("upstream.endpoint", &self.upstream.endpoint)?;

        // 未被替換的 ${VAR} 代表環境變數缺失
        let api_key = self.upstream.api_key.as_deref();
        if let Some(key) = api_key {
            if key.starts_with("${") && key.ends_with('}') {
                return Err(PriceError::MissingConfigError {
                    field: key.trim_start_matches("${").trim_end_matches('}').to_string(),
                });
            }
        }
        validation::validate_secret("upstream.api_key", api_key)?;

        validation::validate_range("upstream.limit", self.record_limit(), 1, 1000)?;
        validation::validate_range(
            "upstream.timeout_seconds",
            self.request_timeout().as_secs(),
            1,
            60,
        )?;
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;

        let fields = &self.upstream.fields;
        validation::validate_non_empty_string("upstream.fields.records", &fields.records)?;
        validation::validate_non_empty_string("upstream.fields.name", &fields.name)?;
        validation::validate_non_empty_string("upstream.fields.price", &fields.price)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        &self.upstream.endpoint
    }

    fn api_key(&self) -> Option<&str> {
        self.upstream.api_key.as_deref()
    }

    fn record_limit(&self) -> usize {
        self.upstream.limit.unwrap_or(DEFAULT_RECORD_LIMIT)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn bind_address(&self) -> &str {
        &self.server.bind_address
    }

    fn field_mapping(&self) -> FieldMapping {
        self.upstream.fields.clone()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Upstream request failed: {0}")]
    UpstreamUnreachable(#[from] reqwest::Error),

    #[error("Upstream returned non-success status: {status}")]
    UpstreamBadStatus { status: u16 },

    #[error("Malformed upstream payload: {message}")]
    MalformedPayload { message: String },

    #[error("No usable price records after filtering ({discarded} discarded)")]
    EmptyAfterFiltering { discarded: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Upstream,
    Payload,
    Config,
    System,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Upstream => "upstream",
            ErrorCategory::Payload => "payload",
            ErrorCategory::Config => "config",
            ErrorCategory::System => "system",
        }
    }
}

impl PriceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PriceError::UpstreamUnreachable(_) | PriceError::UpstreamBadStatus { .. } => {
                ErrorCategory::Upstream
            }
            PriceError::MalformedPayload { .. } | PriceError::EmptyAfterFiltering { .. } => {
                ErrorCategory::Payload
            }
            PriceError::ConfigError { .. }
            | PriceError::InvalidConfigValueError { .. }
            | PriceError::MissingConfigError { .. } => ErrorCategory::Config,
            PriceError::IoError(_) => ErrorCategory::System,
        }
    }

    /// 上游相關錯誤一律由 fallback 吸收，不會回傳給呼叫端
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Upstream | ErrorCategory::Payload
        )
    }

    /// Whether the failure was the upstream call timing out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, PriceError::UpstreamUnreachable(e) if e.is_timeout())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        PriceError::MalformedPayload {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for PriceError {
    fn from(err: serde_json::Error) -> Self {
        PriceError::malformed(format!("invalid JSON: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PriceError>;

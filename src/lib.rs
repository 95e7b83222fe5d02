pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::http::UpstreamClient;
pub use crate::core::{fallback::fallback_prices, price_service::PriceService};
pub use domain::model::{CropPrice, FieldMapping, PriceOrigin, PriceReport, PricesResponse};
pub use server::{router::create_router, AppState};
pub use utils::error::{PriceError, Result};

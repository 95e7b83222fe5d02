use clap::Parser;
use crop_prices::core::ConfigProvider;
use crop_prices::utils::{logger, validation::Validate};
use crop_prices::{AppState, CliConfig, Command, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting crop-prices {}", env!("CARGO_PKG_VERSION"));
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let command = cli.command();
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            let file_config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => exit_with_config_error(e),
            };
            run(&file_config, command).await
        }
        None => run(&cli, command).await,
    }
}

async fn run<C: ConfigProvider + Validate>(config: &C, command: Command) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        exit_with_config_error(e);
    }

    match command {
        Command::Serve => crop_prices::server::serve(config).await,
        Command::Fetch => {
            let state = AppState::from_config(config)?;
            let report = state.prices.current_prices().await;
            tracing::info!("✅ Fetched {} records ({})", report.records.len(), report.origin.as_str());
            println!("{}", serde_json::to_string_pretty(&report.into_body())?);
            Ok(())
        }
    }
}

fn exit_with_config_error(e: crop_prices::PriceError) -> ! {
    tracing::error!(
        category = e.category().as_str(),
        "❌ Configuration validation failed: {}",
        e
    );
    eprintln!("❌ {}", e);
    std::process::exit(1);
}

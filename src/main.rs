use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use steam_buy_alert::{
    web::{self, AppState},
    AppConfig, HealthMonitor, Scanner, ScanPacing, ShutdownSignal, SteamMarket, TelegramNotifier,
};

#[derive(Debug, Parser)]
#[command(name = "steam-buy-alert", version, about = "Alerts on Steam Community Market buy orders")]
struct Cli {
    /// Extra TOML file layered over the built-in configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single scan pass and exit without starting the status server
    #[arg(long)]
    once: bool,

    /// Validate the configuration, print the watchlist and exit
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("steam_buy_alert=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_env(cli.config.as_deref())
        .context("invalid configuration, refusing to start")?;
    let items = config.watch_items()?;

    if cli.check_config {
        for item in &items {
            println!("{:>10} {}  {}", item.min_price, config.market.currency_label, item.display_name());
        }
        return Ok(());
    }

    info!("Starting steam-buy-alert with {} listings", items.len());

    let health = Arc::new(HealthMonitor::new());
    let market = Arc::new(SteamMarket::new(config.market.clone())?);
    let notifier = Arc::new(TelegramNotifier::new(config.telegram.clone())?);
    let mut scanner = Scanner::new(
        market,
        notifier,
        Arc::clone(&health),
        items,
        ScanPacing::from(&config.scan),
        config.market.currency_label.clone(),
    );

    let (trigger, shutdown) = ShutdownSignal::new();

    if cli.once {
        let mut shutdown = shutdown;
        let report = scanner.scan_once(&mut shutdown).await;
        info!("Single pass done: {:?}", report);
        drop(trigger);
        return Ok(());
    }

    let scan_task = tokio::spawn(scanner.run(shutdown.clone()));
    let mut web_task = tokio::spawn(web::serve(
        config.server.clone(),
        AppState { health },
        shutdown,
    ));

    let server_result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutting down...");
            None
        }
        result = &mut web_task => Some(result),
    };

    trigger.trigger();
    if let Err(e) = scan_task.await {
        error!("Scan task ended abnormally: {}", e);
    }

    let server_result = match server_result {
        Some(result) => result,
        None => web_task.await,
    };
    server_result
        .context("status server task panicked")?
        .context("status server failed")?;

    Ok(())
}

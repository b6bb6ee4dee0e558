pub mod config;
pub mod health;
pub mod ledger;
pub mod market;
pub mod models;
pub mod notifiers;
pub mod scheduler;
pub mod shutdown;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use config::AppConfig;
pub use health::{HealthMonitor, HealthSnapshot};
pub use ledger::AlertLedger;
pub use market::{PriceSource, SteamMarket};
pub use models::{ItemNameId, WatchItem};
pub use notifiers::{AlertMessage, Notifier, TelegramNotifier};
pub use scheduler::{ScanPacing, ScanReport, Scanner};
pub use shutdown::{ShutdownSignal, ShutdownTrigger};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

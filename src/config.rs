use config::{Config, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::models::WatchItem;

/// Defaults compiled into the binary, including the watchlist.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

const ENV_PREFIX: &str = "BUYWATCH";
const PORT_VAR: &str = "PORT";
const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub market: MarketConfig,
    pub scan: ScanConfig,
    pub telegram: TelegramConfig,
    pub watchlist: Vec<WatchEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub base_url: String,
    pub language: String,
    pub currency: u32,
    pub currency_label: String,
    pub user_agent: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    pub item_delay_secs: u64,
    pub cycle_delay_secs: u64,
    pub throttle_cooldown_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub api_base: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
}

// Keep the bot token out of debug output and logs.
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base)
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Raw watchlist entry. The threshold stays a string until validation so
/// malformed literals are rejected instead of coerced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEntry {
    pub url: String,
    pub min_price: String,
}

impl AppConfig {
    pub fn from_env(overlay: Option<&Path>) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::load(overlay, &vars)
    }

    /// Layer the embedded defaults, an optional overlay file and the given
    /// environment variables, then validate the result.
    pub fn load(overlay: Option<&Path>, vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = overlay {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .source(Some(vars.clone().into_iter().collect())),
        );

        if let Some(port) = vars.get(PORT_VAR) {
            builder = builder.set_override("server.port", port.as_str())?;
        }
        if let Some(token) = vars.get(BOT_TOKEN_VAR) {
            builder = builder.set_override("telegram.bot_token", token.as_str())?;
        }
        if let Some(chat_id) = vars.get(CHAT_ID_VAR) {
            builder = builder.set_override("telegram.chat_id", chat_id.as_str())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if Url::parse(&self.market.base_url).is_err() {
            return Err(ConfigError::Message("Invalid market base_url format".into()));
        }

        if self.market.language.trim().is_empty() {
            return Err(ConfigError::Message("Market language must not be empty".into()));
        }

        if self.market.currency == 0 {
            return Err(ConfigError::Message("Market currency code must be greater than 0".into()));
        }

        if Url::parse(&self.telegram.api_base).is_err() {
            return Err(ConfigError::Message("Invalid telegram api_base format".into()));
        }

        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "Missing {} environment variable",
                BOT_TOKEN_VAR
            )));
        }

        if self.telegram.chat_id.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "Missing {} environment variable",
                CHAT_ID_VAR
            )));
        }

        self.watch_items().map(|_| ())
    }

    /// Parse the watchlist into monitored items, failing on the first bad entry.
    pub fn watch_items(&self) -> Result<Vec<WatchItem>, ConfigError> {
        if self.watchlist.is_empty() {
            return Err(ConfigError::Message("Watchlist must contain at least one item".into()));
        }

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(self.watchlist.len());

        for entry in &self.watchlist {
            if Url::parse(&entry.url).is_err() {
                return Err(ConfigError::Message(format!(
                    "Invalid watchlist URL '{}'",
                    entry.url
                )));
            }

            let min_price = Decimal::from_str(entry.min_price.trim()).map_err(|_| {
                ConfigError::Message(format!(
                    "Malformed min_price '{}' for {}",
                    entry.min_price, entry.url
                ))
            })?;

            if min_price <= Decimal::ZERO {
                return Err(ConfigError::Message(format!(
                    "min_price must be greater than 0 for {}",
                    entry.url
                )));
            }

            if !seen.insert(entry.url.as_str()) {
                return Err(ConfigError::Message(format!(
                    "Duplicate watchlist entry for {}",
                    entry.url
                )));
            }

            items.push(WatchItem::new(entry.url.clone(), min_price));
        }

        Ok(items)
    }
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;

use crate::config::MarketConfig;
use crate::models::ItemNameId;
use crate::utils::error::AppError;
use crate::Result;

pub mod histogram;
pub mod resolver;

pub use histogram::{highest_buy_order_from, minor_units_to_decimal, HIGHEST_BUY_ORDER_FIELD};
pub use resolver::NameIdPatterns;

/// Upstream market data needed by the scan loop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Resolve the listing page into its internal `item_nameid`.
    async fn resolve_item_nameid(&self, listing_url: &str) -> Result<ItemNameId>;

    /// Current highest buy order for the item, in major currency units.
    async fn highest_buy_order(&self, item_nameid: &ItemNameId) -> Result<Decimal>;
}

/// Steam Community Market client: listing page scraping plus the order histogram API.
pub struct SteamMarket {
    client: Client,
    config: MarketConfig,
    patterns: NameIdPatterns,
}

impl SteamMarket {
    pub fn new(config: MarketConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config,
            patterns: NameIdPatterns::new()?,
        })
    }
}

#[async_trait]
impl PriceSource for SteamMarket {
    async fn resolve_item_nameid(&self, listing_url: &str) -> Result<ItemNameId> {
        self.fetch_item_nameid(listing_url).await
    }

    async fn highest_buy_order(&self, item_nameid: &ItemNameId) -> Result<Decimal> {
        self.fetch_highest_buy_order(item_nameid).await
    }
}

/// Map an upstream status to the error taxonomy; only 200 passes.
fn check_status(url: &str, status: StatusCode) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::TOO_MANY_REQUESTS => Err(AppError::RateLimited {
            url: url.to_string(),
        }),
        other => Err(AppError::UnexpectedStatus {
            url: url.to_string(),
            status: other.as_u16(),
        }),
    }
}

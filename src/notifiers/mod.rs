use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::WatchItem;
use crate::Result;

pub mod telegram;

pub use telegram::TelegramNotifier;

/// A buy-order alert ready to be rendered for a messaging channel.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub item_name: String,
    pub url: String,
    pub price: Decimal,
    pub min_price: Decimal,
    pub currency: String,
}

impl AlertMessage {
    pub fn new(item: &WatchItem, price: Decimal, currency: &str) -> Self {
        Self {
            item_name: item.display_name(),
            url: item.url.clone(),
            price,
            min_price: item.min_price,
            currency: currency.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "💰 Buy order detected: {}\n{}\n👛 Highest buy order: {:.2} {}\n🎯 Your minimum: {:.2} {}",
            self.item_name, self.url, self.price, self.currency, self.min_price, self.currency
        )
    }
}

/// Trait for alert delivery channels. Delivery is best effort: one attempt,
/// any failure is reported to the caller and never retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &AlertMessage) -> Result<()>;
}

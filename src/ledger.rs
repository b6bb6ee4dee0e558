use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::WatchItem;

/// Last price an alert went out at, per listing URL. Entries are only ever
/// raised, never removed, and live as long as the process.
#[derive(Debug, Default, Clone)]
pub struct AlertLedger {
    notified: HashMap<String, Decimal>,
}

impl AlertLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notified(&self, url: &str) -> Option<Decimal> {
        self.notified.get(url).copied()
    }

    /// Alert iff the price meets the threshold and beats the last alerted price.
    pub fn should_alert(&self, item: &WatchItem, price: Decimal) -> bool {
        item.qualifies(price)
            && self
                .last_notified(&item.url)
                .is_none_or(|last| price > last)
    }

    pub fn record(&mut self, url: &str, price: Decimal) {
        self.notified.insert(url.to_string(), price);
    }

    pub fn len(&self) -> usize {
        self.notified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notified.is_empty()
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monitored market listing and the buy-order price that should trigger an alert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchItem {
    pub url: String,
    pub min_price: Decimal,
}

impl WatchItem {
    pub fn new(url: impl Into<String>, min_price: Decimal) -> Self {
        Self {
            url: url.into(),
            min_price,
        }
    }

    /// Market hash name taken from the last path segment of the listing URL,
    /// percent-decoded. Falls back to the raw URL when there is no segment.
    pub fn display_name(&self) -> String {
        let segment = self
            .url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.contains(':'));

        match segment {
            Some(raw) => urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string()),
            None => self.url.clone(),
        }
    }

    pub fn qualifies(&self, price: Decimal) -> bool {
        price >= self.min_price
    }
}

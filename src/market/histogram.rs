use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{check_status, SteamMarket};
use crate::models::ItemNameId;
use crate::utils::error::AppError;
use crate::Result;

pub const HIGHEST_BUY_ORDER_FIELD: &str = "highest_buy_order";

const HISTOGRAM_PATH: &str = "/market/itemordershistogram";

/// Steam quotes prices in cents (or the minor unit of the requested currency).
pub fn minor_units_to_decimal(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Pull `highest_buy_order` out of a histogram body. Steam sends it as a
/// digit string; a bare integer is accepted too. Null or absent means no
/// buy orders are open.
pub fn highest_buy_order_from(body: &Value) -> Result<Decimal> {
    let minor = match body.get(HIGHEST_BUY_ORDER_FIELD) {
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        Some(Value::Number(number)) => number.as_i64(),
        _ => None,
    };

    minor
        .map(minor_units_to_decimal)
        .ok_or_else(|| AppError::MissingField {
            field: HIGHEST_BUY_ORDER_FIELD.to_string(),
        })
}

impl SteamMarket {
    pub fn histogram_url(&self, item_nameid: &ItemNameId) -> Result<Url> {
        let endpoint = format!("{}{}", self.config.base_url.trim_end_matches('/'), HISTOGRAM_PATH);
        let currency = self.config.currency.to_string();

        Ok(Url::parse_with_params(
            &endpoint,
            &[
                ("language", self.config.language.as_str()),
                ("currency", currency.as_str()),
                ("item_nameid", item_nameid.as_str()),
            ],
        )?)
    }

    pub(super) async fn fetch_highest_buy_order(&self, item_nameid: &ItemNameId) -> Result<Decimal> {
        let url = self.histogram_url(item_nameid)?;
        let response = self.client.get(url.clone()).send().await?;
        check_status(url.as_str(), response.status())?;

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;
        let price = highest_buy_order_from(&body)?;

        debug!("Histogram for item_nameid {}: highest buy order {}", item_nameid, price);
        Ok(price)
    }
}

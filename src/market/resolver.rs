use regex::Regex;
use tracing::debug;

use super::{check_status, SteamMarket};
use crate::models::ItemNameId;
use crate::utils::error::AppError;
use crate::Result;

/// Inline script call that seeds the order spread widget on listing pages.
const PRIMARY_PATTERN: &str = r"Market_LoadOrderSpread\(\s*(\d+)\s*\)";

/// Tried in order when the primary pattern is absent.
const FALLBACK_PATTERNS: [&str; 4] = [
    r"ItemActivityTicker\.Start\(\s*(\d+)\s*\)",
    r#""item_nameid"\s*:\s*"?(\d+)"#,
    r#"\\"item_nameid\\"\s*:\s*(?:\\")?(\d+)"#,
    r"item_nameid=(\d+)",
];

/// Ordered set of extraction patterns for the `item_nameid` of a listing page.
pub struct NameIdPatterns {
    primary: Regex,
    fallbacks: Vec<Regex>,
}

impl NameIdPatterns {
    pub fn new() -> Result<Self> {
        let fallbacks = FALLBACK_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            primary: Regex::new(PRIMARY_PATTERN)?,
            fallbacks,
        })
    }

    /// First match in priority order, with the index of the pattern that hit
    /// (0 is the primary). Later patterns are never evaluated once one matches.
    pub fn find(&self, body: &str) -> Option<(usize, ItemNameId)> {
        std::iter::once(&self.primary)
            .chain(self.fallbacks.iter())
            .enumerate()
            .find_map(|(index, regex)| {
                regex
                    .captures(body)
                    .and_then(|captures| captures.get(1))
                    .and_then(|m| ItemNameId::parse(m.as_str()))
                    .map(|id| (index, id))
            })
    }

    pub fn extract(&self, body: &str) -> Option<ItemNameId> {
        self.find(body).map(|(_, id)| id)
    }
}

impl SteamMarket {
    pub(super) async fn fetch_item_nameid(&self, listing_url: &str) -> Result<ItemNameId> {
        let response = self.client.get(listing_url).send().await?;
        check_status(listing_url, response.status())?;

        let body = response.text().await?;
        match self.patterns.find(&body) {
            Some((index, item_nameid)) => {
                debug!("Resolved item_nameid {} for {} (pattern #{})", item_nameid, listing_url, index);
                Ok(item_nameid)
            }
            None => Err(AppError::PatternNotFound {
                url: listing_url.to_string(),
            }),
        }
    }
}

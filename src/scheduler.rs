use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::ScanConfig;
use crate::health::HealthMonitor;
use crate::ledger::AlertLedger;
use crate::market::PriceSource;
use crate::models::WatchItem;
use crate::notifiers::{AlertMessage, Notifier};
use crate::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPacing {
    pub item_delay: Duration,
    pub cycle_delay: Duration,
    pub throttle_cooldown: Duration,
}

impl From<&ScanConfig> for ScanPacing {
    fn from(config: &ScanConfig) -> Self {
        Self {
            item_delay: Duration::from_secs(config.item_delay_secs),
            cycle_delay: Duration::from_secs(config.cycle_delay_secs),
            throttle_cooldown: Duration::from_secs(config.throttle_cooldown_secs),
        }
    }
}

/// What happened to a single listing during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Alerted(Decimal),
    NotifyFailed(Decimal),
    BelowThreshold(Decimal),
    AlreadyNotified(Decimal),
    Unresolved,
    NoData,
    Throttled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub items_checked: usize,
    pub alerts_sent: usize,
    pub notify_failures: usize,
    pub quiet: usize,
    pub unresolved: usize,
    pub no_data: usize,
    pub throttled: usize,
    pub cancelled: bool,
}

impl ScanReport {
    fn record(&mut self, outcome: &ItemOutcome) {
        self.items_checked += 1;
        match outcome {
            ItemOutcome::Alerted(_) => self.alerts_sent += 1,
            ItemOutcome::NotifyFailed(_) => self.notify_failures += 1,
            ItemOutcome::BelowThreshold(_) | ItemOutcome::AlreadyNotified(_) => self.quiet += 1,
            ItemOutcome::Unresolved => self.unresolved += 1,
            ItemOutcome::NoData => self.no_data += 1,
            ItemOutcome::Throttled => self.throttled += 1,
        }
    }
}

/// Drives repeated passes over the watchlist and owns the alert ledger.
pub struct Scanner {
    source: Arc<dyn PriceSource>,
    notifier: Arc<dyn Notifier>,
    health: Arc<HealthMonitor>,
    items: Vec<WatchItem>,
    ledger: AlertLedger,
    pacing: ScanPacing,
    currency_label: String,
}

impl Scanner {
    pub fn new(
        source: Arc<dyn PriceSource>,
        notifier: Arc<dyn Notifier>,
        health: Arc<HealthMonitor>,
        items: Vec<WatchItem>,
        pacing: ScanPacing,
        currency_label: impl Into<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            health,
            items,
            ledger: AlertLedger::new(),
            pacing,
            currency_label: currency_label.into(),
        }
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    /// Scan, sleep, repeat until shutdown is requested.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) {
        info!("Scanner started for {} listings", self.items.len());

        loop {
            let report = self.scan_once(&mut shutdown).await;
            if report.cancelled {
                break;
            }

            debug!("Next scan in {:?}", self.pacing.cycle_delay);
            if !shutdown.sleep(self.pacing.cycle_delay).await {
                break;
            }
        }

        info!("Scanner stopped");
    }

    /// One pass over every listing in random order. Throttling pauses the
    /// pass for the cooldown and abandons only the item that hit it.
    pub async fn scan_once(&mut self, shutdown: &mut ShutdownSignal) -> ScanReport {
        self.health.mark_scan_started().await;
        info!("Scanning {} listings for buy orders", self.items.len());

        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.shuffle(&mut rand::thread_rng());

        let mut report = ScanReport::default();
        let total = order.len();

        for (position, index) in order.into_iter().enumerate() {
            if shutdown.is_triggered() {
                report.cancelled = true;
                break;
            }

            let item = self.items[index].clone();
            let outcome = self.check_item(&item).await;
            report.record(&outcome);

            let pause = if outcome == ItemOutcome::Throttled {
                warn!(
                    "Rate limited while checking {}, cooling down for {:?}",
                    item.display_name(),
                    self.pacing.throttle_cooldown
                );
                self.pacing.throttle_cooldown
            } else if position + 1 < total {
                self.pacing.item_delay
            } else {
                Duration::ZERO
            };

            if !pause.is_zero() && !shutdown.sleep(pause).await {
                report.cancelled = true;
                break;
            }
        }

        info!(
            "Scan finished: {} checked, {} alerts, {} unresolved, {} without data, {} throttled",
            report.items_checked, report.alerts_sent, report.unresolved, report.no_data, report.throttled
        );
        report
    }

    /// A failed send leaves the ledger unchanged, so the alert is retried next pass.
    async fn check_item(&mut self, item: &WatchItem) -> ItemOutcome {
        let name = item.display_name();
        debug!("Checking {}", name);

        let item_nameid = match self.source.resolve_item_nameid(&item.url).await {
            Ok(id) => id,
            Err(e) if e.is_throttle() => return ItemOutcome::Throttled,
            Err(e) => {
                self.health.record_error();
                error!("Could not resolve item_nameid for {}: {}", name, e);
                return ItemOutcome::Unresolved;
            }
        };

        let price = match self.source.highest_buy_order(&item_nameid).await {
            Ok(price) => price,
            Err(e) if e.is_throttle() => return ItemOutcome::Throttled,
            Err(e) => {
                self.health.record_error();
                warn!("No buy order data for {}: {}", name, e);
                return ItemOutcome::NoData;
            }
        };

        info!("Highest buy order for {}: {:.2} {}", name, price, self.currency_label);

        if !self.ledger.should_alert(item, price) {
            return if item.qualifies(price) {
                ItemOutcome::AlreadyNotified(price)
            } else {
                ItemOutcome::BelowThreshold(price)
            };
        }

        let message = AlertMessage::new(item, price, &self.currency_label);
        match self.notifier.send(&message).await {
            Ok(()) => {
                self.ledger.record(&item.url, price);
                info!("Alert sent for {} at {:.2} {}", name, price, self.currency_label);
                ItemOutcome::Alerted(price)
            }
            Err(e) => {
                self.health.record_error();
                error!("Failed to send {} alert for {}: {}", self.notifier.name(), name, e);
                ItemOutcome::NotifyFailed(price)
            }
        }
    }
}

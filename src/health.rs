use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

pub const SCAN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Health state shared by the scan task (writer) and the status server (reader).
/// The counter only ever grows.
#[derive(Debug, Default)]
pub struct HealthMonitor {
    last_scan: RwLock<Option<DateTime<Local>>>,
    errors: AtomicU64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthSnapshot {
    pub last_scan: Option<DateTime<Local>>,
    pub errors: u64,
}

impl HealthSnapshot {
    pub fn last_scan_label(&self) -> Option<String> {
        self.last_scan
            .map(|ts| ts.format(SCAN_TIMESTAMP_FORMAT).to_string())
    }
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp the start of a scan pass.
    pub async fn mark_scan_started(&self) -> DateTime<Local> {
        let now = Local::now();
        *self.last_scan.write().await = Some(now);
        now
    }

    /// Count a failure, returning the new total.
    pub fn record_error(&self) -> u64 {
        self.errors.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    pub async fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            last_scan: *self.last_scan.read().await,
            errors: self.error_count(),
        }
    }
}

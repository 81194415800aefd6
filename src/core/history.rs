//! Time-windowed log of portfolio value snapshots.
use crate::core::state::{HISTORY_KEY, StateStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshots older than this, relative to the latest append, are evicted.
pub const RETENTION_DAYS: i64 = 7;
/// Hard cap on the number of snapshots kept, regardless of age.
pub const MAX_ENTRIES: usize = 1000;

/// Total portfolio value at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryLog {
    entries: Vec<Snapshot>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Snapshot>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.last()
    }

    /// Records `total` at `now`, then evicts everything older than the
    /// retention window and trims the oldest entries beyond the cap.
    pub fn append(&mut self, total: f64, now: DateTime<Utc>) {
        self.entries.push(Snapshot { time: now, value: total });

        let cutoff = now - Duration::days(RETENTION_DAYS);
        self.entries.retain(|s| s.time >= cutoff);

        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    /// Percentage change from the earliest snapshot inside the last `hours`
    /// to the latest snapshot.
    ///
    /// Returns `None` when the log is empty, no snapshot falls inside the
    /// window, or the reference value is zero. A negative or NaN `hours` is
    /// `None`; a window reaching past the representable range covers the
    /// whole log.
    pub fn percent_change_since(&self, hours: f64, now: DateTime<Utc>) -> Option<f64> {
        if hours.is_nan() || hours < 0.0 {
            return None;
        }
        let latest = self.entries.last()?;
        let cutoff = TimeDelta::try_milliseconds((hours * 3_600_000.0).round() as i64)
            .and_then(|window| now.checked_sub_signed(window));

        let earlier = self
            .entries
            .iter()
            .find(|s| cutoff.is_none_or(|cutoff| s.time >= cutoff))?;
        if earlier.value == 0.0 || !earlier.value.is_finite() {
            return None;
        }
        Some((latest.value - earlier.value) / earlier.value * 100.0)
    }

    pub fn performance(&self, now: DateTime<Utc>) -> PerformanceSummary {
        PerformanceSummary {
            change_24h: self.percent_change_since(24.0, now),
            change_7d: self.percent_change_since(24.0 * 7.0, now),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).context("Failed to serialize portfolio history")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Snapshot> =
            serde_json::from_str(json).context("Failed to parse portfolio history")?;
        Ok(Self { entries })
    }
}

/// Change over the two windows shown next to the total.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerformanceSummary {
    pub change_24h: Option<f64>,
    pub change_7d: Option<f64>,
}

/// Owns the history log and writes it back to the state store after every
/// append.
pub struct HistoryTracker {
    log: HistoryLog,
    store: Arc<dyn StateStore>,
}

impl HistoryTracker {
    /// Loads the persisted log. A missing or unreadable value starts an empty
    /// log rather than failing.
    pub async fn load(store: Arc<dyn StateStore>) -> Self {
        let log = match store.get(HISTORY_KEY).await {
            Some(json) => HistoryLog::from_json(&json).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring unreadable portfolio history");
                HistoryLog::new()
            }),
            None => HistoryLog::new(),
        };
        debug!(entries = log.len(), "Loaded portfolio history");
        Self { log, store }
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub async fn append(&mut self, total: f64, now: DateTime<Utc>) -> Result<&HistoryLog> {
        self.log.append(total, now);
        let json = self.log.to_json()?;
        self.store
            .set(HISTORY_KEY, &json)
            .await
            .context("Failed to persist portfolio history")?;
        debug!(entries = self.log.len(), total, "Appended history snapshot");
        Ok(&self.log)
    }

    pub fn percent_change_since(&self, hours: f64, now: DateTime<Utc>) -> Option<f64> {
        self.log.percent_change_since(hours, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_percent_change_uses_earliest_in_window() {
        let log = HistoryLog::from_entries(vec![
            Snapshot { time: t0(), value: 100.0 },
            Snapshot { time: t0() + Duration::hours(1), value: 110.0 },
        ]);

        let change = log.percent_change_since(2.0, t0() + Duration::hours(1));
        assert!((change.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_change_without_entries_in_window() {
        let log = HistoryLog::from_entries(vec![Snapshot { time: t0(), value: 100.0 }]);
        assert!(log.percent_change_since(24.0, t0() + Duration::hours(25)).is_none());
        assert!(HistoryLog::new().percent_change_since(24.0, t0()).is_none());
    }

    #[test]
    fn test_percent_change_with_unbounded_window() {
        let log = HistoryLog::from_entries(vec![
            Snapshot { time: t0(), value: 100.0 },
            Snapshot { time: t0() + Duration::hours(1), value: 150.0 },
        ]);
        let now = t0() + Duration::hours(1);

        assert_eq!(log.percent_change_since(1e10, now), Some(50.0));
        assert_eq!(log.percent_change_since(f64::INFINITY, now), Some(50.0));
        assert!(log.percent_change_since(f64::NAN, now).is_none());
        assert!(log.percent_change_since(-1.0, now).is_none());

        let single = HistoryLog::from_entries(vec![Snapshot { time: t0(), value: 100.0 }]);
        assert_eq!(single.percent_change_since(f64::INFINITY, t0()), Some(0.0));
    }

    #[test]
    fn test_percent_change_zero_reference_is_none() {
        let log = HistoryLog::from_entries(vec![
            Snapshot { time: t0(), value: 0.0 },
            Snapshot { time: t0() + Duration::minutes(30), value: 50.0 },
        ]);
        assert!(log.percent_change_since(1.0, t0() + Duration::minutes(30)).is_none());
    }

    #[test]
    fn test_percent_change_skips_entries_before_cutoff() {
        let log = HistoryLog::from_entries(vec![
            Snapshot { time: t0(), value: 50.0 },
            Snapshot { time: t0() + Duration::hours(10), value: 200.0 },
            Snapshot { time: t0() + Duration::hours(30), value: 150.0 },
        ]);
        let now = t0() + Duration::hours(30);
        let change = log.percent_change_since(24.0, now).unwrap();
        assert!((change - -25.0).abs() < 1e-9);

        let summary = log.performance(now);
        assert_eq!(summary.change_24h, Some(change));
        assert!((summary.change_7d.unwrap() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_append_evicts_entries_outside_retention() {
        let mut log = HistoryLog::from_entries(vec![
            Snapshot { time: t0() - Duration::days(8), value: 1.0 },
            Snapshot { time: t0() - Duration::days(7), value: 2.0 },
            Snapshot { time: t0() - Duration::days(1), value: 3.0 },
        ]);
        log.append(4.0, t0());

        let values: Vec<f64> = log.entries().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
        let cutoff = t0() - Duration::days(RETENTION_DAYS);
        assert!(log.entries().iter().all(|s| s.time >= cutoff));
    }

    #[test]
    fn test_append_respects_hard_cap() {
        let start = t0();
        let entries = (0..MAX_ENTRIES + 5)
            .map(|i| Snapshot {
                time: start + Duration::seconds(i as i64),
                value: i as f64,
            })
            .collect();
        let mut log = HistoryLog::from_entries(entries);

        let now = start + Duration::seconds((MAX_ENTRIES + 10) as i64);
        log.append(-1.0, now);

        assert_eq!(log.len(), MAX_ENTRIES);
        assert_eq!(log.latest().unwrap().time, now);
        assert_eq!(log.entries()[0].value, 6.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut log = HistoryLog::new();
        log.append(1234.5, t0());
        log.append(1300.25, t0() + Duration::milliseconds(90_123));

        let json = log.to_json().unwrap();
        assert!(json.contains("\"time\":\"2025-03-01T12:00:00Z\""));
        let restored = HistoryLog::from_json(&json).unwrap();
        assert_eq!(restored, log);
    }

    #[test]
    fn test_reads_browser_style_timestamps() {
        let json = r#"[{"time":"2025-03-01T12:00:00.000Z","value":10}]"#;
        let log = HistoryLog::from_json(json).unwrap();
        assert_eq!(log.entries()[0].time, t0());
        assert_eq!(log.entries()[0].value, 10.0);
    }

    #[tokio::test]
    async fn test_tracker_persists_after_append() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = HistoryTracker::load(store.clone()).await;
        assert!(tracker.log().is_empty());

        tracker.append(500.0, t0()).await.unwrap();
        tracker.append(550.0, t0() + Duration::hours(2)).await.unwrap();

        let reloaded = HistoryTracker::load(store.clone()).await;
        assert_eq!(reloaded.log(), tracker.log());
        let change = reloaded.percent_change_since(24.0, t0() + Duration::hours(2));
        assert!((change.unwrap() - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_tracker_ignores_corrupt_history() {
        let store = Arc::new(MemoryStore::new());
        store.set(HISTORY_KEY, "not json").await.unwrap();

        let tracker = HistoryTracker::load(store).await;
        assert!(tracker.log().is_empty());
    }
}

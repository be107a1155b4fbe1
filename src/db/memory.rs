use super::store::{AlertFilter, AlertStore, SortOrder};
use crate::error::AlertError;
use crate::models::alert::{Alert, AlertStatus, StatusUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use uuid::Uuid;

/// Alert store kept in insertion order behind a mutex.
///
/// Mirrors the SQL in `queries.rs`: filters and the status update follow the
/// same rules, decided under the lock.
#[derive(Default)]
pub struct MemoryAlertStore {
    alerts: Mutex<Vec<Alert>>,
}

impl MemoryAlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        Self {
            alerts: Mutex::new(alerts),
        }
    }

    pub fn snapshot(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

fn matches(filter: &AlertFilter, alert: &Alert) -> bool {
    filter.status.map_or(true, |s| alert.status == s)
        && filter.exclude_status.map_or(true, |s| alert.status != s)
        && filter.created_since.map_or(true, |t| alert.created_at >= t)
        && filter.created_before.map_or(true, |t| alert.created_at < t)
}

fn apply_status(alert: &mut Alert, update: &StatusUpdate, now: DateTime<Utc>) {
    alert.status = update.status;
    if let Some(flag) = update.is_false_alert {
        alert.is_false_alert = flag;
    }

    if update.status != AlertStatus::Pending && alert.response_time_seconds.is_none() {
        alert.response_time_seconds = Some(elapsed_seconds(alert.created_at, now));
    }

    alert.resolved_at = match update.status {
        AlertStatus::Resolved => Some(alert.resolved_at.unwrap_or(now)),
        _ => None,
    };
}

/// Seconds between two instants at microsecond precision, never negative.
fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let micros = to
        .signed_duration_since(from)
        .num_microseconds()
        .unwrap_or(i64::MAX);
    (micros as f64 / 1_000_000.0).max(0.0)
}

#[async_trait]
impl AlertStore for MemoryAlertStore {
    async fn insert(&self, alert: &Alert) -> Result<Uuid, AlertError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(alert.id)
    }

    async fn find_many(
        &self,
        filter: &AlertFilter,
        order: SortOrder,
    ) -> Result<Vec<Alert>, AlertError> {
        let mut found: Vec<Alert> = self
            .alerts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| matches(filter, a))
            .cloned()
            .collect();
        match order {
            SortOrder::NewestFirst => found.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::OldestFirst => found.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
        Ok(found)
    }

    async fn apply_status(
        &self,
        id: Uuid,
        update: &StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, AlertError> {
        let mut alerts = self.alerts.lock().unwrap();
        Ok(alerts.iter_mut().find(|a| a.id == id).map(|alert| {
            apply_status(alert, update, now);
            alert.clone()
        }))
    }

    async fn delete_many(&self, filter: &AlertFilter) -> Result<u64, AlertError> {
        let mut alerts = self.alerts.lock().unwrap();
        let before = alerts.len();
        alerts.retain(|a| !matches(filter, a));
        Ok((before - alerts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use chrono::{Duration, TimeZone};

    fn pending_alert(created_at: DateTime<Utc>) -> Alert {
        Alert {
            id: Uuid::new_v4(),
            reporter_id: "09171234567".to_string(),
            coordinates: Coordinates {
                lat: 14.5547,
                lon: 121.0244,
            },
            location: "Barangay Rizal".to_string(),
            distance_km: 0.0,
            created_at,
            status: AlertStatus::Pending,
            is_false_alert: false,
            response_time_seconds: None,
            resolved_at: None,
        }
    }

    fn update(status: AlertStatus) -> StatusUpdate {
        StatusUpdate {
            status,
            is_false_alert: None,
        }
    }

    #[test]
    fn test_response_time_set_once() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);

        apply_status(&mut alert, &update(AlertStatus::Ongoing), t0 + Duration::seconds(45));
        assert_eq!(alert.response_time_seconds, Some(45.0));
        assert_eq!(alert.resolved_at, None);

        let resolved_at = t0 + Duration::seconds(600);
        apply_status(&mut alert, &update(AlertStatus::Resolved), resolved_at);
        assert_eq!(alert.response_time_seconds, Some(45.0));
        assert_eq!(alert.resolved_at, Some(resolved_at));
    }

    #[test]
    fn test_direct_resolve_sets_both_metrics() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);
        let now = t0 + Duration::milliseconds(120_500);

        apply_status(&mut alert, &update(AlertStatus::Resolved), now);
        assert_eq!(alert.response_time_seconds, Some(120.5));
        assert_eq!(alert.resolved_at, Some(now));
    }

    #[test]
    fn test_pending_update_captures_nothing() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);
        apply_status(&mut alert, &update(AlertStatus::Pending), t0 + Duration::seconds(30));
        assert_eq!(alert.response_time_seconds, None);
        assert_eq!(alert.resolved_at, None);
    }

    #[test]
    fn test_reopen_clears_resolved_at_but_keeps_response_time() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);
        apply_status(&mut alert, &update(AlertStatus::Resolved), t0 + Duration::seconds(10));
        apply_status(&mut alert, &update(AlertStatus::Pending), t0 + Duration::seconds(20));

        assert_eq!(alert.status, AlertStatus::Pending);
        assert_eq!(alert.resolved_at, None);
        assert_eq!(alert.response_time_seconds, Some(10.0));
    }

    #[test]
    fn test_false_alert_flag_only_changes_when_given() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);
        apply_status(
            &mut alert,
            &StatusUpdate {
                status: AlertStatus::Ongoing,
                is_false_alert: Some(true),
            },
            t0,
        );
        assert!(alert.is_false_alert);

        apply_status(&mut alert, &update(AlertStatus::Resolved), t0);
        assert!(alert.is_false_alert);
    }

    #[test]
    fn test_clock_skew_never_gives_negative_response_time() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let mut alert = pending_alert(t0);
        apply_status(&mut alert, &update(AlertStatus::Ongoing), t0 - Duration::seconds(5));
        assert_eq!(alert.response_time_seconds, Some(0.0));
    }

    #[test]
    fn test_filter_bounds() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let alert = pending_alert(t0);

        assert!(matches(&AlertFilter::default(), &alert));
        assert!(matches(&AlertFilter::active(), &alert));
        let since = AlertFilter {
            created_since: Some(t0),
            ..Default::default()
        };
        assert!(matches(&since, &alert));
        let before = AlertFilter {
            created_before: Some(t0),
            ..Default::default()
        };
        assert!(!matches(&before, &alert));
        let resolved = AlertFilter {
            status: Some(AlertStatus::Resolved),
            ..Default::default()
        };
        assert!(!matches(&resolved, &alert));
    }
}

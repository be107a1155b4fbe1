use crate::clock::Clock;
use crate::db::{AlertFilter, AlertStore, SortOrder};
use crate::error::AlertError;
use crate::geo::UNKNOWN_LOCATION;
use crate::models::alert::{Alert, AlertStatus};
use crate::models::dashboard::{DashboardMetrics, LocationCount};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;

const TOP_LOCATIONS: usize = 5;

/// Calendar boundaries the dashboard counts from, as absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardWindow {
    pub month_start: DateTime<Utc>,
    pub day_start: DateTime<Utc>,
}

impl DashboardWindow {
    /// Month and day boundaries on the calendar of `now`'s own time zone.
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let first_of_month = today.with_day(1).unwrap_or(today);
        Self {
            month_start: local_midnight(&tz, first_of_month),
            day_start: local_midnight(&tz, today),
        }
    }
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    // Midnight may not exist on a DST change day; use the first hour that does.
    (0..24)
        .find_map(|h| {
            tz.from_local_datetime(&(midnight + Duration::hours(h)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Dashboard numbers for `alerts`; anything created before the month window is ignored.
pub fn summarize(alerts: &[Alert], window: &DashboardWindow) -> DashboardMetrics {
    let monthly: Vec<&Alert> = alerts
        .iter()
        .filter(|a| a.created_at >= window.month_start)
        .collect();
    let today: Vec<&Alert> = monthly
        .iter()
        .copied()
        .filter(|a| a.created_at >= window.day_start)
        .collect();

    let responses_this_month = monthly
        .iter()
        .filter(|a| matches!(a.status, AlertStatus::Ongoing | AlertStatus::Resolved))
        .count();

    let response_times: Vec<f64> = monthly
        .iter()
        .filter_map(|a| a.response_time_seconds)
        .collect();
    let average_response_time = if response_times.is_empty() {
        0.0
    } else {
        response_times.iter().sum::<f64>() / response_times.len() as f64
    };

    DashboardMetrics {
        responses_this_month,
        average_response_time,
        false_alerts_today: today.iter().filter(|a| a.is_false_alert).count(),
        resolved_alerts_today: today
            .iter()
            .filter(|a| a.status == AlertStatus::Resolved)
            .count(),
        most_reported_locations: top_locations(&monthly),
    }
}

/// Counts per location, highest first; equal counts keep first-seen order.
fn top_locations(alerts: &[&Alert]) -> Vec<LocationCount> {
    let mut counts: Vec<LocationCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for alert in alerts {
        let location = if alert.location.is_empty() {
            UNKNOWN_LOCATION
        } else {
            alert.location.as_str()
        };
        match index.get(location) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(location, counts.len());
                counts.push(LocationCount {
                    location: location.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_LOCATIONS);
    counts
}

pub struct AnalyticsAggregator {
    store: Arc<dyn AlertStore>,
    clock: Arc<dyn Clock>,
}

impl AnalyticsAggregator {
    pub fn new(store: Arc<dyn AlertStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Dashboard for the current local month and day.
    pub async fn compute_dashboard(&self) -> Result<DashboardMetrics, AlertError> {
        let now = self.clock.now().with_timezone(&Local);
        self.compute_dashboard_for(DashboardWindow::containing(&now))
            .await
    }

    pub async fn compute_dashboard_for(
        &self,
        window: DashboardWindow,
    ) -> Result<DashboardMetrics, AlertError> {
        let filter = AlertFilter {
            created_since: Some(window.month_start),
            ..Default::default()
        };
        let monthly = self.store.find_many(&filter, SortOrder::OldestFirst).await?;
        Ok(summarize(&monthly, &window))
    }
}

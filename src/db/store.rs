use crate::error::AlertError;
use crate::models::alert::{Alert, AlertStatus, StatusUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Conjunction of optional predicates over alerts. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
    pub exclude_status: Option<AlertStatus>,
    /// Inclusive lower bound on creation time.
    pub created_since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on creation time.
    pub created_before: Option<DateTime<Utc>>,
}

impl AlertFilter {
    pub fn active() -> Self {
        Self {
            exclude_status: Some(AlertStatus::Resolved),
            ..Default::default()
        }
    }

}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    NewestFirst,
    OldestFirst,
}

/// Persistence seam for alerts.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert(&self, alert: &Alert) -> Result<Uuid, AlertError>;

    async fn find_many(&self, filter: &AlertFilter, order: SortOrder)
        -> Result<Vec<Alert>, AlertError>;

    /// Apply a status change as one atomic operation; `None` if the id is unknown.
    ///
    /// Response time is captured on the first move out of `pending` and never
    /// overwritten. `resolved_at` is set on the first move to `resolved` and
    /// cleared when the alert leaves `resolved`. Both are decided against the
    /// stored row at write time, so concurrent updates cannot both capture
    /// a response time.
    async fn apply_status(
        &self,
        id: Uuid,
        update: &StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, AlertError>;

    async fn delete_many(&self, filter: &AlertFilter) -> Result<u64, AlertError>;
}

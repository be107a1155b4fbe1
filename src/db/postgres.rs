use super::queries;
use super::store::{AlertFilter, AlertStore, SortOrder};
use super::DbPool;
use crate::error::AlertError;
use crate::models::alert::{Alert, AlertRow, StatusUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub struct PgAlertStore {
    pool: DbPool,
}

impl PgAlertStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn insert(&self, alert: &Alert) -> Result<Uuid, AlertError> {
        sqlx::query(queries::INSERT_ALERT)
            .bind(alert.id)
            .bind(&alert.reporter_id)
            .bind(alert.coordinates.lat)
            .bind(alert.coordinates.lon)
            .bind(&alert.location)
            .bind(alert.distance_km)
            .bind(alert.created_at)
            .bind(alert.status.as_str())
            .bind(alert.is_false_alert)
            .bind(alert.response_time_seconds)
            .bind(alert.resolved_at)
            .execute(&self.pool)
            .await?;
        Ok(alert.id)
    }

    async fn find_many(
        &self,
        filter: &AlertFilter,
        order: SortOrder,
    ) -> Result<Vec<Alert>, AlertError> {
        let sql = match order {
            SortOrder::NewestFirst => queries::SELECT_ALERTS_NEWEST_FIRST,
            SortOrder::OldestFirst => queries::SELECT_ALERTS_OLDEST_FIRST,
        };
        let rows: Vec<AlertRow> = sqlx::query_as(sql)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.exclude_status.map(|s| s.as_str()))
            .bind(filter.created_since)
            .bind(filter.created_before)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Alert::try_from).collect()
    }

    async fn apply_status(
        &self,
        id: Uuid,
        update: &StatusUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Alert>, AlertError> {
        let row: Option<AlertRow> = sqlx::query_as(queries::UPDATE_ALERT_STATUS)
            .bind(id)
            .bind(update.status.as_str())
            .bind(update.is_false_alert)
            .bind(now)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Alert::try_from).transpose()
    }

    async fn delete_many(&self, filter: &AlertFilter) -> Result<u64, AlertError> {
        let result = sqlx::query(queries::DELETE_ALERTS)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.exclude_status.map(|s| s.as_str()))
            .bind(filter.created_since)
            .bind(filter.created_before)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

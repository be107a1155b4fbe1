use crate::clock::Clock;
use crate::db::{AlertFilter, AlertStore, SortOrder};
use crate::error::AlertError;
use crate::geo::{Coordinates, GeoResolver};
use crate::models::alert::{Alert, AlertStatus, StatusUpdate};
use crate::models::message::parse_f64_option;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Inbound distress submission. Fields are optional so missing ones surface
/// as validation errors instead of decode failures. Coordinates may arrive
/// as numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewAlert {
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "parse_f64_option")]
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusChange {
    pub status: Option<String>,
    #[serde(rename = "isFalseAlert")]
    pub is_false_alert: Option<bool>,
}

impl StatusChange {
    pub fn into_update(self) -> Result<StatusUpdate, AlertError> {
        let status: AlertStatus = self
            .status
            .as_deref()
            .ok_or_else(|| AlertError::validation("status is required"))?
            .parse()?;
        Ok(StatusUpdate {
            status,
            is_false_alert: self.is_false_alert,
        })
    }
}

pub struct AlertLifecycle {
    store: Arc<dyn AlertStore>,
    geo: Arc<GeoResolver>,
    clock: Arc<dyn Clock>,
}

impl AlertLifecycle {
    pub fn new(store: Arc<dyn AlertStore>, geo: Arc<GeoResolver>, clock: Arc<dyn Clock>) -> Self {
        Self { store, geo, clock }
    }

    pub async fn create(&self, request: NewAlert) -> Result<Alert, AlertError> {
        let reporter_id = request
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AlertError::validation("user_id is required"))?;
        let (lat, lon) = match (request.lat, request.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return Err(AlertError::validation("lat and lon are required")),
        };
        let coordinates = Coordinates::new(lat, lon)?;
        let resolution = self.geo.resolve(coordinates);

        let alert = Alert {
            id: Uuid::new_v4(),
            reporter_id,
            coordinates,
            location: resolution.location,
            distance_km: resolution.distance_km,
            created_at: self.clock.now(),
            status: AlertStatus::Pending,
            is_false_alert: false,
            response_time_seconds: None,
            resolved_at: None,
        };
        self.store.insert(&alert).await?;

        info!(
            "SOS {} from {} at {} ({:.2} km from station)",
            alert.id, alert.reporter_id, alert.location, alert.distance_km
        );
        Ok(alert)
    }

    /// Alerts that still need attention, newest first.
    pub async fn list_active(&self) -> Result<Vec<Alert>, AlertError> {
        self.store
            .find_many(&AlertFilter::active(), SortOrder::NewestFirst)
            .await
    }

    /// Backward moves such as `resolved -> pending` are accepted.
    pub async fn update_status(&self, id: Uuid, change: StatusChange) -> Result<Alert, AlertError> {
        let update = change.into_update()?;
        let alert = self
            .store
            .apply_status(id, &update, self.clock.now())
            .await?
            .ok_or_else(|| AlertError::alert_not_found(id))?;

        info!(
            "Alert {} -> {} (false alert: {}, response time: {:?}s)",
            alert.id, alert.status, alert.is_false_alert, alert.response_time_seconds
        );
        Ok(alert)
    }
}

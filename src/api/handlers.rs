use super::error::ApiResult;
use super::AppState;
use crate::engine::lifecycle::{NewAlert, StatusChange};
use crate::error::AlertError;
use crate::models::alert::Alert;
use crate::models::dashboard::DashboardMetrics;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AlertEnvelope {
    pub message: &'static str,
    pub data: Alert,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

pub async fn submit_alert(
    State(state): State<AppState>,
    request: Result<Json<NewAlert>, JsonRejection>,
) -> ApiResult<Json<AlertEnvelope>> {
    let Json(request) = request?;
    let alert = state.lifecycle.create(request).await?;
    Ok(Json(AlertEnvelope {
        message: "SOS received",
        data: alert,
    }))
}

pub async fn list_active_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Alert>>> {
    Ok(Json(state.lifecycle.list_active().await?))
}

pub async fn update_alert_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    change: Result<Json<StatusChange>, JsonRejection>,
) -> ApiResult<Json<AlertEnvelope>> {
    let Json(change) = change?;
    // An id that can't be a stored id can't name an alert.
    let id = Uuid::parse_str(&id).map_err(|_| AlertError::alert_not_found(&id))?;
    let alert = state.lifecycle.update_status(id, change).await?;
    Ok(Json(AlertEnvelope {
        message: "Alert status updated",
        data: alert,
    }))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(state.analytics.compute_dashboard().await?))
}

use crate::engine::{AlertLifecycle, AnalyticsAggregator};
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<AlertLifecycle>,
    pub analytics: Arc<AnalyticsAggregator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/sos", post(handlers::submit_alert))
        .route("/get_sos", get(handlers::list_active_alerts))
        .route("/sos/{id}/status", patch(handlers::update_alert_status))
        .route("/analytics/dashboard", get(handlers::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// src/api/mod.rs

pub mod handler;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::models::AppState;

pub use handler::{
    brackets_handler, chart_handler, dashboard_handler, page_handler, report_handler,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/api/brackets", get(brackets_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/charts/{kind}", get(chart_handler))
        .route("/api/report", get(report_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

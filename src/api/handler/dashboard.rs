use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use log::{debug, warn};
use serde_json::json;
use std::sync::Arc;

use crate::errors::FilterError;
use crate::models::{
    AppState, BracketOption, BracketSelection, ChartKind, DashboardResponse, FilterParams,
    FormattedKpis, Record,
};
use crate::services::analytics_service::{bracket_stats, calculate_kpis, filter_records};
use crate::services::chart_service::BarChart;
use crate::utils::{format_rate, format_thousands};

/// Parses `?brackets=` and applies it to the shared dataset.
pub fn select_records<'a>(
    state: &'a AppState,
    params: &FilterParams,
) -> Result<(BracketSelection, Vec<&'a Record>), FilterError> {
    let selection = BracketSelection::from_query(params.brackets.as_deref())?;
    let records = filter_records(state.dataset.records(), &selection);
    debug!(
        "Selection '{}' matched {} of {} records",
        selection.describe(),
        records.len(),
        state.dataset.len()
    );
    Ok((selection, records))
}

pub fn bad_selection(e: FilterError) -> Response {
    warn!("Rejected bracket selection: {}", e);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "status": "error",
            "message": e.to_string()
        })),
    )
        .into_response()
}

pub async fn brackets_handler(State(state): State<Arc<AppState>>) -> Json<Vec<BracketOption>> {
    Json(state.bracket_options.clone())
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Response {
    let (selection, records) = match select_records(&state, &params) {
        Ok(selected) => selected,
        Err(e) => return bad_selection(e),
    };

    let kpis = calculate_kpis(&records);
    let response = DashboardResponse {
        selection: selection.describe(),
        records: records.len(),
        kpis,
        formatted: FormattedKpis {
            new_users: format_thousands(kpis.new_users),
            converted: format_thousands(kpis.converted),
            conversion_rate: format!("{}%", format_rate(kpis.conversion_rate)),
        },
        brackets: bracket_stats(&records),
    };

    (StatusCode::OK, Json(response)).into_response()
}

pub async fn chart_handler(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<ChartKind>,
    Query(params): Query<FilterParams>,
) -> Response {
    let (_, records) = match select_records(&state, &params) {
        Ok(selected) => selected,
        Err(e) => return bad_selection(e),
    };

    let svg = BarChart::from_stats(kind, &bracket_stats(&records)).to_svg();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        svg,
    )
        .into_response()
}

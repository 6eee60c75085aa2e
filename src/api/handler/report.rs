use axum::{
    extract::{Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Local;
use log::{error, info};
use std::fs;
use std::sync::Arc;

use crate::api::handler::dashboard::{bad_selection, select_records};
use crate::errors::ReportError;
use crate::models::{AppState, FilterParams, ReportResponse, ReportStatus};
use crate::services::report_service::{generate_report, ReportArtifact, ReportRequest};
use crate::utils::remove_if_exists;

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const GENERIC_FAILURE: &str = "Error generating report. Check the server log for details.";

pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Response {
    if let Err(e) = select_records(&state, &params) {
        return bad_selection(e);
    }

    info!(
        "Report requested for brackets '{}'",
        params.brackets.as_deref().unwrap_or("all")
    );
    let task_state = state.clone();
    let built = tokio::task::spawn_blocking(move || build_report(&task_state, &params))
        .await
        .unwrap_or_else(|join_error| Err(ReportError::Aborted(join_error.to_string())));

    let artifact = match built {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Report generation failed: {:?}", e);
            return report_error(&e);
        }
    };

    // the deck only lives on disk long enough to be read back
    let bytes = tokio::fs::read(&artifact.path).await;
    remove_if_exists(&artifact.path);
    let bytes = match bytes {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Could not read report {}: {:?}", artifact.path.display(), e);
            return report_error(&ReportError::Io(e));
        }
    };

    info!("Sending report {} ({} bytes)", artifact.file_name, bytes.len());
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PPTX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn build_report(state: &AppState, params: &FilterParams) -> Result<ReportArtifact, ReportError> {
    let (_, records) = select_records(state, params)
        .map_err(|e| ReportError::Aborted(e.to_string()))?;
    fs::create_dir_all(&state.config.work_dir)?;

    generate_report(&ReportRequest {
        template: &state.config.template_path,
        output_dir: &state.config.work_dir,
        records: &records,
        converter: &*state.converter,
    })
}

fn report_error(e: &ReportError) -> Response {
    let message = match e {
        ReportError::TemplateNotFound(_) | ReportError::TooFewSlides(_) => {
            format!("Error generating report: {}", e)
        }
        _ => GENERIC_FAILURE.to_string(),
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ReportResponse {
            status: ReportStatus::Error,
            message,
            timestamp: Local::now().to_rfc3339(),
        }),
    )
        .into_response()
}

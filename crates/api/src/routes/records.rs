//! Record endpoint handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Local;
use domain::models::{CreateRecordRequest, Record};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_export, record_record_created};
use crate::services::export::ExportFormat;

/// Base path of the record resource.
pub const RECORDS_PATH: &str = "/api/v1/records";

pub fn record_location(id: i32) -> String {
    format!("{}/{}", RECORDS_PATH, id)
}

/// Create a record.
///
/// POST /api/v1/records
///
/// Responds with 201, the stored record and a `Location` header.
pub async fn create_record(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<CreateRecordRequest>, ApiError>,
) -> Result<Response, ApiError> {
    let new_record = request.into_new_record()?;
    let record = state.records.insert(new_record).await?;

    info!(record_id = record.id, "Record created");
    record_record_created();

    let location = HeaderValue::from_str(&record_location(record.id))
        .map_err(|e| ApiError::Internal(format!("Invalid location header: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    )
        .into_response())
}

/// Get a record by id.
///
/// GET /api/v1/records/:id
pub async fn get_record(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<Record>, ApiError> {
    let record = state
        .records
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Record {} not found", id)))?;

    Ok(Json(record))
}

/// Export all records as PDF.
///
/// GET /api/v1/records/download/pdf
pub async fn download_pdf(State(state): State<AppState>) -> Result<Response, ApiError> {
    export(&state, ExportFormat::Pdf).await
}

/// Export all records as a spreadsheet.
///
/// GET /api/v1/records/download/excel
pub async fn download_excel(State(state): State<AppState>) -> Result<Response, ApiError> {
    export(&state, ExportFormat::Spreadsheet).await
}

async fn export(state: &AppState, format: ExportFormat) -> Result<Response, ApiError> {
    let records = state.records.list_all().await?;
    let record_count = records.len();
    let rendered_at = Local::now().naive_local();

    let bytes = tokio::task::spawn_blocking(move || format.render(&records, rendered_at))
        .await
        .map_err(|e| ApiError::Internal(format!("Export task failed: {}", e)))??;

    info!(
        format = format.label(),
        record_count,
        bytes = bytes.len(),
        "Records exported"
    );
    record_export(format.label());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", format.file_name()),
            ),
        ],
        bytes,
    )
        .into_response())
}

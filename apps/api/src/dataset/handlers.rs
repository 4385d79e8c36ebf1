//! Axum route handlers for the Dataset API.

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::dataset::{Dataset, DatasetInfo};
use crate::errors::AppError;
use crate::ingest;
use crate::models::record::SalaryRecord;
use crate::state::AppState;

/// GET /api/v1/dataset
pub async fn handle_get_dataset(State(state): State<AppState>) -> Json<DatasetInfo> {
    Json(state.dataset.read().await.info())
}

/// POST /api/v1/dataset/csv
///
/// Body is raw CSV text with a header row. Replaces the current dataset.
pub async fn handle_upload_csv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DatasetInfo>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::Validation("CSV body cannot be empty".to_string()));
    }
    let records = parse_csv(body).await?;
    Ok(Json(state.dataset.replace(Dataset::new("csv", records)).await))
}

/// POST /api/v1/dataset/upload
///
/// Multipart form with a `file` field holding the CSV.
pub async fn handle_upload_multipart(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DatasetInfo>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let source = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        info!("Received dataset upload '{source}' ({} bytes)", data.len());

        let records = parse_csv(data).await?;
        return Ok(Json(state.dataset.replace(Dataset::new(source, records)).await));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}

/// POST /api/v1/dataset/rows
///
/// Body is a JSON array of row objects using any of the accepted column aliases.
pub async fn handle_upload_rows(
    State(state): State<AppState>,
    Json(rows): Json<Value>,
) -> Result<Json<DatasetInfo>, AppError> {
    let records = ingest::read_json_rows(&rows)?;
    Ok(Json(state.dataset.replace(Dataset::new("json", records)).await))
}

/// Parses on the blocking pool; uploads can be large.
async fn parse_csv(body: Bytes) -> Result<Vec<SalaryRecord>, AppError> {
    let records = tokio::task::spawn_blocking(move || ingest::read_csv_bytes(&body))
        .await
        .context("CSV parsing task failed")??;
    Ok(records)
}

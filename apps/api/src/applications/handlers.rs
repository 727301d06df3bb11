use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::applications::validation::validate_draft;
use crate::csv_codec;
use crate::errors::AppError;
use crate::models::{ApplicationDraft, ApplicationRecord, Status};
use crate::state::AppState;

const IMPORT_FIELD: &str = "file";
const EXPORT_FILENAME: &str = "applications.csv";

#[derive(Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// A record as returned over HTTP, with the derived follow-up flag.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    #[serde(flatten)]
    pub record: ApplicationRecord,
    pub follow_up_due: bool,
}

impl From<ApplicationRecord> for ApplicationView {
    fn from(record: ApplicationRecord) -> Self {
        let follow_up_due = record.follow_up_due();
        Self {
            record,
            follow_up_due,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub company: String,
    pub role: String,
    pub status: Status,
    pub applied_on: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub last_update: Option<NaiveDate>,
}

impl UpdateRequest {
    fn into_parts(self) -> (ApplicationDraft, Option<NaiveDate>) {
        let draft = ApplicationDraft {
            company: self.company,
            role: self.role,
            status: self.status,
            applied_on: self.applied_on,
            notes: self.notes,
        };
        (draft, self.last_update)
    }
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub imported: usize,
}

/// GET /api/apps
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Status>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
        ),
    };
    let records = state.store.list(params.q.as_deref(), status);
    Ok(Json(records.into_iter().map(ApplicationView::from).collect()))
}

/// GET /api/apps/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ApplicationView>, AppError> {
    state
        .store
        .get(id)
        .map(|r| Json(r.into()))
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// POST /api/apps
pub async fn handle_create(
    State(state): State<AppState>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<Json<ApplicationView>, AppError> {
    validate_draft(&draft)?;
    Ok(Json(state.store.create(draft).into()))
}

/// PUT /api/apps/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<ApplicationView>, AppError> {
    let (draft, last_update) = req.into_parts();
    validate_draft(&draft)?;
    state
        .store
        .update(id, draft, last_update)
        .map(|r| Json(r.into()))
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// DELETE /api/apps/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Application {id} not found")))
    }
}

/// GET /api/apps/export
pub async fn handle_export(State(state): State<AppState>) -> impl IntoResponse {
    let body = csv_codec::encode(&state.store);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={EXPORT_FILENAME}"),
            ),
        ],
        body,
    )
}

/// POST /api/apps/import
///
/// Expects a multipart body with the CSV in the `file` field.
pub async fn handle_import(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, AppError> {
    let mut upload: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some(IMPORT_FIELD) {
            upload = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?,
            );
            break;
        }
    }
    let data = upload
        .ok_or_else(|| AppError::Validation(format!("Missing multipart field '{IMPORT_FIELD}'")))?;

    // Decoding is a synchronous scan; keep it off the async workers.
    let store = Arc::clone(&state.store);
    let imported = tokio::task::spawn_blocking(move || csv_codec::decode(&store, &data))
        .await
        .context("CSV import task panicked")??;

    Ok(Json(ImportResponse { imported }))
}

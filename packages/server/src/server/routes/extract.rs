use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    Json,
};
use serde::Deserialize;

use crate::common::ExtractedDataId;
use crate::domains::extraction::{
    extract_and_persist_from_url, get_extracted_data, get_extracted_data_history, ExtractedData,
    HistoryQuery,
};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct ExtractParams {
    #[serde(default)]
    pub url: String,
}

/// `POST /extract?url=` - fresh cached run or a new extraction
pub async fn extract_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<ExtractParams>,
) -> Result<Json<ExtractedData>, ApiError> {
    // Dropping the request (client disconnect) cancels the chain.
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    extract_and_persist_from_url(&params.url, &state.deps, &cancel)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

/// `POST /extract/history` - past runs, newest first
pub async fn history_handler(
    Extension(state): Extension<AppState>,
    body: Result<Json<HistoryQuery>, JsonRejection>,
) -> Result<Json<Vec<ExtractedData>>, ApiError> {
    let Json(query) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    get_extracted_data_history(query, &state.deps, &cancel)
        .await
        .map(Json)
        .map_err(|e| state.api_error(e))
}

/// `GET /extract/:id` - one stored run
pub async fn get_extracted_data_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExtractedData>, ApiError> {
    let cancel = state.shutdown.child_token();
    let _guard = cancel.clone().drop_guard();

    get_extracted_data(ExtractedDataId::new(id), &state.deps, &cancel)
        .await
        .map_err(|e| state.api_error(e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("extracted data {id} not found")))
}

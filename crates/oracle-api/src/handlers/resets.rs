//! Reset procedure handlers

use axum::extract::{Path, State};
use axum::Json;
use oracle_core::{QueryParams, ResetProcedure};
use serde::{Deserialize, Serialize};

use super::SearchResponse;
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FindResetQuery {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub alarm_category: Option<String>,
}

/// A lookup whose miss is an ordinary answer
#[derive(Serialize)]
pub struct FindResetResponse {
    pub result: Option<ResetProcedure>,
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing query parameter: {}", name)))
}

/// GET /oracle/v1/resets
/// Search reset procedures by text, service and brand
pub async fn search_resets(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QueryParams>,
) -> Result<Json<SearchResponse<ResetProcedure>>, ApiError> {
    let (query, limit) = state.search_query(&params)?;
    let catalog = state.catalog().await?;

    let matches = catalog.resets().search(&query);
    tracing::debug!(
        query = query.needle(),
        service = ?query.service,
        brand = ?query.brand,
        matches = matches.len(),
        "Reset procedure search"
    );

    Ok(Json(SearchResponse::truncated(matches, limit)))
}

/// GET /oracle/v1/resets/find?brand&model&alarmCategory
/// Exact lookup on the classification key
pub async fn find_reset(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<FindResetQuery>,
) -> Result<Json<FindResetResponse>, ApiError> {
    let brand = required(&query.brand, "brand")?;
    let model = required(&query.model, "model")?;
    let alarm_category = required(&query.alarm_category, "alarmCategory")?;

    let catalog = state.catalog().await?;
    let result = catalog.resets().find(brand, model, alarm_category).cloned();

    Ok(Json(FindResetResponse { result }))
}

/// GET /oracle/v1/resets/{id}
pub async fn get_reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResetProcedure>, ApiError> {
    let catalog = state.catalog().await?;
    let procedure = catalog
        .resets()
        .by_id(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Reset procedure not found: {}", id)))?;

    Ok(Json(procedure.clone()))
}

/// GET /oracle/v1/brands/{brand}/resets
pub async fn brand_resets(
    State(state): State<AppState>,
    Path(brand): Path<String>,
) -> Result<Json<SearchResponse<ResetProcedure>>, ApiError> {
    let catalog = state.catalog().await?;
    Ok(Json(SearchResponse::all(catalog.resets().by_brand(&brand))))
}

//! Fault code handlers

use axum::extract::{Path, State};
use axum::Json;
use oracle_core::{FaultCodeEntry, QueryParams, ResetProcedure};

use super::SearchResponse;
use crate::error::ApiError;
use crate::extract::ApiQuery;
use crate::state::AppState;

/// GET /oracle/v1/faults
/// Search fault codes by text, service and brand
pub async fn search_faults(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QueryParams>,
) -> Result<Json<SearchResponse<FaultCodeEntry>>, ApiError> {
    let (query, limit) = state.search_query(&params)?;
    let catalog = state.catalog().await?;

    let matches = catalog.faults().search(&query);
    tracing::debug!(
        query = query.needle(),
        service = ?query.service,
        brand = ?query.brand,
        matches = matches.len(),
        "Fault search"
    );

    Ok(Json(SearchResponse::truncated(matches, limit)))
}

/// GET /oracle/v1/faults/{brand}/{model}/{code}
pub async fn get_fault(
    State(state): State<AppState>,
    Path((brand, model, code)): Path<(String, String, String)>,
) -> Result<Json<FaultCodeEntry>, ApiError> {
    let catalog = state.catalog().await?;
    let entry = catalog.faults().get(&brand, &model, &code).ok_or_else(|| {
        ApiError::NotFound(format!("Fault code not found: {} / {} / {}", brand, model, code))
    })?;

    Ok(Json(entry.clone()))
}

/// GET /oracle/v1/faults/{brand}/{model}/{code}/resets
/// Reset procedures that apply to the controller reporting this fault
pub async fn fault_resets(
    State(state): State<AppState>,
    Path((brand, model, code)): Path<(String, String, String)>,
) -> Result<Json<SearchResponse<ResetProcedure>>, ApiError> {
    let catalog = state.catalog().await?;
    let entry = catalog.faults().get(&brand, &model, &code).ok_or_else(|| {
        ApiError::NotFound(format!("Fault code not found: {} / {} / {}", brand, model, code))
    })?;

    let procedures = catalog.resets().applicable_to(&entry.brand, &entry.model);
    Ok(Json(SearchResponse::all(procedures)))
}

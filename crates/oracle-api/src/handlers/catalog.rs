//! Catalog-wide handlers (brands, statistics)

use axum::extract::State;
use axum::Json;
use oracle_core::FaultStats;
use oracle_data::CatalogMeta;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandsResponse {
    pub brands: Vec<String>,
    pub total_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub meta: CatalogMeta,
    pub fault_codes: FaultStats,
    pub reset_procedures: usize,
}

/// GET /oracle/v1/brands
/// Distinct fault code brands in first-seen order
pub async fn list_brands(State(state): State<AppState>) -> Result<Json<BrandsResponse>, ApiError> {
    let catalog = state.catalog().await?;
    let brands: Vec<String> = catalog
        .faults()
        .brands()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(BrandsResponse {
        total_count: brands.len(),
        brands,
    }))
}

/// GET /oracle/v1/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let catalog = state.catalog().await?;

    Ok(Json(StatsResponse {
        meta: catalog.meta().clone(),
        fault_codes: catalog.faults().stats(),
        reset_procedures: catalog.resets().len(),
    }))
}

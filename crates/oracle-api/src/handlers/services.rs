//! Service category handlers
//!
//! Every service renders through the same handler; the descriptor supplies
//! the title and summary.

use axum::extract::{Path, State};
use axum::Json;
use oracle_core::{service_descriptors, FaultCodeEntry, Service, ServiceDescriptor};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    #[serde(flatten)]
    pub descriptor: &'static ServiceDescriptor,
    pub fault_count: usize,
}

#[derive(Serialize)]
pub struct ServicesResponse {
    pub items: Vec<ServiceSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFaultsResponse {
    #[serde(flatten)]
    pub descriptor: &'static ServiceDescriptor,
    pub results: Vec<FaultCodeEntry>,
    pub total_count: usize,
}

/// GET /oracle/v1/services
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<ServicesResponse>, ApiError> {
    let catalog = state.catalog().await?;
    let items = service_descriptors()
        .iter()
        .map(|descriptor| ServiceSummary {
            descriptor,
            fault_count: catalog.faults().by_service(descriptor.service).len(),
        })
        .collect();

    Ok(Json(ServicesResponse { items }))
}

/// GET /oracle/v1/services/{service}/faults
pub async fn service_faults(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<ServiceFaultsResponse>, ApiError> {
    let service: Service = service
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Service not found: {}", service)))?;

    let catalog = state.catalog().await?;
    let results: Vec<FaultCodeEntry> = catalog
        .faults()
        .by_service(service)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(ServiceFaultsResponse {
        descriptor: service.descriptor(),
        total_count: results.len(),
        results,
    }))
}

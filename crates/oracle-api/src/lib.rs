//! oracle-api - REST API over the Generator Oracle catalog
//!
//! Read-only JSON endpoints for fault code search, reset procedure lookup
//! and per-service listings. The catalog is loaded on first use through a
//! [`oracle_data::SharedCatalog`].
//!
//! # Usage
//!
//! ```ignore
//! use oracle_api::{create_router, AppState};
//! use oracle_data::Catalog;
//!
//! let state = AppState::from_catalog(Catalog::builtin()?);
//! let router = create_router(state);
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use extract::ApiQuery;
pub use state::{AppState, SearchLimits};

use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Oracle REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Fault code routes
        .route("/oracle/v1/faults", get(handlers::faults::search_faults))
        .route(
            "/oracle/v1/faults/{brand}/{model}/{code}",
            get(handlers::faults::get_fault),
        )
        .route(
            "/oracle/v1/faults/{brand}/{model}/{code}/resets",
            get(handlers::faults::fault_resets),
        )
        // Reset procedure routes
        .route("/oracle/v1/resets", get(handlers::resets::search_resets))
        .route("/oracle/v1/resets/find", get(handlers::resets::find_reset))
        .route("/oracle/v1/resets/{id}", get(handlers::resets::get_reset))
        // Brand routes
        .route("/oracle/v1/brands", get(handlers::catalog::list_brands))
        .route(
            "/oracle/v1/brands/{brand}/resets",
            get(handlers::resets::brand_resets),
        )
        // Service routes
        .route("/oracle/v1/services", get(handlers::services::list_services))
        .route(
            "/oracle/v1/services/{service}/faults",
            get(handlers::services::service_faults),
        )
        .route("/oracle/v1/stats", get(handlers::catalog::stats))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

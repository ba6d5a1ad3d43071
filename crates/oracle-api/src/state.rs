//! Application state for the Oracle API

use std::sync::Arc;

use oracle_core::{CatalogError, LookupQuery, QueryParams};
use oracle_data::{Catalog, SharedCatalog};

use crate::error::ApiError;

/// Result limits applied to search endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Used when the request has no `limit`
    pub default_limit: usize,
    /// Upper bound for any requested `limit`
    pub max_limit: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 500,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    catalog: Arc<SharedCatalog>,
    limits: SearchLimits,
}

impl AppState {
    /// Create state around a lazily loaded catalog
    pub fn new(catalog: Arc<SharedCatalog>) -> Self {
        Self {
            catalog,
            limits: SearchLimits::default(),
        }
    }

    /// Create state from a catalog that is already built
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self::new(Arc::new(SharedCatalog::preloaded(catalog)))
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    /// Get the catalog, loading it on first access
    pub async fn catalog(&self) -> Result<Arc<Catalog>, ApiError> {
        Ok(self.catalog.get().await?)
    }

    /// Parse search parameters and resolve the effective limit.
    ///
    /// The returned query carries no limit so callers can count every match
    /// before truncating; the limit comes back separately.
    pub fn search_query(&self, params: &QueryParams) -> Result<(LookupQuery, usize), CatalogError> {
        let mut query = LookupQuery::parse(params)?;
        let limit = query
            .limit
            .take()
            .unwrap_or(self.limits.default_limit)
            .min(self.limits.max_limit);
        Ok((query, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_data::Catalog;

    fn state() -> AppState {
        AppState::from_catalog(Catalog::default()).with_limits(SearchLimits {
            default_limit: 10,
            max_limit: 25,
        })
    }

    #[test]
    fn test_search_query_limits() {
        let (query, limit) = state().search_query(&QueryParams::default()).unwrap();
        assert_eq!(limit, 10);
        assert_eq!(query.limit, None);

        let params = QueryParams {
            limit: Some(1000),
            ..Default::default()
        };
        assert_eq!(state().search_query(&params).unwrap().1, 25);
    }

    #[test]
    fn test_search_query_rejects_zero_limit() {
        let params = QueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            state().search_query(&params),
            Err(CatalogError::Validation(_))
        ));
    }
}

//! Lookup/filter engine
//!
//! A query is free text plus optional exact-match filters. The text matches
//! when it is empty or occurs, ignoring case, in any searched field of a
//! record. Filters are ANDed with the text match. Results keep the order of
//! the input slice.

use serde::Deserialize;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{FaultCodeEntry, ResetProcedure, Service};

/// A record the lookup engine can filter
pub trait Searchable {
    /// Fields the free-text query is matched against
    fn search_fields(&self) -> [&str; 4];
    fn service(&self) -> Service;
    fn brand(&self) -> &str;
}

impl Searchable for FaultCodeEntry {
    fn search_fields(&self) -> [&str; 4] {
        [&self.code, &self.issue, &self.brand, &self.model]
    }

    fn service(&self) -> Service {
        self.service
    }

    fn brand(&self) -> &str {
        &self.brand
    }
}

impl Searchable for ResetProcedure {
    fn search_fields(&self) -> [&str; 4] {
        [&self.id, &self.alarm_category, &self.brand, &self.model]
    }

    fn service(&self) -> Service {
        self.service
    }

    fn brand(&self) -> &str {
        &self.brand
    }
}

/// Raw query parameters as received from a caller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    pub query: Option<String>,
    pub service: Option<String>,
    pub brand: Option<String>,
    pub limit: Option<usize>,
}

/// Parsed, validated lookup query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupQuery {
    /// Lowercased, trimmed search text; empty matches everything
    needle: String,
    pub service: Option<Service>,
    pub brand: Option<String>,
    pub limit: Option<usize>,
}

/// Query over the fault store
pub type FaultQuery = LookupQuery;
/// Query over the reset procedure store
pub type ResetQuery = LookupQuery;

impl LookupQuery {
    /// Query matching every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text part
    pub fn text(mut self, text: &str) -> Self {
        self.needle = text.trim().to_lowercase();
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.service = Some(service);
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Normalized search text
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Parse raw parameters.
    ///
    /// Blank `service` or `brand` means no filter. An unrecognised service
    /// or a zero limit is rejected.
    pub fn parse(params: &QueryParams) -> CatalogResult<Self> {
        let service = match non_blank(params.service.as_deref()) {
            Some(s) => Some(s.parse::<Service>().map_err(CatalogError::Validation)?),
            None => None,
        };

        if params.limit == Some(0) {
            return Err(CatalogError::Validation(
                "limit must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            needle: params
                .query
                .as_deref()
                .map(|q| q.trim().to_lowercase())
                .unwrap_or_default(),
            service,
            brand: non_blank(params.brand.as_deref()).map(str::to_string),
            limit: params.limit,
        })
    }

    /// Whether a single record satisfies this query
    pub fn matches<T: Searchable + ?Sized>(&self, record: &T) -> bool {
        if let Some(service) = self.service {
            if record.service() != service {
                return false;
            }
        }
        if let Some(ref brand) = self.brand {
            if record.brand() != brand {
                return false;
            }
        }
        self.needle.is_empty()
            || record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Filter `records` by `query`, preserving order and applying the limit
pub fn filter<'a, T: Searchable>(records: &'a [T], query: &LookupQuery) -> Vec<&'a T> {
    let matching = records.iter().filter(|r| query.matches(*r));
    match query.limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<FaultCodeEntry> {
        vec![
            FaultCodeEntry::new(
                "E-102",
                Service::Generator,
                "Cummins",
                "PowerCommand 3.3",
                "Low oil pressure",
                Severity::Critical,
            ),
            FaultCodeEntry::new(
                "E-205",
                Service::Generator,
                "Cummins",
                "PowerCommand 3.3",
                "High coolant temperature",
                Severity::Critical,
            ),
            FaultCodeEntry::new(
                "INV-07",
                Service::Solar,
                "Growatt",
                "SPF 5000",
                "Battery voltage low",
                Severity::Moderate,
            ),
            FaultCodeEntry::new(
                "1045",
                Service::Generator,
                "DeepSea Electronics",
                "DSE 7320",
                "Oil pressure sender open circuit",
                Severity::Low,
            ),
        ]
    }

    fn codes(results: &[&FaultCodeEntry]) -> Vec<String> {
        results.iter().map(|e| e.code.clone()).collect()
    }

    #[test]
    fn test_text_and_service() {
        let data = sample();
        let q = LookupQuery::new().text("oil").with_service(Service::Generator);
        assert_eq!(codes(&filter(&data, &q)), vec!["E-102", "1045"]);

        let q = LookupQuery::new().text("oil").with_service(Service::Solar);
        assert!(filter(&data, &q).is_empty());
    }

    #[test]
    fn test_brand_only_returns_all_brand_entries() {
        let data = sample();
        let q = LookupQuery::new().with_brand("Cummins");
        assert_eq!(codes(&filter(&data, &q)), vec!["E-102", "E-205"]);
    }

    #[test]
    fn test_brand_is_exact_match() {
        let data = sample();
        assert!(filter(&data, &LookupQuery::new().with_brand("cummins")).is_empty());
        assert!(filter(&data, &LookupQuery::new().with_brand("Cumm")).is_empty());
    }

    #[test]
    fn test_text_is_case_insensitive_over_all_fields() {
        let data = sample();
        // code
        assert_eq!(codes(&filter(&data, &LookupQuery::new().text("inv-0"))), vec!["INV-07"]);
        // model
        assert_eq!(codes(&filter(&data, &LookupQuery::new().text("dse 73"))), vec!["1045"]);
        // brand
        assert_eq!(codes(&filter(&data, &LookupQuery::new().text("GROWATT"))), vec!["INV-07"]);
    }

    #[test]
    fn test_empty_query_matches_everything_in_order() {
        let data = sample();
        let all = filter(&data, &LookupQuery::new().text("   "));
        assert_eq!(codes(&all), vec!["E-102", "E-205", "INV-07", "1045"]);
    }

    #[test]
    fn test_limit_truncates_after_filtering() {
        let data = sample();
        let q = LookupQuery::new().with_service(Service::Generator).with_limit(2);
        assert_eq!(codes(&filter(&data, &q)), vec!["E-102", "E-205"]);
    }

    #[test]
    fn test_results_contain_needle() {
        let data = sample();
        for text in ["o", "pressure", "e-", "33", "zzz"] {
            let q = LookupQuery::new().text(text);
            for hit in filter(&data, &q) {
                assert!(hit
                    .search_fields()
                    .iter()
                    .any(|f| f.to_lowercase().contains(q.needle())));
            }
        }
    }

    #[test]
    fn test_parse_params() {
        let params = QueryParams {
            query: Some("  Oil ".to_string()),
            service: Some("Generators".to_string()),
            brand: Some("  ".to_string()),
            limit: Some(5),
        };
        let q = LookupQuery::parse(&params).unwrap();
        assert_eq!(q.needle(), "oil");
        assert_eq!(q.service, Some(Service::Generator));
        assert_eq!(q.brand, None);
        assert_eq!(q.limit, Some(5));
    }

    #[test]
    fn test_parse_rejects_unknown_service() {
        let params = QueryParams {
            service: Some("hydro".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            LookupQuery::parse(&params),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_zero_limit() {
        let params = QueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            LookupQuery::parse(&params),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_blank_service_is_no_filter() {
        let params = QueryParams {
            service: Some("".to_string()),
            ..Default::default()
        };
        assert_eq!(LookupQuery::parse(&params).unwrap(), LookupQuery::new());
    }
}

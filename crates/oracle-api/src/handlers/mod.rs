//! HTTP request handlers for the Oracle API

pub mod catalog;
pub mod faults;
pub mod resets;
pub mod services;

use serde::Serialize;

/// List response shared by the search endpoints.
///
/// `total_count` counts every match, `results` may be cut short by the limit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T> {
    pub results: Vec<T>,
    pub total_count: usize,
}

impl<T: Clone> SearchResponse<T> {
    pub fn truncated(matches: Vec<&T>, limit: usize) -> Self {
        Self {
            total_count: matches.len(),
            results: matches.into_iter().take(limit).cloned().collect(),
        }
    }

    pub fn all(matches: Vec<&T>) -> Self {
        Self {
            total_count: matches.len(),
            results: matches.into_iter().cloned().collect(),
        }
    }
}

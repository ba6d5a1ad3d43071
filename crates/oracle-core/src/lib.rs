//! oracle-core - Core types for the Generator Oracle fault-code catalog
//!
//! This crate holds the record types shared by the data loader and the HTTP
//! layer (fault codes, reset procedures, service descriptors) together with
//! the lookup engine that filters them.
//!
//! The lookup engine is a pure function over a slice of records. It never
//! reorders: results come back in the order the records were authored.

pub mod error;
pub mod lookup;
pub mod models;

pub use error::{CatalogError, CatalogResult};
pub use lookup::{filter, FaultQuery, LookupQuery, QueryParams, ResetQuery, Searchable};
pub use models::*;

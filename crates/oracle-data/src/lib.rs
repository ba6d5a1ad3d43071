//! oracle-data - Fault-code and reset-procedure catalog loader
//!
//! Reads catalog documents from YAML or JSON, validates every record and
//! builds two immutable, indexed stores.
//!
//! # Quick Start
//!
//! ```rust
//! use oracle_data::Catalog;
//! use oracle_core::{LookupQuery, Service};
//!
//! let catalog = Catalog::builtin().unwrap();
//!
//! let hits = catalog.faults().search(
//!     &LookupQuery::new()
//!         .text("oil")
//!         .with_service(Service::Generator)
//!         .with_brand("Cummins"),
//! );
//! assert_eq!(hits[0].code, "E-102");
//!
//! let reset = catalog
//!     .resets()
//!     .find("DeepSea Electronics", "All Models", "Warning Alarms")
//!     .unwrap();
//! assert_eq!(reset.id, "dse-standard-keypad-reset");
//! ```
//!
//! # Catalog Files
//!
//! ```yaml
//! meta:
//!   name: Site catalog
//!   version: "1.0"
//!
//! faultCodes:
//!   - code: 1045                # read as the string "1045"
//!     service: generator
//!     brand: DeepSea Electronics
//!     model: DSE 7320
//!     issue: Oil pressure sender open circuit
//!     severity: moderate
//!
//! resetProcedures:
//!   - id: dse-standard-keypad-reset
//!     brand: DeepSea Electronics
//!     model: All Models         # applies to every model of the brand
//!     alarmCategory: Warning Alarms
//!     method: keypad
//!     difficulty: easy
//!     steps:
//!       - step: 1
//!         instruction: Press and hold RESET
//!         timing: 3 seconds
//!         expectedResult: Alarm LED stops flashing
//! ```
//!
//! Any invalid record (missing field, unknown enumeration value, duplicate
//! key, misnumbered steps) fails the whole load with an error naming it.

pub mod catalog;
pub mod record;
pub mod store;

pub use catalog::{Catalog, CatalogSource, SharedCatalog, BUILTIN_CATALOG};
pub use record::{CatalogDocument, CatalogMeta, Labeled};
pub use store::{FaultStore, ResetStore};

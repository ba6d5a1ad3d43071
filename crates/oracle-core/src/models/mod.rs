//! Shared data models for the fault-code catalog

mod fault;
mod reset;
mod service;

pub use fault::*;
pub use reset::*;
pub use service::*;

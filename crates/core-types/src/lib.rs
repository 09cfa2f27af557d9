//! # Pulse Core Types
//!
//! The shared vocabulary of the workspace: marketplace identifiers, the daily
//! visit and sale records, and the validated per-marketplace datasets built
//! from them. Every other crate depends on this one and nothing here knows
//! about generation, metrics, or HTTP.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::ConversionBasis;
pub use error::CoreError;
pub use structs::{MarketData, MarketplaceDataset, MarketplaceId, SaleRecord, VisitRecord};

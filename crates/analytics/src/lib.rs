//! # Pulse Analytics Engine
//!
//! Computes the traffic KPIs shown on the dashboard: average time on page,
//! bounce rate, and the bounce-adjusted conversion rate.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of generation, forecasting, or HTTP.
//!   It depends only on `core-types`.
//! - **Stateless Calculation:** The `MetricsEngine` only carries the conversion basis.
//!   It takes records as input and produces plain numbers or a `KpiReport`, and every
//!   function is total: empty input yields zero instead of an error.
//!
//! ## Public API
//!
//! - `MetricsEngine`: The struct that contains the calculation logic.
//! - `KpiReport`: The per-marketplace bundle of KPIs and totals.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::MetricsEngine;
pub use report::KpiReport;

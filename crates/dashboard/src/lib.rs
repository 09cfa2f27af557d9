//! # Pulse Dashboard
//!
//! The presentation side of the workspace. `DashboardContext` holds the data
//! generated at startup and the forecast trained on it; for a selected
//! marketplace it produces a `DashboardView` of chart series, KPI strings, and
//! marketplace rankings. Nothing in this crate renders anything.

pub mod context;
pub mod error;
pub mod ranking;
pub mod view;

pub use context::{DashboardContext, MarketplaceSummary};
pub use error::DashboardError;
pub use ranking::{RankEntry, Ranking};
pub use view::{Chart, DashboardView, KpiPanel, Series, SeriesMode, XValue};

use core_types::ConversionBasis;
use serde::Serialize;

/// The KPIs of a single marketplace over its trailing window.
///
/// This struct is the output of `MetricsEngine::calculate` and is what the
/// dashboard and the `report` command display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiReport {
    // I. Engagement
    pub average_time_on_page_minutes: f64,
    pub bounce_rate_pct: f64,

    // II. Sales
    pub conversion_rate_pct: f64,
    pub conversion_basis: ConversionBasis,

    // III. Totals
    pub days: usize,
    pub total_visits: u64,
    pub total_units_sold: u64,
}

impl KpiReport {
    /// Creates a zeroed-out report, which is also the report of an empty dataset.
    pub fn new(conversion_basis: ConversionBasis) -> Self {
        Self {
            average_time_on_page_minutes: 0.0,
            bounce_rate_pct: 0.0,
            conversion_rate_pct: 0.0,
            conversion_basis,
            days: 0,
            total_visits: 0,
            total_units_sold: 0,
        }
    }
}

impl Default for KpiReport {
    fn default() -> Self {
        Self::new(ConversionBasis::default())
    }
}

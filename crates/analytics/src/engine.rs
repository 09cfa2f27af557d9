use crate::report::KpiReport;
use core_types::{ConversionBasis, MarketplaceDataset, SaleRecord, VisitRecord};

/// A stateless calculator for deriving traffic KPIs from daily records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    conversion_basis: ConversionBasis,
}

impl MetricsEngine {
    pub fn new(conversion_basis: ConversionBasis) -> Self {
        Self { conversion_basis }
    }

    pub fn conversion_basis(&self) -> ConversionBasis {
        self.conversion_basis
    }

    /// The main entry point for calculating the KPIs of one marketplace.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The marketplace's aligned visit and sale records.
    ///
    /// # Returns
    ///
    /// A `KpiReport`; an empty dataset produces the zeroed report.
    pub fn calculate(&self, dataset: &MarketplaceDataset) -> KpiReport {
        let mut report = KpiReport::new(self.conversion_basis);

        if dataset.is_empty() {
            return report;
        }

        let bounce_rate = self.bounce_rate(dataset.visits());
        report.average_time_on_page_minutes = self.average_time_on_page(dataset.visits());
        report.bounce_rate_pct = bounce_rate;
        report.conversion_rate_pct =
            self.conversion_rate(dataset.sales(), dataset.visits(), bounce_rate);
        report.days = dataset.len();
        report.total_visits = dataset.total_visits();
        report.total_units_sold = dataset.total_units_sold();

        tracing::debug!(
            days = report.days,
            bounce_rate = report.bounce_rate_pct,
            conversion_rate = report.conversion_rate_pct,
            "KPIs calculated."
        );

        report
    }

    /// Mean of the per-day average time on page, in minutes. Zero for no records.
    pub fn average_time_on_page(&self, visits: &[VisitRecord]) -> f64 {
        if visits.is_empty() {
            return 0.0;
        }
        let total: f64 = visits.iter().map(VisitRecord::avg_time_on_page_minutes).sum();
        total / visits.len() as f64
    }

    /// Percentage of records that are single-page sessions. Zero for no records.
    pub fn bounce_rate(&self, visits: &[VisitRecord]) -> f64 {
        if visits.is_empty() {
            return 0.0;
        }
        let bounces = visits.iter().filter(|v| v.is_bounce()).count();
        (bounces as f64 / visits.len() as f64) * 100.0
    }

    /// Units sold as a percentage of the configured basis, minus `bounce_rate`,
    /// clamped to `[0, 100]`. Zero when there are no visit records.
    ///
    /// The raw rate is not bounded before the bounce rate is subtracted; only
    /// the final value is clamped.
    pub fn conversion_rate(
        &self,
        sales: &[SaleRecord],
        visits: &[VisitRecord],
        bounce_rate: f64,
    ) -> f64 {
        if visits.is_empty() {
            return 0.0;
        }

        let denominator = match self.conversion_basis {
            ConversionBasis::RecordCount => visits.len() as f64,
            ConversionBasis::VisitTotal => {
                visits.iter().map(|v| f64::from(v.visits())).sum::<f64>()
            }
        };
        if denominator <= 0.0 {
            return 0.0;
        }

        let total_units: f64 = sales.iter().map(|s| f64::from(s.units_sold())).sum();
        let raw_rate = (total_units / denominator) * 100.0;

        // max/min rather than clamp so a NaN bounce rate still lands in range.
        (raw_rate - bounce_rate).max(0.0).min(100.0)
    }
}

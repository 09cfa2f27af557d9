use analytics::{KpiReport, MetricsEngine};
use chrono::NaiveDate;
use configuration::Settings;
use core_types::{MarketData, MarketplaceId};
use forecaster::TrainingSummary;
use generator::DataGenerator;
use serde::Serialize;

use crate::error::DashboardError;
use crate::ranking::{sales_ranking, visits_ranking};
use crate::view::{self, DashboardView, KpiPanel};

/// KPIs of one marketplace, as listed by the summary endpoint and the `report` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceSummary {
    pub marketplace: MarketplaceId,
    pub kpis: KpiReport,
}

/// The generated data and trained model, built once and read-only afterwards.
///
/// Handlers receive this explicitly; nothing here is global.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    data: MarketData,
    metrics: MetricsEngine,
    training: TrainingSummary,
    generated_on: NaiveDate,
}

impl DashboardContext {
    /// Generates the trailing window ending at `today` and trains the forecast on it.
    pub fn bootstrap(settings: &Settings, today: NaiveDate) -> Result<Self, DashboardError> {
        configuration::validate(settings)?;

        let marketplaces: Vec<MarketplaceId> = settings
            .data
            .marketplaces
            .iter()
            .map(|name| MarketplaceId::new(name.as_str()))
            .collect();

        let mut generator = DataGenerator::from_seed(settings.generator.clone(), settings.data.seed);
        let data = generator.generate(&marketplaces, settings.data.days, today)?;

        let training = forecaster::train_with_holdout(
            &data.pooled_samples(),
            settings.forecast.test_size,
            settings.forecast.split_seed,
        )?;

        tracing::info!(
            marketplaces = data.len(),
            days = settings.data.days,
            conversion_basis = settings.metrics.conversion_basis.as_str(),
            "Dashboard context ready."
        );

        Ok(Self::from_parts(
            data,
            MetricsEngine::new(settings.metrics.conversion_basis),
            training,
            today,
        ))
    }

    /// Assembles a context from already-built pieces.
    pub fn from_parts(
        data: MarketData,
        metrics: MetricsEngine,
        training: TrainingSummary,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            data,
            metrics,
            training,
            generated_on,
        }
    }

    pub fn data(&self) -> &MarketData {
        &self.data
    }

    pub fn training(&self) -> &TrainingSummary {
        &self.training
    }

    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    /// The selector's options, in set order. The first one is the default selection.
    pub fn marketplaces(&self) -> Vec<MarketplaceId> {
        self.data.marketplaces().cloned().collect()
    }

    /// Builds everything the page shows for `marketplace`.
    pub fn view(&self, marketplace: &str) -> Result<DashboardView, DashboardError> {
        let dataset = self.data.dataset(marketplace)?;
        let id = MarketplaceId::new(marketplace);

        let kpis = KpiPanel::new(self.metrics.calculate(dataset));
        tracing::debug!(marketplace = %id, "Building dashboard view.");

        Ok(DashboardView {
            generated_on: self.generated_on,
            kpis,
            sales_ranking: sales_ranking(&self.data),
            visits_ranking: visits_ranking(&self.data),
            visits_per_day: view::visits_per_day(&id, dataset),
            sales_per_day: view::sales_per_day(&id, dataset),
            overall_sales: view::overall_sales(&self.data),
            sales_forecast: view::sales_forecast(&id, dataset, &self.training.model),
            total_visits: view::total_visits(&self.data),
            marketplace: id,
        })
    }

    /// KPIs for every marketplace, in set order.
    pub fn summaries(&self) -> Vec<MarketplaceSummary> {
        self.data
            .iter()
            .map(|(id, dataset)| MarketplaceSummary {
                marketplace: id.clone(),
                kpis: self.metrics.calculate(dataset),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{SeriesMode, XValue};
    use core_types::{ConversionBasis, CoreError};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn seeded_settings(seed: u64) -> Settings {
        let mut settings = Settings::default();
        settings.data.seed = Some(seed);
        settings
    }

    fn context() -> DashboardContext {
        DashboardContext::bootstrap(&seeded_settings(42), today()).unwrap()
    }

    #[test]
    fn test_bootstrap_generates_and_trains() {
        let ctx = context();

        assert_eq!(ctx.data().len(), 3);
        assert_eq!(ctx.generated_on(), today());
        assert_eq!(ctx.training().train_samples + ctx.training().test_samples, 90);
        assert_eq!(ctx.training().test_samples, 18);
        assert!(ctx.training().holdout_mse.is_some());
        assert_eq!(
            ctx.marketplaces(),
            vec![
                MarketplaceId::from("Magazine Luiza"),
                MarketplaceId::from("Casas Bahia"),
                MarketplaceId::from("Americanas"),
            ]
        );
    }

    #[test]
    fn test_bootstrap_is_reproducible_with_seed() {
        let first = DashboardContext::bootstrap(&seeded_settings(9), today()).unwrap();
        let second = DashboardContext::bootstrap(&seeded_settings(9), today()).unwrap();

        assert_eq!(first.data(), second.data());
        assert_eq!(first.training(), second.training());
        assert_eq!(first.view("Americanas").unwrap(), second.view("Americanas").unwrap());
    }

    #[test]
    fn test_bootstrap_rejects_invalid_settings() {
        let mut settings = seeded_settings(1);
        settings.data.marketplaces.clear();
        assert!(matches!(
            DashboardContext::bootstrap(&settings, today()),
            Err(DashboardError::Config(_))
        ));
    }

    #[test]
    fn test_bootstrap_rejects_oversized_window() {
        let mut settings = seeded_settings(1);
        settings.data.days = u32::MAX;
        assert!(matches!(
            DashboardContext::bootstrap(&settings, today()),
            Err(DashboardError::Config(_))
        ));
    }

    #[test]
    fn test_view_shapes() {
        let ctx = context();
        let view = ctx.view("Casas Bahia").unwrap();

        assert_eq!(view.marketplace.as_str(), "Casas Bahia");
        assert_eq!(view.visits_per_day.series.len(), 1);
        assert_eq!(view.visits_per_day.series[0].x.len(), 30);
        assert_eq!(view.visits_per_day.series[0].x[0], XValue::Date(today()));
        assert_eq!(view.sales_per_day.series[0].y.len(), 30);

        assert_eq!(view.overall_sales.series.len(), 3);
        assert_eq!(view.overall_sales.series[0].x[0], XValue::Index(1));
        assert_eq!(view.overall_sales.series[0].x[29], XValue::Index(30));

        let forecast = &view.sales_forecast;
        assert_eq!(forecast.series.len(), 2);
        assert_eq!(forecast.series[0].y.len(), forecast.series[1].y.len());
        assert_eq!(forecast.series[1].mode, SeriesMode::Lines);

        assert_eq!(view.total_visits.series[0].mode, SeriesMode::Bar);
        assert_eq!(view.total_visits.series[0].x.len(), 3);

        assert_eq!(view.sales_ranking.entries.len(), 3);
        assert_eq!(view.visits_ranking.lines.len(), 3);
        assert!(view.kpis.bounce_rate.starts_with("Bounce Rate: "));
    }

    #[test]
    fn test_forecast_series_follows_model() {
        let ctx = context();
        let view = ctx.view("Magazine Luiza").unwrap();
        let dataset = ctx.data().dataset("Magazine Luiza").unwrap();
        let model = ctx.training().model;

        for (visit, predicted) in dataset.visits().iter().zip(&view.sales_forecast.series[1].y) {
            assert_eq!(*predicted, model.predict_one(f64::from(visit.visits())));
        }
    }

    #[test]
    fn test_rankings_agree_with_totals() {
        let ctx = context();
        let view = ctx.view("Americanas").unwrap();

        let totals: Vec<u64> = view.sales_ranking.entries.iter().map(|e| e.total).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
        for entry in &view.visits_ranking.entries {
            let dataset = ctx.data().dataset(entry.marketplace.as_str()).unwrap();
            assert_eq!(entry.total, dataset.total_visits());
        }
    }

    #[test]
    fn test_unknown_marketplace_is_rejected() {
        let ctx = context();
        assert!(matches!(
            ctx.view("Mercado Livre"),
            Err(DashboardError::Core(CoreError::UnknownMarketplace(name))) if name == "Mercado Livre"
        ));
    }

    #[test]
    fn test_summaries_follow_conversion_basis() {
        let mut settings = seeded_settings(5);
        settings.metrics.conversion_basis = ConversionBasis::VisitTotal;
        let ctx = DashboardContext::bootstrap(&settings, today()).unwrap();

        let summaries = ctx.summaries();
        assert_eq!(summaries.len(), 3);
        for summary in &summaries {
            assert_eq!(summary.kpis.conversion_basis, ConversionBasis::VisitTotal);
            assert!((0.0..=100.0).contains(&summary.kpis.conversion_rate_pct));
            assert_eq!(summary.kpis.days, 30);
        }
    }
}

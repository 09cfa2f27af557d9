//! Dashboard view types.
//!
//! These are the chart, KPI, and ranking structures handed to the rendering
//! surface. They carry data only; how they are drawn is up to the page.

use analytics::KpiReport;
use chrono::NaiveDate;
use core_types::{MarketData, MarketplaceDataset, MarketplaceId};
use forecaster::TrainedModel;
use serde::Serialize;

use crate::ranking::Ranking;

/// Everything the page shows for one selected marketplace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// The selected marketplace.
    pub marketplace: MarketplaceId,
    /// Last day of the generated window.
    pub generated_on: NaiveDate,
    /// KPI panel for the selected marketplace.
    pub kpis: KpiPanel,
    /// All marketplaces ranked by units sold.
    pub sales_ranking: Ranking,
    /// All marketplaces ranked by visits.
    pub visits_ranking: Ranking,
    /// Daily visits of the selected marketplace.
    pub visits_per_day: Chart,
    /// Daily units sold of the selected marketplace.
    pub sales_per_day: Chart,
    /// Daily units sold of every marketplace, by day index.
    pub overall_sales: Chart,
    /// Historical vs predicted units sold for the selected marketplace.
    pub sales_forecast: Chart,
    /// Total visits per marketplace.
    pub total_visits: Chart,
}

/// A titled chart with one or more series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub mode: SeriesMode,
    pub x: Vec<XValue>,
    pub y: Vec<f64>,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    Lines,
    LinesMarkers,
    Bar,
}

/// An x-axis value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Date(NaiveDate),
    Index(usize),
    Label(String),
}

/// The three KPI values, raw and formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiPanel {
    pub report: KpiReport,
    pub average_time_on_page: String,
    pub conversion_rate: String,
    pub bounce_rate: String,
}

impl KpiPanel {
    pub fn new(report: KpiReport) -> Self {
        Self {
            average_time_on_page: format!(
                "Average Time on Page: {:.2} minutes",
                report.average_time_on_page_minutes
            ),
            conversion_rate: format!("Conversion Rate: {:.2}%", report.conversion_rate_pct),
            bounce_rate: format!("Bounce Rate: {:.2}%", report.bounce_rate_pct),
            report,
        }
    }
}

fn dates(dataset: &MarketplaceDataset) -> Vec<XValue> {
    dataset.dates().map(XValue::Date).collect()
}

pub(crate) fn visits_per_day(id: &MarketplaceId, dataset: &MarketplaceDataset) -> Chart {
    Chart {
        title: format!("Total Visits per Day - {}", id),
        x_axis: "Date".to_string(),
        y_axis: "Visits".to_string(),
        series: vec![Series {
            name: format!("Visits - {}", id),
            mode: SeriesMode::LinesMarkers,
            x: dates(dataset),
            y: dataset.visits().iter().map(|v| f64::from(v.visits())).collect(),
        }],
    }
}

pub(crate) fn sales_per_day(id: &MarketplaceId, dataset: &MarketplaceDataset) -> Chart {
    Chart {
        title: format!("Total Sales per Day - {}", id),
        x_axis: "Date".to_string(),
        y_axis: "Sales".to_string(),
        series: vec![Series {
            name: format!("Sales - {}", id),
            mode: SeriesMode::LinesMarkers,
            x: dates(dataset),
            y: units_sold(dataset),
        }],
    }
}

pub(crate) fn overall_sales(data: &MarketData) -> Chart {
    let series = data
        .iter()
        .map(|(id, dataset)| Series {
            name: format!("Sales - {}", id),
            mode: SeriesMode::Lines,
            x: (1..=dataset.len()).map(XValue::Index).collect(),
            y: units_sold(dataset),
        })
        .collect();

    Chart {
        title: "Total Sales per Day - Overall".to_string(),
        x_axis: "Day".to_string(),
        y_axis: "Units".to_string(),
        series,
    }
}

pub(crate) fn sales_forecast(
    id: &MarketplaceId,
    dataset: &MarketplaceDataset,
    model: &TrainedModel,
) -> Chart {
    let visits: Vec<u32> = dataset.visits().iter().map(|v| v.visits()).collect();

    Chart {
        title: format!("Sales Forecast - {}", id),
        x_axis: "Date".to_string(),
        y_axis: "Sales".to_string(),
        series: vec![
            Series {
                name: "Historical Sales".to_string(),
                mode: SeriesMode::LinesMarkers,
                x: dates(dataset),
                y: units_sold(dataset),
            },
            Series {
                name: "Sales Forecast".to_string(),
                mode: SeriesMode::Lines,
                x: dates(dataset),
                y: forecaster::predict(model, &visits),
            },
        ],
    }
}

pub(crate) fn total_visits(data: &MarketData) -> Chart {
    let (x, y): (Vec<XValue>, Vec<f64>) = data
        .iter()
        .map(|(id, dataset)| (XValue::Label(id.to_string()), dataset.total_visits() as f64))
        .unzip();

    Chart {
        title: "Overall Total Visits".to_string(),
        x_axis: "Marketplace".to_string(),
        y_axis: "Total Visits".to_string(),
        series: vec![Series {
            name: "Total Visits".to_string(),
            mode: SeriesMode::Bar,
            x,
            y,
        }],
    }
}

fn units_sold(dataset: &MarketplaceDataset) -> Vec<f64> {
    dataset.sales().iter().map(|s| f64::from(s.units_sold())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kpi_panel_formats_two_decimals() {
        let report = KpiReport {
            average_time_on_page_minutes: 5.0,
            bounce_rate_pct: 100.0,
            conversion_rate_pct: 0.0,
            ..KpiReport::default()
        };
        let panel = KpiPanel::new(report);

        assert_eq!(panel.average_time_on_page, "Average Time on Page: 5.00 minutes");
        assert_eq!(panel.conversion_rate, "Conversion Rate: 0.00%");
        assert_eq!(panel.bounce_rate, "Bounce Rate: 100.00%");
    }

    #[test]
    fn test_x_values_serialize_untagged() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let json = serde_json::to_string(&vec![
            XValue::Date(date),
            XValue::Index(3),
            XValue::Label("Americanas".to_string()),
        ])
        .unwrap();
        assert_eq!(json, r#"["2024-02-29",3,"Americanas"]"#);
    }

    #[test]
    fn test_series_mode_serializes_snake_case() {
        let json = serde_json::to_string(&SeriesMode::LinesMarkers).unwrap();
        assert_eq!(json, r#""lines_markers""#);
    }
}

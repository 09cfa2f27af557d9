use crate::{error::AppError, AppState};
use axum::{
    extract::{Path, State},
    http::Uri,
    response::Html,
    Json,
};
use chrono::NaiveDate;
use core_types::MarketplaceId;
use dashboard::{DashboardView, MarketplaceSummary};
use forecaster::TrainingSummary;
use serde::Serialize;
use std::sync::Arc;

/// The selector's options.
#[derive(Debug, Serialize)]
pub struct MarketplaceList {
    pub marketplaces: Vec<MarketplaceId>,
    /// The initially selected marketplace (the first of the set).
    pub default: Option<MarketplaceId>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub generated_on: NaiveDate,
    pub training: TrainingSummary,
    pub marketplaces: Vec<MarketplaceSummary>,
}

/// # GET /
/// The single dashboard page. It renders itself from the JSON endpoints below.
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// # GET /api/marketplaces
pub async fn list_marketplaces(State(state): State<Arc<AppState>>) -> Json<MarketplaceList> {
    let marketplaces = state.context.marketplaces();
    let default = marketplaces.first().cloned();
    Json(MarketplaceList {
        marketplaces,
        default,
    })
}

/// # GET /api/marketplaces/:marketplace/dashboard
/// Charts, KPIs and rankings for the selected marketplace.
pub async fn get_dashboard(
    Path(marketplace): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardView>, AppError> {
    let view = state.context.view(&marketplace)?;
    Ok(Json(view))
}

/// # GET /api/summary
/// KPIs of every marketplace plus the forecast's training outcome.
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        generated_on: state.context.generated_on(),
        training: *state.context.training(),
        marketplaces: state.context.summaries(),
    })
}

pub async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

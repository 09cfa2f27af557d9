use core_types::{MarketData, MarketplaceDataset, MarketplaceId};
use serde::Serialize;

/// One line of a marketplace ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    /// 1-based position.
    pub position: usize,
    pub marketplace: MarketplaceId,
    pub total: u64,
}

impl RankEntry {
    /// Display form, e.g. `"1. Casas Bahia"`.
    pub fn label(&self) -> String {
        format!("{}. {}", self.position, self.marketplace)
    }
}

/// Marketplaces ordered by a total, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub title: String,
    pub entries: Vec<RankEntry>,
    /// Pre-formatted entry labels, in rank order.
    pub lines: Vec<String>,
}

impl Ranking {
    pub fn new(title: impl Into<String>, totals: impl IntoIterator<Item = (MarketplaceId, u64)>) -> Self {
        let entries = rank(totals);
        let lines = entries.iter().map(RankEntry::label).collect();
        Self {
            title: title.into(),
            entries,
            lines,
        }
    }

    /// Marketplace ids in rank order.
    pub fn order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.marketplace.as_str()).collect()
    }
}

/// Sorts `(marketplace, total)` pairs by total, descending.
///
/// The sort is stable, so equal totals keep the order they were given in.
pub fn rank(totals: impl IntoIterator<Item = (MarketplaceId, u64)>) -> Vec<RankEntry> {
    let mut totals: Vec<(MarketplaceId, u64)> = totals.into_iter().collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    totals
        .into_iter()
        .enumerate()
        .map(|(i, (marketplace, total))| RankEntry {
            position: i + 1,
            marketplace,
            total,
        })
        .collect()
}

pub fn sales_ranking(data: &MarketData) -> Ranking {
    Ranking::new("Sales Ranking", totals_by(data, MarketplaceDataset::total_units_sold))
}

pub fn visits_ranking(data: &MarketData) -> Ranking {
    Ranking::new("Visits Ranking", totals_by(data, MarketplaceDataset::total_visits))
}

fn totals_by<F>(data: &MarketData, total: F) -> Vec<(MarketplaceId, u64)>
where
    F: Fn(&MarketplaceDataset) -> u64,
{
    data.iter()
        .map(|(id, dataset)| (id.clone(), total(dataset)))
        .collect()
}

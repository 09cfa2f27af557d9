use crate::error::CoreError;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Identifies one marketplace of the fixed set chosen at startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MarketplaceId(String);

impl MarketplaceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketplaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarketplaceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MarketplaceId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Traffic observed on a marketplace for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitRecord {
    date: NaiveDate,
    visits: u32,
    avg_time_on_page_minutes: f64,
    pages_viewed: u32,
}

impl VisitRecord {
    /// Builds a record, rejecting a non-positive time on page or zero pages viewed.
    pub fn new(
        date: NaiveDate,
        visits: u32,
        avg_time_on_page_minutes: f64,
        pages_viewed: u32,
    ) -> Result<Self, CoreError> {
        if !avg_time_on_page_minutes.is_finite() || avg_time_on_page_minutes <= 0.0 {
            return Err(CoreError::InvalidInput(
                "avg_time_on_page_minutes".to_string(),
                format!("must be a positive number, got {}", avg_time_on_page_minutes),
            ));
        }
        if pages_viewed == 0 {
            return Err(CoreError::InvalidInput(
                "pages_viewed".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            date,
            visits,
            avg_time_on_page_minutes,
            pages_viewed,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn avg_time_on_page_minutes(&self) -> f64 {
        self.avg_time_on_page_minutes
    }

    pub fn pages_viewed(&self) -> u32 {
        self.pages_viewed
    }

    /// A single-page session counts towards the bounce rate.
    pub fn is_bounce(&self) -> bool {
        self.pages_viewed == 1
    }
}

/// Units sold on a marketplace for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    date: NaiveDate,
    units_sold: u32,
}

impl SaleRecord {
    pub fn new(date: NaiveDate, units_sold: u32) -> Self {
        Self { date, units_sold }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn units_sold(&self) -> u32 {
        self.units_sold
    }
}

/// The trailing window of daily records for a single marketplace.
///
/// Both sequences are ordered most recent first, have the same length, and
/// carry the same date at every position. Consecutive entries are exactly one
/// calendar day apart.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketplaceDataset {
    visits: Vec<VisitRecord>,
    sales: Vec<SaleRecord>,
}

impl MarketplaceDataset {
    pub fn new(visits: Vec<VisitRecord>, sales: Vec<SaleRecord>) -> Result<Self, CoreError> {
        if visits.len() != sales.len() {
            return Err(CoreError::LengthMismatch {
                visits: visits.len(),
                sales: sales.len(),
            });
        }

        for (index, (visit, sale)) in visits.iter().zip(&sales).enumerate() {
            if visit.date() != sale.date() {
                return Err(CoreError::DateMismatch {
                    index,
                    visit_date: visit.date(),
                    sale_date: sale.date(),
                });
            }
        }

        for (index, pair) in visits.windows(2).enumerate() {
            let (previous, current) = (pair[0].date(), pair[1].date());
            if previous.checked_sub_days(Days::new(1)) != Some(current) {
                return Err(CoreError::NonConsecutiveDates {
                    index: index + 1,
                    previous,
                    current,
                });
            }
        }

        Ok(Self { visits, sales })
    }

    /// A dataset with no records; every metric over it is zero.
    pub fn empty() -> Self {
        Self {
            visits: Vec::new(),
            sales: Vec::new(),
        }
    }

    pub fn visits(&self) -> &[VisitRecord] {
        &self.visits
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.visits.iter().map(VisitRecord::date)
    }

    pub fn total_visits(&self) -> u64 {
        self.visits.iter().map(|v| u64::from(v.visits())).sum()
    }

    pub fn total_units_sold(&self) -> u64 {
        self.sales.iter().map(|s| u64::from(s.units_sold())).sum()
    }

    /// Date-aligned `(visits, units_sold)` pairs, in record order.
    pub fn visit_sale_pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.visits
            .iter()
            .zip(&self.sales)
            .map(|(v, s)| (v.visits(), s.units_sold()))
    }
}

/// Datasets for every marketplace, kept in the order the marketplace set was given.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketData {
    entries: Vec<(MarketplaceId, MarketplaceDataset)>,
}

impl MarketData {
    pub fn new(entries: Vec<(MarketplaceId, MarketplaceDataset)>) -> Result<Self, CoreError> {
        for (i, (id, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(seen, _)| seen == id) {
                return Err(CoreError::DuplicateMarketplace(id.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn get(&self, id: &str) -> Option<&MarketplaceDataset> {
        self.entries
            .iter()
            .find(|(known, _)| known.as_str() == id)
            .map(|(_, dataset)| dataset)
    }

    /// Looks up a marketplace, failing with `UnknownMarketplace` when it is not in the set.
    pub fn dataset(&self, id: &str) -> Result<&MarketplaceDataset, CoreError> {
        self.get(id)
            .ok_or_else(|| CoreError::UnknownMarketplace(id.to_string()))
    }

    pub fn marketplaces(&self) -> impl Iterator<Item = &MarketplaceId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MarketplaceId, &MarketplaceDataset)> {
        self.entries.iter().map(|(id, dataset)| (id, dataset))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `(visits, units_sold)` pair across all marketplaces, marketplace by marketplace.
    pub fn pooled_samples(&self) -> Vec<(u32, u32)> {
        self.entries
            .iter()
            .flat_map(|(_, dataset)| dataset.visit_sale_pairs())
            .collect()
    }
}

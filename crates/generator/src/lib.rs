//! # Pulse Data Generator
//!
//! Synthesizes the fictitious traffic and sales history the dashboard runs on.
//! The generator owns an injected random source, so production runs draw from
//! OS entropy while tests (or a configured seed) get the same data every time.

use chrono::{Days, NaiveDate};
use configuration::GeneratorSettings;
use core_types::{MarketData, MarketplaceDataset, MarketplaceId, SaleRecord, VisitRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod error;

pub use error::GeneratorError;

/// Draws daily records for a set of marketplaces from uniform ranges.
#[derive(Debug)]
pub struct DataGenerator<R: Rng> {
    settings: GeneratorSettings,
    rng: R,
}

impl<R: Rng> DataGenerator<R> {
    pub fn new(settings: GeneratorSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    /// Generates the trailing `days` calendar days ending at `end_date`, most recent first.
    ///
    /// Days form the outer loop and marketplaces the inner one, so every
    /// marketplace receives one record per day in the order the set lists them.
    pub fn generate(
        &mut self,
        marketplaces: &[MarketplaceId],
        days: u32,
        end_date: NaiveDate,
    ) -> Result<MarketData, GeneratorError> {
        let mut visits: Vec<Vec<VisitRecord>> = vec![Vec::new(); marketplaces.len()];
        let mut sales: Vec<Vec<SaleRecord>> = vec![Vec::new(); marketplaces.len()];

        for offset in 0..days {
            let date = end_date
                .checked_sub_days(Days::new(u64::from(offset)))
                .ok_or(GeneratorError::DateOutOfRange { days, end_date })?;

            for index in 0..marketplaces.len() {
                let (visit, sale) = self.draw_day(date)?;
                visits[index].push(visit);
                sales[index].push(sale);
            }
        }

        let entries = marketplaces
            .iter()
            .cloned()
            .zip(visits.into_iter().zip(sales))
            .map(|(id, (visits, sales))| Ok((id, MarketplaceDataset::new(visits, sales)?)))
            .collect::<Result<Vec<_>, GeneratorError>>()?;

        let data = MarketData::new(entries)?;
        tracing::debug!(
            marketplaces = data.len(),
            days,
            %end_date,
            "Synthetic market data generated."
        );
        Ok(data)
    }

    fn draw_day(&mut self, date: NaiveDate) -> Result<(VisitRecord, SaleRecord), GeneratorError> {
        let s = &self.settings;
        let visits = self.rng.random_range(s.visits.min..=s.visits.max);
        let units_sold = self.rng.random_range(s.units_sold.min..=s.units_sold.max);
        let time_on_page = self
            .rng
            .random_range(s.time_on_page_minutes.min..=s.time_on_page_minutes.max);
        let pages_viewed = self.rng.random_range(s.pages_viewed.min..=s.pages_viewed.max);

        let visit = VisitRecord::new(date, visits, time_on_page, pages_viewed)?;
        Ok((visit, SaleRecord::new(date, units_sold)))
    }
}

impl DataGenerator<StdRng> {
    /// A generator seeded from `seed`, or from OS entropy when no seed is given.
    pub fn from_seed(settings: GeneratorSettings, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                tracing::info!(seed, "Seeding data generator.");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        Self::new(settings, rng)
    }
}

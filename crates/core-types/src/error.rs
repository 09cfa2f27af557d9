use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Visit and sale sequences differ in length: {visits} visits vs {sales} sales")]
    LengthMismatch { visits: usize, sales: usize },

    #[error("Records at position {index} are not aligned: visit on {visit_date}, sale on {sale_date}")]
    DateMismatch {
        index: usize,
        visit_date: NaiveDate,
        sale_date: NaiveDate,
    },

    #[error("Record at position {index} is dated {current}, expected the day before {previous}")]
    NonConsecutiveDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Marketplace '{0}' appears more than once")]
    DuplicateMarketplace(String),

    #[error("Unknown marketplace: '{0}'")]
    UnknownMarketplace(String),
}

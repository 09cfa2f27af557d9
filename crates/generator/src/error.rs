use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generated records failed validation: {0}")]
    Core(#[from] core_types::CoreError),

    #[error("A window of {days} days ending on {end_date} reaches before the supported calendar")]
    DateOutOfRange { days: u32, end_date: NaiveDate },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Not enough samples to fit a line: need at least {required}, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },

    #[error("Every sample has the same visit count, so no slope can be estimated")]
    ConstantFeature,

    #[error("Regression solver failed: {0}")]
    Solver(#[from] smartcore::error::Failed),

    #[error("Fitted coefficients are not finite (slope {slope}, intercept {intercept})")]
    NonFiniteFit { slope: f64, intercept: f64 },
}

use serde::Serialize;

/// A fitted single-feature line mapping daily visits to expected units sold.
///
/// Immutable once fitted; predictions are `intercept + slope * visits`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainedModel {
    slope: f64,
    intercept: f64,
    n_samples: usize,
}

impl TrainedModel {
    pub(crate) fn new(slope: f64, intercept: f64, n_samples: usize) -> Self {
        Self {
            slope,
            intercept,
            n_samples,
        }
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of samples the line was fitted on.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn predict_one(&self, visits: f64) -> f64 {
        self.intercept + self.slope * visits
    }

    /// One prediction per input, in input order.
    pub fn predict(&self, visits: &[u32]) -> Vec<f64> {
        visits
            .iter()
            .map(|&v| self.predict_one(f64::from(v)))
            .collect()
    }
}

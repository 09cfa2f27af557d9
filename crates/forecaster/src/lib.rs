//! # Pulse Sales Forecaster
//!
//! Fits the single-feature ordinary least squares line that predicts units
//! sold from daily visits, and evaluates it once on a shuffled holdout split.
//! Fitting happens once at startup; the resulting `TrainedModel` is immutable.

use serde::Serialize;
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use smartcore::model_selection::train_test_split;

pub mod error;
pub mod model;

pub use error::ForecastError;
pub use model::TrainedModel;

/// Minimum number of samples a line can be fitted on.
pub const MIN_FIT_SAMPLES: usize = 2;

/// Outcome of the startup training run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub model: TrainedModel,
    pub train_samples: usize,
    pub test_samples: usize,
    /// Mean squared error on the holdout rows; `None` when the sample set was
    /// too small to hold any out.
    pub holdout_mse: Option<f64>,
}

/// Fits `units_sold = intercept + slope * visits` by ordinary least squares.
pub fn fit(samples: &[(u32, u32)]) -> Result<TrainedModel, ForecastError> {
    let (x, y) = to_design(samples)?;
    fit_matrix(&x, &y)
}

/// One prediction per visit count, preserving order and length.
pub fn predict(model: &TrainedModel, visits: &[u32]) -> Vec<f64> {
    model.predict(visits)
}

/// Splits `samples` into shuffled train and test parts, fits on the train part,
/// and measures the mean squared error on the test part.
///
/// `test_size` is the withheld fraction; the number of test rows is
/// `floor(len * test_size)`. If that leaves no test row, or fewer than
/// `MIN_FIT_SAMPLES` training rows, the model is fitted on every sample and no
/// error is reported.
pub fn train_with_holdout(
    samples: &[(u32, u32)],
    test_size: f32,
    seed: u64,
) -> Result<TrainingSummary, ForecastError> {
    let n_test = ((samples.len() as f32) * test_size) as usize;
    let holdout_possible = test_size > 0.0
        && test_size < 1.0
        && n_test >= 1
        && samples.len() - n_test >= MIN_FIT_SAMPLES;

    if !holdout_possible {
        tracing::warn!(
            samples = samples.len(),
            test_size,
            "Too few samples for a holdout split; fitting on all of them."
        );
        let model = fit(samples)?;
        return Ok(TrainingSummary {
            model,
            train_samples: samples.len(),
            test_samples: 0,
            holdout_mse: None,
        });
    }

    let (x, y) = to_design(samples)?;
    let (x_train, x_test, y_train, y_test) = train_test_split(&x, &y, test_size, true, Some(seed));

    let model = fit_matrix(&x_train, &y_train)?;

    let (test_rows, _) = x_test.shape();
    let predictions: Vec<f64> = (0..test_rows)
        .map(|i| model.predict_one(*x_test.get((i, 0))))
        .collect();
    let mse = mean_squared_error(&y_test, &predictions);

    tracing::info!(
        train_samples = y_train.len(),
        test_samples = y_test.len(),
        slope = model.slope(),
        intercept = model.intercept(),
        mse,
        "Sales forecast trained."
    );

    Ok(TrainingSummary {
        model,
        train_samples: y_train.len(),
        test_samples: y_test.len(),
        holdout_mse: Some(mse),
    })
}

/// Mean of squared differences; zero for empty input.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    sum / n as f64
}

fn to_design(samples: &[(u32, u32)]) -> Result<(DenseMatrix<f64>, Vec<f64>), ForecastError> {
    if samples.len() < MIN_FIT_SAMPLES {
        return Err(ForecastError::InsufficientSamples {
            required: MIN_FIT_SAMPLES,
            actual: samples.len(),
        });
    }

    let visits: Vec<f64> = samples.iter().map(|&(v, _)| f64::from(v)).collect();
    let units: Vec<f64> = samples.iter().map(|&(_, u)| f64::from(u)).collect();
    let x = DenseMatrix::new(visits.len(), 1, visits, true)?;
    Ok((x, units))
}

fn fit_matrix(x: &DenseMatrix<f64>, y: &Vec<f64>) -> Result<TrainedModel, ForecastError> {
    let (rows, _) = x.shape();
    if rows < MIN_FIT_SAMPLES {
        return Err(ForecastError::InsufficientSamples {
            required: MIN_FIT_SAMPLES,
            actual: rows,
        });
    }
    let first = *x.get((0, 0));
    if (1..rows).all(|i| *x.get((i, 0)) == first) {
        return Err(ForecastError::ConstantFeature);
    }

    let regression: LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>> =
        LinearRegression::fit(x, y, LinearRegressionParameters::default())?;

    let slope = *regression.coefficients().get((0, 0));
    let intercept = *regression.intercept();
    if !(slope.is_finite() && intercept.is_finite()) {
        return Err(ForecastError::NonFiniteFit { slope, intercept });
    }

    tracing::debug!(rows, slope, intercept, "Linear regression fitted.");
    Ok(TrainedModel::new(slope, intercept, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic scatter around `units = 20 + 0.03 * visits`.
    fn noisy_samples(n: u32) -> Vec<(u32, u32)> {
        (0..n)
            .map(|i| {
                let visits = 1000 + (i * 733) % 4001;
                let noise = (i * 17) % 23;
                let units = 20 + visits * 3 / 100 + noise;
                (visits, units)
            })
            .collect()
    }

    fn closed_form(samples: &[(u32, u32)]) -> (f64, f64) {
        let n = samples.len() as f64;
        let mean_x = samples.iter().map(|&(x, _)| f64::from(x)).sum::<f64>() / n;
        let mean_y = samples.iter().map(|&(_, y)| f64::from(y)).sum::<f64>() / n;
        let cov: f64 = samples
            .iter()
            .map(|&(x, y)| (f64::from(x) - mean_x) * (f64::from(y) - mean_y))
            .sum();
        let var: f64 = samples.iter().map(|&(x, _)| (f64::from(x) - mean_x).powi(2)).sum();
        let slope = cov / var;
        (slope, mean_y - slope * mean_x)
    }

    #[test]
    fn test_fit_recovers_exact_line() {
        let samples: Vec<(u32, u32)> = [1000, 2000, 2500, 4000, 5000]
            .iter()
            .map(|&v| (v, 10 + v / 50))
            .collect();

        let model = fit(&samples).unwrap();
        assert!((model.slope() - 0.02).abs() < 1e-9);
        assert!((model.intercept() - 10.0).abs() < 1e-6);

        let visits: Vec<u32> = samples.iter().map(|&(v, _)| v).collect();
        let predictions = predict(&model, &visits);
        for (prediction, &(_, units)) in predictions.iter().zip(&samples) {
            assert!((prediction - f64::from(units)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fit_matches_closed_form_least_squares() {
        let samples = noisy_samples(90);
        let model = fit(&samples).unwrap();
        let (slope, intercept) = closed_form(&samples);

        assert!((model.slope() - slope).abs() < 1e-8);
        assert!((model.intercept() - intercept).abs() < 1e-5);
        assert_eq!(model.n_samples(), 90);

        // Normal equations: residuals sum to zero and are orthogonal to the feature.
        let visits: Vec<u32> = samples.iter().map(|&(v, _)| v).collect();
        let predictions = model.predict(&visits);
        let residuals: Vec<f64> = samples
            .iter()
            .zip(&predictions)
            .map(|(&(_, y), p)| f64::from(y) - p)
            .collect();
        let residual_sum: f64 = residuals.iter().sum();
        let weighted: f64 = residuals.iter().zip(&visits).map(|(r, &v)| r * f64::from(v)).sum();
        assert!(residual_sum.abs() < 1e-6);
        assert!(weighted.abs() < 1e-2);
    }

    #[test]
    fn test_predict_preserves_length_and_order() {
        let model = TrainedModel::new(2.0, 1.0, 5);
        assert_eq!(predict(&model, &[3, 0, 10]), vec![7.0, 1.0, 21.0]);
        assert!(predict(&model, &[]).is_empty());
    }

    #[test]
    fn test_fit_rejects_degenerate_samples() {
        assert!(matches!(
            fit(&[(1000, 10)]),
            Err(ForecastError::InsufficientSamples { required: 2, actual: 1 })
        ));
        assert!(matches!(
            fit(&[(1000, 10), (1000, 20), (1000, 30)]),
            Err(ForecastError::ConstantFeature)
        ));
    }

    #[test]
    fn test_holdout_splits_eighty_twenty() {
        let samples = noisy_samples(90);
        let summary = train_with_holdout(&samples, 0.2, 42).unwrap();

        assert_eq!(summary.test_samples, 18);
        assert_eq!(summary.train_samples, 72);
        assert_eq!(summary.model.n_samples(), 72);
        let mse = summary.holdout_mse.unwrap();
        assert!(mse.is_finite() && mse >= 0.0);
    }

    #[test]
    fn test_holdout_is_reproducible_for_a_seed() {
        let samples = noisy_samples(60);
        let first = train_with_holdout(&samples, 0.2, 7).unwrap();
        let second = train_with_holdout(&samples, 0.2, 7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_holdout_falls_back_for_tiny_sets() {
        let samples = vec![(1000, 50), (2000, 90), (3000, 130)];
        let summary = train_with_holdout(&samples, 0.2, 42).unwrap();
        assert_eq!(summary.test_samples, 0);
        assert_eq!(summary.train_samples, 3);
        assert_eq!(summary.holdout_mse, None);
    }

    #[test]
    fn test_mean_squared_error() {
        assert_eq!(mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 2.0, 5.0]), 4.0 / 3.0);
        assert_eq!(mean_squared_error(&[], &[]), 0.0);
    }
}

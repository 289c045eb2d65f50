/// A simple statistics module providing the constrained least-squares fit at the
/// heart of the efficiency estimate.
use itertools::izip;
use serde::Serialize;
use statrs::statistics::Statistics;
use thiserror::Error;

/// A linear model of production on irradiance, fitted through the origin; the
/// intercept is fixed at zero by construction and never stored.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct RegressionModel {
    slope: f64,
    r_squared: f64,
}

impl RegressionModel {
    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("no daily aggregates survived filtering, so there is insufficient data to fit a model")]
    InsufficientData,
    #[error("every irradiance aggregate is zero, so a through-origin slope is undefined")]
    DegenerateRegressor,
}

/// Least-squares fit of `y` on `x` forced through the origin: zero irradiance
/// must imply zero production, and a free intercept would absorb systematic
/// bias into the coefficient that gets read as an efficiency.
///
/// The goodness of fit is scored against the centred baseline,
/// `r² = 1 − SS_res / Σ(y − ȳ)²`, matching how scikit-learn scores a
/// zero-intercept model.
pub fn fit_through_origin(x: &[f64], y: &[f64]) -> Result<RegressionModel, FitError> {
    if x.is_empty() || x.len() != y.len() {
        return Err(FitError::InsufficientData);
    }
    let sum_squares_x = x.iter().map(|x| x * x).sum::<f64>();
    if sum_squares_x == 0. {
        return Err(FitError::DegenerateRegressor);
    }
    let sum_products = izip!(x, y).map(|(x, y)| x * y).sum::<f64>();
    let slope = sum_products / sum_squares_x;

    let y_mean = y.mean();
    let residual_sum_squares = izip!(x, y)
        .map(|(x, y)| (y - slope * x).powi(2))
        .sum::<f64>();
    let total_sum_squares = y.iter().map(|y| (y - y_mean).powi(2)).sum::<f64>();
    let r_squared = if total_sum_squares == 0. {
        if residual_sum_squares == 0. {
            1.
        } else {
            0.
        }
    } else {
        1. - residual_sum_squares / total_sum_squares
    };

    Ok(RegressionModel { slope, r_squared })
}

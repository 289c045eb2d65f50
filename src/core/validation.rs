use crate::core::series::TimeSeriesRecord;
use crate::core::units::fraction_to_percent;
use crate::statistics::RegressionModel;
use serde::Serialize;
use thiserror::Error;

/// Checks the fitted model back against the measurements it came from: over
/// every active-production row (production above zero, a deliberately wider net
/// than the fit's dual noise threshold) the modelled and real totals are
/// compared as a relative error rate.

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ValidationResult {
    pub total_real_kwh: f64,
    pub total_theoretical_kwh: f64,
    pub error_rate_pct: f64,
}

#[derive(Debug, Error)]
#[error("no rows with production above zero, so an error rate against real output is undefined")]
pub struct UndefinedErrorRateError;

pub fn validate_model(
    records: &[TimeSeriesRecord],
    model: &RegressionModel,
) -> Result<ValidationResult, UndefinedErrorRateError> {
    let active_rows = records
        .iter()
        .filter(|record| record.production_kwh > 0.)
        .collect::<Vec<_>>();
    let total_real_kwh = active_rows
        .iter()
        .map(|record| record.production_kwh)
        .sum::<f64>();
    if total_real_kwh == 0. {
        return Err(UndefinedErrorRateError);
    }
    let total_theoretical_kwh = active_rows
        .iter()
        .map(|record| record.irradiance * model.slope())
        .sum::<f64>();

    Ok(ValidationResult {
        total_real_kwh,
        total_theoretical_kwh,
        error_rate_pct: fraction_to_percent(
            (total_theoretical_kwh - total_real_kwh).abs() / total_real_kwh,
        ),
    })
}

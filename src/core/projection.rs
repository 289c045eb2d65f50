use crate::core::series::{ensure_same_length, IrradianceSample, ProductionSample, SeriesAlignmentError};
use crate::core::units::fraction_to_percent;
use crate::statistics::RegressionModel;
use itertools::izip;
use serde::Serialize;
use thiserror::Error;

/// Reuses the fitted slope against a candidate site's irradiance series: the
/// production series' above-zero mask is applied positionally to the candidate
/// samples, so the projected total covers the same active hours as the
/// validation baseline it is compared against.

#[derive(Clone, Copy, Debug, Serialize)]
pub struct ProjectionResult {
    pub total_theoretical_kwh_new: f64,
    pub increase_pct: f64,
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Misaligned(#[from] SeriesAlignmentError),
    #[error("the current site's modelled total is zero, so a percentage change against it is undefined")]
    UndefinedBaseline,
}

pub fn project_yield(
    production: &[ProductionSample],
    candidate_irradiance: &[IrradianceSample],
    model: &RegressionModel,
    baseline_theoretical_kwh: f64,
) -> Result<ProjectionResult, ProjectionError> {
    ensure_same_length(production.len(), candidate_irradiance.len())?;
    if baseline_theoretical_kwh == 0. {
        return Err(ProjectionError::UndefinedBaseline);
    }

    let total_theoretical_kwh_new = izip!(production, candidate_irradiance)
        .filter(|(sample, _)| sample.energy_kwh > 0.)
        .map(|(_, irradiance)| irradiance.value * model.slope())
        .sum::<f64>();

    Ok(ProjectionResult {
        total_theoretical_kwh_new,
        increase_pct: fraction_to_percent(
            (total_theoretical_kwh_new - baseline_theoretical_kwh) / baseline_theoretical_kwh,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::fit_through_origin;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use rstest::*;

    fn production(energies: &[f64]) -> Vec<ProductionSample> {
        energies
            .iter()
            .enumerate()
            .map(|(hour, &energy_kwh)| ProductionSample {
                timestamp: NaiveDate::from_ymd_opt(2023, 6, 1)
                    .unwrap()
                    .and_hms_opt(hour as u32, 0, 0)
                    .unwrap(),
                energy_kwh,
            })
            .collect()
    }

    fn irradiance(values: &[f64]) -> Vec<IrradianceSample> {
        values
            .iter()
            .enumerate()
            .map(|(hour, &value)| IrradianceSample {
                time: format!("20230601:{hour:02}00"),
                value,
            })
            .collect()
    }

    #[fixture]
    fn model() -> RegressionModel {
        fit_through_origin(&[500., 700.], &[1.5, 2.1]).unwrap()
    }

    #[rstest]
    fn test_identical_candidate_series_projects_no_change(model: RegressionModel) {
        let production = production(&[0., 1.5, 2.1]);
        let current_site = irradiance(&[0., 500., 700.]);
        // the baseline is what the validator modelled over the same mask
        let baseline = (500. + 700.) * model.slope();
        let result = project_yield(&production, &current_site, &model, baseline).unwrap();
        assert_relative_eq!(result.total_theoretical_kwh_new, baseline, max_relative = 1e-12);
        assert_relative_eq!(result.increase_pct, 0., epsilon = 1e-9);
    }

    #[rstest]
    fn test_brighter_candidate_site_projects_an_increase(model: RegressionModel) {
        let production = production(&[0., 1.5, 2.1]);
        let candidate = irradiance(&[0., 600., 840.]);
        let baseline = (500. + 700.) * model.slope();
        let result = project_yield(&production, &candidate, &model, baseline).unwrap();
        assert_relative_eq!(result.increase_pct, 20., max_relative = 1e-9);
    }

    #[rstest]
    fn test_masked_rows_do_not_contribute(model: RegressionModel) {
        // the candidate's night sample is non-zero but production was zero there
        let production = production(&[0., 1.5]);
        let candidate = irradiance(&[300., 500.]);
        let result = project_yield(&production, &candidate, &model, 1.5).unwrap();
        assert_relative_eq!(
            result.total_theoretical_kwh_new,
            500. * model.slope(),
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn test_mismatched_candidate_series_is_rejected(model: RegressionModel) {
        let production = production(&[1.5, 2.1]);
        let candidate = irradiance(&[500.]);
        assert!(matches!(
            project_yield(&production, &candidate, &model, 3.6),
            Err(ProjectionError::Misaligned(_))
        ));
    }

    #[rstest]
    fn test_zero_baseline_is_signalled(model: RegressionModel) {
        let production = production(&[1.5]);
        let candidate = irradiance(&[500.]);
        assert!(matches!(
            project_yield(&production, &candidate, &model, 0.),
            Err(ProjectionError::UndefinedBaseline)
        ));
    }
}

use crate::core::efficiency::{fit_efficiency, EfficiencyResult};
use crate::core::projection::{project_yield, ProjectionResult};
use crate::core::series::{join_series, IrradianceSample, ProductionSample};
use crate::core::theoretical::{theoretical_yield, TheoreticalYield};
use crate::core::validation::{validate_model, ValidationResult};
use crate::errors::PvemError;
use crate::input::{DeclaredEfficiency, PanelArrayParameters};
use crate::statistics::RegressionModel;
use serde::Serialize;
use tracing::info;

/// This module runs one complete pass over freshly ingested series, the unit of
/// work the original triggered per upload event. Each run takes its own copies
/// of the inputs and returns new result values; nothing is shared between runs.

/// The measured path: fit the system efficiency from co-located production and
/// irradiance measurements, validate the fit against the full active dataset,
/// and, when a candidate site's series is supplied, project the yield there.
#[derive(Clone, Debug, Serialize)]
pub struct MeasuredAssessment {
    pub model: RegressionModel,
    pub efficiency: EfficiencyResult,
    pub validation: ValidationResult,
    pub projection: Option<ProjectionResult>,
}

impl MeasuredAssessment {
    pub fn run(
        production: &[ProductionSample],
        irradiance: &[IrradianceSample],
        candidate_irradiance: Option<&[IrradianceSample]>,
        parameters: &PanelArrayParameters,
    ) -> Result<Self, PvemError> {
        info!(
            "running measured assessment over {} production samples",
            production.len()
        );
        let records = join_series(production, irradiance)?;
        let (model, efficiency) = fit_efficiency(&records, parameters)?;
        let validation = validate_model(&records, &model)?;
        let projection = candidate_irradiance
            .map(|candidate| {
                project_yield(production, candidate, &model, validation.total_theoretical_kwh)
            })
            .transpose()?;

        Ok(Self {
            model,
            efficiency,
            validation,
            projection,
        })
    }
}

/// The theoretical path: expected yield from a declared efficiency, wrapped in
/// the same result-object shape as the measured path.
#[derive(Clone, Debug, Serialize)]
pub struct TheoreticalAssessment {
    pub expected_yield: TheoreticalYield,
}

impl TheoreticalAssessment {
    pub fn run(
        irradiance: &[IrradianceSample],
        parameters: &PanelArrayParameters,
        efficiency: DeclaredEfficiency,
    ) -> Self {
        info!(
            "running theoretical assessment over {} irradiance samples",
            irradiance.len()
        );
        Self {
            expected_yield: theoretical_yield(irradiance, parameters, efficiency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::*;

    fn hourly_timestamp(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    // two days of synthetic measurements manufactured as production =
    // 0.0048 * irradiance, i.e. a 30% system on 10 panels of 1.6 m²
    #[fixture]
    fn measurements() -> (Vec<ProductionSample>, Vec<IrradianceSample>) {
        let mut production = vec![];
        let mut irradiance = vec![];
        for day in 1..=2 {
            for (hour, value) in [(0, 0.), (9, 450.), (12, 820.), (15, 560.), (21, 0.)] {
                production.push(ProductionSample {
                    timestamp: hourly_timestamp(day, hour),
                    energy_kwh: 0.0048 * value,
                });
                irradiance.push(IrradianceSample {
                    time: format!("202306{day:02}:{hour:02}00"),
                    value,
                });
            }
        }
        (production, irradiance)
    }

    #[fixture]
    fn parameters() -> PanelArrayParameters {
        PanelArrayParameters::new(10, 1.6).unwrap()
    }

    #[rstest]
    fn test_measured_pass_without_candidate_site(
        measurements: (Vec<ProductionSample>, Vec<IrradianceSample>),
        parameters: PanelArrayParameters,
    ) {
        let (production, irradiance) = measurements;
        let assessment =
            MeasuredAssessment::run(&production, &irradiance, None, &parameters).unwrap();
        assert_relative_eq!(assessment.model.slope(), 0.0048, max_relative = 1e-9);
        assert_relative_eq!(
            assessment.efficiency.efficiency_pct,
            30.,
            max_relative = 1e-9
        );
        assert_relative_eq!(assessment.validation.error_rate_pct, 0., epsilon = 1e-9);
        assert!(assessment.projection.is_none());
    }

    #[rstest]
    fn test_measured_pass_with_identical_candidate_site(
        measurements: (Vec<ProductionSample>, Vec<IrradianceSample>),
        parameters: PanelArrayParameters,
    ) {
        let (production, irradiance) = measurements;
        let assessment =
            MeasuredAssessment::run(&production, &irradiance, Some(&irradiance), &parameters)
                .unwrap();
        let projection = assessment.projection.unwrap();
        assert_relative_eq!(projection.increase_pct, 0., epsilon = 1e-9);
        assert_relative_eq!(
            projection.total_theoretical_kwh_new,
            assessment.validation.total_theoretical_kwh,
            max_relative = 1e-12
        );
    }

    #[rstest]
    fn test_measured_pass_rejects_misaligned_series(
        measurements: (Vec<ProductionSample>, Vec<IrradianceSample>),
        parameters: PanelArrayParameters,
    ) {
        let (production, mut irradiance) = measurements;
        irradiance.pop();
        assert!(matches!(
            MeasuredAssessment::run(&production, &irradiance, None, &parameters),
            Err(PvemError::SeriesAlignment(_))
        ));
    }

    #[rstest]
    fn test_theoretical_pass(parameters: PanelArrayParameters) {
        let irradiance = vec![IrradianceSample {
            time: "20230601:1200".into(),
            value: 1000.,
        }];
        let assessment = TheoreticalAssessment::run(
            &irradiance,
            &parameters,
            DeclaredEfficiency::new(15.).unwrap(),
        );
        assert_relative_eq!(assessment.expected_yield.total_kwh, 2.4, max_relative = 1e-12);
    }
}

pub mod assessment;
pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod read_measurement_file;
pub mod statistics;

pub use crate::statistics::RegressionModel;

use crate::assessment::{MeasuredAssessment, TheoreticalAssessment};
use crate::errors::PvemError;
use crate::input::{DeclaredEfficiency, PanelArrayParameters};
use crate::output::Output;
use crate::read_measurement_file::{irradiance_data_to_vec, production_data_to_vec};
use csv::WriterBuilder;
use std::io::Read;

/// Runs the measured path over one set of uploads: production and co-located
/// irradiance exports, optionally a candidate site's irradiance export, plus
/// the validated array parameters. Results are written through the given
/// output (a results CSV and a JSON summary) and returned.
pub fn run_measured(
    production: impl Read,
    irradiance: impl Read,
    candidate_irradiance: Option<impl Read>,
    parameters: PanelArrayParameters,
    output: impl Output,
) -> Result<MeasuredAssessment, PvemError> {
    let production = production_data_to_vec(production)?;
    let irradiance = irradiance_data_to_vec(irradiance)?;
    let candidate_irradiance = candidate_irradiance
        .map(irradiance_data_to_vec)
        .transpose()?;

    let assessment = MeasuredAssessment::run(
        &production,
        &irradiance,
        candidate_irradiance.as_deref(),
        &parameters,
    )?;

    if !output.is_noop() {
        write_measured_results(&output, &assessment).map_err(PvemError::FailureInOutput)?;
    }

    Ok(assessment)
}

/// Runs the theoretical path over one irradiance export and a declared overall
/// system efficiency.
pub fn run_theoretical(
    irradiance: impl Read,
    parameters: PanelArrayParameters,
    efficiency: DeclaredEfficiency,
    output: impl Output,
) -> Result<TheoreticalAssessment, PvemError> {
    let irradiance = irradiance_data_to_vec(irradiance)?;

    let assessment = TheoreticalAssessment::run(&irradiance, &parameters, efficiency);

    if !output.is_noop() {
        write_theoretical_results(&output, &assessment).map_err(PvemError::FailureInOutput)?;
    }

    Ok(assessment)
}

fn write_measured_results(
    output: &impl Output,
    assessment: &MeasuredAssessment,
) -> anyhow::Result<()> {
    let mut writer =
        WriterBuilder::new().from_writer(output.writer_for_location_key("results", "csv")?);
    writer.write_record(["Metric", "Value", "Unit"])?;

    let mut rows: Vec<(&str, f64, &str)> = vec![
        ("System efficiency", assessment.efficiency.efficiency_pct, "[%]"),
        ("Goodness of fit", assessment.model.r_squared(), "[ratio]"),
        ("Total real output", assessment.validation.total_real_kwh, "[kWh]"),
        (
            "Total modelled output",
            assessment.validation.total_theoretical_kwh,
            "[kWh]",
        ),
        ("Error rate", assessment.validation.error_rate_pct, "[%]"),
    ];
    if let Some(projection) = &assessment.projection {
        rows.push((
            "Projected output at candidate site",
            projection.total_theoretical_kwh_new,
            "[kWh]",
        ));
        rows.push(("Change versus current site", projection.increase_pct, "[%]"));
    }
    for (metric, value, unit) in rows {
        let value = value.to_string();
        writer.write_record([metric, value.as_str(), unit])?;
    }
    writer.flush()?;

    serde_json::to_writer_pretty(
        output.writer_for_location_key("summary", "json")?,
        assessment,
    )?;

    Ok(())
}

fn write_theoretical_results(
    output: &impl Output,
    assessment: &TheoreticalAssessment,
) -> anyhow::Result<()> {
    let mut writer =
        WriterBuilder::new().from_writer(output.writer_for_location_key("results", "csv")?);
    writer.write_record(["Metric", "Value", "Unit"])?;
    let total = assessment.expected_yield.total_kwh.to_string();
    writer.write_record(["Total expected yield", total.as_str(), "[kWh]"])?;
    for (year, kwh) in &assessment.expected_yield.yearly_kwh {
        let metric = format!("Expected yield in {year}");
        let kwh = kwh.to_string();
        writer.write_record([metric.as_str(), kwh.as_str(), "[kWh]"])?;
    }
    writer.flush()?;

    serde_json::to_writer_pretty(
        output.writer_for_location_key("summary", "json")?,
        assessment,
    )?;

    Ok(())
}

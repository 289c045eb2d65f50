use crate::core::series::TimeSeriesRecord;
use crate::core::units::{fraction_to_percent, WATTS_PER_KILOWATT};
use crate::input::PanelArrayParameters;
use crate::statistics::{fit_through_origin, FitError, RegressionModel};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use statrs::statistics::Statistics;
use tracing::info;

/// This module derives the empirical system efficiency: filtered and
/// daily-averaged measurements are fitted with a through-origin regression of
/// production on irradiance, and the slope is rescaled by the array geometry
/// into an efficiency percentage.

// thresholds excluding night and near-zero noise that would destabilise the slope
pub(crate) const MIN_PRODUCTION_KWH: f64 = 2.;
pub(crate) const MIN_IRRADIANCE: f64 = 100.;

/// Mean production and irradiance over one calendar date's filtered samples.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub mean_production_kwh: f64,
    pub mean_irradiance: f64,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct EfficiencyResult {
    pub efficiency_pct: f64,
}

/// Groups records that clear both noise thresholds by calendar date and
/// averages each day's production and irradiance, one aggregate per distinct
/// date in first-seen (chronological) order.
pub fn daily_aggregates(records: &[TimeSeriesRecord]) -> Vec<DailyAggregate> {
    let mut grouped: IndexMap<NaiveDate, Vec<(f64, f64)>> = Default::default();
    for record in records.iter().filter(|record| {
        record.production_kwh >= MIN_PRODUCTION_KWH && record.irradiance >= MIN_IRRADIANCE
    }) {
        grouped
            .entry(record.timestamp.date())
            .or_default()
            .push((record.production_kwh, record.irradiance));
    }

    grouped
        .into_iter()
        .map(|(date, samples)| DailyAggregate {
            date,
            mean_production_kwh: samples.iter().map(|&(production, _)| production).mean(),
            mean_irradiance: samples.iter().map(|&(_, irradiance)| irradiance).mean(),
        })
        .collect()
}

/// Fits the through-origin model over the daily aggregates and converts its
/// slope (kWh per unit irradiance) into a system efficiency percentage for the
/// declared array geometry.
pub fn fit_efficiency(
    records: &[TimeSeriesRecord],
    parameters: &PanelArrayParameters,
) -> Result<(RegressionModel, EfficiencyResult), FitError> {
    let aggregates = daily_aggregates(records);
    let irradiance = aggregates
        .iter()
        .map(|aggregate| aggregate.mean_irradiance)
        .collect::<Vec<_>>();
    let production = aggregates
        .iter()
        .map(|aggregate| aggregate.mean_production_kwh)
        .collect::<Vec<_>>();
    let model = fit_through_origin(&irradiance, &production)?;

    let efficiency_pct = fraction_to_percent(
        WATTS_PER_KILOWATT as f64 / parameters.total_area_m2() * model.slope(),
    );
    info!(
        "fitted efficiency model over {} daily aggregates: slope {:.6}, r² {:.4}, efficiency {:.2}%",
        aggregates.len(),
        model.slope(),
        model.r_squared(),
        efficiency_pct
    );

    Ok((model, EfficiencyResult { efficiency_pct }))
}

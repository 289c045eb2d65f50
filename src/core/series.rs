use chrono::NaiveDateTime;
use itertools::izip;
use thiserror::Error;

/// This module contains the sample types produced by ingestion and the verified
/// positional join between a production series and its co-located irradiance series.

/// One row of a production export: a parsed timestamp and the energy produced in
/// the sample interval.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductionSample {
    pub timestamp: NaiveDateTime,
    pub energy_kwh: f64,
}

/// One row of an irradiance export. The time label is kept verbatim (provider
/// format, e.g. "20200101:0011") as the theoretical path groups on its leading
/// four digits.
#[derive(Clone, Debug, PartialEq)]
pub struct IrradianceSample {
    pub time: String,
    pub value: f64,
}

/// A production sample paired with the irradiance measured over the same interval.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesRecord {
    pub timestamp: NaiveDateTime,
    pub production_kwh: f64,
    pub irradiance: f64,
}

#[derive(Debug, Error)]
#[error("production and irradiance series do not cover the same sampling grid ({production} production rows, {irradiance} irradiance rows)")]
pub struct SeriesAlignmentError {
    pub production: usize,
    pub irradiance: usize,
}

pub(crate) fn ensure_same_length(
    production: usize,
    irradiance: usize,
) -> Result<(), SeriesAlignmentError> {
    if production != irradiance {
        return Err(SeriesAlignmentError {
            production,
            irradiance,
        });
    }
    Ok(())
}

/// Pairs the two series sample by sample. The pairing is positional, not
/// timestamp-keyed, so both series must have been exported over the same time
/// range and sampling grid; only equal lengths can be verified here, and a
/// length mismatch is an error rather than a truncated join.
pub fn join_series(
    production: &[ProductionSample],
    irradiance: &[IrradianceSample],
) -> Result<Vec<TimeSeriesRecord>, SeriesAlignmentError> {
    ensure_same_length(production.len(), irradiance.len())?;
    Ok(izip!(production, irradiance)
        .map(|(sample, irradiance)| TimeSeriesRecord {
            timestamp: sample.timestamp,
            production_kwh: sample.energy_kwh,
            irradiance: irradiance.value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn timestamp(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[fixture]
    fn production() -> Vec<ProductionSample> {
        vec![
            ProductionSample {
                timestamp: timestamp(1, 11),
                energy_kwh: 3.1,
            },
            ProductionSample {
                timestamp: timestamp(1, 12),
                energy_kwh: 3.4,
            },
        ]
    }

    #[rstest]
    fn test_join_pairs_samples_in_order(production: Vec<ProductionSample>) {
        let irradiance = vec![
            IrradianceSample {
                time: "20230601:1100".into(),
                value: 640.,
            },
            IrradianceSample {
                time: "20230601:1200".into(),
                value: 655.,
            },
        ];
        let records = join_series(&production, &irradiance).unwrap();
        assert_eq!(
            records,
            vec![
                TimeSeriesRecord {
                    timestamp: timestamp(1, 11),
                    production_kwh: 3.1,
                    irradiance: 640.,
                },
                TimeSeriesRecord {
                    timestamp: timestamp(1, 12),
                    production_kwh: 3.4,
                    irradiance: 655.,
                },
            ]
        );
    }

    #[rstest]
    fn test_join_rejects_mismatched_lengths(production: Vec<ProductionSample>) {
        let irradiance = vec![IrradianceSample {
            time: "20230601:1100".into(),
            value: 640.,
        }];
        let error = join_series(&production, &irradiance).unwrap_err();
        assert_eq!((error.production, error.irradiance), (2, 1));
    }
}

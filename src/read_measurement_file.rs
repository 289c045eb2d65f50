use crate::core::series::{IrradianceSample, ProductionSample};
use anyhow::anyhow;
use chrono::NaiveDateTime;
use csv::ReaderBuilder as CsvReaderBuilder;
use std::io::{BufRead, BufReader, Read};
use tracing::debug;

/// This module reads the two measurement exports the model works from: a PVGIS
/// hourly irradiance export and a semicolon-delimited production log. Rows that
/// fail numeric or timestamp coercion are dropped rather than failing the batch,
/// so a provider footer or the odd gap in a log does not abort a computation.

// PVGIS hourly exports open with a fixed block of location/metadata lines
// before the column header.
const IRRADIANCE_PREAMBLE_LINES: usize = 8;
const IRRADIANCE_TIME_COLUMN: &str = "time";
const IRRADIANCE_VALUE_COLUMN: &str = "G(i)"; // global irradiance on the inclined plane, W/m2

const COLUMN_PRODUCTION_DATE: usize = 0;
const COLUMN_PRODUCTION_ENERGY: usize = 1; // produced energy in kWh
const PRODUCTION_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Parses a numeric field that may use a locale decimal comma; values already
/// using a decimal point pass through unchanged. Non-finite values are treated
/// as unparseable.
fn parse_locale_float(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Reads a PVGIS hourly irradiance export: the provider preamble is skipped, the
/// `time` and `G(i)` columns are located by header name, and every remaining row
/// that coerces cleanly becomes a sample, in file order.
pub fn irradiance_data_to_vec(file: impl Read) -> anyhow::Result<Vec<IrradianceSample>> {
    let mut reader = BufReader::new(file);
    let mut preamble_line = String::new();
    for _ in 0..IRRADIANCE_PREAMBLE_LINES {
        preamble_line.clear();
        if reader.read_line(&mut preamble_line)? == 0 {
            return Err(anyhow!(
                "Irradiance file ended within the {IRRADIANCE_PREAMBLE_LINES}-line provider preamble"
            ));
        }
    }

    let mut csv_reader = CsvReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let time_index = headers
        .iter()
        .position(|header| header == IRRADIANCE_TIME_COLUMN)
        .ok_or_else(|| {
            anyhow!("Irradiance file has no '{IRRADIANCE_TIME_COLUMN}' column in its header")
        })?;
    let value_index = headers
        .iter()
        .position(|header| header == IRRADIANCE_VALUE_COLUMN)
        .ok_or_else(|| {
            anyhow!("Irradiance file has no '{IRRADIANCE_VALUE_COLUMN}' column in its header")
        })?;

    let mut samples = vec![];
    let mut dropped_rows = 0usize;
    for result in csv_reader.records() {
        let Ok(record) = result else {
            dropped_rows += 1;
            continue;
        };
        let (Some(time), Some(raw_value)) = (record.get(time_index), record.get(value_index))
        else {
            dropped_rows += 1;
            continue;
        };
        // footer/disclaimer rows fail coercion here and are dropped with the rest
        let Some(value) = parse_locale_float(raw_value) else {
            dropped_rows += 1;
            continue;
        };
        if value < 0. {
            dropped_rows += 1;
            continue;
        }
        samples.push(IrradianceSample {
            time: time.trim().to_owned(),
            value,
        });
    }
    if dropped_rows > 0 {
        debug!("dropped {dropped_rows} unusable rows while reading irradiance file");
    }

    Ok(samples)
}

/// Reads a production log: semicolon-delimited with a header row, first two
/// columns taken positionally (timestamp, produced energy) whatever their
/// declared names. Rows whose timestamp does not match the expected
/// day/month/year hour:minute pattern are dropped, not fatal.
pub fn production_data_to_vec(file: impl Read) -> anyhow::Result<Vec<ProductionSample>> {
    let mut csv_reader = CsvReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(file);
    // surface stream-level problems (e.g. an unreadable source) before row parsing
    csv_reader.headers()?;

    let mut samples = vec![];
    let mut dropped_rows = 0usize;
    for result in csv_reader.records() {
        let Ok(record) = result else {
            dropped_rows += 1;
            continue;
        };
        let (Some(raw_timestamp), Some(raw_energy)) = (
            record.get(COLUMN_PRODUCTION_DATE),
            record.get(COLUMN_PRODUCTION_ENERGY),
        ) else {
            dropped_rows += 1;
            continue;
        };
        let Ok(timestamp) =
            NaiveDateTime::parse_from_str(raw_timestamp.trim(), PRODUCTION_TIMESTAMP_FORMAT)
        else {
            dropped_rows += 1;
            continue;
        };
        let Some(energy_kwh) = parse_locale_float(raw_energy) else {
            dropped_rows += 1;
            continue;
        };
        if energy_kwh < 0. {
            dropped_rows += 1;
            continue;
        }
        samples.push(ProductionSample {
            timestamp,
            energy_kwh,
        });
    }
    if dropped_rows > 0 {
        debug!("dropped {dropped_rows} unusable rows while reading production file");
    }

    Ok(samples)
}

//! Serializing an assembled series to CSV.
//!
//! This sits outside the numeric core, it only consumes a finished [`AslIndexSeries`]. The
//! column set matches the record fields plus a validity flag so gap records survive a round
//! trip through tabular form.
use crate::{
    error::{AslError, Result},
    index::LowCenterRecord,
    series::AslIndexSeries,
};
use metfor::{HectoPascal, Quantity};
use optional::Optioned;
use std::{fs::File, io::Write, path::Path};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};

/// The CSV columns, in output order. The header row is generated from this enum so the two
/// can never drift apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Column {
    /// Time stamp of the record.
    Time,
    /// Refined longitude, degrees east.
    Lon,
    /// Refined latitude, degrees north.
    Lat,
    /// Refined actual central pressure, hPa.
    ActualCentralPressure,
    /// Sector mean pressure, hPa.
    SectorMeanPressure,
    /// Relative central pressure, hPa.
    RelativeCentralPressure,
    /// `true` for detected lows, `false` for gap records.
    Valid,
}

/// Write a series as CSV, preceded by a comment line naming the calculation version.
///
/// Gap records are written with their time stamp, empty value fields, and `valid = false`.
pub fn write_csv<W: Write>(series: &AslIndexSeries, mut writer: W) -> Result<()> {
    writeln!(writer, "# asl-index calculation {}", crate::CALCULATION_VERSION)
        .map_err(|err| AslError::Output(err.to_string()))?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(Column::iter().map(|c| c.as_ref().to_owned()))?;

    for record in series.records() {
        csv.write_record(&row(record))?;
    }

    csv.flush().map_err(|err| AslError::Output(err.to_string()))?;
    Ok(())
}

/// Write a series to a CSV file at `path`.
pub fn to_csv<P: AsRef<Path>>(series: &AslIndexSeries, path: P) -> Result<()> {
    let file = File::create(path).map_err(|err| AslError::Output(err.to_string()))?;
    write_csv(series, file)
}

fn row(record: &LowCenterRecord) -> Vec<String> {
    vec![
        record.time.format("%Y-%m-%d %H:%M:%S").to_string(),
        fmt_degrees(record.lon),
        fmt_degrees(record.lat),
        fmt_pressure(record.actual_central_pressure),
        fmt_pressure(record.sector_mean_pressure),
        fmt_pressure(record.relative_central_pressure),
        (!record.is_gap()).to_string(),
    ]
}

fn fmt_degrees(value: Optioned<f64>) -> String {
    value
        .into_option()
        .map(|v| format!("{:.3}", v))
        .unwrap_or_default()
}

fn fmt_pressure(value: Optioned<HectoPascal>) -> String {
    value
        .into_option()
        .map(|p| format!("{:.2}", p.unpack()))
        .unwrap_or_default()
}

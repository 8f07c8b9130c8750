//! The relative central pressure and the per-time-step result record.
//!
//! The sector-wide mean pressure approximates the large-scale background pressure level.
//! Subtracting it from the refined central pressure removes broad synoptic-scale shifts, so
//! the index tracks the low's own deepening and weakening rather than hemispheric trends.
use crate::{
    error::{AslError, Result},
    sector::MaskedField,
};
use chrono::{Datelike, NaiveDateTime};
use metfor::{HectoPascal, Quantity};
use optional::{none, some, Optioned};

/// Arithmetic mean pressure over the valid (sea, in-sector) cells.
///
/// Returns `AslError::EmptySector` when no cell is valid, an empty mean is undefined.
pub fn sector_mean(masked: &MaskedField) -> Result<HectoPascal> {
    let (sum, count) = masked
        .iter_valid()
        .fold((0.0, 0usize), |(sum, count), (_, p)| {
            (sum + p.unpack(), count + 1)
        });

    if count == 0 {
        Err(AslError::EmptySector)
    } else {
        Ok(HectoPascal(sum / count as f64))
    }
}

/// Relative central pressure: the refined central pressure minus the sector mean.
#[inline]
pub fn relative_pressure(actual: HectoPascal, sector_mean: HectoPascal) -> HectoPascal {
    HectoPascal(actual.unpack() - sector_mean.unpack())
}

/// Meteorological season of a time stamp, December–January–February first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Season {
    /// December, January, February.
    DJF,
    /// March, April, May.
    MAM,
    /// June, July, August.
    JJA,
    /// September, October, November.
    SON,
}

/// The per-time-step result of the whole analysis.
///
/// A record either describes a detected low or is a gap. Gap records keep their time stamp
/// and hold missing values everywhere else, so an assembled series stays one-to-one with
/// the requested time steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LowCenterRecord {
    /// Valid time of the pressure field this record was derived from.
    pub time: NaiveDateTime,
    /// Refined longitude of the low center, degrees east.
    pub lon: Optioned<f64>,
    /// Refined latitude of the low center, degrees north.
    pub lat: Optioned<f64>,
    /// Refined actual central pressure.
    pub actual_central_pressure: Optioned<HectoPascal>,
    /// Mean pressure over the valid sector cells.
    pub sector_mean_pressure: Optioned<HectoPascal>,
    /// Actual central pressure minus the sector mean.
    pub relative_central_pressure: Optioned<HectoPascal>,
}

impl LowCenterRecord {
    /// Assemble a record for a successfully detected low.
    pub fn new(
        time: NaiveDateTime,
        lon: f64,
        lat: f64,
        actual_central_pressure: HectoPascal,
        sector_mean_pressure: HectoPascal,
    ) -> Self {
        LowCenterRecord {
            time,
            lon: some(lon),
            lat: some(lat),
            actual_central_pressure: some(actual_central_pressure),
            sector_mean_pressure: some(sector_mean_pressure),
            relative_central_pressure: some(relative_pressure(
                actual_central_pressure,
                sector_mean_pressure,
            )),
        }
    }

    /// A gap record for a time step that produced no result.
    pub fn gap(time: NaiveDateTime) -> Self {
        LowCenterRecord {
            time,
            lon: none(),
            lat: none(),
            actual_central_pressure: none(),
            sector_mean_pressure: none(),
            relative_central_pressure: none(),
        }
    }

    /// Whether this record is a gap.
    #[inline]
    pub fn is_gap(&self) -> bool {
        self.lon.is_none()
    }

    /// The meteorological season this record falls in.
    pub fn season(&self) -> Season {
        match self.time.month() {
            12 | 1 | 2 => Season::DJF,
            3 | 4 | 5 => Season::MAM,
            6 | 7 | 8 => Season::JJA,
            _ => Season::SON,
        }
    }
}

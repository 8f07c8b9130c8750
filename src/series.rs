//! Driving the per-time-step analysis over a whole period and assembling the series.
use crate::{
    error::{AslError, Result},
    grid::{Grid, LandSeaMask, PressureField},
    index::{sector_mean, LowCenterRecord},
    minima::locate_minimum,
    refine::refine_low,
    sector::{mask_sector, Sector},
};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use metfor::Quantity;
use rayon::prelude::*;

/// Supplier of pressure fields, one per requested time step.
///
/// This is the seam to whatever holds the data: a file already read into memory, a remote
/// archive, a synthetic generator in tests. Retrieval may be slow; it is called once per
/// time step and never retried here, retry policy belongs to the implementation. Implementors
/// must be `Sync` because time steps are processed in parallel.
pub trait GridSource: Sync {
    /// The static coordinate grid shared by every field this source supplies.
    fn grid(&self) -> &Grid;

    /// The pressure field valid at `time`.
    ///
    /// Implementations should wrap retrieval failures in [`AslError::Source`]; those are
    /// treated as per-step gaps rather than aborting the run.
    fn pressure_field(&self, time: NaiveDateTime) -> Result<PressureField>;
}

/// An ordered ASL index time series, one record per requested time step.
#[derive(Clone, Debug, PartialEq)]
pub struct AslIndexSeries {
    records: Vec<LowCenterRecord>,
}

impl AslIndexSeries {
    #[cfg(test)]
    pub(crate) fn from_records(records: Vec<LowCenterRecord>) -> Self {
        AslIndexSeries { records }
    }

    /// The records, strictly time-ascending, gaps included.
    #[inline]
    pub fn records(&self) -> &[LowCenterRecord] {
        &self.records
    }

    /// Number of records, equal to the number of requested time steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series holds no records at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of gap records, the run-level failure summary.
    pub fn gap_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_gap()).count()
    }
}

impl IntoIterator for AslIndexSeries {
    type Item = LowCenterRecord;
    type IntoIter = std::vec::IntoIter<LowCenterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

/// Analyze a single pressure field and assemble its record.
///
/// Runs the full masking → minimum → refinement → relative pressure pipeline for one time
/// step. Returns `AslError::EmptySector` when masking leaves nothing to search.
pub fn analyze_field(
    grid: &Grid,
    field: &PressureField,
    mask: &LandSeaMask,
    sector: &Sector,
    time: NaiveDateTime,
) -> Result<LowCenterRecord> {
    let masked = mask_sector(grid, field, mask, sector)?;
    let (row, col, discrete_min) = locate_minimum(&masked)?;
    let (lon, lat, central_pressure) = refine_low(grid, field, row, col);
    let mean = sector_mean(&masked)?;

    debug!(
        "{}: discrete minimum {:.1} hPa at ({}, {}), refined to ({:.3}, {:.3}) {:.1} hPa",
        time,
        discrete_min.unpack(),
        row,
        col,
        lon,
        lat,
        central_pressure.unpack()
    );

    Ok(LowCenterRecord::new(time, lon, lat, central_pressure, mean))
}

/// Compute the ASL index series over all requested time steps.
///
/// Time steps are sorted ascending, processed in parallel, and reassembled in time order,
/// each step depends only on its own field plus the shared read-only mask and sector. A step
/// with an empty sector or a failed retrieval becomes a gap record and the run continues;
/// structural problems (shape mismatches, malformed grids) abort the whole run since no time
/// step could succeed.
///
/// # Examples
///
/// ```rust
/// use asl_index::{
///     calculate_series, AslError, Grid, GridSource, LandSeaMask, PressureField, Sector,
/// };
/// use chrono::{NaiveDate, NaiveDateTime};
/// use ndarray::Array2;
///
/// struct Uniform(Grid);
///
/// impl GridSource for Uniform {
///     fn grid(&self) -> &Grid {
///         &self.0
///     }
///
///     fn pressure_field(&self, _time: NaiveDateTime) -> Result<PressureField, AslError> {
///         PressureField::new(&self.0, Array2::from_elem(self.0.shape(), 990.0))
///     }
/// }
///
/// let grid = Grid::new(vec![200.0, 210.0, 220.0], vec![-70.0, -75.0, -80.0]).unwrap();
/// let mask = LandSeaMask::all_sea(&grid);
/// let source = Uniform(grid.clone());
/// let times = vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()];
///
/// let series = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
/// assert_eq!(series.len(), 1);
/// assert_eq!(series.gap_count(), 0);
/// ```
pub fn calculate_series<S: GridSource>(
    source: &S,
    mask: &LandSeaMask,
    sector: &Sector,
    time_steps: &[NaiveDateTime],
) -> Result<AslIndexSeries> {
    let grid = source.grid();
    grid.check_shape(mask.shape())?;

    let mut times: Vec<NaiveDateTime> = time_steps.to_vec();
    times.sort_unstable();

    let records: Vec<LowCenterRecord> = times
        .par_iter()
        .map(|&time| process_step(source, grid, mask, sector, time))
        .collect::<Result<Vec<_>>>()?;

    let series = AslIndexSeries { records };
    info!(
        "processed {} time steps, {} gaps",
        series.len(),
        series.gap_count()
    );

    Ok(series)
}

// One time step: fetch the field, analyze it, downgrade per-step failures to gap records.
fn process_step<S: GridSource>(
    source: &S,
    grid: &Grid,
    mask: &LandSeaMask,
    sector: &Sector,
    time: NaiveDateTime,
) -> Result<LowCenterRecord> {
    let field = match source.pressure_field(time) {
        Ok(field) => field,
        Err(AslError::Source(msg)) => {
            warn!("{}: retrieval failed, recording a gap: {}", time, msg);
            return Ok(LowCenterRecord::gap(time));
        }
        Err(err) => return Err(err),
    };

    grid.check_shape(field.shape())?;

    match analyze_field(grid, &field, mask, sector, time) {
        Ok(record) => Ok(record),
        Err(AslError::EmptySector) => {
            warn!("{}: sector is entirely masked, recording a gap", time);
            Ok(LowCenterRecord::gap(time))
        }
        Err(err) => Err(err),
    }
}

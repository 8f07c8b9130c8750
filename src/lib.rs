#![warn(missing_docs)]
//! Detection of the Amundsen Sea Low (ASL) from gridded mean sea level pressure.
//!
//! For each time step of an MSLP field this crate masks the data to a Southern Ocean search
//! sector with land excluded, finds the grid cell of lowest pressure, refines the low's
//! position and central pressure to sub-grid resolution with local quadratic fits, and
//! reports the relative central pressure, the refined pressure minus the sector mean, which
//! isolates the low's own dynamics from broad-scale pressure shifts. Records over a period
//! assemble into an [`AslIndexSeries`].
//!
//! The pipeline is a chain of pure functions over immutable inputs, so time steps are
//! processed in parallel; see [`calculate_series`]. A single field can be analyzed directly:
//!
//! ```rust
//! use asl_index::{analyze_field, Grid, LandSeaMask, PressureField, Sector};
//! use chrono::NaiveDate;
//! use ndarray::arr2;
//!
//! let grid = Grid::new(vec![200.0, 210.0, 220.0], vec![-70.0, -75.0, -80.0])?;
//! let field = PressureField::new(
//!     &grid,
//!     arr2(&[
//!         [965.0, 965.0, 965.0],
//!         [965.0, 960.0, 965.0],
//!         [965.0, 965.0, 965.0],
//!     ]),
//! )?;
//! let mask = LandSeaMask::all_sea(&grid);
//! let sector = Sector::new(190.0, 230.0, -85.0, -65.0, 0.5)?;
//! let time = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(0, 0, 0)
//!     .unwrap();
//!
//! let record = analyze_field(&grid, &field, &mask, &sector, time)?;
//! assert_eq!(record.lon.unpack(), 210.0);
//! assert_eq!(record.lat.unpack(), -75.0);
//! # Ok::<(), asl_index::AslError>(())
//! ```

//
// API
//
pub use crate::{
    error::{AslError, Result},
    grid::{Grid, LandSeaMask, PressureField},
    index::{relative_pressure, sector_mean, LowCenterRecord, Season},
    minima::locate_minimum,
    output::{to_csv, write_csv, Column},
    refine::refine_low,
    sector::{mask_sector, MaskedField, Sector},
    series::{analyze_field, calculate_series, AslIndexSeries, GridSource},
};

/// Version tag of the detection method, written into CSV output so results stay traceable
/// to the calculation that produced them.
pub const CALCULATION_VERSION: &str = "v3";

pub mod error;
pub mod grid;
pub mod index;
pub mod minima;
pub mod output;
pub mod refine;
pub mod sector;
pub mod series;

#[cfg(test)]
mod test_data;

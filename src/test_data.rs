//! Shared builders for synthetic grids and fields used across the unit tests.
use crate::{
    grid::{Grid, PressureField},
    sector::Sector,
};
use chrono::{NaiveDate, NaiveDateTime};
use ndarray::{arr2, Array2};

/// The 3x3 grid from the worked example: lons {200, 210, 220}, lats {-70, -75, -80}.
pub fn test_grid() -> Grid {
    Grid::new(vec![200.0, 210.0, 220.0], vec![-70.0, -75.0, -80.0]).unwrap()
}

/// A bowl with a 960 hPa minimum at the central cell (210°E, 75°S), 965 hPa elsewhere.
pub fn bowl_field(grid: &Grid) -> PressureField {
    PressureField::new(
        grid,
        arr2(&[
            [965.0, 965.0, 965.0],
            [965.0, 960.0, 965.0],
            [965.0, 965.0, 965.0],
        ]),
    )
    .unwrap()
}

/// A field holding the same pressure everywhere.
pub fn constant_field(grid: &Grid, hpa: f64) -> PressureField {
    PressureField::new(grid, Array2::from_elem(grid.shape(), hpa)).unwrap()
}

/// A sector comfortably containing the whole test grid.
pub fn wide_sector() -> Sector {
    Sector::new(190.0, 230.0, -85.0, -65.0, 0.5).unwrap()
}

/// Midnight on the first of the given month.
pub fn test_time(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

//! The coordinate grid and the gridded fields defined on it.
//!
//! All of the analysis assumes a rectangular latitude/longitude lattice with uniform spacing
//! along each axis. That assumption is what makes the neighbor-offset arithmetic in the
//! sub-grid refinement well defined, so it is checked once here, at construction, and never
//! again.
use crate::error::{AslError, Result};
use metfor::HectoPascal;
use ndarray::Array2;

// Relative tolerance when checking that coordinate spacing is uniform.
const SPACING_TOL: f64 = 1.0e-6;

/// An immutable latitude/longitude lattice.
///
/// Rows of a co-indexed field correspond to latitudes and columns to longitudes. Either axis
/// may run ascending or descending, but each must be strictly monotonic with constant step.
///
/// # Examples
///
/// ```rust
/// use asl_index::Grid;
///
/// let grid = Grid::new(vec![200.0, 210.0, 220.0], vec![-70.0, -75.0, -80.0]).unwrap();
/// assert_eq!(grid.shape(), (3, 3));
/// assert_eq!(grid.lon_step(), 10.0);
/// assert_eq!(grid.lat_step(), -5.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    lons: Vec<f64>,
    lats: Vec<f64>,
    lon_step: f64,
    lat_step: f64,
}

impl Grid {
    /// Create a new grid, validating both coordinate axes.
    ///
    /// Returns `AslError::MalformedGrid` if either axis has fewer than two points, is not
    /// strictly monotonic, or is not uniformly spaced.
    pub fn new(lons: Vec<f64>, lats: Vec<f64>) -> Result<Self> {
        let lon_step = uniform_step(&lons, "non-uniform longitude spacing")?;
        let lat_step = uniform_step(&lats, "non-uniform latitude spacing")?;

        Ok(Grid {
            lons,
            lats,
            lon_step,
            lat_step,
        })
    }

    /// The longitude values, in degrees east, one per column.
    #[inline]
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// The latitude values, in degrees north, one per row.
    #[inline]
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Signed longitude spacing in degrees.
    #[inline]
    pub fn lon_step(&self) -> f64 {
        self.lon_step
    }

    /// Signed latitude spacing in degrees.
    #[inline]
    pub fn lat_step(&self) -> f64 {
        self.lat_step
    }

    /// Shape of any co-indexed field as (rows, cols) = (n lats, n lons).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.lats.len(), self.lons.len())
    }

    pub(crate) fn check_shape(&self, actual: (usize, usize)) -> Result<()> {
        if actual == self.shape() {
            Ok(())
        } else {
            Err(AslError::ShapeMismatch {
                expected: self.shape(),
                actual,
            })
        }
    }
}

fn uniform_step(coords: &[f64], non_uniform_msg: &'static str) -> Result<f64> {
    if coords.len() < 2 {
        return Err(AslError::MalformedGrid("axis needs at least two points"));
    }

    let step = coords[1] - coords[0];
    if step == 0.0 {
        return Err(AslError::MalformedGrid("axis is not strictly monotonic"));
    }

    let tol = step.abs() * SPACING_TOL;
    for pair in coords.windows(2) {
        if (pair[1] - pair[0] - step).abs() > tol {
            return Err(AslError::MalformedGrid(non_uniform_msg));
        }
    }

    Ok(step)
}

/// A single time step of mean sea level pressure on a [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct PressureField {
    values: Array2<HectoPascal>,
}

impl PressureField {
    /// Build a field from pressures already in hectopascals.
    ///
    /// The array shape must match the grid, (n lats, n lons).
    pub fn new(grid: &Grid, values_hpa: Array2<f64>) -> Result<Self> {
        grid.check_shape(values_hpa.dim())?;

        Ok(PressureField {
            values: values_hpa.mapv(HectoPascal),
        })
    }

    /// Build a field from pressures in pascals, as reanalysis archives store MSLP.
    pub fn from_pascals(grid: &Grid, values_pa: Array2<f64>) -> Result<Self> {
        Self::new(grid, values_pa.mapv(|p| p / 100.0))
    }

    /// The pressure values, co-indexed with the grid.
    #[inline]
    pub fn values(&self) -> &Array2<HectoPascal> {
        &self.values
    }

    /// The value at a single cell, panics if out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> HectoPascal {
        self.values[(row, col)]
    }

    /// Shape as (rows, cols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

/// The static land/sea mask shared by every time step.
///
/// Cells hold a land fraction in [0, 1]; zero is open sea. Loaded once and reused read-only,
/// so it can be shared freely across worker threads.
#[derive(Clone, Debug, PartialEq)]
pub struct LandSeaMask {
    fractions: Array2<f64>,
}

impl LandSeaMask {
    /// Build a mask of land fractions, validating shape and value range.
    pub fn new(grid: &Grid, fractions: Array2<f64>) -> Result<Self> {
        grid.check_shape(fractions.dim())?;

        if fractions.iter().any(|&f| !(0.0..=1.0).contains(&f)) {
            return Err(AslError::MalformedGrid("land fraction outside [0, 1]"));
        }

        Ok(LandSeaMask { fractions })
    }

    /// Build an all-sea mask, handy when no mask data is available.
    pub fn all_sea(grid: &Grid) -> Self {
        LandSeaMask {
            fractions: Array2::zeros(grid.shape()),
        }
    }

    /// Land fraction at a single cell.
    #[inline]
    pub fn fraction(&self, row: usize, col: usize) -> f64 {
        self.fractions[(row, col)]
    }

    /// Shape as (rows, cols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.fractions.dim()
    }
}

//! The search sector and the masking step that applies it.
//!
//! Masking is the first stage of the per-time-step pipeline. It combines the geographic
//! sector bounds with the land/sea mask and produces a field where every cell that must not
//! participate in the minimum search is marked missing.
use crate::{
    error::{AslError, Result},
    grid::{Grid, LandSeaMask, PressureField},
};
use itertools::Itertools;
use metfor::HectoPascal;
use ndarray::Array2;
use optional::{none, some, Optioned};

/// The geographic sector searched for the low, plus the land exclusion threshold.
///
/// Longitudes are normalized into [0, 360) degrees east; a sector whose normalized western
/// bound is greater than its eastern bound is taken to cross the 0°/360° meridian. Immutable
/// for the whole run.
///
/// # Examples
///
/// ```rust
/// use asl_index::Sector;
///
/// // The Amundsen Sea sector from the published ASL index definition.
/// let sector = Sector::asl();
/// assert!(sector.contains(245.0, -72.0));
/// assert!(!sector.contains(245.0, -50.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sector {
    lon_min: f64,
    lon_max: f64,
    lat_min: f64,
    lat_max: f64,
    land_threshold: f64,
}

impl Sector {
    /// Create a sector from bounds in degrees and a land-fraction threshold in [0, 1].
    ///
    /// Cells whose land fraction exceeds the threshold are excluded from the search.
    /// Latitude bounds must satisfy `lat_min < lat_max`. Longitude bounds may be given in
    /// either the [-180, 180) or [0, 360) convention and must not normalize to the same
    /// value.
    pub fn new(
        lon_min: f64,
        lon_max: f64,
        lat_min: f64,
        lat_max: f64,
        land_threshold: f64,
    ) -> Result<Self> {
        if lat_min >= lat_max {
            return Err(AslError::InvalidSector("latitude bounds must be min < max"));
        }
        if !(0.0..=1.0).contains(&land_threshold) {
            return Err(AslError::InvalidSector("land threshold must be in [0, 1]"));
        }

        let lon_min = normalize_lon(lon_min);
        let lon_max = normalize_lon(lon_max);
        if lon_min == lon_max {
            return Err(AslError::InvalidSector(
                "longitude bounds normalize to the same value",
            ));
        }

        Ok(Sector {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
            land_threshold,
        })
    }

    /// The Amundsen Sea sector, 170°E–298°E and 80°S–60°S, with a 0.5 land threshold.
    pub fn asl() -> Self {
        // Bounds from Hosking et al. 2016.
        Sector {
            lon_min: 170.0,
            lon_max: 298.0,
            lat_min: -80.0,
            lat_max: -60.0,
            land_threshold: 0.5,
        }
    }

    /// Whether a point lies inside the sector bounds. Longitude in any convention.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }

        let lon = normalize_lon(lon);
        if self.lon_min < self.lon_max {
            lon >= self.lon_min && lon <= self.lon_max
        } else {
            // Sector crosses the 0/360 meridian.
            lon >= self.lon_min || lon <= self.lon_max
        }
    }

    /// The land-fraction threshold above which a cell is excluded.
    #[inline]
    pub fn land_threshold(&self) -> f64 {
        self.land_threshold
    }
}

/// Normalize a longitude into [0, 360) degrees east.
#[inline]
pub(crate) fn normalize_lon(lon: f64) -> f64 {
    let lon = lon % 360.0;
    if lon < 0.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// A pressure field with land and out-of-sector cells marked missing.
///
/// Derived per time step, this is the only view the minimum search and the sector mean ever
/// see, so neither of them needs to know about the sector or the mask.
#[derive(Clone, Debug)]
pub struct MaskedField {
    values: Array2<Optioned<HectoPascal>>,
}

impl MaskedField {
    /// The masked values, missing where a cell is excluded.
    #[inline]
    pub fn values(&self) -> &Array2<Optioned<HectoPascal>> {
        &self.values
    }

    /// Iterate the valid cells in row-major order as ((row, col), pressure).
    pub fn iter_valid(&self) -> impl Iterator<Item = ((usize, usize), HectoPascal)> + '_ {
        self.values
            .indexed_iter()
            .filter_map(|(idx, p)| p.into_option().map(|p| (idx, p)))
    }

    /// Number of valid cells.
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.is_some()).count()
    }

    /// Shape as (rows, cols).
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }
}

/// Restrict a pressure field to the sector, excluding land.
///
/// A cell is kept when its coordinates fall inside the sector bounds and its land fraction
/// is at or below the sector's threshold. Returns `AslError::EmptySector` when nothing
/// survives, an arbitrary minimum from an all-masked field would be meaningless.
pub fn mask_sector(
    grid: &Grid,
    field: &PressureField,
    mask: &LandSeaMask,
    sector: &Sector,
) -> Result<MaskedField> {
    grid.check_shape(field.shape())?;
    grid.check_shape(mask.shape())?;

    let lat_points = grid.lats().iter().enumerate();
    let lon_points = grid.lons().iter().enumerate();

    let mut values = Array2::from_elem(grid.shape(), none());
    for ((row, &lat), (col, &lon)) in lat_points.cartesian_product(lon_points) {
        let sea = mask.fraction(row, col) <= sector.land_threshold();
        if sea && sector.contains(lon, lat) {
            values[(row, col)] = some(field.get(row, col));
        }
    }

    let masked = MaskedField { values };
    if masked.valid_count() == 0 {
        Err(AslError::EmptySector)
    } else {
        Ok(masked)
    }
}

//! End-to-end tests of the series pipeline on synthetic pressure fields.
use asl_index::{
    analyze_field, calculate_series, write_csv, AslError, Grid, GridSource, LandSeaMask,
    PressureField, Result, Sector,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use metfor::Quantity;
use ndarray::Array2;

/// A 5° grid covering the whole ASL search region with some margin.
fn asl_grid() -> Grid {
    let lons: Vec<f64> = (0..31).map(|i| 160.0 + 5.0 * i as f64).collect();
    let lats: Vec<f64> = (0..7).map(|i| -55.0 - 5.0 * i as f64).collect();
    Grid::new(lons, lats).unwrap()
}

/// A separable paraboloid low centered at (lon0, lat0) with 980 hPa at the bottom.
///
/// Because the surface is exactly quadratic along each axis, the sub-grid refinement must
/// recover the center and the 980 hPa vertex value to floating point accuracy whenever the
/// center is within a grid step of the discrete minimum.
fn paraboloid(grid: &Grid, lon0: f64, lat0: f64) -> PressureField {
    let lons = grid.lons().to_vec();
    let lats = grid.lats().to_vec();
    let values = Array2::from_shape_fn(grid.shape(), |(row, col)| {
        let dx = lons[col] - lon0;
        let dy = lats[row] - lat0;
        980.0 + 0.02 * dx * dx + 0.05 * dy * dy
    });
    PressureField::new(grid, values).unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn month(m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, m, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Supplies a low that drifts slowly eastward month by month; one month can be configured
/// to fail retrieval.
struct DriftingLow {
    grid: Grid,
    failing_month: Option<u32>,
}

impl DriftingLow {
    fn center_for(&self, time: NaiveDateTime) -> (f64, f64) {
        let m = time.month() as f64;
        (240.0 + 1.3 * m, -71.4)
    }
}

impl GridSource for DriftingLow {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    fn pressure_field(&self, time: NaiveDateTime) -> Result<PressureField> {
        if Some(time.month()) == self.failing_month {
            return Err(AslError::Source("simulated archive outage".to_owned()));
        }
        let (lon0, lat0) = self.center_for(time);
        Ok(paraboloid(&self.grid, lon0, lat0))
    }
}

#[test]
fn full_series_tracks_the_drifting_low() {
    init_logging();
    let source = DriftingLow {
        grid: asl_grid(),
        failing_month: None,
    };
    let mask = LandSeaMask::all_sea(source.grid());
    let times: Vec<_> = (1..=12).map(month).collect();

    let series = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series.gap_count(), 0);

    for record in series.records() {
        let (lon0, lat0) = source.center_for(record.time);
        // Exact recovery on a quadratic surface.
        assert!((record.lon.unpack() - lon0).abs() < 1.0e-9);
        assert!((record.lat.unpack() - lat0).abs() < 1.0e-9);
        assert!((record.actual_central_pressure.unpack().unpack() - 980.0).abs() < 1.0e-9);
        // The low is the deepest point in the sector, so the relative pressure is negative.
        assert!(record.relative_central_pressure.unpack().unpack() < 0.0);
        assert!(Sector::asl().contains(record.lon.unpack(), record.lat.unpack()));
    }
}

#[test]
fn failed_months_leave_gaps_and_keep_the_calendar_aligned() {
    init_logging();
    let source = DriftingLow {
        grid: asl_grid(),
        failing_month: Some(6),
    };
    let mask = LandSeaMask::all_sea(source.grid());
    let times: Vec<_> = (1..=12).map(month).collect();

    let series = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series.gap_count(), 1);

    for (record, time) in series.records().iter().zip(times.iter()) {
        assert_eq!(record.time, *time);
        assert_eq!(record.is_gap(), time.month() == 6);
    }
}

#[test]
fn fully_land_masked_sector_is_a_gap_not_an_abort() {
    let grid = asl_grid();
    let source = DriftingLow {
        grid: grid.clone(),
        failing_month: None,
    };
    let mask = LandSeaMask::new(&grid, Array2::ones(grid.shape())).unwrap();

    let series =
        calculate_series(&source, &mask, &Sector::asl(), &[month(1), month(2)]).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.gap_count(), 2);
}

#[test]
fn two_runs_produce_identical_series() {
    let source = DriftingLow {
        grid: asl_grid(),
        failing_month: None,
    };
    let mask = LandSeaMask::all_sea(source.grid());
    let times: Vec<_> = (1..=12).map(month).collect();

    let a = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
    let b = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
    assert_eq!(a, b);
}

#[test]
fn refined_position_stays_within_one_grid_step_of_the_discrete_minimum() {
    let grid = asl_grid();
    // Center deliberately off-grid by less than half a step on each axis.
    let field = paraboloid(&grid, 241.9, -72.6);
    let mask = LandSeaMask::all_sea(&grid);

    let record = analyze_field(&grid, &field, &mask, &Sector::asl(), month(1)).unwrap();

    // Nearest grid point is (240, -75)...(240, -70); either way the refined position may
    // not leave the neighborhood of the discrete minimum.
    let lon = record.lon.unpack();
    let lat = record.lat.unpack();
    let nearest_lon = grid
        .lons()
        .iter()
        .cloned()
        .min_by(|a, b| (a - lon).abs().partial_cmp(&(b - lon).abs()).unwrap())
        .unwrap();
    let nearest_lat = grid
        .lats()
        .iter()
        .cloned()
        .min_by(|a, b| (a - lat).abs().partial_cmp(&(b - lat).abs()).unwrap())
        .unwrap();
    assert!((lon - nearest_lon).abs() <= grid.lon_step().abs());
    assert!((lat - nearest_lat).abs() <= grid.lat_step().abs());
}

#[test]
fn csv_output_has_one_line_per_record() {
    let source = DriftingLow {
        grid: asl_grid(),
        failing_month: Some(3),
    };
    let mask = LandSeaMask::all_sea(source.grid());
    let times: Vec<_> = (1..=4).map(month).collect();

    let series = calculate_series(&source, &mask, &Sector::asl(), &times).unwrap();
    let mut buf = Vec::new();
    write_csv(&series, &mut buf).unwrap();

    let text = String::from_utf8(buf).unwrap();
    // Version comment, header, then one line per time step.
    assert_eq!(text.lines().count(), 2 + series.len());
}

//! Sub-grid refinement of the low center by local quadratic fits.
//!
//! The true center of a low rarely sits exactly on a grid point. Fitting a parabola through
//! the discrete minimum and its two neighbors along each axis gives a continuous estimate of
//! the center that is materially better than the raw grid resolution.
//!
//! The two axes are treated independently. For neighbor pressures p⁻, p⁰, p⁺ at offsets
//! −1, 0, +1 grid steps, the vertex of the interpolating parabola sits at
//!
//! ```text
//! t = 0.5 (p⁻ − p⁺) / (p⁻ − 2 p⁰ + p⁺)
//! ```
//!
//! in grid-step units. The offset is clamped to [−1, +1] so a near-flat or saddle-shaped
//! neighborhood cannot throw the estimate outside the neighborhood it was fit to. The
//! refined pressure is the center value plus the vertex drop of each parabola evaluated at
//! its own (clamped) offset, which keeps the reported central pressure consistent with the
//! reported position.
use crate::grid::{Grid, PressureField};
use metfor::{HectoPascal, Quantity};

// Denominators smaller than this are treated as a degenerate (flat) fit.
const DEGENERATE_EPS: f64 = 1.0e-10;

/// Refine the location and value of a discrete minimum to sub-grid resolution.
///
/// `row` and `col` identify the discrete minimum in `field`. If the minimum sits on a grid
/// boundary along an axis, refinement is skipped for that axis and the raw grid coordinate
/// is used there instead. Never fails: a degenerate quadratic simply falls back to the grid
/// point.
///
/// Returns (longitude, latitude, central pressure).
pub fn refine_low(
    grid: &Grid,
    field: &PressureField,
    row: usize,
    col: usize,
) -> (f64, f64, HectoPascal) {
    let (nrows, ncols) = field.shape();
    let p_center = field.get(row, col);

    let (lon_offset, lon_drop) = if col > 0 && col + 1 < ncols {
        parabola_vertex(
            field.get(row, col - 1),
            p_center,
            field.get(row, col + 1),
        )
    } else {
        (0.0, 0.0)
    };

    let (lat_offset, lat_drop) = if row > 0 && row + 1 < nrows {
        parabola_vertex(
            field.get(row - 1, col),
            p_center,
            field.get(row + 1, col),
        )
    } else {
        (0.0, 0.0)
    };

    let lon = grid.lons()[col] + lon_offset * grid.lon_step();
    let lat = grid.lats()[row] + lat_offset * grid.lat_step();
    let pressure = HectoPascal(p_center.unpack() + lon_drop + lat_drop);

    (lon, lat, pressure)
}

/// The vertex offset in grid-step units, clamped to [−1, +1], and the pressure change from
/// the center value when the parabola is evaluated at that offset.
fn parabola_vertex(p_minus: HectoPascal, p_center: HectoPascal, p_plus: HectoPascal) -> (f64, f64) {
    let pm = p_minus.unpack();
    let p0 = p_center.unpack();
    let pp = p_plus.unpack();

    // Second difference, twice the parabola's leading coefficient.
    let curvature = pm - 2.0 * p0 + pp;
    if curvature.abs() < DEGENERATE_EPS {
        return (0.0, 0.0);
    }

    let offset = (0.5 * (pm - pp) / curvature).max(-1.0).min(1.0);
    let drop = 0.5 * (pp - pm) * offset + 0.5 * curvature * offset * offset;

    (offset, drop)
}

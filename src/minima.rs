//! Locating the discrete pressure minimum in a masked sector field.
use crate::{
    error::{AslError, Result},
    sector::MaskedField,
};
use metfor::HectoPascal;

/// Find the valid cell with the lowest pressure.
///
/// Returns the cell's (row, col) and its pressure. Ties are broken deterministically in
/// favor of the first occurrence in row-major scan order, so repeated runs over identical
/// data always pick the same cell. Returns `AslError::EmptySector` if no cell is valid.
pub fn locate_minimum(masked: &MaskedField) -> Result<(usize, usize, HectoPascal)> {
    masked.iter_valid().fold(
        Err(AslError::EmptySector),
        |acc: Result<_>, ((row, col), p)| match acc {
            // Strict comparison keeps the earliest cell on ties.
            Ok((_, _, lowest)) if p < lowest => Ok((row, col, p)),
            Ok(_) => acc,
            Err(_) => Ok((row, col, p)),
        },
    )
}

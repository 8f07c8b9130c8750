//! Error types for the asl-index crate.

/// Error type for the crate.
#[derive(Clone, PartialEq, Debug)]
pub enum AslError {
    /// No valid (sea, in-sector) cells remained after masking for a time step.
    EmptySector,
    /// The grid coordinates are unusable: non-monotonic, non-uniform spacing, or too short.
    MalformedGrid(&'static str),
    /// A field or mask does not share its shape with the grid it is paired with.
    ShapeMismatch {
        /// Shape implied by the grid, (rows, cols).
        expected: (usize, usize),
        /// Shape of the offending array, (rows, cols).
        actual: (usize, usize),
    },
    /// The sector bounds or land-fraction threshold failed validation.
    InvalidSector(&'static str),
    /// A `GridSource` failed to supply a pressure field.
    Source(String),
    /// Writing the result series failed.
    Output(String),
}

impl std::fmt::Display for AslError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use AslError::*;

        match self {
            EmptySector => write!(f, "no valid cells in sector, cannot locate a low"),
            MalformedGrid(msg) => write!(f, "malformed grid: {}", msg),
            ShapeMismatch { expected, actual } => write!(
                f,
                "array shape {:?} does not match grid shape {:?}",
                actual, expected
            ),
            InvalidSector(msg) => write!(f, "invalid sector configuration: {}", msg),
            Source(msg) => write!(f, "grid source error: {}", msg),
            Output(msg) => write!(f, "output error: {}", msg),
        }
    }
}

impl std::error::Error for AslError {}

impl From<csv::Error> for AslError {
    fn from(err: csv::Error) -> Self {
        AslError::Output(err.to_string())
    }
}

/// Shorthand for results.
pub type Result<T> = std::result::Result<T, AslError>;

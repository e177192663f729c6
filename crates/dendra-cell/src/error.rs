//! Error types for cable cell construction.

use std::fmt;

/// Errors arising from cell construction, painting or placement.
#[derive(Clone, Debug, PartialEq)]
pub enum CellError {
    /// A placement names a branch that does not exist or a position
    /// outside `[0, 1]`.
    LocationOutOfRange {
        /// Branch id of the offending location.
        branch: usize,
        /// Position along the branch.
        pos: f64,
    },
    /// Cable geometry arrays are inconsistent: fewer than two radii, a
    /// length count that does not match, a non-positive dimension, or a
    /// zero compartment count.
    InvalidGeometry {
        /// What is wrong with the geometry.
        reason: String,
    },
    /// A cable was attached under a parent index that does not exist.
    InvalidParent {
        /// The requested parent segment.
        parent: usize,
        /// Number of segments in the cell.
        num_segments: usize,
    },
    /// A morphology could not be converted into a cell.
    InvalidMorphology {
        /// What is wrong with the morphology.
        reason: String,
    },
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocationOutOfRange { branch, pos } => {
                write!(f, "location (branch {branch}, pos {pos}) is out of range")
            }
            Self::InvalidGeometry { reason } => write!(f, "invalid cable geometry: {reason}"),
            Self::InvalidParent { parent, num_segments } => {
                write!(
                    f,
                    "parent segment {parent} out of range for cell with {num_segments} segments"
                )
            }
            Self::InvalidMorphology { reason } => write!(f, "invalid morphology: {reason}"),
        }
    }
}

impl std::error::Error for CellError {}

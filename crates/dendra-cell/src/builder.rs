//! Fluent construction of soma-plus-branches cells.

use crate::cell::CableCell;
use crate::error::CellError;
use crate::segment::CableSegment;
use dendra_core::Value;

/// Builds a [`CableCell`] from a soma radius and a sequence of
/// two-point frustum branches.
///
/// Branch ids are segment indices: the soma is branch 0, the first
/// added branch is 1, and so on.
///
/// # Examples
///
/// ```
/// use dendra_cell::SomaCellBuilder;
///
/// let mut builder = SomaCellBuilder::new(7.0);
/// let b1 = builder.add_branch(0, 200.0, 0.5, 0.5, 4, "dend").unwrap();
/// let b2 = builder.add_branch(b1, 300.0, 0.4, 0.4, 4, "dend").unwrap();
/// builder.add_branch(b1, 180.0, 0.35, 0.35, 4, "dend").unwrap();
/// let cell = builder.make_cell();
/// assert_eq!(cell.num_segments(), 4);
/// assert_eq!(cell.parents(), &[0, 0, 1, 1]);
/// assert_eq!(b2, 2);
/// ```
#[derive(Clone, Debug)]
pub struct SomaCellBuilder {
    soma_radius: Value,
    branches: Vec<(usize, CableSegment)>,
}

impl SomaCellBuilder {
    /// Start a cell with a soma of the given radius [µm].
    pub fn new(soma_radius: Value) -> Self {
        Self {
            soma_radius,
            branches: Vec::new(),
        }
    }

    /// Append a branch under `parent`, returning the new branch id.
    ///
    /// The branch is a single frustum of `length` µm tapering from
    /// `r_prox` to `r_dist`, split into `ncomp` compartments and tagged
    /// with `tag`.
    pub fn add_branch(
        &mut self,
        parent: usize,
        length: Value,
        r_prox: Value,
        r_dist: Value,
        ncomp: u32,
        tag: &str,
    ) -> Result<usize, CellError> {
        let num_segments = self.branches.len() + 1;
        if parent >= num_segments {
            return Err(CellError::InvalidParent { parent, num_segments });
        }
        let cable = CableSegment::frustum(length, r_prox, r_dist, ncomp, Some(tag.to_string()))?;
        self.branches.push((parent, cable));
        Ok(num_segments)
    }

    /// Finalize the cell.
    pub fn make_cell(self) -> CableCell {
        let mut cell = CableCell::new(self.soma_radius);
        for (parent, cable) in self.branches {
            cell.add_cable(parent, cable)
                .expect("builder validated branch parents");
        }
        cell
    }
}

//! Flattening of a cell population into control volumes.

use crate::compartment::DividedCable;
use crate::error::FvmError;
use crate::resolve;
use dendra_cell::{CableCell, CableParameters, Segment};
use dendra_core::{math, Index, Size, Value};

/// Per-segment discretization record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentInfo {
    /// The CV the segment hangs off: the junction CV absorbing this
    /// segment's proximal half-compartment. `None` for a root soma.
    pub parent_cv: Option<Index>,
    /// Half-open range of CVs owned by the segment, excluding the
    /// junction CV.
    pub cv_range: (Index, Index),
}

impl SegmentInfo {
    /// Whether the segment hangs off a junction CV.
    pub fn has_parent(&self) -> bool {
        self.parent_cv.is_some()
    }

    /// The most distal CV owned by the segment.
    pub fn distal_cv(&self) -> Index {
        self.cv_range.1 - 1
    }
}

/// The finite-volume discretization of a cell population.
///
/// CVs are numbered contiguously across cells in cell order; within a
/// cell in segment order; within a segment from proximal to distal.
/// All vectors are indexed by CV except `segments`, `cell_cv_part` and
/// `cell_segment_part`.
#[derive(Clone, Debug, PartialEq)]
pub struct Discretization {
    /// Number of cells.
    pub ncell: Size,
    /// Number of control volumes.
    pub ncv: Size,
    /// Proximal neighbour of each CV; roots are their own parent.
    pub parent_cv: Vec<Index>,
    /// Owning cell of each CV.
    pub cv_to_cell: Vec<Index>,
    /// Membrane surface area [µm²].
    pub cv_area: Vec<Value>,
    /// Membrane capacitance [pF].
    pub cv_capacitance: Vec<Value>,
    /// Axial conductance to the parent CV [µS]; 0 for roots.
    pub face_conductance: Vec<Value>,
    /// Representative diameter at the CV centre [µm].
    pub diam_um: Vec<Value>,
    /// Half-open CV range per cell.
    pub cell_cv_part: Vec<(Index, Index)>,
    /// Half-open segment range per cell.
    pub cell_segment_part: Vec<(Size, Size)>,
    /// Per-segment records, across all cells in cell order.
    pub segments: Vec<SegmentInfo>,
}

impl Discretization {
    fn empty() -> Self {
        Self {
            ncell: 0,
            ncv: 0,
            parent_cv: Vec::new(),
            cv_to_cell: Vec::new(),
            cv_area: Vec::new(),
            cv_capacitance: Vec::new(),
            face_conductance: Vec::new(),
            diam_um: Vec::new(),
            cell_cv_part: Vec::new(),
            cell_segment_part: Vec::new(),
            segments: Vec::new(),
        }
    }

    fn push_cv(&mut self, cell: Index) -> Index {
        let cv = self.parent_cv.len() as Index;
        self.parent_cv.push(cv);
        self.cv_to_cell.push(cell);
        self.cv_area.push(0.0);
        self.cv_capacitance.push(0.0);
        self.face_conductance.push(0.0);
        self.diam_um.push(0.0);
        cv
    }

    /// CV owning compartment-boundary node `node` of the segment with
    /// global index `seg`. Node 0 is the proximal junction; node `k`
    /// (for a cable of `N` compartments, `1 <= k <= N`) lies `k/N` along
    /// the cable.
    pub fn segment_node_cv(&self, seg: usize, node: u32) -> Index {
        let info = &self.segments[seg];
        match info.parent_cv {
            None => info.cv_range.0,
            Some(junction) => {
                if node == 0 {
                    junction
                } else {
                    info.cv_range.0 + node - 1
                }
            }
        }
    }
}

/// State of the shared junction CV for cables attached directly to a
/// soma.
struct SomaAttach {
    cv: Index,
    xarea: Value,
    resistivity: Value,
}

/// Discretize a cell population against global electrical defaults.
///
/// Fails if a paint selects an empty region or a required default is
/// absent at every fall-through level.
pub fn discretize(
    cells: &[CableCell],
    global: &CableParameters,
) -> Result<Discretization, FvmError> {
    let mut d = Discretization::empty();

    for (cell_idx, cell) in cells.iter().enumerate() {
        for (region, _) in cell.paints() {
            resolve::region_segments_checked(cell, region)?;
        }

        let seg_lo = d.segments.len();
        let cv_lo = d.parent_cv.len() as Index;
        let soma_cv = cv_lo;
        let mut soma_attach: Option<SomaAttach> = None;

        for (seg_idx, segment) in cell.segments().iter().enumerate() {
            match segment {
                Segment::Soma(soma) => {
                    let cm = resolve::membrane_capacitance(cell, seg_idx, global)?;
                    let cv = d.push_cv(cell_idx as Index);
                    let area = soma.area();
                    d.cv_area[cv as usize] += area;
                    d.cv_capacitance[cv as usize] += area * cm;
                    d.diam_um[cv as usize] = 2.0 * soma.radius;
                    d.segments.push(SegmentInfo {
                        parent_cv: None,
                        cv_range: (cv, cv + 1),
                    });
                }
                Segment::Cable(cable) => {
                    let cm = resolve::membrane_capacitance(cell, seg_idx, global)?;
                    let rl = resolve::axial_resistivity(cell, seg_idx, global)?;
                    let parent_seg = cell.parents()[seg_idx];
                    let n = cable.num_compartments();

                    let junction = if parent_seg == 0 {
                        match &mut soma_attach {
                            Some(att) => {
                                att.xarea += math::area_circle(cable.radii()[0]);
                                att.cv
                            }
                            None => {
                                let j = d.push_cv(cell_idx as Index);
                                d.parent_cv[j as usize] = soma_cv;
                                d.diam_um[j as usize] = 2.0 * cable.radii()[0];
                                soma_attach = Some(SomaAttach {
                                    cv: j,
                                    xarea: math::area_circle(cable.radii()[0]),
                                    resistivity: rl,
                                });
                                j
                            }
                        }
                    } else {
                        d.segments[seg_lo + parent_seg].distal_cv()
                    };

                    let lo = d.parent_cv.len() as Index;
                    for k in 0..n {
                        let cv = d.push_cv(cell_idx as Index);
                        d.parent_cv[cv as usize] = if k == 0 { junction } else { cv - 1 };
                    }
                    d.segments.push(SegmentInfo {
                        parent_cv: Some(junction),
                        cv_range: (lo, lo + n),
                    });

                    let div = DividedCable::by_ends(n, cable.radii(), cable.lengths());
                    let h = div.compartment_length();
                    let node_cv = |node: u32| if node == 0 { junction } else { lo + node - 1 };
                    for k in 0..n {
                        let comp = div.compartment(k as usize);
                        let left_cv = node_cv(k) as usize;
                        let right_cv = node_cv(k + 1) as usize;

                        d.cv_area[left_cv] += comp.left.area;
                        d.cv_capacitance[left_cv] += comp.left.area * cm;
                        d.cv_area[right_cv] += comp.right.area;
                        d.cv_capacitance[right_cv] += comp.right.area * cm;
                        d.diam_um[right_cv] = 2.0 * comp.right.rad_dist;

                        // The face to the proximal neighbour crosses the
                        // compartment-centre plane.
                        let xsec = math::area_circle(comp.left.rad_dist);
                        d.face_conductance[right_cv] = 100.0 * xsec / (h * rl);
                    }
                }
            }
        }

        // Soma-to-junction face: summed proximal cross-sections over the
        // soma centre-to-surface distance.
        if let Some(att) = soma_attach {
            let radius = cell.soma().radius;
            d.face_conductance[att.cv as usize] = 100.0 * att.xarea / (radius * att.resistivity);
        }

        d.cell_cv_part.push((cv_lo, d.parent_cv.len() as Index));
        d.cell_segment_part
            .push((seg_lo as Size, d.segments.len() as Size));
    }

    d.ncell = cells.len() as Size;
    d.ncv = d.parent_cv.len() as Size;
    Ok(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dendra_cell::{Region, SomaCellBuilder};
    use std::f64::consts::PI;

    fn defaults() -> CableParameters {
        CableParameters::neuron_defaults()
    }

    #[test]
    fn lone_soma() {
        let cell = CableCell::new(5.0);
        let d = discretize(&[cell], &defaults()).unwrap();
        assert_eq!(d.ncv, 1);
        assert_eq!(d.parent_cv, vec![0]);
        assert_eq!(d.face_conductance, vec![0.0]);
        assert_relative_eq!(d.cv_area[0], math::area_sphere(5.0));
        assert_relative_eq!(d.cv_capacitance[0], math::area_sphere(5.0) * 0.01);
        assert_relative_eq!(d.diam_um[0], 10.0);
        assert_eq!(d.cell_cv_part, vec![(0, 1)]);
        assert_eq!(d.segments[0].cv_range, (0, 1));
        assert!(!d.segments[0].has_parent());
    }

    #[test]
    fn ball_and_stick_layout() {
        let mut b = SomaCellBuilder::new(6.3);
        b.add_branch(0, 200.0, 0.5, 0.5, 4, "dend").unwrap();
        let cell = b.make_cell();
        let d = discretize(&[cell.clone()], &defaults()).unwrap();

        assert_eq!(d.ncv, 6);
        assert_eq!(d.parent_cv, vec![0, 0, 1, 2, 3, 4]);
        assert_eq!(d.segments[1].parent_cv, Some(1));
        assert_eq!(d.segments[1].cv_range, (2, 6));

        let dend_area = cell.segment(1).area();
        assert_relative_eq!(d.cv_area[1], dend_area / 8.0, max_relative = 1e-12);
        assert_relative_eq!(d.cv_area[2], dend_area / 4.0, max_relative = 1e-12);
        assert_relative_eq!(d.cv_area[5], dend_area / 8.0, max_relative = 1e-12);

        // Total membrane is conserved.
        let total: Value = d.cv_area.iter().sum();
        assert_relative_eq!(total, cell.area(), max_relative = 1e-12);
    }

    #[test]
    fn uniform_face_conductance() {
        let mut b = SomaCellBuilder::new(6.3);
        b.add_branch(0, 100.0, 0.5, 0.5, 4, "dend").unwrap();
        let mut cell = b.make_cell();
        cell.default_parameters.axial_resistivity = Some(90.0);
        let d = discretize(&[cell], &defaults()).unwrap();

        // Interior faces: g = πr²/(h·rL)·100 with h the compartment
        // length.
        let g = 100.0 * PI * 0.25 / (25.0 * 90.0);
        for cv in 2..6 {
            assert_relative_eq!(d.face_conductance[cv], g, max_relative = 1e-12);
        }
    }

    #[test]
    fn node_positions_map_to_cvs() {
        let mut b = SomaCellBuilder::new(6.3);
        b.add_branch(0, 200.0, 0.5, 0.5, 4, "dend").unwrap();
        let cell = b.make_cell();
        let d = discretize(&[cell], &defaults()).unwrap();

        assert_eq!(d.segment_node_cv(0, 0), 0);
        assert_eq!(d.segment_node_cv(1, 0), 1);
        assert_eq!(d.segment_node_cv(1, 1), 2);
        assert_eq!(d.segment_node_cv(1, 4), 5);
    }

    #[test]
    fn empty_region_paint_fails() {
        let mut cell = CableCell::new(5.0);
        cell.paint("axon", dendra_cell::Paintable::MembraneCapacitance(0.02));
        let err = discretize(&[cell], &defaults()).unwrap_err();
        assert_eq!(err, FvmError::EmptyRegion { region: "\"axon\"".into() });
    }

    #[test]
    fn missing_global_default_fails() {
        let cell = CableCell::new(5.0);
        let err = discretize(&[cell], &CableParameters::new()).unwrap_err();
        assert!(matches!(err, FvmError::MissingParameter { .. }));
    }

    #[test]
    fn painted_capacitance_overrides_default() {
        let mut b = SomaCellBuilder::new(6.3);
        b.add_branch(0, 100.0, 0.5, 0.5, 2, "dend").unwrap();
        let mut cell = b.make_cell();
        cell.paint(Region::branch(1), dendra_cell::Paintable::MembraneCapacitance(0.02));
        let d = discretize(&[cell.clone()], &defaults()).unwrap();

        // Junction CV area comes entirely from the dendrite.
        assert_relative_eq!(
            d.cv_capacitance[1],
            d.cv_area[1] * 0.02,
            max_relative = 1e-12
        );
        // Soma keeps the global default.
        assert_relative_eq!(
            d.cv_capacitance[0],
            d.cv_area[0] * 0.01,
            max_relative = 1e-12
        );
    }
}

//! The cable cell: a segment tree with painted properties and placed
//! point items.

use crate::error::CellError;
use crate::mechanism::MechanismDesc;
use crate::parameters::CableParameters;
use crate::segment::{CableSegment, Segment, SomaSegment};
use dendra_core::Value;
use dendra_morph::{Morphology, Tree, NPOS};
use indexmap::IndexMap;
use std::fmt;

/// Selects a set of segments for painting.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    /// Every segment of the cell.
    All,
    /// Segments carrying a given tag; somata implicitly match `"soma"`.
    Tagged(String),
    /// A single segment by index.
    Branch(usize),
}

impl Region {
    /// Region selecting one branch.
    pub fn branch(id: usize) -> Self {
        Self::Branch(id)
    }

    /// Region selecting a tag.
    pub fn tagged(name: impl Into<String>) -> Self {
        Self::Tagged(name.into())
    }
}

impl From<&str> for Region {
    fn from(name: &str) -> Self {
        Self::Tagged(name.to_string())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "(all)"),
            Self::Tagged(name) => write!(f, "\"{name}\""),
            Self::Branch(id) => write!(f, "(branch {id})"),
        }
    }
}

/// A property that can be painted onto a region.
#[derive(Clone, Debug, PartialEq)]
pub enum Paintable {
    /// A density mechanism with optional parameter overrides.
    Mechanism(MechanismDesc),
    /// Specific membrane capacitance override [F/m²].
    MembraneCapacitance(Value),
    /// Axial resistivity override [Ω·cm].
    AxialResistivity(Value),
    /// Initial internal concentration override [mM].
    InitIntConcentration {
        /// Ion species.
        ion: String,
        /// Concentration value.
        value: Value,
    },
    /// Initial external concentration override [mM].
    InitExtConcentration {
        /// Ion species.
        ion: String,
        /// Concentration value.
        value: Value,
    },
    /// Initial reversal potential override [mV].
    InitReversalPotential {
        /// Ion species.
        ion: String,
        /// Potential value.
        value: Value,
    },
}

impl From<MechanismDesc> for Paintable {
    fn from(desc: MechanismDesc) -> Self {
        Self::Mechanism(desc)
    }
}

impl From<&str> for Paintable {
    fn from(name: &str) -> Self {
        Self::Mechanism(MechanismDesc::new(name))
    }
}

/// A point on the cell: a branch id plus a relative position along it.
///
/// Position 0 is the proximal end (towards the root), 1 the distal end.
/// Branch 0 is the soma; any position on it refers to the soma itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// Branch (segment) index.
    pub branch: usize,
    /// Relative position in `[0, 1]` by arc length.
    pub pos: Value,
}

impl Location {
    /// Construct a location.
    pub fn new(branch: usize, pos: Value) -> Self {
        Self { branch, pos }
    }
}

/// A point item that can be placed at a [`Location`].
#[derive(Clone, Debug, PartialEq)]
pub enum Placeable {
    /// A point mechanism (a synapse) with optional parameter overrides.
    Mechanism(MechanismDesc),
    /// A spike threshold detector.
    ThresholdDetector {
        /// Trigger voltage [mV].
        threshold: Value,
    },
    /// A current clamp stimulus.
    CurrentClamp {
        /// Onset time [ms].
        delay: Value,
        /// Duration [ms].
        duration: Value,
        /// Amplitude [nA].
        amplitude: Value,
    },
}

impl From<MechanismDesc> for Placeable {
    fn from(desc: MechanismDesc) -> Self {
        Self::Mechanism(desc)
    }
}

impl From<&str> for Placeable {
    fn from(name: &str) -> Self {
        Self::Mechanism(MechanismDesc::new(name))
    }
}

/// A high-level cell description: a soma-rooted tree of segments,
/// painted biophysics and placed point items.
///
/// # Examples
///
/// ```
/// use dendra_cell::{CableCell, CableSegment, Location, Region};
///
/// let mut cell = CableCell::new(6.3);
/// let dend = cell
///     .add_cable(0, CableSegment::frustum(200.0, 0.5, 0.5, 4, Some("dend".into())).unwrap())
///     .unwrap();
/// cell.paint("soma", "hh");
/// cell.paint("dend", "pas");
/// cell.place(Location::new(dend, 0.5), "expsyn").unwrap();
/// assert_eq!(cell.num_segments(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CableCell {
    segments: Vec<Segment>,
    parents: Vec<usize>,
    paints: Vec<(Region, Paintable)>,
    placements: Vec<(Location, Placeable)>,
    /// Per-cell parameter overrides; unset values fall through to the
    /// global defaults.
    pub default_parameters: CableParameters,
}

impl CableCell {
    /// A cell consisting of a bare soma of the given radius.
    pub fn new(soma_radius: Value) -> Self {
        Self {
            segments: vec![Segment::Soma(SomaSegment { radius: soma_radius })],
            parents: vec![0],
            paints: Vec::new(),
            placements: Vec::new(),
            default_parameters: CableParameters::new(),
        }
    }

    /// Build a cell from a morphology with a spherical root.
    ///
    /// Each cable branch becomes a segment whose radii and lengths come
    /// from its sample chain, with one compartment; tags are resolved
    /// through `labels` (sample tag → region name). Compartment counts
    /// can be adjusted afterwards with
    /// [`set_compartments`](Self::set_compartments).
    pub fn from_morphology(
        morph: &Morphology,
        labels: &IndexMap<i32, String>,
    ) -> Result<Self, CellError> {
        if !morph.spherical_root() {
            return Err(CellError::InvalidMorphology {
                reason: "cell construction requires a spherical root branch".into(),
            });
        }
        let samples = morph.samples();
        let mut cell = Self::new(samples.sample(morph.branch_samples(0)[0]).radius);
        for b in 1..morph.num_branches() {
            let chain = morph.branch_samples(b);
            let radii: Vec<Value> = chain.iter().map(|&s| samples.sample(s).radius).collect();
            let lengths: Vec<Value> = chain
                .windows(2)
                .map(|w| samples.sample(w[0]).distance(samples.sample(w[1])))
                .collect();
            let tag = chain
                .last()
                .and_then(|&s| labels.get(&samples.sample(s).tag).cloned());
            let cable = CableSegment::new(radii, lengths, 1, tag).map_err(|e| {
                CellError::InvalidMorphology {
                    reason: format!("branch {b}: {e}"),
                }
            })?;
            let parent = match morph.branch_parent(b) {
                NPOS => 0,
                p => p,
            };
            cell.add_cable(parent, cable)?;
        }
        Ok(cell)
    }

    /// Attach a cable under the segment `parent`, returning its index.
    pub fn add_cable(&mut self, parent: usize, cable: CableSegment) -> Result<usize, CellError> {
        if parent >= self.segments.len() {
            return Err(CellError::InvalidParent {
                parent,
                num_segments: self.segments.len(),
            });
        }
        self.segments.push(Segment::Cable(cable));
        self.parents.push(parent);
        Ok(self.segments.len() - 1)
    }

    /// Paint a property onto a region.
    ///
    /// Region emptiness is not checked here; a paint whose region covers
    /// no membrane fails at discretization time.
    pub fn paint(&mut self, region: impl Into<Region>, prop: impl Into<Paintable>) {
        self.paints.push((region.into(), prop.into()));
    }

    /// Place a point item at a location, returning the placement index.
    ///
    /// Fails with [`CellError::LocationOutOfRange`] if the branch does
    /// not exist or the position lies outside `[0, 1]`.
    pub fn place(
        &mut self,
        location: Location,
        item: impl Into<Placeable>,
    ) -> Result<usize, CellError> {
        if location.branch >= self.segments.len() || !(0.0..=1.0).contains(&location.pos) {
            return Err(CellError::LocationOutOfRange {
                branch: location.branch,
                pos: location.pos,
            });
        }
        self.placements.push((location, item.into()));
        Ok(self.placements.len() - 1)
    }

    /// Number of segments (the soma plus all cables).
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Segment at `i`.
    pub fn segment(&self, i: usize) -> &Segment {
        &self.segments[i]
    }

    /// All segments in tree order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The soma at the root.
    pub fn soma(&self) -> &SomaSegment {
        match &self.segments[0] {
            Segment::Soma(s) => s,
            Segment::Cable(_) => unreachable!("cable cells are constructed soma-rooted"),
        }
    }

    /// Cable segment at `i`, if segment `i` is a cable.
    pub fn cable(&self, i: usize) -> Option<&CableSegment> {
        self.segments.get(i).and_then(Segment::as_cable)
    }

    /// Parent index of each segment (`parents[0] == 0`).
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// The segment tree.
    pub fn tree(&self) -> Tree {
        Tree::from_parent_index(&self.parents).expect("cell maintains a valid segment tree")
    }

    /// All paints in application order.
    pub fn paints(&self) -> &[(Region, Paintable)] {
        &self.paints
    }

    /// All placements in application order.
    pub fn placements(&self) -> &[(Location, Placeable)] {
        &self.placements
    }

    /// Change the compartment count of cable `branch`.
    pub fn set_compartments(&mut self, branch: usize, n: u32) -> Result<(), CellError> {
        match self.segments.get_mut(branch).and_then(Segment::as_cable_mut) {
            Some(cable) => cable.set_compartments(n),
            None => Err(CellError::InvalidParent {
                parent: branch,
                num_segments: self.segments.len(),
            }),
        }
    }

    /// Segment indices selected by `region`, in tree order.
    pub fn region_segments(&self, region: &Region) -> Vec<usize> {
        match region {
            Region::All => (0..self.segments.len()).collect(),
            Region::Branch(id) => {
                if *id < self.segments.len() {
                    vec![*id]
                } else {
                    Vec::new()
                }
            }
            Region::Tagged(name) => (0..self.segments.len())
                .filter(|&i| self.segments[i].tag() == Some(name.as_str()))
                .collect(),
        }
    }

    /// Total membrane area [µm²].
    pub fn area(&self) -> Value {
        self.segments.iter().map(Segment::area).sum()
    }

    /// Total volume [µm³].
    pub fn volume(&self) -> Value {
        self.segments.iter().map(Segment::volume).sum()
    }

    /// Total compartment count over all segments.
    pub fn num_compartments(&self) -> u32 {
        self.segments.iter().map(Segment::num_compartments).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dendra_morph::{Sample, SampleTree};

    fn two_branch_cell() -> CableCell {
        let mut cell = CableCell::new(6.3);
        cell.add_cable(
            0,
            CableSegment::frustum(200.0, 0.5, 0.5, 4, Some("dend".into())).unwrap(),
        )
        .unwrap();
        cell.add_cable(
            1,
            CableSegment::frustum(100.0, 0.4, 0.4, 4, Some("dend".into())).unwrap(),
        )
        .unwrap();
        cell
    }

    #[test]
    fn construction_and_accessors() {
        let cell = two_branch_cell();
        assert_eq!(cell.num_segments(), 3);
        assert_eq!(cell.parents(), &[0, 0, 1]);
        assert_eq!(cell.soma().radius, 6.3);
        assert!(cell.cable(1).is_some());
        assert!(cell.cable(0).is_none());
        assert_eq!(cell.num_compartments(), 9);

        let t = cell.tree();
        assert_eq!(t.num_children(0), 1);
        assert_eq!(t.num_children(1), 1);
    }

    #[test]
    fn rejects_bad_parent() {
        let mut cell = CableCell::new(3.0);
        let err = cell.add_cable(5, CableSegment::frustum(10.0, 0.5, 0.5, 1, None).unwrap());
        assert_eq!(
            err,
            Err(CellError::InvalidParent { parent: 5, num_segments: 1 })
        );
    }

    #[test]
    fn region_selection() {
        let cell = two_branch_cell();
        assert_eq!(cell.region_segments(&Region::All), vec![0, 1, 2]);
        assert_eq!(cell.region_segments(&"soma".into()), vec![0]);
        assert_eq!(cell.region_segments(&"dend".into()), vec![1, 2]);
        assert_eq!(cell.region_segments(&Region::branch(2)), vec![2]);
        assert_eq!(cell.region_segments(&"axon".into()), Vec::<usize>::new());
    }

    #[test]
    fn placement_validation() {
        let mut cell = two_branch_cell();
        assert_eq!(cell.place(Location::new(1, 0.5), "expsyn"), Ok(0));
        assert_eq!(cell.place(Location::new(0, 0.0), "expsyn"), Ok(1));
        assert!(matches!(
            cell.place(Location::new(3, 0.5), "expsyn"),
            Err(CellError::LocationOutOfRange { branch: 3, .. })
        ));
        assert!(matches!(
            cell.place(Location::new(1, 1.5), "expsyn"),
            Err(CellError::LocationOutOfRange { .. })
        ));
    }

    #[test]
    fn area_sums_over_segments() {
        let cell = two_branch_cell();
        let expected = cell.segment(0).area() + cell.segment(1).area() + cell.segment(2).area();
        assert_relative_eq!(cell.area(), expected);
    }

    #[test]
    fn from_morphology_builds_segments() {
        let mut st = SampleTree::new();
        let soma = st
            .append(dendra_morph::NPOS, Sample::new(0.0, 0.0, 0.0, 5.0, 1))
            .unwrap();
        let a = st.append(soma, Sample::new(0.0, 0.0, 5.0, 0.5, 3)).unwrap();
        st.append(a, Sample::new(0.0, 0.0, 105.0, 0.5, 3)).unwrap();

        let morph = Morphology::new(st, true);
        let mut labels = IndexMap::new();
        labels.insert(3, "dend".to_string());

        let cell = CableCell::from_morphology(&morph, &labels).unwrap();
        assert_eq!(cell.num_segments(), 2);
        assert_eq!(cell.soma().radius, 5.0);
        let dend = cell.cable(1).unwrap();
        assert_relative_eq!(dend.length(), 100.0);
        assert_eq!(dend.tag(), Some("dend"));
        assert_eq!(cell.region_segments(&"dend".into()), vec![1]);
    }
}

//! Assignment of painted and placed mechanisms to control volumes.

use crate::compartment::DividedCable;
use crate::discretization::Discretization;
use crate::error::FvmError;
use crate::resolve::{self, IonField};
use dendra_cell::{
    CableCell, GlobalProperties, IonDependency, MechanismCatalogue, MechanismDesc, MechanismInfo,
    MechanismKind, Paintable, Placeable, Segment,
};
use dendra_core::{Index, Size, Value};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Per-mechanism CV assignment and parameter data.
///
/// `cv` is ascending, strictly so for density and reversal-potential
/// mechanisms; every parameter vector and `norm_area` (density only)
/// has one entry per CV. For point mechanisms, `target` holds the
/// original placement ordinals; when instances are coalesced,
/// `multiplicity` gives the run length per CV entry and `target` is the
/// concatenation of the per-entry runs, so an entry may share its CV
/// with a differently-parameterized neighbour.
#[derive(Clone, Debug, PartialEq)]
pub struct MechanismConfig {
    /// Mechanism kind.
    pub kind: MechanismKind,
    /// CVs the mechanism is instantiated on, ascending.
    pub cv: Vec<Index>,
    /// Parameter vectors in declaration order, one value per CV entry.
    pub param_values: IndexMap<String, Vec<Value>>,
    /// Fraction of each CV's area covered (density mechanisms).
    pub norm_area: Vec<Value>,
    /// Target indices (point mechanisms).
    pub target: Vec<Size>,
    /// Instances folded into each entry (coalesced point mechanisms).
    pub multiplicity: Vec<Size>,
}

impl MechanismConfig {
    fn new(kind: MechanismKind) -> Self {
        Self {
            kind,
            cv: Vec::new(),
            param_values: IndexMap::new(),
            norm_area: Vec::new(),
            target: Vec::new(),
            multiplicity: Vec::new(),
        }
    }
}

/// Per-ion CV assignment and initial state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IonConfig {
    /// Union of CVs on which any mechanism references the ion,
    /// ascending.
    pub cv: Vec<Index>,
    /// Initial internal concentration [mM], scaled by the area fraction
    /// not covered by concentration-writing mechanisms.
    pub init_iconc: Vec<Value>,
    /// Initial external concentration [mM], scaled likewise.
    pub init_econc: Vec<Value>,
    /// Initial reversal potential [mV].
    pub init_erev: Vec<Value>,
}

/// The mechanism side of a discretized model.
#[derive(Clone, Debug, PartialEq)]
pub struct MechanismData {
    /// Mechanism configurations, in first-use order.
    pub mechanisms: IndexMap<String, MechanismConfig>,
    /// Ion configurations, in first-reference order.
    pub ions: IndexMap<String, IonConfig>,
    /// Total number of point-mechanism targets.
    pub n_targets: Size,
    /// Exclusive scan of per-cell synapse counts, one entry per cell.
    pub target_divs: Vec<Size>,
}

/// Membrane composition of every CV, by segment half-compartments.
struct Composition {
    /// Per global segment: `(cv, half area)` contributions.
    seg_halves: Vec<Vec<(Index, Value)>>,
    /// Per CV: `(cell, local segment, half area)` contributions.
    cv_halves: Vec<Vec<(usize, usize, Value)>>,
}

impl Composition {
    fn build(cells: &[CableCell], d: &Discretization) -> Self {
        let mut seg_halves: Vec<Vec<(Index, Value)>> = vec![Vec::new(); d.segments.len()];
        let mut cv_halves: Vec<Vec<(usize, usize, Value)>> = vec![Vec::new(); d.ncv as usize];
        for (cell_idx, cell) in cells.iter().enumerate() {
            let seg_base = d.cell_segment_part[cell_idx].0 as usize;
            for (seg_idx, segment) in cell.segments().iter().enumerate() {
                let seg = seg_base + seg_idx;
                let mut add = |cv: Index, area: Value| {
                    seg_halves[seg].push((cv, area));
                    cv_halves[cv as usize].push((cell_idx, seg_idx, area));
                };
                match segment {
                    Segment::Soma(soma) => add(d.segment_node_cv(seg, 0), soma.area()),
                    Segment::Cable(cable) => {
                        let div = DividedCable::by_ends(
                            cable.num_compartments(),
                            cable.radii(),
                            cable.lengths(),
                        );
                        for k in 0..cable.num_compartments() {
                            let comp = div.compartment(k as usize);
                            add(d.segment_node_cv(seg, k), comp.left.area);
                            add(d.segment_node_cv(seg, k + 1), comp.right.area);
                        }
                    }
                }
            }
        }
        Self {
            seg_halves,
            cv_halves,
        }
    }
}

fn lookup<'a>(
    catalogue: &'a MechanismCatalogue,
    name: &str,
) -> Result<&'a MechanismInfo, FvmError> {
    catalogue.info(name).ok_or_else(|| FvmError::UnknownMechanism {
        name: name.to_string(),
    })
}

fn require_kind(name: &str, info: &MechanismInfo, expected: MechanismKind) -> Result<(), FvmError> {
    if info.kind != expected {
        return Err(FvmError::MechanismKindMismatch {
            name: name.to_string(),
            expected,
        });
    }
    Ok(())
}

fn check_parameters(desc: &MechanismDesc, info: &MechanismInfo) -> Result<(), FvmError> {
    for param in desc.values().keys() {
        if !info.parameters.contains_key(param) {
            return Err(FvmError::UnknownParameter {
                mechanism: desc.name().to_string(),
                parameter: param.clone(),
            });
        }
    }
    Ok(())
}

fn check_ion_species(
    global: &GlobalProperties,
    ion: &str,
    dep: &IonDependency,
) -> Result<(), FvmError> {
    let valence = global
        .ion_species
        .get(ion)
        .ok_or_else(|| FvmError::UnknownIon { ion: ion.to_string() })?;
    if let Some(expected) = dep.expected_valence {
        if expected != *valence {
            return Err(FvmError::IonValenceMismatch {
                ion: ion.to_string(),
                expected,
                found: *valence,
            });
        }
    }
    Ok(())
}

/// Parameter vector of `desc` over the declared parameters of `info`,
/// overrides filled in, defaults elsewhere.
fn parameter_vector(desc: &MechanismDesc, info: &MechanismInfo) -> Vec<Value> {
    info.parameters
        .iter()
        .map(|(name, default)| desc.get(name).unwrap_or(*default))
        .collect()
}

fn cmp_params(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.total_cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

struct PointInstance {
    cv: Index,
    target: Size,
    params: Vec<Value>,
}

/// Build per-mechanism and per-ion data over a discretization.
///
/// Runs the density pass, the point pass, ion validation and the
/// reversal-potential pass, in that order; the first failure aborts the
/// build.
pub fn build_mechanism_data(
    global: &GlobalProperties,
    cells: &[CableCell],
    d: &Discretization,
) -> Result<MechanismData, FvmError> {
    let catalogue = &global.catalogue;
    let composition = Composition::build(cells, d);
    let mut mechanisms: IndexMap<String, MechanismConfig> = IndexMap::new();

    // ── Density pass ────────────────────────────────────────────
    // Last paint wins per segment for the same mechanism name.
    let mut density: IndexMap<String, IndexMap<usize, MechanismDesc>> = IndexMap::new();
    for (cell_idx, cell) in cells.iter().enumerate() {
        let seg_base = d.cell_segment_part[cell_idx].0 as usize;
        for (region, prop) in cell.paints() {
            let Paintable::Mechanism(desc) = prop else {
                continue;
            };
            let info = lookup(catalogue, desc.name())?;
            require_kind(desc.name(), info, MechanismKind::Density)?;
            check_parameters(desc, info)?;
            let segments = resolve::region_segments_checked(cell, region)?;
            let entry = density.entry(desc.name().to_string()).or_default();
            for s in segments {
                entry.insert(seg_base + s, desc.clone());
            }
        }
    }

    for (name, by_seg) in &density {
        let info = lookup(catalogue, name)?;
        // cv -> (covered area, per-parameter area-weighted sums)
        let mut acc: BTreeMap<Index, (Value, Vec<Value>)> = BTreeMap::new();
        for (&seg, desc) in by_seg {
            let values = parameter_vector(desc, info);
            for &(cv, area) in &composition.seg_halves[seg] {
                let slot = acc
                    .entry(cv)
                    .or_insert_with(|| (0.0, vec![0.0; values.len()]));
                slot.0 += area;
                for (i, v) in values.iter().enumerate() {
                    slot.1[i] += area * v;
                }
            }
        }

        let mut config = MechanismConfig::new(MechanismKind::Density);
        let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(acc.len()); info.parameters.len()];
        for (cv, (area, weighted)) in &acc {
            config.cv.push(*cv);
            config.norm_area.push(area / d.cv_area[*cv as usize]);
            for (i, w) in weighted.iter().enumerate() {
                columns[i].push(w / area);
            }
        }
        config.param_values = info.parameters.keys().cloned().zip(columns).collect();
        mechanisms.insert(name.clone(), config);
    }

    // ── Point pass ──────────────────────────────────────────────
    let mut points: IndexMap<String, Vec<PointInstance>> = IndexMap::new();
    let mut target_divs: Vec<Size> = Vec::with_capacity(cells.len());
    let mut next_target: Size = 0;
    for (cell_idx, cell) in cells.iter().enumerate() {
        target_divs.push(next_target);
        let seg_base = d.cell_segment_part[cell_idx].0 as usize;
        for (location, item) in cell.placements() {
            let Placeable::Mechanism(desc) = item else {
                continue;
            };
            let info = lookup(catalogue, desc.name())?;
            require_kind(desc.name(), info, MechanismKind::Point)?;
            check_parameters(desc, info)?;
            let seg = seg_base + location.branch;
            let cv = match cell.segment(location.branch) {
                Segment::Soma(_) => d.segment_node_cv(seg, 0),
                Segment::Cable(cable) => {
                    // Snap to the nearest compartment-boundary node: the
                    // CV containing the position by arc length.
                    let n = cable.num_compartments();
                    let node = (location.pos * n as Value).round() as u32;
                    d.segment_node_cv(seg, node)
                }
            };
            points
                .entry(desc.name().to_string())
                .or_default()
                .push(PointInstance {
                    cv,
                    target: next_target,
                    params: parameter_vector(desc, info),
                });
            next_target += 1;
        }
    }

    for (name, mut instances) in points {
        let info = lookup(catalogue, &name)?;
        let mut config = MechanismConfig::new(MechanismKind::Point);
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); info.parameters.len()];

        if global.coalesce_synapses {
            instances.sort_by(|a, b| {
                a.cv.cmp(&b.cv)
                    .then_with(|| cmp_params(&a.params, &b.params))
                    .then_with(|| a.target.cmp(&b.target))
            });
            let mut i = 0;
            while i < instances.len() {
                let mut j = i + 1;
                while j < instances.len()
                    && instances[j].cv == instances[i].cv
                    && instances[j].params == instances[i].params
                {
                    j += 1;
                }
                config.cv.push(instances[i].cv);
                config.multiplicity.push((j - i) as Size);
                for (p, column) in columns.iter_mut().enumerate() {
                    column.push(instances[i].params[p]);
                }
                for instance in &instances[i..j] {
                    config.target.push(instance.target);
                }
                i = j;
            }
        } else {
            instances.sort_by(|a, b| a.cv.cmp(&b.cv).then_with(|| a.target.cmp(&b.target)));
            for instance in &instances {
                config.cv.push(instance.cv);
                config.target.push(instance.target);
                for (p, column) in columns.iter_mut().enumerate() {
                    column.push(instance.params[p]);
                }
            }
        }
        config.param_values = info.parameters.keys().cloned().zip(columns).collect();
        mechanisms.insert(name, config);
    }

    // ── Ion validation and collection ───────────────────────────
    let mut ion_cvs: IndexMap<String, BTreeSet<Index>> = IndexMap::new();
    let mut rev_readers: IndexMap<String, BTreeSet<Index>> = IndexMap::new();
    let mut int_writer_area: IndexMap<String, BTreeMap<Index, Value>> = IndexMap::new();
    let mut ext_writer_area: IndexMap<String, BTreeMap<Index, Value>> = IndexMap::new();

    for (name, config) in &mechanisms {
        let info = lookup(catalogue, name)?;
        for (ion, dep) in &info.ions {
            check_ion_species(global, ion, dep)?;
            ion_cvs
                .entry(ion.clone())
                .or_default()
                .extend(config.cv.iter().copied());
            if dep.read_reversal_potential {
                rev_readers
                    .entry(ion.clone())
                    .or_default()
                    .extend(config.cv.iter().copied());
            }
            if config.kind == MechanismKind::Density {
                for (writes, areas) in [
                    (dep.write_int_concentration, &mut int_writer_area),
                    (dep.write_ext_concentration, &mut ext_writer_area),
                ] {
                    if writes {
                        let by_cv = areas.entry(ion.clone()).or_default();
                        for (i, &cv) in config.cv.iter().enumerate() {
                            *by_cv.entry(cv).or_insert(0.0) +=
                                config.norm_area[i] * d.cv_area[cv as usize];
                        }
                    }
                }
            }
        }
    }

    // ── Reversal-potential pass ─────────────────────────────────
    let mut revpot: IndexMap<String, BTreeMap<Index, MechanismDesc>> = IndexMap::new();
    for (cell_idx, cell) in cells.iter().enumerate() {
        let (cv_lo, cv_hi) = d.cell_cv_part[cell_idx];
        let mut methods: IndexMap<&str, &MechanismDesc> = IndexMap::new();
        for (ion, desc) in &global.default_parameters.reversal_potential_method {
            methods.insert(ion.as_str(), desc);
        }
        for (ion, desc) in &cell.default_parameters.reversal_potential_method {
            methods.insert(ion.as_str(), desc);
        }

        for (&ion, &desc) in &methods {
            let info = lookup(catalogue, desc.name())?;
            if info.kind != MechanismKind::ReversalPotential {
                return Err(FvmError::RevpotMismatch {
                    ion: ion.to_string(),
                    mechanism: desc.name().to_string(),
                });
            }
            check_parameters(desc, info)?;

            let mut writes_assigned_ion = false;
            for (x, dep) in &info.ions {
                check_ion_species(global, x, dep)?;
                if dep.write_reversal_potential {
                    if x == ion {
                        writes_assigned_ion = true;
                    }
                    // A multi-ion provider must be assigned, identically,
                    // to every ion it writes.
                    if methods.get(x.as_str()) != Some(&desc) {
                        return Err(FvmError::RevpotMismatch {
                            ion: x.clone(),
                            mechanism: desc.name().to_string(),
                        });
                    }
                }
            }
            if !writes_assigned_ion {
                return Err(FvmError::RevpotMismatch {
                    ion: ion.to_string(),
                    mechanism: desc.name().to_string(),
                });
            }

            // Materialize only where the reversal potential is read.
            if let Some(readers) = rev_readers.get(ion) {
                let entry = revpot.entry(desc.name().to_string()).or_default();
                for &cv in readers.range(cv_lo..cv_hi) {
                    entry.insert(cv, desc.clone());
                }
            }
        }
    }

    for (name, by_cv) in &revpot {
        if by_cv.is_empty() {
            continue;
        }
        let info = lookup(catalogue, name)?;
        let mut config = MechanismConfig::new(MechanismKind::ReversalPotential);
        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); info.parameters.len()];
        for (&cv, desc) in by_cv {
            config.cv.push(cv);
            for (p, v) in parameter_vector(desc, info).into_iter().enumerate() {
                columns[p].push(v);
            }
        }
        config.param_values = info.parameters.keys().cloned().zip(columns).collect();
        // Referenced ions get storage on the provider's CVs.
        for ion in info.ions.keys() {
            ion_cvs
                .entry(ion.clone())
                .or_default()
                .extend(config.cv.iter().copied());
        }
        mechanisms.insert(name.clone(), config);
    }

    // ── Ion configurations ──────────────────────────────────────
    let mut ions: IndexMap<String, IonConfig> = IndexMap::new();
    for (ion, cvset) in &ion_cvs {
        let mut config = IonConfig::default();
        for &cv in cvset {
            let mut area_sum = 0.0;
            let mut sums = [0.0; 3];
            for &(cell_idx, seg, area) in &composition.cv_halves[cv as usize] {
                let cell = &cells[cell_idx];
                area_sum += area;
                for (s, field) in sums.iter_mut().zip([
                    IonField::IntConcentration,
                    IonField::ExtConcentration,
                    IonField::ReversalPotential,
                ]) {
                    *s += area
                        * resolve::ion_value(cell, seg, ion, field, &global.default_parameters)?;
                }
            }
            let cv_area = d.cv_area[cv as usize];
            let covered = |areas: &IndexMap<String, BTreeMap<Index, Value>>| {
                areas
                    .get(ion)
                    .and_then(|m| m.get(&cv))
                    .copied()
                    .unwrap_or(0.0)
            };
            let int_scale = (1.0 - covered(&int_writer_area) / cv_area).max(0.0);
            let ext_scale = (1.0 - covered(&ext_writer_area) / cv_area).max(0.0);

            config.cv.push(cv);
            config.init_iconc.push(sums[0] / area_sum * int_scale);
            config.init_econc.push(sums[1] / area_sum * ext_scale);
            config.init_erev.push(sums[2] / area_sum);
        }
        ions.insert(ion.clone(), config);
    }

    Ok(MechanismData {
        mechanisms,
        ions,
        n_targets: next_target,
        target_divs,
    })
}

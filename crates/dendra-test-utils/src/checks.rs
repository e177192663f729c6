//! Discretization invariant checks.
//!
//! These functions assert the structural invariants every valid build
//! must satisfy. Reused across the unit and integration test suites of
//! the discretization crates.

use dendra_cell::{CableCell, MechanismKind, Placeable};
use dendra_core::Size;
use dendra_fvm::{Discretization, MechanismData};

/// Assert that every per-CV vector has exactly `ncv` entries and the
/// partitions have `ncell` entries.
pub fn assert_record_lengths(d: &Discretization) {
    let ncv = d.ncv as usize;
    assert_eq!(d.parent_cv.len(), ncv, "parent_cv length");
    assert_eq!(d.cv_to_cell.len(), ncv, "cv_to_cell length");
    assert_eq!(d.cv_area.len(), ncv, "cv_area length");
    assert_eq!(d.cv_capacitance.len(), ncv, "cv_capacitance length");
    assert_eq!(d.face_conductance.len(), ncv, "face_conductance length");
    assert_eq!(d.diam_um.len(), ncv, "diam_um length");
    assert_eq!(d.cell_cv_part.len(), d.ncell as usize, "cell_cv_part length");
    assert_eq!(
        d.cell_segment_part.len(),
        d.ncell as usize,
        "cell_segment_part length"
    );
}

/// Assert that `parent_cv[c] <= c`, with equality exactly on the first
/// CV of each cell, and that every CV belongs to its cell's range.
pub fn assert_parent_ordering(d: &Discretization) {
    for (c, &p) in d.parent_cv.iter().enumerate() {
        let cell = d.cv_to_cell[c] as usize;
        let (lo, hi) = d.cell_cv_part[cell];
        let c = c as u32;
        assert!(lo <= c && c < hi, "CV {c} outside its cell range");
        assert!(p <= c, "parent_cv[{c}] = {p} exceeds {c}");
        if p == c {
            assert_eq!(c, lo, "non-root CV {c} is its own parent");
        } else {
            assert!(lo <= p, "parent of CV {c} crosses a cell boundary");
        }
    }
}

/// Assert that per-cell CV areas sum to the cell's membrane area.
pub fn assert_area_conservation(d: &Discretization, cells: &[CableCell]) {
    for (i, cell) in cells.iter().enumerate() {
        let (lo, hi) = d.cell_cv_part[i];
        let total: f64 = d.cv_area[lo as usize..hi as usize].iter().sum();
        let expected = cell.area();
        assert!(
            (total - expected).abs() <= 1e-12 * expected,
            "cell {i}: CV areas sum to {total}, expected {expected}"
        );
    }
}

/// Assert the structural invariants of every mechanism configuration:
/// sorted CV lists (strictly increasing for density and reversal
/// potential mechanisms), matching vector lengths, and multiplicity
/// partitioning the targets when coalesced.
pub fn assert_mechanism_invariants(m: &MechanismData) {
    for (name, config) in &m.mechanisms {
        let n = config.cv.len();
        for w in config.cv.windows(2) {
            match config.kind {
                MechanismKind::Point => {
                    assert!(w[0] <= w[1], "{name}: cv list not sorted");
                }
                _ => assert!(w[0] < w[1], "{name}: cv list not strictly increasing"),
            }
        }
        for (param, values) in &config.param_values {
            assert_eq!(values.len(), n, "{name}: parameter '{param}' length");
        }
        match config.kind {
            MechanismKind::Density => {
                assert_eq!(config.norm_area.len(), n, "{name}: norm_area length");
                assert!(
                    config.norm_area.iter().all(|&a| (0.0..=1.0 + 1e-12).contains(&a)),
                    "{name}: norm_area outside [0, 1]"
                );
                assert!(config.target.is_empty(), "{name}: density has targets");
            }
            MechanismKind::Point => {
                if config.multiplicity.is_empty() {
                    assert_eq!(config.target.len(), n, "{name}: target length");
                } else {
                    assert_eq!(config.multiplicity.len(), n, "{name}: multiplicity length");
                    let total: Size = config.multiplicity.iter().sum();
                    assert_eq!(
                        total as usize,
                        config.target.len(),
                        "{name}: multiplicity does not partition targets"
                    );
                }
            }
            MechanismKind::ReversalPotential => {
                assert!(config.target.is_empty(), "{name}: provider has targets");
                assert!(config.norm_area.is_empty(), "{name}: provider has norm_area");
            }
        }
    }
    for (ion, config) in &m.ions {
        for w in config.cv.windows(2) {
            assert!(w[0] < w[1], "ion '{ion}': cv list not strictly increasing");
        }
        assert_eq!(config.init_iconc.len(), config.cv.len(), "ion '{ion}' iconc");
        assert_eq!(config.init_econc.len(), config.cv.len(), "ion '{ion}' econc");
    }
}

/// Assert that the target indices over all point-mechanism configs form
/// a permutation of `0..n_targets` partitioned by `target_divs`.
pub fn assert_targets_partition(m: &MechanismData, cells: &[CableCell]) {
    let mut seen: Vec<Size> = m
        .mechanisms
        .values()
        .filter(|c| c.kind == MechanismKind::Point)
        .flat_map(|c| c.target.iter().copied())
        .collect();
    seen.sort_unstable();
    let expected: Vec<Size> = (0..m.n_targets).collect();
    assert_eq!(seen, expected, "targets are not a permutation");

    assert_eq!(m.target_divs.len(), cells.len(), "target_divs length");
    let mut offset: Size = 0;
    for (i, cell) in cells.iter().enumerate() {
        assert_eq!(m.target_divs[i], offset, "target_div of cell {i}");
        let synapses = cell
            .placements()
            .iter()
            .filter(|(_, item)| matches!(item, Placeable::Mechanism(_)))
            .count() as Size;
        offset += synapses;
    }
    assert_eq!(m.n_targets, offset, "total target count");
}

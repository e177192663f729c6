//! Integration tests for the CV layout of the two-cell reference
//! population.
//!
//! Expected CV layouts, segment indices in parentheses:
//!
//! ```text
//! Cell 0:
//!
//! CV: |  0     ][1| 2 | 3 | 4 |5|
//!     [soma (0)][  segment (1)  ]
//!
//! Cell 1:
//!
//! CV: |  6     ][7| 8 | 9 | 10| 11 | 12 | 13 | 14 | 15|
//!     [soma (2)][  segment (3)  ][  segment (4)       ]
//!                                [  segment (5)       ]
//!                                  | 16 | 17 | 18 | 19|
//! ```

use approx::assert_relative_eq;
use dendra_cell::{CableParameters, Segment};
use dendra_fvm::discretize;
use dendra_test_utils::{
    assert_area_conservation, assert_parent_ordering, assert_record_lengths, two_cell_system,
};
use std::f64::consts::PI;

#[test]
fn topology() {
    let cells = two_cell_system();
    assert_eq!(cells[0].num_segments(), 2);
    assert_eq!(cells[1].num_segments(), 4);

    let d = discretize(&cells, &CableParameters::neuron_defaults()).unwrap();

    assert_eq!(d.ncell, 2);
    assert_eq!(d.ncv, 20);
    assert_eq!(d.segments.len(), 6);

    assert_record_lengths(&d);
    assert_parent_ordering(&d);

    assert_eq!(d.cell_segment_part, vec![(0, 2), (2, 6)]);
    assert_eq!(d.cell_cv_part, vec![(0, 6), (6, 20)]);

    assert_eq!(
        d.parent_cv,
        vec![0, 0, 1, 2, 3, 4, 6, 6, 7, 8, 9, 10, 11, 12, 13, 14, 11, 16, 17, 18]
    );

    assert!(!d.segments[0].has_parent());
    assert_eq!(d.segments[1].parent_cv, Some(1));
    assert!(!d.segments[2].has_parent());
    assert_eq!(d.segments[3].parent_cv, Some(7));
    assert_eq!(d.segments[4].parent_cv, Some(11));
    assert_eq!(d.segments[5].parent_cv, Some(11));

    assert_eq!(d.segments[0].cv_range, (0, 1));
    assert_eq!(d.segments[1].cv_range, (2, 6));
    assert_eq!(d.segments[2].cv_range, (6, 7));
    assert_eq!(d.segments[3].cv_range, (8, 12));
    assert_eq!(d.segments[4].cv_range, (12, 16));
    assert_eq!(d.segments[5].cv_range, (16, 20));

    for cell in 0..d.ncell {
        let (lo, hi) = d.cell_cv_part[cell as usize];
        for cv in lo..hi {
            assert_eq!(d.cv_to_cell[cv as usize], cell);
        }
    }
}

#[test]
fn diam_and_area() {
    let cells = two_cell_system();
    let d = discretize(&cells, &CableParameters::neuron_defaults()).unwrap();

    // Stick models have constant-diameter segments.
    assert_relative_eq!(d.diam_um[0], 12.6157);
    for cv in 1..6 {
        assert_relative_eq!(d.diam_um[cv], 1.0);
    }
    assert_relative_eq!(d.diam_um[6], 14.0);
    for cv in 7..12 {
        assert_relative_eq!(d.diam_um[cv], 1.0);
    }
    for cv in 12..16 {
        assert_relative_eq!(d.diam_um[cv], 0.8);
    }
    for cv in 16..20 {
        assert_relative_eq!(d.diam_um[cv], 0.7);
    }

    // Segment areas, flattened across cells.
    let mut a = Vec::new();
    for cell in &cells {
        for segment in cell.segments() {
            a.push(segment.area());
        }
    }

    let n = 4.0;
    let tol = 1e-12;
    assert_relative_eq!(d.cv_area[0], a[0], max_relative = tol);
    assert_relative_eq!(d.cv_area[1], a[1] / (2.0 * n), max_relative = tol);
    for cv in 2..5 {
        assert_relative_eq!(d.cv_area[cv], a[1] / n, max_relative = tol);
    }
    assert_relative_eq!(d.cv_area[5], a[1] / (2.0 * n), max_relative = tol);

    assert_relative_eq!(d.cv_area[6], a[2], max_relative = tol);
    assert_relative_eq!(d.cv_area[7], a[3] / (2.0 * n), max_relative = tol);
    for cv in 8..11 {
        assert_relative_eq!(d.cv_area[cv], a[3] / n, max_relative = tol);
    }
    assert_relative_eq!(
        d.cv_area[11],
        (a[3] + a[4] + a[5]) / (2.0 * n),
        max_relative = tol
    );
    for cv in 12..15 {
        assert_relative_eq!(d.cv_area[cv], a[4] / n, max_relative = tol);
    }
    assert_relative_eq!(d.cv_area[15], a[4] / (2.0 * n), max_relative = tol);
    for cv in 16..19 {
        assert_relative_eq!(d.cv_area[cv], a[5] / n, max_relative = tol);
    }
    assert_relative_eq!(d.cv_area[19], a[5] / (2.0 * n), max_relative = tol);

    assert_area_conservation(&d, &cells);

    // Proportional allocation of surface capacitance: the branch-point
    // CV mixes the three dendrites' specific capacitances.
    let (cm1, cm2, cm3) = (0.017, 0.013, 0.018);
    let c = a[3] / (2.0 * n) * cm1 + a[4] / (2.0 * n) * cm2 + a[5] / (2.0 * n) * cm3;
    assert_relative_eq!(d.cv_capacitance[11], c, max_relative = tol);

    // Soma of cell 1 keeps the global default.
    assert_relative_eq!(d.cv_capacitance[6], a[2] * 0.01, max_relative = tol);

    // Face conductance on a constant-diameter cable: a/(h·rL)·100 with
    // a the cross-section and h the compartment length.
    let cable = cells[1].segment(2).as_cable().unwrap();
    let xsec = cable.volume() / cable.length();
    assert_relative_eq!(xsec, PI * 0.8 * 0.8 / 4.0, max_relative = tol);

    let g = xsec / (cable.length() / 4.0) / 90.0 * 100.0;
    assert_relative_eq!(d.face_conductance[13], g, max_relative = tol);
}

#[test]
fn capacitance_uses_painted_values_per_segment() {
    let cells = two_cell_system();
    let d = discretize(&cells, &CableParameters::neuron_defaults()).unwrap();

    // Interior CVs of the first dendrite of cell 1 are pure 0.017 F/m².
    for cv in 8..11 {
        assert_relative_eq!(
            d.cv_capacitance[cv],
            d.cv_area[cv] * 0.017,
            max_relative = 1e-12
        );
    }
    // Cell 0's dendrite uses the global default.
    for cv in 1..6 {
        assert_relative_eq!(
            d.cv_capacitance[cv],
            d.cv_area[cv] * 0.01,
            max_relative = 1e-12
        );
    }
}

#[test]
fn total_compartment_count_matches_layout() {
    let cells = two_cell_system();
    let d = discretize(&cells, &CableParameters::neuron_defaults()).unwrap();

    // Each cell contributes soma + junction + one CV per compartment.
    for (i, cell) in cells.iter().enumerate() {
        let (lo, hi) = d.cell_cv_part[i];
        let cables: u32 = cell
            .segments()
            .iter()
            .filter_map(Segment::as_cable)
            .map(|c| c.num_compartments())
            .sum();
        assert_eq!(hi - lo, 1 + 1 + cables);
    }
}

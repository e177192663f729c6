//! Benchmark profiles for the dendra discretization pipelines.
//!
//! Provides deterministic synthetic cell populations of controlled
//! size, shared by the criterion benches and scaling experiments.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dendra::prelude::*;

/// A binary dendritic tree of the given depth.
///
/// Level `k` carries `2^k` branches of `200 / (k + 1)` µm with `ncomp`
/// compartments each; `hh` on the soma, `pas` on the dendrites, and one
/// synapse placed midway along every terminal branch.
pub fn branched_cell(depth: u32, ncomp: u32) -> CableCell {
    let mut builder = SomaCellBuilder::new(6.3);
    let mut level: Vec<usize> = vec![0];
    let mut terminals: Vec<usize> = Vec::new();
    for k in 0..depth {
        let length = 200.0 / (k + 1) as Value;
        let radius = 0.5 / (k + 1) as Value;
        let mut next = Vec::with_capacity(level.len() * 2);
        for &parent in &level {
            for _ in 0..2 {
                let b = builder
                    .add_branch(parent, length, radius, radius, ncomp, "dend")
                    .expect("parents come from the previous level");
                next.push(b);
            }
        }
        if k + 1 == depth {
            terminals = next.clone();
        }
        level = next;
    }
    let mut cell = builder.make_cell();
    cell.paint("soma", "hh");
    if depth > 0 {
        cell.paint("dend", "pas");
    }
    for b in terminals {
        cell.place(Location::new(b, 0.5), "expsyn")
            .expect("terminal branches exist");
    }
    cell
}

/// A population of `n` identical branched cells.
pub fn population(n: usize, depth: u32, ncomp: u32) -> Vec<CableCell> {
    (0..n).map(|_| branched_cell(depth, ncomp)).collect()
}

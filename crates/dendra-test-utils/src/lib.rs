//! Test utilities for dendra development.
//!
//! Reusable cell fixtures (ball-and-stick, the two-cell reference
//! population), an extended catalogue with instrumentation mechanisms,
//! and invariant checks shared across the discretization test suites.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod checks;
pub mod fixtures;

pub use checks::{
    assert_area_conservation, assert_mechanism_invariants, assert_parent_ordering,
    assert_record_lengths, assert_targets_partition,
};
pub use fixtures::{make_ball_and_stick, test_catalogue, two_cell_system};

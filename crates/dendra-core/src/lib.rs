//! Core types and geometry primitives for the dendra cell discretization
//! library.
//!
//! This is the leaf crate with zero internal dendra dependencies. It defines
//! the numeric type aliases used by the finite-volume data record and the
//! closed-form integrators over the canonical cell shapes: spheres for
//! somata, truncated cones (frusta) for cable sub-segments.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod math;
pub mod types;

pub use types::{Index, Size, Value};

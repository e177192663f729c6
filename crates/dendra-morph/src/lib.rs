//! Morphology model for the dendra cell discretization library.
//!
//! Three layers, lowest first:
//!
//! - [`Tree`]: a parent-index-array tree over arbitrary nodes, with the
//!   rerooting operations ([`Tree::change_root`], [`Tree::balance`]) used
//!   to pick numerically favourable roots before discretization.
//! - [`SampleTree`]: an append-only tree of morphology samples
//!   (3-D point, radius, integer tag), typically read from a
//!   reconstruction.
//! - [`Morphology`]: the branch decomposition of a sample tree: maximal
//!   unbranched sample runs, with optional spherical-root handling.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod morphology;
pub mod sample;
pub mod tree;

pub use error::TreeError;
pub use morphology::Morphology;
pub use sample::{Sample, SampleTree, NPOS};
pub use tree::Tree;

//! Dendra: finite-volume discretization of compartmental cell models.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the dendra sub-crates. For most users, adding `dendra` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use dendra::prelude::*;
//!
//! // Soma plus one 200 µm dendrite with four compartments.
//! let mut builder = SomaCellBuilder::new(6.3);
//! builder.add_branch(0, 200.0, 0.5, 0.5, 4, "dend").unwrap();
//! let mut cell = builder.make_cell();
//! cell.paint("soma", "hh");
//! cell.paint("dend", "pas");
//! cell.place(Location::new(1, 0.5), "expsyn").unwrap();
//!
//! let gprop = GlobalProperties::default();
//! let cells = vec![cell];
//!
//! // Stage 1: geometry. Soma CV, junction CV, then one CV per
//! // compartment boundary.
//! let d = discretize(&cells, &gprop.default_parameters).unwrap();
//! assert_eq!(d.ncv, 6);
//! assert_eq!(d.parent_cv, vec![0, 0, 1, 2, 3, 4]);
//!
//! // Stage 2: mechanism assignment.
//! let data = build_mechanism_data(&gprop, &cells, &d).unwrap();
//! assert_eq!(data.mechanisms["expsyn"].cv, vec![3]);
//! assert_eq!(data.n_targets, 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `dendra-core` | Numeric aliases and geometry integrators |
//! | [`morph`] | `dendra-morph` | Parent-array trees, sample trees, branch morphology |
//! | [`cell`] | `dendra-cell` | Cable cells, paints, placements, catalogue |
//! | [`fvm`] | `dendra-fvm` | Discretization and mechanism data build |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Numeric aliases and geometry integrators (`dendra-core`).
pub use dendra_core as core;

/// Morphology model (`dendra-morph`).
///
/// Parent-array [`morph::Tree`] with rerooting, [`morph::SampleTree`]
/// and the branch decomposition [`morph::Morphology`].
pub use dendra_morph as morph;

/// Cable cell model (`dendra-cell`).
///
/// [`cell::CableCell`], [`cell::SomaCellBuilder`], painted properties,
/// placements, parameters and the [`cell::MechanismCatalogue`].
pub use dendra_cell as cell;

/// Finite-volume discretization (`dendra-fvm`).
///
/// [`fvm::discretize`] builds the CV geometry,
/// [`fvm::build_mechanism_data`] the per-mechanism and per-ion data.
pub use dendra_fvm as fvm;

/// Common imports for typical dendra usage.
///
/// ```rust
/// use dendra::prelude::*;
/// ```
pub mod prelude {
    pub use dendra_cell::{
        CableCell, CableParameters, CableSegment, GlobalProperties, IonData, Location,
        MechanismCatalogue, MechanismDesc, MechanismKind, Paintable, Placeable, Region, Segment,
        SomaCellBuilder,
    };
    pub use dendra_core::{Index, Size, Value};
    pub use dendra_fvm::{
        build_mechanism_data, discretize, Discretization, DividedCable, FvmError, IonConfig,
        MechanismConfig, MechanismData,
    };
    pub use dendra_morph::{Morphology, Sample, SampleTree, Tree};
}

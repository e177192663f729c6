//! Finite-volume discretization of cable cells.
//!
//! Two pipeline stages, run once per simulation build:
//!
//! 1. [`discretize`] flattens a population of
//!    [`CableCell`](dendra_cell::CableCell)s into a single control-volume
//!    index space and computes the per-CV geometric and electrical
//!    coefficients ([`Discretization`]).
//! 2. [`build_mechanism_data`] assigns painted density mechanisms and
//!    placed point mechanisms to CVs, validates ion dependencies and
//!    materializes reversal-potential providers ([`MechanismData`]).
//!
//! Both stages are single-threaded and deterministic: identical inputs
//! produce identical outputs, down to the iteration order of every map.
//!
//! # Units
//!
//! | Quantity | Unit |
//! |---|---|
//! | length, diameter | µm |
//! | area | µm² |
//! | volume | µm³ |
//! | membrane capacitance | F/m² (per-CV totals in pF) |
//! | axial resistivity | Ω·cm |
//! | face conductance | µS |
//! | concentration | mM |
//! | potential | mV |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compartment;
pub mod discretization;
pub mod error;
pub mod mechanism_data;
mod resolve;

pub use compartment::{DivCompartment, DividedCable, Semicompartment};
pub use discretization::{discretize, Discretization, SegmentInfo};
pub use error::FvmError;
pub use mechanism_data::{build_mechanism_data, IonConfig, MechanismConfig, MechanismData};

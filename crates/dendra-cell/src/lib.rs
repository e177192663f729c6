//! High-level cable cell model for the dendra discretization library.
//!
//! A [`CableCell`] owns a tree of [`Segment`]s (a spherical soma at the
//! root, tapered cables below), a list of *paints* (biophysical
//! properties applied to regions) and a list of *placements* (point
//! items attached to specific locations). [`GlobalProperties`] carries
//! the population-wide defaults and the [`MechanismCatalogue`] consulted
//! during discretization.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builder;
pub mod cell;
pub mod error;
pub mod mechanism;
pub mod parameters;
pub mod segment;

pub use builder::SomaCellBuilder;
pub use cell::{CableCell, Location, Paintable, Placeable, Region};
pub use error::CellError;
pub use mechanism::{
    IonDependency, MechanismCatalogue, MechanismDesc, MechanismInfo, MechanismKind,
};
pub use parameters::{CableParameters, GlobalProperties, IonData};
pub use segment::{CableSegment, Segment, SomaSegment};

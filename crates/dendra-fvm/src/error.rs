//! Error type for the discretization pipelines.

use dendra_cell::MechanismKind;
use std::fmt;

/// Errors aborting a discretization build.
///
/// Nothing is retried and no partial output is returned; the first
/// failure encountered in deterministic build order is reported.
#[derive(Clone, Debug, PartialEq)]
pub enum FvmError {
    /// A painted or placed mechanism is not in the catalogue.
    UnknownMechanism {
        /// The unresolved mechanism name.
        name: String,
    },
    /// A mechanism was used in a role its kind does not support, e.g. a
    /// point mechanism painted as a density.
    MechanismKindMismatch {
        /// Mechanism name.
        name: String,
        /// The kind required by the usage site.
        expected: MechanismKind,
    },
    /// A parameter override names a parameter the mechanism does not
    /// declare.
    UnknownParameter {
        /// Mechanism name.
        mechanism: String,
        /// The undeclared parameter.
        parameter: String,
    },
    /// A mechanism reads or writes an ion that is not a known species.
    UnknownIon {
        /// The unknown ion name.
        ion: String,
    },
    /// A mechanism's expected ion valence disagrees with the global
    /// species table.
    IonValenceMismatch {
        /// Ion name.
        ion: String,
        /// Valence the mechanism was built for.
        expected: i32,
        /// Valence registered in the species table.
        found: i32,
    },
    /// A multi-ion reversal potential mechanism is not consistently
    /// assigned across the ions it writes, or the assigned mechanism is
    /// not a reversal potential mechanism.
    RevpotMismatch {
        /// Ion whose assignment is inconsistent.
        ion: String,
        /// The offending mechanism name.
        mechanism: String,
    },
    /// A paint selects a region covering no membrane.
    EmptyRegion {
        /// Display form of the region selector.
        region: String,
    },
    /// A required default (capacitance, resistivity or ion data) is set
    /// neither on the cell nor globally.
    MissingParameter {
        /// What is missing.
        name: String,
    },
}

impl fmt::Display for FvmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMechanism { name } => {
                write!(f, "mechanism '{name}' is not in the catalogue")
            }
            Self::MechanismKindMismatch { name, expected } => {
                write!(f, "mechanism '{name}' is not a {expected} mechanism")
            }
            Self::UnknownParameter { mechanism, parameter } => {
                write!(f, "mechanism '{mechanism}' has no parameter '{parameter}'")
            }
            Self::UnknownIon { ion } => write!(f, "ion '{ion}' is not a known species"),
            Self::IonValenceMismatch { ion, expected, found } => {
                write!(
                    f,
                    "ion '{ion}' has valence {found}, but mechanism expects {expected}"
                )
            }
            Self::RevpotMismatch { ion, mechanism } => {
                write!(
                    f,
                    "reversal potential mechanism '{mechanism}' inconsistently assigned for ion '{ion}'"
                )
            }
            Self::EmptyRegion { region } => {
                write!(f, "paint on region {region} covers no membrane")
            }
            Self::MissingParameter { name } => {
                write!(f, "no value for {name} on cell or global defaults")
            }
        }
    }
}

impl std::error::Error for FvmError {}

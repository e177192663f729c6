//! Error types for morphology construction.

use std::fmt;

/// Errors arising from tree or sample-tree construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// A non-root entry references a parent at or after itself.
    ///
    /// Parent arrays must be strictly predecessor-referring:
    /// `parent[i] < i` for every `i >= 1`.
    InvalidParent {
        /// Index of the offending node.
        index: usize,
        /// The parent index it referenced.
        parent: usize,
    },
    /// A sample was appended with [`NPOS`](crate::NPOS) as parent to a
    /// non-empty tree, or with a parent that does not exist yet.
    InvalidSampleParent {
        /// Index the sample would have received.
        index: usize,
        /// The parent index it referenced.
        parent: usize,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParent { index, parent } => {
                write!(
                    f,
                    "node {index} references parent {parent}; parents must strictly precede"
                )
            }
            Self::InvalidSampleParent { index, parent } => {
                write!(f, "sample {index} references invalid parent {parent}")
            }
        }
    }
}

impl std::error::Error for TreeError {}

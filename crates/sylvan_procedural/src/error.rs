//! # Tree Generation Error Types
//!
//! All errors that can occur while generating a tree.
//!
//! Out-of-bounds targets, occupied cells and unknown grammar symbols are
//! expected during procedural generation and are never reported here.

use thiserror::Error;

/// Errors that can occur in tree generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreegenError {
    /// A `]` was interpreted while the save stack was empty.
    ///
    /// Nodes written before the failing command stay in the volume.
    #[error("unbalanced brackets: pop with empty stack at command {index}")]
    UnbalancedBrackets {
        /// Index of the offending command in the tokenized production.
        index: usize,
    },

    /// A node name has no identifier in the node registry.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// Invalid tree definition.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for tree generation.
pub type TreegenResult<T> = Result<T, TreegenError>;

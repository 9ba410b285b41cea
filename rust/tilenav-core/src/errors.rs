use thiserror::Error;

use crate::models::{Position, Region};

/// Structural failures during grid construction. Missing nodes and
/// unreachable targets are not errors; queries report them as empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("duplicate node at {position}")]
    DuplicateNode { position: Position },
    #[error("adjacency requested with {remaining} cells still unscanned")]
    ConstructionIncomplete { remaining: u64 },
    #[error("invalid build region {region:?}")]
    InvalidRegion { region: Region },
    #[error("builder already produced its grid")]
    AlreadyFinished,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCoordsError {
    #[error("expected {expected} comma-separated integers")]
    Arity { expected: usize },
    #[error("not an integer: {0:?}")]
    NotAnInteger(String),
}

//! Error types for quarry.

use std::path::PathBuf;

use crate::git::CloneError;
use crate::interfaces::ParseError;
use crate::walker::WalkError;

/// Top-level error type for quarry operations.
#[derive(Debug, thiserror::Error)]
pub enum QuarryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] WalkError),

    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Clone(#[from] CloneError),
}

/// Map an error to its exit code.
pub fn exit_code(error: &QuarryError) -> i32 {
    match error {
        QuarryError::Io(_) => 1,
        QuarryError::Walk(_) => 2,
        QuarryError::Clone(_) => 3,
        QuarryError::Parse { .. } => 1,
    }
}

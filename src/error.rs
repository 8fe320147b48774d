//! Error taxonomy for loading, expanding and merging sources.
//!
//! A malformed `#include` line is never an error; the classifier treats it
//! as ordinary text.

use std::io;
use std::path::{Path, PathBuf};

/// Failure to produce the lines of a file.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("unable to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SourceError {
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Open { path, .. } | SourceError::Read { path, .. } => path,
        }
    }
}

/// Failure of a single top-level expansion.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    /// The top-level file or a local header could not be loaded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A header includes itself, directly or through other headers.
    #[error("inclusion cycle: {}", display_chain(.chain))]
    InclusionCycle { chain: Vec<PathBuf> },

    #[error("include depth limit of {limit} exceeded at {}", .path.display())]
    DepthExceeded { path: PathBuf, limit: usize },

    /// The destination rejected a write.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

fn display_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Failure that stops a whole merge run.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("failed to write merged output: {0}")]
    Destination(#[source] io::Error),

    #[error("failed to write diagnostics: {0}")]
    Diagnostics(#[source] io::Error),
}

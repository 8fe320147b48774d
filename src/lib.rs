//! Unify - single-stream source merger
//!
//! Merges C source files into one text stream, replacing every
//! `#include "local.h"` line with the recursively expanded contents of that
//! header. System includes (`#include <...>`) and all other lines are copied
//! through unchanged.

pub mod config;
pub mod error;
pub mod expand;
pub mod explain;
pub mod merge;
pub mod source;

pub use config::{CliOverrides, CommitMode, ConfigError, UnifyConfig};
pub use error::{ExpandError, MergeError, SourceError};
pub use expand::{ExpandStats, Expander};
pub use explain::FileReport;
pub use merge::{FileOutcome, MergeReport, Merger};
pub use source::{path_from_bytes, FsLineSource, Line, LineSource, MemorySource};
pub use unify_classifier::{classify, Classification};

//! Merge driver.
//!
//! Expands each top-level file in order and appends the result to one
//! destination. A file that fails is reported on the diagnostic writer and
//! skipped; the remaining files are still processed. Only a broken
//! destination or diagnostic writer stops the run.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::config::{CommitMode, UnifyConfig};
use crate::error::{ExpandError, MergeError};
use crate::expand::{ExpandStats, Expander};
use crate::source::LineSource;

/// Result of one top-level file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ExpandStats, ExpandError>,
}

impl FileOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a merge run, in argument order.
#[derive(Debug, Default)]
pub struct MergeReport {
    pub outcomes: Vec<FileOutcome>,
}

impl MergeReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::succeeded)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn lines_emitted(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(|s| s.lines_emitted)
            .sum()
    }
}

/// Merges files through an [`Expander`].
pub struct Merger<'s, S: LineSource + ?Sized> {
    expander: Expander<'s, S>,
    commit: CommitMode,
}

impl<'s, S: LineSource + ?Sized> Merger<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            expander: Expander::new(source),
            commit: CommitMode::default(),
        }
    }

    pub fn from_config(source: &'s S, config: &UnifyConfig) -> Self {
        Self {
            expander: Expander::new(source).with_max_depth(config.max_depth),
            commit: config.commit,
        }
    }

    pub fn with_commit(mut self, commit: CommitMode) -> Self {
        self.commit = commit;
        self
    }

    /// Merge `files` into `dest`, reporting failures to `diagnostics`.
    pub fn merge<W, D, P>(
        &self,
        dest: &mut W,
        diagnostics: &mut D,
        files: &[P],
    ) -> Result<MergeReport, MergeError>
    where
        W: Write + ?Sized,
        D: Write + ?Sized,
        P: AsRef<Path>,
    {
        let mut report = MergeReport::default();

        for path in files {
            let path = path.as_ref();
            let result = match self.merge_one(path, dest) {
                Err(ExpandError::Write(source)) => return Err(MergeError::Destination(source)),
                other => other,
            };

            if let Err(err) = &result {
                warn!("{}: {}", path.display(), err);
                writeln!(
                    diagnostics,
                    "[ERROR] Unable to expand {}: {}",
                    path.display(),
                    err
                )
                    .map_err(MergeError::Diagnostics)?;
            }

            report.outcomes.push(FileOutcome {
                path: path.to_path_buf(),
                result,
            });
        }

        dest.flush().map_err(MergeError::Destination)?;
        info!(
            "merged {} file(s), {} failed, {} line(s) written",
            report.outcomes.len(),
            report.failure_count(),
            report.lines_emitted()
        );
        Ok(report)
    }

    fn merge_one<W: Write + ?Sized>(
        &self,
        path: &Path,
        dest: &mut W,
    ) -> Result<ExpandStats, ExpandError> {
        match self.commit {
            CommitMode::Stream => self.expander.expand(path, dest),
            CommitMode::Buffered => {
                let mut buffer = Vec::new();
                let stats = self.expander.expand(path, &mut buffer)?;
                dest.write_all(&buffer).map_err(ExpandError::Write)?;
                Ok(stats)
            }
        }
    }
}

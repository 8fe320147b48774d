//! Expansion of local includes with an explicit stack.
//!
//! The pending stack holds the lines still to be emitted for one top-level
//! file. Loading a file pushes its lines in reverse, so the top of the stack
//! is always the next line in document order and a nested header's lines
//! come out ahead of whatever followed its `#include`. Nesting depth never
//! grows the call stack.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use unify_classifier::classify;

use crate::error::ExpandError;
use crate::source::{path_from_bytes, Line, LineSource};

/// Default bound on nested includes; the top-level file is depth 1.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Entry on the pending stack.
enum Frame {
    Line(Line),
    /// All lines of the innermost open file have been consumed.
    EndOfFile,
}

/// A file currently being expanded.
struct OpenFile {
    path: PathBuf,
    identity: PathBuf,
}

/// Per-invocation state. Dropping it releases every pending line.
#[derive(Default)]
struct State {
    pending: Vec<Frame>,
    open: Vec<OpenFile>,
    active: HashSet<PathBuf>,
}

/// Counters for one finished expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandStats {
    pub lines_emitted: usize,
    /// Files read, the top-level file included.
    pub files_loaded: usize,
    pub deepest: usize,
}

/// Expands local includes using a [`LineSource`].
pub struct Expander<'s, S: LineSource + ?Sized> {
    source: &'s S,
    max_depth: usize,
}

impl<'s, S: LineSource + ?Sized> Expander<'s, S> {
    pub fn new(source: &'s S) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand `path`, writing each output line followed by `\n` to `out`.
    ///
    /// Lines are written as they are produced; on failure, whatever was
    /// already written stays written.
    pub fn expand<P: AsRef<Path>, W: Write + ?Sized>(
        &self,
        path: P,
        out: &mut W,
    ) -> Result<ExpandStats, ExpandError> {
        self.run(path.as_ref(), |line| {
            out.write_all(&line).map_err(ExpandError::Write)?;
            out.write_all(b"\n").map_err(ExpandError::Write)
        })
    }

    /// Expand `path` into a vector of lines.
    pub fn expand_lines<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Line>, ExpandError> {
        let mut lines = Vec::new();
        self.run(path.as_ref(), |line| {
            lines.push(line);
            Ok(())
        })?;
        Ok(lines)
    }

    fn run<F>(&self, path: &Path, mut emit: F) -> Result<ExpandStats, ExpandError>
    where
        F: FnMut(Line) -> Result<(), ExpandError>,
    {
        let mut state = State::default();
        let mut stats = ExpandStats::default();

        self.load(path.to_path_buf(), &mut state, &mut stats)?;

        while let Some(frame) = state.pending.pop() {
            match frame {
                Frame::EndOfFile => {
                    if let Some(done) = state.open.pop() {
                        state.active.remove(&done.identity);
                    }
                }
                Frame::Line(line) => match classify(&line).into_local_path() {
                    Some(target) => {
                        drop(line);
                        let target = path_from_bytes(&target);
                        debug!(
                            "inlining {} at depth {}",
                            target.display(),
                            state.open.len() + 1
                        );
                        if let Err(err) = self.load(target, &mut state, &mut stats) {
                            warn!(
                                "aborting expansion of {} with {} lines pending: {}",
                                path.display(),
                                state.pending.len(),
                                err
                            );
                            return Err(err);
                        }
                    }
                    None => {
                        emit(line)?;
                        stats.lines_emitted += 1;
                    }
                },
            }
        }

        Ok(stats)
    }

    /// Push the lines of `path` on top of the pending stack.
    fn load(
        &self,
        path: PathBuf,
        state: &mut State,
        stats: &mut ExpandStats,
    ) -> Result<(), ExpandError> {
        let identity = self.source.identity(&path);

        if state.active.contains(&identity) {
            let mut chain: Vec<PathBuf> = state.open.iter().map(|f| f.path.clone()).collect();
            chain.push(path);
            return Err(ExpandError::InclusionCycle { chain });
        }

        let depth = state.open.len() + 1;
        if depth > self.max_depth {
            return Err(ExpandError::DepthExceeded {
                path,
                limit: self.max_depth,
            });
        }

        let lines = self.source.read_lines(&path)?;
        debug!(
            "loaded {} ({} lines, depth {})",
            path.display(),
            lines.len(),
            depth
        );

        state.pending.push(Frame::EndOfFile);
        state.pending.extend(lines.into_iter().rev().map(Frame::Line));
        state.active.insert(identity.clone());
        state.open.push(OpenFile { path, identity });

        stats.files_loaded += 1;
        stats.deepest = stats.deepest.max(depth);
        Ok(())
    }
}

//! File-path chain stages: glob expansion and pattern exclusion.
//!
//! Both stages compile their patterns at construction time, so a
//! malformed pattern is a configuration error, never a per-item one.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

use crate::chain::handler::{Handler, Next};
use crate::error::ExtractError;

fn compile(pattern: &str) -> Result<GlobMatcher, ExtractError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| ExtractError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Expands a directory item into every matching file beneath it.
///
/// Files are forwarded in lexical order (the walk is sorted by file
/// name), matched by root-relative path. Non-directory input is a
/// silent no-op.
pub struct GlobExpandHandler {
    matcher: GlobMatcher,
}

impl GlobExpandHandler {
    /// Create a stage for the given include pattern (e.g. `**/*.py`).
    pub fn new(pattern: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            matcher: compile(pattern)?,
        })
    }
}

impl Handler<PathBuf> for GlobExpandHandler {
    fn handle(&self, item: PathBuf, next: &mut Next<'_, PathBuf>) -> Result<(), ExtractError> {
        if !item.is_dir() {
            return Ok(());
        }

        for entry in WalkDir::new(&item).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            // Match against the path relative to the fed directory so
            // patterns are independent of where the root lives.
            let relative = entry.path().strip_prefix(&item).unwrap_or(entry.path());
            if self.matcher.is_match(relative) {
                next.forward(entry.into_path())?;
            }
        }

        Ok(())
    }
}

/// Drops items matching any of the exclusion patterns.
///
/// Patterns are evaluated in the order supplied. A pattern without a
/// path separator matches against the file name alone; one with a
/// separator matches against the whole path.
pub struct ExcludeHandler {
    matchers: Vec<(GlobMatcher, bool)>,
}

impl ExcludeHandler {
    /// Create a stage for zero or more exclusion patterns.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ExtractError> {
        let matchers = patterns
            .iter()
            .map(|p| {
                let pattern = p.as_ref();
                compile(pattern).map(|m| (m, pattern.contains('/')))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    fn is_excluded(&self, item: &Path) -> bool {
        for (matcher, full_path) in &self.matchers {
            let matched = if *full_path {
                matcher.is_match(item)
            } else {
                item.file_name().is_some_and(|name| matcher.is_match(name))
            };
            if matched {
                debug!(path = %item.display(), pattern = matcher.glob().glob(), "excluded");
                return true;
            }
        }
        false
    }
}

impl Handler<PathBuf> for ExcludeHandler {
    fn handle(&self, item: PathBuf, next: &mut Next<'_, PathBuf>) -> Result<(), ExtractError> {
        if self.is_excluded(&item) {
            return Ok(());
        }
        next.forward(item)
    }
}

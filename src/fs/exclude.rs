//! Glob-based exclusion of directories from the tree.
//!
//! Patterns are matched against the directory's full path, and `*` also
//! matches `/`, so `*/node_modules` hides a `node_modules` directory at any
//! depth. Matching is case-sensitive.

use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::error::{AppError, Result};

/// Ordered set of exclusion globs. Only ever consulted for directories.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExclusionFilter {
    /// Compile `patterns`; the first malformed one fails the whole filter.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .build()
                .map_err(|source| AppError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| AppError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { patterns, set })
    }

    /// A filter that excludes nothing.
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Whether a directory at `path` should be hidden.
    pub fn is_excluded(&self, path: &Path) -> bool {
        !self.patterns.is_empty() && self.set.is_match(path)
    }

    /// The patterns in the order they were given.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::empty()
    }
}

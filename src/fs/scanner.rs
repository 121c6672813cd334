//! One-level directory listing.
//!
//! [`DirScanner::scan`] reads the immediate children of a directory, drops
//! excluded subdirectories, and returns directories and files as two
//! independently sorted groups.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::fs::exclude::ExclusionFilter;
use crate::fs::tree::TreeNode;

/// Immediate children of one directory, split and sorted.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Subdirectories, each still unloaded with its placeholder child.
    pub dirs: Vec<TreeNode>,
    /// Files and every other non-expandable entry.
    pub files: Vec<TreeNode>,
}

impl ScanResult {
    /// Concatenate into display order: all directories, then all files.
    pub fn into_children(self) -> Vec<TreeNode> {
        let mut children = self.dirs;
        children.extend(self.files);
        children
    }

    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lists directories according to an exclusion filter and symlink policy.
///
/// Clones share the compiled filter, so handing a scanner to a background
/// task does not rebuild the glob set.
#[derive(Debug, Clone, Default)]
pub struct DirScanner {
    exclude: Arc<ExclusionFilter>,
    follow_symlinks: bool,
}

impl DirScanner {
    pub fn new(exclude: ExclusionFilter, follow_symlinks: bool) -> Self {
        Self {
            exclude: Arc::new(exclude),
            follow_symlinks,
        }
    }

    pub fn exclude(&self) -> &ExclusionFilter {
        &self.exclude
    }

    pub fn follows_symlinks(&self) -> bool {
        self.follow_symlinks
    }

    /// List the immediate children of `dir`.
    ///
    /// Fails with [`AppError::Scan`] if `dir` cannot be read. An entry that
    /// vanishes between listing and classification is kept as a file.
    pub fn scan(&self, dir: &Path) -> Result<ScanResult> {
        let started = Instant::now();
        let entries = fs::read_dir(dir).map_err(|e| AppError::scan(dir, e))?;

        let mut result = ScanResult::default();
        let mut excluded = 0usize;

        // `read_dir` never yields `.` or `..`.
        for entry in entries {
            let entry = entry.map_err(|e| AppError::scan(dir, e))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let (is_dir, is_symlink) = self.classify(&entry);

            if is_dir {
                if self.exclude.is_excluded(&path) {
                    excluded += 1;
                    continue;
                }
                result.dirs.push(TreeNode::directory(name, path, is_symlink));
            } else {
                result.files.push(TreeNode::file(name, path, is_symlink));
            }
        }

        result.dirs.sort_by(|a, b| a.name.cmp(&b.name));
        result.files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            dir = %dir.display(),
            dirs = result.dirs.len(),
            files = result.files.len(),
            excluded,
            "scanned in {:.2?}",
            started.elapsed()
        );
        Ok(result)
    }

    /// Returns `(is_dir, is_symlink)` for an entry.
    fn classify(&self, entry: &fs::DirEntry) -> (bool, bool) {
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(_) => return (false, false),
        };
        if !file_type.is_symlink() {
            return (file_type.is_dir(), false);
        }
        if !self.follow_symlinks {
            return (false, true);
        }
        // Broken links resolve to an error and stay leaves.
        let target_is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);
        (target_is_dir, true)
    }
}

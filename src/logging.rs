//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so log lines go to a file. `RUST_LOG`
//! takes precedence over the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter from `RUST_LOG`, falling back to `default_level`.
///
/// An unparsable `default_level` falls back to `info`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// Build a subscriber writing plain-text lines to `log_file`.
pub fn build_subscriber(
    log_file: File,
    filter: EnvFilter,
) -> impl tracing::Subscriber + Send + Sync {
    let fmt_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry().with(fmt_layer).with(filter)
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).ok()?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. Returns `false` when logging stays off,
/// either because no file is configured or because it cannot be opened.
pub fn init(log_file: Option<&Path>, default_level: &str) -> bool {
    let Some(file) = log_file.and_then(open_log_file) else {
        return false;
    };
    build_subscriber(file, env_filter(default_level))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("lft.log");
        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_fails_under_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        File::create(&blocker).unwrap();
        assert!(open_log_file(&blocker.join("lft.log")).is_none());
    }

    #[test]
    fn test_init_without_file_is_disabled() {
        assert!(!init(None, "debug"));
    }

    #[test]
    fn test_subscriber_writes_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lft.log");
        let file = open_log_file(&path).unwrap();
        let subscriber = build_subscriber(file, EnvFilter::new("info"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(children = 3, "expanded");
            tracing::debug!("filtered out");
        });

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("expanded"));
        assert!(content.contains("children=3"));
        assert!(!content.contains("filtered out"));
        assert!(!content.contains('\u{1b}'));
    }

    #[test]
    fn test_log_file_is_appended() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("lft.log");
        fs::write(&path, "previous run\n").unwrap();
        let file = open_log_file(&path).unwrap();
        tracing::subscriber::with_default(build_subscriber(file, EnvFilter::new("info")), || {
            tracing::warn!("second run");
        });
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous run"));
        assert!(content.contains("second run"));
    }
}

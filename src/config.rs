//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--exclude`, `--eager`, `--theme`, etc.)
//! 2. `--config <file>`
//! 3. `$LFT_CONFIG` environment variable (path to config file)
//! 4. Project-local `.lft.toml` in the current working directory
//! 5. Global `~/.config/lft/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General application settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
}

/// Tree loading and display settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TreeConfig {
    /// Glob patterns for directories to hide, matched against the full path.
    pub exclude_patterns: Option<Vec<String>>,
    /// Load directory contents on expand (false = scan everything up front).
    pub lazy_loading: Option<bool>,
    /// Treat symlinks to directories as directories.
    pub follow_symlinks: Option<bool>,
    /// Run expand scans off the UI thread.
    pub background_scan: Option<bool>,
    /// Use nerd font icons (false = ASCII fallback).
    pub use_icons: Option<bool>,
}

/// Color settings for a single theme palette.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeColorsConfig {
    pub tree_fg: Option<String>,
    pub tree_selected_bg: Option<String>,
    pub tree_selected_fg: Option<String>,
    pub tree_dir_fg: Option<String>,
    pub tree_file_fg: Option<String>,
    pub tree_symlink_fg: Option<String>,
    pub status_bg: Option<String>,
    pub status_fg: Option<String>,
    pub border_fg: Option<String>,
}

/// Theme configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color scheme: "dark", "light", "custom".
    pub scheme: Option<String>,
    /// Custom color overrides.
    pub custom: Option<ThemeColorsConfig>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path. The terminal belongs to the UI, so logs never go there.
    pub file: Option<String>,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub tree: TreeConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

/// Default log filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("LFT_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".lft.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("lft").join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
            },
            tree: TreeConfig {
                exclude_patterns: other
                    .tree
                    .exclude_patterns
                    .clone()
                    .or(self.tree.exclude_patterns),
                lazy_loading: other.tree.lazy_loading.or(self.tree.lazy_loading),
                follow_symlinks: other.tree.follow_symlinks.or(self.tree.follow_symlinks),
                background_scan: other.tree.background_scan.or(self.tree.background_scan),
                use_icons: other.tree.use_icons.or(self.tree.use_icons),
            },
            theme: ThemeConfig {
                scheme: other.theme.scheme.clone().or(self.theme.scheme),
                custom: match (&self.theme.custom, &other.theme.custom) {
                    (_, Some(o)) => Some(o.clone()),
                    (Some(s), None) => Some(s.clone()),
                    (None, None) => None,
                },
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
                level: other.log.level.clone().or(self.log.level),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Exclusion globs in configured order.
    pub fn exclude_patterns(&self) -> &[String] {
        self.tree.exclude_patterns.as_deref().unwrap_or(&[])
    }

    pub fn lazy_loading(&self) -> bool {
        self.tree.lazy_loading.unwrap_or(true)
    }

    pub fn follow_symlinks(&self) -> bool {
        self.tree.follow_symlinks.unwrap_or(false)
    }

    pub fn background_scan(&self) -> bool {
        self.tree.background_scan.unwrap_or(true)
    }

    pub fn use_icons(&self) -> bool {
        self.tree.use_icons.unwrap_or(true)
    }

    /// Theme scheme: "dark", "light", or "custom".
    pub fn theme_scheme(&self) -> &str {
        self.theme.scheme.as_deref().unwrap_or("dark")
    }

    /// Log file path, defaulting to `<cache_dir>/lft/lft.log`.
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.log.file {
            Some(file) => Some(PathBuf::from(file)),
            None => dirs::cache_dir().map(|d| d.join("lft").join("lft.log")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

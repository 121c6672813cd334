mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod icons;
mod logging;
mod theme;
mod tui;
mod ui;
mod view;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, LogConfig, ThemeConfig, TreeConfig};
use crate::error::AppError;
use crate::event::{Event, EventHandler};
use crate::fs::exclude::ExclusionFilter;
use crate::fs::scanner::DirScanner;
use crate::fs::tree::{LazyTree, LoadMode};
use crate::icons::IconSet;
use crate::tui::{install_panic_hook, Tui};

/// A terminal directory tree that loads directories on demand.
#[derive(Parser, Debug)]
#[command(name = "lft", version, about)]
struct Cli {
    /// Root directory to display (defaults to the configured path, then ".")
    path: Option<PathBuf>,

    /// Hide directories whose full path matches this glob (repeatable)
    #[arg(short = 'e', long = "exclude", value_name = "GLOB")]
    exclude: Vec<String>,

    /// Scan the whole tree up front instead of on expand
    #[arg(long)]
    eager: bool,

    /// Treat symlinks to directories as directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Use ASCII markers instead of nerd font icons
    #[arg(long)]
    no_icons: bool,

    /// Scan expanded directories on the UI thread
    #[arg(long)]
    sync_scan: bool,

    /// Path to a config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color scheme: dark, light, custom
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Partial config holding only the flags that were given.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            tree: TreeConfig {
                lazy_loading: self.eager.then_some(false),
                follow_symlinks: self.follow_symlinks.then_some(true),
                background_scan: self.sync_scan.then_some(false),
                use_icons: self.no_icons.then_some(false),
                ..Default::default()
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
                level: None,
            },
            ..Default::default()
        }
    }

    /// Config exclusions first, then the ones given on the command line.
    fn exclude_patterns(&self, config: &AppConfig) -> Vec<String> {
        config
            .exclude_patterns()
            .iter()
            .chain(self.exclude.iter())
            .cloned()
            .collect()
    }
}

/// Pick the root directory: CLI path, then `default_path`, then ".".
fn resolve_root(cli_path: Option<PathBuf>, config: &AppConfig) -> error::Result<PathBuf> {
    let path = cli_path
        .or_else(|| config.general.default_path.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    let path = path
        .canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", path.display())))?;
    if !path.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let log_file = config.log_file();
    if logging::init(log_file.as_deref(), config.log_level()) {
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting lft");
    }

    let root = resolve_root(cli.path.clone(), &config)?;
    let exclude = ExclusionFilter::new(cli.exclude_patterns(&config))?;
    let scanner = DirScanner::new(exclude, config.follow_symlinks());
    tracing::debug!(
        root = %root.display(),
        excludes = ?scanner.exclude().patterns(),
        follow_symlinks = scanner.follows_symlinks(),
        "scanner configured"
    );
    let icon_set = IconSet::from_use_icons(config.use_icons());
    let tree = LazyTree::new(
        &root,
        scanner,
        LoadMode::from_lazy(config.lazy_loading()),
        icon_set.resolver(),
    )?;
    let theme = theme::resolve_theme(&config.theme);

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut events = EventHandler::new(Duration::from_millis(16));
    let scan_tx = config.background_scan().then(|| events.sender());
    let mut app = App::new(tree, theme, icon_set, scan_tx);

    let result = run(&mut tui, &mut events, &mut app).await;
    tui.restore()?;
    if let Err(ref e) = result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

async fn run(tui: &mut Tui, events: &mut EventHandler, app: &mut App) -> error::Result<()> {
    loop {
        tui.draw(app)?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(app, key),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
            Event::ScanComplete(done) => app.handle_scan_complete(done),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

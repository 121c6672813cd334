use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::sync::mpsc;

use crate::error::AppError;
use crate::event::Event;
use crate::fs::loader::{self, ScanComplete};
use crate::fs::tree::{ExpandOutcome, ExpandStart, LazyTree, NodeType};
use crate::icons::IconSet;
use crate::theme::ThemeColors;
use crate::view::TreeView;

/// Main application state.
pub struct App {
    pub tree: LazyTree,
    pub view: TreeView,
    pub theme: ThemeColors,
    pub icon_set: IconSet,
    pub should_quit: bool,
    /// Message, whether it is an error, and when it was set.
    pub status_message: Option<(String, bool, Instant)>,
    /// Present when expand scans run in the background.
    scan_tx: Option<mpsc::UnboundedSender<Event>>,
}

impl App {
    /// Create the app around an already built tree.
    ///
    /// With `scan_tx`, expansions are scanned off-thread and applied when
    /// the matching [`Event::ScanComplete`] arrives.
    pub fn new(
        tree: LazyTree,
        theme: ThemeColors,
        icon_set: IconSet,
        scan_tx: Option<mpsc::UnboundedSender<Event>>,
    ) -> Self {
        let view = TreeView::new(&tree);
        Self {
            tree,
            view,
            theme,
            icon_set,
            should_quit: false,
            status_message: None,
            scan_tx,
        }
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn background_scan(&self) -> bool {
        self.scan_tx.is_some()
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, false, Instant::now()));
    }

    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, true, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 3 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, _, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 3 {
                self.status_message = None;
            }
        }
    }

    pub fn select_next(&mut self) {
        self.view.select_next();
    }

    pub fn select_previous(&mut self) {
        self.view.select_previous();
    }

    pub fn select_first(&mut self) {
        self.view.select_first();
    }

    pub fn select_last(&mut self) {
        self.view.select_last();
    }

    /// Expand the selected directory, loading it first if needed.
    pub fn expand_selected(&mut self) {
        let Some(item) = self.view.selected() else {
            return;
        };
        if item.node_type != NodeType::Directory {
            return;
        }
        let path = item.path.clone();
        self.request_expand(&path);
        self.view.flatten(&self.tree);
    }

    /// Collapse the selected directory, or jump to its parent row.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.view.selected() else {
            return;
        };
        if item.node_type == NodeType::Directory && item.is_expanded {
            let path = item.path.clone();
            self.view.expanded.remove(&path);
            self.view.flatten(&self.tree);
            return;
        }
        self.view.select_parent();
    }

    /// Expand on a collapsed directory, collapse on an expanded one.
    pub fn toggle_selected(&mut self) {
        let expanded = self
            .view
            .selected()
            .is_some_and(|item| item.node_type == NodeType::Directory && item.is_expanded);
        if expanded {
            self.collapse_selected();
        } else {
            self.expand_selected();
        }
    }

    /// Apply a finished background scan.
    pub fn handle_scan_complete(&mut self, done: ScanComplete) {
        let path = done.ticket.path().to_path_buf();
        match self.tree.finish_expand(done.ticket, done.result) {
            Ok(ExpandOutcome::Loaded { .. }) => self.resume_expansions(Some(&path)),
            Ok(_) => {}
            Err(e) => self.expand_failed(&path, e),
        }
        self.view.flatten(&self.tree);
    }

    /// Rebuild the tree from disk, re-opening previously expanded directories.
    pub fn reset(&mut self) {
        match self.tree.reset() {
            Ok(()) => {
                self.resume_expansions(None);
                self.set_status_message(format!(
                    "Reloaded {}",
                    self.tree.root_path().display()
                ));
            }
            Err(e) => {
                // Outstanding scans were invalidated along with the old
                // generation; nothing will fill these rows any more.
                self.view.collapse_unloaded(&self.tree);
                self.set_error_message(format!("Reload failed: {e}"));
            }
        }
        self.view.flatten(&self.tree);
    }

    /// Switch to the next built-in icon set and re-resolve every icon.
    pub fn cycle_icons(&mut self) {
        self.icon_set = self.icon_set.next();
        self.tree.set_icon_resolver(self.icon_set.resolver());
        self.tree.reload_icons();
        self.view.flatten(&self.tree);
        self.set_status_message(format!("Icons: {}", self.tree.icon_resolver_name()));
    }

    /// Mark `path` expanded and make sure its children get loaded.
    fn request_expand(&mut self, path: &Path) {
        self.view.expanded.insert(path.to_path_buf());

        let Some(tx) = self.scan_tx.clone() else {
            match self.tree.expand(path) {
                Ok(ExpandOutcome::Loaded { .. }) | Ok(ExpandOutcome::AlreadyLoaded) => {
                    self.resume_expansions(Some(path))
                }
                Ok(_) => {}
                Err(e) => self.expand_failed(path, e),
            }
            return;
        };

        match self.tree.begin_expand(path) {
            Ok(ExpandStart::Scan(ticket)) => {
                loader::spawn_scan(self.tree.scanner().clone(), ticket, tx)
            }
            Ok(ExpandStart::Skip(ExpandOutcome::AlreadyLoaded)) => {
                self.resume_expansions(Some(path))
            }
            Ok(ExpandStart::Skip(_)) => {}
            Err(e) => self.expand_failed(path, e),
        }
    }

    /// Load children of `parent` (or the top level) that the view still
    /// shows as expanded but that the tree has not loaded.
    fn resume_expansions(&mut self, parent: Option<&Path>) {
        let pending: Vec<PathBuf> = match parent {
            None => self.view.pending_expansions(self.tree.display_tree()),
            Some(p) => match self.tree.find(p) {
                Some(node) => self.view.pending_expansions(&node.children),
                None => Vec::new(),
            },
        };
        for path in pending {
            self.request_expand(&path);
        }
    }

    fn expand_failed(&mut self, path: &Path, err: AppError) {
        self.view.expanded.remove(path);
        self.set_error_message(err.to_string());
    }
}

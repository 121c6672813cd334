//! Flattened, selectable rendering of the materialized tree.
//!
//! Expanded/collapsed is view state: it lives here as a set of paths, not on
//! the nodes. Collapsing never discards loaded children.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::fs::tree::{LazyTree, NodeType, TreeNode};

/// Label shown for the placeholder of an expanded, still-unloaded directory.
pub const LOADING_LABEL: &str = "loading…";

/// A flattened representation of a tree node for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub name: String,
    pub path: PathBuf,
    pub node_type: NodeType,
    pub is_symlink: bool,
    pub depth: usize,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    pub icon: String,
}

/// Selection, scroll position and expansion state over a [`LazyTree`].
#[derive(Debug, Default)]
pub struct TreeView {
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub expanded: HashSet<PathBuf>,
}

impl TreeView {
    pub fn new(tree: &LazyTree) -> Self {
        let mut view = Self::default();
        view.flatten(tree);
        view
    }

    /// Rebuild `flat_items`, keeping the selection on the same path if it
    /// is still visible.
    pub fn flatten(&mut self, tree: &LazyTree) {
        let selected_path = self.selected().map(|item| item.path.clone());

        let mut items = Vec::new();
        Self::flatten_nodes(tree, tree.display_tree(), 0, &self.expanded, &mut items);
        self.flat_items = items;

        if let Some(path) = selected_path.filter(|p| !p.as_os_str().is_empty()) {
            if let Some(idx) = self.find_index_by_path(&path) {
                self.selected_index = idx;
                return;
            }
        }
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_nodes(
        tree: &LazyTree,
        nodes: &[TreeNode],
        depth: usize,
        expanded: &HashSet<PathBuf>,
        items: &mut Vec<FlatItem>,
    ) {
        for (i, node) in nodes.iter().enumerate() {
            let is_expanded = node.is_dir() && expanded.contains(&node.path);
            let (name, icon) = if node.is_placeholder() {
                (LOADING_LABEL.to_string(), String::new())
            } else {
                let icon = tree
                    .icon(&node.path)
                    .map(|i| i.as_str().to_string())
                    .unwrap_or_default();
                (node.name.clone(), icon)
            };
            items.push(FlatItem {
                name,
                path: node.path.clone(),
                node_type: node.node_type,
                is_symlink: node.is_symlink,
                depth,
                is_expanded,
                is_last_sibling: i + 1 == nodes.len(),
                icon,
            });
            if is_expanded {
                Self::flatten_nodes(tree, &node.children, depth + 1, expanded, items);
            }
        }
    }

    pub fn selected(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Find the flat_items index of a node by its path.
    pub fn find_index_by_path(&self, path: &Path) -> Option<usize> {
        self.flat_items.iter().position(|item| item.path == path)
    }

    /// Move the selection to the parent row of the selected item.
    pub fn select_parent(&mut self) -> bool {
        let Some(item) = self.selected() else {
            return false;
        };
        let idx = self.selected_index;
        let depth = item.depth;
        if depth == 0 {
            return false;
        }
        // The parent is the nearest preceding row one level up.
        match self.flat_items[..idx].iter().rposition(|i| i.depth + 1 == depth) {
            Some(parent) => {
                self.selected_index = parent;
                true
            }
            None => false,
        }
    }

    /// Update the scroll offset to ensure the selected item is visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }

    /// Collapse every expanded directory that the tree has not loaded.
    pub fn collapse_unloaded(&mut self, tree: &LazyTree) {
        self.expanded
            .retain(|path| !matches!(tree.find(path), Some(node) if !node.loaded));
    }

    /// Expanded directories among `nodes` whose children are not loaded yet.
    pub fn pending_expansions(&self, nodes: &[TreeNode]) -> Vec<PathBuf> {
        nodes
            .iter()
            .filter(|n| n.is_dir() && !n.loaded && self.expanded.contains(&n.path))
            .map(|n| n.path.clone())
            .collect()
    }
}

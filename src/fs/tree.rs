//! In-memory directory tree with on-demand loading.
//!
//! [`LazyTree`] owns every [`TreeNode`] and is the only thing that mutates
//! them. In lazy mode only the top level is scanned up front; each unloaded
//! directory carries a single placeholder child until it is expanded.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::scanner::{DirScanner, ScanResult};
use crate::icons::{IconHandle, IconResolver};

/// Type of tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Directory,
    /// Any entry that cannot be expanded, including unfollowed symlinks.
    File,
    /// Synthetic child of an unloaded directory. Has no path.
    Placeholder,
}

/// A node in the filesystem tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub path: PathBuf,
    pub node_type: NodeType,
    pub is_symlink: bool,
    /// True once real children are attached. Always true for files.
    pub loaded: bool,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// An unloaded directory holding exactly one placeholder child.
    pub fn directory(name: String, path: PathBuf, is_symlink: bool) -> Self {
        Self {
            name,
            path,
            node_type: NodeType::Directory,
            is_symlink,
            loaded: false,
            children: vec![Self::placeholder()],
        }
    }

    pub fn file(name: String, path: PathBuf, is_symlink: bool) -> Self {
        Self {
            name,
            path,
            node_type: NodeType::File,
            is_symlink,
            loaded: true,
            children: Vec::new(),
        }
    }

    pub fn placeholder() -> Self {
        Self {
            name: String::new(),
            path: PathBuf::new(),
            node_type: NodeType::Placeholder,
            is_symlink: false,
            loaded: true,
            children: Vec::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    pub fn is_placeholder(&self) -> bool {
        self.node_type == NodeType::Placeholder
    }

    /// Swap the placeholder for real children and mark the node loaded.
    fn attach_children(&mut self, children: Vec<TreeNode>) {
        self.children = children;
        self.loaded = true;
    }
}

/// Whether `build` scans one level or the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    #[default]
    Lazy,
    Eager,
}

impl LoadMode {
    pub fn from_lazy(lazy: bool) -> Self {
        if lazy {
            LoadMode::Lazy
        } else {
            LoadMode::Eager
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadMode::Lazy => "lazy",
            LoadMode::Eager => "eager",
        }
    }
}

/// Proof that a node was claimed for loading in a given tree generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandTicket {
    generation: u64,
    path: PathBuf,
}

impl ExpandTicket {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What an expand request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Real children were attached.
    Loaded { children: usize },
    /// The node was already loaded; nothing was scanned.
    AlreadyLoaded,
    /// Another request for the same node is still scanning.
    InFlight,
    /// The result belonged to a tree discarded by `reset`.
    Stale,
}

/// First half of an expand: either a ticket to scan, or an immediate answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandStart {
    Scan(ExpandTicket),
    Skip(ExpandOutcome),
}

/// Build the top-level node list for `root`.
///
/// Lazy mode scans `root` only. Eager mode scans every non-excluded
/// directory below it; any scan failure fails the whole build.
pub fn build(scanner: &DirScanner, root: &Path, mode: LoadMode) -> Result<Vec<TreeNode>> {
    match mode {
        LoadMode::Lazy => Ok(scanner.scan(root)?.into_children()),
        LoadMode::Eager => {
            let mut ancestors = Vec::new();
            if scanner.follows_symlinks() {
                ancestors.push(std::fs::canonicalize(root).map_err(|e| AppError::scan(root, e))?);
            }
            build_eager(scanner, root, &mut ancestors)
        }
    }
}

/// `ancestors` holds canonical paths of the directories on the current
/// recursion path; it is only maintained when symlinks are followed.
fn build_eager(
    scanner: &DirScanner,
    dir: &Path,
    ancestors: &mut Vec<PathBuf>,
) -> Result<Vec<TreeNode>> {
    let mut children = scanner.scan(dir)?.into_children();
    for child in children.iter_mut().filter(|c| c.is_dir()) {
        if !scanner.follows_symlinks() {
            let grandchildren = build_eager(scanner, &child.path, ancestors)?;
            child.attach_children(grandchildren);
            continue;
        }

        let canonical =
            std::fs::canonicalize(&child.path).map_err(|e| AppError::scan(&child.path, e))?;
        if ancestors.contains(&canonical) {
            tracing::warn!(path = %child.path.display(), "symlink loop, not descending");
            child.attach_children(Vec::new());
            continue;
        }
        ancestors.push(canonical);
        let grandchildren = build_eager(scanner, &child.path, ancestors);
        ancestors.pop();
        child.attach_children(grandchildren?);
    }
    Ok(children)
}

fn find_node<'a>(nodes: &'a [TreeNode], target: &Path) -> Option<&'a TreeNode> {
    for node in nodes {
        if node.is_placeholder() {
            continue;
        }
        if node.path == target {
            return Some(node);
        }
        if node.is_dir() && target.starts_with(&node.path) {
            return find_node(&node.children, target);
        }
    }
    None
}

fn find_node_mut<'a>(nodes: &'a mut [TreeNode], target: &Path) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.is_placeholder() {
            continue;
        }
        if node.path == target {
            return Some(node);
        }
        if node.is_dir() && target.starts_with(&node.path) {
            return find_node_mut(&mut node.children, target);
        }
    }
    None
}

fn collect_icons(
    nodes: &[TreeNode],
    resolver: &dyn IconResolver,
    out: &mut HashMap<PathBuf, IconHandle>,
) {
    for node in nodes.iter().filter(|n| !n.is_placeholder()) {
        out.insert(node.path.clone(), resolver.resolve(node));
        collect_icons(&node.children, resolver, out);
    }
}

/// Owner of the displayed tree and the single place it is mutated.
pub struct LazyTree {
    root_path: PathBuf,
    scanner: DirScanner,
    mode: LoadMode,
    nodes: Vec<TreeNode>,
    /// Bumped on every reset; tickets from older generations are ignored.
    generation: u64,
    in_flight: HashSet<PathBuf>,
    icon_resolver: Box<dyn IconResolver>,
    icons: HashMap<PathBuf, IconHandle>,
}

impl LazyTree {
    /// Scan `root_path` and build the initial tree.
    pub fn new(
        root_path: impl Into<PathBuf>,
        scanner: DirScanner,
        mode: LoadMode,
        icon_resolver: Box<dyn IconResolver>,
    ) -> Result<Self> {
        let root_path = root_path.into();
        let nodes = build(&scanner, &root_path, mode)?;
        let mut tree = Self {
            root_path,
            scanner,
            mode,
            nodes,
            generation: 0,
            in_flight: HashSet::new(),
            icon_resolver,
            icons: HashMap::new(),
        };
        tree.reload_icons();
        tracing::info!(
            root = %tree.root_path.display(),
            mode = tree.mode.label(),
            top_level = tree.nodes.len(),
            "tree built"
        );
        Ok(tree)
    }

    /// Top-level nodes in display order.
    pub fn display_tree(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scanner(&self) -> &DirScanner {
        &self.scanner
    }

    pub fn find(&self, path: &Path) -> Option<&TreeNode> {
        if path.as_os_str().is_empty() {
            return None;
        }
        find_node(&self.nodes, path)
    }

    pub fn is_in_flight(&self, path: &Path) -> bool {
        self.in_flight.contains(path)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Load `path`'s children synchronously.
    pub fn expand(&mut self, path: &Path) -> Result<ExpandOutcome> {
        match self.begin_expand(path)? {
            ExpandStart::Skip(outcome) => Ok(outcome),
            ExpandStart::Scan(ticket) => {
                let result = self.scanner.scan(ticket.path());
                self.finish_expand(ticket, result)
            }
        }
    }

    /// Claim `path` for loading.
    ///
    /// Returns a ticket when the caller should scan, or an immediate outcome
    /// when the node is already loaded or another scan is outstanding.
    pub fn begin_expand(&mut self, path: &Path) -> Result<ExpandStart> {
        // Placeholders carry no path and are never expandable.
        if path.as_os_str().is_empty() {
            return Err(AppError::InvalidExpandTarget(path.to_path_buf()));
        }
        let node = self
            .find(path)
            .ok_or_else(|| AppError::NodeNotFound(path.to_path_buf()))?;
        if !node.is_dir() {
            return Err(AppError::InvalidExpandTarget(path.to_path_buf()));
        }
        if node.loaded {
            return Ok(ExpandStart::Skip(ExpandOutcome::AlreadyLoaded));
        }
        if !self.in_flight.insert(path.to_path_buf()) {
            return Ok(ExpandStart::Skip(ExpandOutcome::InFlight));
        }
        Ok(ExpandStart::Scan(ExpandTicket {
            generation: self.generation,
            path: path.to_path_buf(),
        }))
    }

    /// Apply a scan started by [`begin_expand`](Self::begin_expand).
    ///
    /// On failure the node keeps its placeholder and stays unloaded.
    pub fn finish_expand(
        &mut self,
        ticket: ExpandTicket,
        result: Result<ScanResult>,
    ) -> Result<ExpandOutcome> {
        if ticket.generation != self.generation {
            tracing::warn!(
                path = %ticket.path.display(),
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale scan result"
            );
            return Ok(ExpandOutcome::Stale);
        }
        self.in_flight.remove(&ticket.path);

        let children = match result {
            Ok(scan) => scan.into_children(),
            Err(e) => {
                tracing::warn!(path = %ticket.path.display(), error = %e, "expand failed");
                return Err(e);
            }
        };
        let new_icons: Vec<(PathBuf, IconHandle)> = children
            .iter()
            .map(|c| (c.path.clone(), self.icon_resolver.resolve(c)))
            .collect();

        let node = find_node_mut(&mut self.nodes, &ticket.path)
            .ok_or_else(|| AppError::NodeNotFound(ticket.path.clone()))?;
        if node.loaded {
            return Ok(ExpandOutcome::AlreadyLoaded);
        }
        let count = children.len();
        node.attach_children(children);
        self.icons.extend(new_icons);

        tracing::debug!(path = %ticket.path.display(), children = count, "expanded");
        Ok(ExpandOutcome::Loaded { children: count })
    }

    /// Throw the tree away and rebuild it from the root.
    ///
    /// Outstanding tickets become stale even if the rebuild fails, in which
    /// case the previous nodes stay displayed.
    pub fn reset(&mut self) -> Result<()> {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight.clear();
        self.nodes = build(&self.scanner, &self.root_path, self.mode)?;
        self.reload_icons();
        tracing::info!(
            root = %self.root_path.display(),
            generation = self.generation,
            top_level = self.nodes.len(),
            "tree reset"
        );
        Ok(())
    }

    /// Icon resolved for the node at `path`, if it is materialized.
    pub fn icon(&self, path: &Path) -> Option<&IconHandle> {
        self.icons.get(path)
    }

    pub fn icon_resolver_name(&self) -> &'static str {
        self.icon_resolver.name()
    }

    /// Swap the icon strategy. Call [`reload_icons`](Self::reload_icons)
    /// to apply it to nodes already in the tree.
    pub fn set_icon_resolver(&mut self, resolver: Box<dyn IconResolver>) {
        self.icon_resolver = resolver;
    }

    /// Re-resolve icons for every materialized node, collapsed or not.
    pub fn reload_icons(&mut self) {
        let mut icons = HashMap::new();
        collect_icons(&self.nodes, self.icon_resolver.as_ref(), &mut icons);
        self.icons = icons;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::exclude::ExclusionFilter;
    use crate::icons::{AsciiIcons, NerdFontIcons};
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        File::create(dir.path().join("z.txt")).unwrap();
        File::create(dir.path().join("y.txt")).unwrap();
        fs::create_dir(dir.path().join("a").join("nested")).unwrap();
        File::create(dir.path().join("a").join("inner.txt")).unwrap();
        File::create(dir.path().join("a").join("nested").join("deep.txt")).unwrap();
        dir
    }

    fn lazy_tree(root: &Path) -> LazyTree {
        LazyTree::new(
            root,
            DirScanner::default(),
            LoadMode::Lazy,
            Box::new(AsciiIcons),
        )
        .unwrap()
    }

    fn names(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Expand every directory until no placeholders remain.
    fn expand_all(tree: &mut LazyTree) {
        loop {
            let mut pending = Vec::new();
            collect_unloaded(tree.display_tree(), &mut pending);
            if pending.is_empty() {
                break;
            }
            for path in pending {
                tree.expand(&path).unwrap();
            }
        }
    }

    fn collect_unloaded(nodes: &[TreeNode], out: &mut Vec<PathBuf>) {
        for node in nodes {
            if node.is_dir() && !node.loaded {
                out.push(node.path.clone());
            }
            collect_unloaded(&node.children, out);
        }
    }

    #[test]
    fn lazy_build_orders_top_level_and_seeds_placeholders() {
        let dir = setup_test_dir();
        let tree = lazy_tree(dir.path());
        let top = tree.display_tree();
        assert_eq!(names(top), vec!["a", "b", "y.txt", "z.txt"]);
        for node in &top[..2] {
            assert!(!node.loaded);
            assert_eq!(node.children.len(), 1);
            assert!(node.children[0].is_placeholder());
        }
        for node in &top[2..] {
            assert!(node.loaded);
            assert!(node.children.is_empty());
        }
    }

    #[test]
    fn expand_replaces_placeholder_with_sorted_children() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let a = dir.path().join("a");

        let outcome = tree.expand(&a).unwrap();
        assert_eq!(outcome, ExpandOutcome::Loaded { children: 2 });

        let node = tree.find(&a).unwrap();
        assert!(node.loaded);
        assert_eq!(names(&node.children), vec!["nested", "inner.txt"]);
        assert!(node.children.iter().all(|c| !c.is_placeholder()));

        // The lazy invariant holds one level deeper.
        let nested = &node.children[0];
        assert!(!nested.loaded);
        assert!(nested.children[0].is_placeholder());
    }

    #[test]
    fn second_expand_is_noop_without_touching_disk() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let a = dir.path().join("a");
        tree.expand(&a).unwrap();
        let before = tree.find(&a).unwrap().clone();

        // A rescan would now fail, so success proves nothing was read.
        fs::remove_dir_all(&a).unwrap();
        assert_eq!(tree.expand(&a).unwrap(), ExpandOutcome::AlreadyLoaded);
        assert_eq!(tree.find(&a).unwrap(), &before);
    }

    #[test]
    fn lazy_expansion_matches_eager_build() {
        let dir = setup_test_dir();
        fs::create_dir(dir.path().join("b").join("c")).unwrap();
        File::create(dir.path().join("b").join("c").join("leaf.rs")).unwrap();

        let mut lazy = lazy_tree(dir.path());
        expand_all(&mut lazy);
        let eager = LazyTree::new(
            dir.path(),
            DirScanner::default(),
            LoadMode::Eager,
            Box::new(AsciiIcons),
        )
        .unwrap();

        assert_eq!(lazy.display_tree(), eager.display_tree());
    }

    #[test]
    fn eager_build_has_no_placeholders() {
        let dir = setup_test_dir();
        let nodes = build(&DirScanner::default(), dir.path(), LoadMode::Eager).unwrap();
        let mut unloaded = Vec::new();
        collect_unloaded(&nodes, &mut unloaded);
        assert!(unloaded.is_empty());
        let a = &nodes[0];
        assert_eq!(names(&a.children), vec!["nested", "inner.txt"]);
        assert_eq!(names(&a.children[0].children), vec!["deep.txt"]);
    }

    #[test]
    fn excluded_directory_never_gets_placeholder() {
        let dir = setup_test_dir();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::create_dir(dir.path().join("a").join("node_modules")).unwrap();
        let scanner = DirScanner::new(ExclusionFilter::new(["*/node_modules"]).unwrap(), false);
        let mut tree =
            LazyTree::new(dir.path(), scanner, LoadMode::Lazy, Box::new(AsciiIcons)).unwrap();

        assert_eq!(names(tree.display_tree()), vec!["a", "b", "y.txt", "z.txt"]);
        expand_all(&mut tree);
        assert!(tree.find(&dir.path().join("a").join("node_modules")).is_none());
    }

    #[test]
    fn reset_then_full_expansion_reproduces_tree() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        expand_all(&mut tree);
        let original = tree.display_tree().to_vec();

        tree.reset().unwrap();
        assert_eq!(tree.generation(), 1);
        assert!(!tree.find(&dir.path().join("a")).unwrap().loaded);

        expand_all(&mut tree);
        assert_eq!(tree.display_tree(), original.as_slice());
    }

    #[test]
    fn reset_picks_up_filesystem_changes() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        File::create(dir.path().join("new.txt")).unwrap();
        assert!(tree.find(&dir.path().join("new.txt")).is_none());
        tree.reset().unwrap();
        assert!(tree.find(&dir.path().join("new.txt")).is_some());
    }

    #[test]
    fn failed_expand_leaves_node_unloaded_and_siblings_intact() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let b = dir.path().join("b");
        let siblings_before = tree.display_tree().to_vec();

        fs::remove_dir(&b).unwrap();
        let err = tree.expand(&b).unwrap_err();
        assert!(matches!(err, AppError::Scan { .. }));

        let node = tree.find(&b).unwrap();
        assert!(!node.loaded);
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_placeholder());
        assert_eq!(tree.display_tree(), siblings_before.as_slice());
        assert!(!tree.is_in_flight(&b));

        // Recoverable: once the directory is back, expansion works.
        fs::create_dir(&b).unwrap();
        assert_eq!(
            tree.expand(&b).unwrap(),
            ExpandOutcome::Loaded { children: 0 }
        );
    }

    #[test]
    fn expanding_a_file_is_rejected() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let err = tree.expand(&dir.path().join("y.txt")).unwrap_err();
        assert!(matches!(err, AppError::InvalidExpandTarget(_)));
    }

    #[test]
    fn expanding_unknown_or_placeholder_path_is_rejected() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let err = tree.expand(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, AppError::NodeNotFound(_)));

        let placeholder_path = tree.find(&dir.path().join("a")).unwrap().children[0]
            .path
            .clone();
        let err = tree.expand(&placeholder_path).unwrap_err();
        assert!(matches!(err, AppError::InvalidExpandTarget(_)));
        assert_eq!(tree.in_flight_count(), 0);
    }

    #[test]
    fn concurrent_requests_for_one_node_scan_once() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let a = dir.path().join("a");

        let ticket = match tree.begin_expand(&a).unwrap() {
            ExpandStart::Scan(ticket) => ticket,
            other => panic!("expected a ticket, got {other:?}"),
        };
        assert!(tree.is_in_flight(&a));
        assert_eq!(
            tree.begin_expand(&a).unwrap(),
            ExpandStart::Skip(ExpandOutcome::InFlight)
        );

        // A different node can be claimed meanwhile.
        assert!(matches!(
            tree.begin_expand(&dir.path().join("b")).unwrap(),
            ExpandStart::Scan(_)
        ));

        let result = tree.scanner().scan(ticket.path());
        assert_eq!(
            tree.finish_expand(ticket, result).unwrap(),
            ExpandOutcome::Loaded { children: 2 }
        );
        assert!(!tree.is_in_flight(&a));
        assert_eq!(tree.in_flight_count(), 1);
        assert_eq!(
            tree.begin_expand(&a).unwrap(),
            ExpandStart::Skip(ExpandOutcome::AlreadyLoaded)
        );
    }

    #[test]
    fn stale_ticket_after_reset_is_ignored() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let a = dir.path().join("a");

        let ticket = match tree.begin_expand(&a).unwrap() {
            ExpandStart::Scan(ticket) => ticket,
            other => panic!("expected a ticket, got {other:?}"),
        };
        let result = tree.scanner().scan(ticket.path());
        tree.reset().unwrap();
        assert_eq!(tree.in_flight_count(), 0);

        assert_eq!(
            tree.finish_expand(ticket, result).unwrap(),
            ExpandOutcome::Stale
        );
        let node = tree.find(&a).unwrap();
        assert!(!node.loaded);
        assert!(node.children[0].is_placeholder());
    }

    #[test]
    fn stale_failure_is_also_ignored() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        let ticket = match tree.begin_expand(&dir.path().join("a")).unwrap() {
            ExpandStart::Scan(ticket) => ticket,
            other => panic!("expected a ticket, got {other:?}"),
        };
        tree.reset().unwrap();
        let failure = Err(AppError::scan(
            dir.path().join("a"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));
        assert_eq!(
            tree.finish_expand(ticket, failure).unwrap(),
            ExpandOutcome::Stale
        );
    }

    #[test]
    fn build_fails_for_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = LazyTree::new(
            &missing,
            DirScanner::default(),
            LoadMode::Lazy,
            Box::new(AsciiIcons),
        );
        assert!(matches!(result, Err(AppError::Scan { .. })));
    }

    #[test]
    fn eager_build_fails_when_any_level_fails() {
        let dir = setup_test_dir();
        let scanner = DirScanner::default();
        assert!(build(&scanner, &dir.path().join("y.txt"), LoadMode::Eager).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn eager_build_stops_at_symlink_loop() {
        let dir = setup_test_dir();
        let a = dir.path().join("a");
        std::os::unix::fs::symlink(dir.path(), a.join("loop")).unwrap();

        let scanner = DirScanner::new(ExclusionFilter::empty(), true);
        let nodes = build(&scanner, dir.path(), LoadMode::Eager).unwrap();
        let a_node = nodes.iter().find(|n| n.name == "a").unwrap();
        let looped = a_node.children.iter().find(|n| n.name == "loop").unwrap();
        assert!(looped.is_dir());
        assert!(looped.is_symlink);
        assert!(looped.loaded);
        assert!(looped.children.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unfollowed_symlink_loop_is_a_leaf() {
        let dir = setup_test_dir();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a").join("loop")).unwrap();
        let nodes = build(&DirScanner::default(), dir.path(), LoadMode::Eager).unwrap();
        let looped = nodes[0].children.iter().find(|n| n.name == "loop").unwrap();
        assert_eq!(looped.node_type, NodeType::File);
    }

    #[test]
    fn icons_are_resolved_for_real_nodes_only() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        assert_eq!(tree.icon(&dir.path().join("a")).unwrap().as_str(), "[D] ");
        assert_eq!(tree.icon(&dir.path().join("y.txt")).unwrap().as_str(), "[F] ");
        assert!(tree.icon(Path::new("")).is_none());

        // Newly attached children get icons at attach time.
        let inner = dir.path().join("a").join("inner.txt");
        assert!(tree.icon(&inner).is_none());
        tree.expand(&dir.path().join("a")).unwrap();
        assert_eq!(tree.icon(&inner).unwrap().as_str(), "[F] ");
    }

    #[test]
    fn reload_icons_covers_every_materialized_node() {
        let dir = setup_test_dir();
        let mut tree = lazy_tree(dir.path());
        tree.expand(&dir.path().join("a")).unwrap();
        let inner = dir.path().join("a").join("inner.txt");

        tree.set_icon_resolver(Box::new(NerdFontIcons));
        assert_eq!(tree.icon_resolver_name(), "nerd");
        // Swapping alone keeps the old icons until reload.
        assert_eq!(tree.icon(&inner).unwrap().as_str(), "[F] ");

        tree.reload_icons();
        assert_ne!(tree.icon(&inner).unwrap().as_str(), "[F] ");
        assert_ne!(tree.icon(&dir.path().join("b")).unwrap().as_str(), "[D] ");
    }

    #[test]
    fn load_mode_from_flag() {
        assert_eq!(LoadMode::from_lazy(true), LoadMode::Lazy);
        assert_eq!(LoadMode::from_lazy(false), LoadMode::Eager);
        assert_eq!(LoadMode::default(), LoadMode::Lazy);
    }
}

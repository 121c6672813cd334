//! Icon resolution for tree entries.
//!
//! The tree holds an [`IconResolver`] and can swap it at runtime; rendering
//! only ever sees the resolved [`IconHandle`].

use crate::fs::tree::{NodeType, TreeNode};

/// An opaque, already-resolved icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconHandle(String);

impl IconHandle {
    pub fn new(glyph: impl Into<String>) -> Self {
        Self(glyph.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strategy that maps a node to its icon.
pub trait IconResolver: Send + Sync {
    fn resolve(&self, node: &TreeNode) -> IconHandle;

    /// Short label shown in the status bar.
    fn name(&self) -> &'static str;
}

/// Nerd Font glyphs chosen by entry kind and file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct NerdFontIcons;

impl NerdFontIcons {
    fn file_icon_by_ext(name: &str) -> &'static str {
        let ext = name.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "rs" => "\u{e7a8} ",
            "py" => "\u{e606} ",
            "js" | "jsx" => "\u{e74e} ",
            "ts" | "tsx" => "\u{e628} ",
            "html" | "htm" => "\u{e736} ",
            "css" | "scss" | "sass" => "\u{e749} ",
            "json" => "\u{e60b} ",
            "toml" | "yaml" | "yml" | "ini" | "cfg" => "\u{e615} ",
            "md" | "markdown" | "rst" | "txt" => "\u{e609} ",
            "sh" | "bash" | "zsh" | "fish" => "\u{f489} ",
            "go" => "\u{e626} ",
            "c" | "h" => "\u{e61e} ",
            "cpp" | "cxx" | "cc" | "hpp" => "\u{e61d} ",
            "lock" => "\u{f023} ",
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "svg" | "ico" | "webp" => "\u{f1c5} ",
            "zip" | "tar" | "gz" | "xz" | "bz2" | "rar" | "7z" => "\u{f410} ",
            "pdf" => "\u{f1c1} ",
            _ => "\u{f15b} ",
        }
    }
}

impl IconResolver for NerdFontIcons {
    fn resolve(&self, node: &TreeNode) -> IconHandle {
        let glyph = match node.node_type {
            NodeType::Directory if node.is_symlink => "\u{f482} ",
            NodeType::Directory => "\u{f07b} ",
            NodeType::File if node.is_symlink => "\u{f481} ",
            NodeType::File => Self::file_icon_by_ext(&node.name),
            NodeType::Placeholder => "",
        };
        IconHandle::new(glyph)
    }

    fn name(&self) -> &'static str {
        "nerd"
    }
}

/// Plain ASCII markers for terminals without a patched font.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiIcons;

impl IconResolver for AsciiIcons {
    fn resolve(&self, node: &TreeNode) -> IconHandle {
        let marker = match node.node_type {
            NodeType::Directory => "[D] ",
            NodeType::File if node.is_symlink => "[L] ",
            NodeType::File => "[F] ",
            NodeType::Placeholder => "",
        };
        IconHandle::new(marker)
    }

    fn name(&self) -> &'static str {
        "ascii"
    }
}

/// Built-in icon sets, selectable from config and cycled from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSet {
    Nerd,
    Ascii,
}

impl IconSet {
    pub fn from_use_icons(use_icons: bool) -> Self {
        if use_icons {
            IconSet::Nerd
        } else {
            IconSet::Ascii
        }
    }

    pub fn resolver(self) -> Box<dyn IconResolver> {
        match self {
            IconSet::Nerd => Box::new(NerdFontIcons),
            IconSet::Ascii => Box::new(AsciiIcons),
        }
    }

    pub fn next(self) -> Self {
        match self {
            IconSet::Nerd => IconSet::Ascii,
            IconSet::Ascii => IconSet::Nerd,
        }
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::fs::tree::NodeType;
use crate::theme::ThemeColors;
use crate::view::{FlatItem, TreeView};

/// Tree widget that renders the flattened tree with box-drawing characters.
pub struct TreeWidget<'a> {
    view: &'a TreeView,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(view: &'a TreeView, theme: &'a ThemeColors) -> Self {
        Self {
            view,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Build the indentation prefix for the row at `item_index`.
    ///
    /// Each ancestor level draws a continuation line unless that ancestor
    /// was the last of its siblings.
    fn build_prefix(items: &[FlatItem], item_index: usize) -> String {
        let item = &items[item_index];
        if item.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for d in 1..item.depth {
            let ancestor_is_last = items[..item_index]
                .iter()
                .rev()
                .take_while(|i| i.depth >= d)
                .find(|i| i.depth == d)
                .is_some_and(|i| i.is_last_sibling);
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if item.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn item_style(&self, item: &FlatItem, is_selected: bool) -> Style {
        if is_selected {
            return Style::default()
                .bg(self.theme.tree_selected_bg)
                .fg(self.theme.tree_selected_fg)
                .add_modifier(Modifier::BOLD);
        }
        match item.node_type {
            NodeType::Placeholder => Style::default()
                .fg(self.theme.dim_fg)
                .add_modifier(Modifier::ITALIC),
            _ if item.is_symlink => Style::default().fg(self.theme.tree_symlink_fg),
            NodeType::Directory => Style::default()
                .fg(self.theme.tree_dir_fg)
                .add_modifier(Modifier::BOLD),
            NodeType::File => Style::default().fg(self.theme.tree_file_fg),
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let items = &self.view.flat_items;
        let visible_height = inner_area.height as usize;
        if items.is_empty() || visible_height == 0 {
            return;
        }

        let visible_items = items
            .iter()
            .enumerate()
            .skip(self.view.scroll_offset)
            .take(visible_height);

        for (row, (idx, item)) in visible_items.enumerate() {
            let y = inner_area.y + row as u16;
            let is_selected = idx == self.view.selected_index;
            let style = self.item_style(item, is_selected);
            // Connectors take the plain tree colour unless the row is selected.
            let prefix_style = if is_selected {
                style
            } else {
                Style::default().fg(self.theme.tree_fg)
            };
            let line = Line::from(vec![
                Span::styled(Self::build_prefix(items, idx), prefix_style),
                Span::styled(format!("{}{}", item.icon, item.name), style),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " l:open  h:close  r:reload  i:icons  q:quit ";

/// Truncate `s` from the left so it fits in `width` columns.
fn truncate_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len <= width {
        return s.to_string();
    }
    if width <= 3 {
        return s.chars().take(width).collect();
    }
    let tail: String = s.chars().skip(len - (width - 3)).collect();
    format!("...{tail}")
}

/// Status bar widget: root path and tree info, or a transient message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    tree_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, tree_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            tree_info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_bg)
            } else {
                Style::default()
                    .bg(self.theme.status_bg)
                    .fg(self.theme.success_fg)
            };
            let display: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(format!("{display:<width$}"), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        let info_style = base.fg(self.theme.info_fg);
        let hints_style = base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM);

        let hints_len = KEY_HINTS.chars().count();
        let info = format!(" {}", self.tree_info);
        let info_len = info.chars().count();

        // Drop the hints first, then squeeze the path.
        let show_hints = width >= info_len + hints_len + 8;
        let remaining = width
            .saturating_sub(info_len)
            .saturating_sub(if show_hints { hints_len } else { 0 });
        let path_display = truncate_left(self.path_str, remaining);
        let gap = remaining.saturating_sub(path_display.chars().count());

        let mut spans = vec![
            Span::styled(path_display, base),
            Span::styled(" ".repeat(gap), base),
            Span::styled(info, info_style),
        ];
        if show_hints {
            spans.push(Span::styled(KEY_HINTS, hints_style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Summary of the tree shown in the status bar.
fn tree_info(app: &App) -> String {
    let mut info = format!(
        "{} | gen {} | icons: {}",
        app.tree.mode().label(),
        app.tree.generation(),
        app.tree.icon_resolver_name()
    );
    let loading = app.tree.in_flight_count();
    if loading > 0 {
        info.push_str(&format!(" | loading {loading}"));
    }
    info
}

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    // Keep the selected row visible inside the border.
    let visible_height = chunks[0].height.saturating_sub(2) as usize;
    app.view.update_scroll(visible_height);

    let root = app.tree.root_path().display().to_string();
    let block = Block::default()
        .title(format!(" {root} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));
    let tree_widget = TreeWidget::new(&app.view, &app.theme).block(block);
    frame.render_widget(tree_widget, chunks[0]);

    let info = tree_info(app);
    let mut status = StatusBarWidget::new(&root, &info, &app.theme);
    if let Some((msg, is_error, _)) = &app.status_message {
        status = status.status_message(msg, *is_error);
    }
    frame.render_widget(status, chunks[1]);
}

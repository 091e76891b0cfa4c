use crate::app::{App, StatusKind, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

mod delete_dialog;
mod description_editor;
mod entries_view;
mod header;
mod help;
mod reports_view;
mod selector_view;
mod timer_view;
pub(super) mod utils;
pub(super) mod widgets;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(frame.area());

    header::render_header(frame, root[0], app);

    let body = root[1];
    match app.current_view {
        View::Timer => timer_view::render_timer_view(frame, app, body),
        View::Entries => entries_view::render_entries_view(frame, app, body),
        View::Reports => reports_view::render_reports_view(frame, app, body),
    }

    render_status(frame, root[2], app);

    // Modals render on top of the current view
    if app.selector_open {
        selector_view::render_selector(frame, app);
    }
    if app.description_edit.is_some() {
        description_editor::render_description_editor(frame, app);
    }
    if app.confirm_delete.is_some() {
        delete_dialog::render_delete_confirm_dialog(frame, app);
    }
    if app.show_help {
        help::render_help(frame);
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::White,
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            (status.text.as_str(), color)
        }
        None => ("Press ? for help", Color::DarkGray),
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .border_style(Style::default().fg(color))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(status, area);
}

/// Bordered, centered key hints shared by every view.
fn render_controls(frame: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(": {label}")));
    }

    let controls = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Span::styled(
                    " Controls ",
                    Style::default().fg(Color::DarkGray),
                ))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(controls, area);
}

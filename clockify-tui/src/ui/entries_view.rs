use super::widgets::build_entry_row;
use super::*;
use crate::time_utils::format_duration;
use time::{Duration, OffsetDateTime};

pub fn render_entries_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(body);

    let now = OffsetDateTime::now_utc();
    let total: Duration = app
        .entries
        .iter()
        .map(|entry| entry.time_interval.duration_at(now))
        .sum();

    let title = format!(
        " Entries · {} ({}) · {} ",
        app.entries_scope.label(),
        app.entries.len(),
        format_duration(total)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding::horizontal(1));

    if app.entries.is_empty() {
        let empty = Paragraph::new("No entries")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, chunks[0]);
    } else {
        let items: Vec<ListItem> = app
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                ListItem::new(build_entry_row(app, entry, now, app.selected_entry == Some(i)))
            })
            .collect();
        let mut state = ListState::default().with_selected(app.selected_entry);
        frame.render_stateful_widget(List::new(items).block(block), chunks[0], &mut state);
    }

    super::render_controls(
        frame,
        chunks[1],
        &[
            ("↑↓/j/k", "Select"),
            ("t", "Today/Week"),
            ("s", "Start from entry"),
            ("D", "Delete"),
            ("r", "Refresh"),
            ("?", "Help"),
        ],
    );
}

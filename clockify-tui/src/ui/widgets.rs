use crate::app::App;
use crate::time_utils::{format_clock, format_duration};
use clockify::TimeEntry;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use time::OffsetDateTime;

/// One entries-list row: `09:00-10:30  1h 30m 0s  Project / Task  note  [tags]`.
pub fn build_entry_row(
    app: &App,
    entry: &TimeEntry,
    now: OffsetDateTime,
    is_focused: bool,
) -> Line<'static> {
    let interval = &entry.time_interval;
    let end = match interval.end {
        Some(end) => format_clock(end),
        None => "now".to_string(),
    };
    let time_range = format!("{}-{:<5}", format_clock(interval.start), end);
    let duration = format!("{:>11}", format_duration(interval.duration_at(now)));

    let project = app.project_name(entry.project_id.as_deref());
    let project_task = match app.task_name(entry.task_id.as_deref()) {
        Some(task) => format!("{project} / {task}"),
        None => project,
    };

    let base = if is_focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let time_color = if entry.is_running() {
        Color::Green
    } else {
        Color::Yellow
    };

    let mut spans = vec![
        Span::styled(time_range, base.fg(time_color)),
        Span::styled(duration, base.fg(Color::Magenta)),
        Span::styled("  ", base),
        Span::styled(project_task, base.fg(Color::Cyan)),
    ];
    if !entry.description.is_empty() {
        spans.push(Span::styled("  ", base));
        spans.push(Span::styled(entry.description.clone(), base.fg(Color::Gray)));
    }
    if !entry.tag_ids.is_empty() {
        spans.push(Span::styled(
            format!("  [{}]", app.tag_list(&entry.tag_ids)),
            base.fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

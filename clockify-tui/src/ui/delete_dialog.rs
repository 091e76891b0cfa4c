use super::utils::centered_rect;
use super::*;
use crate::time_utils::{format_clock, format_duration};
use time::OffsetDateTime;

pub fn render_delete_confirm_dialog(frame: &mut Frame, app: &App) {
    let Some(id) = app.confirm_delete.as_deref() else {
        return;
    };
    let entry = app.entries.iter().find(|entry| entry.id == id);

    let (label, detail) = match entry {
        Some(entry) => {
            let label = if entry.description.is_empty() {
                app.project_name(entry.project_id.as_deref())
            } else {
                entry.description.clone()
            };
            let duration = entry.time_interval.duration_at(OffsetDateTime::now_utc());
            let detail = format!(
                "{}  ·  {}",
                format_clock(entry.time_interval.start),
                format_duration(duration)
            );
            (label, detail)
        }
        None => (id.to_string(), String::new()),
    };

    let area = centered_rect(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(label, Style::default().fg(Color::White))),
        Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Delete Entry? ")
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

use super::*;
use crate::time_utils::{format_clock, format_duration};
use time::OffsetDateTime;

pub fn render_timer_view(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4), // Timer display
            Constraint::Length(6), // Entry details
            Constraint::Min(0),
            Constraint::Length(3), // Controls
        ])
        .split(body);

    render_timer(frame, chunks[0], app);
    render_details(frame, chunks[1], app);
    super::render_controls(
        frame,
        chunks[3],
        &[
            ("s", "Start"),
            ("p", "Pick project"),
            ("x", "Stop"),
            ("d", "Edit description"),
            ("r", "Refresh"),
            ("1/2/3", "Views"),
            ("?", "Help"),
            ("q", "Quit"),
        ],
    );
}

fn render_timer(frame: &mut Frame, area: Rect, app: &App) {
    let timer = &app.timer;

    let (lines, border_style) = match timer.start_time {
        Some(start) if timer.is_running => {
            let elapsed = timer.elapsed(OffsetDateTime::now_utc());
            (
                vec![
                    Line::from(Span::styled(
                        format!("{} ⏵ (running)", format_duration(elapsed)),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("Started at {}", format_clock(start)),
                        Style::default().fg(Color::DarkGray),
                    )),
                ],
                Style::default().fg(Color::Green),
            )
        }
        _ => (
            vec![
                Line::from(Span::styled(
                    "0s (not running)",
                    Style::default().fg(Color::White),
                )),
                Line::from(Span::styled(
                    "Press s to start a timer",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            Style::default(),
        ),
    };

    let widget = Paragraph::new(lines).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Timer ")
            .border_style(border_style)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_details(frame: &mut Frame, area: Rect, app: &App) {
    let timer = &app.timer;
    let label = Style::default().fg(Color::Yellow);
    let muted = Style::default().fg(Color::DarkGray);

    let lines = if timer.is_running {
        let task = app
            .task_name(timer.task_id.as_deref())
            .unwrap_or_else(|| "-".to_string());
        let description = if timer.description.is_empty() {
            Span::styled("(no description)", muted)
        } else {
            Span::raw(timer.description.clone())
        };
        let tags = if timer.tag_ids.is_empty() {
            Span::styled("-", muted)
        } else {
            Span::styled(app.tag_list(&timer.tag_ids), Style::default().fg(Color::Cyan))
        };
        vec![
            Line::from(vec![
                Span::styled("Project:     ", label),
                Span::raw(app.project_name(timer.project_id.as_deref())),
            ]),
            Line::from(vec![Span::styled("Task:        ", label), Span::raw(task)]),
            Line::from(vec![Span::styled("Description: ", label), description]),
            Line::from(vec![Span::styled("Tags:        ", label), tags]),
        ]
    } else {
        vec![Line::from(Span::styled("No timer running", muted))]
    };

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Current Entry ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

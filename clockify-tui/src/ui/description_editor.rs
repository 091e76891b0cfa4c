use super::utils::centered_rect;
use super::*;
use crate::selector::MAX_DESCRIPTION_CHARS;

pub fn render_description_editor(frame: &mut Frame, app: &App) {
    let Some(input) = &app.description_edit else {
        return;
    };

    let area = centered_rect(72, 8, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3)])
        .split(area);

    let (before, after) = input.split_at_cursor();
    let text = Line::from(vec![
        Span::styled(before.to_string(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White)),
        Span::styled(after.to_string(), Style::default().fg(Color::White)),
    ]);

    let editor = Paragraph::new(vec![Line::from(""), text])
        .wrap(ratatui::widgets::Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(format!(
                    " Edit Description ({}/{}) ",
                    input.value.chars().count(),
                    MAX_DESCRIPTION_CHARS
                ))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(editor, chunks[0]);

    super::render_controls(
        frame,
        chunks[1],
        &[
            ("Enter", "Choose tags"),
            ("←→/Home/End", "Move"),
            ("Esc", "Cancel"),
        ],
    );
}

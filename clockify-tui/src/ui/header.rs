use super::*;

const LABEL: &str = " Clockify";

pub fn render_header(frame: &mut Frame, area: Rect, app: &mut App) {
    // Split vertically: 1 blank row, 1 content row (no bottom padding)
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let content_row = rows[1];
    let area = Rect {
        x: content_row.x + 2,
        y: content_row.y,
        width: content_row.width.saturating_sub(4),
        height: content_row.height,
    };

    let title_width = 1 + LABEL.len() as u16 + 2;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(title_width), Constraint::Min(0)])
        .split(area);

    // Throbber spins while requests are in flight
    let throbber_area = Rect {
        x: cols[0].x,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(1),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading() {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, Style::default().fg(Color::Yellow))),
        label_area,
    );

    let muted = Style::default().fg(Color::DarkGray);
    let mut tabs = Vec::new();
    for (i, view) in View::ALL.iter().enumerate() {
        if i > 0 {
            tabs.push(Span::styled(" | ", muted));
        }
        let style = if *view == app.current_view {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            muted
        };
        tabs.push(Span::styled(format!("{} {}", i + 1, view.title()), style));
    }
    if app.is_dev {
        tabs.push(Span::styled("  [dev data]", Style::default().fg(Color::Magenta)));
    }
    frame.render_widget(Paragraph::new(Line::from(tabs)), cols[1]);
}

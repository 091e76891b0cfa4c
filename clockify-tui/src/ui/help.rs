use super::utils::centered_rect;
use super::*;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("1 / 2 / 3", "Timer, Entries, Reports"),
            ("r", "Refresh current view"),
            ("?", "Toggle help"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
    (
        "Timer",
        &[
            ("s / p", "Start a new timer"),
            ("x", "Stop the running timer"),
            ("d", "Edit description and tags"),
        ],
    ),
    (
        "New entry",
        &[
            ("↑↓ / j k", "Move"),
            ("Enter", "Confirm step"),
            ("Tab", "Accept suggestion"),
            ("Space", "Toggle tag"),
            ("Esc", "Previous step"),
        ],
    ),
    (
        "Entries",
        &[
            ("t", "Today / this week"),
            ("s", "Start from selected entry"),
            ("D", "Delete selected entry"),
        ],
    ),
    (
        "Reports",
        &[
            ("← → / h l", "Previous / next day or week"),
            ("t", "Daily / weekly"),
        ],
    ),
];

pub fn render_help(frame: &mut Frame) {
    let rows: usize = SECTIONS.iter().map(|(_, keys)| keys.len() + 2).sum();
    let area = centered_rect(60, rows as u16 + 2, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(Line::from(Span::styled(
            *title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, label) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<14}"), Style::default().fg(Color::Yellow)),
                Span::styled(*label, Style::default().fg(Color::Gray)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help (? / Esc to close) ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(help, area);
}

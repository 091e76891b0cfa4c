use super::*;
use crate::app::ReportKind;
use crate::report::{DailySummary, WeeklySummary};
use crate::time_utils::{format_day, format_duration};
use time::{Duration, OffsetDateTime};

/// Shared color palette, same order for pie slices and the project list
pub const PALETTE: [Color; 12] = [
    Color::Blue,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Red,
    Color::LightBlue,
    Color::LightGreen,
    Color::LightYellow,
    Color::LightMagenta,
    Color::LightCyan,
    Color::LightRed,
];

pub fn render_reports_view(frame: &mut Frame, app: &App, body: Rect) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(body);

    let now = OffsetDateTime::now_utc();
    let loading = app.report_loaded != Some(app.report_key());

    match app.report_kind {
        ReportKind::Daily => {
            let summary = app.daily_summary(now);
            render_daily(frame, outer[0], &summary, loading);
        }
        ReportKind::Weekly => {
            let summary = app.weekly_summary(now);
            render_weekly(frame, outer[0], &summary, loading);
        }
    }

    super::render_controls(
        frame,
        outer[1],
        &[
            ("←/→ h/l", "Previous/Next"),
            ("t", "Daily/Weekly"),
            ("r", "Refresh"),
            ("?", "Help"),
        ],
    );
}

fn report_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(Span::styled(title, Style::default().fg(Color::White)))
        .padding(Padding::horizontal(1))
}

fn render_daily(frame: &mut Frame, area: Rect, summary: &DailySummary, loading: bool) {
    let block = report_block(format!(
        " Daily Report · {} · {} ",
        format_day(summary.date),
        format_duration(summary.total)
    ));

    if loading || summary.by_project.is_empty() {
        render_placeholder(frame, area, block, loading);
        return;
    }

    let mut lines = Vec::new();
    for (i, project) in summary.sorted_projects().into_iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(color)),
            Span::styled(
                format!("{:<40}", project.project_name),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format_duration(project.total),
                Style::default().fg(Color::Magenta),
            ),
        ]));
        for task in project.sorted_tasks() {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    format!("{:<38}", task.task_name),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format_duration(task.duration),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_weekly(frame: &mut Frame, area: Rect, summary: &WeeklySummary, loading: bool) {
    let last_day = summary
        .end_date
        .checked_sub(Duration::days(1))
        .unwrap_or(summary.end_date);
    let block = report_block(format!(
        " Weekly Report · {} to {} · {} ",
        format_day(summary.start_date),
        format_day(last_day),
        format_duration(summary.total)
    ));

    if loading {
        render_placeholder(frame, area, block, loading);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Horizontal split: pie (50%) | daily bars (50%)
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let pad = |r: Rect| Rect {
        x: r.x + 2,
        y: r.y,
        width: r.width.saturating_sub(4),
        height: r.height,
    };

    render_pie_panel(frame, summary, pad(panels[0]));
    render_daily_panel(frame, summary, pad(panels[1]));
}

fn render_placeholder(frame: &mut Frame, area: Rect, block: Block, loading: bool) {
    let text = if loading { "Loading..." } else { "No data" };
    let empty = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(empty, area);
}

fn render_pie_panel(frame: &mut Frame, summary: &WeeklySummary, area: Rect) {
    use tui_piechart::{PieChart, PieSlice};

    let projects = summary.sorted_projects();
    let total_secs = summary.total.whole_seconds();

    if projects.is_empty() || total_secs <= 0 {
        let empty = Paragraph::new("No data")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let percentages: Vec<f64> = projects
        .iter()
        .map(|p| p.total.whole_seconds().max(0) as f64 / total_secs as f64 * 100.0)
        .collect();

    let slices: Vec<PieSlice> = projects
        .iter()
        .zip(&percentages)
        .enumerate()
        .map(|(i, (project, pct))| {
            PieSlice::new(
                project.project_name.as_str(),
                *pct,
                PALETTE[i % PALETTE.len()],
            )
        })
        .collect();

    // Pie: square-ish (width/2 for aspect ratio), leaving room for the legend
    let legend_rows = projects.len() as u16 + 1;
    let pie_height = (area.width / 2)
        .min(area.height / 2)
        .min(area.height.saturating_sub(legend_rows));

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(pie_height), Constraint::Min(0)])
        .split(area);

    let pie = PieChart::new(slices)
        .show_legend(false)
        .show_percentages(false);
    frame.render_widget(pie, split[0]);

    let legend_lines: Vec<Line> = projects
        .iter()
        .zip(&percentages)
        .enumerate()
        .map(|(i, (project, pct))| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(PALETTE[i % PALETTE.len()])),
                Span::styled(
                    format!(
                        "{} · {} ({:.0}%)",
                        project.project_name,
                        format_duration(project.total),
                        pct
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();
    let legend = Paragraph::new(legend_lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(legend, split[1]);
}

fn render_daily_panel(frame: &mut Frame, summary: &WeeklySummary, area: Rect) {
    let days = summary.days();
    let max_secs = days
        .iter()
        .map(|(_, duration)| duration.whole_seconds())
        .max()
        .unwrap_or(0);

    // bar_cols = area width - 4 (day label "Mon ") - 12 (duration column)
    let bar_cols = (area.width as i32 - 4 - 12).max(1) as usize;

    let mut lines: Vec<Line> = Vec::new();
    for (day, duration) in days {
        let secs = duration.whole_seconds();
        let weekday = day.weekday().to_string();
        let mut spans = vec![Span::styled(
            format!("{:<4}", &weekday[..3]),
            Style::default().fg(Color::White),
        )];

        if secs <= 0 || max_secs <= 0 {
            spans.push(Span::styled(
                "─".repeat(bar_cols),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            let filled = ((secs as f64 / max_secs as f64) * bar_cols as f64).round() as usize;
            let filled = filled.clamp(1, bar_cols);
            spans.push(Span::styled(
                "█".repeat(filled),
                Style::default().fg(Color::Cyan),
            ));
            spans.push(Span::styled(
                "░".repeat(bar_cols - filled),
                Style::default().fg(Color::DarkGray),
            ));
        }
        spans.push(Span::styled(
            format!("{:>12}", format_duration(duration)),
            Style::default().fg(Color::Magenta),
        ));
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

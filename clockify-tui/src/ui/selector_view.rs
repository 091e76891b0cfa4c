use super::utils::centered_rect;
use super::*;
use crate::selector::{EntrySelector, SelectorMode, MAX_DESCRIPTION_CHARS};

pub fn render_selector(frame: &mut Frame, app: &App) {
    let selector = &app.selector;
    let area = centered_rect(72, 22, frame.area());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    match selector.mode() {
        SelectorMode::SelectingProject => render_projects(frame, chunks[0], selector),
        SelectorMode::SelectingTask => render_tasks(frame, chunks[0], selector),
        SelectorMode::EnteringDescription => render_description(frame, chunks[0], selector),
        SelectorMode::SelectingTags => render_tags(frame, chunks[0], selector),
    }

    let keys: &[(&str, &str)] = match selector.mode() {
        SelectorMode::EnteringDescription => &[
            ("Type", "Description"),
            ("↑↓", "Suggestion"),
            ("Tab", "Accept"),
            ("Enter", "Next"),
            ("Esc", "Back"),
        ],
        SelectorMode::SelectingTags => &[
            ("↑↓/j/k", "Navigate"),
            ("Space", "Toggle"),
            ("Enter", "Confirm"),
            ("Esc", "Back"),
        ],
        _ => &[
            ("↑↓/j/k", "Navigate"),
            ("Enter", "Select"),
            ("Esc", "Back"),
        ],
    };
    super::render_controls(frame, chunks[1], keys);
}

fn modal_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
        .padding(Padding::horizontal(1))
}

fn render_list(frame: &mut Frame, area: Rect, block: Block, items: Vec<ListItem>, cursor: Option<usize>) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(cursor);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_message(frame: &mut Frame, area: Rect, block: Block, text: &str) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_projects(frame: &mut Frame, area: Rect, selector: &EntrySelector) {
    let block = modal_block(format!(" Select Project ({}) ", selector.projects().len()));

    if let Some(project) = selector.selected_project() {
        if selector.is_loading_tasks() {
            render_message(
                frame,
                area,
                block,
                &format!("Loading tasks for {}...", project.name),
            );
            return;
        }
    }
    if selector.projects().is_empty() {
        render_message(frame, area, block, "Loading projects...");
        return;
    }

    let items = selector
        .projects()
        .iter()
        .map(|project| ListItem::new(project.name.clone()))
        .collect();
    render_list(frame, area, block, items, selector.project_cursor());
}

fn render_tasks(frame: &mut Frame, area: Rect, selector: &EntrySelector) {
    let project = selector
        .selected_project()
        .map(|project| project.name.as_str())
        .unwrap_or("");
    let block = modal_block(format!(" Select Task · {project} "));

    if selector.tasks().is_empty() {
        render_message(frame, area, block, "No tasks. Press Enter to continue.");
        return;
    }

    let items = selector
        .tasks()
        .iter()
        .map(|task| ListItem::new(task.name.clone()))
        .collect();
    render_list(frame, area, block, items, selector.task_cursor());
}

fn render_description(frame: &mut Frame, area: Rect, selector: &EntrySelector) {
    let block = modal_block(format!(
        " Description ({}/{}) ",
        selector.description().chars().count(),
        MAX_DESCRIPTION_CHARS
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let input = Paragraph::new(Line::from(vec![
        Span::styled(selector.description().to_string(), Style::default().fg(Color::White)),
        Span::styled("█", Style::default().fg(Color::White)),
    ]));
    frame.render_widget(input, rows[0]);

    if selector.suggestions().is_empty() {
        return;
    }
    let items = selector
        .suggestions()
        .iter()
        .map(|suggestion| ListItem::new(suggestion.clone()).style(Style::default().fg(Color::Gray)))
        .collect();
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Suggestions ", Style::default().fg(Color::DarkGray)));
    render_list(frame, rows[1], block, items, selector.suggestion_cursor());
}

fn render_tags(frame: &mut Frame, area: Rect, selector: &EntrySelector) {
    let title = if selector.is_editing() {
        " Tags · editing running timer ".to_string()
    } else {
        " Tags ".to_string()
    };
    let block = modal_block(title);

    if selector.tags().is_empty() {
        render_message(frame, area, block, "No tags. Press Enter to confirm.");
        return;
    }

    let items = selector
        .tags()
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            let mark = if selector.is_tag_selected(i) { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {}", tag.name))
        })
        .collect();
    render_list(frame, area, block, items, selector.tag_cursor());
}

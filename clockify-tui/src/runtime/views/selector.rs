use crate::app::App;
use crate::selector::{SelectorMode, SelectorResult};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_selector_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let typing = app.selector.mode() == SelectorMode::EnteringDescription;

    match key.code {
        KeyCode::Esc => {
            if app.selector.back() {
                app.close_selector();
            }
        }
        KeyCode::Up => app.selector.move_up(),
        KeyCode::Down => app.selector.move_down(),
        KeyCode::Char('k') if !typing => app.selector.move_up(),
        KeyCode::Char('j') if !typing => app.selector.move_down(),
        KeyCode::Enter => handle_enter(app, action_tx),
        KeyCode::Tab => {
            app.selector.accept_suggestion();
        }
        KeyCode::Char(' ') if app.selector.mode() == SelectorMode::SelectingTags => {
            app.selector.toggle_current_tag();
        }
        KeyCode::Backspace if typing => {
            if app.selector.backspace() {
                request_suggestions(app, action_tx);
            }
        }
        KeyCode::Char(c) if typing && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if app.selector.input_char(c) {
                request_suggestions(app, action_tx);
            }
        }
        _ => {}
    }
}

fn handle_enter(app: &mut App, action_tx: &ActionTx) {
    match app.selector.mode() {
        SelectorMode::SelectingProject => {
            if app.selector.is_loading_tasks() {
                return;
            }
            if let Some(project_id) = app.selector.confirm_project() {
                enqueue_action(action_tx, Action::LoadTasks { project_id });
            }
        }
        SelectorMode::SelectingTask => {
            app.selector.confirm_task();
        }
        SelectorMode::EnteringDescription => {
            app.selector.confirm_description();
        }
        SelectorMode::SelectingTags => match app.selector.confirm_tags() {
            Some(SelectorResult::Start {
                project_id,
                task_id,
                description,
                tag_ids,
            }) => {
                enqueue_action(
                    action_tx,
                    Action::StartTimer {
                        description,
                        project_id: Some(project_id),
                        task_id,
                        tag_ids,
                    },
                );
                app.selector.mark_submitting();
            }
            Some(SelectorResult::Update {
                description,
                tag_ids,
            }) => match app.timer.current_entry.clone() {
                Some(entry) => {
                    enqueue_action(
                        action_tx,
                        Action::UpdateRunningEntry {
                            entry,
                            description,
                            tag_ids,
                        },
                    );
                    app.selector.mark_submitting();
                }
                None => {
                    app.close_selector();
                    app.set_error("No timer running to edit");
                }
            },
            None => {}
        },
    }
}

fn request_suggestions(app: &mut App, action_tx: &ActionTx) {
    if let Some((request_id, query)) = app.selector.suggestion_request() {
        enqueue_action(action_tx, Action::SearchSuggestions { request_id, query });
    }
}

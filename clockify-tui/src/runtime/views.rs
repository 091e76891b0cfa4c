use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod confirm_delete;
mod edit_description;
mod entries;
mod reports;
mod selector;
mod timer;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

/// Routes a key press to the help overlay, the open modal, or the current view.
pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if app.show_help {
        if matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
        ) {
            app.toggle_help();
        }
        return;
    }

    if app.confirm_delete.is_some() {
        confirm_delete::handle_confirm_delete_key(key, app, action_tx);
    } else if app.description_edit.is_some() {
        edit_description::handle_edit_description_key(key, app);
    } else if app.selector_open {
        selector::handle_selector_key(key, app, action_tx);
    } else if !handle_global_key(key, app, action_tx) {
        handle_view_key(key, app, action_tx);
    }
}

fn handle_global_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) -> bool {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('1') => app.navigate_to(View::Timer),
        KeyCode::Char('2') => {
            app.navigate_to(View::Entries);
            enqueue_action(
                action_tx,
                Action::LoadEntries {
                    scope: app.entries_scope,
                },
            );
        }
        KeyCode::Char('3') => {
            app.navigate_to(View::Reports);
            enqueue_action(
                action_tx,
                Action::LoadReport {
                    key: app.report_key(),
                },
            );
        }
        KeyCode::Char('r') => refresh_current_view(app, action_tx),
        _ => return false,
    }
    true
}

fn refresh_current_view(app: &mut App, action_tx: &ActionTx) {
    app.set_status("Refreshing...");
    match app.current_view {
        View::Timer => {
            enqueue_action(action_tx, Action::RefreshCurrentTimer);
            enqueue_action(action_tx, Action::LoadProjects { force: true });
            enqueue_action(action_tx, Action::LoadTags { force: true });
        }
        View::Entries => enqueue_action(
            action_tx,
            Action::LoadEntries {
                scope: app.entries_scope,
            },
        ),
        View::Reports => enqueue_action(
            action_tx,
            Action::LoadReport {
                key: app.report_key(),
            },
        ),
    }
}

fn handle_view_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match app.current_view {
        View::Timer => timer::handle_timer_key(key, app, action_tx),
        View::Entries => entries::handle_entries_key(key, app, action_tx),
        View::Reports => reports::handle_reports_key(key, app, action_tx),
    }
}

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_timer_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('s') => {
            if app.timer.is_running {
                app.set_status("Timer already running (x to stop)");
            } else {
                open_selector(app, action_tx);
            }
        }
        KeyCode::Char('p') => open_selector(app, action_tx),
        KeyCode::Char('x') => {
            if app.stop_pending {
                app.set_status("Stopping timer...");
            } else if app.timer.is_running {
                enqueue_action(action_tx, Action::StopTimer);
                app.stop_pending = true;
            } else {
                app.set_status("No timer running");
            }
        }
        KeyCode::Char('d') => {
            app.begin_description_edit();
        }
        _ => {}
    }
}

fn open_selector(app: &mut App, action_tx: &ActionTx) {
    app.open_selector();
    if app.projects.is_empty() {
        enqueue_action(action_tx, Action::LoadProjects { force: false });
    }
    if app.tags.is_empty() {
        enqueue_action(action_tx, Action::LoadTags { force: false });
    }
}

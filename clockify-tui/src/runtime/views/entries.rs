use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_entries_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_entry(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_entry(),
        KeyCode::Char('t') => {
            app.toggle_entries_scope();
            enqueue_action(
                action_tx,
                Action::LoadEntries {
                    scope: app.entries_scope,
                },
            );
        }
        // Start a new timer copying the selected entry
        KeyCode::Char('s') => match app.selected_entry() {
            Some(entry) => {
                let action = Action::StartTimer {
                    description: entry.description.clone(),
                    project_id: entry.project_id.clone(),
                    task_id: entry.task_id.clone(),
                    tag_ids: entry.tag_ids.clone(),
                };
                enqueue_action(action_tx, action);
            }
            None => app.set_error("No entry selected"),
        },
        KeyCode::Char('D') | KeyCode::Delete => match app.selected_entry() {
            Some(entry) => app.confirm_delete = Some(entry.id.clone()),
            None => app.set_error("No entry selected"),
        },
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EntriesScope;
    use crate::runtime::action_queue::channel;
    use clockify::{TimeEntry, TimeInterval};
    use crossterm::event::KeyModifiers;
    use time::macros::{datetime, offset};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn entry(id: &str) -> TimeEntry {
        TimeEntry {
            id: id.to_string(),
            description: format!("work {id}"),
            project_id: Some("p1".to_string()),
            task_id: Some("t1".to_string()),
            tag_ids: vec!["g1".to_string()],
            user_id: "u".to_string(),
            workspace_id: "w".to_string(),
            billable: false,
            time_interval: TimeInterval {
                start: datetime!(2024-01-15 09:00 UTC),
                end: Some(datetime!(2024-01-15 10:00 UTC)),
            },
        }
    }

    #[test]
    fn start_copies_the_selected_entry() {
        let mut app = App::new(offset!(UTC), false);
        app.set_entries(EntriesScope::Today, vec![entry("e1"), entry("e2")]);
        let (tx, mut rx) = channel();

        handle_entries_key(press(KeyCode::Down), &mut app, &tx);
        handle_entries_key(press(KeyCode::Char('s')), &mut app, &tx);

        match rx.try_recv() {
            Ok(Action::StartTimer {
                description,
                project_id,
                task_id,
                tag_ids,
            }) => {
                assert_eq!(description, "work e2");
                assert_eq!(project_id.as_deref(), Some("p1"));
                assert_eq!(task_id.as_deref(), Some("t1"));
                assert_eq!(tag_ids, vec!["g1"]);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn start_without_selection_reports_an_error() {
        let mut app = App::new(offset!(UTC), false);
        let (tx, mut rx) = channel();

        handle_entries_key(press(KeyCode::Char('s')), &mut app, &tx);

        assert!(rx.try_recv().is_err());
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("No entry selected")
        );
    }

    #[test]
    fn toggling_scope_reloads() {
        let mut app = App::new(offset!(UTC), false);
        let (tx, mut rx) = channel();

        handle_entries_key(press(KeyCode::Char('t')), &mut app, &tx);

        assert!(matches!(
            rx.try_recv(),
            Ok(Action::LoadEntries {
                scope: EntriesScope::ThisWeek
            })
        ));
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut app = App::new(offset!(UTC), false);
        app.set_entries(EntriesScope::Today, vec![entry("e1")]);
        let (tx, mut rx) = channel();

        handle_entries_key(press(KeyCode::Char('D')), &mut app, &tx);

        assert_eq!(app.confirm_delete.as_deref(), Some("e1"));
        assert!(rx.try_recv().is_err());
    }
}

use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_reports_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('t') => app.toggle_report_kind(),
        KeyCode::Left | KeyCode::Char('h') => app.report_previous(),
        KeyCode::Right | KeyCode::Char('l') => app.report_next(),
        _ => return,
    }
    enqueue_action(
        action_tx,
        Action::LoadReport {
            key: app.report_key(),
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ReportKind;
    use crate::runtime::action_queue::channel;
    use crossterm::event::KeyModifiers;
    use time::macros::{date, offset};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn moving_the_date_loads_that_report() {
        let mut app = App::new(offset!(UTC), false);
        app.report_date = date!(2024 - 03 - 01);
        let (tx, mut rx) = channel();

        handle_reports_key(press(KeyCode::Char('h')), &mut app, &tx);

        assert_eq!(app.report_date, date!(2024 - 02 - 29));
        match rx.try_recv() {
            Ok(Action::LoadReport { key }) => {
                assert_eq!(key.kind, ReportKind::Daily);
                assert_eq!(key.start, date!(2024 - 02 - 29));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn weekly_toggle_loads_from_monday() {
        let mut app = App::new(offset!(UTC), false);
        app.report_date = date!(2024 - 03 - 01);
        let (tx, mut rx) = channel();

        handle_reports_key(press(KeyCode::Char('t')), &mut app, &tx);

        match rx.try_recv() {
            Ok(Action::LoadReport { key }) => {
                assert_eq!(key.kind, ReportKind::Weekly);
                assert_eq!(key.start, date!(2024 - 02 - 26));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut app = App::new(offset!(UTC), false);
        let (tx, mut rx) = channel();

        handle_reports_key(press(KeyCode::Char('z')), &mut app, &tx);

        assert!(rx.try_recv().is_err());
    }
}

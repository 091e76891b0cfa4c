use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(super) fn handle_edit_description_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.finish_description_edit(),
        KeyCode::Esc => app.cancel_description_edit(),
        _ => {
            let Some(input) = app.description_edit.as_mut() else {
                return;
            };
            match key.code {
                KeyCode::Backspace => input.backspace(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.home(),
                KeyCode::End => input.end(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    input.insert(c);
                }
                _ => {}
            }
        }
    }
}

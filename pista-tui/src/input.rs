use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.participants_for`(...) for the activity under the cursor.
    OpenSelectedActivity,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Char, Down, Enter, Esc, Left, Up};

    // Global quit shortcuts
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if key.code == Char('q') && key.modifiers.is_empty() {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::ActivityList => match key.code {
            Up | Char('k') => {
                if app.activity_list_index > 0 {
                    app.activity_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.activity_list_index + 1 < app.activities.len() {
                    app.activity_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                action = Action::OpenSelectedActivity;
            }
            _ => {}
        },

        Screen::ActivityDetail => match key.code {
            Up | Char('k') => {
                if app.participant_list_index > 0 {
                    app.participant_list_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.participant_list_index + 1 < app.participants.len() {
                    app.participant_list_index += 1;
                }
            }
            Enter | Char(' ') => {
                app.toggle_current_participant();
            }
            Left | Esc | Char('b') => {
                app.close_detail();
            }
            _ => {}
        },
    }
    action
}

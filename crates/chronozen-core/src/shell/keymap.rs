//! Keyboard shortcut routing.

use crate::timer::CycleDirection;

/// A key press, stripped of everything routing does not care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Tab,
}

/// Where key presses currently go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// No input is open; shortcuts apply.
    Global,
    /// A text field is open and owns every key.
    TextInput,
    /// The end-of-work dialog is waiting for an answer.
    BreakPrompt,
    /// First-run flow; the onboarding step owns every key.
    Onboarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    ToggleTimer,
    ResetTimer,
    SwitchTab,
    AddTask,
    ToggleFullscreen,
    CycleTask(CycleDirection),
    CursorUp,
    CursorDown,
    ToggleTask,
    DeleteTask,
    EditTask,
    OpenSettings,
    ConfirmBreak,
    SkipBreak,
    Quit,
}

/// Keys and descriptions shown in the tour and the help footer.
pub const SHORTCUT_HELP: &[(&str, &str)] = &[
    ("Space", "Start / Pause timer"),
    ("R", "Reset timer"),
    ("S", "Switch timer mode"),
    ("T", "Add new task"),
    ("F", "Toggle fullscreen"),
    ("[ ]", "Previous / next task for the session"),
    ("X", "Complete / reopen task"),
    ("E", "Edit task"),
    ("D", "Delete task"),
    (",", "Timer settings"),
    ("Q", "Quit"),
];

/// Map a key press to a shortcut. Letters are case-insensitive.
pub fn route(key: Key, focus: Focus) -> Option<Shortcut> {
    match focus {
        Focus::TextInput | Focus::Onboarding => None,
        Focus::BreakPrompt => match key {
            Key::Enter => Some(Shortcut::ConfirmBreak),
            Key::Esc => Some(Shortcut::SkipBreak),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'y' => Some(Shortcut::ConfirmBreak),
                'n' => Some(Shortcut::SkipBreak),
                _ => None,
            },
            _ => None,
        },
        Focus::Global => match key {
            Key::Up => Some(Shortcut::CursorUp),
            Key::Down => Some(Shortcut::CursorDown),
            Key::Esc => Some(Shortcut::Quit),
            Key::Char(c) => global_char(c),
            _ => None,
        },
    }
}

fn global_char(c: char) -> Option<Shortcut> {
    let shortcut = match c.to_ascii_lowercase() {
        ' ' => Shortcut::ToggleTimer,
        'r' => Shortcut::ResetTimer,
        's' => Shortcut::SwitchTab,
        't' => Shortcut::AddTask,
        'f' => Shortcut::ToggleFullscreen,
        '[' => Shortcut::CycleTask(CycleDirection::Prev),
        ']' => Shortcut::CycleTask(CycleDirection::Next),
        'k' => Shortcut::CursorUp,
        'j' => Shortcut::CursorDown,
        'x' => Shortcut::ToggleTask,
        'd' => Shortcut::DeleteTask,
        'e' => Shortcut::EditTask,
        ',' => Shortcut::OpenSettings,
        'q' => Shortcut::Quit,
        _ => return None,
    };
    Some(shortcut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_case_insensitive() {
        for (lower, upper) in [('r', 'R'), ('s', 'S'), ('t', 'T'), ('f', 'F')] {
            assert_eq!(
                route(Key::Char(lower), Focus::Global),
                route(Key::Char(upper), Focus::Global)
            );
        }
        assert_eq!(route(Key::Char(' '), Focus::Global), Some(Shortcut::ToggleTimer));
    }

    #[test]
    fn text_input_swallows_everything() {
        for key in [Key::Char(' '), Key::Char('r'), Key::Esc, Key::Enter, Key::Up] {
            assert_eq!(route(key, Focus::TextInput), None);
            assert_eq!(route(key, Focus::Onboarding), None);
        }
    }

    #[test]
    fn break_prompt_only_answers() {
        assert_eq!(route(Key::Char('Y'), Focus::BreakPrompt), Some(Shortcut::ConfirmBreak));
        assert_eq!(route(Key::Enter, Focus::BreakPrompt), Some(Shortcut::ConfirmBreak));
        assert_eq!(route(Key::Char('n'), Focus::BreakPrompt), Some(Shortcut::SkipBreak));
        assert_eq!(route(Key::Esc, Focus::BreakPrompt), Some(Shortcut::SkipBreak));
        assert_eq!(route(Key::Char(' '), Focus::BreakPrompt), None);
        assert_eq!(route(Key::Char('q'), Focus::BreakPrompt), None);
    }

    #[test]
    fn unmapped_keys_route_nowhere() {
        assert_eq!(route(Key::Char('z'), Focus::Global), None);
        assert_eq!(route(Key::Tab, Focus::Global), None);
    }
}

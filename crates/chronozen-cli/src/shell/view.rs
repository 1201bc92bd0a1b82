//! Shell-side UI state the controller does not own: the task cursor, the
//! open form, and transient toasts.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chronozen_core::{Key, PomodoroSettings};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    AddTask,
    EditTask { id: String },
    Name,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Editing,
    Submit,
    Cancel,
}

/// A modal text form with one or more fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focused: usize,
    pub error: Option<String>,
}

impl Form {
    fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Self {
            kind,
            fields,
            focused: 0,
            error: None,
        }
    }

    pub fn add_task() -> Self {
        Self::new(FormKind::AddTask, vec![Field::new("Task", "")])
    }

    pub fn edit_task(id: &str, text: &str) -> Self {
        Self::new(
            FormKind::EditTask { id: id.to_string() },
            vec![Field::new("Task", text)],
        )
    }

    pub fn name() -> Self {
        Self::new(FormKind::Name, vec![Field::new("Your name", "")])
    }

    pub fn settings(settings: &PomodoroSettings) -> Self {
        Self::new(
            FormKind::Settings,
            vec![
                Field::new("Work minutes", settings.work_mins.to_string()),
                Field::new("Break minutes", settings.break_mins.to_string()),
                Field::new("Work title", settings.work_title.clone()),
                Field::new("Break title", settings.break_title.clone()),
            ],
        )
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::AddTask => " Add Task ",
            FormKind::EditTask { .. } => " Edit Task ",
            FormKind::Name => " Welcome to ChronoZen! ",
            FormKind::Settings => " Timer Settings ",
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn edit(&mut self, key: Key) -> FormEdit {
        let last = self.fields.len().saturating_sub(1);
        match key {
            Key::Enter => return FormEdit::Submit,
            Key::Esc if self.kind != FormKind::Name => return FormEdit::Cancel,
            Key::Tab | Key::Down => self.focused = if self.focused >= last { 0 } else { self.focused + 1 },
            Key::Up => self.focused = if self.focused == 0 { last } else { self.focused - 1 },
            Key::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    field.value.pop();
                }
            }
            Key::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.focused) {
                    field.value.push(c);
                }
            }
            _ => {}
        }
        self.error = None;
        FormEdit::Editing
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub title: String,
    pub description: String,
    shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct View {
    /// Row selected in the task list (display order).
    pub cursor: usize,
    pub form: Option<Form>,
    pub quit: bool,
    toasts: VecDeque<Toast>,
}

impl View {
    pub fn push_toast(&mut self, title: &str, description: &str) {
        self.toasts.push_back(Toast {
            title: title.to_string(),
            description: description.to_string(),
            shown_at: Instant::now(),
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_TTL);
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }
}

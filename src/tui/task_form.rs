//! Task form handling for the terminal user interface.
//!
//! The `EditForm` holds the in-progress field values for one edit session,
//! tracks which field has focus, and validates everything on save. It never
//! persists anything; a successful validation yields a [`SaveTask`] that the
//! app folds into its task list.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::{local_date, parse_due_input, start_of_local_day, DATE_FORMAT};
use crate::task::Task;
use crate::tui::{enums::FormField, input::InputField};

/// Why a save was refused. The message is shown verbatim in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: Due date is not a valid date")]
    InvalidDate,
    #[error("Error: Date cannot be in the past")]
    DateInPast,
    #[error("Error: Title cannot be empty")]
    TitleEmpty,
    #[error("Error: Description cannot be empty")]
    DescriptionEmpty,
}

/// Validated form contents, ready to become a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTask {
    pub task_id: Uuid,
    pub title: String,
    pub description: String,
    pub due: Option<DateTime<Utc>>,
    pub done: bool,
    pub is_new: bool,
}

impl SaveTask {
    pub fn into_task(self) -> Task {
        Task::with_fields(self.title, self.description, self.due, self.done).with_id(self.task_id)
    }
}

/// Task form for editing fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    task_id: Uuid,
    is_new: bool,
    title: InputField,
    description: InputField,
    due: InputField,
    /// The timestamp the form was opened with. Kept when the date is unchanged.
    due_seed: Option<DateTime<Utc>>,
    done: bool,
    focus: FormField,
}

fn due_text(due: Option<DateTime<Utc>>) -> String {
    due.map(|d| local_date(d).format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

impl EditForm {
    /// A blank form for a new task, due `now`.
    pub fn new_task(now: DateTime<Utc>) -> Self {
        let task = Task::with_fields("", "", Some(now), false);
        let mut form = Self::from_task(&task);
        form.is_new = true;
        form
    }

    /// A form seeded from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self {
            task_id: task.id,
            is_new: false,
            title: InputField::with_value(&task.title),
            description: InputField::with_value(&task.description),
            due: InputField::with_value(&due_text(task.due)),
            due_seed: task.due,
            done: task.done,
            focus: FormField::Title,
        };
        form.update_active_field();
        form
    }

    pub fn task_id(&self) -> Uuid {
        self.task_id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn done(&self) -> bool {
        self.done
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn field(&self, field: FormField) -> &InputField {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::DueDate => &self.due,
        }
    }

    fn focused_mut(&mut self) -> &mut InputField {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::DueDate => &mut self.due,
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
        self.update_active_field();
    }

    /// Mark only the focused field as active.
    fn update_active_field(&mut self) {
        let focus = self.focus;
        self.title.active = focus == FormField::Title;
        self.description.active = focus == FormField::Description;
        self.due.active = focus == FormField::DueDate;
    }

    pub fn handle_char(&mut self, c: char) {
        self.focused_mut().handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        self.focused_mut().handle_backspace();
    }

    pub fn handle_delete(&mut self) {
        self.focused_mut().handle_delete();
    }

    pub fn handle_left_right(&mut self, right: bool) {
        let field = self.focused_mut();
        if right {
            field.move_cursor_right();
        } else {
            field.move_cursor_left();
        }
    }

    pub fn handle_home(&mut self) {
        self.focused_mut().move_home();
    }

    pub fn handle_end(&mut self) {
        self.focused_mut().move_end();
    }

    /// Move the due date by `days`. Empty or unparseable text starts from `today`.
    /// A shift past the representable range leaves the field unchanged.
    pub fn shift_due(&mut self, days: i64, today: NaiveDate) {
        let base = parse_due_input(self.due.value(), today).unwrap_or(today);
        let Some(shifted) = Duration::try_days(days).and_then(|d| base.checked_add_signed(d)) else {
            return;
        };
        self.due.set_value(&shifted.format(DATE_FORMAT).to_string());
    }

    /// Check the fields in order; the first failure wins.
    pub fn validate(&self, today: NaiveDate) -> Result<SaveTask, ValidationError> {
        let due = self.validated_due(today)?;
        let title = self.title.value().trim();
        if title.is_empty() {
            return Err(ValidationError::TitleEmpty);
        }
        let description = self.description.value().trim();
        if description.is_empty() {
            return Err(ValidationError::DescriptionEmpty);
        }
        Ok(SaveTask {
            task_id: self.task_id,
            title: title.to_string(),
            description: description.to_string(),
            due,
            done: self.done,
            is_new: self.is_new,
        })
    }

    fn validated_due(&self, today: NaiveDate) -> Result<Option<DateTime<Utc>>, ValidationError> {
        let text = self.due.value().trim();
        if text.is_empty() {
            return Ok(None);
        }
        let date = parse_due_input(text, today).ok_or(ValidationError::InvalidDate)?;
        if date < today {
            return Err(ValidationError::DateInPast);
        }
        match self.due_seed {
            Some(seed) if local_date(seed) == date => Ok(Some(seed)),
            _ => Ok(Some(start_of_local_day(date))),
        }
    }
}

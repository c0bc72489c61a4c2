//! Main application state for the terminal user interface.
//!
//! `App` is a value. Every input, effect result and timer tick is a
//! [`Message`] folded in by [`App::update`], which returns the next state and
//! at most one [`Effect`] for the runner. Nothing here touches the terminal or
//! the disk.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use uuid::Uuid;

use crate::dates::local_date;
use crate::task::Task;
use crate::tui::effects::{Effect, Message, Rollback, STATUS_LIFETIME};
use crate::tui::enums::{FormField, StatusKind, ViewMode};
use crate::tui::list::{is_quit, list_intent, move_selection, visible_indices, Filter, Intent};
use crate::tui::task_form::{EditForm, SaveTask};

pub const SAVE_ERROR_STATUS: &str = "Error saving!";

/// Rows taken by the header, status bar and key help in the list view.
const LIST_CHROME_ROWS: u16 = 4;
/// Rows per list item: title, description, due date and a spacer.
pub const LIST_ITEM_ROWS: u16 = 4;

/// Last known terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

impl Viewport {
    /// How many list items fit on one screen; at least one.
    pub fn page_size(&self) -> usize {
        (self.height.saturating_sub(LIST_CHROME_ROWS) / LIST_ITEM_ROWS).max(1) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub token: u64,
}

#[derive(Debug, Clone)]
pub struct App {
    mode: ViewMode,
    tasks: Arc<Vec<Task>>,
    /// Index into the visible (filtered) tasks.
    selected: usize,
    form: Option<EditForm>,
    status: Option<StatusMessage>,
    status_token: u64,
    filter: Filter,
    viewport: Viewport,
    loaded: bool,
    mutated: bool,
    /// Status of a save held back until the startup load has been applied.
    deferred_save: Option<String>,
    show_help: bool,
    quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// An empty list waiting for the startup load.
    pub fn new() -> Self {
        Self {
            mode: ViewMode::List,
            tasks: Arc::new(Vec::new()),
            selected: 0,
            form: None,
            status: None,
            status_token: 0,
            filter: Filter::Off,
            viewport: Viewport::default(),
            loaded: false,
            mutated: false,
            deferred_save: None,
            show_help: false,
            quit: false,
        }
    }

    /// The initial state and the effect that loads the task list.
    pub fn start() -> (Self, Effect) {
        (Self::new(), Effect::Load)
    }

    /// A state that already holds `tasks`, as if they had been loaded.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Arc::new(tasks),
            loaded: true,
            ..Self::new()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn form(&self) -> Option<&EditForm> {
        self.form.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Indices into [`App::tasks`] of the rows the list shows.
    pub fn visible(&self) -> Vec<usize> {
        visible_indices(&self.tasks, &self.filter)
    }

    /// Selected row among the visible tasks, if any are visible.
    pub fn selected(&self) -> Option<usize> {
        let len = self.visible().len();
        (len > 0).then(|| self.selected.min(len - 1))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_index().and_then(|i| self.tasks.get(i))
    }

    /// Selected position in the full task list.
    fn selected_index(&self) -> Option<usize> {
        self.visible().get(self.selected).copied()
    }

    pub fn update(self, msg: Message) -> (Self, Option<Effect>) {
        self.update_at(msg, Utc::now())
    }

    /// [`App::update`] with an explicit clock.
    pub fn update_at(mut self, msg: Message, now: DateTime<Utc>) -> (Self, Option<Effect>) {
        let effect = match msg {
            Message::Key(key) => self.handle_key(key, now),
            Message::Resize(width, height) => {
                self.viewport = Viewport { width, height };
                None
            }
            Message::Loaded(tasks) => self.apply_loaded(tasks),
            Message::LoadFailed(_) => {
                if self.loaded {
                    None
                } else {
                    self.loaded = true;
                    self.flush_deferred_save()
                }
            }
            Message::Saved { status } => self.set_status(status, StatusKind::Info),
            Message::SaveFailed { rollback, .. } => {
                if let Some(rollback) = rollback {
                    self.restore(rollback);
                }
                self.set_status(SAVE_ERROR_STATUS.to_string(), StatusKind::Error)
            }
            Message::ClearStatus(token) => {
                if self.status.as_ref().is_some_and(|s| s.token == token) {
                    self.status = None;
                }
                None
            }
        };
        (self, effect)
    }

    fn handle_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Effect> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if is_quit(&key) {
            self.quit = true;
            return Some(Effect::Quit);
        }
        match self.mode {
            ViewMode::List if self.filter.is_typing() => self.handle_filter_input(key),
            ViewMode::List => self.handle_task_list_input(key, now),
            ViewMode::Edit => self.handle_form_input(key, local_date(now)),
        }
    }

    fn handle_task_list_input(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Option<Effect> {
        let intent = list_intent(&key, &self.filter)?;
        match intent {
            Intent::Quit => {
                self.quit = true;
                Some(Effect::Quit)
            }
            Intent::NewTask => {
                self.form = Some(EditForm::new_task(now));
                self.mode = ViewMode::Edit;
                None
            }
            Intent::EditSelected => {
                let form = EditForm::from_task(self.selected_task()?);
                self.form = Some(form);
                self.mode = ViewMode::Edit;
                None
            }
            Intent::ToggleDone => self.toggle_selected(),
            Intent::Delete => self.delete_selected(),
            Intent::StartFilter => {
                let text = self.filter.text().unwrap_or_default().to_string();
                self.filter = Filter::Typing(text);
                None
            }
            Intent::ClearFilter => {
                self.set_filter(Filter::Off);
                None
            }
            Intent::ToggleHelp => {
                self.show_help = !self.show_help;
                None
            }
            Intent::MoveUp
            | Intent::MoveDown
            | Intent::PageUp
            | Intent::PageDown
            | Intent::Home
            | Intent::End => {
                let len = self.visible().len();
                self.selected = move_selection(self.selected, len, intent, self.viewport.page_size());
                None
            }
        }
    }

    fn handle_filter_input(&mut self, key: KeyEvent) -> Option<Effect> {
        let Filter::Typing(mut text) = self.filter.clone() else {
            return None;
        };
        match key.code {
            KeyCode::Esc => self.set_filter(Filter::Off),
            KeyCode::Enter => {
                if text.is_empty() {
                    self.set_filter(Filter::Off);
                    return self.set_status("Filter cleared".to_string(), StatusKind::Info);
                }
                let status = format!("Filter applied: '{}' ({} tasks)", text, self.visible().len());
                self.filter = Filter::Applied(text);
                return self.set_status(status, StatusKind::Info);
            }
            KeyCode::Backspace => {
                text.pop();
                self.set_filter(Filter::Typing(text));
                self.selected = 0;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                text.push(c);
                self.set_filter(Filter::Typing(text));
                self.selected = 0;
            }
            _ => {}
        }
        None
    }

    /// Change the filter, keeping the selected task selected when it stays visible.
    fn set_filter(&mut self, filter: Filter) {
        let current = self.selected_index();
        self.filter = filter;
        self.reselect(current);
    }

    fn reselect(&mut self, index: Option<usize>) {
        let visible = self.visible();
        self.selected = index
            .and_then(|i| visible.iter().position(|v| *v == i))
            .unwrap_or(0);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = if len == 0 { 0 } else { self.selected.min(len - 1) };
    }

    fn handle_form_input(&mut self, key: KeyEvent, today: NaiveDate) -> Option<Effect> {
        let form = self.form.as_mut()?;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.mode = ViewMode::List;
            }
            KeyCode::Char('s') | KeyCode::Char('S') if ctrl => return self.submit_form(today),
            KeyCode::Tab | KeyCode::Enter => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Up if form.focus() == FormField::DueDate => form.shift_due(1, today),
            KeyCode::Down if form.focus() == FormField::DueDate => form.shift_due(-1, today),
            KeyCode::Up => form.prev_field(),
            KeyCode::Down => form.next_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Home => form.handle_home(),
            KeyCode::End => form.handle_end(),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(c) if !ctrl => form.handle_char(c),
            _ => {}
        }
        None
    }

    fn submit_form(&mut self, today: NaiveDate) -> Option<Effect> {
        let result = self.form.as_ref()?.validate(today);
        match result {
            Ok(save) => self.apply_save(save),
            Err(err) => self.set_status(err.to_string(), StatusKind::Error),
        }
    }

    /// Fold a validated form into the list and leave edit mode.
    fn apply_save(&mut self, save: SaveTask) -> Option<Effect> {
        self.form = None;
        self.mode = ViewMode::List;

        let existing = (!save.is_new)
            .then(|| self.tasks.iter().position(|t| t.id == save.task_id))
            .flatten();
        let tasks = Arc::make_mut(&mut self.tasks);
        let status = match existing {
            Some(index) => {
                let status = format!("Edited: \"{}\"", save.title);
                tasks[index] = save.into_task();
                self.reselect(Some(index));
                status
            }
            None => {
                let status = format!("Created new task: \"{}\"", save.title);
                tasks.insert(0, save.into_task().with_id(Uuid::new_v4()));
                self.reselect(Some(0));
                status
            }
        };
        self.record_mutation(status, None)
    }

    fn toggle_selected(&mut self) -> Option<Effect> {
        let index = self.selected_index()?;
        let task = &mut Arc::make_mut(&mut self.tasks)[index];
        task.done = !task.done;
        let status = if task.done {
            format!("Completed: \"{}\"", task.title)
        } else {
            format!("Edited: \"{}\"", task.title)
        };
        self.record_mutation(status, None)
    }

    fn delete_selected(&mut self) -> Option<Effect> {
        let index = self.selected_index()?;
        let task = Arc::make_mut(&mut self.tasks).remove(index);
        let status = format!("Deleted: \"{}\"", task.title);
        self.clamp_selection();
        self.record_mutation(status, Some(Rollback { index, task }))
    }

    /// Issue the save for a user mutation, or hold it until the load lands.
    fn record_mutation(&mut self, status: String, rollback: Option<Rollback>) -> Option<Effect> {
        self.mutated = true;
        if !self.loaded {
            self.deferred_save = Some(status);
            return None;
        }
        Some(Effect::Save {
            tasks: Arc::clone(&self.tasks),
            status,
            rollback,
        })
    }

    fn flush_deferred_save(&mut self) -> Option<Effect> {
        let status = self.deferred_save.take()?;
        Some(Effect::Save {
            tasks: Arc::clone(&self.tasks),
            status,
            rollback: None,
        })
    }

    /// Seed the list from the startup load without losing earlier edits.
    fn apply_loaded(&mut self, loaded: Vec<Task>) -> Option<Effect> {
        if self.loaded {
            return None;
        }
        self.loaded = true;
        if !self.mutated {
            self.tasks = Arc::new(loaded);
            self.clamp_selection();
            return None;
        }
        let seen: HashSet<Uuid> = self.tasks.iter().map(|t| t.id).collect();
        Arc::make_mut(&mut self.tasks).extend(loaded.into_iter().filter(|t| !seen.contains(&t.id)));
        self.clamp_selection();
        self.flush_deferred_save()
    }

    fn restore(&mut self, rollback: Rollback) {
        if self.tasks.iter().any(|t| t.id == rollback.task.id) {
            return;
        }
        let tasks = Arc::make_mut(&mut self.tasks);
        let index = rollback.index.min(tasks.len());
        tasks.insert(index, rollback.task);
        self.reselect(Some(index));
    }

    fn set_status(&mut self, text: String, kind: StatusKind) -> Option<Effect> {
        self.status_token += 1;
        let token = self.status_token;
        self.status = Some(StatusMessage { text, kind, token });
        Some(Effect::ClearStatusAfter {
            token,
            delay: STATUS_LIFETIME,
        })
    }
}

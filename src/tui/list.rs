//! List view key bindings, the title filter and selection movement.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::task::Task;

/// What a key press in the list view asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    NewTask,
    EditSelected,
    ToggleDone,
    Delete,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    StartFilter,
    ClearFilter,
    ToggleHelp,
    Quit,
}

/// Title filter over the visible tasks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Off,
    /// Being typed; every other list key is suppressed.
    Typing(String),
    Applied(String),
}

impl Filter {
    pub fn text(&self) -> Option<&str> {
        match self {
            Filter::Off => None,
            Filter::Typing(text) | Filter::Applied(text) => Some(text),
        }
    }

    pub fn is_typing(&self) -> bool {
        matches!(self, Filter::Typing(_))
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Filter::Off)
    }

    /// Case-insensitive substring match on the title. An empty filter matches everything.
    pub fn matches(&self, task: &Task) -> bool {
        match self.text() {
            None => true,
            Some(text) if text.is_empty() => true,
            Some(text) => task.title.to_lowercase().contains(&text.to_lowercase()),
        }
    }
}

/// The global quit chord, honoured in every view and filter state.
pub fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Map a key to a list intent. Returns `None` while the filter is being typed.
pub fn list_intent(key: &KeyEvent, filter: &Filter) -> Option<Intent> {
    if is_quit(key) {
        return Some(Intent::Quit);
    }
    if filter.is_typing() || key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let intent = match key.code {
        KeyCode::Char('n') => Intent::NewTask,
        KeyCode::Char('e') => Intent::EditSelected,
        KeyCode::Char(' ') => Intent::ToggleDone,
        KeyCode::Char('r') => Intent::Delete,
        KeyCode::Char('/') => Intent::StartFilter,
        KeyCode::Char('?') => Intent::ToggleHelp,
        KeyCode::Char('q') if !filter.is_active() => Intent::Quit,
        KeyCode::Esc if filter.is_active() => Intent::ClearFilter,
        KeyCode::Up | KeyCode::Char('k') => Intent::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Intent::MoveDown,
        KeyCode::PageUp => Intent::PageUp,
        KeyCode::PageDown => Intent::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Intent::Home,
        KeyCode::End | KeyCode::Char('G') => Intent::End,
        _ => return None,
    };
    Some(intent)
}

/// Indices into `tasks` of the tasks the filter lets through, in order.
pub fn visible_indices(tasks: &[Task], filter: &Filter) -> Vec<usize> {
    tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| filter.matches(task))
        .map(|(i, _)| i)
        .collect()
}

/// New selection after a movement intent over `len` visible rows.
pub fn move_selection(selected: usize, len: usize, intent: Intent, page: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    let page = page.max(1);
    match intent {
        Intent::MoveUp => selected.saturating_sub(1),
        Intent::MoveDown => (selected + 1).min(last),
        Intent::PageUp => selected.saturating_sub(page),
        Intent::PageDown => (selected + page).min(last),
        Intent::Home => 0,
        Intent::End => last,
        _ => selected.min(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_bindings() {
        let off = Filter::Off;
        assert_eq!(list_intent(&key(KeyCode::Char('n')), &off), Some(Intent::NewTask));
        assert_eq!(list_intent(&key(KeyCode::Char('e')), &off), Some(Intent::EditSelected));
        assert_eq!(list_intent(&key(KeyCode::Char(' ')), &off), Some(Intent::ToggleDone));
        assert_eq!(list_intent(&key(KeyCode::Char('r')), &off), Some(Intent::Delete));
        assert_eq!(list_intent(&key(KeyCode::Char('j')), &off), Some(Intent::MoveDown));
        assert_eq!(list_intent(&key(KeyCode::Up), &off), Some(Intent::MoveUp));
        assert_eq!(list_intent(&key(KeyCode::Char('q')), &off), Some(Intent::Quit));
        assert_eq!(list_intent(&key(KeyCode::Esc), &off), None);
        assert_eq!(list_intent(&key(KeyCode::Char('x')), &off), None);
    }

    #[test]
    fn test_typing_filter_suppresses_everything_but_quit() {
        let typing = Filter::Typing("ab".into());
        assert_eq!(list_intent(&key(KeyCode::Char('n')), &typing), None);
        assert_eq!(list_intent(&key(KeyCode::Char(' ')), &typing), None);
        assert_eq!(list_intent(&ctrl('c'), &typing), Some(Intent::Quit));
    }

    #[test]
    fn test_applied_filter_changes_q_and_esc() {
        let applied = Filter::Applied("ab".into());
        assert_eq!(list_intent(&key(KeyCode::Char('q')), &applied), None);
        assert_eq!(list_intent(&key(KeyCode::Esc), &applied), Some(Intent::ClearFilter));
        assert_eq!(list_intent(&key(KeyCode::Char('r')), &applied), Some(Intent::Delete));
    }

    #[test]
    fn test_ctrl_chords_other_than_quit_are_ignored() {
        assert!(is_quit(&ctrl('c')));
        assert!(!is_quit(&key(KeyCode::Char('c'))));
        assert_eq!(list_intent(&ctrl('n'), &Filter::Off), None);
    }

    #[test]
    fn test_visible_indices_filters_by_title_case_insensitively() {
        let tasks = vec![
            Task::with_fields("Buy Milk", "", None, false),
            Task::with_fields("Call mum", "milk", None, false),
            Task::with_fields("milkshake", "", None, true),
        ];
        assert_eq!(visible_indices(&tasks, &Filter::Off), vec![0, 1, 2]);
        assert_eq!(visible_indices(&tasks, &Filter::Typing("MILK".into())), vec![0, 2]);
        assert_eq!(visible_indices(&tasks, &Filter::Applied(String::new())), vec![0, 1, 2]);
        assert!(visible_indices(&tasks, &Filter::Applied("zzz".into())).is_empty());
    }

    #[test]
    fn test_move_selection_stays_in_bounds() {
        assert_eq!(move_selection(0, 5, Intent::MoveUp, 3), 0);
        assert_eq!(move_selection(4, 5, Intent::MoveDown, 3), 4);
        assert_eq!(move_selection(1, 5, Intent::PageDown, 3), 4);
        assert_eq!(move_selection(4, 5, Intent::PageUp, 3), 1);
        assert_eq!(move_selection(2, 5, Intent::Home, 3), 0);
        assert_eq!(move_selection(0, 5, Intent::End, 3), 4);
        assert_eq!(move_selection(3, 0, Intent::MoveDown, 3), 0);
        assert_eq!(move_selection(9, 2, Intent::NewTask, 3), 1);
    }
}

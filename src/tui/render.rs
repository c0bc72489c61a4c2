//! Drawing the app state with ratatui.

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::dates::{format_due_relative, local_date, parse_due_input, truncate, DATE_FORMAT};
use crate::task::Task;
use crate::tui::app::App;
use crate::tui::enums::{FormField, StatusKind, ViewMode};
use crate::tui::list::Filter;
use crate::tui::task_form::EditForm;
use crate::tui::theme::Theme;
use crate::tui::utils::centered_rect;

/// Draw the whole screen. `today` drives the relative due dates.
pub fn render(f: &mut Frame, app: &App, theme: &Theme, today: NaiveDate) {
    match app.mode() {
        ViewMode::List => render_task_list(f, app, theme, today),
        ViewMode::Edit => render_task_form(f, app, theme, today),
    }
    if app.show_help() && app.mode() == ViewMode::List {
        let area = f.area();
        render_help(f, theme, area);
    }
}

fn screen_chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(area)
}

fn render_header(f: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let header = Paragraph::new(Line::from(Span::styled(format!(" {title} "), theme.header)));
    f.render_widget(header, area);
}

fn key_line(pairs: &[(&str, &str)], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(pairs.len() * 2);
    for (key, action) in pairs {
        spans.push(Span::styled(key.to_string(), theme.key));
        spans.push(Span::styled(format!(" {action}  "), theme.dim));
    }
    Line::from(spans)
}

fn task_item(task: &Task, width: usize, selected: bool, theme: &Theme, today: NaiveDate) -> ListItem<'static> {
    let marker = if selected { "│ " } else { "  " };
    let check = if task.done { "[x] " } else { "[ ] " };
    let mut title_style = if task.done { theme.done } else { Style::default() };
    if selected {
        title_style = title_style.patch(theme.selected);
    }
    let text_width = width.saturating_sub(marker.chars().count() + check.len());

    let due_date = task.due.map(local_date);
    let due_line = match due_date {
        Some(date) => {
            let style = if !task.done && date < today { theme.overdue } else { theme.dim };
            Span::styled(
                format!("    Due {} ({})", date.format(DATE_FORMAT), format_due_relative(Some(date), today)),
                style,
            )
        }
        None => Span::styled("    No due date".to_string(), theme.dim),
    };
    let marker_style = if selected { theme.selected } else { theme.dim };

    ListItem::new(Text::from(vec![
        Line::from(vec![
            Span::styled(marker.to_string(), marker_style),
            Span::styled(check.to_string(), title_style),
            Span::styled(truncate(&task.title, text_width), title_style),
        ]),
        Line::from(vec![
            Span::styled(marker.to_string(), marker_style),
            Span::styled(format!("    {}", truncate(&task.description, text_width)), theme.dim),
        ]),
        Line::from(vec![Span::styled(marker.to_string(), marker_style), due_line]),
        Line::from(""),
    ]))
}

/// Render the task list with its status bar and key help.
fn render_task_list(f: &mut Frame, app: &App, theme: &Theme, today: NaiveDate) {
    let chunks = screen_chunks(f.area());
    render_header(f, chunks[0], "Tasks", theme);

    let visible = app.visible();
    let selected = app.selected();
    let width = chunks[1].width as usize;

    if visible.is_empty() {
        let text = if !app.is_loaded() {
            "Loading tasks..."
        } else if app.filter().is_active() {
            "No tasks match the filter."
        } else {
            "No tasks yet. Press n to create one."
        };
        f.render_widget(
            Paragraph::new(Span::styled(text, theme.dim)).alignment(Alignment::Center),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(row, &i)| task_item(&app.tasks()[i], width, Some(row) == selected, theme, today))
            .collect();
        let mut state = ListState::default();
        state.select(selected);
        f.render_stateful_widget(List::new(items), chunks[1], &mut state);
    }

    let status = match app.status() {
        Some(status) => Span::styled(status.text.clone(), status_style(status.kind, theme)),
        None => Span::styled(list_summary(app, visible.len()), theme.dim),
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[2]);

    let keys = if app.filter().is_typing() {
        key_line(&[("enter", "apply"), ("esc", "clear"), ("ctrl+c", "quit")], theme)
    } else {
        key_line(
            &[
                ("n", "new"),
                ("e", "edit"),
                ("space", "toggle"),
                ("r", "remove"),
                ("/", "filter"),
                ("?", "help"),
                ("q", "quit"),
            ],
            theme,
        )
    };
    f.render_widget(Paragraph::new(keys), chunks[3]);
}

fn list_summary(app: &App, visible: usize) -> String {
    match app.filter() {
        Filter::Typing(text) => format!("Filter: {text}_"),
        Filter::Applied(text) => format!("Tasks: {visible} (filtered by '{text}') | Esc to clear"),
        Filter::Off if !app.is_loaded() => "Loading tasks...".to_string(),
        Filter::Off => {
            let done = app.tasks().iter().filter(|t| t.done).count();
            format!("Tasks: {} ({} done) | Press '?' for help", app.tasks().len(), done)
        }
    }
}

fn status_style(kind: StatusKind, theme: &Theme) -> Style {
    match kind {
        StatusKind::Info => theme.info,
        StatusKind::Error => theme.error,
    }
}

/// Render the edit form with its three inputs.
fn render_task_form(f: &mut Frame, app: &App, theme: &Theme, today: NaiveDate) {
    let Some(form) = app.form() else {
        return;
    };
    let chunks = screen_chunks(f.area());

    let title = match form.field(FormField::Title).value().trim() {
        "" => "Editing...".to_string(),
        title => truncate(title, chunks[0].width.saturating_sub(2) as usize),
    };
    render_header(f, chunks[0], &title, theme);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Description
            Constraint::Length(3), // Due Date
            Constraint::Length(1), // parsed due date
            Constraint::Min(0),
        ])
        .split(chunks[1]);

    for (field, area) in FormField::ALL.into_iter().zip(body.iter()) {
        render_input(f, form, field, *area, theme);
    }
    f.render_widget(Paragraph::new(due_hint(form, theme, today)), body[3]);

    if let Some(status) = app.status() {
        let line = Span::styled(status.text.clone(), status_style(status.kind, theme));
        f.render_widget(Paragraph::new(line), chunks[2]);
    }

    let keys = key_line(
        &[
            ("tab/enter", "next"),
            ("shift+tab", "prev"),
            ("up/down", "due ±1 day"),
            ("ctrl+s", "save"),
            ("esc", "cancel"),
        ],
        theme,
    );
    f.render_widget(Paragraph::new(keys), chunks[3]);

    let focus = form.focus();
    let area = match focus {
        FormField::Title => body[0],
        FormField::Description => body[1],
        FormField::DueDate => body[2],
    };
    let input = form.field(focus);
    let column = cursor_column(input.cursor(), area.width.saturating_sub(2));
    f.set_cursor_position((area.x + column + 1, area.y + 1));
}

/// Cursor offset inside a bordered input, pinned to its last inner column.
fn cursor_column(cursor: usize, inner_width: u16) -> u16 {
    u16::try_from(cursor)
        .unwrap_or(u16::MAX)
        .min(inner_width.saturating_sub(1))
}

fn render_input(f: &mut Frame, form: &EditForm, field: FormField, area: Rect, theme: &Theme) {
    let input = form.field(field);
    let border_style = if input.active { theme.focused } else { Style::default() };
    let widget = Paragraph::new(input.value()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(field.label())
            .border_style(border_style),
    );
    f.render_widget(widget, area);
}

/// What the due date text currently means.
fn due_hint(form: &EditForm, theme: &Theme, today: NaiveDate) -> Line<'static> {
    let text = form.field(FormField::DueDate).value().trim();
    if text.is_empty() {
        return Line::from(Span::styled(" No due date", theme.dim));
    }
    match parse_due_input(text, today) {
        Some(date) if date < today => Line::from(Span::styled(
            format!(" {} is in the past", date.format(DATE_FORMAT)),
            theme.overdue,
        )),
        Some(date) => Line::from(Span::styled(
            format!(" {} ({})", date.format("%a %Y-%m-%d"), format_due_relative(Some(date), today)),
            theme.dim,
        )),
        None => Line::from(Span::styled(" Not a date", theme.overdue)),
    }
}

fn render_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Task Manager Help", bold)),
        Line::from(""),
        Line::from(Span::styled("Task List:", bold)),
        Line::from("  ↑/k, ↓/j       Move selection"),
        Line::from("  PgUp/PgDn      Move a page"),
        Line::from("  Home/End       First/last task"),
        Line::from("  n              New task"),
        Line::from("  e              Edit selected task"),
        Line::from("  space          Toggle done"),
        Line::from("  r              Remove selected task"),
        Line::from("  /              Filter by title (Enter applies, Esc clears)"),
        Line::from("  q, ctrl+c      Quit"),
        Line::from(""),
        Line::from(Span::styled("Edit Form:", bold)),
        Line::from("  tab/enter      Next field"),
        Line::from("  shift+tab      Previous field"),
        Line::from("  up/down        Shift due date (on due date field)"),
        Line::from("  ctrl+s         Save"),
        Line::from("  esc            Cancel"),
        Line::from(""),
        Line::from("Due dates: YYYY-MM-DD, today, tomorrow, fri, next mon, in 3d, eow, eom"),
        Line::from(""),
        Line::from(Span::styled("Press ? to close", theme.dim)),
    ];

    let area = centered_rect(70, 80, area);
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(theme.focused),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| render(f, app, &Theme::default(), today()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_list_shows_tasks_and_summary() {
        let app = App::with_tasks(vec![
            Task::with_fields("Buy milk", "semi-skimmed", None, false),
            Task::with_fields("Pay rent", "before friday", None, true),
        ]);
        let out = screen(&app);
        assert!(out.contains("Buy milk"));
        assert!(out.contains("semi-skimmed"));
        assert!(out.contains("No due date"));
        assert!(out.contains("Tasks: 2 (1 done)"));
    }

    #[test]
    fn test_empty_states() {
        assert!(screen(&App::new()).contains("Loading tasks..."));
        assert!(screen(&App::with_tasks(Vec::new())).contains("Press n to create one"));
    }

    #[test]
    fn test_cursor_column_stays_inside_the_input() {
        assert_eq!(cursor_column(3, 76), 3);
        assert_eq!(cursor_column(200, 76), 75);
        assert_eq!(cursor_column(65_536, 76), 75);
        assert_eq!(cursor_column(usize::MAX, 0), 0);
    }
}

use std::fs;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use terminaltask::service::{FileTaskService, TaskService};
use terminaltask::store::{FileTaskStore, TaskStore};
use terminaltask::task::Task;
use terminaltask::tui::app::App;
use terminaltask::tui::effects::{resolve, Effect, Message};
use terminaltask::tui::enums::ViewMode;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 0).unwrap()
}

fn key(code: KeyCode) -> Message {
    Message::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn chars(s: &str) -> Vec<Message> {
    s.chars().map(|c| key(KeyCode::Char(c))).collect()
}

fn ctrl(c: char) -> Message {
    Message::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Fold a message and run every resulting storage effect to completion,
/// like the runtime does, but synchronously. Timers are dropped.
fn drive(mut app: App, msg: Message, service: &dyn TaskService) -> App {
    let mut pending = Some(msg);
    while let Some(msg) = pending.take() {
        let (next, effect) = app.update_at(msg, now());
        app = next;
        pending = match effect {
            Some(Effect::ClearStatusAfter { .. }) | Some(Effect::Quit) | None => None,
            Some(effect) => resolve(effect, service),
        };
    }
    app
}

fn drive_all(mut app: App, msgs: Vec<Message>, service: &dyn TaskService) -> App {
    for msg in msgs {
        app = drive(app, msg, service);
    }
    app
}

fn start(service: &dyn TaskService) -> App {
    let (app, load) = App::start();
    let loaded = resolve(load, service).expect("load always answers");
    drive(app, loaded, service)
}

fn new_task_keys(title: &str, description: &str) -> Vec<Message> {
    let mut msgs = vec![key(KeyCode::Char('n'))];
    msgs.extend(chars(title));
    msgs.push(key(KeyCode::Enter));
    msgs.extend(chars(description));
    msgs.push(ctrl('s'));
    msgs
}

#[test]
fn create_toggle_delete_round_trip_through_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let service = FileTaskService::new(FileTaskStore::new(&path));

    let app = start(&service);
    assert!(app.tasks().is_empty());

    let app = drive_all(app, new_task_keys("Water plants", "the fern too"), &service);
    let app = drive_all(app, new_task_keys("Pay rent", "by transfer"), &service);
    assert_eq!(app.mode(), ViewMode::List);
    assert_eq!(app.status().unwrap().text, "Created new task: \"Pay rent\"");

    let on_disk = service.load_tasks().unwrap();
    assert_eq!(on_disk, app.tasks().to_vec());
    assert_eq!(on_disk[0].title, "Pay rent");
    assert_eq!(on_disk[1].title, "Water plants");

    let app = drive(app, key(KeyCode::Char(' ')), &service);
    assert_eq!(app.status().unwrap().text, "Completed: \"Pay rent\"");
    assert!(service.load_tasks().unwrap()[0].done);

    // A fresh session sees the same ids and fields.
    let reopened = start(&FileTaskService::new(FileTaskStore::new(&path)));
    assert_eq!(reopened.tasks(), app.tasks());

    let app = drive_all(app, vec![key(KeyCode::Down), key(KeyCode::Char('r'))], &service);
    assert_eq!(app.status().unwrap().text, "Deleted: \"Water plants\"");
    let on_disk = service.load_tasks().unwrap();
    assert_eq!(on_disk.len(), 1);
    assert_eq!(on_disk[0].title, "Pay rent");
}

#[test]
fn edits_made_before_the_load_lands_survive_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let store = FileTaskStore::new(&path);
    let stored = vec![Task::with_fields("From disk", "already there", None, false)];
    store.save(&stored).unwrap();
    let service = FileTaskService::new(store);

    // The load is issued but its answer arrives after the user has typed.
    let (app, load) = App::start();
    let app = drive_all(app, new_task_keys("Typed early", "fast fingers"), &service);
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(service.load_tasks().unwrap(), stored);

    let loaded = resolve(load, &service).unwrap();
    let app = drive(app, loaded, &service);

    let titles: Vec<_> = app.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Typed early", "From disk"]);
    assert_eq!(service.load_tasks().unwrap(), app.tasks().to_vec());
    assert_eq!(app.status().unwrap().text, "Created new task: \"Typed early\"");
}

#[test]
fn unreadable_file_starts_empty_and_save_failure_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    fs::write(&path, "not json at all").unwrap();
    let service = FileTaskService::new(FileTaskStore::new(&path));

    let app = start(&service);
    assert!(app.is_loaded());
    assert!(app.tasks().is_empty());

    // Make the directory unusable for the tmp file by putting a directory in its place.
    fs::create_dir(dir.path().join("tasks.json.tmp")).unwrap();
    let app = drive_all(app, new_task_keys("Doomed", "cannot be saved"), &service);
    assert_eq!(app.status().unwrap().text, "Error saving!");
    assert_eq!(app.tasks().len(), 1);
}

#[test]
fn failed_delete_keeps_the_task() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let service = FileTaskService::new(FileTaskStore::new(&path));
    let app = start(&service);
    let app = drive_all(app, new_task_keys("Keep me", "please"), &service);

    fs::create_dir(dir.path().join("tasks.json.tmp")).unwrap();
    let app = drive(app, key(KeyCode::Char('r')), &service);
    assert_eq!(app.status().unwrap().text, "Error saving!");
    assert_eq!(app.tasks().len(), 1);
    assert_eq!(app.tasks()[0].title, "Keep me");
    assert_eq!(app.selected_task().unwrap().title, "Keep me");
}

#[test]
fn runner_resolves_effects_on_the_runtime() {
    let dir = tempdir().unwrap();
    let service: Arc<dyn TaskService> =
        Arc::new(FileTaskService::new(FileTaskStore::new(dir.path().join("t.json"))));
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let runner = terminaltask::tui::effects::EffectRunner::new(Arc::clone(&service), tx);
        runner.dispatch(Effect::Save {
            tasks: Arc::new(vec![Task::with_fields("a", "b", None, false)]),
            status: "saved".into(),
            rollback: None,
        });
        assert_eq!(rx.recv().await, Some(Message::Saved { status: "saved".into() }));
    });
    assert_eq!(service.load_tasks().unwrap().len(), 1);
}

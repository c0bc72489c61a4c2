//! Deferred work requested by the app and the messages it resolves into.
//!
//! The app never performs I/O. Each transition may return one [`Effect`]; the
//! [`EffectRunner`] runs it off the UI task and posts the resulting
//! [`Message`] into the same channel the key reader posts into.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, warn};

use crate::service::TaskService;
use crate::task::Task;

/// How long a status message stays visible.
pub const STATUS_LIFETIME: Duration = Duration::from_secs(2);

/// A task removed by a delete, restored if the delete cannot be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollback {
    pub index: usize,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load,
    /// Persist the whole list; `status` is shown once it is written.
    Save {
        tasks: Arc<Vec<Task>>,
        status: String,
        rollback: Option<Rollback>,
    },
    ClearStatusAfter {
        token: u64,
        delay: Duration,
    },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Key(KeyEvent),
    Resize(u16, u16),
    Loaded(Vec<Task>),
    LoadFailed(String),
    Saved {
        status: String,
    },
    SaveFailed {
        error: String,
        rollback: Option<Rollback>,
    },
    ClearStatus(u64),
}

/// Run an effect to completion on the current thread.
///
/// Timers resolve immediately. Failures are logged here with the service name.
pub fn resolve(effect: Effect, service: &dyn TaskService) -> Option<Message> {
    match effect {
        Effect::Load => match service.load_tasks() {
            Ok(tasks) => Some(Message::Loaded(tasks)),
            Err(err) => {
                warn!(store = %service.name(), error = %err, "could not load tasks, starting empty");
                Some(Message::LoadFailed(err.to_string()))
            }
        },
        Effect::Save {
            tasks,
            status,
            rollback,
        } => match service.save_tasks(&tasks) {
            Ok(()) => Some(Message::Saved { status }),
            Err(err) => {
                error!(store = %service.name(), error = %err, count = tasks.len(), "could not save tasks");
                Some(Message::SaveFailed {
                    error: err.to_string(),
                    rollback,
                })
            }
        },
        Effect::ClearStatusAfter { token, .. } => Some(Message::ClearStatus(token)),
        Effect::Quit => None,
    }
}

/// Spawns effects on the tokio runtime.
///
/// Loads and saves go through one storage worker, so they are written and
/// answered in the order they were dispatched.
#[derive(Clone)]
pub struct EffectRunner {
    storage: UnboundedSender<Effect>,
    tx: UnboundedSender<Message>,
}

impl EffectRunner {
    /// Must be called inside a tokio runtime. The worker stops once every
    /// clone of the runner is dropped.
    pub fn new(service: Arc<dyn TaskService>, tx: UnboundedSender<Message>) -> Self {
        let (storage, queue) = mpsc::unbounded_channel();
        tokio::spawn(storage_worker(service, queue, tx.clone()));
        Self { storage, tx }
    }

    /// Start `effect` and return immediately. `Quit` is the caller's to handle.
    pub fn dispatch(&self, effect: Effect) {
        match effect {
            Effect::Quit => {}
            Effect::ClearStatusAfter { token, delay } => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::ClearStatus(token));
                });
            }
            effect @ (Effect::Load | Effect::Save { .. }) => {
                if self.storage.send(effect).is_err() {
                    error!("storage worker is gone, effect dropped");
                }
            }
        }
    }
}

async fn storage_worker(
    service: Arc<dyn TaskService>,
    mut queue: UnboundedReceiver<Effect>,
    tx: UnboundedSender<Message>,
) {
    while let Some(effect) = queue.recv().await {
        let service = Arc::clone(&service);
        match tokio::task::spawn_blocking(move || resolve(effect, service.as_ref())).await {
            Ok(Some(message)) => {
                let _ = tx.send(message);
            }
            Ok(None) => {}
            Err(err) => error!(error = %err, "storage task failed"),
        }
    }
}

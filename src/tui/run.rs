//! Terminal lifecycle and the interactive event loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::service::TaskService;
use crate::tui::app::App;
use crate::tui::effects::{Effect, EffectRunner, Message};
use crate::tui::render::render;
use crate::tui::theme::Theme;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    fn draw<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        let mut stdout = io::stdout();
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Forward key and resize events until `shutdown` is cancelled.
fn spawn_input_reader(tx: UnboundedSender<Message>, shutdown: CancellationToken) {
    tokio::task::spawn_blocking(move || {
        while !shutdown.is_cancelled() {
            if !event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                continue;
            }
            let message = match event::read() {
                Ok(Event::Key(key)) => Message::Key(key),
                Ok(Event::Resize(width, height)) => Message::Resize(width, height),
                Ok(_) => continue,
                Err(err) => {
                    debug!(error = %err, "terminal read failed");
                    continue;
                }
            };
            if tx.send(message).is_err() {
                break;
            }
        }
    });
}

/// Run the interactive session until the user quits.
pub async fn run_tui(service: Arc<dyn TaskService>, theme: Theme) -> Result<()> {
    let mut terminal = TerminalGuard::new().context("initialize terminal")?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    spawn_input_reader(tx.clone(), input_shutdown.clone());
    let runner = EffectRunner::new(service, tx);

    let (mut app, load) = App::start();
    if let Ok((width, height)) = terminal::size() {
        app = app.update(Message::Resize(width, height)).0;
    }
    runner.dispatch(load);

    let result = loop {
        let today = Local::now().date_naive();
        if let Err(err) = terminal.draw(|f| render(f, &app, &theme, today)) {
            break Err(err).context("draw frame");
        }

        let Some(message) = rx.recv().await else {
            break Ok(());
        };
        let (next, effect) = app.update(message);
        app = next;
        match effect {
            Some(Effect::Quit) => break Ok(()),
            Some(effect) => runner.dispatch(effect),
            None => {}
        }
        if app.should_quit() {
            break Ok(());
        }
    };

    input_shutdown.cancel();
    info!(tasks = app.tasks().len(), "session ended");
    result
}

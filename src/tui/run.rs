//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//! Decisions live in the pure layers; this file only carries them out.
//!
//! Architecture: two kinds of producers feed a single tokio channel.
//! - Key reader thread: forwards crossterm key presses
//! - Generation tasks: one per dispatch, sends the outcome when done
//! The event loop consumes from the channel, one event at a time, and
//! is the only writer of App.

use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::gateway::{self, GenerationGateway};
use crate::prompt::PromptSource;

use super::state::{Action, App, AppEvent, Effect};
use super::theme::Theme;
use super::update::{handle_background_event, update};
use super::view::render;

/// Collaborators the event loop needs besides the App itself.
pub struct TuiConfig {
    pub prompts: Box<dyn PromptSource>,
    pub gateway: Arc<dyn GenerationGateway>,
    /// Per-request limit, `None` to wait indefinitely.
    pub timeout: Option<Duration>,
    pub theme: Theme,
}

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(Action::Dismiss),
        KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// PRODUCERS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses to the channel.
fn spawn_key_reader(tx: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore releases, mouse, resize, etc.
                Err(_) => break,
            }
        }
    });
}

/// Spawn one generation as an independent task.
///
/// The outcome comes back as `AppEvent::Generation` on `tx`. If the loop
/// is gone by then (user quit), the outcome is dropped.
pub fn spawn_generation(
    gateway: Arc<dyn GenerationGateway>,
    prompt: String,
    timeout: Option<Duration>,
    tx: UnboundedSender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = gateway::dispatch(gateway.as_ref(), &prompt, timeout).await;
        if tx.send(AppEvent::Generation(outcome)).is_err() {
            debug!("event loop gone, generation outcome discarded");
        }
    })
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI until the user quits.
///
/// Sets up the terminal, starts the key reader, and runs the event loop.
/// The terminal is restored whether the loop ends normally or not.
pub async fn run(app: App, config: TuiConfig) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let (tx, rx) = unbounded_channel::<AppEvent>();
    spawn_key_reader(tx.clone());

    let result = event_loop(&mut terminal, app, &config, tx, rx).await;

    restore_terminal()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    config: &TuiConfig,
    tx: UnboundedSender<AppEvent>,
    mut rx: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    info!(templates = app.templates.len(), "TUI started");

    loop {
        terminal.draw(|frame| render(&app, &config.theme, frame))?;

        if app.is_exiting() {
            break;
        }

        // Wait for the next event from any producer
        let Some(event) = rx.recv().await else {
            break; // all senders dropped
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key) {
                    if let Some(effect) = update(&mut app, action, config.prompts.as_ref()) {
                        handle_effect(effect, config, &tx);
                    }
                }
            }
            background_event => handle_background_event(&mut app, background_event),
        }
    }

    info!("TUI exiting");
    Ok(())
}

// ============================================================================
// EFFECT HANDLING
// ============================================================================

/// Execute an effect requested by a transition.
fn handle_effect(effect: Effect, config: &TuiConfig, tx: &UnboundedSender<AppEvent>) {
    match effect {
        Effect::Dispatch { template, prompt } => {
            info!(%template, backend = config.gateway.name(), "spawning generation");
            spawn_generation(Arc::clone(&config.gateway), prompt, config.timeout, tx.clone());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

//! State transitions: (App, Action) → App', Option<Effect>.
//!
//! This is the core logic of the TUI. Fully testable without a terminal
//! or a network. Each phase defines which actions it accepts; anything
//! else is a no-op. The only I/O is the prompt read on Confirm, and it
//! goes through the injected [`PromptSource`].

use tracing::{info, warn};

use crate::prompt::PromptSource;
use crate::types::GenerationOutcome;

use super::state::{Action, App, AppEvent, Effect, Phase};

/// Apply one user action.
///
/// Mutates the app in place and returns the effect the run loop must
/// execute, if any. At most one dispatch can be outstanding: Confirm is
/// only accepted while browsing, and browsing is only re-entered after
/// the outcome has been shown and dismissed.
pub fn update(app: &mut App, action: Action, prompts: &dyn PromptSource) -> Option<Effect> {
    match app.phase {
        Phase::Browsing { .. } => update_browsing(app, action, prompts),
        Phase::AwaitingResult { .. } => update_awaiting(app, action),
        Phase::ShowingResult { .. } => update_result(app, action),
        Phase::ShowingError { .. } => update_showing(app, action),
        Phase::Exiting => None,
    }
}

/// Apply an event produced by background work.
///
/// An outcome that arrives outside `AwaitingResult` is stale and dropped.
pub fn handle_background_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Generation(outcome) => apply_outcome(app, outcome),
        // Keys are routed through map_key → update by the run loop
        AppEvent::Key(_) => {}
    }
}

// ============================================================================
// PER-PHASE HANDLERS
// ============================================================================

/// Browsing: cursor movement, confirm, quit.
fn update_browsing(app: &mut App, action: Action, prompts: &dyn PromptSource) -> Option<Effect> {
    let len = app.templates.len();

    match action {
        Action::MoveUp => {
            app.cursor = app.cursor.saturating_sub(1);
            None
        }
        Action::MoveDown => {
            if app.cursor + 1 < len {
                app.cursor += 1;
            }
            None
        }
        Action::Confirm => confirm(app, prompts),
        Action::Quit => quit(app),
        Action::Dismiss => None,
    }
}

/// AwaitingResult: only Quit. Dismiss is refused so an outcome can never
/// land on a phase that did not ask for it.
fn update_awaiting(app: &mut App, action: Action) -> Option<Effect> {
    match action {
        Action::Quit => quit(app),
        _ => None,
    }
}

/// ShowingResult: MoveUp/MoveDown scroll the response, the rest is
/// shared with ShowingError.
fn update_result(app: &mut App, action: Action) -> Option<Effect> {
    let Phase::ShowingResult { result, scroll, .. } = &mut app.phase else {
        return None;
    };

    match action {
        Action::MoveUp => {
            *scroll = scroll.saturating_sub(1);
            None
        }
        Action::MoveDown => {
            let last = u16::try_from(result.lines().count().saturating_sub(1)).unwrap_or(u16::MAX);
            *scroll = scroll.saturating_add(1).min(last);
            None
        }
        _ => update_showing(app, action),
    }
}

/// ShowingResult / ShowingError: dismiss back to the list, or quit.
fn update_showing(app: &mut App, action: Action) -> Option<Effect> {
    match action {
        Action::Dismiss => {
            app.phase = Phase::Browsing { notice: None };
            None
        }
        Action::Quit => quit(app),
        _ => None,
    }
}

fn quit(app: &mut App) -> Option<Effect> {
    app.phase = Phase::Exiting;
    None
}

// ============================================================================
// CONFIRM
// ============================================================================

/// Read the focused template's prompt and request a dispatch.
///
/// A failed read stays in Browsing with an inline notice; no request is
/// made.
fn confirm(app: &mut App, prompts: &dyn PromptSource) -> Option<Effect> {
    let template = app.focused()?.clone();

    match prompts.read_prompt(&template) {
        Ok(prompt) => {
            info!(template = %template.name, prompt_len = prompt.len(), "template confirmed");
            app.phase = Phase::AwaitingResult {
                selected: app.cursor,
                prompt_bytes: prompt.len(),
            };
            Some(Effect::Dispatch {
                template: template.name,
                prompt,
            })
        }
        Err(e) => {
            warn!(template = %template.name, error = %e, "cannot use template");
            app.phase = Phase::Browsing {
                notice: Some(format!("Cannot use '{}': {}", template.name, e)),
            };
            None
        }
    }
}

// ============================================================================
// BACKGROUND EVENTS
// ============================================================================

fn apply_outcome(app: &mut App, outcome: GenerationOutcome) {
    let Phase::AwaitingResult { selected, .. } = app.phase else {
        warn!(phase = ?app.phase, "ignoring generation outcome outside AwaitingResult");
        return;
    };

    app.phase = match outcome {
        GenerationOutcome::Text(result) => Phase::ShowingResult {
            selected,
            result,
            scroll: 0,
        },
        GenerationOutcome::Failure(error) => Phase::ShowingError { selected, error },
    };
}

// ============================================================================
// TESTS
// ============================================================================

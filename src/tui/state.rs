//! TUI state algebra: pure types, zero effects.
//!
//! These types define the entire interaction state space. Illegal states
//! should be unrepresentable: a result only exists while showing a result,
//! an error only while showing an error, and the selected index only once
//! a request has been dispatched.
//!
//! Design principle: Phase variants carry only per-phase data. The
//! catalog and the cursor live in App, and the cursor only moves while
//! browsing.

use crossterm::event::KeyEvent;

use crate::types::{GenerationOutcome, Template};

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Two producers feed a single channel:
/// - A key reader thread sends `Key` variants
/// - Spawned generation tasks send `Generation`
///
/// Key events go through `map_key → update`, generation outcomes go
/// through `handle_background_event`.
#[derive(Debug)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// A dispatched generation finished.
    Generation(GenerationOutcome),
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
///
/// Owned by the event loop; the view only reads it.
#[derive(Debug)]
pub struct App {
    /// Catalog, fixed at construction.
    pub templates: Vec<Template>,

    /// Focused row. Always `< templates.len()` when the catalog is non-empty.
    pub cursor: usize,

    /// Current phase of the interaction state machine.
    pub phase: Phase,
}

// ============================================================================
// PHASES
// ============================================================================

/// The interaction state machine.
///
/// `Browsing → AwaitingResult → ShowingResult | ShowingError → Browsing`,
/// with `Exiting` reachable from everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Navigating the catalog.
    Browsing {
        /// Inline error from a failed prompt read. Cleared on the next
        /// successful dispatch.
        notice: Option<String>,
    },

    /// Request dispatched, waiting for its outcome.
    AwaitingResult {
        /// Index into App.templates fixed when the request was dispatched.
        selected: usize,
        /// Size of the dispatched prompt, for display.
        prompt_bytes: usize,
    },

    /// Generation succeeded.
    ShowingResult {
        selected: usize,
        result: String,
        /// First response line on screen. At most the last line index.
        scroll: u16,
    },

    /// Generation failed.
    ShowingError { selected: usize, error: String },

    /// Terminal state. The loop stops on the next tick.
    Exiting,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Browsing { notice: None }
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move cursor up in the catalog.
    MoveUp,
    /// Move cursor down in the catalog.
    MoveDown,
    /// Generate from the focused template.
    Confirm,
    /// Leave the result/error view.
    Dismiss,
    /// Quit the application.
    Quit,
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Side effect requested by a transition.
///
/// Pure code never executes these; the run loop does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Spawn one background generation for this prompt.
    Dispatch { template: String, prompt: String },
}

// ============================================================================
// CONSTRUCTORS & QUERIES
// ============================================================================

impl App {
    /// Create an App browsing the given catalog, cursor on the first row.
    pub fn new(templates: Vec<Template>) -> Self {
        App {
            templates,
            cursor: 0,
            phase: Phase::default(),
        }
    }

    /// Template under the cursor, if any.
    pub fn focused(&self) -> Option<&Template> {
        self.templates.get(self.cursor)
    }

    /// Template fixed by the last dispatch, while it is still relevant.
    pub fn selected(&self) -> Option<&Template> {
        self.selected_index().and_then(|i| self.templates.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.phase {
            Phase::AwaitingResult { selected, .. }
            | Phase::ShowingResult { selected, .. }
            | Phase::ShowingError { selected, .. } => Some(*selected),
            Phase::Browsing { .. } | Phase::Exiting => None,
        }
    }

    pub fn last_result(&self) -> Option<&str> {
        match &self.phase {
            Phase::ShowingResult { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.phase {
            Phase::ShowingError { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Inline prompt-read error shown while browsing.
    pub fn notice(&self) -> Option<&str> {
        match &self.phase {
            Phase::Browsing { notice } => notice.as_deref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn is_exiting(&self) -> bool {
        self.phase == Phase::Exiting
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Template> {
        vec![Template::new("api-client"), Template::new("crud-service")]
    }

    #[test]
    fn app_starts_browsing_at_top() {
        let app = App::new(catalog());
        assert_eq!(app.cursor, 0);
        assert_eq!(app.phase, Phase::Browsing { notice: None });
        assert_eq!(app.focused(), Some(&Template::new("api-client")));
        assert!(!app.is_exiting());
    }

    #[test]
    fn empty_app_has_no_focus() {
        let app = App::new(Vec::new());
        assert!(app.is_empty());
        assert_eq!(app.focused(), None);
    }

    #[test]
    fn browsing_has_no_selection_result_or_error() {
        let app = App::new(catalog());
        assert_eq!(app.selected_index(), None);
        assert_eq!(app.last_result(), None);
        assert_eq!(app.last_error(), None);
        assert_eq!(app.notice(), None);
    }

    #[test]
    fn showing_result_exposes_only_result() {
        let mut app = App::new(catalog());
        app.phase = Phase::ShowingResult {
            selected: 1,
            result: "world".into(),
            scroll: 0,
        };
        assert_eq!(app.last_result(), Some("world"));
        assert_eq!(app.last_error(), None);
        assert_eq!(app.selected(), Some(&Template::new("crud-service")));
    }

    #[test]
    fn showing_error_exposes_only_error() {
        let mut app = App::new(catalog());
        app.phase = Phase::ShowingError {
            selected: 0,
            error: "rate limited".into(),
        };
        assert_eq!(app.last_error(), Some("rate limited"));
        assert_eq!(app.last_result(), None);
        assert_eq!(app.selected_index(), Some(0));
    }

    #[test]
    fn notice_only_visible_while_browsing() {
        let mut app = App::new(catalog());
        app.phase = Phase::Browsing {
            notice: Some("prompt.txt missing".into()),
        };
        assert_eq!(app.notice(), Some("prompt.txt missing"));
        assert_eq!(app.last_error(), None);
    }

    #[test]
    fn phase_default_is_browsing_without_notice() {
        assert_eq!(Phase::default(), Phase::Browsing { notice: None });
    }

    #[test]
    fn effect_carries_prompt() {
        let effect = Effect::Dispatch {
            template: "api-client".into(),
            prompt: "hello".into(),
        };
        match effect {
            Effect::Dispatch { prompt, .. } => assert_eq!(prompt, "hello"),
        }
    }
}

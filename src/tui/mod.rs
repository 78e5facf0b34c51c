//! TUI module for interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Phase, Action, Effect)
//! - `update`: Transitions, testable without a terminal
//! - `view`: Pure rendering
//! - `theme`: Style values handed to the view
//! - `run`: Effects (terminal, channel, background generation)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;

pub use run::{TuiConfig, run};
pub use state::{Action, App, AppEvent, Effect, Phase};
pub use theme::Theme;

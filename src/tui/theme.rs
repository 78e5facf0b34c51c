//! TUI color semantics.
//!
//! A theme is a plain value handed to the renderer, never a global.
//! `colored()` is the default palette; `plain()` backs `--no-color` and
//! keeps the cursor visible through reverse video alone.
//!
//! Color semantics:
//! - Purple band: title bar and focused row
//! - Yellow: work in progress (awaiting the backend)
//! - Red: errors and the quit hint
//! - Gray: hints and metadata

use ratatui::style::{Color, Modifier, Style};

const PURPLE: Color = Color::Rgb(0x7D, 0x56, 0xF4);
const LIGHT: Color = Color::Rgb(0xFA, 0xFA, 0xFA);
const ITEM: Color = Color::Rgb(0xDD, 0xDD, 0xDD);
const MUTED: Color = Color::Rgb(0xAB, 0xAB, 0xAB);
const SOFT_RED: Color = Color::Rgb(0xFF, 0x55, 0x55);

/// Styles used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Title bar / header.
    pub title: Style,
    /// Focused row in the catalog.
    pub cursor: Style,
    /// Unfocused row in the catalog.
    pub item: Style,
    /// Informational text and key hints.
    pub info: Style,
    /// Quit hint.
    pub exit_hint: Style,
    /// Error block (inline notice and generation failure).
    pub error: Style,
    /// "Generating..." line.
    pub loading: Style,
    /// Important text (template names, headings).
    pub important: Style,
    /// De-emphasized metadata (sizes).
    pub dim: Style,
}

impl Theme {
    pub const fn colored() -> Self {
        Theme {
            title: Style::new().fg(LIGHT).bg(PURPLE).add_modifier(Modifier::BOLD),
            cursor: Style::new().fg(Color::White).bg(PURPLE).add_modifier(Modifier::BOLD),
            item: Style::new().fg(ITEM),
            info: Style::new().fg(MUTED).add_modifier(Modifier::ITALIC),
            exit_hint: Style::new().fg(SOFT_RED),
            error: Style::new().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD),
            loading: Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            important: Style::new().add_modifier(Modifier::BOLD),
            dim: Style::new().fg(Color::DarkGray),
        }
    }

    pub const fn plain() -> Self {
        Theme {
            title: Style::new().add_modifier(Modifier::BOLD),
            cursor: Style::new().add_modifier(Modifier::REVERSED),
            item: Style::new(),
            info: Style::new(),
            exit_hint: Style::new(),
            error: Style::new().add_modifier(Modifier::BOLD),
            loading: Style::new(),
            important: Style::new().add_modifier(Modifier::BOLD),
            dim: Style::new(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::colored()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_styles_have_expected_colors() {
        let theme = Theme::colored();
        assert_eq!(theme.title.bg, Some(PURPLE));
        assert_eq!(theme.cursor.bg, Some(PURPLE));
        assert_eq!(theme.error.bg, Some(Color::Red));
        assert_eq!(theme.loading.fg, Some(Color::Yellow));
        assert_eq!(theme.exit_hint.fg, Some(SOFT_RED));
    }

    #[test]
    fn plain_theme_has_no_colors() {
        let theme = Theme::plain();
        for style in [
            theme.title,
            theme.cursor,
            theme.item,
            theme.info,
            theme.exit_hint,
            theme.error,
            theme.loading,
            theme.important,
            theme.dim,
        ] {
            assert_eq!(style.fg, None);
            assert_eq!(style.bg, None);
        }
    }

    #[test]
    fn plain_cursor_is_reversed() {
        assert!(Theme::plain().cursor.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn default_is_colored() {
        assert_eq!(Theme::default(), Theme::colored());
    }
}

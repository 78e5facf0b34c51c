//! Pure rendering: map App state to ratatui widget trees.
//!
//! Each phase has a dedicated render function. The main `render()`
//! dispatches on the current Phase. Widget-building functions are pure
//! (state in, widgets out); the only effect is Frame::render_widget()
//! which writes to the terminal buffer.

use humansize::{BINARY, format_size};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::state::{App, Phase};
use super::theme::Theme;

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the current phase to the terminal frame.
pub fn render(app: &App, theme: &Theme, frame: &mut Frame) {
    let area = frame.area();

    // Common layout: title bar at top, content in middle, help at bottom
    let chunks = Layout::vertical([
        Constraint::Length(2), // title + spacer
        Constraint::Min(0),    // content
        Constraint::Length(2), // help + quit hint
    ])
    .split(area);

    frame.render_widget(render_title(app, theme), chunks[0]);
    frame.render_widget(render_help(app, theme), chunks[2]);

    let content_area = chunks[1];

    if app.is_empty() && !app.is_exiting() {
        render_empty(theme, frame, content_area);
        return;
    }

    match &app.phase {
        Phase::Browsing { notice } => {
            render_browsing(app, notice.as_deref(), theme, frame, content_area);
        }
        Phase::AwaitingResult { prompt_bytes, .. } => {
            render_awaiting(app, *prompt_bytes, theme, frame, content_area);
        }
        Phase::ShowingResult { result, scroll, .. } => {
            render_result(app, result, *scroll, theme, frame, content_area);
        }
        Phase::ShowingError { error, .. } => {
            render_error(app, error, theme, frame, content_area);
        }
        Phase::Exiting => {
            let bye = Paragraph::new(Span::styled("Exiting...", theme.info));
            frame.render_widget(bye, content_area);
        }
    }
}

// ============================================================================
// SHARED LAYOUT
// ============================================================================

fn render_title(app: &App, theme: &Theme) -> Paragraph<'static> {
    let title_text = match app.phase {
        Phase::Browsing { .. } | Phase::Exiting => "  Select a Template  ",
        Phase::AwaitingResult { .. } => "  Generating  ",
        Phase::ShowingResult { .. } => "  Generated  ",
        Phase::ShowingError { .. } => "  Generation Failed  ",
    };

    Paragraph::new(Line::from(Span::styled(title_text, theme.title)))
}

/// Key hints for the current phase, quit hint underneath.
fn render_help(app: &App, theme: &Theme) -> Paragraph<'static> {
    let help_text = match app.phase {
        Phase::Browsing { .. } if app.is_empty() => "",
        Phase::Browsing { .. } => "[↑/↓ j/k] move  [Enter] generate",
        Phase::AwaitingResult { .. } => "Waiting for the backend...",
        Phase::ShowingResult { .. } => "[↑/↓ j/k] scroll  [Esc/Backspace] back to templates",
        Phase::ShowingError { .. } => "[Esc/Backspace] back to templates",
        Phase::Exiting => "",
    };

    Paragraph::new(vec![
        Line::from(Span::styled(help_text, theme.info)),
        Line::from(Span::styled("[q/Ctrl+C] quit", theme.exit_hint)),
    ])
}

/// "Selected: <name>" header shared by the post-confirm phases.
fn selected_header<'a>(app: &'a App, theme: &Theme) -> Line<'a> {
    let name = app.selected().map(|t| t.name.as_str()).unwrap_or("?");
    Line::from(vec![
        Span::raw("Selected: "),
        Span::styled(name, theme.important),
    ])
}

// ============================================================================
// EMPTY CATALOG
// ============================================================================

fn render_empty(theme: &Theme, frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("No templates found", theme.info)),
        Line::from(""),
        Line::from(Span::styled(
            "Add a directory with a prompt.txt under the templates root.",
            theme.dim,
        )),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
}

// ============================================================================
// PHASE: BROWSING
// ============================================================================

fn render_browsing(app: &App, notice: Option<&str>, theme: &Theme, frame: &mut Frame, area: Rect) {
    let notice_height = if notice.is_some() { 3 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Min(0),                // list
        Constraint::Length(notice_height), // inline error
    ])
    .split(area);

    let lines: Vec<Line> = app
        .templates
        .iter()
        .enumerate()
        .map(|(i, template)| {
            if i == app.cursor {
                Line::from(Span::styled(format!("> {}", template.name), theme.cursor))
            } else {
                Line::from(Span::styled(format!("  {}", template.name), theme.item))
            }
        })
        .collect();

    // Scroll: keep the cursor row visible
    let visible_height = chunks[0].height as usize;
    let scroll_offset = if visible_height > 0 && app.cursor >= visible_height {
        app.cursor - visible_height + 1
    } else {
        0
    };

    let list = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    frame.render_widget(list, chunks[0]);

    if let Some(notice) = notice {
        let block = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(format!(" {} ", notice), theme.error)),
        ])
        .wrap(Wrap { trim: false });
        frame.render_widget(block, chunks[1]);
    }
}

// ============================================================================
// PHASE: AWAITING RESULT
// ============================================================================

fn render_awaiting(app: &App, prompt_bytes: usize, theme: &Theme, frame: &mut Frame, area: Rect) {
    let text = vec![
        selected_header(app, theme),
        Line::from(Span::styled(
            format!("Prompt: {}", format_size(prompt_bytes, BINARY)),
            theme.dim,
        )),
        Line::from(""),
        Line::from(Span::styled("Generating response from the backend...", theme.loading)),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
}

// ============================================================================
// PHASE: SHOWING RESULT
// ============================================================================

fn render_result(app: &App, result: &str, scroll: u16, theme: &Theme, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // selection + response header
        Constraint::Min(0),    // response body
    ])
    .split(area);

    let header = vec![
        selected_header(app, theme),
        Line::from(""),
        Line::from(vec![
            Span::styled("Response", theme.important),
            Span::styled(format!(" ({})", format_size(result.len(), BINARY)), theme.dim),
            Span::raw(":"),
        ]),
        Line::from(""),
    ];
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // One row per response line so the scroll offset maps to a line index
    let body: Vec<Line> = result.lines().map(Line::from).collect();
    frame.render_widget(Paragraph::new(body).scroll((scroll, 0)), chunks[1]);
}

// ============================================================================
// PHASE: SHOWING ERROR
// ============================================================================

fn render_error(app: &App, error: &str, theme: &Theme, frame: &mut Frame, area: Rect) {
    let text = vec![
        selected_header(app, theme),
        Line::from(""),
        Line::from(Span::styled(format!(" {} ", error), theme.error)),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), area);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;
    use crate::types::{GenerationOutcome, Template};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 20);
        Terminal::new(backend).unwrap()
    }

    fn app() -> App {
        App::new(vec![Template::new("api-client"), Template::new("crud-service")])
    }

    fn draw(app: &App) -> String {
        let mut terminal = make_terminal();
        terminal
            .draw(|frame| render(app, &Theme::default(), frame))
            .expect("render should not panic");
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol().to_string()).collect()
    }

    #[test]
    fn empty_catalog_renders_placeholder() {
        let content = draw(&App::new(Vec::new()));
        assert!(content.contains("No templates found"));
        assert!(content.contains("quit"));
    }

    #[test]
    fn browsing_marks_cursor_row() {
        let mut app = app();
        app.cursor = 1;
        let content = draw(&app);
        assert!(content.contains("  api-client"));
        assert!(content.contains("> crud-service"));
        assert!(content.contains("Select a Template"));
    }

    #[test]
    fn browsing_shows_inline_notice() {
        let mut app = app();
        app.phase = Phase::Browsing {
            notice: Some("prompt.txt does not exist".into()),
        };
        let content = draw(&app);
        assert!(content.contains("prompt.txt does not exist"));
        assert!(content.contains("> api-client"));
    }

    #[test]
    fn awaiting_shows_selection_and_loading() {
        let mut app = app();
        app.phase = Phase::AwaitingResult {
            selected: 1,
            prompt_bytes: 2048,
        };
        let content = draw(&app);
        assert!(content.contains("Selected: crud-service"));
        assert!(content.contains("Generating response"));
        assert!(content.contains("2 KiB"));
    }

    #[test]
    fn result_shows_text() {
        let mut app = app();
        app.phase = Phase::ShowingResult {
            selected: 0,
            result: "fn main() {}\nworld".into(),
            scroll: 0,
        };
        let content = draw(&app);
        assert!(content.contains("Selected: api-client"));
        assert!(content.contains("Response"));
        assert!(content.contains("world"));
        assert!(content.contains("back to templates"));
    }

    #[test]
    fn error_shows_reason() {
        let mut app = app();
        app.phase = Phase::ShowingError {
            selected: 0,
            error: "rate limited".into(),
        };
        let content = draw(&app);
        assert!(content.contains("Generation Failed"));
        assert!(content.contains("rate limited"));
    }

    #[test]
    fn result_scroll_reveals_tail() {
        let result: String = (0..60).map(|i| format!("line-{:02}\n", i)).collect();
        let mut app = app();
        app.phase = Phase::ShowingResult {
            selected: 0,
            result: result.clone(),
            scroll: 0,
        };
        let top = draw(&app);
        assert!(top.contains("line-00"));
        assert!(!top.contains("line-59"));

        app.phase = Phase::ShowingResult {
            selected: 0,
            result,
            scroll: 50,
        };
        let bottom = draw(&app);
        assert!(bottom.contains("line-59"));
        assert!(!bottom.contains("line-00"));
        assert!(bottom.contains("Response"));
    }

    #[test]
    fn error_renders_reason_without_extra_prefix() {
        let outcome = GenerationOutcome::from(Err::<String, _>(GatewayError::Api {
            status: 429,
            message: "quota exhausted".into(),
        }));
        let GenerationOutcome::Failure(error) = outcome else {
            panic!("expected failure");
        };
        let mut app = app();
        app.phase = Phase::ShowingError { selected: 0, error };
        let content = draw(&app);
        assert!(content.contains("quota exhausted"));
        assert!(!content.contains("API error: API error"));
    }

    #[test]
    fn every_phase_renders_distinctly() {
        let mut phases = vec![App::new(Vec::new())];
        for phase in [
            Phase::Browsing { notice: None },
            Phase::AwaitingResult {
                selected: 0,
                prompt_bytes: 5,
            },
            Phase::ShowingResult {
                selected: 0,
                result: "world".into(),
                scroll: 0,
            },
            Phase::ShowingError {
                selected: 0,
                error: "boom".into(),
            },
        ] {
            let mut app = app();
            app.phase = phase;
            phases.push(app);
        }

        let rendered: Vec<String> = phases.iter().map(draw).collect();
        for (i, a) in rendered.iter().enumerate() {
            for b in rendered.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn long_catalog_scrolls_to_cursor() {
        let mut app = App::new((0..50).map(|i| Template::new(format!("template-{:02}", i))).collect());
        app.cursor = 42;
        let content = draw(&app);
        assert!(content.contains("> template-42"));
        assert!(!content.contains("template-00"));
    }

    #[test]
    fn plain_theme_renders() {
        let mut terminal = make_terminal();
        terminal
            .draw(|frame| render(&app(), &Theme::plain(), frame))
            .expect("render should not panic");
    }
}

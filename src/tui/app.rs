//! TUI application state management.

use compilerd::{
    editor::EditorBuffer,
    language::Language,
    runner::ExecutionOutcome,
    scroll::{ScrollCoordinator, ScrollTarget},
    session::{Generation, Phase, Session, Settled, Submission},
};

/// Which pane receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Script,
    Stdin,
    Output,
}

/// Popup display state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    /// No popup shown
    None,
    /// Raw runner response / diagnostic line
    Response,
}

/// Scroll state of the result region.
#[derive(Debug, Default)]
pub struct OutputPane {
    /// Lines scrolled past the "Output:" heading
    pub scroll: u16,
    /// Set when the pane was brought into view since the last key press
    pub revealed: bool,
}

impl ScrollTarget for OutputPane {
    fn scroll_into_view(&mut self) {
        self.scroll = 0;
        self.revealed = true;
    }
}

/// Application state for the TUI
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub script: EditorBuffer,
    pub stdin: EditorBuffer,
    pub focus: Focus,
    pub output: OutputPane,
    pub popup_state: PopupState,
    pub show_help: bool,
    pub status_message: String,
    /// Runner endpoint shown in the header
    pub endpoint: String,
    scroll: ScrollCoordinator,
}

impl App {
    pub fn new(session: Session, endpoint: String) -> Self {
        let script = EditorBuffer::from_text(session.script());
        let stdin = EditorBuffer::from_text(session.stdin());
        let mut app = Self {
            session,
            script,
            stdin,
            focus: Focus::Script,
            output: OutputPane::default(),
            popup_state: PopupState::None,
            show_help: false,
            status_message: String::new(),
            endpoint,
            scroll: ScrollCoordinator::new(),
        };
        app.update_status_message();
        app
    }

    pub fn language(&self) -> Language {
        self.session.language()
    }

    pub fn has_output(&self) -> bool {
        !self.session.display_output().is_empty()
    }

    /// Apply an edit to the focused editor and propagate changed text to the session.
    pub fn edit(&mut self, f: impl FnOnce(&mut EditorBuffer) -> bool) {
        match self.focus {
            Focus::Script => {
                if f(&mut self.script) {
                    self.session.set_script(self.script.text());
                }
            }
            Focus::Stdin => {
                if f(&mut self.stdin) {
                    self.session.set_stdin(self.stdin.text());
                }
            }
            Focus::Output => {}
        }
    }

    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Script => Focus::Stdin,
            Focus::Stdin if self.has_output() => Focus::Output,
            Focus::Stdin | Focus::Output => Focus::Script,
        };
    }

    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Script if self.has_output() => Focus::Output,
            Focus::Script | Focus::Output => Focus::Stdin,
            Focus::Stdin => Focus::Script,
        };
    }

    pub fn next_language(&mut self) {
        let next = self.language().next();
        self.session.set_language(next);
        self.update_status_message();
    }

    pub fn prev_language(&mut self) {
        let prev = self.language().prev();
        self.session.set_language(prev);
        self.update_status_message();
    }

    /// Toggle help display
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_response(&mut self) {
        self.popup_state = match self.popup_state {
            PopupState::None => PopupState::Response,
            PopupState::Response => PopupState::None,
        };
    }

    /// Hide any popup
    pub fn hide_popup(&mut self) {
        self.popup_state = PopupState::None;
        self.show_help = false;
    }

    /// Check if any popup is shown
    pub fn is_popup_shown(&self) -> bool {
        self.show_help || self.popup_state != PopupState::None
    }

    pub fn scroll_output_up(&mut self, lines: u16) {
        self.output.scroll = self.output.scroll.saturating_sub(lines);
    }

    pub fn scroll_output_down(&mut self, lines: u16) {
        let max = u16::try_from(self.session.display_output().lines().count()).unwrap_or(u16::MAX);
        self.output.scroll = self.output.scroll.saturating_add(lines).min(max);
    }

    /// Compose and register a submission; the caller dispatches it.
    pub fn submit(&mut self) -> Submission {
        let submission = self.session.begin_submission();
        self.update_status_message();
        submission
    }

    pub fn settle(&mut self, generation: Generation, outcome: ExecutionOutcome) {
        if self.session.settle(generation, outcome) == Settled::Dropped {
            tracing::debug!(generation = generation.get(), "result ignored, newer one already shown");
        }
        if !self.has_output() && self.focus == Focus::Output {
            self.focus = Focus::Script;
        }
        self.update_status_message();
    }

    /// Must run after each draw so the scroll targets committed layout.
    /// Returns true when the view moved and needs another frame.
    pub fn after_draw(&mut self) -> bool {
        if self.scroll.observe(&self.session, &mut self.output) {
            self.focus = Focus::Output;
            return true;
        }
        false
    }

    /// Diagnostic line shown in the status bar for transport failures
    pub fn diagnostic_line(&self) -> Option<&str> {
        match self.session.last_outcome() {
            Some(ExecutionOutcome::TransportFailure { .. }) => {
                Some(self.session.presentation().raw_diagnostic.as_str())
            }
            _ => None,
        }
    }

    fn update_status_message(&mut self) {
        let phase = match self.session.phase() {
            Phase::Idle => "Ready".to_string(),
            Phase::Submitting => format!("Submitting ({} in flight)", self.session.in_flight()),
            Phase::SuccessRendered => "Finished".to_string(),
            Phase::FailureRendered => "Failed".to_string(),
        };
        self.status_message = format!(
            "{} | {} | F5 execute, Tab focus, Ctrl+L language, F2 response, F1 help",
            phase,
            self.language().label()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compilerd::present::EXECUTION_FAILED_MESSAGE;

    fn app() -> App {
        App::new(Session::new(Language::Python), "http://localhost:3000/api/execute/".into())
    }

    #[test]
    fn test_edits_reach_session() {
        let mut app = app();
        for c in "print(1+1)".chars() {
            app.edit(|b| b.insert_char(c));
        }
        app.focus = Focus::Stdin;
        app.edit(|b| b.insert_str("7\n"));
        assert_eq!(app.session.script(), "print(1+1)");
        assert_eq!(app.session.stdin(), "7\n");
    }

    #[test]
    fn test_output_focus_ignores_edits() {
        let mut app = app();
        app.focus = Focus::Output;
        app.edit(|b| b.insert_char('x'));
        assert_eq!(app.session.script(), "");
        assert_eq!(app.session.stdin(), "");
    }

    #[test]
    fn test_result_scrolls_into_view_once() {
        let mut app = app();
        let sub = app.submit();
        assert!(app.status_message.starts_with("Submitting"));
        app.output.scroll = 4;

        app.settle(
            sub.generation,
            ExecutionOutcome::Success {
                output: "2\n".into(),
                execute_time: None,
                memory: None,
            },
        );
        assert!(app.after_draw());
        assert_eq!(app.focus, Focus::Output);
        assert_eq!(app.output.scroll, 0);
        assert!(app.output.revealed);

        app.focus = Focus::Script;
        assert!(!app.after_draw());
        assert_eq!(app.focus, Focus::Script);
    }

    #[test]
    fn test_transport_failure_shows_diagnostic_line() {
        let mut app = app();
        let sub = app.submit();
        app.settle(
            sub.generation,
            ExecutionOutcome::TransportFailure {
                message: "Network Error".into(),
            },
        );
        assert!(!app.after_draw());
        assert!(!app.has_output());
        assert_eq!(app.diagnostic_line(), Some("Error: Network Error"));
    }

    #[test]
    fn test_execution_failure_shows_fixed_message() {
        let mut app = app();
        let sub = app.submit();
        app.settle(
            sub.generation,
            ExecutionOutcome::ExecutionFailure {
                error_code: 1,
                raw_payload: serde_json::json!({"error": 1, "output": "boom"}),
                execute_time: None,
                memory: None,
            },
        );
        assert_eq!(app.session.display_output(), EXECUTION_FAILED_MESSAGE);
        assert!(app.status_message.starts_with("Failed"));
        assert_eq!(app.diagnostic_line(), None);
    }

    #[test]
    fn test_scroll_limit_on_huge_output() {
        let mut app = app();
        let sub = app.submit();
        app.settle(
            sub.generation,
            ExecutionOutcome::Success {
                output: "x\n".repeat(70_000),
                execute_time: None,
                memory: None,
            },
        );
        app.scroll_output_down(u16::MAX);
        assert_eq!(app.output.scroll, u16::MAX);
        app.scroll_output_up(10);
        assert_eq!(app.output.scroll, u16::MAX - 10);
    }

    #[test]
    fn test_focus_cycle_skips_hidden_output() {
        let mut app = app();
        app.next_focus();
        assert_eq!(app.focus, Focus::Stdin);
        app.next_focus();
        assert_eq!(app.focus, Focus::Script);
        app.prev_focus();
        assert_eq!(app.focus, Focus::Stdin);
    }

    #[test]
    fn test_language_cycling_updates_session() {
        let mut app = app();
        app.next_language();
        assert_eq!(app.language(), Language::Java);
        assert!(app.status_message.contains("Java"));
        app.prev_language();
        app.prev_language();
        assert_eq!(app.language(), Language::Cpp);
    }
}

//! Custom event types for the TUI application.

use compilerd::{runner::ExecutionOutcome, session::Generation};
use crossterm::event::KeyEvent;

/// Events that can occur in the TUI application
#[derive(Debug)]
pub enum TuiEvent {
    /// User keyboard input
    Key(KeyEvent),
    /// Bracketed paste content
    Paste(String),
    /// Terminal was resized; only a redraw is needed
    Resize,
    /// A submission settled
    Submitted {
        generation: Generation,
        outcome: ExecutionOutcome,
    },
}

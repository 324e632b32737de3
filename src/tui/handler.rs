//! Async event handler for the TUI.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Result;
use compilerd::{runner::RunnerClient, session::Session};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::{
    app::{App, Focus},
    events::TuiEvent,
    ui::render_ui,
};

/// Run the interactive editor until the user quits.
pub async fn run_tui(session: Session, client: RunnerClient) -> Result<()> {
    // Check if we're in a proper terminal environment
    if !io::IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!("TUI mode requires a proper terminal environment"));
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, client.execute_url().to_string());
    info!(endpoint = %app.endpoint, language = %app.language(), "tui started");

    let result = run_app(&mut terminal, &mut app, client).await;

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableBracketedPaste)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Main application loop
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: RunnerClient,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<TuiEvent>();

    // Spawn input handler
    let stop = Arc::new(AtomicBool::new(false));
    let input_tx = event_tx.clone();
    let input_stop = stop.clone();
    let input_task = tokio::task::spawn_blocking(move || {
        while !input_stop.load(Ordering::Relaxed) {
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let ev = match event::read() {
                Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => TuiEvent::Key(key),
                Ok(Event::Paste(text)) => TuiEvent::Paste(text),
                Ok(Event::Resize(_, _)) => TuiEvent::Resize,
                _ => continue,
            };
            if input_tx.send(ev).is_err() {
                break; // Channel closed
            }
        }
    });

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| render_ui(frame, app)) {
            break Err(e.into());
        }
        // The result region is only in the layout once drawn; scroll after that.
        if app.after_draw() {
            continue;
        }

        let Some(tui_event) = event_rx.recv().await else {
            break Ok(());
        };
        match tui_event {
            TuiEvent::Key(key) => {
                if handle_key_event(app, key, &client, &event_tx) {
                    break Ok(()); // Quit requested
                }
            }
            TuiEvent::Paste(text) => app.edit(|buf| buf.insert_str(&text)),
            TuiEvent::Resize => {}
            TuiEvent::Submitted { generation, outcome } => {
                app.settle(generation, outcome);
            }
        }
    };

    stop.store(true, Ordering::Relaxed);
    let _ = input_task.await;
    result
}

/// Compose, then dispatch on a background task. Overlapping submissions are
/// not prevented; each settles independently.
fn dispatch_submission(app: &mut App, client: &RunnerClient, event_tx: &mpsc::UnboundedSender<TuiEvent>) {
    let submission = app.submit();
    let client = client.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let outcome = client.submit(&submission.request).await;
        let _ = tx.send(TuiEvent::Submitted {
            generation: submission.generation,
            outcome,
        });
    });
}

/// Handle keyboard events. Returns true when the user asked to quit.
fn handle_key_event(
    app: &mut App,
    key: KeyEvent,
    client: &RunnerClient,
    event_tx: &mpsc::UnboundedSender<TuiEvent>,
) -> bool {
    app.output.revealed = false;

    // If any popup is shown, any key closes it
    if app.is_popup_shown() {
        app.hide_popup();
        return false;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => return true,
        KeyCode::Char('r') if ctrl => dispatch_submission(app, client, event_tx),
        KeyCode::F(5) => dispatch_submission(app, client, event_tx),
        KeyCode::Char('l') if ctrl => app.next_language(),
        KeyCode::Char('k') if ctrl => app.prev_language(),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::F(2) => app.toggle_response(),
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.prev_focus(),
        KeyCode::PageUp => app.scroll_output_up(10),
        KeyCode::PageDown => app.scroll_output_down(10),
        KeyCode::Esc => app.focus = Focus::Script,
        _ if app.focus == Focus::Output => match key.code {
            KeyCode::Up => app.scroll_output_up(1),
            KeyCode::Down => app.scroll_output_down(1),
            _ => {}
        },
        KeyCode::Enter => app.edit(|buf| buf.newline()),
        KeyCode::Backspace => app.edit(|buf| buf.backspace()),
        KeyCode::Delete => app.edit(|buf| buf.delete()),
        KeyCode::Left => app.edit(|buf| {
            buf.move_left();
            false
        }),
        KeyCode::Right => app.edit(|buf| {
            buf.move_right();
            false
        }),
        KeyCode::Up => app.edit(|buf| {
            buf.move_up();
            false
        }),
        KeyCode::Down => app.edit(|buf| {
            buf.move_down();
            false
        }),
        KeyCode::Home => app.edit(|buf| {
            buf.move_home();
            false
        }),
        KeyCode::End => app.edit(|buf| {
            buf.move_end();
            false
        }),
        KeyCode::Char(c) if !ctrl => app.edit(|buf| buf.insert_char(c)),
        other => debug!(key = ?other, "unbound key"),
    }

    false
}

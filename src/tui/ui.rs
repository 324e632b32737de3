//! UI layout and rendering logic for the TUI.

use compilerd::{editor::EditorBuffer, language::Language, session::Phase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Focus, PopupState};

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Length(1), // Language selector
        Constraint::Min(8),    // Editor + stdin
    ];
    if app.has_output() {
        constraints.push(Constraint::Percentage(40)); // Result region
    }
    constraints.push(Constraint::Length(1)); // Status bar

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_header(frame, app, main_layout[0]);
    render_language_selector(frame, app, main_layout[1]);
    render_workspace(frame, app, main_layout[2]);
    if app.has_output() {
        render_results(frame, app, main_layout[3]);
    }
    render_status_bar(frame, app, main_layout[main_layout.len() - 1]);

    if app.show_help {
        render_help_overlay(frame);
    } else if app.popup_state == PopupState::Response {
        render_response_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "CompilerD",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.endpoint.as_str(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_language_selector(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw("Language: ")];
    for lang in Language::ALL {
        let style = if lang == app.language() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", lang.label()), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

/// Script editor on the left, stdin and the execute button on the right.
fn render_workspace(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(columns[1]);

    let script_title = format!("Script ({})", app.language().mode());
    render_editor(
        frame,
        &app.script,
        &script_title,
        "Enter your code here",
        app.focus == Focus::Script && !app.is_popup_shown(),
        columns[0],
    );
    render_editor(
        frame,
        &app.stdin,
        "Standard Input (stdin)",
        "",
        app.focus == Focus::Stdin && !app.is_popup_shown(),
        right[0],
    );
    render_execute_button(frame, app, right[1]);
}

fn render_editor(
    frame: &mut Frame,
    buffer: &EditorBuffer,
    title: &str,
    placeholder: &str,
    focused: bool,
    area: Rect,
) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let (row, _) = buffer.cursor();
    // Keep the cursor row visible
    let offset = if inner_height > 0 && row >= inner_height {
        row + 1 - inner_height
    } else {
        0
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(focus_style(focused));

    let paragraph = if buffer.is_empty() && !placeholder.is_empty() {
        Paragraph::new(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let lines: Vec<Line> = buffer
            .lines()
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        Paragraph::new(Text::from(lines)).scroll((offset as u16, 0))
    };
    frame.render_widget(paragraph.block(block), area);

    if focused {
        frame.set_cursor_position(cursor_cell(area, buffer.cursor_display_col(), row - offset));
    }
}

/// Terminal cell for a cursor inside a bordered `area`, clamped to its inner edge.
fn cursor_cell(area: Rect, col: usize, row: usize) -> (u16, u16) {
    let clamp = |v: usize, extent: u16| {
        u16::try_from(v.min(extent.saturating_sub(3) as usize)).unwrap_or(u16::MAX)
    };
    (
        area.x.saturating_add(1).saturating_add(clamp(col, area.width)),
        area.y.saturating_add(1).saturating_add(clamp(row, area.height)),
    )
}

fn render_execute_button(frame: &mut Frame, app: &App, area: Rect) {
    let (label, color) = match app.session.phase() {
        Phase::Submitting => ("Executing...", Color::Yellow),
        _ => ("Execute (F5)", Color::Green),
    };
    let button = Paragraph::new(Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(ratatui::layout::Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, area);
}

/// Stdin echo, output and runtime/memory figures.
fn render_results(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let stdin_echo = Paragraph::new(app.session.stdin().to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Standard Input (stdin):"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(stdin_echo, columns[0]);

    let heading_style = if app.output.revealed || app.focus == Focus::Output {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let output = Paragraph::new(app.session.display_output().to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Output:")
                .title_style(heading_style)
                .border_style(focus_style(app.focus == Focus::Output)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.output.scroll, 0));
    frame.render_widget(output, columns[1]);

    let figures = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let p = app.session.presentation();
    let runtime = Paragraph::new(format!("{} ms", p.execute_time))
        .block(Block::default().borders(Borders::ALL).title("Runtime"));
    let memory = Paragraph::new(format!("{} kb", p.memory))
        .block(Block::default().borders(Borders::ALL).title("Memory Usage"));
    frame.render_widget(runtime, figures[0]);
    frame.render_widget(memory, figures[1]);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let paragraph = match app.diagnostic_line() {
        Some(diag) => Paragraph::new(format!("{} | F2 details", diag))
            .style(Style::default().bg(Color::Red).fg(Color::White)),
        None => Paragraph::new(app.status_message.as_str())
            .style(Style::default().bg(Color::DarkGray).fg(Color::White)),
    };
    frame.render_widget(paragraph, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(70, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from("Keys"),
        Line::from(""),
        Line::from("  F5 / Ctrl+R      - Execute script"),
        Line::from("  Tab / Shift+Tab  - Move focus (script, stdin, output)"),
        Line::from("  Ctrl+L / Ctrl+K  - Next / previous language"),
        Line::from("  F2               - Show raw runner response"),
        Line::from("  PgUp / PgDn      - Scroll output"),
        Line::from("  Esc              - Back to the script editor"),
        Line::from("  F1               - Toggle this help"),
        Line::from("  Ctrl+C           - Quit"),
    ];

    let help_paragraph = Paragraph::new(Text::from(help_lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .title_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(help_paragraph, popup_area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Render the raw response popup
fn render_response_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(85, 75, frame.area());
    frame.render_widget(Clear, popup_area);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(popup_area);

    let raw = &app.session.presentation().raw_diagnostic;
    let body = if raw.is_empty() {
        "Nothing executed yet"
    } else {
        raw.as_str()
    };
    let title = match app.session.shown_generation() {
        Some(g) => format!("Response {}", g),
        None => "Response".to_string(),
    };

    let response_paragraph = Paragraph::new(body.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(response_paragraph, popup_layout[0]);

    let instructions = Paragraph::new("Press any key to close")
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(instructions, popup_layout[1]);
}

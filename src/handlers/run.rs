//! One-shot handler: submit the session once and print the result.

use anyhow::Result;
use compilerd::{
    runner::{ExecutionOutcome, RunnerClient},
    session::Session,
};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

use crate::printer::SectionPrinter;

/// Returns whether the runner reported success.
pub async fn run(mut session: Session, client: &RunnerClient, show_raw: bool) -> Result<bool> {
    let submission = session.begin_submission();
    let outcome = client.submit(&submission.request).await;
    session.settle(submission.generation, outcome);

    let printer = SectionPrinter {
        colored: std::io::stdout().is_terminal(),
    };
    let p = session.presentation();

    if !p.display_output.is_empty() {
        if !session.stdin().is_empty() {
            printer.section("Standard Input (stdin):", session.stdin(), None);
        }
        let color = match session.last_outcome() {
            Some(ExecutionOutcome::Success { .. }) => None,
            _ => Some("red"),
        };
        printer.section("Output:", &p.display_output, color);
        printer.section("Runtime", &format!("{} ms", p.execute_time), Some("cyan"));
        printer.section("Memory Usage", &format!("{} kb", p.memory), Some("cyan"));
    }

    if show_raw {
        printer.section("Response:", &p.raw_diagnostic, Some("yellow"));
    } else if let Some(ExecutionOutcome::TransportFailure { .. }) = session.last_outcome() {
        if std::io::stderr().is_terminal() {
            eprintln!("{}", p.raw_diagnostic.red());
        } else {
            eprintln!("{}", p.raw_diagnostic);
        }
    }

    Ok(session.last_outcome().is_some_and(ExecutionOutcome::is_success))
}

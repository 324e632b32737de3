//! Builds the execute request from the current session.

use crate::language::wire_id_for;
use crate::runner::ExecutionRequest;
use crate::session::Session;

/// Pure snapshot of the session into a request. Empty scripts are passed
/// through; an empty stdin is left out of the request entirely.
pub fn compose(session: &Session) -> ExecutionRequest {
    let stdin = if session.stdin().is_empty() {
        None
    } else {
        Some(session.stdin().to_string())
    };
    ExecutionRequest::new(wire_id_for(session.language()), session.script(), stdin)
}

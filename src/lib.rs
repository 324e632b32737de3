//! Client core for a remote multi-language code runner.
//!
//! Flow of one submission: [`session::Session::begin_submission`] composes an
//! [`runner::ExecutionRequest`], [`runner::RunnerClient::submit`] resolves it to
//! an [`runner::ExecutionOutcome`], [`session::Session::settle`] derives the
//! [`present::Presentation`], and [`scroll::ScrollCoordinator`] fires once the
//! new output has been drawn.

pub mod compose;
pub mod config;
pub mod editor;
pub mod language;
pub mod logging;
pub mod present;
pub mod runner;
pub mod scroll;
pub mod session;

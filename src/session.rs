//! Single-owner session state and the submission generation counter.

use std::{fmt, str::FromStr};

use tracing::{debug, info};

use crate::compose::compose;
use crate::language::Language;
use crate::present::{present, Presentation};
use crate::runner::{ExecutionOutcome, ExecutionRequest};

/// Monotonic id assigned to each submission when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What to do when submissions settle out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettlePolicy {
    /// Whatever settles last is shown, even if it was issued first.
    #[default]
    LastSettledWins,
    /// Settlements older than the one currently shown are dropped.
    RejectStale,
}

impl FromStr for SettlePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-settled-wins" | "last_settled_wins" => Ok(SettlePolicy::LastSettledWins),
            "reject-stale" | "reject_stale" => Ok(SettlePolicy::RejectStale),
            other => anyhow::bail!("unknown settle policy `{}`", other),
        }
    }
}

/// Where the submission state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    SuccessRendered,
    FailureRendered,
}

/// A composed request ready to dispatch.
#[derive(Debug, Clone)]
pub struct Submission {
    pub generation: Generation,
    pub request: ExecutionRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Dropped,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    language: Language,
    script: String,
    stdin: String,
    last_outcome: Option<ExecutionOutcome>,
    presentation: Presentation,
    policy: SettlePolicy,
    issued: u64,
    shown: Option<Generation>,
    in_flight: usize,
    revision: u64,
}

impl Session {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: SettlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn set_script(&mut self, script: impl Into<String>) {
        self.script = script.into();
    }

    pub fn set_stdin(&mut self, stdin: impl Into<String>) {
        self.stdin = stdin.into();
    }

    pub fn last_outcome(&self) -> Option<&ExecutionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn display_output(&self) -> &str {
        &self.presentation.display_output
    }

    /// Bumped every time the presentation is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Generation of the outcome currently shown, if any.
    pub fn shown_generation(&self) -> Option<Generation> {
        self.shown
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight > 0 {
            return Phase::Submitting;
        }
        match &self.last_outcome {
            None => Phase::Idle,
            Some(outcome) if outcome.is_success() => Phase::SuccessRendered,
            Some(_) => Phase::FailureRendered,
        }
    }

    /// Compose a request from the current state and assign it the next
    /// generation. Does not guard against submissions already in flight.
    pub fn begin_submission(&mut self) -> Submission {
        let request = compose(self);
        self.issued += 1;
        self.in_flight += 1;
        let generation = Generation(self.issued);
        info!(
            generation = generation.get(),
            language = request.language(),
            in_flight = self.in_flight,
            "submission issued"
        );
        Submission { generation, request }
    }

    /// Record a settled submission. The outcome and its presentation are
    /// replaced together.
    pub fn settle(&mut self, generation: Generation, outcome: ExecutionOutcome) -> Settled {
        self.in_flight = self.in_flight.saturating_sub(1);

        let stale = self.shown.is_some_and(|shown| generation < shown);
        if stale {
            match self.policy {
                SettlePolicy::RejectStale => {
                    debug!(generation = generation.get(), "dropping stale settlement");
                    return Settled::Dropped;
                }
                SettlePolicy::LastSettledWins => {
                    debug!(
                        generation = generation.get(),
                        "stale settlement overwrites newer result"
                    );
                }
            }
        }

        info!(
            generation = generation.get(),
            outcome = outcome.kind(),
            "submission settled"
        );
        self.presentation = present(&outcome);
        self.last_outcome = Some(outcome);
        self.shown = Some(generation);
        self.revision += 1;
        Settled::Applied
    }
}

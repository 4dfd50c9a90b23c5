//! The generation state machine.
//!
//! ```text
//!            request (niche set)
//!   ┌──────┐ ───────────────────► ┌────────────┐   ok    ┌─────────┐
//!   │ Idle │                      │ Generating ├────────►│ Success │
//!   └──────┘      ┌──────────────►└─────┬──────┘         └────┬────┘
//!                 │   request           │ err                 │
//!                 │                ┌────▼────┐                │
//!                 └────────────────┤  Error  │◄───────────────┘ (via Generating)
//!                                  └─────────┘
//! ```
//!
//! While `Generating`, further requests are ignored: at most one request is in
//! flight. A settled state is never rewritten to `Idle`.

use crate::error::GenerationError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error(String),
}

impl GenerationStatus {
    /// Validates whether a transition to the new status is allowed
    pub fn can_transition_to(&self, new_status: &GenerationStatus) -> bool {
        use GenerationStatus::*;
        match (self, new_status) {
            (Idle | Success | Error(_), Generating) => true,
            (Generating, Success | Error(_)) => true,
            _ => false,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, GenerationStatus::Generating)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            GenerationStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenerationStatus::Idle => "Idle",
            GenerationStatus::Generating => "Generating",
            GenerationStatus::Success => "Success",
            GenerationStatus::Error(_) => "Error",
        }
    }
}

/// What happened to a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Started,
    IgnoredEmptyNiche,
    IgnoredInFlight,
}

/// What happened when a generator result arrived.
#[derive(Debug, PartialEq)]
pub enum SettleOutcome<T> {
    Succeeded(T),
    Failed,
    /// Nothing was in flight; the result is dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct GenerationMachine {
    status: GenerationStatus,
}

impl GenerationMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    /// Tries to enter `Generating`. Returns the previous status alongside the
    /// outcome so callers can announce the change.
    pub fn begin(&mut self, niche: &str) -> (RequestOutcome, Option<GenerationStatus>) {
        if self.status.is_generating() {
            return (RequestOutcome::IgnoredInFlight, None);
        }
        if niche.trim().is_empty() {
            return (RequestOutcome::IgnoredEmptyNiche, None);
        }
        let old = self.transition(GenerationStatus::Generating);
        (RequestOutcome::Started, old)
    }

    /// Applies a generator result. Failures record a non-empty message.
    pub fn settle<T>(&mut self, result: Result<T, GenerationError>) -> SettleOutcome<T> {
        if !self.status.is_generating() {
            return SettleOutcome::Stale;
        }
        match result {
            Ok(value) => {
                self.transition(GenerationStatus::Success);
                SettleOutcome::Succeeded(value)
            }
            Err(err) => {
                self.transition(GenerationStatus::Error(err.user_message().to_owned()));
                SettleOutcome::Failed
            }
        }
    }

    fn transition(&mut self, new_status: GenerationStatus) -> Option<GenerationStatus> {
        if !self.status.can_transition_to(&new_status) {
            log::warn!(
                "Rejected generation transition {} -> {}",
                self.status.name(),
                new_status.name()
            );
            return None;
        }
        Some(std::mem::replace(&mut self.status, new_status))
    }
}

//! Application shell: input text, loading flag, and the last result.
//!
//! `Idle -> Submitting -> Settled(Success | Failure)`; a new submission from
//! `Settled` clears the previous result first. Only one submission can be in
//! flight.

use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use crate::client::SummaryClient;
use crate::error::{Result, SmartCvError};
use crate::normalize::SummarizationResult;
use crate::render::{RenderBlock, render};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    Submitting { request_id: Uuid },
    Settled(Outcome),
}

/// A finished submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub request_id: Uuid,
    pub result: SummarizationResult,
    pub submitted_at: DateTime<Utc>,
    pub settled_at: DateTime<Utc>,
}

impl Outcome {
    pub fn elapsed(&self) -> chrono::Duration {
        self.settled_at - self.submitted_at
    }
}

/// Issued by `begin`, consumed by `settle`
#[derive(Debug)]
pub struct Submission {
    request_id: Uuid,
    text: String,
    submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

pub struct Shell {
    client: SummaryClient,
    input: String,
    state: ShellState,
}

impl Shell {
    pub fn new(client: SummaryClient) -> Self {
        Self {
            client,
            input: String::new(),
            state: ShellState::Idle,
        }
    }

    pub fn client(&self) -> &SummaryClient {
        &self.client
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ShellState::Submitting { .. })
    }

    /// Submission and editing are disabled while a request is pending
    pub fn can_submit(&self) -> bool {
        !self.is_loading()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns false when the input is locked by a pending request
    pub fn set_input(&mut self, text: impl Into<String>) -> bool {
        if self.is_loading() {
            return false;
        }
        self.input = text.into();
        true
    }

    pub fn result(&self) -> Option<&SummarizationResult> {
        match &self.state {
            ShellState::Settled(outcome) => Some(&outcome.result),
            _ => None,
        }
    }

    /// Display blocks for a successful summary; empty otherwise
    pub fn blocks(&self) -> Vec<RenderBlock> {
        self.result()
            .and_then(SummarizationResult::text)
            .map(render)
            .unwrap_or_default()
    }

    /// Validates the current input and moves to `Submitting`.
    /// Rejections leave the state untouched.
    pub fn begin(&mut self) -> Result<Submission> {
        if self.is_loading() {
            return Err(SmartCvError::Busy);
        }
        if self.input.trim().is_empty() {
            return Err(SmartCvError::empty_input());
        }

        let submission = Submission {
            request_id: Uuid::new_v4(),
            text: self.input.clone(),
            submitted_at: Utc::now(),
        };
        self.state = ShellState::Submitting {
            request_id: submission.request_id,
        };
        Ok(submission)
    }

    pub fn settle(&mut self, submission: Submission, result: Result<String>) -> Outcome {
        if let Err(e) = &result {
            tracing::error!(request_id = %submission.request_id, "Summarization failed: {}", e);
        } else {
            tracing::info!(request_id = %submission.request_id, "Summarization succeeded");
        }

        let outcome = Outcome {
            request_id: submission.request_id,
            result: result.into(),
            submitted_at: submission.submitted_at,
            settled_at: Utc::now(),
        };
        self.state = ShellState::Settled(outcome.clone());
        outcome
    }

    /// Runs one full cycle. Validation rejections are returned as `Err` and
    /// never stored; every other failure is stored as the outcome.
    pub async fn submit(&mut self) -> Result<Outcome> {
        let submission = self.begin()?;
        let span = tracing::info_span!("submission", request_id = %submission.request_id);
        let result = self
            .client
            .summarize(submission.text())
            .instrument(span)
            .await;
        Ok(self.settle(submission, result))
    }
}

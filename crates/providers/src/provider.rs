use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Question, Report, Subject, SubmissionPayload};

/// Errors surfaced by question providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by result sinks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("submission rejected: {0}")]
    Rejected(String),
}

/// Supplies the ordered subject list and per-subject question lists.
///
/// Callers cache a subject's questions after the first success and never
/// issue a repeat request for an already-loaded subject.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch the ordered sequence of subjects.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failure.
    async fn list_subjects(&self) -> Result<Vec<Subject>, ProviderError>;

    /// Fetch the ordered question list for a subject.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownSubject` if the subject does not exist,
    /// or `ProviderError::Transport` on transport failure.
    async fn list_questions(&self, subject: &Subject) -> Result<Vec<Question>, ProviderError>;
}

/// Accepts the completed answer snapshot and returns a rendered report.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Score/analyze the full answer snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` on failure; callers keep their answers and
    /// offer a manual retry.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Report, SubmissionError>;
}

/// Simple in-memory question bank for testing and the demo binary.
///
/// Subjects keep their insertion order. Failure injection is single-shot:
/// `fail_next_subjects` / `fail_next_questions` arm exactly one transport
/// failure, so tests can exercise the retry path deterministically.
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    bank: Vec<(Subject, Vec<Question>)>,
    fail_next_subjects: Arc<Mutex<bool>>,
    fail_next_questions: Arc<Mutex<bool>>,
    question_calls: Arc<Mutex<HashMap<Subject, usize>>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subject and its ordered question list to the bank.
    #[must_use]
    pub fn with_subject(mut self, subject: Subject, questions: Vec<Question>) -> Self {
        self.bank.push((subject, questions));
        self
    }

    /// Arm a single transport failure for the next `list_subjects` call.
    pub fn fail_next_subjects(&self) {
        *self.fail_next_subjects.lock().expect("provider lock poisoned") = true;
    }

    /// Arm a single transport failure for the next `list_questions` call.
    pub fn fail_next_questions(&self) {
        *self.fail_next_questions.lock().expect("provider lock poisoned") = true;
    }

    /// How many times `list_questions` was called for this subject.
    ///
    /// Lets tests assert that the session cache prevents repeat fetches.
    #[must_use]
    pub fn question_calls(&self, subject: &Subject) -> usize {
        self.question_calls
            .lock()
            .expect("provider lock poisoned")
            .get(subject)
            .copied()
            .unwrap_or(0)
    }

    fn take_flag(flag: &Mutex<bool>) -> bool {
        let mut armed = flag.lock().expect("provider lock poisoned");
        std::mem::take(&mut *armed)
    }
}

#[async_trait]
impl QuestionProvider for InMemoryProvider {
    async fn list_subjects(&self) -> Result<Vec<Subject>, ProviderError> {
        if Self::take_flag(&self.fail_next_subjects) {
            return Err(ProviderError::Transport("injected failure".into()));
        }
        Ok(self.bank.iter().map(|(subject, _)| subject.clone()).collect())
    }

    async fn list_questions(&self, subject: &Subject) -> Result<Vec<Question>, ProviderError> {
        *self
            .question_calls
            .lock()
            .expect("provider lock poisoned")
            .entry(subject.clone())
            .or_insert(0) += 1;

        if Self::take_flag(&self.fail_next_questions) {
            return Err(ProviderError::Transport("injected failure".into()));
        }
        self.bank
            .iter()
            .find(|(s, _)| s == subject)
            .map(|(_, questions)| questions.clone())
            .ok_or_else(|| ProviderError::UnknownSubject(subject.name().to_owned()))
    }
}

/// Result sink that records every submitted payload and answers with a
/// canned report.
#[derive(Clone)]
pub struct RecordingSink {
    report_body: String,
    submissions: Arc<Mutex<Vec<SubmissionPayload>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new("analysis pending")
    }
}

impl RecordingSink {
    #[must_use]
    pub fn new(report_body: impl Into<String>) -> Self {
        Self {
            report_body: report_body.into(),
            submissions: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(false)),
        }
    }

    /// Arm a single failure for the next `submit` call.
    pub fn fail_next(&self) {
        *self.fail_next.lock().expect("sink lock poisoned") = true;
    }

    /// Every payload submitted so far, in order.
    #[must_use]
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions.lock().expect("sink lock poisoned").clone()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Report, SubmissionError> {
        let armed = {
            let mut flag = self.fail_next.lock().expect("sink lock poisoned");
            std::mem::take(&mut *flag)
        };
        if armed {
            return Err(SubmissionError::Transport("injected failure".into()));
        }
        self.submissions
            .lock()
            .expect("sink lock poisoned")
            .push(payload.clone());
        Ok(Report::new(self.report_body.clone()))
    }
}

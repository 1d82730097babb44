use std::sync::Arc;

use tracing::{debug, info, warn};

use providers::{QuestionProvider, ResultSink};
use quiz_core::model::{Subject, SubmissionPayload};
use quiz_core::Clock;

use super::intent::{Effect, Intent, Outcome};
use super::machine::QuizSession;
use crate::config::SessionConfig;
use crate::error::SessionError;

/// Drives a `QuizSession` against its collaborators.
///
/// The machine stays pure; this runner owns the clock, the question provider
/// and the result sink, executes the effects each transition emits, and
/// feeds the async responses back in as intents. Events stay fully
/// serialized: an intent and all of its follow-up effects complete before
/// the next intent is accepted.
#[derive(Clone)]
pub struct SessionRunner {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
    sink: Arc<dyn ResultSink>,
    config: SessionConfig,
}

impl SessionRunner {
    #[must_use]
    pub fn new(
        clock: Clock,
        provider: Arc<dyn QuestionProvider>,
        sink: Arc<dyn ResultSink>,
        config: SessionConfig,
    ) -> Self {
        Self {
            clock,
            provider,
            sink,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Fetch the subject list and start a session over it.
    ///
    /// A failure of the *first question fetch* is not terminal: the session
    /// is returned in `Loading` with the request still outstanding, and
    /// [`retry_fetch`](Self::retry_fetch) can re-issue it.
    ///
    /// # Errors
    ///
    /// A `ProviderError` on the subject list is terminal for the session:
    /// there are no subjects to drive the machine, and no automatic retry
    /// happens. Returns `SessionError::NoSubjects` for an empty list.
    pub async fn start(&self) -> Result<QuizSession, SessionError> {
        let subjects = self.provider.list_subjects().await.inspect_err(|err| {
            warn!("subject list fetch failed: {err}");
        })?;
        info!(subjects = subjects.len(), "starting quiz session");

        let (mut session, effects) =
            QuizSession::new(subjects, &self.config, self.clock.now())?;
        if let Err(err) = self.run_effects(&mut session, effects).await {
            // The machine stays in Loading with the fetch outstanding;
            // callers observe the stalled mode and offer a manual retry.
            warn!("initial question fetch failed: {err}");
        }
        Ok(session)
    }

    /// Apply one intent and execute whatever effects it emits.
    ///
    /// The outcome reflects the intent itself; rejections are returned, not
    /// raised. Provider and sink failures during effect execution surface as
    /// errors *after* the machine has settled into its documented recovery
    /// state (still `Loading` for a fetch, back to `AwaitingAnswer` for a
    /// submission), so the caller can show the failure and offer a retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Provider` or `SessionError::Submission` when
    /// an emitted effect fails.
    pub async fn handle(
        &self,
        session: &mut QuizSession,
        intent: Intent,
    ) -> Result<Outcome, SessionError> {
        let outcome = session.apply(intent, self.clock.now());
        match &outcome {
            Outcome::Accepted(effects) => {
                self.run_effects(session, effects.clone()).await?;
            }
            Outcome::Rejected(reason) => {
                debug!(?reason, "intent rejected");
            }
        }
        Ok(outcome)
    }

    /// Manually retry the outstanding question fetch.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingToRetry` when no fetch is outstanding,
    /// or `SessionError::Provider` when the retried fetch fails again.
    pub async fn retry_fetch(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        let Some(subject) = session.pending_fetch().cloned() else {
            return Err(SessionError::NothingToRetry);
        };
        info!(%subject, "retrying question fetch");
        self.fetch_questions(session, subject).await
    }

    async fn run_effects(
        &self,
        session: &mut QuizSession,
        effects: Vec<Effect>,
    ) -> Result<(), SessionError> {
        for effect in effects {
            match effect {
                Effect::FetchQuestions(subject) => {
                    self.fetch_questions(session, subject).await?;
                }
                Effect::Submit(payload) => {
                    self.submit(session, payload).await?;
                }
            }
        }
        Ok(())
    }

    async fn fetch_questions(
        &self,
        session: &mut QuizSession,
        subject: Subject,
    ) -> Result<(), SessionError> {
        match self.provider.list_questions(&subject).await {
            Ok(questions) => {
                info!(%subject, count = questions.len(), "questions loaded");
                let outcome = session.apply(
                    Intent::QuestionsLoaded {
                        subject: subject.clone(),
                        questions,
                    },
                    self.clock.now(),
                );
                if !outcome.is_accepted() {
                    debug!(%subject, "late question response discarded");
                }
                Ok(())
            }
            Err(err) => {
                warn!(%subject, "question fetch failed: {err}");
                let _ = session.apply(
                    Intent::QuestionsFailed {
                        subject: subject.clone(),
                    },
                    self.clock.now(),
                );
                Err(SessionError::Provider(err))
            }
        }
    }

    async fn submit(
        &self,
        session: &mut QuizSession,
        payload: SubmissionPayload,
    ) -> Result<(), SessionError> {
        info!(answers = session.answers().len(), "submitting answer book");
        match self.sink.submit(&payload).await {
            Ok(report) => {
                info!("submission accepted");
                let _ = session.apply(Intent::SubmissionSucceeded(report), self.clock.now());
                Ok(())
            }
            Err(err) => {
                warn!("submission failed: {err}");
                let _ = session.apply(Intent::SubmissionFailed, self.clock.now());
                Err(SessionError::Submission(err))
            }
        }
    }
}

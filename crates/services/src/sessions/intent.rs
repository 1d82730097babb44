use quiz_core::model::{OptionLabel, Question, Report, Subject, SubmissionPayload};

/// A point event fed into the session state machine.
///
/// User intents, countdown ticks, and collaborator responses all arrive
/// through the same serialized channel; no two are processed concurrently.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// The taker picked an option for the current question.
    AnswerSelected(OptionLabel),
    /// Advance to the next question, subject, or submission.
    Next,
    /// Step back to the previous question or subject.
    Previous,
    /// Leave the announcement screen and start the untimed block.
    ContinueFromTransition,
    /// One second of the timed budget elapsed.
    ClockTick,
    /// Provider response for an outstanding question fetch.
    QuestionsLoaded {
        subject: Subject,
        questions: Vec<Question>,
    },
    /// Provider failure for an outstanding question fetch.
    QuestionsFailed { subject: Subject },
    /// The result sink accepted the submission.
    SubmissionSucceeded(Report),
    /// The result sink rejected or failed the submission.
    SubmissionFailed,
}

/// A request the machine asks its driver to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch the ordered question list for a subject.
    FetchQuestions(Subject),
    /// Send the full answer snapshot to the result sink.
    Submit(SubmissionPayload),
}

/// Why an intent was refused.
///
/// Rejections are presentation-contract violations or stale events; they
/// never mutate state and are not user-visible errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The intent is only valid while a question is on screen.
    NotAwaitingAnswer,
    /// `Next` with no answer recorded for the current question.
    Unanswered,
    /// `Previous` at the very first question of the very first subject.
    AtFirstQuestion,
    /// `ContinueFromTransition` outside the announcement screen.
    NotInTransition,
    /// A tick arrived while the countdown is stopped.
    TimerStopped,
    /// A provider response for a subject that is no longer awaited.
    StaleResponse,
    /// A submission response with no submission in flight.
    NotSubmitting,
}

/// Result of applying one intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The intent was applied; the driver must execute these effects.
    Accepted(Vec<Effect>),
    /// The intent was refused; state is unchanged.
    Rejected(RejectReason),
}

impl Outcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted(_))
    }

    /// Effects to execute; empty when rejected.
    #[must_use]
    pub fn effects(&self) -> &[Effect] {
        match self {
            Outcome::Accepted(effects) => effects,
            Outcome::Rejected(_) => &[],
        }
    }

    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            Outcome::Accepted(_) => None,
            Outcome::Rejected(reason) => Some(*reason),
        }
    }
}

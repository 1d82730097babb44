use chrono::{DateTime, Utc};
use std::collections::HashMap;

use quiz_core::model::{AnswerBook, OptionLabel, Question, QuestionPosition, Report, Subject};
use quiz_core::time::{Countdown, Tick};

use super::intent::{Effect, Intent, Outcome, RejectReason};
use super::view::{Mode, SessionView};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::sections::SectionPlan;

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// The quiz session state machine.
///
/// Owns the whole mutable session state and mutates it only through
/// [`apply`](Self::apply), a single serialized transition function. The
/// machine performs no I/O itself; it emits [`Effect`]s describing the
/// provider and sink calls its driver must make, and consumes their results
/// as intents. That keeps every transition synchronous and unit-testable
/// without a rendering layer or a wall-clock timer.
pub struct QuizSession {
    plan: SectionPlan,
    questions: HashMap<Subject, Vec<Question>>,
    answers: AnswerBook,
    subject_idx: usize,
    question_idx: usize,
    countdown: Countdown,
    timer_locked: bool,
    mode: Mode,
    pending_fetch: Option<Subject>,
    report: Option<Report>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over the fetched subject list.
    ///
    /// Enters `Loading` and requests the first subject's questions. The
    /// countdown starts only when the first subject is core.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSubjects` for an empty list; there is
    /// nothing to drive the machine with.
    pub fn new(
        subjects: Vec<Subject>,
        config: &SessionConfig,
        started_at: DateTime<Utc>,
    ) -> Result<(Self, Vec<Effect>), SessionError> {
        if subjects.is_empty() {
            return Err(SessionError::NoSubjects);
        }
        let plan = SectionPlan::new(subjects, &config.core_subjects);
        let first = plan.subjects()[0].clone();

        let mut countdown = Countdown::new(config.time_budget_secs);
        if plan.is_core(&first) {
            countdown.start();
        }

        let session = Self {
            plan,
            questions: HashMap::new(),
            answers: AnswerBook::new(),
            subject_idx: 0,
            question_idx: 0,
            countdown,
            timer_locked: false,
            mode: Mode::Loading,
            pending_fetch: Some(first.clone()),
            report: None,
            started_at,
            completed_at: None,
        };
        Ok((session, vec![Effect::FetchQuestions(first)]))
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────────
    //

    /// Apply one intent and return the effects the driver must execute.
    ///
    /// `now` should come from the caller's clock; it is only consulted for
    /// the completion timestamp.
    pub fn apply(&mut self, intent: Intent, now: DateTime<Utc>) -> Outcome {
        match intent {
            Intent::AnswerSelected(label) => self.answer_selected(label),
            Intent::Next => self.next(),
            Intent::Previous => self.previous(),
            Intent::ContinueFromTransition => self.continue_from_transition(),
            Intent::ClockTick => self.clock_tick(),
            Intent::QuestionsLoaded { subject, questions } => {
                self.questions_loaded(subject, questions)
            }
            Intent::QuestionsFailed { subject } => self.questions_failed(&subject),
            Intent::SubmissionSucceeded(report) => self.submission_succeeded(report, now),
            Intent::SubmissionFailed => self.submission_failed(),
        }
    }

    fn answer_selected(&mut self, label: OptionLabel) -> Outcome {
        if self.mode != Mode::AwaitingAnswer {
            return Outcome::Rejected(RejectReason::NotAwaitingAnswer);
        }
        let subject = self.current_subject().clone();
        self.answers
            .record(subject, self.current_position(), label);
        Outcome::Accepted(Vec::new())
    }

    fn next(&mut self) -> Outcome {
        if self.mode != Mode::AwaitingAnswer {
            return Outcome::Rejected(RejectReason::NotAwaitingAnswer);
        }
        // Next is disabled until the current question has an answer. This
        // holds on the final question too: submission is only reachable
        // through the answered path or timer expiry.
        if self.current_answer().is_none() {
            return Outcome::Rejected(RejectReason::Unanswered);
        }

        let question_count = self.current_question_count();
        if self.question_idx + 1 < question_count {
            self.question_idx += 1;
            return Outcome::Accepted(Vec::new());
        }

        if self.subject_idx + 1 < self.plan.len() {
            let current = self.current_subject().clone();
            let next = self.plan.subjects()[self.subject_idx + 1].clone();
            let boundary = self.plan.is_core_to_non_core_boundary(&current, &next);

            self.subject_idx += 1;
            self.question_idx = 0;

            if boundary {
                // Leaving the timed block: the countdown stops for good and
                // the announcement screen takes over. A later QuestionsLoaded
                // must not dismiss it; only ContinueFromTransition does.
                self.lock_timer();
                self.mode = Mode::TransitionScreen;
            }

            return Outcome::Accepted(self.enter_subject(next, boundary));
        }

        // Last question of the last subject.
        Outcome::Accepted(vec![self.begin_submission()])
    }

    fn previous(&mut self) -> Outcome {
        if self.mode != Mode::AwaitingAnswer {
            return Outcome::Rejected(RejectReason::NotAwaitingAnswer);
        }
        if self.question_idx > 0 {
            self.question_idx -= 1;
            return Outcome::Accepted(Vec::new());
        }
        if self.subject_idx == 0 {
            return Outcome::Rejected(RejectReason::AtFirstQuestion);
        }

        self.subject_idx -= 1;
        let subject = self.current_subject().clone();
        match self.questions.get(&subject) {
            Some(questions) => {
                // Land on the last question of the previous subject. The
                // saturating_sub also clamps an empty cached list to 0.
                self.question_idx = questions.len().saturating_sub(1);
                Outcome::Accepted(Vec::new())
            }
            None => {
                // The previous subject was never fetched (possible after a
                // timer-expiry jump). Clamp to question 0 and load it instead
                // of computing an index from a missing list.
                self.question_idx = 0;
                self.mode = Mode::Loading;
                self.pending_fetch = Some(subject.clone());
                Outcome::Accepted(vec![Effect::FetchQuestions(subject)])
            }
        }
    }

    fn continue_from_transition(&mut self) -> Outcome {
        if self.mode != Mode::TransitionScreen {
            return Outcome::Rejected(RejectReason::NotInTransition);
        }
        // The timer stays stopped; the untimed block never restarts it.
        self.mode = if self.questions.contains_key(self.current_subject()) {
            Mode::AwaitingAnswer
        } else {
            Mode::Loading
        };
        Outcome::Accepted(Vec::new())
    }

    fn clock_tick(&mut self) -> Outcome {
        if !self.countdown.is_running() {
            return Outcome::Rejected(RejectReason::TimerStopped);
        }
        match self.countdown.tick() {
            Some(Tick::Expired) => self.timer_expired(),
            Some(Tick::Remaining(_)) | None => Outcome::Accepted(Vec::new()),
        }
    }

    /// The budget ran out: behave as if the taker finished every remaining
    /// core question without further input. Unanswered questions stay absent
    /// from the book; nothing is backfilled.
    fn timer_expired(&mut self) -> Outcome {
        self.lock_timer();
        match self.plan.first_non_core_index() {
            Some(index) => {
                self.subject_idx = index;
                self.question_idx = 0;
                self.mode = Mode::TransitionScreen;
                let subject = self.plan.subjects()[index].clone();
                Outcome::Accepted(self.enter_subject(subject, true))
            }
            // The whole assessment was core-only: submit what we have.
            None => Outcome::Accepted(vec![self.begin_submission()]),
        }
    }

    fn questions_loaded(&mut self, subject: Subject, questions: Vec<Question>) -> Outcome {
        // A response for anything but the latest request is stale: the taker
        // has moved on, and applying it would clobber current state.
        if self.pending_fetch.as_ref() != Some(&subject) {
            return Outcome::Rejected(RejectReason::StaleResponse);
        }
        self.pending_fetch = None;
        let count = questions.len();
        self.questions.insert(subject, questions);

        if self.mode == Mode::Loading {
            self.question_idx = self.question_idx.min(count.saturating_sub(1));
            self.mode = Mode::AwaitingAnswer;
        }
        // In TransitionScreen the load completes silently; leaving the
        // screen requires an explicit ContinueFromTransition.
        Outcome::Accepted(Vec::new())
    }

    fn questions_failed(&mut self, subject: &Subject) -> Outcome {
        if self.pending_fetch.as_ref() != Some(subject) {
            return Outcome::Rejected(RejectReason::StaleResponse);
        }
        // Stay in Loading (or the transition screen) and keep the request
        // outstanding so the same fetch can be retried manually.
        Outcome::Accepted(Vec::new())
    }

    fn submission_succeeded(&mut self, report: Report, now: DateTime<Utc>) -> Outcome {
        if self.mode != Mode::Submitting {
            return Outcome::Rejected(RejectReason::NotSubmitting);
        }
        self.mode = Mode::Completed;
        self.report = Some(report);
        self.completed_at = Some(now);
        Outcome::Accepted(Vec::new())
    }

    fn submission_failed(&mut self) -> Outcome {
        if self.mode != Mode::Submitting {
            return Outcome::Rejected(RejectReason::NotSubmitting);
        }
        // Back to the last interactive position; the book is never discarded
        // on submission failure. Retry is manual, via another answered Next.
        self.mode = Mode::AwaitingAnswer;
        Outcome::Accepted(Vec::new())
    }

    //
    // ─── TRANSITION HELPERS ────────────────────────────────────────────────────
    //

    /// Request questions for a newly active subject, skipping the fetch when
    /// its list is already cached. `hold_screen` keeps the current mode (the
    /// transition screen) instead of following the load state.
    fn enter_subject(&mut self, subject: Subject, hold_screen: bool) -> Vec<Effect> {
        if self.questions.contains_key(&subject) {
            if !hold_screen {
                self.mode = Mode::AwaitingAnswer;
            }
            return Vec::new();
        }
        if !hold_screen {
            self.mode = Mode::Loading;
        }
        self.pending_fetch = Some(subject.clone());
        vec![Effect::FetchQuestions(subject)]
    }

    fn begin_submission(&mut self) -> Effect {
        // Position is kept so a failed submission can return the taker to
        // the exact question they submitted from.
        self.lock_timer();
        self.mode = Mode::Submitting;
        Effect::Submit(self.answers.to_submission_payload())
    }

    fn lock_timer(&mut self) {
        self.countdown.stop();
        self.timer_locked = true;
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            mode: self.mode,
            subject_index: self.subject_idx,
            question_index: self.question_idx,
            remaining_seconds: self.countdown.remaining(),
            timer_running: self.countdown.is_running(),
            current_answer: self.current_answer().cloned(),
            answered: self.answers.len(),
            total_in_subject: self.current_question_count(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn current_subject(&self) -> &Subject {
        &self.plan.subjects()[self.subject_idx]
    }

    /// The question currently on screen, once its subject's list is loaded.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions
            .get(self.current_subject())
            .and_then(|questions| questions.get(self.question_idx))
    }

    #[must_use]
    pub fn current_answer(&self) -> Option<&OptionLabel> {
        self.answers
            .get(self.current_subject(), self.current_position())
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerBook {
        &self.answers
    }

    #[must_use]
    pub fn plan(&self) -> &SectionPlan {
        &self.plan
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.mode == Mode::Completed
    }

    /// The subject whose question fetch is outstanding, if any.
    #[must_use]
    pub fn pending_fetch(&self) -> Option<&Subject> {
        self.pending_fetch.as_ref()
    }

    /// True once the countdown has been stopped for good, whether by expiry,
    /// by crossing the core boundary, or by submission.
    #[must_use]
    pub fn timer_locked(&self) -> bool {
        self.timer_locked
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    fn current_position(&self) -> QuestionPosition {
        QuestionPosition::from_index(self.question_idx)
    }

    fn current_question_count(&self) -> usize {
        self.questions
            .get(self.current_subject())
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("subject_idx", &self.subject_idx)
            .field("question_idx", &self.question_idx)
            .field("remaining", &self.countdown.remaining())
            .field("timer_locked", &self.timer_locked)
            .field("answered", &self.answers.len())
            .field("pending_fetch", &self.pending_fetch)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QuestionOption, SubmissionPayload};
    use quiz_core::time::fixed_now;

    fn subject(name: &str) -> Subject {
        Subject::new(name).unwrap()
    }

    fn label(s: &str) -> OptionLabel {
        OptionLabel::new(s).unwrap()
    }

    fn questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                Question::new(
                    format!("question {i}"),
                    vec![
                        QuestionOption::new(label("a"), "first"),
                        QuestionOption::new(label("b"), "second"),
                        QuestionOption::new(label("c"), "third"),
                    ],
                )
                .unwrap()
            })
            .collect()
    }

    fn config(core: &[&str], budget: u32) -> SessionConfig {
        SessionConfig::new(core.iter().map(|n| subject(n)).collect(), budget)
    }

    /// Physics (core, 2 questions) then Wellbeing (non-core, 1 question).
    fn two_section_session() -> QuizSession {
        let (mut session, effects) = QuizSession::new(
            vec![subject("Physics"), subject("Wellbeing")],
            &config(&["Physics"], 60),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(effects, vec![Effect::FetchQuestions(subject("Physics"))]);
        load(&mut session, "Physics", 2);
        session
    }

    fn load(session: &mut QuizSession, name: &str, n: usize) {
        let outcome = session.apply(
            Intent::QuestionsLoaded {
                subject: subject(name),
                questions: questions(n),
            },
            fixed_now(),
        );
        assert!(outcome.is_accepted(), "load of {name} rejected");
    }

    fn answer_and_next(session: &mut QuizSession, l: &str) -> Outcome {
        assert!(
            session
                .apply(Intent::AnswerSelected(label(l)), fixed_now())
                .is_accepted()
        );
        session.apply(Intent::Next, fixed_now())
    }

    #[test]
    fn empty_subject_list_never_starts() {
        let err = QuizSession::new(Vec::new(), &config(&[], 60), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::NoSubjects));
    }

    #[test]
    fn starts_loading_with_timer_running_for_core_first_subject() {
        let session = two_section_session();
        let view = session.view();
        assert_eq!(view.mode, Mode::AwaitingAnswer);
        assert_eq!(view.subject_index, 0);
        assert_eq!(view.question_index, 0);
        assert!(view.timer_running);
        assert_eq!(view.remaining_seconds, 60);
    }

    #[test]
    fn timer_stays_stopped_when_first_subject_is_untimed() {
        let (session, _) = QuizSession::new(
            vec![subject("Wellbeing")],
            &config(&[], 60),
            fixed_now(),
        )
        .unwrap();
        assert!(!session.view().timer_running);
        // Ticks are rejected outright while the countdown is stopped.
        let mut session = session;
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::TimerStopped));
    }

    #[test]
    fn next_is_rejected_without_an_answer() {
        let mut session = two_section_session();
        let outcome = session.apply(Intent::Next, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::Unanswered));
        assert_eq!(session.view().question_index, 0);
    }

    #[test]
    fn reselecting_overwrites_the_answer_in_place() {
        let mut session = two_section_session();
        session.apply(Intent::AnswerSelected(label("a")), fixed_now());
        session.apply(Intent::AnswerSelected(label("c")), fixed_now());

        assert_eq!(session.current_answer(), Some(&label("c")));
        assert_eq!(session.view().question_index, 0);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn answer_outside_awaiting_answer_is_rejected() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        let outcome = answer_and_next(&mut session, "b");
        assert!(outcome.is_accepted());
        assert_eq!(session.mode(), Mode::TransitionScreen);

        let outcome = session.apply(Intent::AnswerSelected(label("a")), fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::NotAwaitingAnswer));
    }

    #[test]
    fn boundary_next_stops_timer_and_shows_transition_screen() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        let outcome = answer_and_next(&mut session, "b");
        assert_eq!(
            outcome.effects(),
            &[Effect::FetchQuestions(subject("Wellbeing"))]
        );

        let view = session.view();
        assert_eq!(view.mode, Mode::TransitionScreen);
        assert_eq!(view.subject_index, 1);
        assert_eq!(view.question_index, 0);
        assert!(!view.timer_running);
    }

    #[test]
    fn questions_loaded_does_not_dismiss_transition_screen() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");

        load(&mut session, "Wellbeing", 1);
        assert_eq!(session.mode(), Mode::TransitionScreen);

        let outcome = session.apply(Intent::ContinueFromTransition, fixed_now());
        assert!(outcome.is_accepted());
        assert_eq!(session.mode(), Mode::AwaitingAnswer);
        assert!(!session.view().timer_running);
    }

    #[test]
    fn continue_before_load_completes_falls_back_to_loading() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");

        let outcome = session.apply(Intent::ContinueFromTransition, fixed_now());
        assert!(outcome.is_accepted());
        assert_eq!(session.mode(), Mode::Loading);

        load(&mut session, "Wellbeing", 1);
        assert_eq!(session.mode(), Mode::AwaitingAnswer);
    }

    #[test]
    fn non_boundary_advance_skips_transition_screen() {
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics"), subject("Chemistry")],
            &config(&["Physics", "Chemistry"], 60),
            fixed_now(),
        )
        .unwrap();
        load(&mut session, "Physics", 1);

        let outcome = answer_and_next(&mut session, "a");
        assert_eq!(
            outcome.effects(),
            &[Effect::FetchQuestions(subject("Chemistry"))]
        );
        assert_eq!(session.mode(), Mode::Loading);
        // The timer keeps running across a core-to-core advance.
        assert!(session.view().timer_running);

        load(&mut session, "Chemistry", 1);
        assert_eq!(session.mode(), Mode::AwaitingAnswer);
    }

    #[test]
    fn cached_subject_reentry_skips_the_fetch() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");
        load(&mut session, "Wellbeing", 1);
        session.apply(Intent::ContinueFromTransition, fixed_now());

        // Back into Physics, then forward again: both lists are cached, so
        // no fetch effects are emitted anywhere.
        let outcome = session.apply(Intent::Previous, fixed_now());
        assert!(outcome.is_accepted());
        assert_eq!(outcome.effects(), &[]);
        assert_eq!(session.view().subject_index, 0);
        assert_eq!(session.view().question_index, 1);

        let outcome = session.apply(Intent::Next, fixed_now());
        assert!(outcome.is_accepted());
        assert_eq!(outcome.effects(), &[]);
        assert_eq!(session.mode(), Mode::TransitionScreen);
    }

    #[test]
    fn previous_steps_back_within_a_subject() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        assert_eq!(session.view().question_index, 1);

        let outcome = session.apply(Intent::Previous, fixed_now());
        assert!(outcome.is_accepted());
        assert_eq!(session.view().question_index, 0);
        assert_eq!(session.current_answer(), Some(&label("a")));
    }

    #[test]
    fn previous_at_the_very_start_is_rejected() {
        let mut session = two_section_session();
        let outcome = session.apply(Intent::Previous, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::AtFirstQuestion));
        let view = session.view();
        assert_eq!((view.subject_index, view.question_index), (0, 0));
    }

    #[test]
    fn previous_into_uncached_subject_clamps_to_first_question() {
        // Expiry jumps over Chemistry; stepping back into it finds no cache.
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics"), subject("Chemistry"), subject("Wellbeing")],
            &config(&["Physics", "Chemistry"], 1),
            fixed_now(),
        )
        .unwrap();
        load(&mut session, "Physics", 1);

        session.apply(Intent::ClockTick, fixed_now());
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(
            outcome.effects(),
            &[Effect::FetchQuestions(subject("Wellbeing"))]
        );
        load(&mut session, "Wellbeing", 1);
        session.apply(Intent::ContinueFromTransition, fixed_now());

        let outcome = session.apply(Intent::Previous, fixed_now());
        assert_eq!(
            outcome.effects(),
            &[Effect::FetchQuestions(subject("Chemistry"))]
        );
        let view = session.view();
        assert_eq!(view.mode, Mode::Loading);
        assert_eq!(view.subject_index, 1);
        assert_eq!(view.question_index, 0);

        load(&mut session, "Chemistry", 4);
        assert_eq!(session.mode(), Mode::AwaitingAnswer);
        assert_eq!(session.view().question_index, 0);
    }

    #[test]
    fn ticks_mirror_remaining_seconds() {
        let mut session = two_section_session();
        session.apply(Intent::ClockTick, fixed_now());
        session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(session.view().remaining_seconds, 58);
    }

    #[test]
    fn expiry_jumps_to_first_non_core_subject() {
        let mut session = two_section_session(); // budget 60
        for _ in 0..60 {
            assert!(session.apply(Intent::ClockTick, fixed_now()).is_accepted());
        }
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(
            outcome.effects(),
            &[Effect::FetchQuestions(subject("Wellbeing"))]
        );

        let view = session.view();
        assert_eq!(view.mode, Mode::TransitionScreen);
        assert_eq!(view.subject_index, 1);
        assert_eq!(view.remaining_seconds, 0);
        assert!(!view.timer_running);

        // The timer never comes back in this session.
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::TimerStopped));
    }

    #[test]
    fn expiry_on_core_only_plan_submits_immediately_without_backfill() {
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics")],
            &config(&["Physics"], 1),
            fixed_now(),
        )
        .unwrap();
        load(&mut session, "Physics", 1);

        session.apply(Intent::ClockTick, fixed_now());
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        let [Effect::Submit(payload)] = outcome.effects() else {
            panic!("expected a submit effect, got {outcome:?}");
        };

        assert_eq!(session.mode(), Mode::Submitting);
        // Nothing was answered; the snapshot carries no backfilled entries.
        assert_eq!(payload, &SubmissionPayload::new());
    }

    #[test]
    fn timer_never_restarts_after_boundary_stop() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");
        load(&mut session, "Wellbeing", 1);
        session.apply(Intent::ContinueFromTransition, fixed_now());

        assert!(session.timer_locked());

        // Walk back into the timed block and around again.
        session.apply(Intent::Previous, fixed_now());
        assert!(!session.view().timer_running);
        session.apply(Intent::Previous, fixed_now());
        assert!(!session.view().timer_running);
        let outcome = session.apply(Intent::ClockTick, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::TimerStopped));
    }

    #[test]
    fn final_next_submits_the_accumulated_snapshot() {
        let mut session = two_section_session();
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");
        load(&mut session, "Wellbeing", 1);
        session.apply(Intent::ContinueFromTransition, fixed_now());

        let outcome = answer_and_next(&mut session, "c");
        let [Effect::Submit(payload)] = outcome.effects() else {
            panic!("expected a submit effect, got {outcome:?}");
        };
        assert_eq!(session.mode(), Mode::Submitting);

        assert_eq!(payload["Physics"]["Q1"], "a");
        assert_eq!(payload["Physics"]["Q2"], "b");
        assert_eq!(payload["Wellbeing"]["Q1"], "c");

        // No navigation is accepted while the submission is in flight.
        let outcome = session.apply(Intent::Next, fixed_now());
        assert_eq!(outcome.reject_reason(), Some(RejectReason::NotAwaitingAnswer));

        let outcome = session.apply(
            Intent::SubmissionSucceeded(Report::new("done")),
            fixed_now(),
        );
        assert!(outcome.is_accepted());
        assert!(session.is_complete());
        assert_eq!(session.report().map(Report::body), Some("done"));
        assert_eq!(session.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn failed_submission_returns_to_the_same_question_with_answers_intact() {
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics")],
            &config(&["Physics"], 60),
            fixed_now(),
        )
        .unwrap();
        load(&mut session, "Physics", 2);
        answer_and_next(&mut session, "a");
        answer_and_next(&mut session, "b");
        assert_eq!(session.mode(), Mode::Submitting);

        let outcome = session.apply(Intent::SubmissionFailed, fixed_now());
        assert!(outcome.is_accepted());

        let view = session.view();
        assert_eq!(view.mode, Mode::AwaitingAnswer);
        assert_eq!((view.subject_index, view.question_index), (0, 1));
        assert_eq!(session.answers().len(), 2);
        assert!(session.report().is_none());

        // Manual retry: the answered Next path is available again.
        let outcome = session.apply(Intent::Next, fixed_now());
        assert!(matches!(outcome.effects(), [Effect::Submit(_)]));
    }

    #[test]
    fn stale_question_response_is_discarded() {
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics"), subject("Chemistry")],
            &config(&["Physics", "Chemistry"], 60),
            fixed_now(),
        )
        .unwrap();
        // Physics fetch is outstanding; a Chemistry response must not land.
        let outcome = session.apply(
            Intent::QuestionsLoaded {
                subject: subject("Chemistry"),
                questions: questions(3),
            },
            fixed_now(),
        );
        assert_eq!(outcome.reject_reason(), Some(RejectReason::StaleResponse));
        assert_eq!(session.mode(), Mode::Loading);
        assert_eq!(session.pending_fetch(), Some(&subject("Physics")));
    }

    #[test]
    fn fetch_failure_keeps_loading_and_the_pending_request() {
        let (mut session, _) = QuizSession::new(
            vec![subject("Physics")],
            &config(&["Physics"], 60),
            fixed_now(),
        )
        .unwrap();
        let outcome = session.apply(
            Intent::QuestionsFailed {
                subject: subject("Physics"),
            },
            fixed_now(),
        );
        assert!(outcome.is_accepted());
        assert_eq!(session.mode(), Mode::Loading);
        assert_eq!(session.pending_fetch(), Some(&subject("Physics")));

        // The retried fetch can then complete normally.
        load(&mut session, "Physics", 1);
        assert_eq!(session.mode(), Mode::AwaitingAnswer);
    }
}

use quiz_core::model::OptionLabel;

/// Mutually exclusive view modes; exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A question fetch for the active subject is outstanding.
    Loading,
    /// A question is on screen and interactive.
    AwaitingAnswer,
    /// The announcement screen between the timed and untimed blocks.
    TransitionScreen,
    /// The answer snapshot is on its way to the result sink.
    Submitting,
    /// The sink accepted the submission; the report is available.
    Completed,
}

/// Presentation-agnostic snapshot of the session.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings,
/// no localization assumptions. The presentation layer formats the remaining
/// time and renders the current question as it sees fit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub mode: Mode,
    pub subject_index: usize,
    pub question_index: usize,
    pub remaining_seconds: u32,
    pub timer_running: bool,
    /// The recorded answer for the question currently on screen, if any.
    pub current_answer: Option<OptionLabel>,
    /// Total answers recorded across the whole session so far.
    pub answered: usize,
    /// Question count of the active subject; 0 while its list is not loaded.
    pub total_in_subject: usize,
}
